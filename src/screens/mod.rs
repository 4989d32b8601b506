//! Per-screen view state: pagination, selection and expand/collapse.
//!
//! Controllers own what a screen shows. Fetches run elsewhere; their
//! results are applied here in arrival order.

mod alert_logs;
mod expansion;
mod measurements;

pub use alert_logs::{AlertLogScreen, TreeRow};
pub use expansion::{NestedExpansion, SingleExpansion, TreeExpansion};
pub use measurements::{MeasurementRow, MeasurementScreen};

use crate::api::ApiError;

/// Pagination and load state of one list screen.
///
/// `C` is whatever the screen renders for one page: a `Vec` of rows for
/// the plain tables, an aggregated tree for alert logs.
#[derive(Debug, Clone)]
pub struct PageController<C> {
    page: u32,
    total_pages: u32,
    content: C,
    loading: bool,
    /// Row cursor within the loaded content.
    pub selected: usize,
}

impl<C: Default> Default for PageController<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Default> PageController<C> {
    pub fn new() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            content: C::default(),
            loading: false,
            selected: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mark a fetch of the current page as in flight and return its number.
    pub fn request(&mut self) -> u32 {
        self.loading = true;
        self.page
    }

    /// Move to `page` (clamped to `1..=total_pages`). Returns the page to
    /// fetch if it actually changed.
    pub fn go_to(&mut self, page: u32) -> Option<u32> {
        let target = page.clamp(1, self.total_pages);
        if target == self.page {
            return None;
        }
        self.page = target;
        self.selected = 0;
        Some(self.request())
    }

    pub fn next_page(&mut self) -> Option<u32> {
        self.go_to(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<u32> {
        self.go_to(self.page.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> Option<u32> {
        self.go_to(1)
    }

    pub fn last_page(&mut self) -> Option<u32> {
        self.go_to(self.total_pages)
    }

    /// Jump to page 1 and refetch even if already there.
    pub fn reset_to_first(&mut self) -> u32 {
        self.page = 1;
        self.selected = 0;
        self.request()
    }

    /// Apply a fetch result. Any failure empties the screen and leaves a
    /// single page, whatever was loaded before.
    pub fn apply(&mut self, result: Result<(C, u32), ApiError>) {
        self.loading = false;
        match result {
            Ok((content, total_pages)) => {
                self.content = content;
                self.total_pages = total_pages.max(1);
            }
            Err(e) => {
                tracing::warn!(page = self.page, error = %e, "page fetch failed");
                self.content = C::default();
                self.total_pages = 1;
            }
        }
        self.page = self.page.clamp(1, self.total_pages);
    }
}

impl<T> PageController<Vec<T>> {
    pub fn items(&self) -> &[T] {
        &self.content
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.content.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.content.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.content.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(n: usize, total: u32) -> Result<(Vec<u32>, u32), ApiError> {
        Ok(((0..n as u32).collect(), total))
    }

    fn failure() -> Result<(Vec<u32>, u32), ApiError> {
        Err(ApiError::Decode(
            serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        ))
    }

    #[test]
    fn starts_on_first_of_one_page() {
        let c: PageController<Vec<u32>> = PageController::new();
        assert_eq!(c.page(), 1);
        assert_eq!(c.total_pages(), 1);
        assert!(c.items().is_empty());
    }

    #[test]
    fn failure_resets_to_empty_single_page() {
        let mut c = PageController::new();
        c.apply(loaded(15, 5));
        assert_eq!(c.go_to(4), Some(4));
        c.apply(loaded(15, 5));
        assert_eq!(c.items().len(), 15);

        c.apply(failure());
        assert!(c.items().is_empty());
        assert_eq!(c.total_pages(), 1);
        assert_eq!(c.page(), 1);
        assert!(!c.is_loading());
    }

    #[test]
    fn navigation_is_clamped() {
        let mut c = PageController::new();
        assert_eq!(c.next_page(), None);
        c.apply(loaded(3, 3));
        assert_eq!(c.go_to(10), Some(3));
        assert_eq!(c.next_page(), None);
        assert_eq!(c.prev_page(), Some(2));
        assert_eq!(c.first_page(), Some(1));
        assert_eq!(c.prev_page(), None);
        assert_eq!(c.last_page(), Some(3));
        assert!(c.is_loading());
    }

    #[test]
    fn results_apply_in_arrival_order() {
        let mut c = PageController::new();
        c.apply(loaded(1, 4));
        c.go_to(2);
        c.go_to(3);
        // the later request answers first, the stale one lands last
        c.apply(loaded(3, 4));
        c.apply(loaded(2, 4));
        assert_eq!(c.items().len(), 2);
        assert_eq!(c.page(), 3);
    }

    #[test]
    fn shrinking_total_clamps_the_page() {
        let mut c = PageController::new();
        c.apply(loaded(1, 6));
        c.go_to(6);
        c.apply(loaded(1, 2));
        assert_eq!(c.page(), 2);
    }

    #[test]
    fn reset_to_first_always_refetches() {
        let mut c: PageController<Vec<u32>> = PageController::new();
        assert_eq!(c.reset_to_first(), 1);
        assert!(c.is_loading());
    }

    #[test]
    fn selection_stays_within_items() {
        let mut c = PageController::new();
        c.apply(loaded(2, 1));
        c.select_prev();
        assert_eq!(c.selected, 0);
        c.select_next();
        c.select_next();
        assert_eq!(c.selected, 1);
        assert_eq!(c.selected_item(), Some(&1));
        c.apply(loaded(0, 1));
        c.clamp_selection();
        assert_eq!(c.selected, 0);
        assert_eq!(c.selected_item(), None);
    }
}
