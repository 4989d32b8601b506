/// One page of a paginated list as shown on a screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Always at least 1.
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_pages: u32) -> Self {
        Self {
            items,
            total_pages: total_pages.max(1),
        }
    }

    /// The state every list falls back to after a failed fetch.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 1,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_pages_is_raised_to_one() {
        let page: Page<u8> = Page::new(vec![], 0);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn empty_page_has_one_page() {
        let page: Page<String> = Page::empty();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}
