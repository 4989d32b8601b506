use super::{NestedExpansion, PageController};
use crate::api::ApiError;
use crate::models::MeasurementPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementRow {
    Plan { plan: usize },
    Location { plan: usize, item: usize },
    Reading { plan: usize, item: usize, reading: usize },
}

/// Collected data screen: one open plan, one open location inside it.
#[derive(Debug, Clone, Default)]
pub struct MeasurementScreen {
    pub list: PageController<Vec<MeasurementPlan>>,
    pub expansion: NestedExpansion,
}

impl MeasurementScreen {
    pub fn apply(&mut self, result: Result<(Vec<MeasurementPlan>, u32), ApiError>) {
        self.list.apply(result);
        self.clamp_cursor();
    }

    pub fn visible_rows(&self) -> Vec<MeasurementRow> {
        let mut rows = Vec::new();
        for (p, plan) in self.list.items().iter().enumerate() {
            rows.push(MeasurementRow::Plan { plan: p });
            if !self.expansion.is_plan_open(plan.plan.id) {
                continue;
            }
            for (i, item) in plan.items.iter().enumerate() {
                rows.push(MeasurementRow::Location { plan: p, item: i });
                if self.expansion.is_location_open(plan.plan.id, item.tag.id) {
                    rows.extend((0..item.measurements.len()).map(|r| MeasurementRow::Reading {
                        plan: p,
                        item: i,
                        reading: r,
                    }));
                }
            }
        }
        rows
    }

    pub fn cursor_down(&mut self) {
        if self.list.selected + 1 < self.visible_rows().len() {
            self.list.selected += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.list.selected = self.list.selected.saturating_sub(1);
    }

    pub fn toggle_at_cursor(&mut self) {
        let Some(row) = self.visible_rows().get(self.list.selected).copied() else {
            return;
        };
        let plans = self.list.items();
        match row {
            MeasurementRow::Plan { plan } => {
                let id = plans[plan].plan.id;
                self.expansion.toggle_plan(id);
            }
            MeasurementRow::Location { plan, item } | MeasurementRow::Reading { plan, item, .. } => {
                let id = plans[plan].items[item].tag.id;
                self.expansion.toggle_location(id);
                if matches!(row, MeasurementRow::Reading { .. }) {
                    self.list.selected = self
                        .visible_rows()
                        .iter()
                        .position(|r| *r == MeasurementRow::Location { plan, item })
                        .unwrap_or(0);
                }
            }
        }
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let rows = self.visible_rows().len();
        self.list.selected = self.list.selected.min(rows.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;
    use serde_json::json;

    fn plan(id: i64, tags: &[i64]) -> MeasurementPlan {
        let items: Vec<_> = tags
            .iter()
            .map(|t| {
                json!({
                    "rfid_tag": {"rfid_tag_id": t, "uid": "U", "location_name": "L"},
                    "measurement_frequency": 2,
                    "measurements": [
                        {"measurement_number": 1, "temperature": 20.0, "humidity": 50.0},
                        {"measurement_number": 2}
                    ]
                })
            })
            .collect();
        normalize::measurement_plan(&json!({"work_plan_id": id, "items": items})).unwrap()
    }

    #[test]
    fn only_one_plan_and_location_open() {
        let mut s = MeasurementScreen::default();
        s.apply(Ok((vec![plan(1, &[10, 11]), plan(2, &[10])], 1)));
        assert_eq!(s.visible_rows().len(), 2);

        s.toggle_at_cursor(); // open plan 1
        assert_eq!(s.visible_rows().len(), 4);
        s.cursor_down();
        s.toggle_at_cursor(); // open location 10
        assert_eq!(s.visible_rows().len(), 6);

        // opening plan 2 closes plan 1 and its location
        s.list.selected = 5;
        s.toggle_at_cursor();
        assert!(s.expansion.is_plan_open(2));
        assert!(!s.expansion.is_plan_open(1));
        assert!(!s.expansion.is_location_open(2, 10));
        assert_eq!(s.visible_rows().len(), 3);
    }
}
