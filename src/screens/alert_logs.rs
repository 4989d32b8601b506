use super::{PageController, TreeExpansion};
use crate::alerts::{AlertLogTree, AlertStats};
use crate::api::ApiError;

/// One visible line of the alert tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeRow {
    Plan { node: usize },
    Tag { node: usize, group: usize },
    Alert { node: usize, group: usize, alert: usize },
}

/// Alert log screen: the aggregated page, what is expanded, and the
/// summary counts of the loaded page.
#[derive(Debug, Clone, Default)]
pub struct AlertLogScreen {
    pub list: PageController<AlertLogTree>,
    pub expansion: TreeExpansion,
    stats: AlertStats,
}

impl AlertLogScreen {
    pub fn tree(&self) -> &AlertLogTree {
        self.list.content()
    }

    pub fn stats(&self) -> AlertStats {
        self.stats
    }

    pub fn apply(&mut self, result: Result<(AlertLogTree, u32), ApiError>) {
        self.list.apply(result);
        self.stats = AlertStats::from_tree(self.list.content());
        let rows = self.visible_rows().len();
        self.list.selected = self.list.selected.min(rows.saturating_sub(1));
    }

    /// Rows in display order given the current expansion.
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        for (n, node) in self.tree().nodes().iter().enumerate() {
            rows.push(TreeRow::Plan { node: n });
            if !self.expansion.is_plan_open(node.plan.id) {
                continue;
            }
            for (g, group) in node.groups().iter().enumerate() {
                rows.push(TreeRow::Tag { node: n, group: g });
                if !self.expansion.is_tag_open(node.plan.id, group.tag.id) {
                    continue;
                }
                rows.extend((0..group.alerts.len()).map(|a| TreeRow::Alert {
                    node: n,
                    group: g,
                    alert: a,
                }));
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

    /// Expand or collapse the plan or tag under the cursor. Alert rows
    /// toggle their enclosing tag.
    pub fn toggle_at_cursor(&mut self) {
        let Some(row) = self.visible_rows().get(self.list.selected).copied() else {
            return;
        };
        let nodes = self.tree().nodes();
        match row {
            TreeRow::Plan { node } => {
                let plan_id = nodes[node].plan.id;
                self.expansion.toggle_plan(plan_id);
            }
            TreeRow::Tag { node, group } | TreeRow::Alert { node, group, .. } => {
                let plan_id = nodes[node].plan.id;
                let tag_id = nodes[node].groups()[group].tag.id;
                self.expansion.toggle_tag(plan_id, tag_id);
                if matches!(row, TreeRow::Alert { .. }) {
                    self.list.selected = self
                        .visible_rows()
                        .iter()
                        .position(|r| *r == TreeRow::Tag { node, group })
                        .unwrap_or(0);
                }
            }
        }
        let rows = self.visible_rows().len();
        self.list.selected = self.list.selected.min(rows.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::aggregate;
    use serde_json::json;

    fn screen() -> AlertLogScreen {
        let records = vec![
            json!({
                "work_plan": {"work_plan_id": 1},
                "rfid_tags": [
                    {"rfid_tag": {"rfid_tag_id": 10}, "alerts": [
                        {"alert_id": 1, "alert_type": "TEMP_HIGH"},
                        {"alert_id": 2, "alert_type": "HUM_LOW"}
                    ]},
                    {"rfid_tag": {"rfid_tag_id": 20}, "alerts": [
                        {"alert_id": 3, "alert_type": "TEMP_LOW"}
                    ]}
                ]
            }),
            json!({
                "work_plan": {"work_plan_id": 2},
                "rfid_tags": []
            }),
        ];
        let mut s = AlertLogScreen::default();
        s.apply(Ok((aggregate(&records), 1)));
        s
    }

    #[test]
    fn collapsed_tree_shows_plans_only() {
        let s = screen();
        assert_eq!(
            s.visible_rows(),
            vec![TreeRow::Plan { node: 0 }, TreeRow::Plan { node: 1 }]
        );
        assert_eq!(s.stats().total, 3);
    }

    #[test]
    fn toggling_opens_plan_then_tag() {
        let mut s = screen();
        s.toggle_at_cursor();
        assert_eq!(s.visible_rows().len(), 4);
        s.cursor_down();
        s.toggle_at_cursor();
        let rows = s.visible_rows();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[2], TreeRow::Alert { node: 0, group: 0, alert: 0 });

        // toggling from an alert row closes its tag and parks the cursor on it
        s.cursor_down();
        s.cursor_down();
        s.toggle_at_cursor();
        assert_eq!(s.visible_rows().len(), 4);
        assert_eq!(s.list.selected, 1);
    }

    #[test]
    fn expansion_survives_a_refetch() {
        let mut s = screen();
        s.toggle_at_cursor();
        let tree = s.tree().clone();
        s.apply(Ok((tree, 1)));
        assert!(s.expansion.is_plan_open(1));
    }

    #[test]
    fn failed_fetch_clears_rows_and_stats() {
        let mut s = screen();
        s.list.selected = 1;
        s.apply(Err(ApiError::Decode(
            serde_json::from_str::<serde_json::Value>("]").unwrap_err(),
        )));
        assert!(s.visible_rows().is_empty());
        assert_eq!(s.stats(), AlertStats::default());
        assert_eq!(s.list.selected, 0);
        assert_eq!(s.list.total_pages(), 1);
    }
}
