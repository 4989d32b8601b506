use super::AlertLogTree;
use crate::models::AlertType;

/// Summary counters over the alerts of the currently loaded page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertStats {
    pub total: usize,
    pub temp_high: usize,
    pub temp_low: usize,
    pub hum_high: usize,
    pub hum_low: usize,
}

impl AlertStats {
    pub fn from_tree(tree: &AlertLogTree) -> Self {
        let mut stats = Self::default();
        let alerts = tree
            .nodes()
            .iter()
            .flat_map(|n| n.groups())
            .flat_map(|g| &g.alerts);
        for alert in alerts {
            stats.total += 1;
            match alert.alert_type {
                AlertType::TempHigh => stats.temp_high += 1,
                AlertType::TempLow => stats.temp_low += 1,
                AlertType::HumHigh => stats.hum_high += 1,
                AlertType::HumLow => stats.hum_low += 1,
                AlertType::Other(_) => {}
            }
        }
        stats
    }

    pub fn count(&self, kind: &AlertType) -> usize {
        match kind {
            AlertType::TempHigh => self.temp_high,
            AlertType::TempLow => self.temp_low,
            AlertType::HumHigh => self.hum_high,
            AlertType::HumLow => self.hum_low,
            AlertType::Other(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::aggregate;
    use serde_json::json;

    #[test]
    fn counts_cover_loaded_page_only() {
        let records = vec![
            json!({
                "work_plan": {"work_plan_id": 1},
                "rfid_tags": [
                    {"rfid_tag": {"rfid_tag_id": 1}, "alerts": [
                        {"alert_id": 1, "alert_type": "TEMP_HIGH"},
                        {"alert_id": 2, "alert_type": "TEMP_HIGH"},
                        {"alert_id": 3, "alert_type": "HUM_LOW"}
                    ]},
                    {"rfid_tag": {"rfid_tag_id": 2}, "alerts": [
                        {"alert_id": 4, "alert_type": "PRESSURE"},
                        {"alert_id": 5}
                    ]}
                ]
            }),
            json!({
                "work_plan": {"work_plan_id": 2},
                "rfid_tags": [
                    {"rfid_tag": {"rfid_tag_id": 1}, "alerts": [
                        {"alert_id": 6, "alert_type": "TEMP_LOW"}
                    ]}
                ]
            }),
            // dropped record: its alerts don't count
            json!({
                "rfid_tags": [
                    {"rfid_tag": {"rfid_tag_id": 1}, "alerts": [{"alert_type": "HUM_HIGH"}]}
                ]
            }),
        ];
        let stats = AlertStats::from_tree(&aggregate(&records));
        assert_eq!(
            stats,
            AlertStats {
                total: 6,
                temp_high: 2,
                temp_low: 1,
                hum_high: 0,
                hum_low: 1,
            }
        );
        assert_eq!(stats.count(&AlertType::TempHigh), 2);
    }

    #[test]
    fn empty_tree_has_zero_counts() {
        assert_eq!(
            AlertStats::from_tree(&AlertLogTree::default()),
            AlertStats::default()
        );
    }
}
