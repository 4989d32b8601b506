use std::fmt;

use serde::Serialize;

use super::RfidTag;

/// Lifecycle status of a work plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorkPlanStatus {
    NotReceived,
    Received,
    InProgress,
    Completed,
    Failed,
    Suspended,
    /// Unrecognized code (including the `UNKNOWN` placeholder).
    Other(String),
}

impl WorkPlanStatus {
    pub fn parse(code: &str) -> Self {
        match code {
            "NOT_RECEIVED" => WorkPlanStatus::NotReceived,
            "RECEIVED" => WorkPlanStatus::Received,
            "IN_PROGRESS" => WorkPlanStatus::InProgress,
            "COMPLETED" => WorkPlanStatus::Completed,
            "FAILED" => WorkPlanStatus::Failed,
            "SUSPENDED" => WorkPlanStatus::Suspended,
            other => WorkPlanStatus::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            WorkPlanStatus::NotReceived => "NOT_RECEIVED",
            WorkPlanStatus::Received => "RECEIVED",
            WorkPlanStatus::InProgress => "IN_PROGRESS",
            WorkPlanStatus::Completed => "COMPLETED",
            WorkPlanStatus::Failed => "FAILED",
            WorkPlanStatus::Suspended => "SUSPENDED",
            WorkPlanStatus::Other(code) => code,
        }
    }

    pub fn label(&self) -> String {
        match self {
            WorkPlanStatus::NotReceived => t!("plan_status.not_received").to_string(),
            WorkPlanStatus::Received => t!("plan_status.received").to_string(),
            WorkPlanStatus::InProgress => t!("plan_status.in_progress").to_string(),
            WorkPlanStatus::Completed => t!("plan_status.completed").to_string(),
            WorkPlanStatus::Failed => t!("plan_status.failed").to_string(),
            WorkPlanStatus::Suspended => t!("plan_status.suspended").to_string(),
            WorkPlanStatus::Other(code) => code.clone(),
        }
    }

    /// Plans can only be deleted once they are no longer live on the robot.
    pub fn is_deletable(&self) -> bool {
        matches!(
            self,
            WorkPlanStatus::Completed | WorkPlanStatus::NotReceived | WorkPlanStatus::Failed
        )
    }
}

impl fmt::Display for WorkPlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A scheduled measurement campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkPlan {
    pub id: i64,
    pub description: String,
    pub status: WorkPlanStatus,
    pub temp_threshold: f64,
    pub hum_threshold: f64,
    pub violation_count: i64,
    pub created_at: String,
}

/// One measurement location inside a work plan.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkPlanItem {
    pub id: i64,
    pub rfid_tag_id: i64,
    pub measurement_frequency: i64,
    pub uid: String,
    pub location_name: String,
}

/// Row of the work plan screen.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkPlanSummary {
    pub plan: WorkPlan,
    pub progress: String,
    pub items: Vec<WorkPlanItem>,
    pub updated_at: String,
}

/// Body for `POST /work-plans`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWorkPlan {
    pub description: String,
    pub items: Vec<NewPlanItem>,
    pub temp_threshold: f64,
    pub hum_threshold: f64,
    pub violation_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPlanItem {
    pub rfid_tag_id: i64,
    pub measurement_frequency: i64,
}

/// One reading collected for a location.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub measurement_number: i64,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub created_at: String,
}

impl Measurement {
    /// A reading counts once both values have been collected.
    pub fn is_complete(&self) -> bool {
        self.temperature.is_some() && self.humidity.is_some()
    }
}

/// A location inside a plan with the readings collected so far.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementItem {
    pub tag: RfidTag,
    pub measurement_frequency: i64,
    pub measurements: Vec<Measurement>,
}

impl MeasurementItem {
    pub fn avg_temperature(&self) -> Option<f64> {
        mean(self.measurements.iter().filter_map(|m| m.temperature))
    }

    pub fn avg_humidity(&self) -> Option<f64> {
        mean(self.measurements.iter().filter_map(|m| m.humidity))
    }

    pub fn max_temperature(&self) -> Option<f64> {
        self.measurements
            .iter()
            .filter_map(|m| m.temperature)
            .reduce(f64::max)
    }

    pub fn max_humidity(&self) -> Option<f64> {
        self.measurements
            .iter()
            .filter_map(|m| m.humidity)
            .reduce(f64::max)
    }
}

/// Mean of the values present; `None` when there are none.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Row of the collected-data screen.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementPlan {
    pub plan: WorkPlan,
    pub progress: String,
    pub items: Vec<MeasurementItem>,
}

impl MeasurementPlan {
    /// Readings the plan asks for: the sum of per-location frequencies.
    pub fn expected_measurements(&self) -> i64 {
        self.items.iter().map(|i| i.measurement_frequency).sum()
    }

    /// Readings with both temperature and humidity present.
    pub fn completed_measurements(&self) -> usize {
        self.items
            .iter()
            .map(|i| i.measurements.iter().filter(|m| m.is_complete()).count())
            .sum()
    }
}

/// Per-location progress carried by realtime work plan events.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveLocation {
    pub rfid_tag_id: i64,
    pub uid: String,
    pub location_name: String,
    pub measurement_frequency: i64,
    pub current_measurements: i64,
    pub latest_temperature: Option<f64>,
    pub latest_humidity: Option<f64>,
    pub latest_created_at: String,
}

/// The plan currently running on the robot, as last reported.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveWorkPlan {
    pub id: i64,
    pub description: String,
    pub status: WorkPlanStatus,
    pub progress: String,
    pub temp_threshold: f64,
    pub hum_threshold: f64,
    pub violation_count: i64,
    pub locations: Vec<LiveLocation>,
}

impl LiveWorkPlan {
    /// The location whose full reading (temperature and humidity) is newest.
    ///
    /// A missing timestamp sorts before any real one; ties keep the first.
    pub fn latest_reading(&self) -> Option<&LiveLocation> {
        self.locations
            .iter()
            .filter(|l| l.latest_temperature.is_some() && l.latest_humidity.is_some())
            .fold(None, |best: Option<&LiveLocation>, cur| match best {
                Some(b) if cur.latest_created_at <= b.latest_created_at => Some(b),
                _ => Some(cur),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> WorkPlan {
        WorkPlan {
            id: 1,
            description: "Greenhouse".into(),
            status: WorkPlanStatus::InProgress,
            temp_threshold: 3.0,
            hum_threshold: 8.0,
            violation_count: 2,
            created_at: String::new(),
        }
    }

    fn reading(n: i64, t: Option<f64>, h: Option<f64>) -> Measurement {
        Measurement {
            measurement_number: n,
            temperature: t,
            humidity: h,
            created_at: String::new(),
        }
    }

    #[test]
    fn status_parse_roundtrip() {
        for code in [
            "NOT_RECEIVED",
            "RECEIVED",
            "IN_PROGRESS",
            "COMPLETED",
            "FAILED",
            "SUSPENDED",
            "UNKNOWN",
        ] {
            assert_eq!(WorkPlanStatus::parse(code).code(), code);
        }
    }

    #[test]
    fn only_finished_plans_are_deletable() {
        assert!(WorkPlanStatus::Completed.is_deletable());
        assert!(WorkPlanStatus::NotReceived.is_deletable());
        assert!(WorkPlanStatus::Failed.is_deletable());
        assert!(!WorkPlanStatus::InProgress.is_deletable());
        assert!(!WorkPlanStatus::Received.is_deletable());
        assert!(!WorkPlanStatus::Other("UNKNOWN".into()).is_deletable());
    }

    #[test]
    fn measurement_totals() {
        let tag = RfidTag::placeholder(7);
        let mp = MeasurementPlan {
            plan: plan(),
            progress: "50".into(),
            items: vec![
                MeasurementItem {
                    tag: tag.clone(),
                    measurement_frequency: 3,
                    measurements: vec![
                        reading(1, Some(25.0), Some(60.0)),
                        reading(2, Some(25.5), None),
                    ],
                },
                MeasurementItem {
                    tag,
                    measurement_frequency: 2,
                    measurements: vec![reading(1, Some(20.0), Some(70.0))],
                },
            ],
        };
        assert_eq!(mp.expected_measurements(), 5);
        assert_eq!(mp.completed_measurements(), 2);
    }

    #[test]
    fn location_statistics_skip_missing_values() {
        let item = MeasurementItem {
            tag: RfidTag::placeholder(3),
            measurement_frequency: 4,
            measurements: vec![
                reading(1, Some(24.0), Some(60.0)),
                reading(2, Some(27.0), None),
                reading(3, None, Some(70.0)),
                reading(4, Some(21.0), Some(65.0)),
            ],
        };
        assert_eq!(item.avg_temperature(), Some(24.0));
        assert_eq!(item.avg_humidity(), Some(65.0));
        assert_eq!(item.max_temperature(), Some(27.0));
        assert_eq!(item.max_humidity(), Some(70.0));
    }

    #[test]
    fn location_statistics_without_readings_are_absent() {
        let mut item = MeasurementItem {
            tag: RfidTag::placeholder(3),
            measurement_frequency: 2,
            measurements: Vec::new(),
        };
        assert_eq!(item.avg_temperature(), None);
        assert_eq!(item.max_humidity(), None);

        item.measurements.push(reading(1, None, Some(55.5)));
        assert_eq!(item.avg_temperature(), None);
        assert_eq!(item.max_temperature(), None);
        assert_eq!(item.avg_humidity(), Some(55.5));
    }

    fn live(loc: &str, t: Option<f64>, h: Option<f64>, at: &str) -> LiveLocation {
        LiveLocation {
            rfid_tag_id: 1,
            uid: "U".into(),
            location_name: loc.into(),
            measurement_frequency: 3,
            current_measurements: 1,
            latest_temperature: t,
            latest_humidity: h,
            latest_created_at: at.into(),
        }
    }

    fn live_plan(locations: Vec<LiveLocation>) -> LiveWorkPlan {
        LiveWorkPlan {
            id: 1,
            description: String::new(),
            status: WorkPlanStatus::InProgress,
            progress: "10".into(),
            temp_threshold: 0.0,
            hum_threshold: 0.0,
            violation_count: 0,
            locations,
        }
    }

    #[test]
    fn latest_reading_picks_newest_complete_location() {
        let plan = live_plan(vec![
            live("A", Some(20.0), Some(50.0), "2024-05-01T10:00:00Z"),
            live("B", Some(21.0), None, "2024-05-01T13:00:00Z"),
            live("C", Some(22.0), Some(52.0), "2024-05-01T12:30:00Z"),
            live("D", Some(23.0), Some(53.0), ""),
        ]);
        assert_eq!(
            plan.latest_reading().map(|l| l.location_name.as_str()),
            Some("C")
        );
    }

    #[test]
    fn latest_reading_without_complete_data_is_none() {
        assert!(live_plan(vec![]).latest_reading().is_none());
        let plan = live_plan(vec![live("A", None, Some(40.0), "2024-01-01")]);
        assert!(plan.latest_reading().is_none());
    }
}
