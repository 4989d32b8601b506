use serde_json::Value;

use crate::models::{CommandLog, LiveWorkPlan, ObstacleLog, RobotStatusEntry};
use crate::normalize;
use crate::realtime::RealtimeEvent;

/// What the dashboard shows as "latest": the newest value seen for each
/// kind of realtime report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestSnapshot {
    pub connected: bool,
    pub last_command: Option<CommandLog>,
    pub work_plan: Option<LiveWorkPlan>,
    pub obstacle: Option<ObstacleLog>,
    pub robot_status: Option<RobotStatusEntry>,
}

impl LatestSnapshot {
    pub fn apply(&mut self, event: &RealtimeEvent) {
        let (name, payload) = match event {
            RealtimeEvent::Connected => {
                self.connected = true;
                return;
            }
            RealtimeEvent::Disconnected => {
                self.connected = false;
                return;
            }
            RealtimeEvent::Message { name, payload } => (name.as_str(), payload),
        };

        match name {
            "work_plan_status" => {
                if let Some(plan) = normalize::live_work_plan(&payload["data"]) {
                    self.work_plan = Some(plan);
                }
            }
            "work_plan_progress" => self.apply_progress(&payload["data"]),
            "status" => {
                if let Some(status) = normalize::robot_status(payload) {
                    self.robot_status = Some(status);
                }
            }
            "command_sended" => {
                if let Some(cmd) = normalize::command_log(payload) {
                    self.last_command = Some(cmd);
                }
            }
            "obstacle" => {
                if let Some(obstacle) = normalize::obstacle_log(payload) {
                    self.obstacle = Some(obstacle);
                }
            }
            _ => {}
        }
    }

    /// Result of the periodic `GET /commands/latest` poll.
    pub fn set_last_command(&mut self, cmd: Option<CommandLog>) {
        if cmd.is_some() {
            self.last_command = cmd;
        }
    }

    /// Progress reports may omit the plan id and items; those fold into
    /// the plan already shown instead of replacing it.
    fn apply_progress(&mut self, data: &Value) {
        let Some(update) = normalize::live_work_plan(data) else {
            return;
        };
        match self.work_plan.as_mut() {
            Some(current) if update.id == 0 || update.id == current.id => {
                if data.get("description").is_some() {
                    current.description = update.description;
                }
                if data.get("progress").is_some() {
                    current.progress = update.progress;
                }
                if data.get("violation_count").is_some() {
                    current.violation_count = update.violation_count;
                }
                if data.get("status").is_some() {
                    current.status = update.status;
                }
                if !update.locations.is_empty() {
                    current.locations = update.locations;
                }
            }
            _ => self.work_plan = Some(update),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(name: &str, payload: Value) -> RealtimeEvent {
        RealtimeEvent::Message {
            name: name.into(),
            payload,
        }
    }

    #[test]
    fn connection_flag_follows_lifecycle() {
        let mut snap = LatestSnapshot::default();
        snap.apply(&RealtimeEvent::Connected);
        assert!(snap.connected);
        snap.apply(&RealtimeEvent::Disconnected);
        assert!(!snap.connected);
    }

    #[test]
    fn command_event_overrides_polled_value() {
        let mut snap = LatestSnapshot::default();
        snap.set_last_command(Some(CommandLog {
            id: 3,
            command: "STOP".into(),
            timestamp: String::new(),
            created_at: String::new(),
        }));
        snap.apply(&message(
            "command_sended",
            json!({"command": "FORWARD", "timestamp": "2024-05-01T10:00:00Z"}),
        ));
        let last = snap.last_command.as_ref().unwrap();
        assert_eq!(last.command, "FORWARD");
        assert_eq!(last.timestamp, "2024-05-01T10:00:00Z");

        // an empty poll result keeps what we have
        snap.set_last_command(None);
        assert!(snap.last_command.is_some());
    }

    #[test]
    fn status_event_replaces_plan() {
        let mut snap = LatestSnapshot::default();
        snap.apply(&message(
            "work_plan_status",
            json!({"data": {
                "id": 9,
                "description": "Greenhouse",
                "status": "IN_PROGRESS",
                "progress": 20,
                "items": [{
                    "rfid_tag_id": 4,
                    "uid": "A1",
                    "location_name": "Zone A",
                    "measurement_frequency": 3,
                    "current_measurements": 1,
                    "latest_temperature": 25.1,
                    "latest_humidity": 60.2,
                    "latest_created_at": "2024-05-01T10:00:00Z"
                }]
            }}),
        ));
        let plan = snap.work_plan.as_ref().unwrap();
        assert_eq!(plan.id, 9);
        assert_eq!(plan.progress, "20");
        assert_eq!(
            plan.latest_reading().map(|l| l.location_name.as_str()),
            Some("Zone A")
        );
    }

    #[test]
    fn progress_without_id_updates_current_plan() {
        let mut snap = LatestSnapshot::default();
        snap.apply(&message(
            "work_plan_status",
            json!({"data": {"id": 9, "description": "Greenhouse", "status": "IN_PROGRESS",
                "items": [{"rfid_tag_id": 4, "uid": "A1"}]}}),
        ));
        snap.apply(&message(
            "work_plan_progress",
            json!({"data": {"progress": "60", "violation_count": 2}}),
        ));
        let plan = snap.work_plan.as_ref().unwrap();
        assert_eq!(plan.id, 9);
        assert_eq!(plan.description, "Greenhouse");
        assert_eq!(plan.progress, "60");
        assert_eq!(plan.violation_count, 2);
        assert_eq!(plan.locations.len(), 1);
    }

    #[test]
    fn obstacle_and_status_are_kept() {
        let mut snap = LatestSnapshot::default();
        snap.apply(&message(
            "obstacle",
            json!({"center_distance": 12, "left_distance": 30, "right_distance": 8, "suggestion": "TURN_LEFT"}),
        ));
        snap.apply(&message(
            "status",
            json!({"status": "RUNNING", "mode": "AUTO", "message": "ok"}),
        ));
        assert_eq!(snap.obstacle.as_ref().unwrap().suggestion, "TURN_LEFT");
        assert_eq!(snap.robot_status.as_ref().unwrap().status, "RUNNING");
    }

    #[test]
    fn malformed_payloads_change_nothing() {
        let mut snap = LatestSnapshot::default();
        snap.apply(&message("obstacle", json!("nope")));
        snap.apply(&message("work_plan_status", json!({})));
        assert_eq!(snap, LatestSnapshot::default());
    }
}
