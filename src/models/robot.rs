/// One entry of the command history.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandLog {
    pub id: i64,
    pub command: String,
    pub timestamp: String,
    pub created_at: String,
}

/// One obstacle the robot's distance sensors reported.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleLog {
    pub id: i64,
    pub center_distance: f64,
    pub left_distance: f64,
    pub right_distance: f64,
    pub suggestion: String,
    pub action_taken: String,
    pub created_at: String,
}

impl ObstacleLog {
    pub fn suggestion_label(&self) -> String {
        maneuver_label(&self.suggestion)
    }

    pub fn action_label(&self) -> String {
        maneuver_label(&self.action_taken)
    }
}

/// Display label for an avoidance maneuver code; unknown codes pass through.
pub fn maneuver_label(code: &str) -> String {
    match code {
        "TURN_RIGHT" => t!("maneuver.turn_right").to_string(),
        "TURN_LEFT" => t!("maneuver.turn_left").to_string(),
        "EMERGENCY_STOP" => t!("maneuver.emergency_stop").to_string(),
        "STOP" => t!("maneuver.stop").to_string(),
        "REVERSE" => t!("maneuver.reverse").to_string(),
        "SLOW_DOWN" => t!("maneuver.slow_down").to_string(),
        "AVOID_RIGHT" => t!("maneuver.avoid_right").to_string(),
        "AVOID_LEFT" => t!("maneuver.avoid_left").to_string(),
        other => other.to_string(),
    }
}

/// One robot status report.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotStatusEntry {
    pub id: i64,
    pub status: String,
    pub message: String,
    pub mode: String,
    pub timestamp: String,
    pub created_at: String,
}

impl RobotStatusEntry {
    pub fn is_running(&self) -> bool {
        self.status == "RUNNING"
    }

    pub fn status_label(&self) -> String {
        run_state_label(&self.status)
    }

    /// Mode uses the same code set as the status column.
    pub fn mode_label(&self) -> String {
        run_state_label(&self.mode)
    }
}

fn run_state_label(code: &str) -> String {
    match code {
        "RUNNING" => t!("robot_status.running").to_string(),
        "IDLE" => t!("robot_status.idle").to_string(),
        other => other.to_string(),
    }
}
