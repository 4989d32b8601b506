//! REST access to the robot backend.

mod client;

pub use client::ApiClient;

use crate::constants::*;

/// Errors from a single backend request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection refused, timeout, TLS and other transport failures.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("undecodable response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The paginated list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    AlertLogs,
    Commands,
    RfidTags,
    ObstacleLogs,
    RobotStatus,
    WorkPlans,
    Measurements,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::AlertLogs => ALERT_LOGS_PATH,
            Resource::Commands => COMMANDS_PATH,
            Resource::RfidTags => RFID_TAGS_PATH,
            Resource::ObstacleLogs => OBSTACLE_LOGS_PATH,
            Resource::RobotStatus => ROBOT_STATUS_PATH,
            Resource::WorkPlans => WORK_PLANS_PATH,
            Resource::Measurements => MEASUREMENTS_PATH,
        }
    }
}
