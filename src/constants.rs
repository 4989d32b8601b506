//! Application-wide constants.
//!
//! Centralizes endpoint paths, timing, capacities and configuration
//! defaults so the rest of the codebase never carries magic numbers.

use std::path::PathBuf;

// ── Backend ───────────────────────────────────────────────────────
/// Default backend REST base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
/// Default realtime (Socket.IO) server URL.
pub const DEFAULT_REALTIME_URL: &str = "http://localhost:3003";
/// Default page size for every paginated list.
pub const DEFAULT_PAGE_SIZE: u32 = 15;
/// Upper bound for a configured page size.
pub const MAX_PAGE_SIZE: u32 = 200;
/// Default HTTP request timeout (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// HTTP connect timeout (seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 3;

// ── Endpoint paths ────────────────────────────────────────────────
pub const ALERT_LOGS_PATH: &str = "/alert-logs";
pub const COMMANDS_PATH: &str = "/commands";
pub const LATEST_COMMAND_PATH: &str = "/commands/latest";
pub const SEND_COMMAND_PATH: &str = "/commands/send";
pub const RFID_TAGS_PATH: &str = "/rfid-tags";
pub const OBSTACLE_LOGS_PATH: &str = "/obstacle-logs";
pub const ROBOT_STATUS_PATH: &str = "/robot-status";
pub const WORK_PLANS_PATH: &str = "/work-plans";
pub const MEASUREMENTS_PATH: &str = "/work-plans/measurements";

// ── Timing ────────────────────────────────────────────────────────
/// Event poll timeout (ms) -- how often the UI checks for input.
pub const EVENT_POLL_MS: u64 = 50;
/// Default interval for polling the latest command (seconds).
pub const DEFAULT_LATEST_COMMAND_POLL_SECS: u64 = 3;
/// Status message display duration (seconds).
pub const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
/// Command banner display duration after success (ms).
pub const COMMAND_BANNER_OK_MS: u64 = 2000;
/// Command banner display duration after failure (ms).
pub const COMMAND_BANNER_ERR_MS: u64 = 3000;
/// Without key-up events, a fresh hold survives this long waiting for the
/// first key repeat (terminal repeat delays run 250-660 ms).
pub const DEFAULT_HOLD_INITIAL_GRACE_MS: u64 = 1000;
/// Once repeats arrive, a gap this long between them counts as released.
pub const DEFAULT_HOLD_REPEAT_TIMEOUT_MS: u64 = 300;

// ── Realtime ──────────────────────────────────────────────────────
/// Default number of reconnection attempts after a dropped connection.
pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 5;
/// Default delay between reconnection attempts (ms).
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 1000;
/// Socket.IO handshake path.
pub const SOCKET_IO_PATH: &str = "/socket.io/";
/// Capacity of the realtime event channel.
pub const REALTIME_CHANNEL_CAPACITY: usize = 256;

// ── Toasts ────────────────────────────────────────────────────────
/// Maximum toasts stacked on screen at once.
pub const DEFAULT_MAX_TOASTS: usize = 4;
/// Toast width in columns.
pub const TOAST_WIDTH: u16 = 46;
pub const TOAST_TTL_SHORT_MS: u64 = 3000;
pub const TOAST_TTL_MEDIUM_MS: u64 = 4000;
pub const TOAST_TTL_LONG_MS: u64 = 5000;
pub const TOAST_TTL_ALERT_MS: u64 = 7000;

// ── UI Layout ─────────────────────────────────────────────────────
/// Page up/down step size for scrollable views.
pub const PAGE_SIZE: usize = 10;
/// Help overlay width.
pub const HELP_POPUP_WIDTH: u16 = 62;
/// Help overlay height.
pub const HELP_POPUP_HEIGHT: u16 = 30;
/// Form popup width.
pub const FORM_POPUP_WIDTH: u16 = 64;
/// Confirm/message popup width.
pub const DIALOG_POPUP_WIDTH: u16 = 52;

// ── Placeholders ──────────────────────────────────────────────────
/// Placeholder for missing codes (status, type, uid).
pub const UNKNOWN: &str = "UNKNOWN";
/// Placeholder for missing free-form fields in realtime payloads.
pub const MISSING_FIELD: &str = "-";

// ── Spinner Animation ─────────────────────────────────────────────
/// Spinner character sequence for loading indicators.
pub const SPINNER_CHARS: &[&str] = &["◐", "◓", "◑", "◒"];

// ── Supported Languages ───────────────────────────────────────────
/// Available UI languages for cycling.
pub const LANGUAGES: &[&str] = &["en", "vi"];

// ── Paths ─────────────────────────────────────────────────────────

/// Returns the user's home directory, falling back to /tmp.
pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

/// Returns `~/.config/robodash/`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("robodash")
}

/// Returns `~/.config/robodash/config.toml`.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns `~/.config/robodash/.env`.
pub fn env_file_path() -> PathBuf {
    config_dir().join(".env")
}

/// Returns `~/.local/state/robodash/`.
pub fn state_dir() -> PathBuf {
    home_dir().join(".local").join("state").join("robodash")
}

/// Returns `~/.local/state/robodash/robodash.log`.
pub fn log_file_path() -> PathBuf {
    state_dir().join("robodash.log")
}
