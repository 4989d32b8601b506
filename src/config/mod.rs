use std::path::Path;

use serde::Deserialize;

use crate::constants::*;

/// Application configuration with sensible defaults.
///
/// Can be overridden via ~/.config/robodash/config.toml, then by the
/// `ROBODASH_API_URL` / `ROBODASH_REALTIME_URL` environment variables,
/// then by CLI flags.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend REST base URL (no trailing slash)
    pub api_base_url: String,
    /// Items requested per page on every list screen
    pub page_size: u32,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Latest-command polling interval for the dashboard (0 = disabled)
    pub latest_command_poll_secs: u64,
    /// Theme name (built-in)
    pub theme: String,
    /// UI language (en, vi)
    pub lang: String,
    /// Realtime event channel configuration
    pub realtime: RealtimeConfig,
    /// Toast stack configuration
    pub toast: ToastConfig,
    /// Press-and-hold timing when the terminal reports no key releases
    pub hold: HoldConfig,
}

/// Realtime (Socket.IO) connection settings.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Whether the listener is started at all.
    pub enabled: bool,
    /// Server URL (http/https, rewritten to ws/wss).
    pub url: String,
    /// Reconnection attempts after a dropped or failed connection.
    pub reconnect_attempts: u32,
    /// Fixed delay between reconnection attempts (ms).
    pub reconnect_delay_ms: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_REALTIME_URL.to_string(),
            reconnect_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToastConfig {
    /// Maximum toasts visible at once; older ones are dropped.
    pub max_visible: usize,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            max_visible: DEFAULT_MAX_TOASTS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HoldConfig {
    /// Wait for the first key repeat (ms).
    pub initial_grace_ms: u64,
    /// Longest gap between key repeats (ms).
    pub repeat_timeout_ms: u64,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            initial_grace_ms: DEFAULT_HOLD_INITIAL_GRACE_MS,
            repeat_timeout_ms: DEFAULT_HOLD_REPEAT_TIMEOUT_MS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            latest_command_poll_secs: DEFAULT_LATEST_COMMAND_POLL_SECS,
            theme: "default".to_string(),
            lang: "en".to_string(),
            realtime: RealtimeConfig::default(),
            toast: ToastConfig::default(),
            hold: HoldConfig::default(),
        }
    }
}

/// TOML-deserializable config file format.
/// All fields are optional; missing fields use defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    api_base_url: Option<String>,
    page_size: Option<u32>,
    request_timeout_secs: Option<u64>,
    latest_command_poll_secs: Option<u64>,
    theme: Option<String>,
    lang: Option<String>,
    realtime: Option<FileRealtimeConfig>,
    toast: Option<FileToastConfig>,
    hold: Option<FileHoldConfig>,
}

/// TOML-deserializable realtime config section.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileRealtimeConfig {
    enabled: Option<bool>,
    url: Option<String>,
    reconnect_attempts: Option<u32>,
    reconnect_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileToastConfig {
    max_visible: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileHoldConfig {
    initial_grace_ms: Option<u64>,
    repeat_timeout_ms: Option<u64>,
}

impl Config {
    /// Load config from ~/.config/robodash/config.toml, falling back to defaults
    /// for any missing fields, then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_from(&config_file_path());
        config.apply_env();
        config
    }

    /// Load config from an explicit path. If the file doesn't exist or fails
    /// to parse, returns pure defaults.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Config::default();

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return config, // No config file, use defaults
        };

        let file_config: FileConfig = match toml::from_str(&content) {
            Ok(fc) => fc,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                return config;
            }
        };

        config.merge(file_config);
        config
    }

    /// Merge file values over defaults.
    fn merge(&mut self, file_config: FileConfig) {
        if let Some(v) = file_config.api_base_url {
            if !v.trim().is_empty() {
                self.api_base_url = normalize_base_url(&v);
            }
        }
        if let Some(v) = file_config.page_size {
            self.page_size = v.clamp(1, MAX_PAGE_SIZE);
        }
        if let Some(v) = file_config.request_timeout_secs {
            self.request_timeout_secs = v.max(1);
        }
        if let Some(v) = file_config.latest_command_poll_secs {
            self.latest_command_poll_secs = v; // 0 = disabled
        }
        if let Some(v) = file_config.theme {
            if !v.is_empty() {
                self.theme = v;
            }
        }
        if let Some(v) = file_config.lang {
            if !v.is_empty() {
                self.lang = v;
            }
        }

        if let Some(r) = file_config.realtime {
            if let Some(v) = r.enabled {
                self.realtime.enabled = v;
            }
            if let Some(v) = r.url {
                if !v.trim().is_empty() {
                    self.realtime.url = normalize_base_url(&v);
                }
            }
            if let Some(v) = r.reconnect_attempts {
                self.realtime.reconnect_attempts = v.min(100);
            }
            if let Some(v) = r.reconnect_delay_ms {
                self.realtime.reconnect_delay_ms = v.clamp(100, 60_000);
            }
        }

        if let Some(t) = file_config.toast {
            if let Some(v) = t.max_visible {
                self.toast.max_visible = v.clamp(1, 10);
            }
        }

        if let Some(h) = file_config.hold {
            if let Some(v) = h.initial_grace_ms {
                self.hold.initial_grace_ms = v.clamp(200, 5000);
            }
            if let Some(v) = h.repeat_timeout_ms {
                self.hold.repeat_timeout_ms = v.clamp(50, 2000);
            }
            // never wait less for the first repeat than for later ones
            self.hold.repeat_timeout_ms = self
                .hold
                .repeat_timeout_ms
                .min(self.hold.initial_grace_ms);
        }
    }

    /// Apply `ROBODASH_API_URL` and `ROBODASH_REALTIME_URL` if set.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("ROBODASH_API_URL") {
            if !v.trim().is_empty() {
                self.api_base_url = normalize_base_url(&v);
            }
        }
        if let Ok(v) = std::env::var("ROBODASH_REALTIME_URL") {
            if !v.trim().is_empty() {
                self.realtime.url = normalize_base_url(&v);
            }
        }
    }
}

/// Trim whitespace and trailing slashes so paths can be appended directly.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/robodash/config.toml"));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.realtime.enabled);
        assert_eq!(config.realtime.reconnect_attempts, DEFAULT_RECONNECT_ATTEMPTS);
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
            api_base_url = "http://robot.local:8080/api/"
            page_size = 30
            lang = "vi"

            [realtime]
            url = "http://robot.local:3003"
            reconnect_attempts = 2
            "#,
        );
        let config = Config::load_from(file.path());
        assert_eq!(config.api_base_url, "http://robot.local:8080/api");
        assert_eq!(config.page_size, 30);
        assert_eq!(config.lang, "vi");
        assert_eq!(config.realtime.url, "http://robot.local:3003");
        assert_eq!(config.realtime.reconnect_attempts, 2);
        // untouched keys keep defaults
        assert_eq!(config.realtime.reconnect_delay_ms, DEFAULT_RECONNECT_DELAY_MS);
        assert_eq!(config.theme, "default");
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let file = write_config(
            r#"
            page_size = 0
            request_timeout_secs = 0

            [realtime]
            reconnect_delay_ms = 5

            [toast]
            max_visible = 50
            "#,
        );
        let config = Config::load_from(file.path());
        assert_eq!(config.page_size, 1);
        assert_eq!(config.request_timeout_secs, 1);
        assert_eq!(config.realtime.reconnect_delay_ms, 100);
        assert_eq!(config.toast.max_visible, 10);
    }

    #[test]
    fn hold_timing_is_configurable() {
        let file = write_config("[hold]\ninitial_grace_ms = 1200\nrepeat_timeout_ms = 250\n");
        let config = Config::load_from(file.path());
        assert_eq!(config.hold.initial_grace_ms, 1200);
        assert_eq!(config.hold.repeat_timeout_ms, 250);

        let file = write_config("[hold]\ninitial_grace_ms = 300\nrepeat_timeout_ms = 900\n");
        let config = Config::load_from(file.path());
        assert_eq!(config.hold.initial_grace_ms, 300);
        assert_eq!(config.hold.repeat_timeout_ms, 300);

        let config = Config::load_from(Path::new("/nonexistent/robodash/config.toml"));
        assert_eq!(config.hold.initial_grace_ms, DEFAULT_HOLD_INITIAL_GRACE_MS);
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let file = write_config("page_size = \"many\"\n[[[");
        let config = Config::load_from(file.path());
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn empty_strings_are_ignored() {
        let file = write_config("api_base_url = \"  \"\ntheme = \"\"");
        let config = Config::load_from(file.path());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.theme, "default");
    }

    #[test]
    fn normalize_base_url_strips_trailing_slashes() {
        assert_eq!(normalize_base_url(" http://a:1/// "), "http://a:1");
        assert_eq!(normalize_base_url("http://a:1"), "http://a:1");
    }
}
