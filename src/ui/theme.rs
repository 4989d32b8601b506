use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::models::{AlertType, WorkPlanStatus};
use crate::notifications::ToastKind;

/// All available built-in theme names.
pub const BUILTIN_THEME_NAMES: &[&str] = &["default", "gruvbox", "nord", "dracula"];

/// Data-driven theme: every color in one struct.
/// Constructed from built-in presets or loaded from TOML files.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // ── Brand / Primary ──────────────────────────────────────
    pub accent: Color,
    pub accent_secondary: Color,
    pub bg_dark: Color,
    pub bg_panel: Color,

    // ── Text ─────────────────────────────────────────────────
    pub text_primary: Color,
    pub text_dim: Color,
    pub text_muted: Color,

    // ── Semantic ─────────────────────────────────────────────
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,

    // ── Readings ─────────────────────────────────────────────
    pub temperature: Color,
    pub humidity: Color,

    // ── Table selection ──────────────────────────────────────
    pub table_row_selected_bg: Color,

    // ── Borders ──────────────────────────────────────────────
    pub border: Color,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────

    pub fn default_dark() -> Self {
        Self {
            name: "default".to_string(),
            accent: Color::Rgb(99, 179, 237),
            accent_secondary: Color::Rgb(129, 230, 217),
            bg_dark: Color::Rgb(22, 22, 30),
            bg_panel: Color::Rgb(30, 30, 42),
            text_primary: Color::Rgb(220, 220, 235),
            text_dim: Color::Rgb(120, 120, 145),
            text_muted: Color::Rgb(80, 80, 100),
            success: Color::Rgb(72, 199, 142),
            warning: Color::Rgb(255, 193, 69),
            danger: Color::Rgb(255, 85, 85),
            info: Color::Rgb(99, 179, 237),
            temperature: Color::Rgb(255, 136, 0),
            humidity: Color::Rgb(88, 166, 255),
            table_row_selected_bg: Color::Rgb(40, 40, 60),
            border: Color::Rgb(55, 55, 75),
        }
    }

    /// Gruvbox dark palette.
    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            accent: Color::Rgb(215, 153, 33),            // yellow
            accent_secondary: Color::Rgb(142, 192, 124), // green
            bg_dark: Color::Rgb(40, 40, 40),             // bg0
            bg_panel: Color::Rgb(50, 48, 47),            // bg0_s
            text_primary: Color::Rgb(235, 219, 178),     // fg
            text_dim: Color::Rgb(168, 153, 132),         // fg4
            text_muted: Color::Rgb(102, 92, 84),         // bg4
            success: Color::Rgb(142, 192, 124),
            warning: Color::Rgb(250, 189, 47),
            danger: Color::Rgb(251, 73, 52),
            info: Color::Rgb(131, 165, 152),
            temperature: Color::Rgb(254, 128, 25), // orange
            humidity: Color::Rgb(131, 165, 152),
            table_row_selected_bg: Color::Rgb(60, 56, 54),
            border: Color::Rgb(80, 73, 69),
        }
    }

    /// Nord palette.
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            accent: Color::Rgb(136, 192, 208),           // nord8
            accent_secondary: Color::Rgb(143, 188, 187), // nord7
            bg_dark: Color::Rgb(46, 52, 64),             // nord0
            bg_panel: Color::Rgb(59, 66, 82),            // nord1
            text_primary: Color::Rgb(229, 233, 240),     // nord5
            text_dim: Color::Rgb(182, 191, 204),
            text_muted: Color::Rgb(107, 112, 127),
            success: Color::Rgb(163, 190, 140), // nord14
            warning: Color::Rgb(235, 203, 139), // nord13
            danger: Color::Rgb(191, 97, 106),   // nord11
            info: Color::Rgb(129, 161, 193),    // nord9
            temperature: Color::Rgb(208, 135, 112),
            humidity: Color::Rgb(94, 129, 172),
            table_row_selected_bg: Color::Rgb(67, 76, 94),
            border: Color::Rgb(76, 86, 106),
        }
    }

    /// Dracula palette.
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            accent: Color::Rgb(139, 233, 253),          // cyan
            accent_secondary: Color::Rgb(80, 250, 123), // green
            bg_dark: Color::Rgb(40, 42, 54),
            bg_panel: Color::Rgb(48, 51, 65),
            text_primary: Color::Rgb(248, 248, 242),
            text_dim: Color::Rgb(188, 188, 172),
            text_muted: Color::Rgb(98, 114, 164),
            success: Color::Rgb(80, 250, 123),
            warning: Color::Rgb(241, 250, 140),
            danger: Color::Rgb(255, 85, 85),
            info: Color::Rgb(139, 233, 253),
            temperature: Color::Rgb(255, 184, 108),
            humidity: Color::Rgb(189, 147, 249),
            table_row_selected_bg: Color::Rgb(68, 71, 90),
            border: Color::Rgb(98, 114, 164),
        }
    }

    /// Look up a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_dark()),
            "gruvbox" => Some(Self::gruvbox()),
            "nord" => Some(Self::nord()),
            "dracula" => Some(Self::dracula()),
            _ => None,
        }
    }

    /// Resolve a configured name: built-in first, then
    /// `~/.config/robodash/themes/<name>.toml`, then the default.
    pub fn resolve(name: &str) -> Self {
        Self::by_name(name)
            .or_else(|| {
                let path = crate::constants::config_dir()
                    .join("themes")
                    .join(format!("{name}.toml"));
                Self::from_toml_file(&path)
            })
            .unwrap_or_default()
    }

    /// Cycle to the next built-in theme.
    pub fn next_builtin(&self) -> Self {
        let idx = BUILTIN_THEME_NAMES
            .iter()
            .position(|&n| n == self.name)
            .unwrap_or(0);
        let next_idx = (idx + 1) % BUILTIN_THEME_NAMES.len();
        Self::by_name(BUILTIN_THEME_NAMES[next_idx]).unwrap_or_default()
    }

    /// Load a custom theme from a TOML file, falling back to default for missing fields.
    pub fn from_toml_file(path: &std::path::Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let file: ThemeFile = toml::from_str(&content).ok()?;
        Some(
            file.into_theme(
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("custom"),
            ),
        )
    }

    // ── Computed Styles ──────────────────────────────────────

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_active_style(&self) -> Style {
        Style::default()
            .fg(self.bg_dark)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn table_header_style(&self) -> Style {
        Style::default()
            .fg(self.accent_secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_row_normal(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn table_row_selected(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .bg(self.table_row_selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn alert_type_color(&self, kind: &AlertType) -> Color {
        match kind {
            AlertType::TempHigh => self.danger,
            AlertType::TempLow => self.info,
            AlertType::HumHigh => self.humidity,
            AlertType::HumLow => self.warning,
            AlertType::Other(_) => self.text_dim,
        }
    }

    pub fn plan_status_style(&self, status: &WorkPlanStatus) -> Style {
        let color = match status {
            WorkPlanStatus::Completed => self.success,
            WorkPlanStatus::InProgress => self.accent,
            WorkPlanStatus::Received => self.info,
            WorkPlanStatus::Failed => self.danger,
            WorkPlanStatus::Suspended => self.warning,
            WorkPlanStatus::NotReceived | WorkPlanStatus::Other(_) => self.text_dim,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn toast_color(&self, kind: ToastKind) -> Color {
        match kind {
            ToastKind::Success => self.success,
            ToastKind::Info => self.info,
            ToastKind::Warning => self.warning,
            ToastKind::Error => self.danger,
        }
    }

    /// Progress bar color: red until a third, amber until two thirds.
    pub fn progress_color(&self, percent: f64) -> Color {
        if percent >= 66.0 {
            self.success
        } else if percent >= 33.0 {
            self.warning
        } else {
            self.danger
        }
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_highlight_style(&self) -> Style {
        Style::default().fg(self.accent)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

// ── TOML deserialization for custom themes ──────────────────

/// All fields are optional; missing ones inherit from the default theme.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ThemeFile {
    accent: Option<String>,
    accent_secondary: Option<String>,
    bg_dark: Option<String>,
    bg_panel: Option<String>,
    text_primary: Option<String>,
    text_dim: Option<String>,
    text_muted: Option<String>,
    success: Option<String>,
    warning: Option<String>,
    danger: Option<String>,
    info: Option<String>,
    temperature: Option<String>,
    humidity: Option<String>,
    table_row_selected_bg: Option<String>,
    border: Option<String>,
}

impl ThemeFile {
    fn into_theme(self, name: &str) -> Theme {
        let base = Theme::default_dark();
        Theme {
            name: name.to_string(),
            accent: parse_color(&self.accent).unwrap_or(base.accent),
            accent_secondary: parse_color(&self.accent_secondary).unwrap_or(base.accent_secondary),
            bg_dark: parse_color(&self.bg_dark).unwrap_or(base.bg_dark),
            bg_panel: parse_color(&self.bg_panel).unwrap_or(base.bg_panel),
            text_primary: parse_color(&self.text_primary).unwrap_or(base.text_primary),
            text_dim: parse_color(&self.text_dim).unwrap_or(base.text_dim),
            text_muted: parse_color(&self.text_muted).unwrap_or(base.text_muted),
            success: parse_color(&self.success).unwrap_or(base.success),
            warning: parse_color(&self.warning).unwrap_or(base.warning),
            danger: parse_color(&self.danger).unwrap_or(base.danger),
            info: parse_color(&self.info).unwrap_or(base.info),
            temperature: parse_color(&self.temperature).unwrap_or(base.temperature),
            humidity: parse_color(&self.humidity).unwrap_or(base.humidity),
            table_row_selected_bg: parse_color(&self.table_row_selected_bg)
                .unwrap_or(base.table_row_selected_bg),
            border: parse_color(&self.border).unwrap_or(base.border),
        }
    }
}

/// Parse a hex color string like "#FF8800" or "FF8800" into a ratatui Color.
fn parse_color(opt: &Option<String>) -> Option<Color> {
    let s = opt.as_ref()?;
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_color_variants() {
        assert_eq!(parse_color(&Some("#FF8800".into())), Some(Color::Rgb(255, 136, 0)));
        assert_eq!(parse_color(&Some("00ff7f".into())), Some(Color::Rgb(0, 255, 127)));
        assert_eq!(parse_color(&None), None);
        assert_eq!(parse_color(&Some("#FFF".into())), None);
        assert_eq!(parse_color(&Some("#GG0000".into())), None);
    }

    #[test]
    fn by_name_all_builtins() {
        for name in BUILTIN_THEME_NAMES {
            let theme = Theme::by_name(name).unwrap();
            assert_eq!(theme.name, *name);
        }
        assert_eq!(Theme::by_name("NoRd").unwrap().name, "nord");
        assert!(Theme::by_name("neon").is_none());
    }

    #[test]
    fn next_builtin_wraps_around() {
        let mut theme = Theme::default();
        let mut seen = Vec::new();
        for _ in 0..BUILTIN_THEME_NAMES.len() {
            seen.push(theme.name.clone());
            theme = theme.next_builtin();
        }
        assert_eq!(seen, BUILTIN_THEME_NAMES);
        assert_eq!(theme.name, "default");
    }

    #[test]
    fn custom_theme_inherits_missing_colors() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "accent = \"#112233\"").unwrap();
        let theme = Theme::from_toml_file(file.path()).unwrap();
        assert_eq!(theme.accent, Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(theme.danger, Theme::default_dark().danger);
    }

    #[test]
    fn resolve_unknown_name_falls_back_to_default() {
        assert_eq!(Theme::resolve("does-not-exist-anywhere").name, "default");
    }

    #[test]
    fn progress_color_bands() {
        let t = Theme::default();
        assert_eq!(t.progress_color(0.0), t.danger);
        assert_eq!(t.progress_color(50.0), t.warning);
        assert_eq!(t.progress_color(100.0), t.success);
    }
}
