//! Shared utility functions used across modules.

use chrono::{DateTime, Local, NaiveDateTime};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::constants::{MISSING_FIELD, SPINNER_CHARS};

const DISPLAY_FORMAT: &str = "%H:%M:%S %d/%m/%Y";

/// Truncate a string to `max_width` terminal columns, appending "..." if
/// truncated. Wide characters count as two columns.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let (budget, ellipsis) = if max_width > 3 {
        (max_width - 3, "...")
    } else {
        (max_width, "")
    };
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ellipsis);
    out
}

/// Get the spinner character for the current tick.
pub fn spinner_char(tick: u64) -> &'static str {
    SPINNER_CHARS[(tick % SPINNER_CHARS.len() as u64) as usize]
}

/// Backend timestamp → `HH:MM:SS DD/MM/YYYY` in local time.
///
/// Offset-less timestamps are shown as-is; anything unparsable is returned
/// verbatim and an empty value renders as a dash.
pub fn format_datetime(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return MISSING_FIELD.to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(DISPLAY_FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(DISPLAY_FORMAT).to_string();
        }
    }
    raw.to_string()
}

/// Numbers as the tables show them: integral values without decimals,
/// everything else with at most two.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── truncate_str ──────────────────────────────────────────────

    #[test]
    fn truncate_str_short_string_unchanged() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn truncate_str_needs_truncation() {
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("abcdef", 4), "a...");
    }

    #[test]
    fn truncate_str_tiny_width_hard_cuts() {
        assert_eq!(truncate_str("abcdef", 3), "abc");
        assert_eq!(truncate_str("abcdef", 0), "");
    }

    #[test]
    fn truncate_str_counts_columns_not_bytes() {
        assert_eq!(truncate_str("Kế hoạch đo", 20), "Kế hoạch đo");
        assert_eq!(truncate_str("Nhiệt độ cao", 8), "Nhiệt...");
        // each CJK char is two columns
        assert_eq!(truncate_str("日本語テキスト", 7), "日本...");
    }

    // ── spinner_char ──────────────────────────────────────────────

    #[test]
    fn spinner_char_cycles() {
        assert_eq!(spinner_char(0), "◐");
        assert_eq!(spinner_char(3), "◒");
        assert_eq!(spinner_char(4), "◐");
    }

    // ── format_datetime ───────────────────────────────────────────

    #[test]
    fn format_datetime_converts_rfc3339_to_local() {
        let raw = "2024-05-01T10:20:30.000Z";
        let expected = DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Local)
            .format("%H:%M:%S %d/%m/%Y")
            .to_string();
        assert_eq!(format_datetime(raw), expected);
    }

    #[test]
    fn format_datetime_keeps_naive_times() {
        assert_eq!(format_datetime("2024-05-01 08:05:09"), "08:05:09 01/05/2024");
        assert_eq!(format_datetime("2024-05-01T08:05:09.123"), "08:05:09 01/05/2024");
    }

    #[test]
    fn format_datetime_fallbacks() {
        assert_eq!(format_datetime(""), "-");
        assert_eq!(format_datetime("yesterday"), "yesterday");
    }

    #[test]
    fn format_number_trims() {
        assert_eq!(format_number(25.0), "25");
        assert_eq!(format_number(25.5), "25.5");
        assert_eq!(format_number(25.456), "25.46");
        assert_eq!(format_number(-3.1), "-3.1");
    }
}
