//! Toast notifications raised by realtime events.
//!
//! Every subscribed event maps to one toast with a fixed kind and
//! lifetime. Payloads are shown as they arrive: a missing field renders as
//! a dash, never as an error.

mod snapshot;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::constants::*;
use crate::models::{maneuver_label, AlertType, WorkPlanStatus};
use crate::realtime::RealtimeEvent;

pub use snapshot::LatestSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

/// One stacked notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    /// `label: value` lines under the title.
    pub lines: Vec<String>,
    pub ttl: Duration,
}

impl Toast {
    fn new(kind: ToastKind, title: impl Into<String>, ttl_ms: u64) -> Self {
        Self {
            kind,
            title: title.into(),
            lines: Vec::new(),
            ttl: Duration::from_millis(ttl_ms),
        }
    }

    fn line(mut self, label: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.lines
            .push(format!("{}: {}", label.as_ref(), value.as_ref()));
        self
    }

    fn text(mut self, value: impl Into<String>) -> Self {
        self.lines.push(value.into());
        self
    }
}

/// Toasts currently on screen, newest last.
#[derive(Debug)]
pub struct ToastQueue {
    toasts: VecDeque<(Toast, Instant)>,
    max_visible: usize,
}

impl ToastQueue {
    pub fn new(max_visible: usize) -> Self {
        Self {
            toasts: VecDeque::new(),
            max_visible: max_visible.max(1),
        }
    }

    /// Add a toast; the oldest is dropped when the stack is full.
    pub fn push(&mut self, toast: Toast, now: Instant) {
        self.toasts.push_back((toast, now));
        while self.toasts.len() > self.max_visible {
            self.toasts.pop_front();
        }
    }

    /// Drop toasts whose lifetime has passed.
    pub fn prune(&mut self, now: Instant) {
        self.toasts
            .retain(|(toast, shown)| now.saturating_duration_since(*shown) < toast.ttl);
    }

    /// Dismiss the newest toast.
    pub fn dismiss_latest(&mut self) {
        self.toasts.pop_back();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().map(|(t, _)| t)
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Render a payload field for display; absent or null becomes a dash.
pub(crate) fn field(payload: &Value, key: &str) -> String {
    match payload.get(key) {
        None | Some(Value::Null) => MISSING_FIELD.to_string(),
        Some(Value::String(s)) if s.is_empty() => MISSING_FIELD.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn timestamp_field(payload: &Value, key: &str) -> String {
    match payload.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => crate::utils::format_datetime(s),
        _ => field(payload, key),
    }
}

/// Build the toast for a realtime event, or `None` for events without one.
pub fn toast_for(event: &RealtimeEvent) -> Option<Toast> {
    let (name, payload) = match event {
        RealtimeEvent::Connected => {
            return Some(Toast::new(
                ToastKind::Success,
                t!("toast.connected"),
                TOAST_TTL_SHORT_MS,
            ))
        }
        RealtimeEvent::Disconnected => {
            return Some(Toast::new(
                ToastKind::Warning,
                t!("toast.disconnected"),
                TOAST_TTL_SHORT_MS,
            ))
        }
        RealtimeEvent::Message { name, payload } => (name.as_str(), payload),
    };

    let toast = match name {
        "work_plan_status" => {
            let plan = &payload["data"];
            let status = match plan.get("status").and_then(Value::as_str) {
                Some(code) if !code.is_empty() => WorkPlanStatus::parse(code).label(),
                _ => field(plan, "status"),
            };
            Toast::new(ToastKind::Info, t!("toast.plan_status"), TOAST_TTL_LONG_MS)
                .line(t!("field.id"), field(plan, "id"))
                .line(t!("field.description"), field(plan, "description"))
                .line(t!("field.status"), status)
                .line(t!("field.progress"), format!("{}%", field(plan, "progress")))
        }
        "work_plan_progress" => {
            let plan = &payload["data"];
            Toast::new(
                ToastKind::Info,
                t!("toast.plan_progress"),
                TOAST_TTL_MEDIUM_MS,
            )
            .line(t!("field.plan"), field(plan, "description"))
            .line(t!("field.progress"), format!("{}%", field(plan, "progress")))
            .line(t!("field.violations"), field(plan, "violation_count"))
        }
        "alert" => {
            let title = match payload.get("alert_type").and_then(Value::as_str) {
                Some(code) if AlertType::KNOWN.contains(&AlertType::parse(code)) => {
                    AlertType::parse(code).label()
                }
                _ => t!("toast.alert").to_string(),
            };
            Toast::new(ToastKind::Error, title, TOAST_TTL_ALERT_MS)
                .line(t!("field.location"), field(payload, "location_name"))
                .line(t!("field.measured"), field(payload, "measured_value"))
                .line(t!("field.reference"), field(payload, "reference_value"))
                .line(t!("field.threshold"), format!("±{}", field(payload, "threshold")))
                .line(t!("field.measurement_no"), field(payload, "measurement_number"))
                .text(field(payload, "message"))
        }
        "status" => Toast::new(
            ToastKind::Info,
            t!("toast.robot_status"),
            TOAST_TTL_MEDIUM_MS,
        )
        .line(t!("field.status"), field(payload, "status"))
        .line(t!("field.mode"), field(payload, "mode"))
        .line(t!("field.command"), field(payload, "command_excuted"))
        .line(t!("field.message"), field(payload, "message")),
        "command_sended" => {
            let command = match payload.get("command").and_then(Value::as_str) {
                Some(code) => crate::commands::CommandType::parse(code)
                    .map(|c| c.label())
                    .unwrap_or_else(|| field(payload, "command")),
                None => field(payload, "command"),
            };
            Toast::new(
                ToastKind::Success,
                t!("toast.command_sent"),
                TOAST_TTL_SHORT_MS,
            )
            .line(t!("field.command"), command)
            .line(t!("field.time"), timestamp_field(payload, "timestamp"))
        }
        "obstacle" => {
            let suggestion = match payload.get("suggestion").and_then(Value::as_str) {
                Some(code) if !code.is_empty() => maneuver_label(code),
                _ => field(payload, "suggestion"),
            };
            Toast::new(ToastKind::Warning, t!("toast.obstacle"), TOAST_TTL_LONG_MS)
                .line(t!("field.center"), format!("{} cm", field(payload, "center_distance")))
                .line(t!("field.left"), format!("{} cm", field(payload, "left_distance")))
                .line(t!("field.right"), format!("{} cm", field(payload, "right_distance")))
                .line(t!("field.suggestion"), suggestion)
        }
        "robot.connected" => Toast::new(
            ToastKind::Success,
            t!("toast.robot_connected"),
            TOAST_TTL_LONG_MS,
        )
        .line(t!("field.robot_ip"), field(payload, "esp32_ip")),
        "manual_command_response" => {
            let response = &payload["responses"];
            let ok = response.get("status").and_then(Value::as_str) == Some("SUCCESS");
            let title = if payload.get("type").and_then(Value::as_str) == Some("MANUAL_MOVE") {
                t!("toast.manual_move")
            } else {
                t!("toast.manual_command")
            };
            let kind = if ok { ToastKind::Success } else { ToastKind::Error };
            Toast::new(kind, title, TOAST_TTL_LONG_MS)
                .line(t!("field.command"), field(response, "command"))
                .line(t!("field.status"), field(response, "status"))
                .line(t!("field.message"), field(response, "message"))
                .line(t!("field.time"), timestamp_field(response, "timestamp"))
        }
        other => {
            tracing::debug!(event = other, "no toast for event");
            return None;
        }
    };
    Some(toast)
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

    fn toast(kind: ToastKind, ttl_ms: u64) -> Toast {
        Toast::new(kind, "t", ttl_ms)
    }

    #[test]
    fn queue_keeps_only_newest_when_full() {
        let now = Instant::now();
        let mut queue = ToastQueue::new(2);
        for title in ["a", "b", "c"] {
            queue.push(Toast::new(ToastKind::Info, title, 1000), now);
        }
        let titles: Vec<_> = queue.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c"]);
    }

    #[test]
    fn queue_prunes_expired() {
        let start = Instant::now();
        let mut queue = ToastQueue::new(4);
        queue.push(toast(ToastKind::Success, 3000), start);
        queue.push(toast(ToastKind::Error, 7000), start);

        queue.prune(start + Duration::from_millis(2999));
        assert_eq!(queue.len(), 2);
        queue.prune(start + Duration::from_millis(3000));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().map(|t| t.kind), Some(ToastKind::Error));
        queue.prune(start + Duration::from_secs(8));
        assert!(queue.is_empty());
    }

    #[test]
    fn lifecycle_toasts() {
        let up = toast_for(&RealtimeEvent::Connected).unwrap();
        assert_eq!(up.kind, ToastKind::Success);
        assert_eq!(up.ttl, Duration::from_millis(3000));
        let down = toast_for(&RealtimeEvent::Disconnected).unwrap();
        assert_eq!(down.kind, ToastKind::Warning);
    }

    #[test]
    fn event_kinds_and_lifetimes() {
        let cases = [
            ("work_plan_status", ToastKind::Info, 5000),
            ("work_plan_progress", ToastKind::Info, 4000),
            ("alert", ToastKind::Error, 7000),
            ("status", ToastKind::Info, 4000),
            ("command_sended", ToastKind::Success, 3000),
            ("obstacle", ToastKind::Warning, 5000),
            ("robot.connected", ToastKind::Success, 5000),
        ];
        for (name, kind, ttl) in cases {
            let t = toast_for(&message(name, json!({}))).unwrap();
            assert_eq!(t.kind, kind, "{name}");
            assert_eq!(t.ttl, Duration::from_millis(ttl), "{name}");
        }
    }

    #[test]
    fn missing_fields_render_as_dash() {
        let t = toast_for(&message("robot.connected", json!({"esp32_ip": null}))).unwrap();
        assert!(t.lines[0].ends_with(": -"));

        // payload that is not even an object
        let t = toast_for(&message("work_plan_progress", json!("garbage"))).unwrap();
        assert!(t.lines[0].ends_with(": -"));
    }

    #[test]
    fn numbers_and_strings_are_rendered() {
        let t = toast_for(&message(
            "obstacle",
            json!({"center_distance": 12.5, "left_distance": "30", "right_distance": 8}),
        ))
        .unwrap();
        assert!(t.lines[0].ends_with("12.5 cm"));
        assert!(t.lines[1].ends_with("30 cm"));
        assert!(t.lines[2].ends_with("8 cm"));
    }

    #[test]
    fn manual_response_kind_follows_status() {
        let ok = toast_for(&message(
            "manual_command_response",
            json!({"type": "MANUAL_MOVE", "responses": {"command": "FORWARD", "status": "SUCCESS"}}),
        ))
        .unwrap();
        assert_eq!(ok.kind, ToastKind::Success);

        let failed = toast_for(&message(
            "manual_command_response",
            json!({"responses": {"command": "FORWARD", "status": "ERROR"}}),
        ))
        .unwrap();
        assert_eq!(failed.kind, ToastKind::Error);

        let empty = toast_for(&message("manual_command_response", json!({}))).unwrap();
        assert_eq!(empty.kind, ToastKind::Error);
    }

    #[test]
    fn unknown_event_has_no_toast() {
        assert!(toast_for(&message("telemetry", json!({}))).is_none());
    }
}
