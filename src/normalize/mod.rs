//! Raw backend JSON → typed view-models.
//!
//! Missing or empty text falls back to a placeholder, missing numbers to 0.
//! List records that are not objects are dropped; nothing here fails.

pub(crate) mod wire;

use serde_json::Value;

use crate::constants::UNKNOWN;
use crate::models::*;
use wire::*;

/// `Some(s)` unless absent or empty.
fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

fn text_or(s: Option<String>, default: &str) -> String {
    non_empty(s).unwrap_or_else(|| default.to_string())
}

fn text(s: Option<String>) -> String {
    s.unwrap_or_default()
}

/// `totalPages`, defaulting to 1 when absent, zero or negative.
pub fn total_pages(raw: &RawPage) -> u32 {
    raw.total_pages
        .filter(|n| *n > 0)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(1)
}

/// Decode a paginated envelope, normalizing each record with `record`.
pub fn page<T>(body: &Value, record: impl Fn(&Value) -> Option<T>) -> Page<T> {
    let raw: RawPage = match serde_json::from_value(body.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!(error = %e, "page envelope not an object");
            return Page::empty();
        }
    };
    let total = total_pages(&raw);
    let items: Vec<T> = raw.data.iter().filter_map(&record).collect();
    if items.len() < raw.data.len() {
        tracing::debug!(
            dropped = raw.data.len() - items.len(),
            "dropped malformed list records"
        );
    }
    Page::new(items, total)
}

/// The raw `data` array of an envelope, for consumers that aggregate it.
pub fn page_records(body: &Value) -> (Vec<Value>, u32) {
    match serde_json::from_value::<RawPage>(body.clone()) {
        Ok(raw) => {
            let total = total_pages(&raw);
            (raw.data, total)
        }
        Err(_) => (Vec::new(), 1),
    }
}

// ── Records ───────────────────────────────────────────────────────

fn work_plan_status(s: Option<String>) -> WorkPlanStatus {
    WorkPlanStatus::parse(&text_or(s, UNKNOWN))
}

pub fn alert(v: &Value) -> Alert {
    let raw: RawAlert = from_value(v).unwrap_or_default();
    Alert {
        alert_id: raw.alert_id.unwrap_or(0),
        alert_type: AlertType::parse(&text_or(raw.alert_type, UNKNOWN)),
        measured_value: raw.measured_value.unwrap_or(0.0),
        reference_value: raw.reference_value.unwrap_or(0.0),
        threshold: raw.threshold.unwrap_or(0.0),
        message: text(non_empty(raw.message)),
        measurement_number: raw.measurement_number.unwrap_or(0),
        created_at: text(non_empty(raw.created_at)),
    }
}

/// The plan header of an alert-log record; `None` without a usable id.
pub fn alert_work_plan(raw: RawAlertWorkPlan) -> Option<WorkPlan> {
    let id = raw.work_plan_id?;
    Some(WorkPlan {
        id,
        description: text_or(raw.description, &t!("placeholder.description")),
        status: work_plan_status(raw.status),
        temp_threshold: raw.temp_threshold.unwrap_or(0.0),
        hum_threshold: raw.hum_threshold.unwrap_or(0.0),
        violation_count: raw.violation_count.unwrap_or(0),
        created_at: text(raw.created_at),
    })
}

/// A tag reference, keyed by `rfid_tag_id` or else `id`; `None` without one.
pub fn tag_ref(raw: RawTag) -> Option<RfidTag> {
    let id = raw.rfid_tag_id.or(raw.id)?;
    let mut tag = RfidTag::placeholder(id);
    if let Some(uid) = non_empty(raw.uid) {
        tag.uid = uid;
    }
    if let Some(loc) = non_empty(raw.location_name) {
        tag.location_name = loc;
    }
    tag.reference_temperature = raw.reference_temperature.unwrap_or(0.0);
    tag.reference_humidity = raw.reference_humidity.unwrap_or(0.0);
    tag.description = text(raw.description);
    tag.created_at = text(raw.created_at);
    tag.updated_at = text(raw.updated_at);
    Some(tag)
}

pub fn rfid_tag(v: &Value) -> Option<RfidTag> {
    tag_ref(from_value(v)?)
}

pub fn command_log(v: &Value) -> Option<CommandLog> {
    let raw: RawCommandLog = from_value(v)?;
    Some(CommandLog {
        id: raw.id.unwrap_or(0),
        command: text_or(raw.command, UNKNOWN),
        timestamp: text(raw.timestamp),
        created_at: text(raw.created_at),
    })
}

pub fn obstacle_log(v: &Value) -> Option<ObstacleLog> {
    let raw: RawObstacleLog = from_value(v)?;
    Some(ObstacleLog {
        id: raw.id.unwrap_or(0),
        center_distance: raw.center_distance.unwrap_or(0.0),
        left_distance: raw.left_distance.unwrap_or(0.0),
        right_distance: raw.right_distance.unwrap_or(0.0),
        suggestion: text_or(raw.suggestion, UNKNOWN),
        action_taken: text_or(raw.action_taken, UNKNOWN),
        created_at: text(raw.created_at),
    })
}

pub fn robot_status(v: &Value) -> Option<RobotStatusEntry> {
    let raw: RawRobotStatus = from_value(v)?;
    Some(RobotStatusEntry {
        id: raw.id.unwrap_or(0),
        status: text_or(raw.status, UNKNOWN),
        message: text(raw.message),
        mode: text_or(raw.mode, UNKNOWN),
        timestamp: text(raw.timestamp),
        created_at: text(raw.created_at),
    })
}

fn plan_header(raw: &mut RawWorkPlan) -> WorkPlan {
    WorkPlan {
        id: raw.id.or(raw.work_plan_id).unwrap_or(0),
        description: text_or(raw.description.take(), &t!("placeholder.description")),
        status: work_plan_status(raw.status.take()),
        temp_threshold: raw.temp_threshold.unwrap_or(0.0),
        hum_threshold: raw.hum_threshold.unwrap_or(0.0),
        violation_count: raw.violation_count.unwrap_or(0),
        created_at: text(raw.created_at.take()),
    }
}

fn progress(raw: &mut RawWorkPlan) -> String {
    text_or(raw.progress.take(), "0")
}

pub fn work_plan_summary(v: &Value) -> Option<WorkPlanSummary> {
    let mut raw: RawWorkPlan = from_value(v)?;
    let items = raw
        .items
        .iter()
        .filter_map(from_value::<RawPlanItem>)
        .map(|item| {
            let tag = item.rfid_tag_camel.or(item.rfid_tag).unwrap_or_default();
            WorkPlanItem {
                id: item.id.unwrap_or(0),
                rfid_tag_id: item.rfid_tag_id.or(tag.id).unwrap_or(0),
                measurement_frequency: item.measurement_frequency.unwrap_or(0),
                uid: text_or(tag.uid, UNKNOWN),
                location_name: text_or(tag.location_name, &t!("placeholder.location")),
            }
        })
        .collect();
    Some(WorkPlanSummary {
        plan: plan_header(&mut raw),
        progress: progress(&mut raw),
        updated_at: text(raw.updated_at.take()),
        items,
    })
}

pub fn measurement_plan(v: &Value) -> Option<MeasurementPlan> {
    let mut raw: RawWorkPlan = from_value(v)?;
    let items = raw
        .items
        .iter()
        .filter_map(from_value::<RawPlanItem>)
        .filter_map(|item| {
            let tag = item
                .rfid_tag
                .and_then(tag_ref)
                .or_else(|| item.rfid_tag_id.map(RfidTag::placeholder))?;
            let measurements = item
                .measurements
                .iter()
                .filter_map(from_value::<RawMeasurement>)
                .map(|m| Measurement {
                    measurement_number: m.measurement_number.unwrap_or(0),
                    temperature: m.temperature,
                    humidity: m.humidity,
                    created_at: text(m.created_at),
                })
                .collect();
            Some(MeasurementItem {
                tag,
                measurement_frequency: item.measurement_frequency.unwrap_or(0),
                measurements,
            })
        })
        .collect();
    Some(MeasurementPlan {
        plan: plan_header(&mut raw),
        progress: progress(&mut raw),
        items,
    })
}

/// The work plan carried by a realtime `work_plan_status`/`work_plan_progress` event.
pub fn live_work_plan(v: &Value) -> Option<LiveWorkPlan> {
    let mut raw: RawWorkPlan = from_value(v)?;
    let locations = raw
        .items
        .iter()
        .filter_map(from_value::<RawPlanItem>)
        .map(|item| LiveLocation {
            rfid_tag_id: item.rfid_tag_id.unwrap_or(0),
            uid: text_or(item.uid, UNKNOWN),
            location_name: text_or(item.location_name, &t!("placeholder.location")),
            measurement_frequency: item.measurement_frequency.unwrap_or(0),
            current_measurements: item.current_measurements.unwrap_or(0),
            latest_temperature: item.latest_temperature,
            latest_humidity: item.latest_humidity,
            latest_created_at: text(item.latest_created_at),
        })
        .collect();
    let header = plan_header(&mut raw);
    Some(LiveWorkPlan {
        id: header.id,
        description: header.description,
        status: header.status,
        progress: progress(&mut raw),
        temp_threshold: header.temp_threshold,
        hum_threshold: header.hum_threshold,
        violation_count: header.violation_count,
        locations,
    })
}

/// `GET /commands/latest` body: either the record itself or `{ data: record }`.
pub fn latest_command(body: &Value) -> Option<CommandLog> {
    match body.get("data") {
        Some(inner) if inner.is_object() => command_log(inner),
        _ => command_log(body).filter(|c| c.command != UNKNOWN),
    }
}

/// Unpaginated list body: a bare array or `{ data: [...] }`.
pub fn list<T>(body: &Value, record: impl Fn(&Value) -> Option<T>) -> Vec<T> {
    let items = match body {
        Value::Array(items) => items.as_slice(),
        _ => body
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
    };
    items.iter().filter_map(record).collect()
}
