//! Raw backend record shapes.
//!
//! Every field is optional and deserialized leniently: numbers may arrive
//! as JSON numbers or numeric strings, ids must be non-zero integers, and
//! anything of the wrong type simply reads as absent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ── Lenient field readers ─────────────────────────────────────────

pub(crate) fn value_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn value_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// An identifier is usable only when it is a non-zero integer, given as a
/// JSON number or a numeric string.
pub(crate) fn value_id(v: &Value) -> Option<i64> {
    let id = match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (id != 0).then_some(id)
}

pub(crate) fn value_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient<'de, D, T>(d: D, read: fn(&Value) -> Option<T>) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(read))
}

fn de_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    lenient(d, value_f64)
}

fn de_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    lenient(d, value_i64)
}

fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    lenient(d, value_id)
}

fn de_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    lenient(d, value_string)
}

/// Accepts an array of anything; a non-array reads as empty.
fn de_values<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Value>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    })
}

/// Deserialize a nested record, falling back to `None` if it is not an object.
fn de_record<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(d)?.and_then(|v| from_value(&v)))
}

/// Decode one record, yielding `None` for anything that isn't an object.
pub(crate) fn from_value<T: serde::de::DeserializeOwned>(v: &Value) -> Option<T> {
    if !v.is_object() {
        return None;
    }
    serde_json::from_value(v.clone()).ok()
}

// ── Envelope ──────────────────────────────────────────────────────

/// `{ data: [...], totalPages: n, ... }`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawPage {
    #[serde(deserialize_with = "de_values")]
    pub data: Vec<Value>,
    #[serde(rename = "totalPages", deserialize_with = "de_i64")]
    pub total_pages: Option<i64>,
}

// ── Alert logs ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawAlertLog {
    #[serde(deserialize_with = "de_record")]
    pub work_plan: Option<RawAlertWorkPlan>,
    #[serde(deserialize_with = "de_values")]
    pub rfid_tags: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawAlertWorkPlan {
    #[serde(deserialize_with = "de_id")]
    pub work_plan_id: Option<i64>,
    #[serde(deserialize_with = "de_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "de_f64")]
    pub temp_threshold: Option<f64>,
    #[serde(deserialize_with = "de_f64")]
    pub hum_threshold: Option<f64>,
    #[serde(deserialize_with = "de_i64")]
    pub violation_count: Option<i64>,
    #[serde(deserialize_with = "de_string")]
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawTagGroup {
    #[serde(deserialize_with = "de_record")]
    pub rfid_tag: Option<RawTag>,
    #[serde(deserialize_with = "de_values")]
    pub alerts: Vec<Value>,
}

/// RFID tag as it appears nested in alert logs, measurements and the tag list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawTag {
    #[serde(deserialize_with = "de_id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "de_id")]
    pub rfid_tag_id: Option<i64>,
    #[serde(deserialize_with = "de_string")]
    pub uid: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub location_name: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "de_f64")]
    pub reference_temperature: Option<f64>,
    #[serde(deserialize_with = "de_f64")]
    pub reference_humidity: Option<f64>,
    #[serde(deserialize_with = "de_string")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawAlert {
    #[serde(deserialize_with = "de_i64")]
    pub alert_id: Option<i64>,
    #[serde(deserialize_with = "de_string")]
    pub alert_type: Option<String>,
    #[serde(deserialize_with = "de_f64")]
    pub measured_value: Option<f64>,
    #[serde(deserialize_with = "de_f64")]
    pub reference_value: Option<f64>,
    #[serde(deserialize_with = "de_f64")]
    pub threshold: Option<f64>,
    #[serde(deserialize_with = "de_string")]
    pub message: Option<String>,
    #[serde(deserialize_with = "de_i64")]
    pub measurement_number: Option<i64>,
    #[serde(deserialize_with = "de_string")]
    pub created_at: Option<String>,
}

// ── Robot logs ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCommandLog {
    #[serde(deserialize_with = "de_i64")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "de_string")]
    pub command: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub timestamp: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawObstacleLog {
    #[serde(deserialize_with = "de_i64")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "de_f64")]
    pub center_distance: Option<f64>,
    #[serde(deserialize_with = "de_f64")]
    pub left_distance: Option<f64>,
    #[serde(deserialize_with = "de_f64")]
    pub right_distance: Option<f64>,
    #[serde(deserialize_with = "de_string")]
    pub suggestion: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub action_taken: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRobotStatus {
    #[serde(deserialize_with = "de_i64")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "de_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub message: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub mode: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub timestamp: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub created_at: Option<String>,
}

// ── Work plans ────────────────────────────────────────────────────

/// Work plan as listed by `/work-plans` and `/work-plans/measurements`,
/// and as carried by realtime work plan events.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawWorkPlan {
    #[serde(deserialize_with = "de_id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "de_id")]
    pub work_plan_id: Option<i64>,
    #[serde(deserialize_with = "de_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub progress: Option<String>,
    #[serde(deserialize_with = "de_f64")]
    pub temp_threshold: Option<f64>,
    #[serde(deserialize_with = "de_f64")]
    pub hum_threshold: Option<f64>,
    #[serde(deserialize_with = "de_i64")]
    pub violation_count: Option<i64>,
    #[serde(deserialize_with = "de_string")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub updated_at: Option<String>,
    #[serde(deserialize_with = "de_values")]
    pub items: Vec<Value>,
}

/// One entry of a work plan's `items`. The three endpoints that carry
/// plans each fill a different subset of these fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawPlanItem {
    #[serde(deserialize_with = "de_i64")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "de_id")]
    pub rfid_tag_id: Option<i64>,
    #[serde(deserialize_with = "de_i64")]
    pub measurement_frequency: Option<i64>,
    #[serde(rename = "rfidTag", deserialize_with = "de_record")]
    pub rfid_tag_camel: Option<RawTag>,
    #[serde(deserialize_with = "de_record")]
    pub rfid_tag: Option<RawTag>,
    #[serde(deserialize_with = "de_string")]
    pub uid: Option<String>,
    #[serde(deserialize_with = "de_string")]
    pub location_name: Option<String>,
    #[serde(deserialize_with = "de_i64")]
    pub current_measurements: Option<i64>,
    #[serde(deserialize_with = "de_f64")]
    pub latest_temperature: Option<f64>,
    #[serde(deserialize_with = "de_f64")]
    pub latest_humidity: Option<f64>,
    #[serde(deserialize_with = "de_string")]
    pub latest_created_at: Option<String>,
    #[serde(deserialize_with = "de_values")]
    pub measurements: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawMeasurement {
    #[serde(deserialize_with = "de_i64")]
    pub measurement_number: Option<i64>,
    #[serde(deserialize_with = "de_f64")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "de_f64")]
    pub humidity: Option<f64>,
    #[serde(deserialize_with = "de_string")]
    pub created_at: Option<String>,
}
