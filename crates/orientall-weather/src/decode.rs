//! Turns the backend's freeform reply into a [`WeatherRecord`].
//!
//! Parsing is attempted on the raw text first and, only if that fails, once
//! more after removing a surrounding markdown code fence.

use orientall_core::WeatherError;
use serde_json::{Map, Value};

use crate::types::WeatherRecord;

const FENCE: &str = "```";

/// Decode a reply into a validated record.
pub fn decode_reply(text: &str) -> Result<WeatherRecord, WeatherError> {
    if text.trim().is_empty() {
        return Err(WeatherError::EmptyResponse);
    }

    let value = parse_lenient(text)?;
    let Value::Object(object) = value else {
        return Err(WeatherError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_type(&value)
        )));
    };

    if let Some(message) = object.get("error").and_then(error_message) {
        return Err(WeatherError::LocationNotFound(message));
    }

    record_from_object(&object)
}

/// Strict parse, then a single retry on the fence-stripped text.
fn parse_lenient(text: &str) -> Result<Value, WeatherError> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    let cleaned = strip_code_fence(text);
    serde_json::from_str(cleaned).map_err(|e| {
        tracing::warn!(reply = cleaned, error = %e, "Failed to parse AI reply");
        WeatherError::MalformedResponse(e.to_string())
    })
}

/// Remove a leading ```` ```lang ```` marker and a trailing ```` ``` ````.
pub fn strip_code_fence(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix(FENCE) {
        s = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    }
    if let Some(rest) = s.trim_end().strip_suffix(FENCE) {
        s = rest;
    }
    s.trim()
}

/// Message carried by an `error` field; `null`, `false` and `""` carry none.
pub(crate) fn error_message(error: &Value) -> Option<String> {
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn record_from_object(object: &Map<String, Value>) -> Result<WeatherRecord, WeatherError> {
    let city = match object.get("city") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => {
            return Err(WeatherError::IncompleteData(
                "missing or empty \"city\"".to_string(),
            ))
        }
    };

    let temperature = object
        .get("temperature")
        .and_then(Value::as_f64)
        .ok_or_else(|| WeatherError::IncompleteData("missing numeric \"temperature\"".to_string()))?;

    let humidity = number_field(object, "humidity")?.map(|h| h.round().clamp(0.0, 100.0) as u8);
    let wind_speed = number_field(object, "windSpeed")?.map(|w| w.max(0.0));

    Ok(WeatherRecord {
        city,
        temperature,
        condition: string_field(object, "condition")?,
        humidity,
        wind_speed,
        icon: string_field(object, "icon")?,
    })
}

/// Absent or null is `None`; any other non-number is an error.
fn number_field(object: &Map<String, Value>, key: &str) -> Result<Option<f64>, WeatherError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| WeatherError::IncompleteData(format!("\"{key}\" is not a number"))),
    }
}

/// Absent or null is `None`; any other non-string is an error.
fn string_field(object: &Map<String, Value>, key: &str) -> Result<Option<String>, WeatherError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(WeatherError::IncompleteData(format!("\"{key}\" is not a string"))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
