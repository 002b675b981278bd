use crate::errors::{Error, Result};
use crate::model::{GpsPayload, NewGpsRecord};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const MISSING_FIELDS: &str = "Missing required fields";

/// How the ingest presence check treats falsy values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Rejects missing, null, false, 0 and "" values.
    #[default]
    Truthy,
    /// Rejects only missing or null values.
    Strict,
}

impl FromStr for ValidationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truthy" => Ok(ValidationMode::Truthy),
            "strict" => Ok(ValidationMode::Strict),
            other => Err(Error::Config(format!(
                "unknown validation mode '{}' (expected 'truthy' or 'strict')",
                other
            ))),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Truthy => f.write_str("truthy"),
            ValidationMode::Strict => f.write_str("strict"),
        }
    }
}

/// Validates an ingest body and coerces it into a typed reading
pub fn validate(payload: &GpsPayload, mode: ValidationMode) -> Result<NewGpsRecord> {
    let required = [
        ("latitude", &payload.latitude),
        ("longitude", &payload.longitude),
        ("altitude", &payload.altitude),
        ("speed", &payload.speed),
        ("satellites", &payload.satellites),
    ];

    // Presence is checked for every field before any coercion happens
    for (name, value) in required {
        check_present(name, value.as_ref(), mode)?;
    }

    Ok(NewGpsRecord {
        latitude: coerce_f64("latitude", payload.latitude.as_ref())?,
        longitude: coerce_f64("longitude", payload.longitude.as_ref())?,
        altitude: coerce_f64("altitude", payload.altitude.as_ref())?,
        speed: coerce_f64("speed", payload.speed.as_ref())?,
        satellites: coerce_i32("satellites", payload.satellites.as_ref())?,
        timestamp: coerce_timestamp(payload.timestamp.as_ref()),
    })
}

fn check_present(name: &str, value: Option<&Value>, mode: ValidationMode) -> Result<()> {
    match (mode, value) {
        (ValidationMode::Truthy, Some(v)) if is_truthy(v) => Ok(()),
        (ValidationMode::Truthy, _) => Err(Error::Validation(MISSING_FIELDS.to_string())),
        (ValidationMode::Strict, Some(_)) => Ok(()),
        (ValidationMode::Strict, None) => Err(Error::Validation(format!(
            "Missing required field: {}",
            name
        ))),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn invalid(name: &str) -> Error {
    Error::Validation(format!("Invalid value for field: {}", name))
}

fn coerce_f64(name: &str, value: Option<&Value>) -> Result<f64> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).ok_or_else(|| invalid(name))
}

fn coerce_i32(name: &str, value: Option<&Value>) -> Result<i32> {
    let n = coerce_f64(name, value)?;
    if n.fract() != 0.0 || n < i32::MIN as f64 || n > i32::MAX as f64 {
        return Err(invalid(name));
    }
    Ok(n as i32)
}

/// Client timestamps are optional. Anything that is not RFC 3339 is
/// ignored and the store stamps the record with its insertion time.
fn coerce_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = value?;
    let parsed = raw
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|t| t.with_timezone(&Utc));

    if parsed.is_none() {
        debug!("Ignoring unparseable timestamp {}, using insertion time", raw);
    }
    parsed
}
