use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored GPS telemetry reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GpsRecord {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub speed: f64,
    pub satellites: i32,
    pub timestamp: DateTime<Utc>,
}

/// A validated reading that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewGpsRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub speed: f64,
    pub satellites: i32,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewGpsRecord {
    /// Assigns an identifier and fills the timestamp with `now` when absent.
    pub fn into_record(self, now: DateTime<Utc>) -> GpsRecord {
        GpsRecord {
            id: Uuid::new_v4(),
            latitude: self.latitude,
            longitude: self.longitude,
            altitude: self.altitude,
            speed: self.speed,
            satellites: self.satellites,
            timestamp: self.timestamp.unwrap_or(now),
        }
    }
}

/// Raw ingest body. Fields stay untyped until validation coerces them.
#[derive(Debug, Default, Deserialize)]
pub struct GpsPayload {
    pub latitude: Option<serde_json::Value>,
    pub longitude: Option<serde_json::Value>,
    pub altitude: Option<serde_json::Value>,
    pub speed: Option<serde_json::Value>,
    pub satellites: Option<serde_json::Value>,
    pub timestamp: Option<serde_json::Value>,
}

/// Response for a successful ingest
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub message: &'static str,
    pub data: GpsRecord,
}

/// One page of records plus totals
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsPageResponse {
    pub data: Vec<GpsRecord>,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

/// Plain `{ "message": ... }` body used by deletes and errors
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
