use serde::Deserialize;
use serde_json::Value;
use chrono::Utc;
use log::debug;
use crate::error::{Error, Result};
use crate::models::{Candidate, MarketStatus, PricePoint, Rejection, ScanSnapshot};

/// Current `/scan` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct StructuredScan {
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub rejected: Option<Vec<Rejection>>,
    /// Market session state, `OPEN` or `CLOSED`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub universe_size: Option<u64>,
}

/// The two accepted `/scan` shapes. Resolved here and nowhere else.
#[derive(Debug, Clone)]
pub enum ScanPayload {
    Structured(StructuredScan),
    /// Older servers return the candidate list as a bare array.
    Legacy(Vec<Candidate>),
}

impl ScanPayload {
    pub fn from_value(value: Value) -> Result<Self> {
        let has_candidates = value.get("candidates").is_some();
        match value {
            Value::Array(_) => Ok(ScanPayload::Legacy(serde_json::from_value(value)?)),
            Value::Object(_) if has_candidates => {
                Ok(ScanPayload::Structured(serde_json::from_value(value)?))
            }
            Value::Object(map) => {
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                Err(Error::Shape(format!(
                    "scan object has no `candidates` field (keys: {})",
                    keys.join(", ")
                )))
            }
            other => Err(Error::Shape(format!(
                "expected scan object or candidate array, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn into_snapshot(self) -> ScanSnapshot {
        match self {
            ScanPayload::Structured(scan) => ScanSnapshot {
                candidates: scan.candidates,
                rejected: scan.rejected.unwrap_or_default(),
                market_status: MarketStatus::from_wire(scan.status.as_deref()),
                universe_size: scan.universe_size,
                fetched_at: Utc::now(),
            },
            ScanPayload::Legacy(candidates) => {
                debug!("Received legacy array-shaped scan with {} candidates", candidates.len());
                ScanSnapshot::new(candidates, Vec::new())
            }
        }
    }
}

pub fn decode_scan(body: &[u8]) -> Result<ScanSnapshot> {
    let value: Value = serde_json::from_slice(body)?;
    Ok(ScanPayload::from_value(value)?.into_snapshot())
}

pub fn decode_history(body: &[u8]) -> Result<Vec<PricePoint>> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_array() {
        return Err(Error::Shape(format!(
            "expected price point array, got {}",
            json_type_name(&value)
        )));
    }
    Ok(serde_json::from_value(value)?)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
