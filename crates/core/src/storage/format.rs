use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::allocation::{Allocation, AssetMap, PriceChange};
use crate::models::asset::DEFAULT_ASSETS;

/// Current snapshot format version.
pub const CURRENT_VERSION: u16 = 1;

/// Storage key the last-entered form is saved under.
pub const SNAPSHOT_KEY: &str = "profit-gazer:last-form";

/// Capital pre-filled in a fresh form.
pub const DEFAULT_INVESTMENT: f64 = 15_000_000.0;

/// Last-entered form state, serialized as camelCase JSON:
///
/// ```text
/// {"version":1,"investment":15000000,
///  "allocations":{"BTC":40,...},"priceChanges":{"BTC":0,...},
///  "savedAt":"2025-01-15T10:00:00Z"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    #[serde(default = "default_version")]
    pub version: u16,
    pub investment: f64,
    pub allocations: Allocation,
    #[serde(default)]
    pub price_changes: PriceChange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

fn default_version() -> u16 {
    CURRENT_VERSION
}

impl FormSnapshot {
    pub fn new(investment: f64, allocations: Allocation, price_changes: PriceChange) -> Self {
        Self {
            version: CURRENT_VERSION,
            investment,
            allocations,
            price_changes,
            saved_at: None,
        }
    }

    /// The pre-filled form: 15,000,000 split 40/30/15/10/5 across the
    /// default assets, all price changes zero.
    pub fn default_form() -> Self {
        let weights = [40.0, 30.0, 15.0, 10.0, 5.0];
        let mut allocations = AssetMap::new();
        let mut price_changes = AssetMap::new();
        for (info, weight) in DEFAULT_ASSETS.iter().zip(weights) {
            let id = info.id();
            allocations.insert(id.clone(), weight);
            price_changes.insert(id, 0.0);
        }
        Self::new(DEFAULT_INVESTMENT, allocations, price_changes)
    }
}

impl Default for FormSnapshot {
    fn default() -> Self {
        Self::default_form()
    }
}

/// Serialize a snapshot to JSON text.
pub fn write_snapshot(snapshot: &FormSnapshot) -> Result<String, CoreError> {
    serde_json::to_string(snapshot)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize snapshot: {e}")))
}

/// Parse JSON text into a snapshot, rejecting unknown versions.
/// Content is not validated here.
pub fn read_snapshot(text: &str) -> Result<FormSnapshot, CoreError> {
    let snapshot: FormSnapshot = serde_json::from_str(text)
        .map_err(|e| CoreError::Deserialization(format!("Failed to parse snapshot: {e}")))?;

    if snapshot.version == 0 || snapshot.version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(snapshot.version));
    }
    Ok(snapshot)
}
