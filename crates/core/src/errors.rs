use thiserror::Error;

use crate::models::asset::AssetId;

/// Unified error type for the entire profit-gazer-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input ───────────────────────────────────────────────────────
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── AI / Network ────────────────────────────────────────────────
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    // ── Storage / Snapshot ──────────────────────────────────────────
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u16),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

/// Rejected user input. Surfaced as a field-level message; no calculation
/// is attempted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Allocation for {asset} is out of range: {value} (expected 0..=100)")]
    OutOfRange { asset: AssetId, value: f64 },

    #[error("Allocations must total 100%, got {0}%")]
    SumMismatch(f64),

    #[error("Missing price change for {0}")]
    MissingPriceChange(AssetId),

    #[error("Price change for {asset} is not a finite number: {value}")]
    NonFiniteChange { asset: AssetId, value: f64 },

    #[error("Investment must be a positive amount, got {0}")]
    InvalidInvestment(f64),

    #[error("Invalid asset id: {0:?}")]
    InvalidAssetId(String),

    #[error("Duplicate asset in portfolio: {0}")]
    DuplicateAsset(AssetId),
}

/// Failure to obtain a usable prediction. Nothing from a failed call is
/// ever applied to a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Prediction is missing price changes for: {}", join_ids(.missing))]
    IncompletePrediction { missing: Vec<AssetId> },

    #[error("Expected {expected} scenarios, got {actual}")]
    ScenarioCountMismatch { expected: usize, actual: usize },

    #[error("API error ({provider}): {message}")]
    Api { provider: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key for provider: {0}")]
    MissingApiKey(String),

    #[error("No prediction provider configured")]
    NoProvider,
}

fn join_ids(ids: &[AssetId]) -> String {
    ids.iter()
        .map(AssetId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for PredictionError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; keep query strings out of messages.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        PredictionError::Network(sanitized)
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        CoreError::Prediction(e.into())
    }
}
