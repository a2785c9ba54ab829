use serde::{Deserialize, Serialize};

use super::allocation::{Allocation, PriceChange};
use crate::errors::PredictionError;

/// The only parts of a model answer that are trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AIPrediction {
    pub price_change: PriceChange,
    pub narrative: String,
}

// ── Wire shapes ─────────────────────────────────────────────────────

/// Request sent to the model for a price-change prediction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest<'a> {
    pub investment: f64,
    pub allocations: &'a Allocation,
}

/// Raw model answer. Everything except `price_changes` and `thoughts` is
/// the model's own arithmetic and is only kept for comparison.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub price_changes: PriceChange,
    #[serde(default)]
    pub total_profit_loss: Option<f64>,
    #[serde(default)]
    pub percentage_change: Option<f64>,
    #[serde(default)]
    pub final_value: Option<f64>,
    #[serde(default)]
    pub breakdown: Vec<ResponseBreakdownEntry>,
    #[serde(default)]
    pub thoughts: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBreakdownEntry {
    pub name: String,
    #[serde(default)]
    pub allocation: f64,
    #[serde(default)]
    pub price_change: f64,
    #[serde(default)]
    pub profit_loss: f64,
}

impl PredictionResponse {
    /// Parse model text. Tolerates a surrounding Markdown code fence.
    pub fn parse(text: &str) -> Result<Self, PredictionError> {
        serde_json::from_str(strip_code_fence(text))
            .map_err(|e| PredictionError::InvalidResponse(format!("prediction: {e}")))
    }

    pub fn into_prediction(self) -> AIPrediction {
        AIPrediction {
            price_change: self.price_changes,
            narrative: self.thoughts,
        }
    }
}

/// Request for `count` independent return rates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub number_of_scenarios: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationResponse {
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub return_rate: f64,
}

impl SimulationResponse {
    pub fn parse(text: &str) -> Result<Self, PredictionError> {
        serde_json::from_str(strip_code_fence(text))
            .map_err(|e| PredictionError::InvalidResponse(format!("simulation: {e}")))
    }

    /// Return rates, checked against the requested count.
    pub fn into_rates(self, expected: usize) -> Result<Vec<f64>, PredictionError> {
        if self.scenarios.len() != expected {
            return Err(PredictionError::ScenarioCountMismatch {
                expected,
                actual: self.scenarios.len(),
            });
        }
        Ok(self.scenarios.into_iter().map(|s| s.return_rate).collect())
    }
}

/// Models often wrap JSON in ```json fences even when asked not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
