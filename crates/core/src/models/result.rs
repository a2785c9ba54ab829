use serde::{Deserialize, Serialize};

use super::asset::AssetId;
use super::portfolio::ChangeConvention;

/// Derived financial detail for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBreakdownEntry {
    #[serde(rename = "name")]
    pub asset: AssetId,

    /// Allocation percentage (0–100)
    #[serde(rename = "allocation")]
    pub allocation_percent: f64,

    /// Change as supplied, in the result's convention
    pub price_change: f64,

    /// investment × allocation / 100
    pub invested_amount: f64,

    pub profit_loss: f64,
}

/// Outcome of a calculation. Replaced wholesale on every submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub total_profit_loss: f64,

    /// (total_profit_loss / investment) × 100
    pub percentage_change: f64,

    /// investment + total_profit_loss
    pub final_value: f64,

    /// One entry per allocated asset, in allocation order
    pub breakdown: Vec<AssetBreakdownEntry>,

    /// Model commentary, present only for AI-backed results
    #[serde(default, rename = "thoughts", skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,

    pub convention: ChangeConvention,
}

impl CalculationResult {
    /// Attach model commentary to an authoritative result.
    pub fn with_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative = Some(narrative.into());
        self
    }

    pub fn is_profit(&self) -> bool {
        self.total_profit_loss > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.total_profit_loss < 0.0
    }

    pub fn entry(&self, id: &AssetId) -> Option<&AssetBreakdownEntry> {
        self.breakdown.iter().find(|e| &e.asset == id)
    }
}
