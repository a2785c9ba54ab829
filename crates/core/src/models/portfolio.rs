use serde::{Deserialize, Serialize};

use super::allocation::{Allocation, AssetMap};

/// How per-asset changes are expressed.
///
/// The two conventions are not interchangeable: a calculation uses exactly
/// one of them for every asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeConvention {
    /// Signed percent, e.g. `12.5` for +12.5%. The primary mode.
    #[default]
    PriceChangePercent,
    /// Signed fraction, e.g. `-0.2` for -20%. Used by scenario simulation.
    ReturnRate,
}

impl ChangeConvention {
    /// Factor applied to an invested amount for a change value.
    pub fn apply(self, invested: f64, change: f64) -> f64 {
        match self {
            ChangeConvention::PriceChangePercent => invested * (change / 100.0),
            ChangeConvention::ReturnRate => invested * change,
        }
    }
}

impl std::fmt::Display for ChangeConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeConvention::PriceChangePercent => write!(f, "price change %"),
            ChangeConvention::ReturnRate => write!(f, "return rate"),
        }
    }
}

/// The immutable input of one calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    /// Initial capital, must be positive
    pub investment: f64,

    /// Percentage of the capital assigned to each asset
    pub allocation: Allocation,

    /// Per-asset change, interpreted according to `convention`
    pub changes: AssetMap,

    #[serde(default)]
    pub convention: ChangeConvention,
}

impl Portfolio {
    pub fn new(investment: f64, allocation: Allocation, changes: AssetMap) -> Self {
        Self {
            investment,
            allocation,
            changes,
            convention: ChangeConvention::PriceChangePercent,
        }
    }

    pub fn with_return_rates(investment: f64, allocation: Allocation, rates: AssetMap) -> Self {
        Self {
            investment,
            allocation,
            changes: rates,
            convention: ChangeConvention::ReturnRate,
        }
    }
}
