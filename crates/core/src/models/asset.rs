use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ValidationError;

/// Identifier of an asset inside one portfolio (e.g. "BTC").
///
/// Always trimmed and uppercased, never empty. Free-form portfolios may use
/// any symbol; the default form uses [`DEFAULT_ASSETS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(symbol: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = symbol.as_ref();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidAssetId(raw.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        AssetId::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// Display metadata for a known asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetInfo {
    /// Ticker symbol, uppercase
    pub symbol: &'static str,
    /// Human-readable name
    pub name: &'static str,
}

impl AssetInfo {
    pub fn id(&self) -> AssetId {
        AssetId(self.symbol.to_string())
    }
}

/// The five assets offered by the default form, in display order.
pub const DEFAULT_ASSETS: [AssetInfo; 5] = [
    AssetInfo { symbol: "BTC", name: "Bitcoin" },
    AssetInfo { symbol: "ETH", name: "Ethereum" },
    AssetInfo { symbol: "SOL", name: "Solana" },
    AssetInfo { symbol: "XRP", name: "XRP" },
    AssetInfo { symbol: "SUI", name: "Sui" },
];

/// Look up display metadata by symbol or by name (case-insensitive).
pub fn find_asset(key: &str) -> Option<&'static AssetInfo> {
    DEFAULT_ASSETS.iter().find(|a| {
        a.symbol.eq_ignore_ascii_case(key) || a.name.eq_ignore_ascii_case(key)
    })
}

/// Human-readable name for an asset; falls back to the symbol for
/// user-named assets.
pub fn display_name(id: &AssetId) -> String {
    find_asset(id.as_str())
        .map(|a| a.name.to_string())
        .unwrap_or_else(|| id.to_string())
}
