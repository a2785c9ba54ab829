use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::asset::AssetId;
use crate::errors::ValidationError;

/// Ordered mapping from asset to a number.
///
/// Keeps insertion order so results list assets the way the user entered
/// them. Serialized as a JSON object; duplicate keys are rejected on
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetMap {
    entries: Vec<(AssetId, f64)>,
}

/// Percentage of the investment assigned to each asset (0–100, sums to 100).
pub type Allocation = AssetMap;

/// Signed percentage change per asset (price-change convention).
pub type PriceChange = AssetMap;

/// Signed fractional rate per asset (return-rate convention).
pub type ReturnRates = AssetMap;

impl AssetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(symbol, value)` pairs, preserving their order.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for (symbol, value) in pairs {
            let id = AssetId::new(symbol)?;
            if map.contains(&id) {
                return Err(ValidationError::DuplicateAsset(id));
            }
            map.entries.push((id, value));
        }
        Ok(map)
    }

    /// Set the value for an asset. An existing entry keeps its position.
    pub fn insert(&mut self, id: AssetId, value: f64) -> Option<f64> {
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some((_, v)) => Some(std::mem::replace(v, value)),
            None => {
                self.entries.push((id, value));
                None
            }
        }
    }

    pub fn remove(&mut self, id: &AssetId) -> Option<f64> {
        let idx = self.entries.iter().position(|(k, _)| k == id)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn get(&self, id: &AssetId) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| *v)
    }

    /// Lookup by raw symbol (case-insensitive).
    pub fn get_symbol(&self, symbol: &str) -> Option<f64> {
        let id = AssetId::new(symbol).ok()?;
        self.get(&id)
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.entries.iter().any(|(k, _)| k == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, f64)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    pub fn ids(&self) -> impl Iterator<Item = &AssetId> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, (_, v)| acc + v)
    }
}

impl Serialize for AssetMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AssetMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AssetMapVisitor;

        impl<'de> Visitor<'de> for AssetMapVisitor {
            type Value = AssetMap;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an object mapping asset symbols to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<AssetMap, A::Error> {
                let mut map = AssetMap::new();
                while let Some((id, value)) = access.next_entry::<AssetId, f64>()? {
                    if map.contains(&id) {
                        return Err(serde::de::Error::custom(ValidationError::DuplicateAsset(id)));
                    }
                    map.entries.push((id, value));
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(AssetMapVisitor)
    }
}

/// Step an allocation up or down by `delta`, clamped into [0, 100].
/// Returns the new value.
pub fn adjust_allocation(allocation: &mut Allocation, id: &AssetId, delta: f64) -> f64 {
    let current = allocation.get(id).unwrap_or(0.0);
    let next = (current + delta).clamp(0.0, 100.0);
    allocation.insert(id.clone(), next);
    next
}
