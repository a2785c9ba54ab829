use async_trait::async_trait;

use crate::errors::PredictionError;
use crate::models::allocation::Allocation;
use crate::models::prediction::PredictionResponse;

/// Trait abstraction for generative-model backends.
///
/// Implementations only transport and parse; they never compute totals.
/// Whatever arithmetic the model returns is recomputed by the caller.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PredictionProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Ask the model for per-asset price-change percentages and commentary.
    async fn predict(
        &self,
        investment: f64,
        allocation: &Allocation,
    ) -> Result<PredictionResponse, PredictionError>;

    /// Ask the model for `count` independent fractional return rates.
    /// Implementations must return exactly `count` values.
    async fn simulate(&self, count: usize) -> Result<Vec<f64>, PredictionError>;
}
