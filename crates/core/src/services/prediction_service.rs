use log::{debug, warn};

use crate::errors::{CoreError, PredictionError};
use crate::models::allocation::{Allocation, AssetMap};
use crate::models::prediction::{AIPrediction, PredictionResponse};
use crate::models::result::CalculationResult;
use crate::providers::traits::PredictionProvider;
use crate::services::calculation_service::CalculationService;

/// Claimed totals further than this from the recomputed ones are logged.
const CLAIM_MISMATCH_TOLERANCE: f64 = 0.01;

/// Turns untrusted model output into authoritative results.
///
/// Only the per-asset changes and the commentary are taken from the model;
/// every derived number is recomputed by `CalculationService`.
/// Inputs are expected to be validated already.
pub struct PredictionService {
    calculation_service: CalculationService,
}

impl PredictionService {
    pub fn new() -> Self {
        Self {
            calculation_service: CalculationService::new(),
        }
    }

    /// Ask the provider for a prediction and check it covers every
    /// allocated asset with a finite value.
    pub async fn fetch_prediction(
        &self,
        provider: &dyn PredictionProvider,
        investment: f64,
        allocation: &Allocation,
    ) -> Result<AIPrediction, PredictionError> {
        let response = provider.predict(investment, allocation).await?;
        Self::ensure_complete(allocation, &response.price_changes)?;
        Ok(response.into_prediction())
    }

    /// Full AI flow: predict, recompute, attach commentary.
    pub async fn predict(
        &self,
        provider: &dyn PredictionProvider,
        investment: f64,
        allocation: &Allocation,
    ) -> Result<CalculationResult, CoreError> {
        debug!(
            "Requesting prediction from {} for {} assets",
            provider.name(),
            allocation.len()
        );
        let response = provider.predict(investment, allocation).await?;
        Self::ensure_complete(allocation, &response.price_changes)?;

        let result = self
            .calculation_service
            .calculate(investment, allocation, &response.price_changes)?;
        Self::report_claim_mismatch(provider.name(), &response, &result);

        Ok(result.with_narrative(response.thoughts))
    }

    /// Scenario simulation: one return rate per allocated asset, applied
    /// in allocation order with the return-rate convention.
    pub async fn simulate(
        &self,
        provider: &dyn PredictionProvider,
        investment: f64,
        allocation: &Allocation,
    ) -> Result<CalculationResult, CoreError> {
        let count = allocation.len();
        debug!("Requesting {count} scenarios from {}", provider.name());
        let rates = provider.simulate(count).await?;
        let rates = Self::rates_for(allocation, &rates)?;

        Ok(self
            .calculation_service
            .calculate_with_return_rates(investment, allocation, &rates)?)
    }

    /// Pair the i-th rate with the i-th allocated asset.
    pub fn rates_for(allocation: &Allocation, rates: &[f64]) -> Result<AssetMap, PredictionError> {
        if rates.len() != allocation.len() {
            return Err(PredictionError::ScenarioCountMismatch {
                expected: allocation.len(),
                actual: rates.len(),
            });
        }
        let mut map = AssetMap::new();
        for (id, rate) in allocation.ids().zip(rates.iter().copied()) {
            if !rate.is_finite() {
                return Err(PredictionError::InvalidResponse(format!(
                    "non-finite return rate for {id}"
                )));
            }
            map.insert(id.clone(), rate);
        }
        Ok(map)
    }

    /// Every allocated asset needs a finite predicted change. Partial
    /// predictions are rejected outright.
    pub fn ensure_complete(
        allocation: &Allocation,
        price_changes: &AssetMap,
    ) -> Result<(), PredictionError> {
        let missing: Vec<_> = allocation
            .ids()
            .filter(|id| !price_changes.get(id).is_some_and(f64::is_finite))
            .cloned()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PredictionError::IncompletePrediction { missing })
        }
    }

    fn report_claim_mismatch(
        provider: &str,
        response: &PredictionResponse,
        result: &CalculationResult,
    ) {
        let claims = [
            ("totalProfitLoss", response.total_profit_loss, result.total_profit_loss),
            ("percentageChange", response.percentage_change, result.percentage_change),
            ("finalValue", response.final_value, result.final_value),
        ];
        for (field, claimed, actual) in claims {
            if let Some(claimed) = claimed {
                if (claimed - actual).abs() > CLAIM_MISMATCH_TOLERANCE {
                    warn!("{provider} claimed {field}={claimed}, recomputed {actual}; using recomputed value");
                }
            }
        }
    }
}

impl Default for PredictionService {
    fn default() -> Self {
        Self::new()
    }
}
