use crate::errors::ValidationError;
use crate::models::allocation::{Allocation, AssetMap, PriceChange, ReturnRates};
use crate::models::portfolio::{ChangeConvention, Portfolio};
use crate::models::result::{AssetBreakdownEntry, CalculationResult};

/// Computes profit/loss projections from validated input.
///
/// Stateless and referentially transparent: identical inputs give
/// bit-identical results. Preconditions (positive investment, valid
/// allocation) are checked by `ValidationService`, not here. The only
/// failure is an allocated asset without a change entry.
pub struct CalculationService;

impl CalculationService {
    pub fn new() -> Self {
        Self
    }

    /// Price-change convention: `profit_loss = invested * change / 100`.
    pub fn calculate(
        &self,
        investment: f64,
        allocation: &Allocation,
        price_change: &PriceChange,
    ) -> Result<CalculationResult, ValidationError> {
        Self::compute(
            investment,
            allocation,
            price_change,
            ChangeConvention::PriceChangePercent,
        )
    }

    /// Return-rate convention: `profit_loss = invested * rate`.
    pub fn calculate_with_return_rates(
        &self,
        investment: f64,
        allocation: &Allocation,
        rates: &ReturnRates,
    ) -> Result<CalculationResult, ValidationError> {
        Self::compute(investment, allocation, rates, ChangeConvention::ReturnRate)
    }

    pub fn calculate_portfolio(
        &self,
        portfolio: &Portfolio,
    ) -> Result<CalculationResult, ValidationError> {
        Self::compute(
            portfolio.investment,
            &portfolio.allocation,
            &portfolio.changes,
            portfolio.convention,
        )
    }

    fn compute(
        investment: f64,
        allocation: &Allocation,
        changes: &AssetMap,
        convention: ChangeConvention,
    ) -> Result<CalculationResult, ValidationError> {
        let mut breakdown = Vec::with_capacity(allocation.len());
        let mut total_profit_loss = 0.0;

        for (asset, allocation_percent) in allocation.iter() {
            let change = changes
                .get(asset)
                .ok_or_else(|| ValidationError::MissingPriceChange(asset.clone()))?;

            let invested_amount = investment * (allocation_percent / 100.0);
            let profit_loss = convention.apply(invested_amount, change);
            total_profit_loss += profit_loss;

            breakdown.push(AssetBreakdownEntry {
                asset: asset.clone(),
                allocation_percent,
                price_change: change,
                invested_amount,
                profit_loss,
            });
        }

        Ok(CalculationResult {
            total_profit_loss,
            percentage_change: (total_profit_loss / investment) * 100.0,
            final_value: investment + total_profit_loss,
            breakdown,
            narrative: None,
            convention,
        })
    }
}

impl Default for CalculationService {
    fn default() -> Self {
        Self::new()
    }
}
