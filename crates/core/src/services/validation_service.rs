use crate::errors::ValidationError;
use crate::models::allocation::{Allocation, AssetMap};
use crate::models::portfolio::Portfolio;

/// Allowed deviation of an allocation total from 100%. Strict: a total
/// exactly 0.01 away is rejected.
pub const ALLOCATION_TOLERANCE: f64 = 0.01;

/// Summation noise this close to the tolerance edge counts as reaching it,
/// so 50 + 50.01 (= 100.00999999999999) is rejected like 100.01.
const EDGE_EPSILON: f64 = 1e-9;

/// Input checks run before any calculation.
///
/// Pure predicates with a diagnostic payload; no side effects.
pub struct ValidationService;

impl ValidationService {
    pub fn new() -> Self {
        Self
    }

    /// Every value finite and within [0, 100], total within tolerance of 100.
    /// An empty allocation fails with `SumMismatch(0.0)`.
    pub fn validate_allocation(&self, allocation: &Allocation) -> Result<(), ValidationError> {
        for (asset, value) in allocation.iter() {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    asset: asset.clone(),
                    value,
                });
            }
        }

        let total = allocation.total();
        if (total - 100.0).abs() >= ALLOCATION_TOLERANCE - EDGE_EPSILON {
            return Err(ValidationError::SumMismatch(total));
        }
        Ok(())
    }

    pub fn validate_investment(&self, investment: f64) -> Result<(), ValidationError> {
        if !investment.is_finite() || investment <= 0.0 {
            return Err(ValidationError::InvalidInvestment(investment));
        }
        Ok(())
    }

    /// Every allocated asset has a finite change. Extra entries are ignored.
    pub fn validate_changes(
        &self,
        allocation: &Allocation,
        changes: &AssetMap,
    ) -> Result<(), ValidationError> {
        for asset in allocation.ids() {
            match changes.get(asset) {
                None => return Err(ValidationError::MissingPriceChange(asset.clone())),
                Some(value) if !value.is_finite() => {
                    return Err(ValidationError::NonFiniteChange {
                        asset: asset.clone(),
                        value,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Investment and allocation only; used before asking a model for changes.
    pub fn validate_request(
        &self,
        investment: f64,
        allocation: &Allocation,
    ) -> Result<(), ValidationError> {
        self.validate_investment(investment)?;
        self.validate_allocation(allocation)
    }

    pub fn validate_portfolio(&self, portfolio: &Portfolio) -> Result<(), ValidationError> {
        self.validate_request(portfolio.investment, &portfolio.allocation)?;
        self.validate_changes(&portfolio.allocation, &portfolio.changes)
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}
