use log::{debug, warn};

use crate::errors::{CoreError, ValidationError};
use crate::models::allocation::{Allocation, PriceChange};
use crate::services::validation_service::ValidationService;

use super::format::{self, FormSnapshot, SNAPSHOT_KEY};
use super::store::SnapshotStore;

/// High-level snapshot operations: persist and restore the last form.
pub struct SnapshotManager;

impl SnapshotManager {
    /// Stamp and write a snapshot. Callers run this only after the input
    /// passed validation.
    pub fn save(
        store: &dyn SnapshotStore,
        investment: f64,
        allocation: &Allocation,
        price_change: &PriceChange,
    ) -> Result<(), CoreError> {
        let mut snapshot = FormSnapshot::new(investment, allocation.clone(), price_change.clone());
        snapshot.saved_at = Some(chrono::Utc::now());
        let text = format::write_snapshot(&snapshot)?;
        store.save(SNAPSHOT_KEY, &text)
    }

    /// Load and validate the stored snapshot.
    ///
    /// `Ok(None)` when nothing is stored; an error when it is unreadable,
    /// of an unknown version, or fails the same checks as live input.
    pub fn load(store: &dyn SnapshotStore) -> Result<Option<FormSnapshot>, CoreError> {
        let Some(text) = store.load(SNAPSHOT_KEY)? else {
            return Ok(None);
        };
        let snapshot = format::read_snapshot(&text)?;

        let validator = ValidationService::new();
        validator.validate_request(snapshot.investment, &snapshot.allocations)?;
        // Changes are optional in a snapshot; only check the ones present.
        for (asset, value) in snapshot.price_changes.iter() {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteChange {
                    asset: asset.clone(),
                    value,
                }
                .into());
            }
        }
        Ok(Some(snapshot))
    }

    /// Never fails: anything unusable is discarded and the default form
    /// is returned instead.
    pub fn restore(store: &dyn SnapshotStore) -> FormSnapshot {
        match Self::load(store) {
            Ok(Some(snapshot)) => {
                debug!("Restored form snapshot with {} assets", snapshot.allocations.len());
                snapshot
            }
            Ok(None) => FormSnapshot::default_form(),
            Err(e) => {
                warn!("Discarding stored form snapshot: {e}");
                FormSnapshot::default_form()
            }
        }
    }
}
