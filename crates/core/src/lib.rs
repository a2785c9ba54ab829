pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use log::{debug, info, warn};

use errors::{CoreError, PredictionError};
use models::{
    allocation::{Allocation, AssetMap, PriceChange},
    prediction::AIPrediction,
    result::CalculationResult,
    settings::Settings,
};
use providers::{gemini::GeminiProvider, traits::PredictionProvider};
use services::{
    calculation_service::CalculationService, prediction_service::PredictionService,
    validation_service::ValidationService,
};
use storage::{
    format::FormSnapshot,
    manager::SnapshotManager,
    store::{MemoryStore, SnapshotStore},
};

/// Main entry point for the Profit Gazer core library.
///
/// Runs the validate → (predict) → calculate flow and keeps the last
/// successful result. A failed operation never touches that result.
#[must_use]
pub struct ProfitGazer {
    settings: Settings,
    provider: Option<Box<dyn PredictionProvider>>,
    store: Box<dyn SnapshotStore>,
    validation_service: ValidationService,
    calculation_service: CalculationService,
    prediction_service: PredictionService,
    last_result: Option<CalculationResult>,
}

impl std::fmt::Debug for ProfitGazer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfitGazer")
            .field("currency", &self.settings.currency)
            .field("model", &self.settings.model)
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("has_result", &self.last_result.is_some())
            .finish()
    }
}

impl ProfitGazer {
    /// Calculator with the given settings, an in-memory snapshot store and
    /// no prediction provider.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            provider: None,
            store: Box::new(MemoryStore::new()),
            validation_service: ValidationService::new(),
            calculation_service: CalculationService::new(),
            prediction_service: PredictionService::new(),
            last_result: None,
        }
    }

    /// Like [`ProfitGazer::new`], wiring up Gemini when a key is configured.
    pub fn from_settings(settings: Settings) -> Self {
        let provider = match GeminiProvider::from_settings(&settings) {
            Ok(p) => Some(Box::new(p) as Box<dyn PredictionProvider>),
            Err(e) => {
                debug!("AI predictions disabled: {e}");
                None
            }
        };
        let mut gazer = Self::new(settings);
        gazer.provider = provider;
        gazer
    }

    pub fn with_provider(mut self, provider: Box<dyn PredictionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_store(mut self, store: Box<dyn SnapshotStore>) -> Self {
        self.store = store;
        self
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    // ── Form State ──────────────────────────────────────────────────

    /// The pre-filled form used when nothing usable is stored.
    #[must_use]
    pub fn default_form(&self) -> FormSnapshot {
        FormSnapshot::default_form()
    }

    /// Last saved form, or the default form if the stored one is missing
    /// or invalid.
    #[must_use]
    pub fn restore_form(&self) -> FormSnapshot {
        SnapshotManager::restore(self.store.as_ref())
    }

    /// Saved price changes for the assets still allocated, so an AI run
    /// that fails does not lose what the user typed.
    fn carried_changes(&self, allocation: &Allocation) -> PriceChange {
        let saved = self.restore_form().price_changes;
        let mut carried = AssetMap::new();
        for id in allocation.ids() {
            if let Some(value) = saved.get(id) {
                carried.insert(id.clone(), value);
            }
        }
        carried
    }

    fn persist_form(&self, investment: f64, allocation: &Allocation, price_change: &PriceChange) {
        if let Err(e) = SnapshotManager::save(self.store.as_ref(), investment, allocation, price_change) {
            warn!("Failed to save form snapshot: {e}");
        }
    }

    // ── Validation ──────────────────────────────────────────────────

    /// Check investment and allocation without calculating anything.
    pub fn validate(&self, investment: f64, allocation: &Allocation) -> Result<(), CoreError> {
        Ok(self.validation_service.validate_request(investment, allocation)?)
    }

    // ── Calculation ─────────────────────────────────────────────────

    /// Manual mode: user-entered price-change percentages.
    pub fn calculate(
        &mut self,
        investment: f64,
        allocation: &Allocation,
        price_change: &PriceChange,
    ) -> Result<CalculationResult, CoreError> {
        self.validation_service.validate_request(investment, allocation)?;
        self.validation_service.validate_changes(allocation, price_change)?;
        self.persist_form(investment, allocation, price_change);

        let result = self
            .calculation_service
            .calculate(investment, allocation, price_change)?;
        info!(
            "Calculated {} assets: total P/L {} ({}%)",
            result.breakdown.len(),
            result.total_profit_loss,
            result.percentage_change
        );
        self.last_result = Some(result.clone());
        Ok(result)
    }

    /// AI mode: price changes come from the provider, every derived number
    /// is recomputed locally and the model's commentary is attached.
    pub async fn predict(
        &mut self,
        investment: f64,
        allocation: &Allocation,
    ) -> Result<CalculationResult, CoreError> {
        self.validation_service.validate_request(investment, allocation)?;
        let carried = self.carried_changes(allocation);
        self.persist_form(investment, allocation, &carried);

        let provider = self.provider.as_deref().ok_or(PredictionError::NoProvider)?;
        let result = self
            .prediction_service
            .predict(provider, investment, allocation)
            .await?;

        // The form shows the predicted changes afterwards.
        let predicted = result
            .breakdown
            .iter()
            .map(|e| (e.asset.as_str(), e.price_change));
        if let Ok(predicted) = AssetMap::from_pairs(predicted) {
            self.persist_form(investment, allocation, &predicted);
        }

        info!(
            "AI prediction via {}: total P/L {} ({}%)",
            provider.name(),
            result.total_profit_loss,
            result.percentage_change
        );
        self.last_result = Some(result.clone());
        Ok(result)
    }

    /// Prediction only, without computing or storing a result.
    pub async fn fetch_prediction(
        &self,
        investment: f64,
        allocation: &Allocation,
    ) -> Result<AIPrediction, CoreError> {
        self.validation_service.validate_request(investment, allocation)?;
        let provider = self.provider.as_deref().ok_or(PredictionError::NoProvider)?;
        Ok(self
            .prediction_service
            .fetch_prediction(provider, investment, allocation)
            .await?)
    }

    /// Scenario mode: one model-generated return rate per allocated asset,
    /// applied with the return-rate convention.
    pub async fn simulate(
        &mut self,
        investment: f64,
        allocation: &Allocation,
    ) -> Result<CalculationResult, CoreError> {
        self.validation_service.validate_request(investment, allocation)?;
        let carried = self.carried_changes(allocation);
        self.persist_form(investment, allocation, &carried);

        let provider = self.provider.as_deref().ok_or(PredictionError::NoProvider)?;
        let result = self
            .prediction_service
            .simulate(provider, investment, allocation)
            .await?;

        info!(
            "Simulated {} scenarios: total P/L {}",
            result.breakdown.len(),
            result.total_profit_loss
        );
        self.last_result = Some(result.clone());
        Ok(result)
    }

    /// Raw return rates for `count` scenarios (defaults to the configured
    /// scenario count when `None`).
    pub async fn generate_scenarios(&self, count: Option<usize>) -> Result<Vec<f64>, CoreError> {
        let count = count.unwrap_or(self.settings.scenario_count);
        let provider = self.provider.as_deref().ok_or(PredictionError::NoProvider)?;
        let rates = provider.simulate(count).await?;
        if rates.len() != count {
            return Err(PredictionError::ScenarioCountMismatch {
                expected: count,
                actual: rates.len(),
            }
            .into());
        }
        Ok(rates)
    }

    // ── Results ─────────────────────────────────────────────────────

    /// The most recent successful result, if any.
    #[must_use]
    pub fn last_result(&self) -> Option<&CalculationResult> {
        self.last_result.as_ref()
    }

    pub fn clear_result(&mut self) {
        self.last_result = None;
    }
}

impl Default for ProfitGazer {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
