use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default model used for predictions and simulations.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Runtime configuration for the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Currency the investment is entered in (e.g., "IDR", "USD").
    pub currency: String,

    /// Generative model id passed to the prediction provider.
    pub model: String,

    /// Prediction horizon mentioned to the model, in days.
    pub horizon_days: u32,

    /// Default number of return rates requested in simulation mode.
    pub scenario_count: usize,

    /// API keys by provider name (e.g., "gemini").
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "IDR".to_string(),
            model: DEFAULT_MODEL.to_string(),
            horizon_days: 7,
            scenario_count: 5,
            api_keys: HashMap::new(),
        }
    }
}

impl Settings {
    /// Defaults overlaid with environment variables:
    /// `GEMINI_API_KEY` (or `GOOGLE_API_KEY`), `PROFIT_GAZER_MODEL`,
    /// `PROFIT_GAZER_CURRENCY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("GOOGLE_API_KEY")) {
            settings.api_keys.insert("gemini".to_string(), key);
        }
        if let Some(model) = non_empty("PROFIT_GAZER_MODEL") {
            settings.model = model;
        }
        if let Some(currency) = non_empty("PROFIT_GAZER_CURRENCY") {
            settings.currency = currency.trim().to_uppercase();
        }
        settings
    }

    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).map(String::as_str)
    }
}
