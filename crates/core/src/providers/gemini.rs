use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::prompt::{build_prediction_prompt, build_simulation_prompt};
use super::traits::PredictionProvider;
use crate::errors::PredictionError;
use crate::models::allocation::Allocation;
use crate::models::prediction::{
    PredictionRequest, PredictionResponse, SimulationRequest, SimulationResponse,
};
use crate::models::settings::Settings;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const PROVIDER: &str = "Gemini";

/// Google Gemini provider (Generative Language REST API).
///
/// - **Auth**: API key sent in the `x-goog-api-key` header, never in the URL.
/// - **Endpoint**: `POST /models/{model}:generateContent`
/// - **Output**: JSON mime type is requested; the text part is parsed into
///   the typed response shapes.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    currency: String,
    horizon_days: u32,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(60));
        let defaults = Settings::default();
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
            currency: defaults.currency,
            horizon_days: defaults.horizon_days,
        }
    }

    /// Build from settings; requires a `gemini` API key.
    pub fn from_settings(settings: &Settings) -> Result<Self, PredictionError> {
        let key = settings
            .api_key("gemini")
            .ok_or_else(|| PredictionError::MissingApiKey("gemini".into()))?;
        let mut provider = Self::new(key, settings.model.clone());
        provider.currency = settings.currency.clone();
        provider.horizon_days = settings.horizon_days;
        Ok(provider)
    }

    /// Point at a different endpoint (proxies, local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send instruction + JSON payload, return the model's text.
    async fn generate(&self, instruction: String, payload: String) -> Result<String, PredictionError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: instruction }, Part { text: payload }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        debug!("{PROVIDER}: generateContent with model {}", self.model);

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(PredictionError::Api {
                provider: PROVIDER.into(),
                message,
            });
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| PredictionError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse response: {e}"),
        })?;

        parsed.first_text().ok_or_else(|| PredictionError::Api {
            provider: PROVIDER.into(),
            message: "Model returned no content".into(),
        })
    }
}

// ── Gemini API request/response types ───────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PredictionProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn predict(
        &self,
        investment: f64,
        allocation: &Allocation,
    ) -> Result<PredictionResponse, PredictionError> {
        let payload = serde_json::to_string(&PredictionRequest {
            investment,
            allocations: allocation,
        })
        .map_err(|e| PredictionError::InvalidResponse(format!("request encoding: {e}")))?;
        let instruction = build_prediction_prompt(allocation, &self.currency, self.horizon_days);

        let text = self.generate(instruction, payload).await?;
        PredictionResponse::parse(&text)
    }

    async fn simulate(&self, count: usize) -> Result<Vec<f64>, PredictionError> {
        let payload = serde_json::to_string(&SimulationRequest {
            number_of_scenarios: count,
        })
        .map_err(|e| PredictionError::InvalidResponse(format!("request encoding: {e}")))?;

        let text = self.generate(build_simulation_prompt(), payload).await?;
        SimulationResponse::parse(&text)?.into_rates(count)
    }
}
