use std::sync::Arc;

use orientall_core::{AiConfig, NetworkError, WeatherError};
use tracing::instrument;

use crate::backend::{GeminiBackend, GenerateOptions, GenerativeBackend};
use crate::classify::classify_backend_failure;
use crate::decode::decode_reply;
use crate::prompt::build_prompt;
use crate::types::{LocationQuery, Source, WeatherReport};

/// Answers weather queries by asking a generative backend with web search.
#[derive(Clone)]
pub struct WeatherService {
    backend: Arc<dyn GenerativeBackend>,
    config: AiConfig,
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WeatherService {
    pub fn new(config: AiConfig, backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend, config }
    }

    /// Build a service backed by Gemini.
    pub fn from_config(config: AiConfig) -> Result<Self, NetworkError> {
        let backend = GeminiBackend::new(&config)?;
        Ok(Self::new(config, Arc::new(backend)))
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Look up the current weather for a location.
    ///
    /// Makes at most one backend call. Every failure is returned as a
    /// [`WeatherError`] whose kind says what went wrong.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_weather(&self, query: &LocationQuery) -> Result<WeatherReport, WeatherError> {
        if !self.config.is_configured() {
            tracing::warn!("Weather lookup attempted without a configured API key");
            return Err(WeatherError::missing_credential());
        }

        let prompt = build_prompt(query);
        let generation = self
            .backend
            .generate(&prompt, &GenerateOptions::with_search())
            .await
            .map_err(|e| {
                let err = classify_backend_failure(e);
                tracing::error!(kind = %err.kind(), error = %err, "Weather backend call failed");
                err
            })?;

        let weather_data = decode_reply(&generation.text)?;
        let sources: Vec<Source> = generation
            .citations
            .into_iter()
            .filter(|s| !s.uri.is_empty())
            .collect();

        tracing::info!(city = %weather_data.city, sources = sources.len(), "Weather lookup succeeded");

        Ok(WeatherReport {
            weather_data,
            sources,
        })
    }

    pub async fn fetch_weather_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherReport, WeatherError> {
        self.fetch_weather(&LocationQuery::coordinates(latitude, longitude))
            .await
    }

    pub async fn fetch_weather_by_city(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        self.fetch_weather(&LocationQuery::city(city)).await
    }
}
