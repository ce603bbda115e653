use async_trait::async_trait;
use serde::Deserialize;
use tracing::{instrument, trace};

use super::{GeocodeProvider, ProviderError, ProviderPlace, http_client};
use crate::config::ProviderConfig;

const PROVIDER: &str = "open-meteo";

/// Open-Meteo geocoding API (`/v1/search`), the primary provider.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    client: reqwest::Client,
    url: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<RawPlace>>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    #[serde(default)]
    id: Option<i64>,
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    admin1: Option<String>,
    #[serde(default)]
    admin2: Option<String>,
}

impl From<RawPlace> for ProviderPlace {
    fn from(raw: RawPlace) -> Self {
        Self {
            id: raw.id.map(|id| id.to_string()),
            name: raw.name,
            latitude: raw.latitude,
            longitude: raw.longitude,
            country: raw.country,
            admin1: raw.admin1,
            admin2: raw.admin2,
        }
    }
}

impl OpenMeteoProvider {
    pub fn new(config: &ProviderConfig, language: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self::with_client(
            http_client(config)?,
            config.open_meteo_url.clone(),
            language,
        ))
    }

    pub fn with_client(
        client: reqwest::Client,
        url: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            language: language.into(),
        }
    }

    /// Decode a response body. A missing or empty `results` field is no match.
    pub(crate) fn parse_response(body: &str) -> Result<Vec<ProviderPlace>, ProviderError> {
        let response: SearchResponse =
            serde_json::from_str(body).map_err(|e| ProviderError::Malformed {
                provider: PROVIDER,
                reason: e.to_string(),
            })?;
        Ok(response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(ProviderPlace::from)
            .collect())
    }
}

#[async_trait]
impl GeocodeProvider for OpenMeteoProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(name = "Open-Meteo search", level = "debug", skip(self))]
    async fn search(&self, query: &str, count: usize) -> Result<Vec<ProviderPlace>, ProviderError> {
        let count = count.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("name", query),
                ("count", count.as_str()),
                ("language", self.language.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status,
            });
        }

        let places = Self::parse_response(&response.text().await?)?;
        trace!(results = places.len(), "Open-Meteo responded");
        Ok(places)
    }
}
