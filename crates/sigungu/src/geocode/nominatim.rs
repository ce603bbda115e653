use async_trait::async_trait;
use serde::Deserialize;
use tracing::{instrument, trace};

use super::{GeocodeProvider, ProviderError, ProviderPlace, http_client};
use crate::config::ProviderConfig;

const PROVIDER: &str = "nominatim";

/// OpenStreetMap Nominatim search, the secondary provider for free text.
///
/// Nominatim's usage policy requires an identifying user agent, which the
/// shared client sets from [`ProviderConfig::user_agent`].
#[derive(Debug, Clone)]
pub struct NominatimProvider {
    client: reqwest::Client,
    url: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    #[serde(default)]
    place_id: Option<i64>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    lat: String,
    lon: String,
    #[serde(default)]
    address: Option<RawAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAddress {
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    county: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

fn parse_coordinate(value: &str, field: &str) -> Result<f64, ProviderError> {
    value.trim().parse().map_err(|_| ProviderError::Malformed {
        provider: PROVIDER,
        reason: format!("{field} is not a number: {value:?}"),
    })
}

impl NominatimProvider {
    pub fn new(config: &ProviderConfig, language: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self::with_client(
            http_client(config)?,
            config.nominatim_url.clone(),
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

    /// Decode a `jsonv2` response body. `query` names places that come back
    /// without any name.
    pub(crate) fn parse_response(body: &str, query: &str) -> Result<Vec<ProviderPlace>, ProviderError> {
        let raw: Vec<RawPlace> = serde_json::from_str(body).map_err(|e| ProviderError::Malformed {
            provider: PROVIDER,
            reason: e.to_string(),
        })?;

        raw.into_iter()
            .map(|r| {
                let address = r.address.unwrap_or_default();
                Ok(ProviderPlace {
                    id: r.place_id.map(|id| id.to_string()),
                    name: r
                        .display_name
                        .or(r.name)
                        .unwrap_or_else(|| query.to_string()),
                    latitude: parse_coordinate(&r.lat, "lat")?,
                    longitude: parse_coordinate(&r.lon, "lon")?,
                    country: address.country_code.map(|c| c.to_uppercase()),
                    admin1: address.state.or(address.county),
                    admin2: address.city,
                })
            })
            .collect()
    }
}

#[async_trait]
impl GeocodeProvider for NominatimProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(name = "Nominatim search", level = "debug", skip(self))]
    async fn search(&self, query: &str, count: usize) -> Result<Vec<ProviderPlace>, ProviderError> {
        let limit = count.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("limit", limit.as_str()),
                ("addressdetails", "1"),
                ("accept-language", self.language.as_str()),
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

        let places = Self::parse_response(&response.text().await?, query)?;
        trace!(results = places.len(), "Nominatim responded");
        Ok(places)
    }
}
