//! Geocoding providers and the types they exchange with the resolver.
//!
//! A provider answers a free-text name with zero or more ranked
//! [`ProviderPlace`]s. Providers report failures as [`ProviderError`]; callers
//! in this crate log and swallow them so that nothing above the provider call
//! site ever sees a network error.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sigungu_data_processing::LocalCoordinate;

mod chain;
mod nominatim;
mod open_meteo;

pub use chain::ProviderChain;
pub use error::ProviderError;
pub use nominatim::NominatimProvider;
pub use open_meteo::OpenMeteoProvider;

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum ProviderError {
        #[error("HTTP error: {0}")]
        Http(#[from] reqwest::Error),
        #[error("Unexpected response status {status} from {provider}")]
        Status {
            provider: &'static str,
            status: reqwest::StatusCode,
        },
        #[error("Malformed response from {provider}: {reason}")]
        Malformed {
            provider: &'static str,
            reason: String,
        },
    }
}

/// A resolved coordinate, optionally annotated with provider metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Province-level administrative area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin1: Option<String>,
    /// City/county-level administrative area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin2: Option<String>,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            name: None,
            admin1: None,
            admin2: None,
        }
    }

    /// Whether both points lie within `tolerance` degrees on each axis.
    pub fn is_near(&self, other: &Self, tolerance: f64) -> bool {
        (self.lat - other.lat).abs() < tolerance && (self.lon - other.lon).abs() < tolerance
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name} ")?;
        }
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

impl From<&LocalCoordinate> for GeoPoint {
    fn from(c: &LocalCoordinate) -> Self {
        Self {
            lat: c.lat,
            lon: c.lon,
            name: c.name.clone(),
            admin1: None,
            admin2: None,
        }
    }
}

/// One candidate returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPlace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin2: Option<String>,
}

impl ProviderPlace {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            latitude,
            longitude,
            country: None,
            admin1: None,
            admin2: None,
        }
    }

    pub fn with_admin1(mut self, admin1: impl Into<String>) -> Self {
        self.admin1 = Some(admin1.into());
        self
    }

    pub fn with_admin2(mut self, admin2: impl Into<String>) -> Self {
        self.admin2 = Some(admin2.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

impl From<ProviderPlace> for GeoPoint {
    fn from(p: ProviderPlace) -> Self {
        Self {
            lat: p.latitude,
            lon: p.longitude,
            name: Some(p.name),
            admin1: p.admin1,
            admin2: p.admin2,
        }
    }
}

/// Where a [`Resolution::Found`] point came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Pre-seeded local coordinate table
    Local,
    /// Earlier resolution of the same input
    Cache,
    /// A provider answered; `query` is the variant or text that was sent
    Provider { provider: String, query: String },
}

/// Outcome of resolving a name. Failures never escape as errors; exhaustion is
/// reported as [`Resolution::NotFound`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found { point: GeoPoint, origin: Origin },
    /// Every local tier, variant and provider was tried without a match
    NotFound,
    /// The caller cancelled before a match was found
    Cancelled,
}

impl Resolution {
    pub fn point(&self) -> Option<&GeoPoint> {
        match self {
            Self::Found { point, .. } => Some(point),
            Self::NotFound | Self::Cancelled => None,
        }
    }

    pub fn into_point(self) -> Option<GeoPoint> {
        match self {
            Self::Found { point, .. } => Some(point),
            Self::NotFound | Self::Cancelled => None,
        }
    }

    pub fn origin(&self) -> Option<&Origin> {
        match self {
            Self::Found { origin, .. } => Some(origin),
            Self::NotFound | Self::Cancelled => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// A free-text geocoding service.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Short identifier used in logs and [`Origin::Provider`].
    fn name(&self) -> &str;

    /// Up to `count` ranked places for `query`. No match is `Ok(vec![])`.
    async fn search(&self, query: &str, count: usize) -> Result<Vec<ProviderPlace>, ProviderError>;
}

/// Build the HTTP client shared by the bundled providers.
pub(crate) fn http_client(
    config: &crate::config::ProviderConfig,
) -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()?)
}
