use std::time::Duration;

use crate::error::SigunguError;

pub const OPEN_METEO_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = concat!("sigungu/", env!("CARGO_PKG_VERSION"));
/// Open-Meteo rejects larger `count` values.
const MAX_RESULT_COUNT: usize = 100;

/// Query matcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of districts returned per query
    pub limit: usize,
    /// Queries with fewer normalized characters return nothing
    pub min_query_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            min_query_chars: 2,
        }
    }
}

/// Geocode resolver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Results requested from the provider per candidate variant
    pub result_count: usize,
    /// Language hint passed to providers
    pub language: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            result_count: 10,
            language: "ko".to_string(),
        }
    }
}

/// HTTP provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub open_meteo_url: String,
    pub nominatim_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            open_meteo_url: OPEN_METEO_URL.to_string(),
            nominatim_url: NOMINATIM_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Interactive search session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long input must stay unchanged before a lookup runs
    pub debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
        }
    }
}

/// Full configuration of a [`crate::LocationService`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    pub search: SearchConfig,
    pub resolver: ResolverConfig,
    pub provider: ProviderConfig,
    pub session: SessionConfig,
}

impl ServiceConfig {
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::new()
    }

    /// Reject settings that would make every search or lookup come back empty.
    pub fn validate(&self) -> Result<(), SigunguError> {
        if self.search.limit == 0 {
            return Err(SigunguError::ConfigError(
                "Search limit must be at least 1".to_string(),
            ));
        }
        if self.search.min_query_chars == 0 {
            return Err(SigunguError::ConfigError(
                "Minimum query length must be at least 1 character".to_string(),
            ));
        }
        if !(1..=MAX_RESULT_COUNT).contains(&self.resolver.result_count) {
            return Err(SigunguError::ConfigError(format!(
                "Provider result count must be between 1 and {MAX_RESULT_COUNT}, got {}",
                self.resolver.result_count
            )));
        }
        if self.resolver.language.trim().is_empty() {
            return Err(SigunguError::ConfigError(
                "Language hint must not be empty".to_string(),
            ));
        }
        if self.provider.timeout.is_zero() {
            return Err(SigunguError::ConfigError(
                "Provider timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for creating service configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    /// Create a new builder with sensible defaults
    pub fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
        }
    }

    /// Snappy typing feedback: shorter debounce, fewer suggestions, quicker timeout
    pub fn responsive() -> Self {
        let mut builder = Self::new();
        builder.config.search.limit = 5;
        builder.config.session.debounce = Duration::from_millis(100);
        builder.config.provider.timeout = Duration::from_secs(5);
        builder
    }

    /// More provider candidates to disambiguate from, longer timeout
    pub fn thorough() -> Self {
        let mut builder = Self::new();
        builder.config.resolver.result_count = 20;
        builder.config.session.debounce = Duration::from_millis(300);
        builder.config.provider.timeout = Duration::from_secs(20);
        builder
    }

    /// Set the maximum number of district suggestions
    pub fn limit(mut self, limit: usize) -> Self {
        self.config.search.limit = limit;
        self
    }

    /// Set the minimum normalized query length
    pub fn min_query_chars(mut self, chars: usize) -> Self {
        self.config.search.min_query_chars = chars;
        self
    }

    /// Set how many provider results are scored per variant
    pub fn result_count(mut self, count: usize) -> Self {
        self.config.resolver.result_count = count;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.resolver.language = language.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.provider.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.provider.user_agent = user_agent.into();
        self
    }

    pub fn open_meteo_url(mut self, url: impl Into<String>) -> Self {
        self.config.provider.open_meteo_url = url.into();
        self
    }

    pub fn nominatim_url(mut self, url: impl Into<String>) -> Self {
        self.config.provider.nominatim_url = url.into();
        self
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.config.session.debounce = debounce;
        self
    }

    /// Validate and build the final configuration
    pub fn build(self) -> Result<ServiceConfig, SigunguError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
