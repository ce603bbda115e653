//! The [`LocationService`] facade.
//!
//! Ties the offline [`DistrictMatcher`], the [`Resolver`] and the free-text
//! [`ProviderChain`] together behind one handle.
//!
//! ```rust,no_run
//! use sigungu::LocationService;
//!
//! # async fn run() -> Result<(), sigungu::error::SigunguError> {
//! let service = LocationService::new_embedded()?;
//!
//! // Instant, offline
//! let districts = service.search_districts("강남구");
//!
//! // May hit the network once, then cached
//! if let Some(first) = districts.first() {
//!     if let Some(point) = service.coords_for_district(first).await {
//!         println!("{first}: {point}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use itertools::Itertools;
use sigungu_data_processing::{IndexMetadata, contains_hangul};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::ServiceConfig;
use crate::data::{DistrictData, embedded::METADATA};
use crate::error::{Result, SigunguError};
use crate::geocode::{GeoPoint, GeocodeProvider, ProviderChain, Resolution};
use crate::resolve::Resolver;
use crate::search::DistrictMatcher;
use crate::session::SearchSession;

/// Place search ignores anything shorter than this many characters.
const MIN_PLACE_QUERY_CHARS: usize = 2;
/// Maximum number of places returned by [`LocationService::search_places`].
const PLACE_LIMIT: usize = 10;
/// Points closer than this (in degrees, per axis) with the same name are one place.
const SAME_PLACE_TOLERANCE: f64 = 0.01;

/// District search and geocoding for Korean administrative areas.
///
/// Create one per process and share it; the geocode cache lives inside.
pub struct LocationService {
    matcher: Arc<DistrictMatcher>,
    resolver: Resolver,
    chain: ProviderChain,
    config: ServiceConfig,
    embedded: bool,
}

impl std::fmt::Debug for LocationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationService")
            .field("districts", &self.matcher.corpus().len())
            .field("resolver", &self.resolver)
            .field("chain", &self.chain)
            .field("embedded", &self.embedded)
            .finish_non_exhaustive()
    }
}

impl LocationService {
    /// Use the data compiled into the library and the default HTTP providers.
    #[instrument(name = "Create LocationService with embedded data", level = "info")]
    pub fn new_embedded() -> Result<Self> {
        Self::builder().build()
    }

    /// Load artifacts from `dir` and use the default HTTP providers.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::builder().data_dir(dir).build()
    }

    /// Assemble a service from loaded data and an explicit provider chain.
    ///
    /// The chain's first provider also serves scored district resolution.
    pub fn from_parts(data: DistrictData, chain: ProviderChain, config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let primary = chain.primary().cloned().ok_or_else(|| {
            SigunguError::ConfigError("At least one geocoding provider is required".to_string())
        })?;

        let DistrictData {
            corpus,
            index,
            coords,
        } = data;
        let matcher = DistrictMatcher::new(corpus, index, config.search.clone());
        let resolver = Resolver::new(coords, primary, config.resolver.clone());

        info!(
            districts = matcher.corpus().len(),
            indexed = matcher.has_index(),
            coords = resolver.coords().len(),
            ?chain,
            "LocationService ready"
        );

        Ok(Self {
            matcher: Arc::new(matcher),
            resolver,
            chain,
            config,
            embedded: false,
        })
    }

    pub fn builder() -> LocationServiceBuilder {
        LocationServiceBuilder::new()
    }

    pub fn info(&self) -> ServiceInfo {
        ServiceInfo {
            districts: self.matcher.corpus().len(),
            indexed: self.matcher.has_index(),
            local_coords: self.resolver.coords().len(),
            cached: self.resolver.cache().len(),
            providers: self.chain.len(),
            embedded_metadata: self.embedded.then(|| (*METADATA).clone()).flatten(),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn matcher(&self) -> &DistrictMatcher {
        &self.matcher
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Offline district suggestions for partial input.
    pub fn search_districts(&self, query: &str) -> Vec<String> {
        self.matcher.search(query)
    }

    pub async fn resolve(&self, district: &str) -> Resolution {
        self.resolver.resolve(district).await
    }

    pub async fn resolve_with_cancel(&self, district: &str, cancel: &CancellationToken) -> Resolution {
        self.resolver.resolve_with_cancel(district, cancel).await
    }

    /// Coordinates of a district, if any tier can place it.
    pub async fn coords_for_district(&self, district: &str) -> Option<GeoPoint> {
        self.resolver.resolve(district).await.into_point()
    }

    /// Free-text geocoding through the provider chain, without scoring or caching.
    pub async fn geocode(&self, query: &str) -> Resolution {
        self.chain.resolve(query).await
    }

    /// Places matching free text, for a suggestion list.
    ///
    /// Hangul input is first matched against the district corpus and each
    /// match resolved (and cached); if none resolves, or the input has no
    /// Hangul, the primary provider is asked directly. Duplicate places are
    /// removed and at most ten are returned.
    #[instrument(name = "Search places", level = "debug", skip(self))]
    pub async fn search_places(&self, query: &str) -> Vec<GeoPoint> {
        let query = query.trim();
        if query.chars().count() < MIN_PLACE_QUERY_CHARS {
            return Vec::new();
        }

        let mut places = Vec::new();
        if contains_hangul(query) {
            for district in self.matcher.search(query) {
                if let Some(mut point) = self.resolver.resolve(&district).await.into_point() {
                    point.name.get_or_insert(district);
                    places.push(point);
                }
            }
            debug!(resolved = places.len(), "Resolved matching districts");
        }

        if places.is_empty() {
            places = self.provider_places(query).await;
        }

        dedup_places(places)
    }

    async fn provider_places(&self, query: &str) -> Vec<GeoPoint> {
        let provider = self.resolver.provider();
        match provider.search(query, self.config.resolver.result_count).await {
            Ok(places) => places.into_iter().map(GeoPoint::from).collect(),
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "Place search failed");
                Vec::new()
            }
        }
    }

    /// A debounced search session over this service's district matcher.
    pub fn session(&self) -> SearchSession {
        SearchSession::new(Arc::clone(&self.matcher), self.config.session.debounce)
    }

    pub fn clear_cache(&self) {
        self.resolver.clear();
    }
}

/// Keep the first of any places sharing a name within [`SAME_PLACE_TOLERANCE`].
fn dedup_places(places: Vec<GeoPoint>) -> Vec<GeoPoint> {
    let mut kept: Vec<GeoPoint> = Vec::with_capacity(places.len().min(PLACE_LIMIT));
    for place in places {
        let duplicate = kept
            .iter()
            .any(|k| k.name == place.name && k.is_near(&place, SAME_PLACE_TOLERANCE));
        if !duplicate {
            kept.push(place);
        }
    }
    kept.into_iter().take(PLACE_LIMIT).collect_vec()
}

/// Snapshot of a [`LocationService`]'s data and state.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub districts: usize,
    pub indexed: bool,
    pub local_coords: usize,
    pub cached: usize,
    pub providers: usize,
    pub embedded_metadata: Option<IndexMetadata>,
}

impl ServiceInfo {
    /// Get a human-readable summary of the service.
    pub fn summary(&self) -> String {
        format!(
            "{} districts ({}), {} local coordinates, {} cached, {} providers",
            self.districts,
            if self.indexed { "indexed" } else { "scan" },
            self.local_coords,
            self.cached,
            self.providers,
        )
    }

    pub fn is_embedded(&self) -> bool {
        self.embedded_metadata.is_some()
    }
}

/// Builder for creating a [`LocationService`] with custom data, configuration
/// or providers.
#[derive(Default)]
pub struct LocationServiceBuilder {
    data: Option<DistrictData>,
    data_dir: Option<PathBuf>,
    config: Option<ServiceConfig>,
    providers: Vec<Arc<dyn GeocodeProvider>>,
}

impl LocationServiceBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use already loaded data.
    #[must_use]
    pub fn data(mut self, data: DistrictData) -> Self {
        self.data = Some(data);
        self
    }

    /// Load artifacts from a directory instead of the embedded data.
    #[must_use]
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Append a provider. Without any, Open-Meteo then Nominatim are used.
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn GeocodeProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn build(self) -> Result<LocationService> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let (data, embedded) = match (self.data, self.data_dir) {
            (Some(data), _) => (data, false),
            (None, Some(dir)) => (DistrictData::from_dir(dir)?, false),
            (None, None) => (DistrictData::embedded()?, true),
        };

        let chain = if self.providers.is_empty() {
            ProviderChain::standard(&config.provider, &config.resolver)?
        } else {
            ProviderChain::new(self.providers)
        };

        let mut service = LocationService::from_parts(data, chain, config)?;
        service.embedded = embedded;
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use sigungu_data_processing::{LocalCoordinateTable, build_token_index, test_data};

    use super::*;
    use crate::geocode::ProviderPlace;
    use crate::test_support::MockProvider;

    fn sample_data() -> DistrictData {
        let built = build_token_index(test_data::sample_corpus());
        DistrictData::from_parts(built.corpus, Some(built.index), test_data::sample_coords())
    }

    fn service(provider: &Arc<MockProvider>) -> LocationService {
        LocationService::builder()
            .data(sample_data())
            .provider(provider.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_chain_is_rejected() {
        let result = LocationService::from_parts(
            sample_data(),
            ProviderChain::default(),
            ServiceConfig::default(),
        );
        assert!(matches!(result, Err(SigunguError::ConfigError(_))));
    }

    #[test]
    fn test_builder_validates_raw_config() {
        let provider = Arc::new(MockProvider::new("mock"));
        let mut config = ServiceConfig::default();
        config.provider.timeout = std::time::Duration::ZERO;

        let result = LocationService::builder()
            .data(sample_data())
            .config(config.clone())
            .provider(provider.clone())
            .build();
        assert!(matches!(result, Err(SigunguError::ConfigError(_))));

        config.provider.timeout = std::time::Duration::from_secs(3);
        config.search.limit = 0;
        let direct = LocationService::from_parts(
            sample_data(),
            ProviderChain::new(vec![provider as Arc<dyn GeocodeProvider>]),
            config,
        );
        assert!(matches!(direct, Err(SigunguError::ConfigError(_))));
    }

    #[test]
    fn test_info() {
        let provider = Arc::new(MockProvider::new("mock"));
        let info = service(&provider).info();
        assert_eq!(info.districts, 20);
        assert!(info.indexed);
        assert_eq!(info.local_coords, 2);
        assert!(!info.is_embedded());
        assert!(info.summary().starts_with("20 districts (indexed)"));
    }

    #[tokio::test]
    async fn test_short_place_queries_are_empty() {
        let provider = Arc::new(MockProvider::new("mock"));
        let service = service(&provider);
        assert!(service.search_places("").await.is_empty());
        assert!(service.search_places(" 서 ").await.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_hangul_places_come_from_districts() {
        let provider = Arc::new(
            MockProvider::new("mock")
                .with("부산광역시-해운대구", vec![ProviderPlace::new("해운대구", 35.163, 129.163)])
                .with("부산광역시-해운대구-우동", vec![ProviderPlace::new("우동", 35.166, 129.158)]),
        );
        let service = service(&provider);

        let places = service.search_places("해운대구").await;
        let names: Vec<_> = places.iter().filter_map(|p| p.name.as_deref()).collect();
        assert_eq!(names, vec!["해운대구", "우동"]);
        assert_eq!(service.resolver().cache().len(), 2);
    }

    #[tokio::test]
    async fn test_local_district_points_are_named_after_the_district() {
        let provider = Arc::new(MockProvider::new("mock"));
        let mut coords = LocalCoordinateTable::new();
        coords.insert(
            "서울특별시-중구",
            sigungu_data_processing::LocalCoordinate::new(37.5641, 126.9979),
        );
        let built = build_token_index(test_data::sample_corpus());
        let service = LocationService::builder()
            .data(DistrictData::from_parts(built.corpus, Some(built.index), coords))
            .provider(provider.clone())
            .build()
            .unwrap();

        let places = service.search_places("서울특별시 중구").await;
        assert_eq!(places[0].name.as_deref(), Some("서울특별시-중구"));
    }

    #[tokio::test]
    async fn test_unresolved_hangul_falls_back_to_provider() {
        let provider = Arc::new(
            MockProvider::new("mock").with("경복궁", vec![ProviderPlace::new("경복궁", 37.5796, 126.977)]),
        );
        let service = service(&provider);
        let places = service.search_places("경복궁").await;
        assert_eq!(places.len(), 1);
        assert_eq!(provider.queries(), vec!["경복궁"]);
    }

    #[tokio::test]
    async fn test_latin_queries_go_to_provider_and_dedup() {
        let provider = Arc::new(MockProvider::new("mock").with(
            "Paris",
            vec![
                ProviderPlace::new("Paris", 48.8566, 2.3522),
                ProviderPlace::new("Paris", 48.8600, 2.3500),
                ProviderPlace::new("Paris", 33.6609, -95.5555),
            ],
        ));
        let service = service(&provider);
        let places = service.search_places("Paris").await;
        assert_eq!(places.len(), 2);
        assert!((places[1].lat - 33.6609).abs() < 1e-9);
    }

    #[test]
    fn test_dedup_places_limits_results() {
        let places = (0..15)
            .map(|i| {
                let mut p = GeoPoint::new(f64::from(i), 0.0);
                p.name = Some(format!("P{i}"));
                p
            })
            .collect();
        assert_eq!(dedup_places(places).len(), PLACE_LIMIT);
    }

    #[tokio::test]
    async fn test_geocode_uses_chain() {
        let primary = Arc::new(MockProvider::new("primary"));
        let secondary = Arc::new(
            MockProvider::new("secondary").with("N Seoul Tower", vec![ProviderPlace::new("N서울타워", 37.5512, 126.9882)]),
        );
        let service = LocationService::builder()
            .data(sample_data())
            .provider(primary.clone())
            .provider(secondary.clone())
            .build()
            .unwrap();

        assert!(service.geocode("N Seoul Tower").await.is_found());
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
        // free-text results are not cached
        assert!(service.resolver().cache().is_empty());
    }
}
