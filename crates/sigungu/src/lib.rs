//! Sigungu - Korean district search and geocoding
//!
//! Sigungu turns partial, free-form input into Korean administrative districts
//! (`서울특별시-강남구-역삼동`) and districts into coordinates. District
//! suggestions come from a compiled-in token index and never touch the
//! network; coordinates come from a local table, a per-process cache, or a
//! geocoding provider whose ambiguous answers are scored against the district's
//! own hierarchy.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sigungu::{LocationService, Resolution};
//!
//! # async fn run() -> Result<(), sigungu::error::SigunguError> {
//! let service = LocationService::new_embedded()?;
//!
//! // Offline suggestions, at most ten. With the token index, each word
//! // must match a whole level such as 강남구 or 대치동.
//! let districts = service.search_districts("강남구");
//!
//! // Scored, cached resolution
//! match service.resolve("서울특별시-강남구").await {
//!     Resolution::Found { point, origin } => println!("{point} via {origin:?}"),
//!     Resolution::NotFound => println!("no match"),
//!     Resolution::Cancelled => {}
//! }
//!
//! // Any place, Open-Meteo then Nominatim
//! let tower = service.geocode("N Seoul Tower").await;
//! # Ok(())
//! # }
//! ```
//!
//! # Data
//!
//! A sample district corpus and seed coordinate table are processed by
//! `build.rs` and embedded in the library. Full artifacts built with
//! `sigungu build-index` and `sigungu precompute` load with
//! [`LocationService::from_dir`].
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod batch;
mod config;
mod core;
mod data;
pub mod error;
mod geocode;
mod resolve;
mod search;
mod session;
#[cfg(test)]
mod test_support;

pub use crate::core::{LocationService, LocationServiceBuilder, ServiceInfo};

pub use batch::{PrecomputeOptions, precompute_coordinates, precompute_file};
pub use config::{
    NOMINATIM_URL, OPEN_METEO_URL, ProviderConfig, ResolverConfig, SearchConfig, ServiceConfig,
    ServiceConfigBuilder, SessionConfig,
};
pub use data::DistrictData;
pub use geocode::{
    GeoPoint, GeocodeProvider, NominatimProvider, OpenMeteoProvider, Origin, ProviderChain,
    ProviderError, ProviderPlace, Resolution,
};
pub use resolve::{
    GeocodeCache, Resolver, candidate_queries, insert_suffix_spaces, pick_best, score_place,
};
pub use search::DistrictMatcher;
pub use session::{LookupSequencer, SearchSession};
pub use sigungu_data_processing as data_processing;
pub use tokio_util::sync::CancellationToken;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the Sigungu library.
///
/// Installs a `tracing` subscriber that honours `RUST_LOG` and otherwise shows
/// events at `level` and above. Later calls are no-ops.
///
/// # Examples
///
/// ```rust
/// use sigungu::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), sigungu::error::SigunguError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::SigunguError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("reqwest=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::MockProvider;

    fn setup_test_env() {
        let _ = init_logging(tracing::Level::WARN);
    }

    fn embedded_with(provider: &Arc<MockProvider>) -> LocationService {
        LocationService::builder()
            .data(DistrictData::embedded().unwrap())
            .provider(provider.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn test_init_logging_twice() {
        setup_test_env();
        assert!(init_logging(tracing::Level::DEBUG).is_ok());
    }

    #[test]
    fn test_embedded_service_creation() {
        setup_test_env();

        let service = LocationService::new_embedded();
        assert!(service.is_ok(), "Should be able to create service with embedded data");
        let info = service.unwrap().info();
        assert!(info.is_embedded());
        assert_eq!(info.providers, 2);
        assert_eq!(
            info.embedded_metadata.map(|m| m.districts),
            Some(info.districts)
        );
    }

    #[test]
    fn test_basic_district_search() {
        setup_test_env();

        let provider = Arc::new(MockProvider::new("mock"));
        let service = embedded_with(&provider);

        for term in ["강남구", "해운대구", "제주시", "성남시 분당구"] {
            let results = service.search_districts(term);
            assert!(!results.is_empty(), "Search for '{term}' should match");
            assert!(results.len() <= 10);
        }
        assert_eq!(service.search_districts("강남구")[0], "서울특별시-강남구");
    }

    #[test]
    fn test_embedded_index_matches_whole_levels() {
        setup_test_env();

        let provider = Arc::new(MockProvider::new("mock"));
        let service = embedded_with(&provider);
        assert!(service.search_districts("강남").is_empty());
        assert!(service.search_districts("해운대").is_empty());
        assert_eq!(service.search_districts("해운대구")[0], "부산광역시-해운대구");
        assert_eq!(
            service.search_districts("강남구 대치동"),
            vec!["서울특별시-강남구-대치동"]
        );
    }

    #[test]
    fn test_common_gu_names_are_bounded() {
        setup_test_env();

        let provider = Arc::new(MockProvider::new("mock"));
        let service = embedded_with(&provider);
        // six metropolitan cities have a 중구; Seoul's has three sub-districts listed
        let results = service.search_districts("중구");
        assert_eq!(results.len(), 9);
        assert_eq!(results[0], "서울특별시-중구");
        assert!(results.iter().all(|d| d.contains("중구")));
    }

    #[tokio::test]
    async fn test_embedded_seed_coordinates_need_no_provider() {
        setup_test_env();

        let provider = Arc::new(MockProvider::failing("mock"));
        let service = embedded_with(&provider);
        let point = service.coords_for_district("부산광역시").await.unwrap();
        assert!((point.lat - 35.1796).abs() < 1e-9);
        assert_eq!(provider.calls(), 0);
    }
}
