//! District name to coordinate resolution.
//!
//! [`Resolver`] tries, in order, the local coordinate table, its
//! [`GeocodeCache`], and then each of the [`candidate_queries`] against the
//! primary provider. The first variant that returns anything is scored with
//! [`pick_best`] and the winner is cached under the original input.

use std::sync::Arc;

use sigungu_data_processing::LocalCoordinateTable;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

use crate::config::ResolverConfig;
use crate::geocode::{GeoPoint, GeocodeProvider, Origin, Resolution};

mod cache;
mod candidates;
mod score;

pub use cache::GeocodeCache;
pub use candidates::{candidate_queries, insert_suffix_spaces};
pub use score::{pick_best, score_place};

pub struct Resolver {
    coords: LocalCoordinateTable,
    cache: GeocodeCache,
    provider: Arc<dyn GeocodeProvider>,
    config: ResolverConfig,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("coords", &self.coords.len())
            .field("cached", &self.cache.len())
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Resolver {
    pub fn new(
        coords: LocalCoordinateTable,
        provider: Arc<dyn GeocodeProvider>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            coords,
            cache: GeocodeCache::new(),
            provider,
            config,
        }
    }

    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }

    pub fn coords(&self) -> &LocalCoordinateTable {
        &self.coords
    }

    pub fn provider(&self) -> &Arc<dyn GeocodeProvider> {
        &self.provider
    }

    /// Forget every cached resolution. The local table is untouched.
    pub fn clear(&self) {
        self.cache.clear();
        info!("Geocode cache cleared");
    }

    /// Resolve a district name (or any place text) to a point.
    pub async fn resolve(&self, input: &str) -> Resolution {
        self.resolve_with_cancel(input, &CancellationToken::new())
            .await
    }

    /// Like [`Resolver::resolve`], but gives up with [`Resolution::Cancelled`]
    /// as soon as `cancel` fires. A cancelled lookup caches nothing.
    #[instrument(name = "Resolve district", level = "debug", skip(self, cancel))]
    pub async fn resolve_with_cancel(&self, input: &str, cancel: &CancellationToken) -> Resolution {
        if input.trim().is_empty() {
            return Resolution::NotFound;
        }

        if let Some(local) = self.coords.get(input) {
            trace!("Local coordinate table hit");
            return Resolution::Found {
                point: GeoPoint::from(local),
                origin: Origin::Local,
            };
        }

        let slot = self.cache.slot(input);
        if let Some(point) = slot.get() {
            trace!("Cache hit");
            return Resolution::Found {
                point: point.clone(),
                origin: Origin::Cache,
            };
        }

        let mut fresh = None;
        let fresh_origin = &mut fresh;
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            result = slot.get_or_try_init(|| async move {
                match self.query_variants(input, cancel).await {
                    Resolution::Found { point, origin } => {
                        *fresh_origin = Some(origin);
                        Ok(point)
                    }
                    miss => Err(miss),
                }
            }) => Some(result.cloned()),
        };

        match outcome {
            Some(Ok(point)) => Resolution::Found {
                point,
                // another caller finished the lookup while this one waited
                origin: fresh.unwrap_or(Origin::Cache),
            },
            Some(Err(miss)) => {
                self.cache.release(input, slot);
                miss
            }
            None => {
                debug!("Resolution cancelled");
                self.cache.release(input, slot);
                Resolution::Cancelled
            }
        }
    }

    /// Try each candidate variant in order; score the first non-empty answer.
    async fn query_variants(&self, input: &str, cancel: &CancellationToken) -> Resolution {
        let provider = self.provider.name();
        for variant in candidate_queries(input) {
            if cancel.is_cancelled() {
                return Resolution::Cancelled;
            }

            let places = match self.provider.search(&variant, self.config.result_count).await {
                Ok(places) => places,
                Err(e) => {
                    warn!(provider, %variant, error = %e, "Provider failed for variant");
                    continue;
                }
            };

            let Some(best) = pick_best(input, &places) else {
                trace!(%variant, "No results for variant");
                continue;
            };

            debug!(%variant, candidates = places.len(), chosen = %best.name, "Variant resolved");
            return Resolution::Found {
                point: best.clone().into(),
                origin: Origin::Provider {
                    provider: provider.to_string(),
                    query: variant,
                },
            };
        }

        debug!(provider, "Every variant came back empty");
        Resolution::NotFound
    }
}
