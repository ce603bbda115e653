use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::{GeocodeProvider, NominatimProvider, OpenMeteoProvider, Origin, ProviderError, Resolution};
use crate::config::{ProviderConfig, ResolverConfig};

/// Ordered list of providers for free-text lookups.
///
/// Each provider is asked for a single result; the first one to answer wins.
/// Nothing is scored or cached here.
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn GeocodeProvider>>,
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.name()))
            .finish()
    }
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn GeocodeProvider>>) -> Self {
        Self { providers }
    }

    /// Open-Meteo followed by Nominatim.
    pub fn standard(
        provider: &ProviderConfig,
        resolver: &ResolverConfig,
    ) -> Result<Self, ProviderError> {
        Ok(Self::new(vec![
            Arc::new(OpenMeteoProvider::new(provider, &resolver.language)?),
            Arc::new(NominatimProvider::new(provider, &resolver.language)?),
        ]))
    }

    #[must_use]
    pub fn push(mut self, provider: Arc<dyn GeocodeProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// The first provider, used by the resolver for scored lookups.
    pub fn primary(&self) -> Option<&Arc<dyn GeocodeProvider>> {
        self.providers.first()
    }

    #[instrument(name = "Geocode with fallback", level = "debug", skip(self))]
    pub async fn resolve(&self, query: &str) -> Resolution {
        let query = query.trim();
        if query.is_empty() {
            return Resolution::NotFound;
        }

        for provider in &self.providers {
            match provider.search(query, 1).await {
                Ok(places) => {
                    if let Some(place) = places.into_iter().next() {
                        debug!(provider = provider.name(), "Provider answered");
                        return Resolution::Found {
                            point: place.into(),
                            origin: Origin::Provider {
                                provider: provider.name().to_string(),
                                query: query.to_string(),
                            },
                        };
                    }
                    debug!(provider = provider.name(), "No result, trying next provider");
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Provider failed, trying next provider");
                }
            }
        }
        Resolution::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::ProviderPlace;
    use crate::test_support::MockProvider;

    #[tokio::test]
    async fn test_primary_answer_skips_secondary() {
        let primary = Arc::new(MockProvider::new("primary").with("해운대", vec![
            ProviderPlace::new("해운대", 35.16, 129.16),
            ProviderPlace::new("해운대 해수욕장", 35.15, 129.15),
        ]));
        let secondary = Arc::new(MockProvider::new("secondary"));
        let chain = ProviderChain::new(vec![primary.clone(), secondary.clone()]);

        let resolution = chain.resolve("해운대").await;
        assert_eq!(resolution.point().unwrap().name.as_deref(), Some("해운대"));
        assert_eq!(primary.calls(), 1);
        assert_eq!(primary.counts(), vec![1]);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_back_on_empty_and_on_error() {
        let answer = vec![ProviderPlace::new("Eiffel Tower", 48.858, 2.294)];

        for primary in [MockProvider::new("empty"), MockProvider::failing("down")] {
            let primary = Arc::new(primary);
            let secondary = Arc::new(MockProvider::new("secondary").with("eiffel tower", answer.clone()));
            let chain = ProviderChain::new(vec![primary.clone(), secondary.clone()]);

            let resolution = chain.resolve("eiffel tower").await;
            assert_eq!(
                resolution.origin(),
                Some(&Origin::Provider {
                    provider: "secondary".to_string(),
                    query: "eiffel tower".to_string(),
                })
            );
            assert_eq!(primary.calls(), 1);
            assert_eq!(secondary.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_exhausted_chain_is_not_found() {
        let chain = ProviderChain::default()
            .push(Arc::new(MockProvider::failing("a")))
            .push(Arc::new(MockProvider::new("b")));
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.resolve("nowhere").await, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_blank_query_skips_providers() {
        let provider = Arc::new(MockProvider::new("p"));
        let chain = ProviderChain::new(vec![provider.clone()]);
        assert_eq!(chain.resolve("   ").await, Resolution::NotFound);
        assert_eq!(provider.calls(), 0);
    }
}
