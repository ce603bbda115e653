//! In-memory provider for unit tests.

use std::sync::Mutex;
use std::time::Duration;

use ahash::AHashMap as HashMap;
use async_trait::async_trait;

use crate::geocode::{GeocodeProvider, ProviderError, ProviderPlace};

/// Answers from a fixed table and records every call.
pub(crate) struct MockProvider {
    name: String,
    answers: HashMap<String, Vec<ProviderPlace>>,
    fail: bool,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl MockProvider {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            answers: HashMap::new(),
            fail: false,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every call fails.
    pub(crate) fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name)
        }
    }

    pub(crate) fn with(mut self, query: &str, places: Vec<ProviderPlace>) -> Self {
        self.answers.insert(query.to_string(), places);
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
    }

    pub(crate) fn counts(&self) -> Vec<usize> {
        self.calls.lock().unwrap().iter().map(|&(_, c)| c).collect()
    }
}

#[async_trait]
impl GeocodeProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str, count: usize) -> Result<Vec<ProviderPlace>, ProviderError> {
        self.calls.lock().unwrap().push((query.to_string(), count));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ProviderError::Malformed {
                provider: "mock",
                reason: "unavailable".to_string(),
            });
        }
        Ok(self
            .answers
            .get(query)
            .map(|places| places.iter().take(count).cloned().collect())
            .unwrap_or_default())
    }
}
