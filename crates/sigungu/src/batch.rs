//! Offline precomputation of the local coordinate table.
//!
//! Walks the whole corpus one district at a time, asking the provider for a
//! single result per query form, and collects the hits into a
//! [`LocalCoordinateTable`] that the resolver consults before any network call.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use sigungu_data_processing::{
    DELIMITER, LocalCoordinate, LocalCoordinateTable, dedup_corpus, load_corpus, split_levels,
};
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::geocode::GeocodeProvider;

#[derive(Debug, Clone)]
pub struct PrecomputeOptions {
    /// Pause between districts to stay within provider rate limits
    pub delay: Duration,
    /// Log progress every this many districts
    pub progress_every: usize,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for PrecomputeOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(250),
            progress_every: 20,
            show_progress: false,
        }
    }
}

/// Query forms for one district: space-joined, then the levels reversed when
/// there is more than one.
fn query_forms(district: &str) -> Vec<String> {
    let mut forms = vec![district.replace(DELIMITER, " ")];
    let levels = split_levels(district);
    if levels.len() > 1 {
        forms.push(levels.iter().rev().copied().collect::<Vec<_>>().join(" "));
    }
    forms
}

async fn lookup(provider: &dyn GeocodeProvider, query: &str) -> Option<LocalCoordinate> {
    match provider.search(query, 1).await {
        Ok(places) => places.into_iter().next().map(|place| LocalCoordinate {
            lat: place.latitude,
            lon: place.longitude,
            name: Some(place.name),
            source: Some(provider.name().to_string()),
        }),
        Err(e) => {
            warn!(provider = provider.name(), query, error = %e, "Geocode failed");
            None
        }
    }
}

fn progress_bar(total: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Progress bar template")
            .progress_chars("█░"),
    );
    pb.set_message("Geocoding districts");
    pb
}

/// Geocode every unique district in `corpus`, strictly one request at a time.
///
/// Districts that fail or find nothing are logged and left out.
#[instrument(name = "Precompute coordinates", skip_all, fields(provider = provider.name()))]
pub async fn precompute_coordinates<I, S>(
    corpus: I,
    provider: &dyn GeocodeProvider,
    options: &PrecomputeOptions,
) -> LocalCoordinateTable
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let districts = dedup_corpus(corpus);
    let total = districts.len();
    info!(total, "Starting coordinate precomputation");

    let pb = progress_bar(total, options.show_progress);
    let mut table = LocalCoordinateTable::new();

    for (i, district) in districts.iter().enumerate() {
        let mut found = None;
        for query in query_forms(district) {
            found = lookup(provider, &query).await;
            if found.is_some() {
                break;
            }
        }
        match found {
            Some(coordinate) => table.insert(district.clone(), coordinate),
            None => warn!(%district, "No coordinates found"),
        }

        pb.inc(1);
        let done = i + 1;
        if options.progress_every > 0 && done % options.progress_every == 0 {
            info!(done, total, resolved = table.len(), "Precompute progress");
        }
        if done < total && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    pb.finish_and_clear();
    info!(total, resolved = table.len(), "Coordinate precomputation complete");
    table
}

/// Read a corpus file, precompute its coordinates and write the table to
/// `out`. An unreadable corpus aborts the run.
pub async fn precompute_file(
    corpus: impl AsRef<Path>,
    out: impl AsRef<Path>,
    provider: &dyn GeocodeProvider,
    options: &PrecomputeOptions,
) -> Result<LocalCoordinateTable> {
    let districts = load_corpus(corpus)?;
    let table = precompute_coordinates(&districts, provider, options).await;
    table.save(out.as_ref())?;
    info!(path = ?out.as_ref(), entries = table.len(), "Wrote coordinate table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::ProviderPlace;
    use crate::test_support::MockProvider;

    #[test]
    fn test_query_forms() {
        assert_eq!(query_forms("Seoul-Gangnam"), vec!["Seoul Gangnam", "Gangnam Seoul"]);
        assert_eq!(query_forms("Seoul"), vec!["Seoul"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_precompute_tries_reversed_form_and_skips_failures() {
        let provider = MockProvider::new("open-meteo")
            .with("Seoul Jongno", vec![ProviderPlace::new("Jongno", 37.57, 126.98)])
            .with("Haeundae Busan", vec![ProviderPlace::new("Haeundae", 35.16, 129.16)]);
        let corpus = sigungu_data_processing::test_data::minimal_corpus();

        let start = tokio::time::Instant::now();
        let table = precompute_coordinates(&corpus, &provider, &PrecomputeOptions::default()).await;

        assert_eq!(table.len(), 2);
        let jongno = table.get("Seoul-Jongno").unwrap();
        assert_eq!(jongno.name.as_deref(), Some("Jongno"));
        assert_eq!(jongno.source.as_deref(), Some("open-meteo"));
        assert!(table.get("Busan-Haeundae").is_some());
        assert!(table.get("Seoul-Gangnam").is_none());

        assert_eq!(
            provider.queries(),
            vec!["Seoul Jongno", "Seoul Gangnam", "Gangnam Seoul", "Busan Haeundae", "Haeundae Busan"]
        );
        assert!(provider.counts().iter().all(|&c| c == 1));
        // a pause between each of the three districts
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_failing_provider_yields_empty_table() {
        let provider = MockProvider::failing("open-meteo");
        let options = PrecomputeOptions {
            delay: Duration::ZERO,
            ..PrecomputeOptions::default()
        };
        let corpus = ["A-B", "A-B", "C"];
        let table = precompute_coordinates(corpus, &provider, &options).await;
        assert!(table.is_empty());
        // duplicates are visited once
        assert_eq!(provider.queries(), vec!["A B", "B A", "C"]);
    }

    #[tokio::test]
    async fn test_precompute_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus.json");
        let out = dir.path().join("coords.json");
        std::fs::write(&corpus, r#"["Seoul-Jongno"]"#).unwrap();

        let provider = MockProvider::new("mock")
            .with("Seoul Jongno", vec![ProviderPlace::new("Jongno", 37.57, 126.98)]);
        let options = PrecomputeOptions {
            delay: Duration::ZERO,
            ..PrecomputeOptions::default()
        };
        precompute_file(&corpus, &out, &provider, &options).await.unwrap();

        let saved = LocalCoordinateTable::load(&out).unwrap();
        assert!((saved.get("Seoul-Jongno").unwrap().lat - 37.57).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_corpus_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let provider = MockProvider::new("mock");
        let result = precompute_file(
            dir.path().join("missing.json"),
            dir.path().join("out.json"),
            &provider,
            &PrecomputeOptions::default(),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(provider.calls(), 0);
    }
}
