//! District artifacts the engine runs on: the corpus, its optional token index
//! and the optional local coordinate table.

use std::path::Path;

use sigungu_data_processing::{
    COORDS_FILE, CORPUS_FILE, INDEX_FILE, LocalCoordinateTable, TokenIndex, dedup_corpus,
    load_corpus, parse_corpus,
};
use tracing::{info, instrument, warn};

use crate::error::Result;

pub mod embedded;

#[derive(Debug, Clone, Default)]
pub struct DistrictData {
    pub corpus: Vec<String>,
    pub index: Option<TokenIndex>,
    pub coords: LocalCoordinateTable,
}

impl DistrictData {
    /// The corpus, index and seed coordinates compiled into the library.
    #[instrument(name = "Load embedded district data", level = "debug")]
    pub fn embedded() -> Result<Self> {
        let data = Self {
            corpus: parse_corpus(embedded::EMBEDDED_CORPUS)?,
            index: Some(TokenIndex::from_json(embedded::EMBEDDED_INDEX)?),
            coords: LocalCoordinateTable::from_json(embedded::EMBEDDED_COORDS)?,
        };
        info!(
            districts = data.corpus.len(),
            coords = data.coords.len(),
            "Using embedded district data"
        );
        Ok(data)
    }

    /// Load artifacts from a data directory.
    ///
    /// The corpus is required. A missing index means the matcher scans the
    /// corpus; a missing coordinate table means every lookup goes to the
    /// provider.
    #[instrument(name = "Load district data", level = "debug", skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let corpus = load_corpus(dir.join(CORPUS_FILE))?;

        let index_path = dir.join(INDEX_FILE);
        let index = if index_path.exists() {
            Some(TokenIndex::load(&index_path)?)
        } else {
            warn!(path = %index_path.display(), "No token index, falling back to corpus scan");
            None
        };

        let coords_path = dir.join(COORDS_FILE);
        let coords = if coords_path.exists() {
            LocalCoordinateTable::load(&coords_path)?
        } else {
            LocalCoordinateTable::new()
        };

        Ok(Self::from_parts(corpus, index, coords))
    }

    /// Assemble data from in-memory parts. The corpus is de-duplicated.
    pub fn from_parts(
        corpus: Vec<String>,
        index: Option<TokenIndex>,
        coords: LocalCoordinateTable,
    ) -> Self {
        Self {
            corpus: dedup_corpus(corpus),
            index,
            coords,
        }
    }
}

#[cfg(test)]
mod tests {
    use sigungu_data_processing::{TestDataConfig, create_test_data, test_data};

    use super::*;

    #[test]
    fn test_embedded_data_loads() {
        let data = DistrictData::embedded().unwrap();
        assert!(data.corpus.contains(&"서울특별시-강남구".to_string()));
        assert!(data.index.as_ref().is_some_and(|i| !i.get("강남구").is_empty()));
        assert!(data.coords.get("서울특별시").is_some());
    }

    #[test]
    fn test_from_dir_with_all_artifacts() {
        let fixture = create_test_data(&TestDataConfig::sample()).unwrap();
        let data = DistrictData::from_dir(fixture.dir.path()).unwrap();
        assert_eq!(data.corpus.len(), test_data::sample_corpus().len() - 1);
        assert!(data.index.is_some());
        assert_eq!(data.coords.len(), 2);
    }

    #[test]
    fn test_from_dir_without_optional_artifacts() {
        let fixture = create_test_data(&TestDataConfig::minimal()).unwrap();
        let data = DistrictData::from_dir(fixture.dir.path()).unwrap();
        assert_eq!(data.corpus, test_data::minimal_corpus());
        assert!(data.index.is_none());
        assert!(data.coords.is_empty());
    }

    #[test]
    fn test_missing_corpus_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DistrictData::from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_from_parts_dedups() {
        let data = DistrictData::from_parts(test_data::sample_corpus(), None, LocalCoordinateTable::new());
        assert_eq!(data.corpus.len(), test_data::sample_corpus().len() - 1);
    }
}
