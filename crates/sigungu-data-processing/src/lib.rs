//! Build-time data processing for the `sigungu` district geocoder.
//!
//! Turns a raw district corpus into the artifacts the engine reads at runtime:
//! the de-duplicated corpus, the inverted [`TokenIndex`], its metadata, and the
//! optional [`LocalCoordinateTable`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub mod coords;
pub mod corpus;
mod error;
pub mod index;
#[cfg(any(test, feature = "test_data"))]
pub mod test_data;
pub mod text;

pub use coords::{LocalCoordinate, LocalCoordinateTable};
pub use corpus::{dedup_corpus, load_corpus, parse_corpus};
pub use error::{DataError, Result};
pub use index::{BuiltIndex, TOKEN_CAP, TokenIndex, build_token_index, build_token_index_with_cap};
#[cfg(any(test, feature = "test_data"))]
pub use test_data::{TestData, TestDataConfig, create_test_data};
pub use text::{DELIMITER, collapse_lower, contains_hangul, normalize, split_levels, tokens};

pub const DATA_DIR_DEFAULT: &str = "./sigungu_data";

pub const CORPUS_FILE: &str = "korea_districts.json";
pub const INDEX_FILE: &str = "korea_districts_index.json";
pub const COORDS_FILE: &str = "korea_districts_with_coords.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Global data directory.
///
/// `SIGUNGU_DATA_DIR` wins; otherwise the platform data directory when the
/// `system-dirs` feature is on, else [`DATA_DIR_DEFAULT`].
pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    if let Ok(dir) = std::env::var("SIGUNGU_DATA_DIR") {
        return PathBuf::from(dir);
    }
    #[cfg(feature = "system-dirs")]
    if let Some(dirs) = directories::ProjectDirs::from("", "", "sigungu") {
        return dirs.data_dir().to_path_buf();
    }
    PathBuf::from(DATA_DIR_DEFAULT)
});

pub fn get_data_dir() -> &'static Path {
    DATA_DIR.as_path()
}

/// Describes a generated index, written as `metadata.json` beside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub version: String,
    pub generated_at: String,
    pub districts: usize,
    pub tokens: usize,
    pub token_cap: usize,
}

impl IndexMetadata {
    pub fn describe(built: &BuiltIndex) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            districts: built.corpus.len(),
            tokens: built.index.len(),
            token_cap: TOKEN_CAP,
        }
    }
}

/// Build the index from `corpus` and write corpus, index and metadata into
/// `out_dir`, creating it if needed.
#[instrument(name = "Write index artifacts", level = "info", skip(corpus), fields(out_dir = %out_dir.as_ref().display()))]
pub fn write_artifacts<I, S>(corpus: I, out_dir: impl AsRef<Path>) -> Result<IndexMetadata>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;

    let built = build_token_index(corpus);
    if built.corpus.is_empty() {
        return Err(DataError::EmptyCorpus);
    }
    let metadata = IndexMetadata::describe(&built);

    std::fs::write(out_dir.join(CORPUS_FILE), serde_json::to_string(&built.corpus)?)?;
    built.index.save(out_dir.join(INDEX_FILE))?;
    std::fs::write(
        out_dir.join(METADATA_FILE),
        serde_json::to_string_pretty(&metadata)?,
    )?;

    info!(
        districts = metadata.districts,
        tokens = metadata.tokens,
        "Index artifacts written"
    );
    Ok(metadata)
}
