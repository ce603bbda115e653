//! Loading and de-duplicating the district corpus.

use std::{fs::File, io::BufReader, path::Path};

use itertools::Itertools;
use tracing::{info, instrument};

use crate::error::{DataError, Result};

/// Read a corpus file: a JSON array of district name strings.
///
/// A missing file is reported as [`DataError::CorpusNotFound`] so build-time
/// callers can fail with a clear message.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataError::CorpusNotFound(path.to_path_buf()),
        _ => DataError::Io(e),
    })?;
    let corpus: Vec<String> = serde_json::from_reader(BufReader::new(file))?;
    info!(districts = corpus.len(), "Loaded corpus");
    Ok(corpus)
}

/// Parse a corpus from an in-memory JSON string.
pub fn parse_corpus(json: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(json)?)
}

/// Remove duplicate district names, keeping the first occurrence and the
/// original order. Blank entries are dropped.
pub fn dedup_corpus<I, S>(corpus: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    corpus
        .into_iter()
        .map(Into::into)
        .filter(|d| !d.trim().is_empty())
        .unique()
        .collect()
}
