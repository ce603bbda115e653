//! Inverted token index over the district corpus.
//!
//! Each token maps to the district names containing it, in corpus order. An
//! entry stops growing once it holds [`TOKEN_CAP`] names; later names for that
//! token are dropped, never rotated in.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    corpus::dedup_corpus,
    error::{DataError, Result},
    text::tokens,
};

/// Maximum number of district names stored per token.
pub const TOKEN_CAP: usize = 500;

/// Token → district names. Serializes as a plain JSON object with tokens in
/// sorted order, so the same corpus always writes the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenIndex {
    entries: BTreeMap<String, Vec<String>>,
}

impl TokenIndex {
    /// District names indexed under `token`, or an empty slice if unseen.
    pub fn get(&self, token: &str) -> &[String] {
        self.entries.get(token).map_or(&[], Vec::as_slice)
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the longest token entry.
    pub fn max_entry_len(&self) -> usize {
        self.entries.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(token, names)| (token.as_str(), names.as_slice()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let index: Self = serde_json::from_reader(BufReader::new(file))?;
        info!(tokens = index.len(), "Loaded token index");
        Ok(index)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    fn push(&mut self, token: String, district: &str, cap: usize) {
        let entry = self.entries.entry(token).or_default();
        if entry.len() < cap {
            entry.push(district.to_owned());
        }
    }
}

/// Output of the index builder: the de-duplicated corpus and its index.
#[derive(Debug, Clone)]
pub struct BuiltIndex {
    pub corpus: Vec<String>,
    pub index: TokenIndex,
}

/// Build the token index with the default [`TOKEN_CAP`].
pub fn build_token_index<I, S>(corpus: I) -> BuiltIndex
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    build(corpus, TOKEN_CAP)
}

/// Build the token index, keeping at most `cap` names per token.
pub fn build_token_index_with_cap<I, S>(corpus: I, cap: usize) -> Result<BuiltIndex>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    if cap == 0 {
        return Err(DataError::InvalidTokenCap);
    }
    Ok(build(corpus, cap))
}

#[instrument(level = "info", skip(corpus))]
fn build<I, S>(corpus: I, cap: usize) -> BuiltIndex
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let corpus = dedup_corpus(corpus);
    let mut index = TokenIndex::default();

    for district in &corpus {
        for token in tokens(district) {
            index.push(token, district, cap);
        }
    }

    debug!(
        districts = corpus.len(),
        tokens = index.len(),
        largest_entry = index.max_entry_len(),
        "Built token index"
    );
    BuiltIndex { corpus, index }
}
