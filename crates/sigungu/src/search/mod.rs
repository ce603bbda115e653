//! Offline district matching.
//!
//! [`DistrictMatcher`] turns partial user input into a short, ranked list of
//! district names. With a [`TokenIndex`] it intersects per-token postings
//! (falling back to their union when nothing contains every token); without
//! one it scans the corpus for substring matches.

use ahash::{AHashMap as HashMap, AHashSet as HashSet};
use itertools::Itertools;
use sigungu_data_processing::{TokenIndex, normalize};
use tracing::{debug, instrument, trace};

use crate::config::SearchConfig;

#[derive(Debug, Clone)]
pub struct DistrictMatcher {
    corpus: Vec<String>,
    normalized: Vec<String>,
    rank: HashMap<String, usize>,
    index: Option<TokenIndex>,
    config: SearchConfig,
}

impl DistrictMatcher {
    /// `corpus` is expected to be de-duplicated; its order breaks ranking ties.
    pub fn new(corpus: Vec<String>, index: Option<TokenIndex>, config: SearchConfig) -> Self {
        let normalized = corpus.iter().map(|d| normalize(d)).collect();
        let mut rank = HashMap::with_capacity(corpus.len());
        for (i, district) in corpus.iter().enumerate() {
            rank.entry(district.clone()).or_insert(i);
        }
        Self {
            corpus,
            normalized,
            rank,
            index,
            config,
        }
    }

    pub fn corpus(&self) -> &[String] {
        &self.corpus
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Ranked district names matching `query`, at most `config.limit` of them.
    ///
    /// Never fails: short or delimiter-only input yields an empty list.
    #[instrument(level = "debug", skip(self), fields(indexed = self.index.is_some()))]
    pub fn search(&self, query: &str) -> Vec<String> {
        let q = normalize(query);
        if q.is_empty() || q.chars().count() < self.config.min_query_chars {
            trace!("Query below minimum length");
            return Vec::new();
        }

        let results = match &self.index {
            Some(index) => self.search_index(index, &q),
            None => self.scan(&q),
        };
        debug!(results = results.len(), "District search complete");
        results
    }

    fn search_index(&self, index: &TokenIndex, q: &str) -> Vec<String> {
        let postings: Vec<&[String]> = q.split(' ').unique().map(|t| index.get(t)).collect();

        let mut candidates = intersect(&postings);
        if candidates.is_empty() {
            trace!("No district contains every token, using union");
            candidates = postings.iter().copied().flatten().unique().collect();
        }

        candidates
            .into_iter()
            .map(|d| (self.query_position(d, q), self.corpus_rank(d), d))
            .sorted_by_key(|&(pos, rank, _)| (pos, rank))
            .take(self.config.limit)
            .map(|(_, _, d)| d.clone())
            .collect()
    }

    fn scan(&self, q: &str) -> Vec<String> {
        self.corpus
            .iter()
            .zip(&self.normalized)
            .filter(|(_, n)| n.contains(q))
            .take(self.config.limit)
            .map(|(d, _)| d.clone())
            .collect()
    }

    /// Character offset of the normalized query inside the normalized name;
    /// names without the query sort last.
    fn query_position(&self, district: &str, q: &str) -> usize {
        let owned;
        let name = match self.rank.get(district) {
            Some(&i) => self.normalized[i].as_str(),
            None => {
                owned = normalize(district);
                owned.as_str()
            }
        };
        name.find(q)
            .map_or(usize::MAX, |byte| name[..byte].chars().count())
    }

    fn corpus_rank(&self, district: &str) -> usize {
        self.rank.get(district).copied().unwrap_or(usize::MAX)
    }
}

/// Names present in every posting list, in the order of the shortest list.
fn intersect<'a>(postings: &[&'a [String]]) -> Vec<&'a String> {
    let mut by_len: Vec<&'a [String]> = postings.to_vec();
    by_len.sort_by_key(|p| p.len());
    let Some((&shortest, rest)) = by_len.split_first() else {
        return Vec::new();
    };
    let rest: Vec<HashSet<&String>> = rest.iter().map(|p| p.iter().collect()).collect();
    shortest
        .iter()
        .filter(|d| rest.iter().all(|set| set.contains(d)))
        .collect()
}
