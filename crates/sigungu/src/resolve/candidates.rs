use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use sigungu_data_processing::{DELIMITER, split_levels};

/// Administrative-unit suffixes after which providers expect a word break.
static UNIT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new("(시|군|구|도|동|읍|면)").expect("unit suffix pattern is valid"));

/// Insert a space after every administrative-unit suffix and collapse
/// whitespace: `수원시장안구` becomes `수원시 장안구`.
pub fn insert_suffix_spaces(s: &str) -> String {
    UNIT_SUFFIX
        .replace_all(s, "$1 ")
        .split_whitespace()
        .join(" ")
}

/// Query variants tried against the provider for one district name, in the
/// order they are attempted, without duplicates.
///
/// ```
/// use sigungu::candidate_queries;
///
/// assert_eq!(
///     candidate_queries("서울특별시-강남구"),
///     vec![
///         "서울특별시-강남구",
///         "서울특별시 강남구",
///         "강남구, 서울특별시",
///         "강남구 서울특별시",
///         "강남구",
///         "서울특별시 -강남구",
///     ]
/// );
/// ```
pub fn candidate_queries(district: &str) -> Vec<String> {
    let mut variants = vec![district.to_string(), district.replace(DELIMITER, " ")];

    let levels = split_levels(district);
    if levels.len() > 1 {
        let reversed: Vec<&str> = levels.iter().rev().copied().collect();
        variants.push(reversed.join(", "));
        variants.push(reversed.join(" "));
        variants.push(levels[levels.len() - 2..].join(" "));
        variants.push(levels[levels.len() - 1].to_string());
    }

    variants.push(insert_suffix_spaces(district));

    variants
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .unique()
        .collect()
}
