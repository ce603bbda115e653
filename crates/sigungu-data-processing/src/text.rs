//! Text normalization shared by the index builder, the query matcher and the
//! resolver's scoring.
//!
//! A district name such as `서울특별시-강남구-역삼동` is normalized by turning the
//! level delimiter and commas into spaces, lower-casing, and collapsing runs of
//! whitespace. Tokens are the whitespace-separated words of that normalized form.

use itertools::Itertools;

/// Separator between hierarchy levels of a district name.
pub const DELIMITER: char = '-';

/// Normalize a district name or query for matching.
///
/// ```
/// use sigungu_data_processing::text::normalize;
///
/// assert_eq!(normalize("  Seoul-Gangnam,  Yeoksam "), "seoul gangnam yeoksam");
/// assert_eq!(normalize("---"), "");
/// ```
pub fn normalize(s: &str) -> String {
    s.split(|c: char| c == DELIMITER || c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .join(" ")
}

/// Collapse whitespace and lower-case without touching delimiters.
///
/// Used where a provider field (admin1, admin2, name) is compared against
/// district tokens.
pub fn collapse_lower(s: &str) -> String {
    s.split_whitespace().map(str::to_lowercase).join(" ")
}

/// Unique tokens of a district name, in first-seen order.
pub fn tokens(s: &str) -> Vec<String> {
    normalize(s)
        .split(' ')
        .filter(|t| !t.is_empty())
        .unique()
        .map(ToOwned::to_owned)
        .collect()
}

/// Hierarchy levels of a district name, trimmed, with empty levels dropped.
pub fn split_levels(s: &str) -> Vec<&str> {
    s.split(DELIMITER)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Whether the text contains Hangul (jamo or syllables).
pub fn contains_hangul(s: &str) -> bool {
    s.chars().any(|c| {
        matches!(c,
            '\u{3131}'..='\u{314E}' | '\u{314F}'..='\u{3163}' | '\u{AC00}'..='\u{D7A3}')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replaces_delimiters_and_collapses() {
        assert_eq!(normalize("Seoul-Jongno"), "seoul jongno");
        assert_eq!(normalize("서울특별시-종로구-청운동"), "서울특별시 종로구 청운동");
        assert_eq!(normalize("a,,b -- c"), "a b c");
        assert_eq!(normalize("\tBusan\n"), "busan");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "Seoul-Gangnam",
            "  Busan-Haeundae-U-dong ",
            "경기도-수원시 장안구-파장동",
            "A,B-C  D",
            "",
            "-,-",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "normalize not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_delimiter_only_normalizes_to_empty() {
        assert_eq!(normalize("-"), "");
        assert_eq!(normalize(" - , - "), "");
        assert!(tokens("--").is_empty());
    }

    #[test]
    fn test_tokens_are_unique_and_ordered() {
        assert_eq!(tokens("Jung-gu-Jung"), vec!["jung", "gu"]);
        assert_eq!(
            tokens("경기도-수원시 장안구-파장동"),
            vec!["경기도", "수원시", "장안구", "파장동"]
        );
    }

    #[test]
    fn test_split_levels_drops_empty_levels() {
        assert_eq!(split_levels("Seoul- Gangnam -"), vec!["Seoul", "Gangnam"]);
        assert_eq!(split_levels("Seoul"), vec!["Seoul"]);
        assert!(split_levels("").is_empty());
    }

    #[test]
    fn test_contains_hangul() {
        assert!(contains_hangul("강남"));
        assert!(contains_hangul("Seoul ㄱ"));
        assert!(!contains_hangul("Gangnam"));
        assert!(!contains_hangul("東京"));
    }

    #[test]
    fn test_collapse_lower_keeps_delimiters() {
        assert_eq!(collapse_lower("  Seoul   Special-City "), "seoul special-city");
    }
}
