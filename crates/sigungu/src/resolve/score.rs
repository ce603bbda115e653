use sigungu_data_processing::{collapse_lower, tokens};

use crate::geocode::ProviderPlace;

const ADMIN1_WEIGHT: u32 = 3;
const ADMIN2_WEIGHT: u32 = 2;
const NAME_WEIGHT: u32 = 1;

fn field_score(field: Option<&str>, token: &str, weight: u32) -> u32 {
    match field.map(collapse_lower) {
        Some(value) if !value.is_empty() && value.contains(token) => weight,
        _ => 0,
    }
}

/// How well `place` agrees with the district tokens.
///
/// Every token found in admin1 adds 3, in admin2 adds 2 and in the place name
/// adds 1.
pub fn score_place(tokens: &[String], place: &ProviderPlace) -> u32 {
    tokens
        .iter()
        .map(|t| {
            field_score(place.admin1.as_deref(), t, ADMIN1_WEIGHT)
                + field_score(place.admin2.as_deref(), t, ADMIN2_WEIGHT)
                + field_score(Some(&place.name), t, NAME_WEIGHT)
        })
        .sum()
}

/// Highest scoring place for `input`; ties keep the provider's order.
pub fn pick_best<'a>(input: &str, places: &'a [ProviderPlace]) -> Option<&'a ProviderPlace> {
    let tokens = tokens(input);
    let mut best: Option<(&ProviderPlace, u32)> = None;
    for place in places {
        let score = score_place(&tokens, place);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((place, score));
        }
    }
    best.map(|(place, _)| place)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_of(s: &str) -> Vec<String> {
        tokens(s)
    }

    #[test]
    fn test_weights() {
        let t = tokens_of("Seoul-Gangnam");
        let place = ProviderPlace::new("Gangnam-gu", 37.5, 127.0)
            .with_admin1("Seoul")
            .with_admin2("Gangnam District");
        // seoul: admin1 (3); gangnam: admin2 (2) + name (1)
        assert_eq!(score_place(&t, &place), 6);
        assert_eq!(score_place(&t, &ProviderPlace::new("Elsewhere", 0.0, 0.0)), 0);
    }

    #[test]
    fn test_admin1_disambiguates_same_name() {
        let places = vec![
            ProviderPlace::new("Gangnam", 37.2, 127.1).with_admin1("Gyeonggi"),
            ProviderPlace::new("Gangnam", 37.5, 127.0).with_admin1("Seoul"),
        ];
        let best = pick_best("Seoul-Gangnam", &places).unwrap();
        assert_eq!(best.admin1.as_deref(), Some("Seoul"));
    }

    #[test]
    fn test_ties_keep_first_result() {
        let places = vec![
            ProviderPlace::new("중구", 37.56, 126.99),
            ProviderPlace::new("중구", 35.10, 129.03),
        ];
        let best = pick_best("중구", &places).unwrap();
        assert!((best.latitude - 37.56).abs() < 1e-9);
    }

    #[test]
    fn test_zero_scores_still_pick_first() {
        let places = vec![ProviderPlace::new("A", 1.0, 1.0), ProviderPlace::new("B", 2.0, 2.0)];
        assert_eq!(pick_best("서울특별시", &places).unwrap().name, "A");
        assert!(pick_best("서울특별시", &[]).is_none());
    }

    #[test]
    fn test_comparison_is_case_and_space_insensitive() {
        let t = tokens_of("수원시 장안구");
        let place = ProviderPlace::new("장안구", 37.3, 127.0).with_admin1("경기도  수원시");
        assert_eq!(score_place(&t, &place), 3 + 1);
    }
}
