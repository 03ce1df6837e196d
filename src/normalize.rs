//! Address normalization for Philippine postal addresses.
//!
//! Produces a canonical string form used both as the provider query and as
//! the cache key: same input, same output, no I/O.

use regex::Regex;
use std::sync::LazyLock;

/// Fixed replacement table, applied case-insensitively on whole words.
/// Multi-word phrases come first so they win over their components.
/// Abbreviations match with or without the trailing dot.
const REPLACEMENTS: &[(&str, &str)] = &[
    (r"(?i)\bmetro\s+manila\b", "Manila"),
    (r"(?i)\bmakati\s+city\b", "Makati"),
    (r"(?i)\bncr\b", "National Capital Region"),
    (r"(?i)\b(?:brgy|bgry|bgy)\b\.?", "Barangay"),
    (r"(?i)\bst\b\.?", "Street"),
    (r"(?i)\bave\b\.?", "Avenue"),
    (r"(?i)\bblvd\b\.?", "Boulevard"),
    (r"(?i)\brd\b\.?", "Road"),
    (r"(?i)\bdr\b\.?", "Drive"),
    (r"(?i)\bbldg\b\.?", "Building"),
    (r"(?i)\bflr\b\.?", "Floor"),
];

static TABLE: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    REPLACEMENTS
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("invalid replacement pattern"),
                *replacement,
            )
        })
        .collect()
});

/// Normalize a free-text address into its canonical form.
///
/// Strips `#`, expands local abbreviations ("Brgy." -> "Barangay",
/// "St." -> "Street", ...), collapses whitespace, normalizes comma
/// separators to `", "` and drops empty comma segments.
pub fn normalize_address(input: &str) -> String {
    let mut text = input.replace('#', "");
    for (pattern, replacement) in TABLE.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }
    text.split(',')
        .map(|segment| segment.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_barangay_and_city_suffix() {
        assert_eq!(
            normalize_address("123 Brgy. San Isidro, Makati City"),
            "123 Barangay San Isidro, Makati"
        );
    }

    #[test]
    fn test_barangay_spelling_variants() {
        assert_eq!(normalize_address("Bgy. Poblacion"), "Barangay Poblacion");
        assert_eq!(normalize_address("BGRY. Poblacion"), "Barangay Poblacion");
        assert_eq!(normalize_address("brgy Poblacion"), "Barangay Poblacion");
    }

    #[test]
    fn test_street_abbreviations() {
        assert_eq!(
            normalize_address("12 Main St., Ortigas Ave."),
            "12 Main Street, Ortigas Avenue"
        );
        assert_eq!(
            normalize_address("5 EDSA Blvd. cor Shaw Rd."),
            "5 EDSA Boulevard cor Shaw Road"
        );
    }

    #[test]
    fn test_region_shorthand() {
        assert_eq!(
            normalize_address("Quezon City, NCR"),
            "Quezon City, National Capital Region"
        );
        assert_eq!(normalize_address("Pasig, Metro Manila"), "Pasig, Manila");
    }

    #[test]
    fn test_strips_hash_and_collapses_whitespace() {
        assert_eq!(
            normalize_address("  #42   Rizal   St. ,  Cebu "),
            "42 Rizal Street, Cebu"
        );
    }

    #[test]
    fn test_comma_cleanup() {
        assert_eq!(normalize_address(",Manila,,Philippines,"), "Manila, Philippines");
        assert_eq!(normalize_address(" , , "), "");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_address(""), "");
        assert_eq!(normalize_address("   "), "");
    }

    #[test]
    fn test_does_not_touch_embedded_words() {
        // "st" inside a longer word must not expand
        assert_eq!(normalize_address("21st Division"), "21st Division");
        assert_eq!(normalize_address("Drive-in"), "Drive-in");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "123 Brgy. San Isidro, Makati City",
            "#7 Flr. 2 Bldg. A, Ayala Ave., Makati City, NCR",
            "1 Main St.",
            "",
        ];
        for input in inputs {
            let once = normalize_address(input);
            assert_eq!(normalize_address(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_deterministic() {
        let input = "9 Bonifacio Dr., Brgy. 659, Manila";
        assert_eq!(normalize_address(input), normalize_address(input));
    }
}
