//! Category labels offered by default. Any other non-empty label is accepted as well.

pub const STANDARD_CATEGORIES: [&str; 8] = [
    "Food",
    "Travel",
    "Bills",
    "Entertainment",
    "Shopping",
    "Healthcare",
    "Education",
    "Other",
];

/// Returns `true` when `label` is one of the curated categories (case-insensitive).
pub fn is_standard_category(label: &str) -> bool {
    let label = label.trim();
    STANDARD_CATEGORIES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(label))
}

/// Maps a label onto the curated spelling when it matches one, otherwise trims it.
pub fn canonical_category(label: &str) -> String {
    let label = label.trim();
    STANDARD_CATEGORIES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(label))
        .map(|known| known.to_string())
        .unwrap_or_else(|| label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curated_labels_match_case_insensitively() {
        assert!(is_standard_category("travel"));
        assert!(is_standard_category(" Bills "));
        assert!(!is_standard_category("Pets"));
    }

    #[test]
    fn canonical_category_keeps_custom_labels() {
        assert_eq!(canonical_category("food"), "Food");
        assert_eq!(canonical_category("  Pets "), "Pets");
    }
}
