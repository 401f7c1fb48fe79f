//! Label folding used by the case-insensitive and heuristic match tiers.
//!
//! Aggregation never normalizes (grouping is exact); only reconciliation folds.

/// Case fold for tier-2/tier-3 comparisons. Full Unicode lowercase, no trimming.
#[inline]
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Key for alias-table lookups: trimmed, then folded.
#[inline]
pub fn alias_key(s: &str) -> String {
    fold(s.trim())
}

/// Either folded string contains the other.
#[inline]
pub fn contains_either(a_folded: &str, b_folded: &str) -> bool {
    a_folded.contains(b_folded) || b_folded.contains(a_folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_keeps_whitespace() {
        assert_eq!(fold(" BARANGAY Rizal "), " barangay rizal ");
        assert_eq!(alias_key(" BARANGAY Rizal "), "barangay rizal");
    }

    #[test]
    fn containment_is_symmetric() {
        assert!(contains_either("barangay hawaiian", "hawaiian"));
        assert!(contains_either("hawaiian", "barangay hawaiian"));
        assert!(!contains_either("patag", "lantad"));
    }
}
