//! Index subset selection for display filtering.

use serde::Serialize;

/// The fixed ASEAN display subset, by sheet label.
pub const ASEAN_INDICES: [&str; 6] = ["VNI", "KLCI", "PSEI", "STI", "JAKIDX", "SET"];

/// Which indices the ranked tables should show.
///
/// Filtering is applied after ranking, so a subset view keeps each index's
/// rank against the full universe (an ASEAN table can legitimately open at
/// rank 3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IndexSelection {
    All,
    Subset(Vec<String>),
}

impl IndexSelection {
    /// The default ASEAN subset.
    pub fn asean() -> Self {
        Self::Subset(ASEAN_INDICES.iter().map(|s| s.to_string()).collect())
    }

    pub fn includes(&self, label: &str) -> bool {
        match self {
            Self::All => true,
            Self::Subset(labels) => labels.iter().any(|l| l == label),
        }
    }
}

impl Default for IndexSelection {
    fn default() -> Self {
        Self::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_includes_everything() {
        assert!(IndexSelection::All.includes("PSEI"));
        assert!(IndexSelection::All.includes("N225"));
    }

    #[test]
    fn asean_subset_matches_fixed_labels() {
        let asean = IndexSelection::asean();
        for label in ASEAN_INDICES {
            assert!(asean.includes(label));
        }
        assert!(!asean.includes("N225"));
        assert!(!asean.includes("HSI"));
    }

    #[test]
    fn custom_subset_is_exact_match() {
        let subset = IndexSelection::Subset(vec!["PSEI".to_string()]);
        assert!(subset.includes("PSEI"));
        assert!(!subset.includes("psei"));
    }
}
