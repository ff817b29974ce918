//! Ordered, de-duplicated selection of listing entries.

use std::collections::HashSet;

use tracing::debug;

use super::FilterPattern;

/// Listing entries selected by at least one pattern.
///
/// Entries are unique. Order follows pattern evaluation order (all matches of
/// the first pattern, then new matches of the second, ...) and listing order
/// within a single pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedSet {
    files: Vec<String>,
}

impl MatchedSet {
    /// Applies `patterns` in order against `listing`.
    #[must_use]
    pub fn build<S: AsRef<str>>(patterns: &[FilterPattern], listing: &[S]) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut files = Vec::new();

        for pattern in patterns {
            let before = files.len();
            for entry in listing {
                let entry = entry.as_ref();
                if pattern.matches(entry) && seen.insert(entry) {
                    files.push(entry.to_string());
                }
            }
            debug!(%pattern, added = files.len() - before, "pattern applied");
        }

        Self { files }
    }

    /// Number of selected files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates selected filenames in retrieval order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    /// Selected filenames as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.files
    }
}

impl<'a> IntoIterator for &'a MatchedSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::filter::classify_all;

    const CHL: &str = "A20151822015184.L3m_MO_CHL_chlor_a_4km.nc";
    const SST: &str = "A20151822015184.L3m_MO_SST_sst_4km.nc";
    const MET: &str = "GMAO_MERRA2.20230628T100000.MET.nc";

    #[test]
    fn test_entry_matched_by_two_patterns_appears_once() {
        let patterns = classify_all(&["*CHL*", "A2015*"]).unwrap();
        let set = MatchedSet::build(&patterns, &[CHL, MET]);
        assert_eq!(set.as_slice(), &[CHL.to_string()]);
    }

    #[test]
    fn test_order_follows_patterns_not_listing() {
        let patterns = classify_all(&["*SST*", "*CHL*"]).unwrap();
        let set = MatchedSet::build(&patterns, &[CHL, SST]);
        let order: Vec<&str> = set.iter().collect();
        assert_eq!(order, vec![SST, CHL]);
    }

    #[test]
    fn test_listing_order_within_one_pattern() {
        let patterns = classify_all(&["A2015*"]).unwrap();
        let set = MatchedSet::build(&patterns, &[SST, MET, CHL]);
        let order: Vec<&str> = set.iter().collect();
        assert_eq!(order, vec![SST, CHL]);
    }

    #[test]
    fn test_duplicate_listing_entries_collapse() {
        let patterns = classify_all(&["*.nc"]).unwrap();
        let set = MatchedSet::build(&patterns, &[MET, MET, CHL]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_exact_pattern_absent_from_listing() {
        let patterns = classify_all(&["missing.nc"]).unwrap();
        let set = MatchedSet::build(&patterns, &[CHL, SST]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_entries_originate_from_listing_only() {
        let patterns = classify_all(&["*", MET]).unwrap();
        let listing = [CHL, SST];
        let set = MatchedSet::build(&patterns, &listing);
        assert!(set.iter().all(|name| listing.contains(&name)));
        assert_eq!(set.len(), 2);
    }
}
