//! Pattern classification and matching.

use std::fmt;

use tracing::debug;

use super::PatternError;

/// The wildcard marker character.
pub const WILDCARD: char = '*';

/// A classified filter pattern holding the marker-free text to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPattern {
    /// Full string equality.
    Exact(String),
    /// Candidate starts with the text (`abc*`).
    Prefix(String),
    /// Candidate ends with the text (`*abc`).
    Suffix(String),
    /// Candidate contains the text (`*abc*`).
    Contains(String),
}

impl FilterPattern {
    /// Case-sensitive match of a single candidate filename.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(t) => candidate == t,
            Self::Prefix(t) => candidate.starts_with(t.as_str()),
            Self::Suffix(t) => candidate.ends_with(t.as_str()),
            Self::Contains(t) => candidate.contains(t.as_str()),
        }
    }
}

impl fmt::Display for FilterPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(t) => write!(f, "{t}"),
            Self::Prefix(t) => write!(f, "{t}{WILDCARD}"),
            Self::Suffix(t) => write!(f, "{WILDCARD}{t}"),
            Self::Contains(t) if t.is_empty() => write!(f, "{WILDCARD}"),
            Self::Contains(t) => write!(f, "{WILDCARD}{t}{WILDCARD}"),
        }
    }
}

/// Classifies a raw pattern string.
///
/// A lone `*` (or `**`) classifies as `Contains("")` and matches every name.
///
/// # Errors
///
/// Returns [`PatternError::Empty`] for `""`, and
/// [`PatternError::MisplacedMarker`] when a marker survives stripping one
/// leading and one trailing marker.
pub fn classify(pattern: &str) -> Result<FilterPattern, PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }

    let (leading, rest) = match pattern.strip_prefix(WILDCARD) {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let (trailing, text) = match rest.strip_suffix(WILDCARD) {
        Some(text) => (true, text),
        None => (false, rest),
    };

    if let Some(offset) = text.find(WILDCARD) {
        let position = offset + usize::from(leading);
        debug!(pattern, position, "rejecting pattern with misplaced marker");
        return Err(PatternError::MisplacedMarker {
            pattern: pattern.to_string(),
            position,
        });
    }

    let text = text.to_string();
    Ok(match (leading, trailing) {
        (false, false) => FilterPattern::Exact(text),
        (false, true) => FilterPattern::Prefix(text),
        (true, false) if text.is_empty() => FilterPattern::Contains(text),
        (true, false) => FilterPattern::Suffix(text),
        (true, true) => FilterPattern::Contains(text),
    })
}

/// Classifies every pattern, failing on the first malformed one.
///
/// # Errors
///
/// Returns the first [`PatternError`] encountered.
pub fn classify_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<FilterPattern>, PatternError> {
    patterns.iter().map(|p| classify(p.as_ref())).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_exact() {
        assert_eq!(
            classify("GMAO_MERRA2.20230628T100000.MET.nc").unwrap(),
            FilterPattern::Exact("GMAO_MERRA2.20230628T100000.MET.nc".into())
        );
    }

    #[test]
    fn test_classify_prefix_suffix_contains() {
        assert_eq!(
            classify("abc*").unwrap(),
            FilterPattern::Prefix("abc".into())
        );
        assert_eq!(
            classify("*abc").unwrap(),
            FilterPattern::Suffix("abc".into())
        );
        assert_eq!(
            classify("*abc*").unwrap(),
            FilterPattern::Contains("abc".into())
        );
    }

    #[test]
    fn test_lone_wildcard_matches_everything() {
        for raw in ["*", "**"] {
            let pattern = classify(raw).unwrap();
            assert_eq!(pattern, FilterPattern::Contains(String::new()));
            assert!(pattern.matches("anything.nc"));
        }
    }

    #[test]
    fn test_interior_marker_rejected() {
        let err = classify("a*b*c").unwrap_err();
        assert_eq!(
            err,
            PatternError::MisplacedMarker {
                pattern: "a*b*c".into(),
                position: 1
            }
        );
    }

    #[test]
    fn test_doubled_edge_markers_rejected() {
        assert!(matches!(
            classify("**abc"),
            Err(PatternError::MisplacedMarker { position: 1, .. })
        ));
        assert!(matches!(
            classify("abc**"),
            Err(PatternError::MisplacedMarker { position: 3, .. })
        ));
        assert!(classify("***").is_err());
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert_eq!(classify(""), Err(PatternError::Empty));
    }

    #[test]
    fn test_matching_semantics() {
        let name = "A20151822015184.L3m_MO_CHL_chlor_a_4km.nc";
        assert!(classify("*CHL*").unwrap().matches(name));
        assert!(classify("A2015*").unwrap().matches(name));
        assert!(classify("*4km.nc").unwrap().matches(name));
        assert!(classify(name).unwrap().matches(name));

        assert!(!classify("*SST*").unwrap().matches(name));
        assert!(!classify("2015*").unwrap().matches(name));
        assert!(!classify("*4km").unwrap().matches(name));
        assert!(!classify("A2015").unwrap().matches(name));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!classify("*chl*").unwrap().matches("A.L3m_MO_CHL.nc"));
        assert!(!classify("a2015*").unwrap().matches("A2015.nc"));
    }

    #[test]
    fn test_display_round_trips_source_form() {
        for raw in ["abc", "abc*", "*abc", "*abc*", "*"] {
            assert_eq!(classify(raw).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_classify_all_stops_at_first_error() {
        let result = classify_all(&["*nc", "a*b", ""]);
        assert!(matches!(result, Err(PatternError::MisplacedMarker { .. })));

        let ok = classify_all(&["*nc", "abc*"]).unwrap();
        assert_eq!(ok.len(), 2);
    }
}
