//! Quality Classifier
//!
//! Derives the tonal quality and the ordered tension tokens of a chord
//! suffix. Capital `M` marks a major-family tension (`M7`, `M9`) while a
//! lower-case `m` marks a minor triad, so the case-sensitive rules run first.

use std::{cmp::Ordering, collections::BTreeSet, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::suffix::Suffix;

/// Major or minor triad quality of a chord.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TonalQuality {
    /// Major (the fallback for anything not recognizably minor)
    #[default]
    Major,
    /// Minor
    Minor,
}

impl TonalQuality {
    /// The quality as it appears in queries: `major` or `minor`.
    pub const fn as_str(self) -> &'static str {
        match self {
            TonalQuality::Major => "major",
            TonalQuality::Minor => "minor",
        }
    }
}

impl Display for TonalQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tension vocabulary. Declaration order is the display priority.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum TensionToken {
    /// `6`
    Sixth,
    /// `7`
    Seventh,
    /// `M7`
    MajorSeventh,
    /// `9`
    Ninth,
    /// `add9`
    AddNinth,
    /// `11`
    Eleventh,
    /// `add11`
    AddEleventh,
    /// `13`
    Thirteenth,
    /// `sus2`
    Sus2,
    /// `sus4`
    Sus4,
    /// `dim`
    Diminished,
    /// `aug`
    Augmented,
    /// `alt`
    Altered,
    /// `b5`
    FlatFive,
    /// `b9`
    FlatNine,
    /// `#11`
    SharpEleven,
    /// `b13`
    FlatThirteen,
    /// `m7b5`
    HalfDiminished,
}

impl TensionToken {
    /// Every token, in priority order.
    pub const ALL: [TensionToken; 18] = [
        TensionToken::Sixth,
        TensionToken::Seventh,
        TensionToken::MajorSeventh,
        TensionToken::Ninth,
        TensionToken::AddNinth,
        TensionToken::Eleventh,
        TensionToken::AddEleventh,
        TensionToken::Thirteenth,
        TensionToken::Sus2,
        TensionToken::Sus4,
        TensionToken::Diminished,
        TensionToken::Augmented,
        TensionToken::Altered,
        TensionToken::FlatFive,
        TensionToken::FlatNine,
        TensionToken::SharpEleven,
        TensionToken::FlatThirteen,
        TensionToken::HalfDiminished,
    ];

    /// Token text as written in chord symbols.
    pub const fn as_str(self) -> &'static str {
        match self {
            TensionToken::Sixth => "6",
            TensionToken::Seventh => "7",
            TensionToken::MajorSeventh => "M7",
            TensionToken::Ninth => "9",
            TensionToken::AddNinth => "add9",
            TensionToken::Eleventh => "11",
            TensionToken::AddEleventh => "add11",
            TensionToken::Thirteenth => "13",
            TensionToken::Sus2 => "sus2",
            TensionToken::Sus4 => "sus4",
            TensionToken::Diminished => "dim",
            TensionToken::Augmented => "aug",
            TensionToken::Altered => "alt",
            TensionToken::FlatFive => "b5",
            TensionToken::FlatNine => "b9",
            TensionToken::SharpEleven => "#11",
            TensionToken::FlatThirteen => "b13",
            TensionToken::HalfDiminished => "m7b5",
        }
    }
}

impl Display for TensionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TensionToken> for String {
    fn from(token: TensionToken) -> Self {
        token.as_str().to_string()
    }
}

/// A tension label outside the closed vocabulary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown tension token `{0}`")]
pub struct UnknownTension(pub String);

impl FromStr for TensionToken {
    type Err = UnknownTension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TensionToken::ALL
            .into_iter()
            .find(|token| token.as_str() == s)
            .ok_or_else(|| UnknownTension(s.to_string()))
    }
}

type TensionRule = (fn(&Suffix<'_>) -> bool, TensionToken);

/// Each rule adds its token when the predicate holds. Rules are independent
/// except that a plain `7` is suppressed by a major seventh.
const TENSION_RULES: &[TensionRule] = &[
    (|s| s.contains_ci("m7b5"), TensionToken::HalfDiminished),
    (|s| s.contains_ci("add9"), TensionToken::AddNinth),
    (|s| s.contains_ci("add11"), TensionToken::AddEleventh),
    (|s| s.has_major_seventh(), TensionToken::MajorSeventh),
    (|s| s.has_number("13"), TensionToken::Thirteenth),
    (|s| s.has_number("11"), TensionToken::Eleventh),
    (|s| s.has_number("9"), TensionToken::Ninth),
    (
        |s| s.has_number("7") && !s.has_major_seventh(),
        TensionToken::Seventh,
    ),
    (|s| s.has_number("6"), TensionToken::Sixth),
    (|s| s.contains_ci("sus2"), TensionToken::Sus2),
    (|s| s.has_sus4(), TensionToken::Sus4),
    (|s| s.contains_ci("dim"), TensionToken::Diminished),
    (|s| s.contains_ci("aug"), TensionToken::Augmented),
    (|s| s.contains_ci("alt"), TensionToken::Altered),
    (|s| s.contains_ci("b5"), TensionToken::FlatFive),
    (|s| s.contains_ci("b9"), TensionToken::FlatNine),
    (|s| s.contains_ci("#11"), TensionToken::SharpEleven),
    (|s| s.contains_ci("b13"), TensionToken::FlatThirteen),
];

/// Classify the tonal quality of a suffix.
///
/// `M7` is major, `m7` is minor, `maj7` is major, `min` is minor, and
/// anything unrecognized (including `""`) is major.
pub fn classify(suffix: &str) -> TonalQuality {
    if Suffix::new(suffix).is_minor() {
        TonalQuality::Minor
    } else {
        TonalQuality::Major
    }
}

/// Extract tension tokens from a suffix, in priority order without duplicates.
pub fn extract_tensions(suffix: &str) -> Vec<TensionToken> {
    let suffix = Suffix::new(suffix);
    TENSION_RULES
        .iter()
        .filter(|(applies, _)| applies(&suffix))
        .map(|&(_, token)| token)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Order free-text tension labels by priority.
///
/// Known tokens come first in priority order; unknown labels follow in
/// lexical order. Duplicates are kept.
pub fn sort_tension_labels<S: AsRef<str>>(labels: &mut [S]) {
    labels.sort_by(|a, b| compare_tension_labels(a.as_ref(), b.as_ref()));
}

fn compare_tension_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<TensionToken>(), b.parse::<TensionToken>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::TensionToken::*;

    #[test]
    fn case_sensitive_quality_precedence() {
        assert_eq!(classify("M7"), TonalQuality::Major);
        assert_eq!(classify("m7"), TonalQuality::Minor);
        assert_eq!(classify("maj7"), TonalQuality::Major);
        assert_eq!(classify("min"), TonalQuality::Minor);
        assert_eq!(classify("minor"), TonalQuality::Minor);
        assert_eq!(classify("m"), TonalQuality::Minor);
        assert_eq!(classify(""), TonalQuality::Major);
        assert_eq!(classify("M13"), TonalQuality::Major);
        assert_eq!(classify("7sus4"), TonalQuality::Major);
    }

    #[test]
    fn tensions_come_out_in_priority_order() {
        assert_eq!(extract_tensions("13sus4"), vec![Thirteenth, Sus4]);
        assert_eq!(
            extract_tensions("m7b5"),
            vec![Seventh, FlatFive, HalfDiminished]
        );
        // the altered digits also count as plain numeric tokens
        assert_eq!(
            extract_tensions("7(b9,#11)"),
            vec![Seventh, Ninth, Eleventh, FlatNine, SharpEleven]
        );
        assert_eq!(extract_tensions(""), Vec::<TensionToken>::new());
    }

    #[test]
    fn major_seventh_excludes_plain_seventh() {
        let tokens = extract_tensions("maj7");
        assert!(tokens.contains(&MajorSeventh));
        assert!(!tokens.contains(&Seventh));
        assert_eq!(extract_tensions("M7"), vec![MajorSeventh]);
        assert_eq!(extract_tensions("m7"), vec![Seventh]);
    }

    #[test]
    fn added_tones_do_not_leak_numeric_tokens() {
        assert_eq!(extract_tensions("add9"), vec![AddNinth]);
        assert_eq!(extract_tensions("madd11"), vec![AddEleventh]);
        assert_eq!(extract_tensions("6add9"), vec![Sixth, AddNinth]);
        assert_eq!(extract_tensions("9"), vec![Ninth]);
    }

    #[test]
    fn bare_sus_is_sus4() {
        assert_eq!(extract_tensions("sus"), vec![Sus4]);
        assert_eq!(extract_tensions("sus2"), vec![Sus2]);
        assert_eq!(extract_tensions("7sus"), vec![Seventh, Sus4]);
    }

    #[test]
    fn token_text_round_trips_through_from_str() {
        for token in TensionToken::ALL {
            assert_eq!(token.as_str().parse::<TensionToken>(), Ok(token));
        }
        assert!("maj9".parse::<TensionToken>().is_err());
    }

    #[test]
    fn unknown_labels_sort_after_known_ones() {
        let mut labels = vec!["zz", "sus4", "6", "aa", "M7"];
        sort_tension_labels(&mut labels);
        assert_eq!(labels, vec!["6", "M7", "sus4", "aa", "zz"]);
    }
}
