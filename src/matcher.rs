//! Transpose Matcher
//!
//! Compares a target chord against the head chord of every indexed set and
//! computes the signed semitone shift that moves one onto the other.

use serde::Serialize;
use thiserror::Error;

use crate::{
    catalog::IndexedChordSet,
    note::{normalize_note, NoteSpelling, PitchClass},
    quality::{TensionToken, TonalQuality},
};

const SEMITONES: i32 = 12;

/// Largest shift in either direction. `+6` is used, `-6` never is.
const MAX_SHIFT: i32 = SEMITONES / 2;

/// Errors when building a search target from user input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The root text is not a supported note name.
    #[error("enter a valid root note (C, C#, Db, ...), got `{0}`")]
    InvalidRoot(String),

    /// The quality selection is not `major` or `minor`.
    #[error("base type must be `major` or `minor`, got `{0}`")]
    InvalidQuality(String),

    /// The tension selection is not a known token.
    #[error("unknown tension `{0}`")]
    UnknownTension(String),
}

/// What to search for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSpec {
    /// Target root.
    pub root: PitchClass,
    /// Required quality of the head chord.
    pub base_type: TonalQuality,
    /// Required tension, if any.
    pub tension: Option<TensionToken>,
    /// Display label such as `Gm7`.
    pub target_chord_label: String,
}

impl TargetSpec {
    /// Build a target from already-typed parts.
    pub fn new(root: PitchClass, base_type: TonalQuality, tension: Option<TensionToken>) -> Self {
        TargetSpec {
            root,
            base_type,
            tension,
            target_chord_label: compose_target_chord(root, base_type, tension),
        }
    }

    /// Build a target from free-text query fields.
    ///
    /// `quality` must be exactly `major` or `minor`. An empty `tension`
    /// means no tension requirement.
    pub fn from_query(root: &str, quality: &str, tension: &str) -> Result<Self, QueryError> {
        let root_pc = normalize_note(root)
            .as_ref()
            .and_then(NoteSpelling::pitch_class)
            .ok_or_else(|| QueryError::InvalidRoot(root.to_string()))?;

        let base_type = match quality {
            "major" => TonalQuality::Major,
            "minor" => TonalQuality::Minor,
            other => return Err(QueryError::InvalidQuality(other.to_string())),
        };

        let tension = match tension {
            "" => None,
            text => Some(
                text.parse::<TensionToken>()
                    .map_err(|_| QueryError::UnknownTension(text.to_string()))?,
            ),
        };

        Ok(Self::new(root_pc, base_type, tension))
    }

    /// Whether a set is eligible for this target, ignoring roots.
    pub fn accepts(&self, set: &IndexedChordSet) -> bool {
        set.base_type == self.base_type && self.tension.is_none_or(|t| set.has_tension(t))
    }
}

/// Label of a target chord: root, `m` for minor, then the tension text.
pub fn compose_target_chord(
    root: PitchClass,
    base_type: TonalQuality,
    tension: Option<TensionToken>,
) -> String {
    let quality = match base_type {
        TonalQuality::Minor => "m",
        TonalQuality::Major => "",
    };
    let tension = tension.map_or("", TensionToken::as_str);
    format!("{root}{quality}{tension}")
}

/// A single transposition from a set's head chord to the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Head chord as written in the catalog.
    pub from_chord: String,
    /// Target chord label.
    pub to_chord: String,
    /// Semitone shift in `-5..=6`.
    pub delta: i32,
}

/// A set together with its matches for one query (zero or one).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetMatches<'a> {
    /// The indexed set.
    #[serde(flatten)]
    pub set: &'a IndexedChordSet,
    /// At most one match; only the head chord is ever matched.
    pub matches: Vec<MatchResult>,
}

impl<'a> SetMatches<'a> {
    /// The set with no matches, as shown when browsing.
    pub fn unmatched(set: &'a IndexedChordSet) -> Self {
        SetMatches {
            set,
            matches: Vec::new(),
        }
    }

    /// Whether the set matched.
    pub fn is_match(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Map an upward distance in `0..=11` to the range `-5..=6`.
///
/// A tritone stays `+6`; `-6` is never produced.
pub const fn signed_delta(unsigned: i32) -> i32 {
    if unsigned <= MAX_SHIFT {
        unsigned
    } else {
        unsigned - SEMITONES
    }
}

/// Signed shift that moves `from` onto `to`.
pub const fn transpose_delta(from: PitchClass, to: PitchClass) -> i32 {
    let unsigned = (to.semitone() as i32 - from.semitone() as i32 + SEMITONES) % SEMITONES;
    signed_delta(unsigned)
}

/// Shift formatted with an explicit `+` for upward moves.
pub fn format_signed(delta: i32) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

/// Match one set against the target.
pub fn match_set<'a>(target: &TargetSpec, set: &'a IndexedChordSet) -> SetMatches<'a> {
    if !target.accepts(set) {
        return SetMatches::unmatched(set);
    }
    let Some(head) = set.head_root.as_ref().and_then(NoteSpelling::pitch_class) else {
        return SetMatches::unmatched(set);
    };
    SetMatches {
        set,
        matches: vec![MatchResult {
            from_chord: set.head_chord.clone(),
            to_chord: target.target_chord_label.clone(),
            delta: transpose_delta(head, target.root),
        }],
    }
}

/// Match every set against the target, keeping catalog order.
pub fn match_sets<'a>(target: &TargetSpec, sets: &'a [IndexedChordSet]) -> Vec<SetMatches<'a>> {
    let results: Vec<SetMatches<'a>> = sets.iter().map(|set| match_set(target, set)).collect();
    log::debug!(
        target: "chordset::matcher",
        "{}: {} of {} sets matched",
        target.target_chord_label,
        results.iter().filter(|r| r.is_match()).count(),
        results.len()
    );
    results
}
