//! Chord symbols
//!
//! Splits a chord symbol such as `Bbm7b5/Ab` into root, quality suffix and
//! optional bass note.

use serde::Serialize;

use crate::note::{normalize_note, NoteSpelling, PitchClass};

/// A chord symbol split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParsedChordSymbol {
    /// Root spelling; `None` when the symbol does not start with a note letter.
    pub root: Option<NoteSpelling>,
    /// Quality/tension suffix with whitespace removed, e.g. `m7b5`.
    pub suffix: String,
    /// Bass note after `/`, if any.
    pub bass: Option<NoteSpelling>,
}

impl ParsedChordSymbol {
    /// Root pitch class, if the root spelling resolves.
    pub fn root_pitch(&self) -> Option<PitchClass> {
        self.root.as_ref().and_then(NoteSpelling::pitch_class)
    }

    /// Bass pitch class, if present and resolvable.
    pub fn bass_pitch(&self) -> Option<PitchClass> {
        self.bass.as_ref().and_then(NoteSpelling::pitch_class)
    }
}

/// Parse a chord symbol.
///
/// Never fails: text that does not open with `A`..`G` yields an empty
/// result with `root: None`, which callers must check.
pub fn parse_chord_symbol(symbol: &str) -> ParsedChordSymbol {
    let mut chars = symbol.char_indices();
    let Some((_, letter)) = chars.next() else {
        return ParsedChordSymbol::default();
    };
    if !letter.is_ascii() || !('A'..='G').contains(&letter.to_ascii_uppercase()) {
        return ParsedChordSymbol::default();
    }

    let mut rest_at = letter.len_utf8();
    if let Some((at, acc @ ('#' | 'b'))) = chars.next() {
        rest_at = at + acc.len_utf8();
    }

    let root = normalize_note(&symbol[..rest_at]);
    let rest: String = symbol[rest_at..]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let (suffix, bass) = match rest.split_once('/') {
        Some((suffix, bass)) => (suffix.to_string(), normalize_note(bass)),
        None => (rest, None),
    };

    ParsedChordSymbol { root, suffix, bass }
}
