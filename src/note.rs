//! Note names
//!
//! Canonicalization of free-text note spellings and their resolution to
//! twelve-tone pitch classes.

use std::fmt::Display;

use serde::Serialize;

const SEMITONES: i32 = 12;

/// Sharp-only display spelling, indexed by semitone.
const SHARP_NAMES: [&str; SEMITONES as usize] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Spellings accepted by [`resolve_semitone`]. E#, Fb, B# and Cb are not supported.
const SPELLING_TABLE: [(&str, u8); 17] = [
    ("C", 0),
    ("C#", 1),
    ("Db", 1),
    ("D", 2),
    ("D#", 3),
    ("Eb", 3),
    ("E", 4),
    ("F", 5),
    ("F#", 6),
    ("Gb", 6),
    ("G", 7),
    ("G#", 8),
    ("Ab", 8),
    ("A", 9),
    ("A#", 10),
    ("Bb", 10),
    ("B", 11),
];

/// Twelve chromatic pitch classes
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum PitchClass {
    /// C
    C,
    /// C sharp / D flat
    Cs,
    /// D
    D,
    /// D sharp / E flat
    Ds,
    /// E
    E,
    /// F
    F,
    /// F sharp / G flat
    Fs,
    /// G
    G,
    /// G sharp / A flat
    Gs,
    /// A
    A,
    /// A sharp / B flat
    As,
    /// B
    B,
}

impl PitchClass {
    const ALL: [PitchClass; SEMITONES as usize] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Pitch class of any semitone number, wrapping modulo 12.
    pub const fn from_semitone(value: i32) -> PitchClass {
        Self::ALL[value.rem_euclid(SEMITONES) as usize]
    }

    /// Semitone number in `0..=11`, with C = 0.
    pub const fn semitone(self) -> u8 {
        self as u8
    }

    /// Canonical sharp spelling, e.g. `C#` for both `C#` and `Db` input.
    pub const fn sharp_name(self) -> &'static str {
        SHARP_NAMES[self as usize]
    }

    /// Normalize and resolve free text in one step.
    ///
    /// Returns `None` when the text has no leading note letter or when the
    /// spelling is outside the supported table (e.g. `Fb`).
    pub fn parse(text: &str) -> Option<PitchClass> {
        normalize_note(text)?.pitch_class()
    }

    /// All twelve pitch classes in ascending semitone order.
    pub fn all() -> impl Iterator<Item = PitchClass> {
        Self::ALL.into_iter()
    }
}

impl Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sharp_name())
    }
}

impl From<PitchClass> for String {
    fn from(pc: PitchClass) -> Self {
        pc.sharp_name().to_string()
    }
}

/// A normalized note spelling: an upper-case letter plus an optional `#`/`b`.
///
/// The accidental is kept as written, so `Db` and `C#` remain distinct
/// spellings of the same [`PitchClass`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteSpelling(String);

impl NoteSpelling {
    /// The spelling text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Semitone of this spelling, if it is in the supported table.
    pub fn semitone(&self) -> Option<u8> {
        resolve_semitone(&self.0)
    }

    /// Pitch class of this spelling, if it is in the supported table.
    pub fn pitch_class(&self) -> Option<PitchClass> {
        self.semitone().map(|s| PitchClass::from_semitone(s as i32))
    }
}

impl Display for NoteSpelling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize a free-text note spelling.
///
/// Whitespace is stripped and Unicode `♯`/`♭` become `#`/`b`. The leading
/// letter `A`..`G` (either case) is upper-cased and at most one accidental
/// is kept; anything after that is ignored.
pub fn normalize_note(text: &str) -> Option<NoteSpelling> {
    let mut chars = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '♯' => '#',
            '♭' => 'b',
            other => other,
        });

    let letter = chars.next()?.to_ascii_uppercase();
    if !('A'..='G').contains(&letter) {
        return None;
    }

    let mut spelling = String::with_capacity(2);
    spelling.push(letter);
    if let Some(acc @ ('#' | 'b')) = chars.next() {
        spelling.push(acc);
    }
    Some(NoteSpelling(spelling))
}

/// Look up the semitone of an already-normalized spelling.
pub fn resolve_semitone(spelling: &str) -> Option<u8> {
    SPELLING_TABLE
        .iter()
        .find(|(name, _)| *name == spelling)
        .map(|&(_, semitone)| semitone)
}
