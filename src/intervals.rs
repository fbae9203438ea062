//! Interval Builder
//!
//! Derives chord tones, as semitone offsets from the root, from a chord
//! suffix and renders them as octave-qualified note names for the keyboard.
//!
//! Building runs in three stages, each an ordered rule table:
//! 1. pick the base triad (first match wins),
//! 2. apply overrides in sequence, each rewriting the previous result,
//! 3. add extensions, where each group contributes its first matching tone.

use crate::{note::PitchClass, suffix::Suffix, symbol::parse_chord_symbol};

const OCTAVE: i32 = 12;

/// Octave of the chord root when rendering tones.
const DEFAULT_BASE_OCTAVE: i32 = 5;

/// Ascending, duplicate-free semitone offsets from the chord root.
pub type IntervalSet = Vec<i32>;

type Predicate = fn(&Suffix<'_>) -> bool;

/// Base triads, first match wins.
const BASE_TRIADS: &[(Predicate, &[i32])] = &[
    (|s| s.contains_ci("5c4") || s.starts_with_ci("5"), &[0, 7]),
    (|s| s.contains_ci("4c4"), &[0, 5, 7]),
    (|s| s.contains_ci("sus2"), &[0, 2, 7]),
    (|s| s.has_sus4(), &[0, 5, 7]),
    (|s| s.contains_ci("dim"), &[0, 3, 6]),
    (|s| s.contains_ci("aug") || s.contains_ci("#5"), &[0, 4, 8]),
    (|s| s.is_minor(), &[0, 3, 7]),
];

const MAJOR_TRIAD: &[i32] = &[0, 4, 7];

/// Changes applied to the base triad.
enum Override {
    /// Drop every element equal to one of these.
    Remove(&'static [i32]),
    /// Rewrite `from` into `to`, or append `to` when `from` is absent.
    Replace { from: i32, to: i32 },
}

const OVERRIDES: &[(Predicate, Override)] = &[
    (|s| s.contains_ci("no3"), Override::Remove(&[3, 4])),
    (|s| s.contains_ci("b5"), Override::Replace { from: 7, to: 6 }),
    (|s| s.contains_ci("#5"), Override::Replace { from: 7, to: 8 }),
];

/// Each group adds the tone of its first matching rule, if any.
const EXTENSIONS: &[&[(Predicate, i32)]] = &[
    &[
        (|s| s.contains_ci("dim7"), 9),
        (|s| s.has_major_seventh(), 11),
        (|s| s.has_number("7"), 10),
    ],
    &[(|s| s.has_number("6"), 9)],
    &[
        (|s| s.contains_ci("b9"), 13),
        (|s| s.contains_ci("add9") || s.has_number("9"), 14),
    ],
    &[
        (|s| s.contains_ci("#11"), 18),
        (|s| s.contains_ci("add11") || s.has_number("11"), 17),
    ],
    &[
        (|s| s.contains_ci("b13"), 20),
        (|s| s.has_number("13"), 21),
    ],
];

impl Override {
    fn apply(&self, intervals: &mut Vec<i32>) {
        match *self {
            Override::Remove(values) => intervals.retain(|v| !values.contains(v)),
            Override::Replace { from, to } => match intervals.iter().position(|&v| v == from) {
                Some(idx) => intervals[idx] = to,
                None => intervals.push(to),
            },
        }
    }
}

/// Build the interval set of a chord suffix.
///
/// ```
/// use chordset_search::build_intervals;
///
/// assert_eq!(build_intervals("maj7"), vec![0, 4, 7, 11]);
/// assert_eq!(build_intervals("m7b5"), vec![0, 3, 6, 10]);
/// ```
pub fn build_intervals(suffix: &str) -> IntervalSet {
    let suffix = Suffix::new(suffix);

    let mut intervals = BASE_TRIADS
        .iter()
        .find(|(applies, _)| applies(&suffix))
        .map_or(MAJOR_TRIAD, |&(_, triad)| triad)
        .to_vec();

    for (applies, change) in OVERRIDES {
        if applies(&suffix) {
            change.apply(&mut intervals);
        }
    }

    for group in EXTENSIONS {
        if let Some(&(_, tone)) = group.iter().find(|(applies, _)| applies(&suffix)) {
            intervals.push(tone);
        }
    }

    intervals.sort_unstable();
    intervals.dedup();
    intervals
}

/// Render intervals above `root` as note names such as `E5` or `D6`.
///
/// The octave rises every 12 semitones above `base_octave`. A bass note is
/// prepended one octave below. Repeated names keep their first position.
pub fn render_tones(
    root: PitchClass,
    intervals: &[i32],
    base_octave: i32,
    bass: Option<PitchClass>,
) -> Vec<String> {
    let bass = bass.map(|pc| format!("{}{}", pc, base_octave - 1));
    let chord_tones = intervals.iter().map(|&interval| {
        let sum = root.semitone() as i32 + interval;
        format!(
            "{}{}",
            PitchClass::from_semitone(sum),
            base_octave + sum.div_euclid(OCTAVE)
        )
    });

    let mut tones: Vec<String> = Vec::with_capacity(intervals.len() + 1);
    for tone in bass.into_iter().chain(chord_tones) {
        if !tones.contains(&tone) {
            tones.push(tone);
        }
    }
    tones
}

/// Builder for [`ToneRenderer`]
pub struct ToneRendererBuilder {
    base_octave: i32,
    include_bass: bool,
}

impl ToneRendererBuilder {
    /// Create a new builder with base octave 5 and slash-bass rendering on.
    pub fn new() -> Self {
        ToneRendererBuilder {
            base_octave: DEFAULT_BASE_OCTAVE,
            include_bass: true,
        }
    }

    /// Set the octave the chord root is rendered in.
    pub fn base_octave(mut self, octave: i32) -> Self {
        self.base_octave = octave;
        self
    }

    /// Whether a slash-chord bass is prepended below the chord.
    pub fn include_bass(mut self, value: bool) -> Self {
        self.include_bass = value;
        self
    }

    /// Build the `ToneRenderer`
    pub fn build(self) -> ToneRenderer {
        ToneRenderer {
            base_octave: self.base_octave,
            include_bass: self.include_bass,
        }
    }
}

impl Default for ToneRendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns whole chord symbols into the tone names shown on a keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneRenderer {
    base_octave: i32,
    include_bass: bool,
}

impl ToneRenderer {
    /// Return a builder to customize octave and bass handling
    pub fn builder() -> ToneRendererBuilder {
        ToneRendererBuilder::new()
    }

    /// Renderer with the default settings
    pub fn new() -> Self {
        ToneRendererBuilder::new().build()
    }

    /// Tones of a chord symbol, e.g. `["C5", "E5", "G5", "B5"]` for `Cmaj7`.
    ///
    /// Returns an empty list when the root does not resolve. A bass that does
    /// not resolve is left out.
    pub fn chord_tones(&self, symbol: &str) -> Vec<String> {
        let parsed = parse_chord_symbol(symbol);
        let Some(root) = parsed.root_pitch() else {
            return Vec::new();
        };
        let bass = if self.include_bass {
            parsed.bass_pitch()
        } else {
            None
        };
        render_tones(root, &build_intervals(&parsed.suffix), self.base_octave, bass)
    }
}

impl Default for ToneRenderer {
    fn default() -> Self {
        ToneRenderer::new()
    }
}
