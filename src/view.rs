//! View models
//!
//! Plain data for a front end to draw: result cards, a one-octave keyboard
//! with the chord on each key, and summary text.

use serde::Serialize;

use crate::{
    catalog::{ChordSet, CoverageReport, KeyAnalysis},
    intervals::ToneRenderer,
    matcher::{format_signed, SetMatches},
    quality::TonalQuality,
    search::{GenreFilter, Mode, SearchState, Summary},
};

const WHITE_KEY_NOTES: [&str; 7] = ["C", "D", "E", "F", "G", "A", "B"];

/// Black keys and the white-key boundary each one sits on.
const BLACK_KEY_LAYOUT: [(&str, u8); 5] = [("C#", 1), ("D#", 2), ("F#", 4), ("G#", 5), ("A#", 6)];

/// Whether a key is white or black.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyColor {
    /// White key
    White,
    /// Black key
    Black,
}

/// One keyboard key and the chord assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyView {
    /// Key label, e.g. `F#`.
    pub note: &'static str,
    /// White or black.
    pub color: KeyColor,
    /// Chord on this key, if any.
    pub chord: Option<String>,
    /// Tones of `chord`; empty when there is no chord or it cannot be read.
    pub tones: Vec<String>,
    /// Horizontal position of a black key as a percentage of the keyboard width.
    pub left_percent: Option<f32>,
}

impl KeyView {
    /// Whether no chord sits on this key.
    pub fn is_empty(&self) -> bool {
        self.chord.is_none()
    }
}

/// The keyboard of one chord set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyboardView {
    /// White keys, C to B.
    pub white: Vec<KeyView>,
    /// Black keys, C# to A#.
    pub black: Vec<KeyView>,
}

impl KeyboardView {
    /// Lay out `set`'s chords by their key labels.
    pub fn new(set: &ChordSet, renderer: &ToneRenderer) -> Self {
        let key = |note: &'static str, color: KeyColor, left_percent: Option<f32>| {
            let chord = chord_on_key(set, note).map(str::to_string);
            let tones = chord
                .as_deref()
                .map(|c| renderer.chord_tones(c))
                .unwrap_or_default();
            KeyView {
                note,
                color,
                chord,
                tones,
                left_percent,
            }
        };

        KeyboardView {
            white: WHITE_KEY_NOTES
                .iter()
                .map(|&note| key(note, KeyColor::White, None))
                .collect(),
            black: BLACK_KEY_LAYOUT
                .iter()
                .map(|&(note, anchor)| {
                    let left = anchor as f32 / WHITE_KEY_NOTES.len() as f32 * 100.0;
                    key(note, KeyColor::Black, Some(left))
                })
                .collect(),
        }
    }

    /// All keys, white first.
    pub fn keys(&self) -> impl Iterator<Item = &KeyView> {
        self.white.iter().chain(&self.black)
    }
}

/// Chord mapped to a key label. Later duplicates of a label win, and an
/// empty chord string leaves the key empty.
fn chord_on_key<'s>(set: &'s ChordSet, note: &str) -> Option<&'s str> {
    set.keys
        .iter()
        .zip(&set.chords)
        .rev()
        .find(|(key, _)| !key.is_empty() && key.as_str() == note)
        .map(|(_, chord)| chord.as_str())
        .filter(|chord| !chord.is_empty())
}

/// What a card says under its title.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Headline {
    /// Transposition lines, e.g. `Cmaj7 -> G: -5`.
    Matches {
        /// One line per match.
        lines: Vec<String>,
    },
    /// Search mode, set did not match.
    NoMatch,
    /// Browse mode: head chord and quality.
    HeadInfo {
        /// Head chord as written.
        head_chord: String,
        /// Quality of the head chord.
        base_type: TonalQuality,
    },
}

/// Everything shown for one chord set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetCard {
    /// Catalog identifier.
    pub number: u32,
    /// Genre label.
    pub genre: String,
    /// Line under the title.
    pub headline: Headline,
    /// Key-analysis lines, empty when the set has no analysis.
    pub analysis: Vec<String>,
    /// Keyboard with chords and tones.
    pub keyboard: KeyboardView,
}

impl SetCard {
    /// Card for one result in the given mode.
    pub fn new(result: &SetMatches<'_>, mode: Mode, renderer: &ToneRenderer) -> Self {
        let set = result.set;
        let headline = if result.is_match() {
            Headline::Matches {
                lines: result
                    .matches
                    .iter()
                    .map(|m| {
                        format!(
                            "{} -> {}: {}",
                            m.from_chord,
                            m.to_chord,
                            format_signed(m.delta)
                        )
                    })
                    .collect(),
            }
        } else if mode == Mode::Search {
            Headline::NoMatch
        } else {
            Headline::HeadInfo {
                head_chord: set.head_chord.clone(),
                base_type: set.base_type,
            }
        };
        SetCard {
            number: set.number(),
            genre: set.genre().to_string(),
            headline,
            analysis: set.set.analysis.as_ref().map(analysis_lines).unwrap_or_default(),
            keyboard: KeyboardView::new(&set.set, renderer),
        }
    }
}

/// Cards for every visible result of `state`.
pub fn cards(state: &SearchState<'_>, renderer: &ToneRenderer) -> Vec<SetCard> {
    state
        .visible()
        .into_iter()
        .map(|result| SetCard::new(result, state.mode(), renderer))
        .collect()
}

/// A `[0, 1]` ratio as a whole percentage, e.g. `0.826` -> `83%`.
pub fn format_percent(value: f64) -> String {
    format!("{}%", (value * 100.0).round())
}

/// Human-readable lines for a key analysis. Missing fields are skipped.
pub fn analysis_lines(analysis: &KeyAnalysis) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(best) = &analysis.best_key {
        lines.push(format!("best key: {best}"));
    }
    if let Some(white) = &analysis.white_inferred_key {
        match analysis.white_inferred_key_score {
            Some(score) => lines.push(format!(
                "white-key inference: {white} ({})",
                format_percent(score)
            )),
            None => lines.push(format!("white-key inference: {white}")),
        }
    }
    if let Some(ratio) = analysis.diatonic_tone_ratio {
        lines.push(format!("diatonic tones: {}", format_percent(ratio)));
    }
    if !analysis.tags.is_empty() {
        lines.push(format!("tags: {}", analysis.tags.join(", ")));
    }
    if !analysis.top_keys.is_empty() {
        let keys: Vec<&str> = analysis.top_keys.iter().map(|k| k.key.as_str()).collect();
        lines.push(format!("top keys: {}", keys.join(" / ")));
    }
    lines
}

/// One-line classification check for the loaded catalog.
pub fn coverage_line(report: &CoverageReport) -> String {
    if report.is_complete() {
        format!(
            "classification check: {}/{} sets classified as major/minor",
            report.covered, report.total
        )
    } else {
        let ids: Vec<String> = report.uncovered_ids.iter().map(u32::to_string).collect();
        format!(
            "classification check: {}/{} sets; unclassified: {}",
            report.covered,
            report.total,
            ids.join(", ")
        )
    }
}

/// One-line description of the current view.
pub fn summary_line(summary: &Summary) -> String {
    let genre = match &summary.genre {
        GenreFilter::All => "all genres".to_string(),
        GenreFilter::Only(genre) => format!("genre: {genre}"),
    };
    match summary.mode {
        Mode::Browse => format!("{genre} | showing all {} sets", summary.visible),
        Mode::Search => format!(
            "{genre} | {}: {} / {} sets match",
            summary.target_label.as_deref().unwrap_or("(no search)"),
            summary.matched,
            summary.filtered_total
        ),
    }
}
