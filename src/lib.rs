//! # chordset_search
//!
//! Chord-symbol analysis and transposition matching over a catalog of
//! chord sets: parse symbols like `Bbm7b5/Ab`, classify their quality and
//! tensions, build their tones, and find the sets whose head chord can be
//! transposed onto a target chord.
//!
//! ## Example
//! ```rust
//! use chordset_search::{Catalog, CatalogIndex, Query, SearchState};
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1) Load and index a catalog
//!     let catalog = Catalog::from_json_str(
//!         r#"{ "sets": [ { "number": 1, "genre": "Pop", "chords": ["Cmaj7", "Am7"] } ] }"#,
//!     )?;
//!     let index = CatalogIndex::new(&catalog);
//!
//!     // 2) Search for sets that transpose onto G major
//!     let state = SearchState::browse(&index)
//!         .search(Some(&index), &Query::new("G", "major"))?;
//!
//!     // 3) Read the matches
//!     for result in state.visible() {
//!         for m in &result.matches {
//!             println!("{} -> {}: {}", m.from_chord, m.to_chord, m.delta);
//!         }
//!     }
//!     assert_eq!(state.visible()[0].matches[0].delta, -5);
//!
//!     Ok(())
//! }
//! # run().unwrap();
//! ```
//!
//! ## Features
//! - `cli` (default): builds the `chordset` command-line front end via `clap`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Note spellings and pitch classes.
pub use note::{normalize_note, resolve_semitone, NoteSpelling, PitchClass};

/// Chord-symbol parsing.
pub use symbol::{parse_chord_symbol, ParsedChordSymbol};

/// Quality and tension classification.
pub use quality::{
    classify, extract_tensions, sort_tension_labels, TensionToken, TonalQuality, UnknownTension,
};

/// Chord tones.
pub use intervals::{
    build_intervals, render_tones, IntervalSet, ToneRenderer, ToneRendererBuilder,
};

/// Catalog loading and indexing.
pub use catalog::{
    audit_coverage, build_index, genre_list, tension_options, Catalog, CatalogError,
    CatalogIndex, ChordSet, CoverageReport, IndexedChordSet, KeyAnalysis, KeyCandidate,
};

/// Transposition matching.
pub use matcher::{
    compose_target_chord, format_signed, match_set, match_sets, signed_delta, transpose_delta,
    MatchResult, QueryError, SetMatches, TargetSpec,
};

/// Search session state.
pub use search::{GenreFilter, Mode, Query, SearchError, SearchState, Summary, ALL_GENRES};

/// Note normalization module.
pub mod note;

/// Shared suffix pattern tests.
pub mod suffix;

/// Chord-symbol parsing module.
pub mod symbol;

/// Quality classification module.
pub mod quality;

/// Interval building module.
pub mod intervals;

/// Catalog indexing module.
pub mod catalog;

/// Transposition matching module.
pub mod matcher;

/// Search session module.
pub mod search;

/// Presentation view models.
pub mod view;
