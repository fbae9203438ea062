//! Integration tests for indexing, auditing and searching catalog files.

use chordset_search::{
    build_index, view, Catalog, CatalogIndex, ChordSet, GenreFilter, Mode, Query, SearchState,
    TensionToken, ToneRenderer,
};
use lazy_static::lazy_static;
use std::path::PathBuf;
use walkdir::WalkDir;

// Point at `tests/catalogs` in the workspace
const CATALOG_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/catalogs");

/// Gather all .json catalogs under `tests/catalogs`
fn collect_catalog_files(base: &str) -> Vec<PathBuf> {
    WalkDir::new(base)
        .into_iter()
        .filter_map(Result::ok)
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect()
}

lazy_static! {
    static ref STANDARD: CatalogIndex = {
        let catalog = Catalog::load(PathBuf::from(CATALOG_DIR).join("standard.json"))
            .expect("standard catalog loads");
        CatalogIndex::new(&catalog)
    };
}

/// Matched set numbers and their deltas, in catalog order.
fn matched(state: &SearchState<'_>) -> Vec<(u32, i32)> {
    state
        .visible()
        .iter()
        .map(|r| (r.set.number(), r.matches[0].delta))
        .collect()
}

#[test]
fn every_catalog_file_passes_the_audit_totality_check() {
    let files = collect_catalog_files(CATALOG_DIR);
    assert!(files.len() >= 2, "fixtures missing from {CATALOG_DIR}");

    for path in files {
        let catalog = Catalog::load(&path).unwrap();
        let index = CatalogIndex::new(&catalog);
        let report = index.coverage();
        assert_eq!(report.total, catalog.sets.len(), "{}", path.display());
        assert_eq!(
            report.covered + report.uncovered_ids.len(),
            report.total,
            "{}",
            path.display()
        );
        assert_eq!(index.sets().len(), catalog.sets.len());
    }
}

#[test]
fn standard_catalog_is_fully_classified() {
    let report = STANDARD.coverage();
    assert_eq!(report.total, 6);
    assert_eq!(report.covered, 6);
    assert!(report.is_complete());
}

#[test]
fn degraded_entries_are_reported_not_dropped() {
    let catalog = Catalog::load(PathBuf::from(CATALOG_DIR).join("degraded.json")).unwrap();
    let index = CatalogIndex::new(&catalog);
    assert_eq!(index.sets().len(), 4);
    assert_eq!(index.coverage().covered, 1);
    assert_eq!(index.coverage().uncovered_ids, vec![10, 11, 12]);
    assert_eq!(index.genres(), ["Misc"]);

    // the one good set is still searchable
    let state = SearchState::browse(&index)
        .search(Some(&index), &Query::new("A", "minor"))
        .unwrap();
    assert_eq!(matched(&state), vec![(13, 2)]);
}

#[test]
fn head_chords_transpose_onto_g_major() {
    let state = SearchState::browse(&STANDARD)
        .search(Some(&*STANDARD), &Query::new("G", "major"))
        .unwrap();
    assert_eq!(matched(&state), vec![(1, -5), (4, 3), (5, 1)]);

    let visible = state.visible();
    let first = &visible[0].matches[0];
    assert_eq!(first.from_chord, "Cmaj7");
    assert_eq!(first.to_chord, "G");
}

#[test]
fn tension_narrows_the_search() {
    let state = SearchState::browse(&STANDARD)
        .search(Some(&*STANDARD), &Query::new("C", "minor").tension("7"))
        .unwrap();
    assert_eq!(matched(&state), vec![(3, 2)]);
    assert_eq!(state.visible()[0].matches[0].to_chord, "Cm7");
    assert_eq!(state.summary().matched, 1);
}

#[test]
fn flat_root_queries_display_in_sharps() {
    let state = SearchState::browse(&STANDARD)
        .search(Some(&*STANDARD), &Query::new("Bb", "minor"))
        .unwrap();
    assert_eq!(matched(&state), vec![(2, -4), (3, 0), (6, 1)]);
    assert_eq!(state.last_target().unwrap().target_chord_label, "A#m");
}

#[test]
fn genre_filter_and_mode_switching() {
    let jazz = SearchState::browse(&STANDARD).with_genre(GenreFilter::Only("Jazz".into()));
    assert_eq!(jazz.visible().len(), 2);

    let searched = jazz
        .search(Some(&*STANDARD), &Query::new("A", "minor"))
        .unwrap();
    assert_eq!(matched(&searched), vec![(2, -5), (3, -1)]);
    assert_eq!(
        view::summary_line(&searched.summary()),
        "genre: Jazz | Am: 2 / 2 sets match"
    );

    let back = searched.browse_again(&STANDARD);
    assert_eq!(back.mode(), Mode::Browse);
    assert_eq!(back.visible().len(), 2);
    assert_eq!(
        view::summary_line(&back.summary()),
        "genre: Jazz | showing all 2 sets"
    );
}

#[test]
fn option_lists_come_from_the_catalog() {
    assert_eq!(
        STANDARD.tension_options(),
        [
            TensionToken::Seventh,
            TensionToken::MajorSeventh,
            TensionToken::Ninth,
            TensionToken::Sus4,
            TensionToken::FlatFive,
            TensionToken::HalfDiminished,
        ]
    );
    assert_eq!(STANDARD.genres(), ["Ballad", "Jazz", "Pop", "Rock"]);
}

#[test]
fn cards_show_keyboard_tones_from_shared_keys() {
    let state = SearchState::browse(&STANDARD);
    let cards = view::cards(&state, &ToneRenderer::new());
    assert_eq!(cards.len(), 6);

    let pop = &cards[0];
    assert_eq!(pop.analysis[0], "best key: C major");
    assert!(pop.analysis.contains(&"white-key inference: C major (92%)".to_string()));

    let b = &pop.keyboard.white[6];
    assert_eq!(b.chord.as_deref(), Some("Bm7b5"));
    assert_eq!(b.tones, vec!["B5", "D6", "F6", "A6"]);
    // empty chord strings leave keys empty
    assert!(pop.keyboard.black.iter().all(|k| k.is_empty()));

    let slash = &cards[2].keyboard.white[0];
    assert_eq!(slash.chord.as_deref(), Some("Bbm7b5/Ab"));
    assert_eq!(slash.tones, vec!["G#4", "A#5", "C#6", "E6", "G#6"]);
}

#[test]
fn search_without_catalog_is_an_error() {
    let state = SearchState::default();
    let err = state.search(None, &Query::new("C", "major")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "no chord-set catalog is loaded; load a catalog file first"
    );
}

#[test]
fn single_set_scenario() {
    let index = build_index(&[ChordSet {
        number: 1,
        genre: String::new(),
        chords: vec!["Cmaj7".into(), "Dm7".into()],
        keys: Vec::new(),
        voicings: None,
        analysis: None,
    }]);
    let target = chordset_search::TargetSpec::from_query("G", "major", "").unwrap();
    let results = chordset_search::match_sets(&target, &index);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].matches.len(), 1);
    assert_eq!(results[0].matches[0].from_chord, "Cmaj7");
    assert_eq!(results[0].matches[0].to_chord, "G");
    assert_eq!(results[0].matches[0].delta, -5);
}
