//! Catalog Indexer
//!
//! Chord-set catalog model, JSON loading, and the one-time index that
//! classifies each set's head chord for searching.

use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    note::NoteSpelling,
    quality::{classify, extract_tensions, TensionToken, TonalQuality},
    symbol::parse_chord_symbol,
};

/// Errors when loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog text is not a valid catalog document.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One ranked key candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyCandidate {
    /// Key name, e.g. `C major`.
    pub key: String,
}

/// Key-inference metadata computed outside this crate and passed through.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyAnalysis {
    /// Most likely key.
    pub best_key: Option<String>,
    /// Key inferred from white-key usage.
    pub white_inferred_key: Option<String>,
    /// Confidence of `white_inferred_key`, in `[0, 1]`.
    pub white_inferred_key_score: Option<f64>,
    /// Share of diatonic tones, in `[0, 1]`.
    pub diatonic_tone_ratio: Option<f64>,
    /// Free-form labels.
    pub tags: Vec<String>,
    /// Ranked key candidates.
    pub top_keys: Vec<KeyCandidate>,
}

/// A catalog entry: an ordered progression of chords laid out on keyboard keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSet {
    /// Stable identifier.
    pub number: u32,
    /// Genre label, may be empty.
    #[serde(default)]
    pub genre: String,
    /// Chord symbols, one per keyboard key.
    pub chords: Vec<String>,
    /// Key labels parallel to `chords`.
    #[serde(default)]
    pub keys: Vec<String>,
    /// Precomputed tone labels parallel to `chords`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voicings: Option<Vec<Vec<String>>>,
    /// Precomputed key analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<KeyAnalysis>,
}

/// The whole catalog document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Key labels shared by every set that does not carry its own.
    #[serde(default)]
    pub keys: Vec<String>,
    /// The chord sets, in catalog order.
    pub sets: Vec<ChordSet>,
}

impl Catalog {
    /// Parse a catalog from JSON text.
    pub fn from_json_str(text: &str) -> Result<Catalog, CatalogError> {
        let catalog: Catalog = serde_json::from_str(text)?;
        Ok(catalog.with_shared_keys())
    }

    /// Parse a catalog from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Catalog, CatalogError> {
        let catalog: Catalog = serde_json::from_reader(reader)?;
        Ok(catalog.with_shared_keys())
    }

    /// Load a catalog JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let catalog = Self::from_reader(BufReader::new(file))?;
        log::info!(
            target: "chordset::catalog",
            "loaded {} chord sets from {}",
            catalog.sets.len(),
            path.display()
        );
        Ok(catalog)
    }

    fn with_shared_keys(mut self) -> Self {
        if !self.keys.is_empty() {
            for set in self.sets.iter_mut().filter(|set| set.keys.is_empty()) {
                set.keys = self.keys.clone();
            }
        }
        self
    }
}

/// A chord set with its head chord classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedChordSet {
    /// The catalog entry.
    #[serde(flatten)]
    pub set: ChordSet,
    /// `chords[0]`, or `""` for an empty set.
    pub head_chord: String,
    /// Root of the head chord; `None` if it did not parse.
    pub head_root: Option<NoteSpelling>,
    /// Suffix of the head chord.
    pub head_suffix: String,
    /// Quality of the head chord.
    pub base_type: TonalQuality,
    /// Tensions of the head chord, in priority order.
    pub tensions: Vec<TensionToken>,
}

impl IndexedChordSet {
    /// Classify the head chord of `set`.
    pub fn new(set: ChordSet) -> Self {
        let head_chord = set.chords.first().cloned().unwrap_or_default();
        let parsed = parse_chord_symbol(&head_chord);
        let base_type = classify(&parsed.suffix);
        let tensions = extract_tensions(&parsed.suffix);
        log::debug!(
            target: "chordset::index",
            "set {}: head {:?} -> {} {:?}",
            set.number,
            head_chord,
            base_type,
            tensions
        );
        IndexedChordSet {
            set,
            head_chord,
            head_root: parsed.root,
            head_suffix: parsed.suffix,
            base_type,
            tensions,
        }
    }

    /// Catalog identifier.
    pub fn number(&self) -> u32 {
        self.set.number
    }

    /// Genre label.
    pub fn genre(&self) -> &str {
        &self.set.genre
    }

    /// Whether the head chord carries `token`.
    pub fn has_tension(&self, token: TensionToken) -> bool {
        self.tensions.contains(&token)
    }
}

/// Index every set. Order-preserving and total: a bad head chord degrades
/// to `head_root: None`, major quality and no tensions.
pub fn build_index(sets: &[ChordSet]) -> Vec<IndexedChordSet> {
    sets.iter().cloned().map(IndexedChordSet::new).collect()
}

/// Classification coverage of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    /// Number of sets checked.
    pub total: usize,
    /// Sets with a usable root and quality.
    pub covered: usize,
    /// Numbers of the sets that are not covered, in index order.
    pub uncovered_ids: Vec<u32>,
}

impl CoverageReport {
    /// Whether every set is covered.
    pub fn is_complete(&self) -> bool {
        self.uncovered_ids.is_empty()
    }
}

/// Report which sets could not be classified. Reads only.
pub fn audit_coverage(sets: &[IndexedChordSet]) -> CoverageReport {
    let uncovered_ids: Vec<u32> = sets
        .iter()
        .filter(|set| !is_covered(set))
        .map(IndexedChordSet::number)
        .collect();
    CoverageReport {
        total: sets.len(),
        covered: sets.len() - uncovered_ids.len(),
        uncovered_ids,
    }
}

fn is_covered(set: &IndexedChordSet) -> bool {
    let has_root = set
        .head_root
        .as_ref()
        .and_then(NoteSpelling::pitch_class)
        .is_some();
    let has_quality = matches!(set.base_type, TonalQuality::Major | TonalQuality::Minor);
    has_root && has_quality
}

/// Every tension present in the index, in priority order.
pub fn tension_options(sets: &[IndexedChordSet]) -> Vec<TensionToken> {
    sets.iter()
        .flat_map(|set| set.tensions.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct non-empty genres, sorted.
pub fn genre_list(sets: &[IndexedChordSet]) -> Vec<String> {
    sets.iter()
        .map(IndexedChordSet::genre)
        .filter(|genre| !genre.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// A loaded catalog ready for browsing and searching.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    sets: Vec<IndexedChordSet>,
    tensions: Vec<TensionToken>,
    genres: Vec<String>,
    coverage: CoverageReport,
}

impl CatalogIndex {
    /// Index `catalog` and derive its option lists.
    ///
    /// Sets without key labels of their own take the catalog's shared keys.
    pub fn new(catalog: &Catalog) -> Self {
        let sets: Vec<IndexedChordSet> = catalog
            .clone()
            .with_shared_keys()
            .sets
            .into_iter()
            .map(IndexedChordSet::new)
            .collect();
        let coverage = audit_coverage(&sets);
        if coverage.is_complete() {
            log::info!(
                target: "chordset::index",
                "indexed {} sets, all classified as major/minor",
                coverage.total
            );
        } else {
            log::warn!(
                target: "chordset::index",
                "indexed {} sets, {} unclassified: {:?}",
                coverage.total,
                coverage.uncovered_ids.len(),
                coverage.uncovered_ids
            );
        }
        CatalogIndex {
            tensions: tension_options(&sets),
            genres: genre_list(&sets),
            sets,
            coverage,
        }
    }

    /// Indexed sets in catalog order.
    pub fn sets(&self) -> &[IndexedChordSet] {
        &self.sets
    }

    /// Tensions available for querying.
    pub fn tension_options(&self) -> &[TensionToken] {
        &self.tensions
    }

    /// Genres available for filtering.
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Coverage computed at load time.
    pub fn coverage(&self) -> &CoverageReport {
        &self.coverage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(number: u32, genre: &str, chords: &[&str]) -> ChordSet {
        ChordSet {
            number,
            genre: genre.to_string(),
            chords: chords.iter().map(|c| c.to_string()).collect(),
            keys: Vec::new(),
            voicings: None,
            analysis: None,
        }
    }

    #[test]
    fn indexes_the_head_chord_only() {
        let index = build_index(&[set(1, "Pop", &["Am7", "D9", "Gmaj7"])]);
        let head = &index[0];
        assert_eq!(head.head_chord, "Am7");
        assert_eq!(head.head_root.as_ref().map(NoteSpelling::as_str), Some("A"));
        assert_eq!(head.head_suffix, "m7");
        assert_eq!(head.base_type, TonalQuality::Minor);
        assert_eq!(head.tensions, vec![TensionToken::Seventh]);
    }

    #[test]
    fn bad_entries_degrade_without_failing_the_pass() {
        let index = build_index(&[
            set(1, "Pop", &["N.C.", "C"]),
            set(2, "Pop", &[]),
            set(3, "Jazz", &["Dm9"]),
        ]);
        assert_eq!(index.len(), 3);
        assert_eq!(index[0].head_root, None);
        assert_eq!(index[0].base_type, TonalQuality::Major);
        assert!(index[0].tensions.is_empty());
        assert_eq!(index[1].head_chord, "");
        assert_eq!(index[2].base_type, TonalQuality::Minor);
    }

    #[test]
    fn coverage_accounts_for_every_set() {
        let index = build_index(&[
            set(1, "", &["C"]),
            set(2, "", &["?"]),
            set(3, "", &["Fb7"]),
            set(4, "", &["Ebm"]),
        ]);
        let report = audit_coverage(&index);
        assert_eq!(report.total, 4);
        assert_eq!(report.covered, 2);
        assert_eq!(report.uncovered_ids, vec![2, 3]);
        assert_eq!(report.covered + report.uncovered_ids.len(), report.total);
    }

    #[test]
    fn all_unparseable_catalog_has_zero_coverage() {
        let index = build_index(&[set(7, "", &["x"]), set(8, "", &[])]);
        let report = audit_coverage(&index);
        assert_eq!(report.covered, 0);
        assert!(!report.is_complete());
    }

    #[test]
    fn option_lists_are_sorted_and_unique() {
        let index = build_index(&[
            set(1, "Rock", &["C13sus4"]),
            set(2, "Jazz", &["Dm7"]),
            set(3, "", &["E6"]),
            set(4, "Jazz", &["Fmaj7"]),
        ]);
        assert_eq!(
            tension_options(&index),
            vec![
                TensionToken::Sixth,
                TensionToken::Seventh,
                TensionToken::MajorSeventh,
                TensionToken::Thirteenth,
                TensionToken::Sus4,
            ]
        );
        assert_eq!(genre_list(&index), vec!["Jazz", "Rock"]);
    }

    #[test]
    fn shared_keys_fill_sets_without_their_own() {
        let json = r#"{
            "keys": ["C", "D", "E"],
            "sets": [
                { "number": 1, "genre": "Pop", "chords": ["C", "Dm", "Em"] },
                { "number": 2, "genre": "Pop", "chords": ["G"], "keys": ["G"],
                  "analysis": { "bestKey": "G major", "whiteInferredKeyScore": 0.5,
                                "topKeys": [{ "key": "G major" }] } }
            ]
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.sets[0].keys, vec!["C", "D", "E"]);
        assert_eq!(catalog.sets[1].keys, vec!["G"]);
        let analysis = catalog.sets[1].analysis.as_ref().unwrap();
        assert_eq!(analysis.best_key.as_deref(), Some("G major"));
        assert_eq!(analysis.white_inferred_key_score, Some(0.5));
        assert_eq!(analysis.top_keys[0].key, "G major");
        assert!(analysis.tags.is_empty());
    }

    #[test]
    fn index_applies_shared_keys_to_literal_catalogs() {
        let catalog = Catalog {
            keys: vec!["C".to_string(), "D".to_string()],
            sets: vec![set(1, "Pop", &["C", "Dm"])],
        };
        assert!(catalog.sets[0].keys.is_empty());

        let index = CatalogIndex::new(&catalog);
        assert_eq!(index.sets()[0].set.keys, vec!["C", "D"]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Catalog::from_json_str("{\"sets\": 3}"),
            Err(CatalogError::Json(_))
        ));
    }
}
