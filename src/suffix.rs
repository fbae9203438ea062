//! Suffix patterns
//!
//! Pattern tests shared by the quality classifier and the interval builder.
//! Case matters for a few tests (`M7` vs `m7`), so both the raw and the
//! lower-cased text are kept.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `add9`/`add11` are excised before numeric tests so their digits do not
    /// read as plain 9th/11th tokens.
    static ref ADDED_TONE: Regex = Regex::new(r"add(?:9|11)").unwrap();
    static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// A chord-quality suffix prepared for pattern tests.
#[derive(Debug, Clone)]
pub struct Suffix<'a> {
    raw: &'a str,
    lower: String,
    numeric: String,
}

impl<'a> Suffix<'a> {
    /// Prepare `raw` (e.g. `"m7b5"`, `"maj9"`, `"13sus4"`).
    pub fn new(raw: &'a str) -> Self {
        let lower = raw.to_lowercase();
        let numeric = ADDED_TONE.replace_all(&lower, "").into_owned();
        Suffix {
            raw,
            lower,
            numeric,
        }
    }

    /// Case-sensitive prefix test.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.raw.starts_with(prefix)
    }

    /// Case-insensitive prefix test. `prefix` must be lower case.
    pub fn starts_with_ci(&self, prefix: &str) -> bool {
        self.lower.starts_with(prefix)
    }

    /// Case-sensitive substring test.
    pub fn contains(&self, pattern: &str) -> bool {
        self.raw.contains(pattern)
    }

    /// Case-insensitive substring test. `pattern` must be lower case.
    pub fn contains_ci(&self, pattern: &str) -> bool {
        self.lower.contains(pattern)
    }

    /// True when `number` appears as a whole digit run, ignoring the digits
    /// of `add9`/`add11`. `"13"` matches `"13sus4"` but not `"135"`.
    pub fn has_number(&self, number: &str) -> bool {
        DIGIT_RUN
            .find_iter(&self.numeric)
            .any(|run| run.as_str() == number)
    }

    /// `maj7` in any case, or a capital `M7`.
    pub fn has_major_seventh(&self) -> bool {
        self.contains_ci("maj7") || self.contains("M7")
    }

    /// `sus4`, or a bare `sus` not followed by `2`.
    pub fn has_sus4(&self) -> bool {
        self.contains_ci("sus4")
            || self
                .lower
                .match_indices("sus")
                .any(|(at, _)| !self.lower[at + 3..].starts_with('2'))
    }

    /// Case-sensitive minor marker: a lower-case `m` that does not open `maj`,
    /// or a case-insensitive `min`/`minor` prefix. A capital `M` is never minor.
    pub fn is_minor(&self) -> bool {
        if self.starts_with("M") {
            return false;
        }
        if self.starts_with("m") && !self.starts_with_ci("maj") {
            return true;
        }
        if self.starts_with_ci("maj") {
            return false;
        }
        self.starts_with_ci("min")
    }
}
