//! Search session
//!
//! The state a front end needs between interactions: browse or search mode,
//! the genre filter, the last target and the current results. Every
//! interaction returns a fresh [`SearchState`]; nothing is updated in place.

use serde::Serialize;
use thiserror::Error;

use crate::{
    catalog::CatalogIndex,
    matcher::{match_sets, QueryError, SetMatches, TargetSpec},
};

/// Errors when running a search
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// No catalog has been loaded.
    #[error("no chord-set catalog is loaded; load a catalog file first")]
    CatalogUnavailable,

    /// The query fields are invalid.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Raw query fields as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Root note text, e.g. `Db`.
    pub root: String,
    /// `major` or `minor`.
    pub quality: String,
    /// Tension token text, or empty for none.
    pub tension: String,
}

impl Query {
    /// Query without a tension requirement.
    pub fn new(root: impl Into<String>, quality: impl Into<String>) -> Self {
        Query {
            root: root.into(),
            quality: quality.into(),
            tension: String::new(),
        }
    }

    /// Require a tension.
    pub fn tension(mut self, tension: impl Into<String>) -> Self {
        self.tension = tension.into();
        self
    }
}

/// Whether results are the plain catalog or a search outcome.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every set is shown, none carries matches.
    #[default]
    Browse,
    /// Only matched sets are shown.
    Search,
}

/// Genre label that disables the genre filter.
pub const ALL_GENRES: &str = "ALL";

/// Genre restriction on the visible sets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum GenreFilter {
    /// No restriction.
    #[default]
    All,
    /// Only sets whose genre equals this label.
    Only(String),
}

impl GenreFilter {
    /// Parse a filter. Only the exact label `ALL` means no restriction; any
    /// other label, including a genre named `all`, is matched literally.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_GENRES {
            GenreFilter::All
        } else {
            GenreFilter::Only(label.to_string())
        }
    }

    /// Whether a genre passes the filter.
    pub fn admits(&self, genre: &str) -> bool {
        match self {
            GenreFilter::All => true,
            GenreFilter::Only(only) => only == genre,
        }
    }
}

/// Counts for the summary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Active genre filter.
    pub genre: GenreFilter,
    /// Current mode.
    pub mode: Mode,
    /// Matched sets after the genre filter.
    pub matched: usize,
    /// Sets after the genre filter.
    pub filtered_total: usize,
    /// Sets actually shown.
    pub visible: usize,
    /// Label of the last target, if any.
    pub target_label: Option<String>,
}

/// One snapshot of a browsing or searching session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchState<'a> {
    mode: Mode,
    genre: GenreFilter,
    last_target: Option<TargetSpec>,
    results: Vec<SetMatches<'a>>,
}

impl<'a> SearchState<'a> {
    /// Show the whole catalog with no matches.
    pub fn browse(index: &'a CatalogIndex) -> Self {
        SearchState::default().browse_again(index)
    }

    /// Return to browse mode, keeping the genre filter.
    pub fn browse_again(&self, index: &'a CatalogIndex) -> Self {
        SearchState {
            mode: Mode::Browse,
            genre: self.genre.clone(),
            last_target: None,
            results: index.sets().iter().map(SetMatches::unmatched).collect(),
        }
    }

    /// Run a search, keeping the genre filter.
    ///
    /// On error the caller keeps its current state.
    pub fn search(
        &self,
        index: Option<&'a CatalogIndex>,
        query: &Query,
    ) -> Result<Self, SearchError> {
        let index = index.ok_or(SearchError::CatalogUnavailable)?;
        let target = TargetSpec::from_query(&query.root, &query.quality, &query.tension)?;
        Ok(self.search_target(index, target))
    }

    /// Run a search for an already-built target.
    pub fn search_target(&self, index: &'a CatalogIndex, target: TargetSpec) -> Self {
        SearchState {
            mode: Mode::Search,
            genre: self.genre.clone(),
            results: match_sets(&target, index.sets()),
            last_target: Some(target),
        }
    }

    /// Recompute results for the current mode and target.
    pub fn refresh(&self, index: &'a CatalogIndex) -> Self {
        match (&self.mode, &self.last_target) {
            (Mode::Search, Some(target)) => self.search_target(index, target.clone()),
            _ => self.browse_again(index),
        }
    }

    /// Replace the genre filter.
    pub fn with_genre(&self, genre: GenreFilter) -> Self {
        SearchState {
            genre,
            ..self.clone()
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current genre filter.
    pub fn genre(&self) -> &GenreFilter {
        &self.genre
    }

    /// Target of the last search, if in search mode.
    pub fn last_target(&self) -> Option<&TargetSpec> {
        self.last_target.as_ref()
    }

    /// Every result, unfiltered.
    pub fn results(&self) -> &[SetMatches<'a>] {
        &self.results
    }

    /// Results that pass the genre filter.
    pub fn genre_filtered(&self) -> impl Iterator<Item = &SetMatches<'a>> + '_ {
        self.results
            .iter()
            .filter(|result| self.genre.admits(result.set.genre()))
    }

    /// Results to display: genre-filtered, and matched-only in search mode.
    pub fn visible(&self) -> Vec<&SetMatches<'a>> {
        self.genre_filtered()
            .filter(|result| self.mode == Mode::Browse || result.is_match())
            .collect()
    }

    /// Counts describing the current view.
    pub fn summary(&self) -> Summary {
        let (filtered_total, matched) = self
            .genre_filtered()
            .fold((0, 0), |(total, matched), result| {
                (total + 1, matched + usize::from(result.is_match()))
            });
        Summary {
            genre: self.genre.clone(),
            mode: self.mode,
            matched,
            filtered_total,
            visible: self.visible().len(),
            target_label: self
                .last_target
                .as_ref()
                .map(|target| target.target_chord_label.clone()),
        }
    }
}
