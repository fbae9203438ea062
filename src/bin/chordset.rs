//! Command-line front end for `chordset_search`.
//!
//! Loads a catalog JSON file once and prints browse/search results, chord
//! tones, or the classification audit. Set `RUST_LOG=debug` for indexing
//! details.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chordset_search::{
    sort_tension_labels,
    view::{self, Headline, SetCard},
    Catalog, CatalogIndex, GenreFilter, Query, SearchError, SearchState, ToneRenderer, ALL_GENRES,
};

#[derive(Debug, Parser)]
#[command(name = "chordset")]
#[command(about = "Search a chord-set catalog by transposable head chord.")]
struct Cli {
    /// Catalog JSON file: `{ "keys": [...], "sets": [...] }`.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Only show sets of this genre (`ALL` for every genre).
    #[arg(long, default_value = ALL_GENRES)]
    genre: String,

    /// Octave the chord root is rendered in.
    #[arg(long, default_value_t = 5)]
    octave: i32,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every set with its head chord.
    Browse,

    /// Find sets whose head chord transposes onto a target chord.
    Search {
        /// Target root, e.g. `G`, `Db`, `F♯`.
        #[arg(long)]
        root: String,

        /// `major` or `minor`.
        #[arg(long)]
        quality: String,

        /// Required tension token, e.g. `7`, `M7`, `sus4`.
        #[arg(long, default_value = "")]
        tension: String,
    },

    /// Print the tones of chord symbols.
    Tones {
        /// Chord symbols, e.g. `Cmaj7 Bbm7b5/Ab`.
        #[arg(required = true)]
        chords: Vec<String>,
    },

    /// Check that every set's head chord was classified.
    Audit,

    /// List the tension tokens present in the catalog, or order the given
    /// labels by tension priority.
    Tensions {
        /// Free-text tension labels, e.g. `sus4 7 b9`.
        labels: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let renderer = ToneRenderer::builder().base_octave(cli.octave).build();

    let catalog = cli.catalog.as_ref().map(Catalog::load).transpose()?;
    let index = catalog.as_ref().map(CatalogIndex::new);
    let genre = GenreFilter::from_label(&cli.genre);

    match &cli.cmd {
        Command::Browse => {
            let index = index.as_ref().ok_or(SearchError::CatalogUnavailable)?;
            let state = SearchState::browse(index).with_genre(genre);
            print_state(cli.json, &state, &renderer)?;
        }
        Command::Search {
            root,
            quality,
            tension,
        } => {
            let query = Query::new(root.as_str(), quality.as_str()).tension(tension.as_str());
            let state = SearchState::default()
                .with_genre(genre)
                .search(index.as_ref(), &query)?;
            print_state(cli.json, &state, &renderer)?;
        }
        Command::Audit => {
            let index = index.as_ref().ok_or(SearchError::CatalogUnavailable)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(index.coverage())?);
            } else {
                println!("{}", view::coverage_line(index.coverage()));
            }
        }
        Command::Tensions { labels } => {
            let mut labels: Vec<&str> = if labels.is_empty() {
                let index = index.as_ref().ok_or(SearchError::CatalogUnavailable)?;
                index.tension_options().iter().map(|t| t.as_str()).collect()
            } else {
                labels.iter().map(String::as_str).collect()
            };
            sort_tension_labels(&mut labels);
            if cli.json {
                println!("{}", serde_json::to_string(&labels)?);
            } else {
                println!("{}", labels.join(" "));
            }
        }
        Command::Tones { chords } => print_tones(cli.json, chords, &renderer)?,
    }

    Ok(())
}

fn print_tones(
    json: bool,
    chords: &[String],
    renderer: &ToneRenderer,
) -> Result<(), serde_json::Error> {
    let rows: Vec<(&str, Vec<String>)> = chords
        .iter()
        .map(|chord| (chord.as_str(), renderer.chord_tones(chord)))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for (chord, tones) in rows {
        if tones.is_empty() {
            println!("{chord}: (could not read chord tones)");
        } else {
            println!("{chord}: {}", tones.join(" / "));
        }
    }
    Ok(())
}

fn print_state(
    json: bool,
    state: &SearchState<'_>,
    renderer: &ToneRenderer,
) -> Result<(), serde_json::Error> {
    let cards = view::cards(state, renderer);

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    println!("{}", view::summary_line(&state.summary()));
    if cards.is_empty() {
        println!("(no sets to show)");
    }
    for card in &cards {
        print_card(card);
    }
    Ok(())
}

fn print_card(card: &SetCard) {
    if card.genre.is_empty() {
        println!("\nSet {}", card.number);
    } else {
        println!("\nSet {} [{}]", card.number, card.genre);
    }
    match &card.headline {
        Headline::Matches { lines } => {
            for line in lines {
                println!("  transpose {line}");
            }
        }
        Headline::NoMatch => println!("  no match"),
        Headline::HeadInfo {
            head_chord,
            base_type,
        } => println!("  head chord: {head_chord} | base type: {base_type}"),
    }
    for line in &card.analysis {
        println!("  {line}");
    }
    for key in card.keyboard.keys().filter(|key| !key.is_empty()) {
        let chord = key.chord.as_deref().unwrap_or("-");
        println!("  {:<2} {:<10} {}", key.note, chord, key.tones.join(" "));
    }
}
