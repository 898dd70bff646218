//! Command-line driver: load a verse collection, filter it, print the hits
//! highlighted in both languages.

use anyhow::Context;
use ayat_search::matcher::DEFAULT_FUZZY_THRESHOLD;
use ayat_search::{search_verses, Concordance, Highlighter, MatchOptions, SearchMode, Verse};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug, Clone)]
#[command(name = "ayat", about = "Search and highlight a bilingual verse collection")]
pub struct Config {
    /// Verse collection, a JSON array of verses
    #[arg(long, env = "AYAT_VERSES")]
    pub verses: PathBuf,

    /// Concordance table replacing the built-in one
    #[arg(long, env = "AYAT_CONCORDANCE")]
    pub concordance: Option<PathBuf>,

    /// exact, words, partial, fuzzy, root or flexible
    #[arg(long, env = "AYAT_MODE", default_value = "flexible")]
    pub mode: SearchMode,

    /// Similarity threshold for fuzzy matching
    #[arg(long, env = "AYAT_THRESHOLD", default_value_t = DEFAULT_FUZZY_THRESHOLD)]
    pub threshold: f64,

    /// Require the whole text to equal the query
    #[arg(long, env = "AYAT_EXACT")]
    pub exact: bool,

    /// Compare diacritics instead of ignoring them
    #[arg(long, env = "AYAT_KEEP_DIACRITICS")]
    pub keep_diacritics: bool,

    /// Case-sensitive matching of French text
    #[arg(long, env = "AYAT_CASE_SENSITIVE")]
    pub case_sensitive: bool,

    /// Do not mark cross-language equivalents
    #[arg(long)]
    pub no_bilingual: bool,

    /// One JSON object per hit
    #[arg(long)]
    pub json: bool,

    /// Print at most this many hits
    #[arg(long)]
    pub limit: Option<usize>,

    /// Structured JSON logs
    #[arg(long, env = "AYAT_LOG_JSON")]
    pub log_json: bool,

    #[arg(short, long)]
    pub verbose: bool,

    /// Search query
    pub query: String,
}

impl Config {
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            ignore_diacritics: !self.keep_diacritics,
            case_sensitive: self.case_sensitive,
            exact_match: self.exact,
            search_mode: self.mode,
            fuzzy_threshold: self.threshold,
        }
    }
}

#[derive(Debug, Serialize)]
struct RenderedHit {
    number: u32,
    surah: u32,
    number_in_surah: u32,
    arabic_match: bool,
    translation_match: bool,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    translation: Option<String>,
}

pub fn load_verses(path: &Path) -> anyhow::Result<Vec<Verse>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading verses from {}", path.display()))?;
    let verses: Vec<Verse> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing verses from {}", path.display()))?;
    Ok(verses)
}

/// The configured concordance, validated before any search runs.
pub fn load_concordance(config: &Config) -> anyhow::Result<Concordance> {
    match &config.concordance {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading concordance from {}", path.display()))?;
            let concordance = Concordance::from_json(&raw)
                .with_context(|| format!("loading concordance from {}", path.display()))?;
            info!(entries = concordance.len(), path = %path.display(), "custom concordance loaded");
            Ok(concordance)
        }
        None => Ok(Concordance::builtin()?.clone()),
    }
}

/// Search the collection and write every hit to `out`; returns the hit count.
pub fn run(config: &Config, out: &mut impl Write) -> anyhow::Result<usize> {
    let concordance = load_concordance(config)?;
    let verses = load_verses(&config.verses)?;
    info!(verses = verses.len(), query = %config.query, mode = %config.mode, "searching");

    if config.query.trim().is_empty() {
        warn!("empty query, nothing to search");
    }

    let options = config.match_options();
    let hits = search_verses(&verses, &config.query, &options);
    let highlighter = Highlighter::new(options)
        .with_concordance(&concordance)
        .with_bilingual(!config.no_bilingual);

    for hit in hits.iter().take(config.limit.unwrap_or(usize::MAX)) {
        let verse = &verses[hit.index];
        let text = highlighter.highlight(&verse.text, &config.query, verse.translation.as_deref());
        let translation = verse
            .translation
            .as_deref()
            .map(|t| highlighter.highlight(t, &config.query, Some(&verse.text)));

        if config.json {
            let rendered = RenderedHit {
                number: verse.number,
                surah: verse.surah,
                number_in_surah: verse.number_in_surah,
                arabic_match: hit.arabic_match,
                translation_match: hit.translation_match,
                text,
                translation,
            };
            serde_json::to_writer(&mut *out, &rendered)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}:{} {}", verse.surah, verse.number_in_surah, text)?;
            if let Some(translation) = translation {
                writeln!(out, "    {}", translation)?;
            }
        }
    }

    Ok(hits.len())
}

pub fn init_observability(verbose: bool, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            "info,ayat_search=debug".into()
        } else {
            "warn".into()
        }
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(fmt_layer.json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(env_filter)
            .init();
    }
}
