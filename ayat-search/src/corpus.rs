//! Verse collection filter.
//!
//! Runs one prepared query over the Arabic text and translation of every verse.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matcher::{MatchOptions, Matcher};

/// One verse with its optional French translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Global verse number
    pub number: u32,
    pub surah: u32,
    pub number_in_surah: u32,
    pub text: String,
    #[serde(default)]
    pub translation: Option<String>,
}

/// A verse kept by [`search_verses`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseHit {
    /// Position of the verse in the scanned slice
    pub index: usize,
    pub number: u32,
    pub arabic_match: bool,
    pub translation_match: bool,
}

/// Verses whose Arabic text or translation matches `query`, in input order.
pub fn search_verses(verses: &[Verse], query: &str, options: &MatchOptions) -> Vec<VerseHit> {
    let matcher = Matcher::new(query, *options);

    let hits: Vec<VerseHit> = verses
        .par_iter()
        .enumerate()
        .filter_map(|(index, verse)| {
            let arabic_match = matcher.is_match(&verse.text);
            let translation_match = verse
                .translation
                .as_deref()
                .is_some_and(|t| matcher.is_match(t));
            (arabic_match || translation_match).then_some(VerseHit {
                index,
                number: verse.number,
                arabic_match,
                translation_match,
            })
        })
        .collect();

    debug!(
        scanned = verses.len(),
        hits = hits.len(),
        mode = %matcher.mode(),
        "verse scan finished"
    );
    hits
}
