//! Arabic-aware search and highlighting for a bilingual (Arabic/French) verse reader.
//!
//! Four entry points cover the whole engine:
//! - [`normalize`] canonicalizes Arabic orthography,
//! - [`matches`] decides whether a text matches a query under a [`SearchMode`],
//! - [`resolve_equivalent`] looks a term up in the curated [`Concordance`],
//! - [`highlight`] marks matched words, in both languages when a companion
//!   text is supplied.
//!
//! Every call is a pure function of its inputs and the immutable concordance.

pub mod analyzers;
pub mod concordance;
pub mod corpus;
pub mod highlight;
pub mod matcher;
pub mod similarity;

pub use analyzers::{contains_arabic, normalize, Language, NormalizeOptions};
pub use concordance::{resolve_equivalent, Concordance, ConcordanceEntry, ConcordanceError};
pub use corpus::{search_verses, Verse, VerseHit};
pub use highlight::{highlight, HighlightSpan, Highlighter, Marker, SpanKind};
pub use matcher::{matches, MatchOptions, Matcher, PreparedQuery, SearchMode};
pub use similarity::{levenshtein, similarity};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("concordance error: {0}")]
    Concordance(#[from] ConcordanceError),

    #[error("unknown language {0:?}, expected arabic or french")]
    UnknownLanguage(String),

    #[error("unknown search mode {0:?}, expected exact, words, partial, fuzzy, root or flexible")]
    UnknownSearchMode(String),
}
