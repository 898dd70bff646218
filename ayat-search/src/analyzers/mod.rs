//! Text Analyzers Module
//!
//! Normalization and tokenization for the two displayed languages: Arabic,
//! with its optional diacritics and letter-shape variants, and French.

mod arabic;
mod latin;
mod roots;
mod traits;

pub use arabic::{
    canonical_letter, collapse_whitespace, is_arabic_diacritic, is_arabic_separator, normalize,
    ArabicAnalyzer, ArabicNormalizer, NormalizeOptions,
};
pub use latin::{find_occurrences, is_word_char, LatinAnalyzer};
pub use roots::{contains_root_pattern, root_letters, MIN_ROOT_LETTERS};
pub use traits::{contains_arabic, is_arabic_char, word_ranges, Analyzer, Language};
