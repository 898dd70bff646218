//! Analyzer Traits
//!
//! Common interfaces shared by the Arabic and Latin-script analyzers, plus the
//! script detection used to pick between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::SearchError;

/// Languages displayed side by side by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Arabic verse text
    Arabic,
    /// French translation
    French,
}

impl Language {
    /// Arabic when the text holds at least one Arabic code point, French otherwise.
    pub fn detect(text: &str) -> Self {
        if contains_arabic(text) {
            Language::Arabic
        } else {
            Language::French
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Arabic => write!(f, "arabic"),
            Language::French => write!(f, "french"),
        }
    }
}

impl FromStr for Language {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ar" | "arabic" => Ok(Language::Arabic),
            "fr" | "french" | "francais" | "français" => Ok(Language::French),
            other => Err(SearchError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Check if a character lies in the Arabic Unicode block.
pub fn is_arabic_char(ch: char) -> bool {
    matches!(ch as u32, 0x0600..=0x06FF)
}

/// True iff the string contains at least one code point of the Arabic block.
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(is_arabic_char)
}

/// Byte ranges of the maximal runs of `text` that are not separators.
pub fn word_ranges(text: &str, is_separator: impl Fn(char) -> bool) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = None;

    for (idx, ch) in text.char_indices() {
        if is_separator(ch) {
            if let Some(s) = start.take() {
                ranges.push(s..idx);
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }

    if let Some(s) = start {
        ranges.push(s..text.len());
    }

    ranges
}

/// Common trait for the text analyzers.
pub trait Analyzer: Send + Sync {
    /// Canonical comparable form of `text`.
    fn normalize(&self, text: &str) -> String;

    /// Whether `ch` separates two words for this analyzer.
    fn is_separator(&self, ch: char) -> bool;

    /// Split already normalized text into its words.
    fn tokenize<'a>(&self, normalized: &'a str) -> Vec<&'a str> {
        word_ranges(normalized, |ch| self.is_separator(ch))
            .into_iter()
            .map(|range| &normalized[range])
            .collect()
    }

    /// Normalize then tokenize.
    fn analyze(&self, text: &str) -> Vec<String> {
        let normalized = self.normalize(text);
        self.tokenize(&normalized)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_arabic() {
        assert_eq!(Language::detect("مرحبا بالعالم"), Language::Arabic);
        assert_eq!(Language::detect("Allah est grand"), Language::French);
        assert_eq!(Language::detect(""), Language::French);
    }

    #[test]
    fn test_contains_arabic_mixed() {
        assert!(contains_arabic("verset ١ الله"));
        assert!(!contains_arabic("Miséricordieux"));
    }

    #[test]
    fn test_parse_language() {
        assert_eq!("AR".parse::<Language>().unwrap(), Language::Arabic);
        assert_eq!("french".parse::<Language>().unwrap(), Language::French);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_word_ranges() {
        let text = "  un deux  trois ";
        let words: Vec<&str> = word_ranges(text, char::is_whitespace)
            .into_iter()
            .map(|r| &text[r])
            .collect();
        assert_eq!(words, vec!["un", "deux", "trois"]);
        assert!(word_ranges("   ", char::is_whitespace).is_empty());
    }
}
