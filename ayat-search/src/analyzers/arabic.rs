//! Arabic Text Normalization
//!
//! Provides the canonical comparable form of Arabic text:
//! - Diacritics (harakat) and Quranic annotation marks removal
//! - Tatweel (kashida) removal
//! - Alef variants to bare alef, alef maqsura to yaa
//! - Whitespace collapsing
//!
//! Taa marbuta is kept as is so that grammatically distinct forms stay apart.

use serde::{Deserialize, Serialize};

use super::traits::Analyzer;

const BARE_ALEF: char = '\u{0627}';
const YAA: char = '\u{064A}';
const ALEF_MAQSURA: char = '\u{0649}';
const TATWEEL: char = '\u{0640}';

/// The three switches of the normalization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub remove_diacritics: bool,
    pub canonicalize_letters: bool,
    pub collapse_whitespace: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            remove_diacritics: true,
            canonicalize_letters: true,
            collapse_whitespace: true,
        }
    }
}

/// Arabic text normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArabicNormalizer {
    /// Remove diacritical marks (tashkeel) and Quranic annotation signs
    pub remove_diacritics: bool,
    /// Remove tatweel (kashida)
    pub remove_tatweel: bool,
    /// Alef variants to bare alef, alef maqsura to yaa
    pub canonicalize_letters: bool,
    /// Collapse whitespace runs to one space and trim the ends
    pub collapse_whitespace: bool,
}

impl Default for ArabicNormalizer {
    fn default() -> Self {
        Self::from(NormalizeOptions::default())
    }
}

impl From<NormalizeOptions> for ArabicNormalizer {
    fn from(options: NormalizeOptions) -> Self {
        Self {
            remove_diacritics: options.remove_diacritics,
            remove_tatweel: options.remove_diacritics,
            canonicalize_letters: options.canonicalize_letters,
            collapse_whitespace: options.collapse_whitespace,
        }
    }
}

impl ArabicNormalizer {
    /// Create a new Arabic normalizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize Arabic text.
    pub fn normalize(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());

        for ch in text.chars() {
            if self.remove_diacritics && is_arabic_diacritic(ch) {
                continue;
            }

            if self.remove_tatweel && ch == TATWEEL {
                continue;
            }

            if self.canonicalize_letters {
                result.push(canonical_letter(ch));
            } else {
                result.push(ch);
            }
        }

        if self.collapse_whitespace {
            collapse_whitespace(&result)
        } else {
            result
        }
    }
}

/// Normalize `text` with the given pipeline switches.
pub fn normalize(text: &str, options: NormalizeOptions) -> String {
    ArabicNormalizer::from(options).normalize(text)
}

/// Replace every whitespace run with a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check if a character is an Arabic diacritical or Quranic annotation mark.
pub fn is_arabic_diacritic(ch: char) -> bool {
    matches!(ch,
        '\u{064B}'..='\u{065F}' | // Fathatan to wavy hamza below
        '\u{0670}' |              // Superscript alef
        '\u{06D6}'..='\u{06DC}' | // Small high ligatures
        '\u{06DF}'..='\u{06E8}' | // Small high/low signs, small waw and yaa
        '\u{06EA}'..='\u{06ED}'   // Empty centre stops, small low meem
    )
}

/// Map a letter-shape variant to its canonical letter.
pub fn canonical_letter(ch: char) -> char {
    match ch {
        '\u{0622}' | // Alef with madda
        '\u{0623}' | // Alef with hamza above
        '\u{0625}' | // Alef with hamza below
        '\u{0671}'   // Alef wasla
            => BARE_ALEF,
        ALEF_MAQSURA => YAA,
        other => other,
    }
}

/// Whitespace and the Arabic comma, semicolon, question mark and full stop.
pub fn is_arabic_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '\u{060C}' | '\u{061B}' | '\u{061F}' | '\u{06D4}')
}

/// Analyzer applying the Arabic matching rules.
#[derive(Debug, Clone, Default)]
pub struct ArabicAnalyzer {
    normalizer: ArabicNormalizer,
    lowercase: bool,
}

impl ArabicAnalyzer {
    pub fn new(normalizer: ArabicNormalizer) -> Self {
        Self {
            normalizer,
            lowercase: false,
        }
    }

    /// Fold the case of Latin letters mixed into Arabic text.
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }
}

impl Analyzer for ArabicAnalyzer {
    fn normalize(&self, text: &str) -> String {
        let normalized = self.normalizer.normalize(text);
        if self.lowercase {
            normalized.to_lowercase()
        } else {
            normalized
        }
    }

    fn is_separator(&self, ch: char) -> bool {
        is_arabic_separator(ch)
    }
}
