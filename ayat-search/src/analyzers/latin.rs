//! Latin-script (French) analyzer.
//!
//! Words are maximal runs of alphanumeric characters; everything else
//! separates them. Case folding is optional.

use std::ops::Range;

use super::arabic::collapse_whitespace;
use super::traits::Analyzer;

/// Analyzer applying the French matching rules.
#[derive(Debug, Clone)]
pub struct LatinAnalyzer {
    lowercase: bool,
}

impl Default for LatinAnalyzer {
    fn default() -> Self {
        Self { lowercase: true }
    }
}

impl LatinAnalyzer {
    pub fn new(lowercase: bool) -> Self {
        Self { lowercase }
    }
}

impl Analyzer for LatinAnalyzer {
    fn normalize(&self, text: &str) -> String {
        let collapsed = collapse_whitespace(text);
        if self.lowercase {
            collapsed.to_lowercase()
        } else {
            collapsed
        }
    }

    fn is_separator(&self, ch: char) -> bool {
        !is_word_char(ch)
    }
}

/// Characters that extend a word, for word-boundary purposes.
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn chars_eq(a: char, b: char, case_sensitive: bool) -> bool {
    a == b || (!case_sensitive && a.to_lowercase().eq(b.to_lowercase()))
}

/// Byte ranges of the non-overlapping whole-word occurrences of `term` in
/// `text`, scanned left to right. An occurrence must not be preceded or
/// followed by a word character.
pub fn find_occurrences(text: &str, term: &str, case_sensitive: bool) -> Vec<Range<usize>> {
    let needle: Vec<char> = term.chars().collect();
    let haystack: Vec<(usize, char)> = text.char_indices().collect();
    let mut found = Vec::new();

    if needle.is_empty() || needle.len() > haystack.len() {
        return found;
    }

    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        let end_idx = i + needle.len();
        let hit = needle
            .iter()
            .zip(&haystack[i..end_idx])
            .all(|(&n, &(_, h))| chars_eq(h, n, case_sensitive));

        if hit {
            let bounded = (i == 0 || !is_word_char(haystack[i - 1].1))
                && (end_idx == haystack.len() || !is_word_char(haystack[end_idx].1));
            if bounded {
                let start = haystack[i].0;
                let end = haystack.get(end_idx).map_or(text.len(), |&(idx, _)| idx);
                found.push(start..end);
                i = end_idx;
                continue;
            }
        }
        i += 1;
    }

    found
}
