//! Root Pattern Matching
//!
//! Arabic words derive from 3-letter (trilateral) or 4-letter (quadrilateral)
//! roots, with pattern letters (أوزان) inserted around and between the root
//! letters. Instead of extracting roots, a word is taken to carry a root when
//! the root letters occur in it in order: كتب is carried by كاتب, مكتوب, يكتبون.

use super::traits::is_arabic_char;

/// Fewest letters a root query may have.
pub const MIN_ROOT_LETTERS: usize = 2;

/// The ordered Arabic letters of an already normalized query.
///
/// Anything that is not an Arabic letter (spaces, digits, punctuation, Latin)
/// is dropped. Returns an empty list when fewer than [`MIN_ROOT_LETTERS`]
/// letters remain.
pub fn root_letters(normalized_query: &str) -> Vec<char> {
    let letters: Vec<char> = normalized_query
        .chars()
        .filter(|&ch| is_arabic_char(ch) && ch.is_alphabetic())
        .collect();

    if letters.len() < MIN_ROOT_LETTERS {
        Vec::new()
    } else {
        letters
    }
}

/// Whether `word` contains `letters` as an ordered subsequence.
pub fn contains_root_pattern(word: &str, letters: &[char]) -> bool {
    if letters.is_empty() {
        return false;
    }

    let mut pending = letters.iter().peekable();
    for ch in word.chars() {
        if pending.peek() == Some(&&ch) {
            pending.next();
            if pending.peek().is_none() {
                return true;
            }
        }
    }

    false
}
