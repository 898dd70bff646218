//! Cross-language concordance.
//!
//! A closed, curated table of concepts, each with an Arabic and a French head
//! term plus their catalogued spellings. Every spelling resolves to exactly one
//! concept; a table where two concepts claim the same spelling is rejected when
//! it is loaded.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error};

use crate::analyzers::{Analyzer, ArabicAnalyzer, ArabicNormalizer, Language, LatinAnalyzer};

const BUILTIN_TABLE: &str = include_str!("../data/concordance.json");

static BUILTIN: Lazy<Result<Concordance, ConcordanceError>> = Lazy::new(|| {
    let loaded = Concordance::from_json(BUILTIN_TABLE);
    if let Err(err) = &loaded {
        error!(%err, "built-in concordance rejected");
    }
    loaded
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConcordanceError {
    #[error("{language} spelling {variant:?} is claimed by both {first_head:?} and {second_head:?}")]
    DuplicateVariant {
        language: Language,
        variant: String,
        first_head: String,
        second_head: String,
    },

    #[error("concept {concept:?} has an empty {language} head term")]
    EmptyHead { concept: String, language: Language },

    #[error("invalid concordance table: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConcordanceError {
    fn from(err: serde_json::Error) -> Self {
        ConcordanceError::Parse(err.to_string())
    }
}

/// One catalogued concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcordanceEntry {
    pub concept: String,
    pub head_arabic: String,
    pub head_french: String,
    #[serde(default)]
    pub arabic_variants: Vec<String>,
    #[serde(default)]
    pub french_variants: Vec<String>,
}

impl ConcordanceEntry {
    pub fn head(&self, language: Language) -> &str {
        match language {
            Language::Arabic => &self.head_arabic,
            Language::French => &self.head_french,
        }
    }

    pub fn variants(&self, language: Language) -> &[String] {
        match language {
            Language::Arabic => &self.arabic_variants,
            Language::French => &self.french_variants,
        }
    }

    /// Head term followed by its variants.
    pub fn terms(&self, language: Language) -> impl Iterator<Item = &str> {
        std::iter::once(self.head(language))
            .chain(self.variants(language).iter().map(String::as_str))
    }
}

/// Read-only lookup structure over the concordance table.
#[derive(Debug, Clone)]
pub struct Concordance {
    entries: Vec<ConcordanceEntry>,
    arabic_index: HashMap<String, usize>,
    french_index: HashMap<String, usize>,
    arabic: ArabicAnalyzer,
    french: LatinAnalyzer,
}

impl Concordance {
    /// Validate and index a table.
    ///
    /// Variants repeated within one entry are collapsed, keeping the first
    /// spelling; a spelling shared by two entries is an error.
    pub fn from_entries(entries: Vec<ConcordanceEntry>) -> Result<Self, ConcordanceError> {
        let mut concordance = Self {
            entries: Vec::with_capacity(entries.len()),
            arabic_index: HashMap::new(),
            french_index: HashMap::new(),
            arabic: ArabicAnalyzer::new(ArabicNormalizer::default()).with_lowercase(true),
            french: LatinAnalyzer::default(),
        };

        for mut entry in entries {
            let idx = concordance.entries.len();
            for language in [Language::Arabic, Language::French] {
                if concordance.key(entry.head(language), language).is_empty() {
                    return Err(ConcordanceError::EmptyHead {
                        concept: entry.concept.clone(),
                        language,
                    });
                }
                let kept = concordance.register(&entry, idx, language)?;
                match language {
                    Language::Arabic => entry.arabic_variants = kept,
                    Language::French => entry.french_variants = kept,
                }
            }
            concordance.entries.push(entry);
        }

        debug!(
            entries = concordance.entries.len(),
            arabic_spellings = concordance.arabic_index.len(),
            french_spellings = concordance.french_index.len(),
            "concordance loaded"
        );
        Ok(concordance)
    }

    /// Parse a JSON array of entries and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConcordanceError> {
        let entries: Vec<ConcordanceEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// The table shipped with the crate, parsed and validated on first use.
    pub fn builtin() -> Result<&'static Concordance, ConcordanceError> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    /// Index every spelling of `entry` in `language`; returns the variants
    /// left after collapsing in-entry repeats.
    fn register(
        &mut self,
        entry: &ConcordanceEntry,
        idx: usize,
        language: Language,
    ) -> Result<Vec<String>, ConcordanceError> {
        let mut kept = Vec::new();

        for (position, term) in entry.terms(language).enumerate() {
            let key = self.key(term, language);
            if key.is_empty() {
                continue;
            }
            let index = match language {
                Language::Arabic => &mut self.arabic_index,
                Language::French => &mut self.french_index,
            };
            match index.get(&key) {
                Some(&owner) if owner != idx => {
                    return Err(ConcordanceError::DuplicateVariant {
                        language,
                        variant: term.to_string(),
                        first_head: self.entries[owner].head(language).to_string(),
                        second_head: entry.head(language).to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    index.insert(key, idx);
                    if position > 0 {
                        kept.push(term.to_string());
                    }
                }
            }
        }

        Ok(kept)
    }

    fn key(&self, term: &str, language: Language) -> String {
        match language {
            Language::Arabic => self.arabic.normalize(term),
            Language::French => self.french.normalize(term),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ConcordanceEntry] {
        &self.entries
    }

    /// Entry owning `term`, looked up in the term's detected language.
    pub fn lookup(&self, term: &str) -> Option<&ConcordanceEntry> {
        let language = Language::detect(term);
        let key = self.key(term, language);
        if key.is_empty() {
            return None;
        }
        let index = match language {
            Language::Arabic => &self.arabic_index,
            Language::French => &self.french_index,
        };
        index.get(&key).map(|&idx| &self.entries[idx])
    }

    /// Head term in `target` of the concept `term` belongs to.
    ///
    /// `None` when the term is uncatalogued or already in `target`.
    pub fn resolve_equivalent(&self, term: &str, target: Language) -> Option<&str> {
        if Language::detect(term) == target {
            return None;
        }
        self.lookup(term).map(|entry| entry.head(target))
    }

    /// True iff the terms are in different languages and belong to the same concept.
    pub fn are_equivalents(&self, first: &str, second: &str) -> bool {
        if Language::detect(first) == Language::detect(second) {
            return false;
        }
        match (self.lookup(first), self.lookup(second)) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }

    /// Every catalogued spelling of `term` in its own language, head first;
    /// just the term itself when uncatalogued.
    pub fn variants_of<'a>(&'a self, term: &'a str) -> Vec<&'a str> {
        match self.lookup(term) {
            Some(entry) => entry.terms(Language::detect(term)).collect(),
            None => vec![term],
        }
    }

    pub fn concept_of(&self, term: &str) -> Option<&str> {
        self.lookup(term).map(|entry| entry.concept.as_str())
    }
}

/// [`Concordance::resolve_equivalent`] against the built-in table.
pub fn resolve_equivalent(term: &str, target: Language) -> Option<&'static str> {
    Concordance::builtin().ok()?.resolve_equivalent(term, target)
}
