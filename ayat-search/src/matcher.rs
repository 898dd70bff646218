//! Multi-strategy matcher.
//!
//! A query is prepared once ([`PreparedQuery`]) and then tested against any
//! number of texts. Arabic rules apply as soon as either side contains Arabic;
//! otherwise the French rules apply and the root strategy never matches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::analyzers::{
    contains_arabic, contains_root_pattern, root_letters, Analyzer, ArabicAnalyzer,
    ArabicNormalizer, LatinAnalyzer, NormalizeOptions,
};
use crate::similarity::similarity;
use crate::SearchError;

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

/// Matching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Whole normalized text equals the normalized query
    Exact,
    /// At least one query word equals a text word
    Words,
    /// Normalized query is a substring of the normalized text
    Partial,
    /// A query word and a text word are similar enough
    Fuzzy,
    /// A text word carries the query letters in order
    Root,
    /// Words, then Partial, then Fuzzy
    #[default]
    Flexible,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Exact => "exact",
            SearchMode::Words => "words",
            SearchMode::Partial => "partial",
            SearchMode::Fuzzy => "fuzzy",
            SearchMode::Root => "root",
            SearchMode::Flexible => "flexible",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(SearchMode::Exact),
            "words" => Ok(SearchMode::Words),
            "partial" => Ok(SearchMode::Partial),
            "fuzzy" => Ok(SearchMode::Fuzzy),
            "root" => Ok(SearchMode::Root),
            "flexible" => Ok(SearchMode::Flexible),
            other => Err(SearchError::UnknownSearchMode(other.to_string())),
        }
    }
}

/// Options shared by the matcher and the highlight renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub ignore_diacritics: bool,
    /// Only meaningful for non-Arabic text
    pub case_sensitive: bool,
    /// Alias forcing [`SearchMode::Exact`] whatever `search_mode` says
    pub exact_match: bool,
    pub search_mode: SearchMode,
    pub fuzzy_threshold: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            ignore_diacritics: true,
            case_sensitive: false,
            exact_match: false,
            search_mode: SearchMode::Flexible,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl MatchOptions {
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// The mode actually applied once `exact_match` is taken into account.
    pub fn effective_mode(&self) -> SearchMode {
        if self.exact_match {
            SearchMode::Exact
        } else {
            self.search_mode
        }
    }

    /// Fuzzy threshold clamped to [0, 1]; NaN falls back to the default.
    pub fn threshold(&self) -> f64 {
        if self.fuzzy_threshold.is_nan() {
            DEFAULT_FUZZY_THRESHOLD
        } else {
            self.fuzzy_threshold.clamp(0.0, 1.0)
        }
    }

    pub fn arabic_analyzer(&self) -> ArabicAnalyzer {
        let normalizer = ArabicNormalizer::from(NormalizeOptions {
            remove_diacritics: self.ignore_diacritics,
            ..Default::default()
        });
        ArabicAnalyzer::new(normalizer).with_lowercase(!self.case_sensitive)
    }

    pub fn latin_analyzer(&self) -> LatinAnalyzer {
        LatinAnalyzer::new(!self.case_sensitive)
    }
}

/// A query under one language's rules.
#[derive(Debug, Clone, Default)]
pub struct QueryForm {
    pub normalized: String,
    pub tokens: Vec<String>,
}

impl QueryForm {
    fn new(analyzer: &dyn Analyzer, query: &str) -> Self {
        let normalized = analyzer.normalize(query);
        let tokens = analyzer
            .tokenize(&normalized)
            .into_iter()
            .map(str::to_string)
            .collect();
        Self { normalized, tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty() || self.tokens.is_empty()
    }
}

/// A query normalized and tokenized once for a whole search pass.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    is_arabic: bool,
    arabic: QueryForm,
    latin: QueryForm,
    root: Vec<char>,
}

impl PreparedQuery {
    pub fn new(query: &str, arabic: &ArabicAnalyzer, latin: &LatinAnalyzer) -> Self {
        let arabic_form = QueryForm::new(arabic, query);
        let root = root_letters(&arabic_form.normalized);
        Self {
            is_arabic: contains_arabic(query),
            arabic: arabic_form,
            latin: QueryForm::new(latin, query),
            root,
        }
    }

    /// The query under Arabic rules when `arabic`, French rules otherwise.
    pub fn form(&self, arabic: bool) -> &QueryForm {
        if arabic {
            &self.arabic
        } else {
            &self.latin
        }
    }

    /// Ordered root letters; empty when the query has fewer than two letters.
    pub fn root(&self) -> &[char] {
        &self.root
    }
}

/// Matcher for one prepared query.
#[derive(Debug, Clone)]
pub struct Matcher {
    options: MatchOptions,
    arabic: ArabicAnalyzer,
    latin: LatinAnalyzer,
    query: PreparedQuery,
}

impl Matcher {
    pub fn new(query: &str, options: MatchOptions) -> Self {
        let arabic = options.arabic_analyzer();
        let latin = options.latin_analyzer();
        let query = PreparedQuery::new(query, &arabic, &latin);
        Self {
            options,
            arabic,
            latin,
            query,
        }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn mode(&self) -> SearchMode {
        self.options.effective_mode()
    }

    pub fn query(&self) -> &PreparedQuery {
        &self.query
    }

    /// Analyzer for a text, given whether Arabic rules apply.
    pub fn analyzer(&self, arabic: bool) -> &dyn Analyzer {
        if arabic {
            &self.arabic
        } else {
            &self.latin
        }
    }

    /// Arabic rules apply when the query or the text contains Arabic.
    pub fn uses_arabic_rules(&self, text: &str) -> bool {
        self.query.is_arabic || contains_arabic(text)
    }

    /// Whether `text` matches the query under the configured mode.
    pub fn is_match(&self, text: &str) -> bool {
        let arabic = self.uses_arabic_rules(text);
        let form = self.query.form(arabic);
        if form.is_empty() {
            return false;
        }

        let analyzer = self.analyzer(arabic);
        let normalized = analyzer.normalize(text);
        if normalized.is_empty() {
            return false;
        }
        let tokens = analyzer.tokenize(&normalized);

        self.matches_mode(self.mode(), &normalized, &tokens, form, arabic)
    }

    fn matches_mode(
        &self,
        mode: SearchMode,
        normalized: &str,
        tokens: &[&str],
        form: &QueryForm,
        arabic: bool,
    ) -> bool {
        match mode {
            SearchMode::Exact => normalized == form.normalized,
            SearchMode::Words => form
                .tokens
                .iter()
                .any(|q| tokens.iter().any(|t| *t == q.as_str())),
            SearchMode::Partial => normalized.contains(form.normalized.as_str()),
            SearchMode::Fuzzy => tokens.iter().any(|t| self.is_similar(t, form)),
            SearchMode::Root => {
                arabic
                    && tokens
                        .iter()
                        .any(|t| contains_root_pattern(t, &self.query.root))
            }
            SearchMode::Flexible => [SearchMode::Words, SearchMode::Partial, SearchMode::Fuzzy]
                .into_iter()
                .any(|fallback| self.matches_mode(fallback, normalized, tokens, form, arabic)),
        }
    }

    fn is_similar(&self, token: &str, form: &QueryForm) -> bool {
        let threshold = self.options.threshold();
        form.tokens
            .iter()
            .any(|q| similarity(q, token) >= threshold)
    }

    /// Whether a single normalized word of a text should be marked under the
    /// configured mode. Exact and Words accept a word equal to one of the
    /// query words; Partial accepts a word containing the whole query;
    /// Flexible accepts either, or a similar word.
    pub fn word_matches(&self, normalized_word: &str, arabic: bool) -> bool {
        let form = self.query.form(arabic);
        if form.is_empty() || normalized_word.is_empty() {
            return false;
        }
        self.word_matches_mode(self.mode(), normalized_word, form, arabic)
    }

    fn word_matches_mode(
        &self,
        mode: SearchMode,
        word: &str,
        form: &QueryForm,
        arabic: bool,
    ) -> bool {
        match mode {
            SearchMode::Exact | SearchMode::Words => form.tokens.iter().any(|q| q == word),
            SearchMode::Partial => word.contains(form.normalized.as_str()),
            SearchMode::Fuzzy => self.is_similar(word, form),
            SearchMode::Root => arabic && contains_root_pattern(word, &self.query.root),
            SearchMode::Flexible => [SearchMode::Words, SearchMode::Partial, SearchMode::Fuzzy]
                .into_iter()
                .any(|fallback| self.word_matches_mode(fallback, word, form, arabic)),
        }
    }
}

/// Decide whether `text` matches `query` under `mode`.
///
/// `options.exact_match` still forces exact semantics. Empty or
/// whitespace-only queries never match.
pub fn matches(text: &str, query: &str, mode: SearchMode, options: &MatchOptions) -> bool {
    Matcher::new(query, options.with_mode(mode)).is_match(text)
}
