//! Highlight renderer.
//!
//! Marks every occurrence of the query, and of its catalogued equivalent in
//! the other language when one is present, with a `<mark>` element. Text that
//! already carries a mark is left alone, so rendering twice is a no-op.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::analyzers::{
    collapse_whitespace, contains_arabic, find_occurrences, is_arabic_separator, word_ranges,
    Analyzer, Language,
};
use crate::concordance::Concordance;
use crate::matcher::{MatchOptions, Matcher, SearchMode};

/// Opening of the marker element; its presence means the text is already annotated.
pub const MARK_OPEN: &str = "<mark";
const MARK_CLOSE: &str = "</mark>";

/// Which candidate term produced a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    /// The caller's query
    Query,
    /// The query's equivalent in the other language
    Equivalent,
}

impl SpanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Query => "query",
            SpanKind::Equivalent => "equivalent",
        }
    }
}

/// Half-open byte range over the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

impl HighlightSpan {
    fn new(range: Range<usize>, kind: SpanKind) -> Self {
        Self {
            start: range.start,
            end: range.end,
            kind,
        }
    }

    pub fn overlaps(&self, other: &HighlightSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// CSS classes written on the marker element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Marker {
    pub query_class: String,
    pub equivalent_class: String,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            query_class: "match match-query".to_string(),
            equivalent_class: "match match-equivalent".to_string(),
        }
    }
}

impl Marker {
    fn class(&self, kind: SpanKind) -> &str {
        match kind {
            SpanKind::Query => &self.query_class,
            SpanKind::Equivalent => &self.equivalent_class,
        }
    }
}

/// A term to mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub term: String,
    pub kind: SpanKind,
}

#[derive(Debug, Clone)]
pub struct Highlighter<'c> {
    options: MatchOptions,
    concordance: Option<&'c Concordance>,
    marker: Marker,
    bilingual: bool,
}

impl<'c> Highlighter<'c> {
    pub fn new(options: MatchOptions) -> Self {
        Self {
            options,
            concordance: None,
            marker: Marker::default(),
            bilingual: true,
        }
    }

    pub fn with_concordance(mut self, concordance: &'c Concordance) -> Self {
        self.concordance = Some(concordance);
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    /// Enable or disable cross-language equivalents.
    pub fn with_bilingual(mut self, enabled: bool) -> Self {
        self.bilingual = enabled;
        self
    }

    pub fn is_marked(text: &str) -> bool {
        text.contains(MARK_OPEN)
    }

    /// Terms to mark in `text`, longest first.
    ///
    /// The query is always a candidate. Its equivalent joins when a companion
    /// text is supplied, the query and `text` are in different languages, and
    /// the equivalent occurs in `text` as a whole word.
    pub fn candidates(&self, text: &str, query: &str, companion: Option<&str>) -> Vec<Candidate> {
        let primary = query.trim();
        if primary.is_empty() {
            return Vec::new();
        }

        let mut candidates = vec![Candidate {
            term: primary.to_string(),
            kind: SpanKind::Query,
        }];

        let has_companion = companion.is_some_and(|c| !c.trim().is_empty());
        if let Some(concordance) = self.concordance.filter(|_| self.bilingual && has_companion) {
            let text_language = Language::detect(text);
            let equivalent = concordance
                .resolve_equivalent(primary, text_language)
                .filter(|eq| is_present_as_word(eq, text, text_language));
            if let Some(equivalent) = equivalent {
                candidates.push(Candidate {
                    term: equivalent.to_string(),
                    kind: SpanKind::Equivalent,
                });
            }
        }

        candidates.sort_by(|a, b| b.term.chars().count().cmp(&a.term.chars().count()));
        candidates
    }

    /// Non-overlapping spans sorted by start offset.
    pub fn spans(&self, text: &str, query: &str, companion: Option<&str>) -> Vec<HighlightSpan> {
        if Self::is_marked(text) || text.trim().is_empty() {
            return Vec::new();
        }

        let text_arabic = contains_arabic(text);
        let mut proposals = Vec::new();

        for candidate in self.candidates(text, query, companion) {
            if contains_arabic(&candidate.term) != text_arabic {
                continue;
            }
            let ranges = if text_arabic {
                self.arabic_ranges(text, &candidate)
            } else {
                self.latin_ranges(text, &candidate)
            };
            let weight = candidate.term.chars().count();
            proposals.extend(
                ranges
                    .into_iter()
                    .map(|range| (weight, HighlightSpan::new(range, candidate.kind))),
            );
        }

        resolve_overlaps(proposals)
    }

    /// `text` with every span wrapped in a marker element; unchanged when
    /// already marked or when nothing matches.
    pub fn highlight(&self, text: &str, query: &str, companion: Option<&str>) -> String {
        let spans = self.spans(text, query, companion);
        self.render(text, &spans)
    }

    /// Wrap the given sorted, non-overlapping spans.
    ///
    /// Text and marker classes are copied verbatim, without HTML escaping, so
    /// the output is only safe to embed as markup when both are trusted.
    pub fn render(&self, text: &str, spans: &[HighlightSpan]) -> String {
        if spans.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len() + spans.len() * 48);
        let mut cursor = 0;

        for span in spans {
            let valid = span.start >= cursor
                && span.start < span.end
                && span.end <= text.len()
                && text.is_char_boundary(span.start)
                && text.is_char_boundary(span.end);
            if !valid {
                continue;
            }
            out.push_str(&text[cursor..span.start]);
            out.push_str(&format!(
                "{MARK_OPEN} class=\"{}\" data-kind=\"{}\">",
                self.marker.class(span.kind),
                span.kind.as_str()
            ));
            out.push_str(&text[span.start..span.end]);
            out.push_str(MARK_CLOSE);
            cursor = span.end;
        }

        out.push_str(&text[cursor..]);
        out
    }

    fn candidate_matcher(&self, candidate: &Candidate) -> Matcher {
        match candidate.kind {
            SpanKind::Query => Matcher::new(&candidate.term, self.options),
            SpanKind::Equivalent => Matcher::new(
                &candidate.term,
                MatchOptions {
                    exact_match: false,
                    search_mode: SearchMode::Words,
                    ..self.options
                },
            ),
        }
    }

    /// Whole Arabic words, separators excluded, whose normalized form matches.
    fn arabic_ranges(&self, text: &str, candidate: &Candidate) -> Vec<Range<usize>> {
        let matcher = self.candidate_matcher(candidate);
        let analyzer = matcher.analyzer(true);

        word_ranges(text, is_arabic_separator)
            .into_iter()
            .filter(|range| {
                let word = analyzer.normalize(&text[range.clone()]);
                matcher.word_matches(&word, true)
            })
            .collect()
    }

    /// Word-boundary anchored occurrences, whatever the mode.
    fn latin_ranges(&self, text: &str, candidate: &Candidate) -> Vec<Range<usize>> {
        let term = collapse_whitespace(&candidate.term);
        find_occurrences(text, &term, self.options.case_sensitive)
    }
}

/// Whether every word of `term` occurs as a whole word of `text`, ignoring
/// case and diacritics.
fn is_present_as_word(term: &str, text: &str, language: Language) -> bool {
    match language {
        Language::Arabic => {
            let analyzer = MatchOptions::default().arabic_analyzer();
            let words = analyzer.analyze(text);
            let wanted = analyzer.analyze(term);
            !wanted.is_empty() && wanted.iter().all(|w| words.contains(w))
        }
        Language::French => {
            !find_occurrences(text, &collapse_whitespace(term), false).is_empty()
        }
    }
}

/// Keep the longest term's spans first, earliest start on ties, dropping
/// anything that overlaps an already kept span.
fn resolve_overlaps(mut proposals: Vec<(usize, HighlightSpan)>) -> Vec<HighlightSpan> {
    proposals.sort_by(|(wa, a), (wb, b)| wb.cmp(wa).then(a.start.cmp(&b.start)));

    let mut kept: Vec<HighlightSpan> = Vec::with_capacity(proposals.len());
    for (_, span) in proposals {
        if !kept.iter().any(|k| k.overlaps(&span)) {
            kept.push(span);
        }
    }

    kept.sort_by_key(|span| span.start);
    kept
}

/// Highlight `query` in `text` with the built-in concordance.
///
/// `companion` is the same verse in the other language; when given, the
/// query's catalogued equivalent is marked too.
pub fn highlight(
    text: &str,
    query: &str,
    options: &MatchOptions,
    companion: Option<&str>,
) -> String {
    let mut highlighter = Highlighter::new(*options);
    if let Ok(concordance) = Concordance::builtin() {
        highlighter = highlighter.with_concordance(concordance);
    }
    highlighter.highlight(text, query, companion)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> &'static Concordance {
        Concordance::builtin().unwrap()
    }

    fn marked<'t>(text: &'t str, spans: &[HighlightSpan]) -> Vec<&'t str> {
        spans.iter().map(|s| &text[s.start..s.end]).collect()
    }

    #[test]
    fn test_french_single_span() {
        let out = highlight("Allah est grand", "Allah", &MatchOptions::default(), None);
        assert_eq!(
            out,
            "<mark class=\"match match-query\" data-kind=\"query\">Allah</mark> est grand"
        );
    }

    #[test]
    fn test_arabic_whole_word_keeps_diacritics() {
        let text = "بِسْمِ اللَّهِ الرَّحْمَٰنِ";
        let options = MatchOptions::default().with_mode(SearchMode::Words);
        let highlighter = Highlighter::new(options);
        let spans = highlighter.spans(text, "الله", None);
        assert_eq!(marked(text, &spans), vec!["اللَّهِ"]);
    }

    #[test]
    fn test_arabic_partial_marks_containing_word() {
        let text = "الرحمن الرحيم";
        let highlighter = Highlighter::new(MatchOptions::default().with_mode(SearchMode::Partial));
        assert_eq!(marked(text, &highlighter.spans(text, "رحمن", None)), vec!["الرحمن"]);

        let words = Highlighter::new(MatchOptions::default().with_mode(SearchMode::Words));
        assert!(words.spans(text, "رحمن", None).is_empty());
    }

    #[test]
    fn test_arabic_root_mode() {
        let text = "والذين يكتبون الكتاب بأيديهم";
        let highlighter = Highlighter::new(MatchOptions::default().with_mode(SearchMode::Root));
        assert_eq!(
            marked(text, &highlighter.spans(text, "كتب", None)),
            vec!["يكتبون", "الكتاب"]
        );
    }

    #[test]
    fn test_equivalent_in_french_text() {
        let french = "Au nom d'Allah, le Tout Miséricordieux";
        let arabic = "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ";
        let highlighter = Highlighter::new(MatchOptions::default()).with_concordance(builtin());
        let spans = highlighter.spans(french, "اللَّهِ", Some(arabic));
        assert_eq!(marked(french, &spans), vec!["Allah"]);
        assert_eq!(spans[0].kind, SpanKind::Equivalent);
    }

    #[test]
    fn test_equivalent_in_arabic_text() {
        let arabic = "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ";
        let french = "Au nom d'Allah";
        let out = Highlighter::new(MatchOptions::default())
            .with_concordance(builtin())
            .highlight(arabic, "Allah", Some(french));
        assert_eq!(
            out,
            "بِسْمِ <mark class=\"match match-equivalent\" data-kind=\"equivalent\">اللَّهِ</mark> الرَّحْمَٰنِ الرَّحِيمِ"
        );
    }

    #[test]
    fn test_equivalent_follows_diacritics_option() {
        let options = MatchOptions {
            ignore_diacritics: false,
            ..MatchOptions::default()
        };
        let highlighter = Highlighter::new(options).with_concordance(builtin());
        assert!(highlighter
            .spans("بِسْمِ اللَّهِ", "Allah", Some("Au nom d'Allah"))
            .is_empty());
        let bare = "بسم الله";
        let spans = highlighter.spans(bare, "Allah", Some("Au nom d'Allah"));
        assert_eq!(marked(bare, &spans), vec!["الله"]);
    }

    #[test]
    fn test_equivalent_follows_case_option() {
        let options = MatchOptions {
            case_sensitive: true,
            ..MatchOptions::default()
        };
        let highlighter = Highlighter::new(options).with_concordance(builtin());
        assert!(highlighter
            .spans("allah est grand", "الله", Some("الله أكبر"))
            .is_empty());

        let text = "Allah est grand";
        let spans = highlighter.spans(text, "الله", Some("الله أكبر"));
        assert_eq!(marked(text, &spans), vec!["Allah"]);
        assert_eq!(spans[0].kind, SpanKind::Equivalent);
    }

    #[test]
    fn test_equivalent_needs_companion_and_presence() {
        let highlighter = Highlighter::new(MatchOptions::default()).with_concordance(builtin());
        assert!(highlighter.spans("Au nom d'Allah", "الله", None).is_empty());
        assert!(highlighter
            .spans("Dieu est grand", "الله", Some("الله أكبر"))
            .is_empty());
        let off = highlighter.clone().with_bilingual(false);
        assert!(off.spans("Au nom d'Allah", "الله", Some("بسم الله")).is_empty());
    }

    #[test]
    fn test_equivalent_is_whole_word_even_in_partial_mode() {
        let options = MatchOptions::default().with_mode(SearchMode::Partial);
        let highlighter = Highlighter::new(options).with_concordance(builtin());
        let text = "la prière et les prières";
        let spans = highlighter.spans(text, "الصلاة", Some("الصلاة"));
        assert_eq!(marked(text, &spans), vec!["prière"]);
    }

    #[test]
    fn test_french_marks_whole_words_only() {
        let text = "Le Miséricordieux, miséricorde";
        for mode in [SearchMode::Partial, SearchMode::Flexible] {
            let highlighter = Highlighter::new(MatchOptions::default().with_mode(mode));
            assert!(highlighter.spans(text, "miséricord", None).is_empty());
            assert_eq!(
                marked(text, &highlighter.spans(text, "miséricordieux", None)),
                vec!["Miséricordieux"]
            );
        }
    }

    #[test]
    fn test_french_case_option() {
        let text = "Le Miséricordieux, miséricorde";

        let sensitive = Highlighter::new(MatchOptions {
            case_sensitive: true,
            ..MatchOptions::default()
        });
        assert!(sensitive.spans(text, "le", None).is_empty());
        assert_eq!(sensitive.spans(text, "Le", None).len(), 1);
    }

    #[test]
    fn test_empty_query_and_marked_text_unchanged() {
        let options = MatchOptions::default();
        assert_eq!(highlight("الحمد لله", "  ", &options, None), "الحمد لله");
        let already = "<mark class=\"x\">Allah</mark> est grand";
        assert_eq!(highlight(already, "grand", &options, None), already);
    }

    #[test]
    fn test_rendering_is_reentrant() {
        let options = MatchOptions::default().with_mode(SearchMode::Words);
        let samples = [
            ("بسم الله الرحمن الرحيم", "الله"),
            ("Allah est grand, Allah pardonne", "allah"),
            ("rien à marquer", "absent"),
        ];
        for (text, query) in samples {
            let once = highlight(text, query, &options, None);
            assert_eq!(highlight(&once, query, &options, None), once);
        }
    }

    #[test]
    fn test_candidates_sorted_longest_first() {
        let highlighter = Highlighter::new(MatchOptions::default()).with_concordance(builtin());
        let candidates =
            highlighter.candidates("les croyants prient", "مؤمن", Some("المؤمنون"));
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].term, "croyants");
        assert_eq!(candidates[1].kind, SpanKind::Query);
    }

    #[test]
    fn test_resolve_overlaps_longer_wins() {
        let span = |start, end, kind| HighlightSpan { start, end, kind };
        let kept = resolve_overlaps(vec![
            (4, span(0, 4, SpanKind::Query)),
            (10, span(2, 12, SpanKind::Equivalent)),
            (4, span(14, 18, SpanKind::Query)),
            (4, span(16, 20, SpanKind::Query)),
        ]);
        assert_eq!(
            kept,
            vec![
                span(2, 12, SpanKind::Equivalent),
                span(14, 18, SpanKind::Query)
            ]
        );
    }

    #[test]
    fn test_custom_marker() {
        let marker = Marker {
            query_class: "hit".to_string(),
            ..Marker::default()
        };
        let out = Highlighter::new(MatchOptions::default())
            .with_marker(marker)
            .highlight("Allah est grand", "grand", None);
        assert_eq!(out, "Allah est <mark class=\"hit\" data-kind=\"query\">grand</mark>");
    }

    #[test]
    fn test_render_copies_text_verbatim() {
        let text = "Allah & <b>grand</b>";
        let out = Highlighter::new(MatchOptions::default()).highlight(text, "Allah", None);
        assert_eq!(
            out,
            "<mark class=\"match match-query\" data-kind=\"query\">Allah</mark> & <b>grand</b>"
        );
    }
}
