//! Local lexical analysis of a single document.
//!
//! The analyzer tokenizes once at construction and every operation afterwards
//! is a read over that immutable state.

use chrono::Local;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::frequency::{FrequencyTable, WordCount};
use super::tokenizer::TokenizerStrategy;
use crate::export::{ExportError, ExportSink};
use crate::models::{
    normalize_whitespace, AnalysisExport, Document, DocumentMetadata, ExportStatistics,
};

/// Tunable limits for analysis output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Characters shown per page preview.
    pub preview_chars: usize,
    /// Number of leading pages previewed.
    pub preview_pages: usize,
    /// Characters of context on each side of a search match.
    pub context_chars: usize,
    /// Search snippets returned for display.
    pub max_snippets: usize,
    /// Entries in the keyword ranking.
    pub top_keywords: usize,
    /// Entries in the long-word ranking.
    pub top_long_words: usize,
    /// A long word has strictly more characters than this.
    pub long_word_min_chars: usize,
    /// Entries in an export's top word list.
    pub export_top_words: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            preview_chars: 300,
            preview_pages: 5,
            context_chars: 100,
            max_snippets: 6,
            top_keywords: 15,
            top_long_words: 5,
            long_word_min_chars: 8,
            export_top_words: 20,
        }
    }
}

/// Preview of one page's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePreview {
    /// 1-based page number.
    pub page: usize,
    pub text: String,
    /// Whether `text` was cut short.
    pub truncated: bool,
}

/// Document-level counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub sentence_count: usize,
    pub word_count: usize,
    pub unique_word_count: usize,
    /// Unique / total content words; `None` when there are no content words.
    pub lexical_density: Option<f64>,
    /// Empty unless the source had page markers.
    pub page_previews: Vec<PagePreview>,
}

/// Context snippets around a search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub term: String,
    /// Every match in the document, before the display cap.
    pub total: usize,
    /// At most `max_snippets` whitespace-collapsed snippets.
    pub snippets: Vec<String>,
}

impl SearchResults {
    fn empty(term: &str) -> Self {
        Self {
            term: term.to_string(),
            total: 0,
            snippets: Vec::new(),
        }
    }

    /// Matches not shown in `snippets`.
    pub fn hidden(&self) -> usize {
        self.total.saturating_sub(self.snippets.len())
    }
}

/// Ranked keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordReport {
    pub top: Vec<WordCount>,
    /// Most frequent long words, a rough proxy for technical terms.
    pub long_words: Vec<WordCount>,
}

/// Descriptive statistics over sentences and content words.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStatistics {
    pub mean_words_per_sentence: f64,
    pub mean_letters_per_word: f64,
    pub max_words_in_sentence: usize,
    pub min_words_in_sentence: usize,
    pub single_occurrence_words: usize,
}

/// Outcome of comparing two words' counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    FirstMoreFrequent,
    SecondMoreFrequent,
    Tie,
}

/// Substring counts of two words in the full text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub first: String,
    pub first_count: usize,
    pub second: String,
    pub second_count: usize,
    pub verdict: Verdict,
}

impl Comparison {
    /// Human-readable verdict, e.g. `'correu' is more frequent`.
    pub fn verdict_text(&self) -> String {
        match self.verdict {
            Verdict::FirstMoreFrequent => format!("'{}' is more frequent", self.first),
            Verdict::SecondMoreFrequent => format!("'{}' is more frequent", self.second),
            Verdict::Tie => "They are equally frequent".to_string(),
        }
    }
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// First `max_chars` characters of `text`.
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

/// Analyzer over one document's tokenized views.
#[derive(Debug, Clone)]
pub struct DocumentAnalyzer {
    source: String,
    text: String,
    lowered: String,
    pages: Option<Vec<String>>,
    sentences: Vec<String>,
    words: Vec<String>,
    frequencies: FrequencyTable,
    options: AnalysisOptions,
}

impl DocumentAnalyzer {
    /// Tokenize `document` with `tokenizer`.
    pub fn new(document: &Document, tokenizer: &dyn TokenizerStrategy) -> Self {
        let text = document.text().to_string();
        let sentences = tokenizer.split_sentences(&text);
        let words = tokenizer.extract_words(&text);
        let frequencies = FrequencyTable::from_words(&words);

        debug!(
            "Analyzed {} with {} tokenizer: {} sentences, {} words",
            document.source(),
            tokenizer.name(),
            sentences.len(),
            words.len()
        );

        Self {
            source: document.source().to_string(),
            lowered: text.to_lowercase(),
            text,
            pages: document.pages().map(<[String]>::to_vec),
            sentences,
            words,
            frequencies,
            options: AnalysisOptions::default(),
        }
    }

    /// Analyze raw text without a loaded file.
    pub fn from_text(
        source: &str,
        raw_text: &str,
        tokenizer: &dyn TokenizerStrategy,
    ) -> Self {
        let document = Document::new(source, raw_text.to_string(), DocumentMetadata::default());
        Self::new(&document, tokenizer)
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    fn lexical_density(&self) -> Option<f64> {
        if self.words.is_empty() {
            None
        } else {
            Some(self.frequencies.unique() as f64 / self.words.len() as f64)
        }
    }

    pub fn summarize(&self) -> Summary {
        let page_previews = self
            .pages
            .iter()
            .flatten()
            .take(self.options.preview_pages)
            .enumerate()
            .map(|(i, content)| {
                let content = content.trim();
                let (preview, truncated) = truncate_chars(content, self.options.preview_chars);
                PagePreview {
                    page: i + 1,
                    text: preview.to_string(),
                    truncated,
                }
            })
            .collect();

        Summary {
            sentence_count: self.sentences.len(),
            word_count: self.words.len(),
            unique_word_count: self.frequencies.unique(),
            lexical_density: self.lexical_density(),
            page_previews,
        }
    }

    /// Case-insensitive literal search with surrounding context.
    ///
    /// Each match greedily takes up to `context_chars` on both sides, so
    /// occurrences that fall inside a previous snippet's context are part of
    /// that snippet rather than separate matches.
    pub fn search(&self, term: &str) -> SearchResults {
        if term.trim().is_empty() {
            return SearchResults::empty(term);
        }

        let window = self.options.context_chars;
        let pattern = format!(".{{0,{w}}}{}.{{0,{w}}}", regex::escape(term), w = window);
        let regex = match RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .size_limit(64 * 1024 * 1024)
            .build()
        {
            Ok(regex) => regex,
            Err(e) => {
                warn!("Could not build search pattern for {:?}: {}", term, e);
                return SearchResults::empty(term);
            }
        };

        let mut total = 0;
        let mut snippets = Vec::new();
        for m in regex.find_iter(&self.text) {
            total += 1;
            if snippets.len() < self.options.max_snippets {
                snippets.push(normalize_whitespace(m.as_str()));
            }
        }

        SearchResults {
            term: term.to_string(),
            total,
            snippets,
        }
    }

    pub fn keyword_frequency(&self) -> KeywordReport {
        let min = self.options.long_word_min_chars;
        KeywordReport {
            top: self.frequencies.top(self.options.top_keywords),
            long_words: self
                .frequencies
                .ranked_where(self.options.top_long_words, |w| w.chars().count() > min),
        }
    }

    /// `None` when there are no sentences or no content words.
    pub fn statistics(&self) -> Option<TextStatistics> {
        if self.sentences.is_empty() || self.words.is_empty() {
            return None;
        }

        let words_per_sentence: Vec<usize> = self
            .sentences
            .iter()
            .map(|s| s.split_whitespace().count())
            .collect();
        let letters: usize = self.words.iter().map(|w| w.chars().count()).sum();

        Some(TextStatistics {
            mean_words_per_sentence: words_per_sentence.iter().sum::<usize>() as f64
                / words_per_sentence.len() as f64,
            mean_letters_per_word: letters as f64 / self.words.len() as f64,
            max_words_in_sentence: words_per_sentence.iter().copied().max().unwrap_or(0),
            min_words_in_sentence: words_per_sentence.iter().copied().min().unwrap_or(0),
            single_occurrence_words: self.frequencies.singletons(),
        })
    }

    /// Compare raw substring counts of two words in the lowercased full text.
    ///
    /// This deliberately counts occurrences inside longer words and ignores
    /// stopword filtering, unlike [`keyword_frequency`](Self::keyword_frequency).
    pub fn compare(&self, first: &str, second: &str) -> Comparison {
        let first_count = count_occurrences(&self.lowered, &first.to_lowercase());
        let second_count = count_occurrences(&self.lowered, &second.to_lowercase());
        let verdict = match first_count.cmp(&second_count) {
            std::cmp::Ordering::Greater => Verdict::FirstMoreFrequent,
            std::cmp::Ordering::Less => Verdict::SecondMoreFrequent,
            std::cmp::Ordering::Equal => Verdict::Tie,
        };

        Comparison {
            first: first.to_string(),
            first_count,
            second: second.to_string(),
            second_count,
            verdict,
        }
    }

    /// Snapshot of the current findings.
    pub fn snapshot(&self) -> AnalysisExport {
        AnalysisExport {
            source: self.source.clone(),
            analyzed_at: Local::now(),
            statistics: ExportStatistics {
                sentences: self.sentences.len(),
                content_words: self.words.len(),
                unique_words: self.frequencies.unique(),
                lexical_density: self.lexical_density(),
            },
            top_words: self.frequencies.top(self.options.export_top_words),
        }
    }

    /// Build a snapshot and persist it through `sink`, returning where it went.
    pub fn export(&self, sink: &dyn ExportSink) -> Result<String, ExportError> {
        sink.persist(&self.snapshot())
    }
}
