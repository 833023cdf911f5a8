//! Sentence and content-word tokenization.
//!
//! Two strategies implement [`TokenizerStrategy`]:
//! - [`ManualTokenizer`]: regex based, always available.
//! - [`LinguisticTokenizer`]: Unicode (UAX #29) sentence and word boundaries
//!   with Portuguese + English stopword lists loaded from disk.
//!
//! Their filtering thresholds differ on purpose: manual keeps any `\w` run
//! longer than 2 characters, linguistic keeps alphabetic words of at least 3.
//! [`select_tokenizer`] falls back to the manual strategy whenever the
//! linguistic resources cannot be loaded; callers never see that failure.

use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use super::stopwords::{manual_stopwords, StopwordResources};

static SENTENCE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());
static WORD_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Errors raised while preparing a tokenizer.
#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("Tokenizer resource not found: {0}")]
    ResourceMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A sentence/word tokenizer.
pub trait TokenizerStrategy: Send + Sync {
    /// Short name for logs and display.
    fn name(&self) -> &'static str;

    /// Split text into trimmed, non-empty sentences in document order.
    fn split_sentences(&self, text: &str) -> Vec<String>;

    /// Lowercased content words with stopwords and short tokens removed.
    fn extract_words(&self, text: &str) -> Vec<String>;

    /// Minimum character count of any word returned by `extract_words`.
    fn min_word_chars(&self) -> usize;

    /// Whether `word` (already lowercased) is in this strategy's stopword set.
    fn is_stopword(&self, word: &str) -> bool;
}

/// Regex tokenizer with a fixed Portuguese stopword list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualTokenizer;

impl TokenizerStrategy for ManualTokenizer {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn split_sentences(&self, text: &str) -> Vec<String> {
        SENTENCE_BOUNDARY
            .split(text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn extract_words(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD_RUN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|w| w.chars().count() > 2 && !self.is_stopword(w))
            .map(str::to_string)
            .collect()
    }

    fn min_word_chars(&self) -> usize {
        3
    }

    fn is_stopword(&self, word: &str) -> bool {
        manual_stopwords().contains(word)
    }
}

/// Unicode-aware tokenizer with a multilingual stopword set.
#[derive(Debug, Clone)]
pub struct LinguisticTokenizer {
    stopwords: HashSet<String>,
}

impl LinguisticTokenizer {
    /// Minimum characters for a content word.
    pub const MIN_WORD_CHARS: usize = 3;

    pub fn new(stopwords: HashSet<String>) -> Self {
        Self { stopwords }
    }

    /// Build from installed stopword lists.
    pub fn from_resources(resources: &StopwordResources) -> Result<Self, TokenizerError> {
        Ok(Self::new(resources.load()?))
    }
}

impl TokenizerStrategy for LinguisticTokenizer {
    fn name(&self) -> &'static str {
        "linguistic"
    }

    fn split_sentences(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn extract_words(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        lowered
            .unicode_words()
            .filter(|w| {
                w.chars().all(char::is_alphabetic)
                    && w.chars().count() >= Self::MIN_WORD_CHARS
                    && !self.is_stopword(w)
            })
            .map(str::to_string)
            .collect()
    }

    fn min_word_chars(&self) -> usize {
        Self::MIN_WORD_CHARS
    }

    fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }
}

/// Which tokenizer to use.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerMode {
    /// Linguistic when its resources are installed, manual otherwise
    #[default]
    Auto,
    /// Always the regex tokenizer
    Manual,
    /// Prefer the linguistic tokenizer (still falls back when unavailable)
    #[serde(alias = "enhanced")]
    Linguistic,
}

impl FromStr for TokenizerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            "linguistic" | "enhanced" => Ok(Self::Linguistic),
            other => Err(format!("unknown tokenizer mode: {}", other)),
        }
    }
}

/// Pick a tokenizer for `mode`, falling back to [`ManualTokenizer`] silently.
pub fn select_tokenizer(
    mode: TokenizerMode,
    resources: &StopwordResources,
) -> Box<dyn TokenizerStrategy> {
    if mode == TokenizerMode::Manual {
        return Box::new(ManualTokenizer);
    }

    match LinguisticTokenizer::from_resources(resources) {
        Ok(tokenizer) => Box::new(tokenizer),
        Err(e) => {
            debug!("Linguistic tokenizer unavailable ({}), using manual", e);
            Box::new(ManualTokenizer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stopwords::{parse_stopword_list, StopwordLanguage};
    use tempfile::TempDir;

    const SAMPLE: &str = "O gato correu. O cão correu mais rápido!";

    fn bundled_linguistic() -> LinguisticTokenizer {
        let words = StopwordLanguage::ALL
            .iter()
            .flat_map(|lang| parse_stopword_list(lang.bundled()).collect::<Vec<_>>())
            .collect();
        LinguisticTokenizer::new(words)
    }

    /// Strip sentence punctuation and whitespace for content comparison.
    fn content_only(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '.' | '!' | '?'))
            .collect()
    }

    #[test]
    fn test_manual_sentences() {
        let sentences = ManualTokenizer.split_sentences(SAMPLE);
        assert_eq!(sentences, vec!["O gato correu", "O cão correu mais rápido"]);
    }

    #[test]
    fn test_manual_sentences_collapse_punctuation_runs() {
        let sentences = ManualTokenizer.split_sentences("Really?!  Yes... ok");
        assert_eq!(sentences, vec!["Really", "Yes", "ok"]);
        assert!(ManualTokenizer.split_sentences(" ... !? ").is_empty());
    }

    #[test]
    fn test_manual_words() {
        let words = ManualTokenizer.extract_words(SAMPLE);
        assert_eq!(
            words,
            vec!["gato", "correu", "cão", "correu", "mais", "rápido"]
        );
    }

    #[test]
    fn test_manual_words_keep_digits() {
        let words = ManualTokenizer.extract_words("Em 2023 o PIB_real subiu 12%");
        assert_eq!(words, vec!["2023", "pib_real", "subiu"]);
    }

    #[test]
    fn test_linguistic_sentences_keep_order() {
        let sentences = bundled_linguistic().split_sentences(SAMPLE);
        assert_eq!(sentences, vec!["O gato correu.", "O cão correu mais rápido!"]);
    }

    #[test]
    fn test_linguistic_words_use_larger_stopword_set() {
        let words = bundled_linguistic().extract_words(SAMPLE);
        // "mais" is a Portuguese stopword only in the larger list
        assert_eq!(words, vec!["gato", "correu", "cão", "correu", "rápido"]);

        let words = bundled_linguistic().extract_words("The 3rd report was about budgets 2023");
        assert_eq!(words, vec!["report", "budgets"]);
    }

    #[test]
    fn test_sentences_preserve_content() {
        let texts = [
            SAMPLE,
            "No punctuation at all",
            "First line.\nSecond line!  Third?? Fourth",
            "",
            "...",
        ];
        let linguistic = bundled_linguistic();
        let strategies: [&dyn TokenizerStrategy; 2] = [&ManualTokenizer, &linguistic];
        for strategy in strategies {
            for text in texts {
                let joined: String = strategy.split_sentences(text).concat();
                assert_eq!(
                    content_only(&joined),
                    content_only(text),
                    "{} lost content for {:?}",
                    strategy.name(),
                    text
                );
            }
        }
    }

    #[test]
    fn test_words_respect_strategy_thresholds() {
        let text = "Os dados de 2021 mostram que a economia e o emprego cresceram. \
                    It is what it is, and the report was clear: ok, go, na, em, um.";
        let linguistic = bundled_linguistic();
        let strategies: [&dyn TokenizerStrategy; 2] = [&ManualTokenizer, &linguistic];
        for strategy in strategies {
            for word in strategy.extract_words(text) {
                assert!(word.chars().count() >= strategy.min_word_chars());
                assert!(!strategy.is_stopword(&word));
                assert_eq!(word, word.to_lowercase());
            }
        }
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("AUTO".parse::<TokenizerMode>().unwrap(), TokenizerMode::Auto);
        assert_eq!(
            "enhanced".parse::<TokenizerMode>().unwrap(),
            TokenizerMode::Linguistic
        );
        assert!("nltk".parse::<TokenizerMode>().is_err());
    }

    #[test]
    fn test_select_falls_back_without_resources() {
        let temp = TempDir::new().unwrap();
        let resources = StopwordResources::new(temp.path());
        assert_eq!(
            select_tokenizer(TokenizerMode::Linguistic, &resources).name(),
            "manual"
        );
        assert_eq!(select_tokenizer(TokenizerMode::Auto, &resources).name(), "manual");
    }

    #[test]
    fn test_select_uses_installed_resources() {
        let temp = TempDir::new().unwrap();
        let resources = StopwordResources::new(temp.path());
        resources.install().unwrap();
        assert_eq!(
            select_tokenizer(TokenizerMode::Auto, &resources).name(),
            "linguistic"
        );
        assert_eq!(select_tokenizer(TokenizerMode::Manual, &resources).name(), "manual");
    }
}
