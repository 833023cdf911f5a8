//! Local text analysis.
//!
//! Everything here runs offline: tokenization, frequency ranking, contextual
//! search and descriptive statistics over a loaded [`Document`](crate::models::Document).

mod analyzer;
mod frequency;
mod stopwords;
mod tokenizer;

pub use analyzer::{
    AnalysisOptions, Comparison, DocumentAnalyzer, KeywordReport, PagePreview, SearchResults,
    Summary, TextStatistics, Verdict,
};
pub use frequency::{FrequencyTable, WordCount};
pub use stopwords::{
    manual_stopwords, parse_stopword_list, StopwordLanguage, StopwordResources, MANUAL_STOPWORDS,
};
pub use tokenizer::{
    select_tokenizer, LinguisticTokenizer, ManualTokenizer, TokenizerError, TokenizerMode,
    TokenizerStrategy,
};
