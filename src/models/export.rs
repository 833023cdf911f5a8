//! Analysis snapshot handed to the export sink.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::analysis::WordCount;

/// Counts recorded in an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportStatistics {
    pub sentences: usize,
    pub content_words: usize,
    pub unique_words: usize,
    /// `None` (serialized as `null`) when the document has no content words.
    pub lexical_density: Option<f64>,
}

/// Write-once snapshot of an analysis session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisExport {
    /// Source identifier (file name).
    pub source: String,
    pub analyzed_at: DateTime<Local>,
    pub statistics: ExportStatistics,
    /// Most frequent content words, highest count first.
    pub top_words: Vec<WordCount>,
}

impl AnalysisExport {
    /// Conventional output file name: `analysis_<stem>.json`, where the stem is
    /// the source name up to its first `.`.
    pub fn file_name(&self) -> String {
        let stem = self.source.split('.').next().unwrap_or_default();
        format!("analysis_{}.json", stem)
    }
}
