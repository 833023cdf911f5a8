//! Persisting analysis snapshots.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::models::AnalysisExport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination for analysis snapshots.
pub trait ExportSink {
    /// Persist `export`, returning a description of where it went.
    fn persist(&self, export: &AnalysisExport) -> Result<String, ExportError>;
}

/// Writes pretty-printed JSON files named `analysis_<stem>.json` into a directory.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a snapshot will be written to.
    pub fn path_for(&self, export: &AnalysisExport) -> PathBuf {
        self.dir.join(export.file_name())
    }
}

impl ExportSink for JsonFileSink {
    fn persist(&self, export: &AnalysisExport) -> Result<String, ExportError> {
        let path = self.path_for(export);
        let json = serde_json::to_string_pretty(export)?;

        fs::create_dir_all(&self.dir).map_err(|source| ExportError::Write {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

        info!("Exported analysis of {} to {}", export.source, path.display());
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DocumentAnalyzer, ManualTokenizer};
    use tempfile::TempDir;

    #[test]
    fn test_json_sink_writes_named_file() {
        let temp = TempDir::new().unwrap();
        let sink = JsonFileSink::new(temp.path().join("out"));
        let analyzer = DocumentAnalyzer::from_text(
            "report.final.txt",
            "O gato correu. O cão correu mais rápido!",
            &ManualTokenizer,
        );

        let location = analyzer.export(&sink).unwrap();
        let path = temp.path().join("out").join("analysis_report.json");
        assert_eq!(location, path.display().to_string());

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["source"], "report.final.txt");
        assert_eq!(json["statistics"]["sentences"], 2);
        assert_eq!(json["statistics"]["content_words"], 6);
        assert_eq!(json["top_words"][0]["word"], "correu");
        assert_eq!(json["top_words"][0]["count"], 2);
    }

    #[test]
    fn test_json_sink_write_failure() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "").unwrap();
        let sink = JsonFileSink::new(&blocker);
        let analyzer = DocumentAnalyzer::from_text("a.txt", "texto simples", &ManualTokenizer);
        assert!(matches!(
            analyzer.export(&sink),
            Err(ExportError::Write { .. })
        ));
    }
}
