//! Conversation history log.
//!
//! Every answered question is appended to a JSON file of the form
//! `{"conversations": [{date, file, mode, question, answer}, ...]}`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Mode label recorded for AI answers.
pub const MODE_AI: &str = "AI mode";

/// Entries shown by [`ConversationHistory::recent`] callers by default.
pub const RECENT_ENTRIES: usize = 8;

/// Characters of question/answer shown per entry.
pub const PREVIEW_CHARS: usize = 80;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Invalid history file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to save history: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: DateTime<Local>,
    pub file: String,
    pub mode: String,
    pub question: String,
    pub answer: String,
}

impl HistoryEntry {
    /// Date as `dd/mm HH:MM`.
    pub fn short_date(&self) -> String {
        self.date.format("%d/%m %H:%M").to_string()
    }
}

/// First `max_chars` characters of `text`.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    conversations: Vec<HistoryEntry>,
}

/// Append-only conversation log backed by a JSON file.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    path: PathBuf,
    data: HistoryFile,
}

impl ConversationHistory {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: HistoryFile::default(),
        }
    }

    /// Load the log from `path`. A missing file is an empty log.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| HistoryError::Parse {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HistoryFile::default(),
            Err(e) => return Err(e.into()),
        };
        debug!(
            "Loaded {} history entries from {}",
            data.conversations.len(),
            path.display()
        );
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.data.conversations
    }

    pub fn is_empty(&self) -> bool {
        self.data.conversations.is_empty()
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        let all = &self.data.conversations;
        &all[all.len().saturating_sub(n)..]
    }

    /// Append an entry and save.
    ///
    /// The entry is kept in memory even when saving fails.
    pub fn record(
        &mut self,
        file: &str,
        mode: &str,
        question: &str,
        answer: &str,
    ) -> Result<(), HistoryError> {
        self.data.conversations.push(HistoryEntry {
            date: Local::now(),
            file: file.to_string(),
            mode: mode.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        });
        self.save()
    }

    fn save(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("conversation_history.json");
        let mut history = ConversationHistory::open(&path).unwrap();
        assert!(history.is_empty());

        history
            .record("report.pdf", MODE_AI, "Who wrote it?", "Jane Doe.")
            .unwrap();

        let reloaded = ConversationHistory::open(&path).unwrap();
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.entries()[0].file, "report.pdf");
        assert_eq!(reloaded.entries()[0].answer, "Jane Doe.");

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["conversations"][0]["mode"], MODE_AI);
    }

    #[test]
    fn test_recent_keeps_last_entries() {
        let temp = TempDir::new().unwrap();
        let mut history = ConversationHistory::empty(temp.path().join("h.json"));
        for i in 0..10 {
            history
                .record("a.txt", MODE_AI, &format!("q{}", i), "a")
                .unwrap();
        }
        let recent = history.recent(RECENT_ENTRIES);
        assert_eq!(recent.len(), 8);
        assert_eq!(recent[0].question, "q2");
        assert_eq!(recent[7].question, "q9");
        assert_eq!(history.recent(50).len(), 10);
    }

    #[test]
    fn test_save_failure_keeps_entry() {
        let temp = TempDir::new().unwrap();
        // A directory where the file should be makes the write fail
        let path = temp.path().join("history.json");
        fs::create_dir(&path).unwrap();
        let mut history = ConversationHistory::empty(&path);
        assert!(history.record("a.txt", MODE_AI, "q", "a").is_err());
        assert_eq!(history.entries().len(), 1);
    }

    #[test]
    fn test_preview() {
        let long = "é".repeat(100);
        assert_eq!(preview(&long, PREVIEW_CHARS).chars().count(), 80);
        assert_eq!(preview("short", PREVIEW_CHARS), "short");
    }

    #[test]
    fn test_short_date_format() {
        let entry = HistoryEntry {
            date: Local::now(),
            file: String::new(),
            mode: String::new(),
            question: String::new(),
            answer: String::new(),
        };
        let date = entry.short_date();
        assert_eq!(date.len(), 11);
        assert_eq!(&date[2..3], "/");
        assert_eq!(&date[5..6], " ");
    }
}
