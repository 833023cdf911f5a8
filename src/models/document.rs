//! Loaded document model.
//!
//! A document is created once by the loader and never mutated afterwards.
//! Multi-page sources carry `--- Page N ---` marker lines in their raw text,
//! which is how page boundaries survive into analysis.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// Prefix of the marker line inserted before each page of a multi-page source.
pub const PAGE_MARKER_PREFIX: &str = "--- Page";

/// Build the marker line for a 1-based page number.
pub fn page_marker(page: u32) -> String {
    format!("{} {} ---", PAGE_MARKER_PREFIX, page)
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split raw text on page markers.
///
/// Returns `None` when the text has no marker. Each returned entry is the
/// page content following its marker line, with the page's lines joined by a
/// single space. Text before the first marker is not a page.
pub fn split_pages(raw: &str) -> Option<Vec<String>> {
    let mut parts = raw.split(PAGE_MARKER_PREFIX);
    // Leading text is never a page
    parts.next()?;

    let pages: Vec<String> = parts
        .map(|part| {
            let mut lines = part.split('\n');
            // The rest of the marker line (" 3 ---")
            lines.next();
            lines.collect::<Vec<_>>().join(" ")
        })
        .collect();

    if pages.is_empty() {
        None
    } else {
        Some(pages)
    }
}

/// Descriptive metadata reported by the source file. Every field may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub created: Option<String>,
    pub page_count: Option<u32>,
}

impl DocumentMetadata {
    /// Metadata for a plain text file: one page, titled by its file name.
    pub fn for_text_file(name: &str) -> Self {
        Self {
            title: Some(name.to_string()),
            author: None,
            created: None,
            page_count: Some(1),
        }
    }

    /// Label/value pairs for display, with "unknown" standing in for missing values.
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        fn or_unknown(value: &Option<String>) -> String {
            value.clone().unwrap_or_else(|| "unknown".to_string())
        }

        vec![
            (
                "pages",
                self.page_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            ),
            ("author", or_unknown(&self.author)),
            ("title", or_unknown(&self.title)),
            ("created", or_unknown(&self.created)),
        ]
    }
}

/// Whitespace-level counts over the normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BasicStats {
    pub words: usize,
    pub characters: usize,
    pub unique_words: usize,
}

/// A loaded document.
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    raw_text: String,
    text: String,
    pages: Option<Vec<String>>,
    metadata: DocumentMetadata,
}

impl Document {
    /// Create a document from its extracted text.
    pub fn new(source: impl Into<String>, raw_text: String, metadata: DocumentMetadata) -> Self {
        let text = normalize_whitespace(&raw_text);
        let pages = split_pages(&raw_text);
        Self {
            source: source.into(),
            raw_text,
            text,
            pages,
            metadata,
        }
    }

    /// Source identifier (the file name).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Text as extracted, including page markers and original whitespace.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Whitespace-collapsed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Page contents, present only when the source had page markers.
    pub fn pages(&self) -> Option<&[String]> {
        self.pages.as_deref()
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn basic_stats(&self) -> BasicStats {
        let words: Vec<&str> = self.text.split_whitespace().collect();
        let unique_words = words.iter().collect::<HashSet<_>>().len();
        BasicStats {
            words: words.len(),
            characters: self.text.chars().count(),
            unique_words,
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a\n\n b\t c  "), "a b c");
        assert_eq!(normalize_whitespace(" \n "), "");
    }

    #[test]
    fn test_split_pages_without_markers() {
        assert!(split_pages("just some text\nwith lines").is_none());
    }

    #[test]
    fn test_split_pages_skips_marker_line() {
        let raw = format!(
            "\n{}\nfirst line\nsecond line\n{}\nother page",
            page_marker(1),
            page_marker(2)
        );
        let pages = split_pages(&raw).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].trim(), "first line second line");
        assert_eq!(pages[1], "other page");
    }

    #[test]
    fn test_document_basic_stats() {
        let doc = Document::new(
            "a.txt",
            "the cat  and\nthe dog".to_string(),
            DocumentMetadata::for_text_file("a.txt"),
        );
        assert_eq!(doc.text(), "the cat and the dog");
        let stats = doc.basic_stats();
        assert_eq!(stats.words, 5);
        assert_eq!(stats.unique_words, 4);
        assert_eq!(stats.characters, 19);
        assert!(doc.pages().is_none());
    }

    #[test]
    fn test_metadata_display_rows_use_unknown() {
        let meta = DocumentMetadata::default();
        let rows = meta.display_rows();
        assert!(rows.iter().all(|(_, v)| v == "unknown"));

        let meta = DocumentMetadata::for_text_file("notes.txt");
        let rows = meta.display_rows();
        assert!(rows.contains(&("title", "notes.txt".to_string())));
        assert!(rows.contains(&("pages", "1".to_string())));
    }
}
