//! Document discovery and loading.
//!
//! Documents live in a single inputs directory. Plain text files are read as
//! UTF-8; PDFs are extracted page by page with Poppler's `pdftotext`, and their
//! metadata comes from `pdfinfo`.

mod library;
mod pdf;

use std::path::PathBuf;

use thiserror::Error;

pub use library::{DocumentKind, DocumentLibrary, FileEntry};
pub use pdf::{check_tools, parse_pdfinfo, PdfExtractor};

/// Errors that can occur while listing or loading documents.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file type: {0} (expected .pdf or .txt)")]
    UnsupportedFormat(String),

    #[error("Could not read {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
