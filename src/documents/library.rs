//! The inputs directory: listing and loading documents by name.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::pdf::PdfExtractor;
use super::LoadError;
use crate::models::{Document, DocumentMetadata};

/// Supported document formats, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Detect from a file name's extension, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

/// A listed document file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub kind: DocumentKind,
}

impl FileEntry {
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// Documents available in an inputs directory.
#[derive(Debug, Clone)]
pub struct DocumentLibrary {
    inputs_dir: PathBuf,
    pdf: PdfExtractor,
}

impl DocumentLibrary {
    pub fn new(inputs_dir: impl Into<PathBuf>) -> Self {
        Self {
            inputs_dir: inputs_dir.into(),
            pdf: PdfExtractor::new(),
        }
    }

    pub fn inputs_dir(&self) -> &Path {
        &self.inputs_dir
    }

    /// List `.pdf` and `.txt` files sorted by name, creating the directory if needed.
    pub fn list(&self) -> Result<Vec<FileEntry>, LoadError> {
        if !self.inputs_dir.exists() {
            fs::create_dir_all(&self.inputs_dir)?;
            info!("Created inputs directory {}", self.inputs_dir.display());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.inputs_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let Some(kind) = DocumentKind::from_name(&name) else {
                continue;
            };
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            entries.push(FileEntry {
                name,
                path: entry.path(),
                size_bytes: meta.len(),
                kind,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            "Found {} documents in {}",
            entries.len(),
            self.inputs_dir.display()
        );
        Ok(entries)
    }

    /// Load a document by file name from the inputs directory.
    pub fn load(&self, name: &str) -> Result<Document, LoadError> {
        self.load_path(&self.inputs_dir.join(name))
    }

    /// Load a document from any path.
    pub fn load_path(&self, path: &Path) -> Result<Document, LoadError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let kind =
            DocumentKind::from_name(&name).ok_or_else(|| LoadError::UnsupportedFormat(name.clone()))?;
        if !path.is_file() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let (raw_text, metadata) = match kind {
            DocumentKind::Text => {
                let bytes = fs::read(path)?;
                let text = String::from_utf8(bytes).map_err(|e| LoadError::Unreadable {
                    path: path.to_path_buf(),
                    reason: format!("not valid UTF-8 ({})", e.utf8_error()),
                })?;
                (text, DocumentMetadata::for_text_file(&name))
            }
            DocumentKind::Pdf => self.pdf.extract(path)?,
        };

        info!("Loaded {} ({} chars)", name, raw_text.len());
        Ok(Document::new(name, raw_text, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(DocumentKind::from_name("a.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_name("notes.Txt"), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_name("image.png"), None);
        assert_eq!(DocumentKind::from_name("README"), None);
    }

    #[test]
    fn test_list_creates_missing_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("inputs");
        let library = DocumentLibrary::new(&dir);
        assert!(library.list().unwrap().is_empty());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "x".repeat(2048)).unwrap();
        fs::write(temp.path().join("A.PDF"), "%PDF").unwrap();
        fs::write(temp.path().join("c.docx"), "ignored").unwrap();
        fs::create_dir(temp.path().join("dir.txt")).unwrap();

        let entries = DocumentLibrary::new(temp.path()).list().unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A.PDF", "b.txt"]);
        assert_eq!(entries[1].size_kb(), 2.0);
        assert_eq!(entries[0].kind, DocumentKind::Pdf);
    }

    #[test]
    fn test_load_text_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("notes.txt"),
            "O gato correu.\n\n  O cão correu mais rápido!\n",
        )
        .unwrap();

        let doc = DocumentLibrary::new(temp.path()).load("notes.txt").unwrap();
        assert_eq!(doc.source(), "notes.txt");
        assert_eq!(doc.text(), "O gato correu. O cão correu mais rápido!");
        assert_eq!(doc.metadata().title.as_deref(), Some("notes.txt"));
        assert_eq!(doc.metadata().page_count, Some(1));
        assert!(doc.pages().is_none());
    }

    #[test]
    fn test_load_errors() {
        let temp = TempDir::new().unwrap();
        let library = DocumentLibrary::new(temp.path());

        assert!(matches!(library.load("missing.txt"), Err(LoadError::NotFound(_))));
        assert!(matches!(
            library.load("slides.pptx"),
            Err(LoadError::UnsupportedFormat(_))
        ));

        fs::write(temp.path().join("bad.txt"), [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            library.load("bad.txt"),
            Err(LoadError::Unreadable { .. })
        ));
    }
}
