//! PDF text and metadata extraction via Poppler command-line tools.

use std::path::Path;
use std::process::{Command, Output};

use tracing::debug;

use super::LoadError;
use crate::models::{page_marker, DocumentMetadata};

const PDFTOTEXT: &str = "pdftotext (install poppler-utils)";
const PDFINFO: &str = "pdfinfo (install poppler-utils)";

/// Map a finished command to its stdout, or to the matching load error.
fn handle_cmd_output(
    result: std::io::Result<Output>,
    tool_name: &str,
    path: &Path,
    error_prefix: &str,
) -> Result<String, LoadError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(LoadError::Unreadable {
                    path: path.to_path_buf(),
                    reason: format!("{}: {}", error_prefix, stderr.trim()),
                })
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(LoadError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(LoadError::Io(e)),
    }
}

/// Parse `pdfinfo` output into metadata. Empty values count as unknown.
pub fn parse_pdfinfo(output: &str) -> DocumentMetadata {
    let mut metadata = DocumentMetadata::default();
    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.trim() {
            "Title" => metadata.title = Some(value.to_string()),
            "Author" => metadata.author = Some(value.to_string()),
            "CreationDate" => metadata.created = Some(value.to_string()),
            "Pages" => metadata.page_count = value.parse().ok(),
            _ => {}
        }
    }
    metadata
}

/// Availability of the external tools PDF loading depends on.
pub fn check_tools() -> Vec<(String, bool)> {
    ["pdftotext", "pdfinfo"]
        .iter()
        .map(|tool| (tool.to_string(), which::which(tool).is_ok()))
        .collect()
}

/// Extracts page-marked text and metadata from PDF files.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Read metadata with `pdfinfo`. The title falls back to the file name.
    pub fn metadata(&self, path: &Path) -> Result<DocumentMetadata, LoadError> {
        let output = Command::new("pdfinfo").arg(path).output();
        let info = handle_cmd_output(output, PDFINFO, path, "pdfinfo failed")?;
        let mut metadata = parse_pdfinfo(&info);
        if metadata.title.is_none() {
            metadata.title = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string());
        }
        Ok(metadata)
    }

    /// Extract a single 1-based page.
    pub fn page_text(&self, path: &Path, page: u32) -> Result<String, LoadError> {
        let page_str = page.to_string();
        let output = Command::new("pdftotext")
            .args(["-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
            .arg(path)
            .arg("-")
            .output();

        handle_cmd_output(
            output,
            PDFTOTEXT,
            path,
            &format!("pdftotext failed on page {}", page),
        )
    }

    /// Extract every page, each preceded by its `--- Page N ---` marker line.
    ///
    /// Pages with no extractable text get no marker.
    pub fn extract(&self, path: &Path) -> Result<(String, DocumentMetadata), LoadError> {
        let metadata = self.metadata(path)?;
        let page_count = metadata.page_count.unwrap_or(1);

        let mut raw = String::new();
        for page in 1..=page_count {
            let text = self.page_text(path, page)?;
            if text.trim().is_empty() {
                debug!("Page {} of {} has no text", page, path.display());
                continue;
            }
            raw.push('\n');
            raw.push_str(&page_marker(page));
            raw.push('\n');
            raw.push_str(&text);
        }

        debug!(
            "Extracted {} chars from {} ({} pages)",
            raw.len(),
            path.display(),
            page_count
        );
        Ok((raw, metadata))
    }
}
