//! Data models for doclens.

mod document;
mod export;

pub use document::{
    normalize_whitespace, page_marker, split_pages, BasicStats, Document, DocumentMetadata,
    PAGE_MARKER_PREFIX,
};
pub use export::{AnalysisExport, ExportStatistics};
