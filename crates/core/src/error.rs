//! Error types for the polyforge mutation engine.

use thiserror::Error;

/// Primary error type for document mutation.
///
/// Every variant is fatal for the document being processed. Nothing is
/// retried internally and no partial output is returned.
#[derive(Error, Debug)]
pub enum PolyError {
    #[error("unbalanced or truncated dictionary starting at offset {offset}")]
    StructuralScan { offset: usize },

    #[error("no page object found in document")]
    PageNotFound,

    #[error("page object {objid} has neither /Resources nor /Contents")]
    UnrecognizedPageShape { objid: u32 },

    #[error("/Resources of page object {objid} is neither a dictionary nor a reference")]
    UnrecognizedResourcesShape { objid: u32 },

    #[error("malformed /Font dictionary")]
    MalformedFontDictionary,

    #[error("unrecognized /Contents value on page object {objid}")]
    UnrecognizedContentsShape { objid: u32 },

    #[error("neither an xref table nor a startxref marker found")]
    NoIndexAnchor,

    #[error("no /Root reference found in document")]
    MissingRoot,

    #[error("PDF object not found: {0}")]
    ObjectNotFound(u32),

    #[error("payload cannot be written as a string literal: {0}")]
    InvalidPayload(String),
}

/// Convenience Result type alias for PolyError.
pub type Result<T> = std::result::Result<T, PolyError>;
