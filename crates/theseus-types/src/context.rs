//! Upload and extracted-context types for Theseus.
//!
//! An upload is a PDF or image handed to the context extractor; the result
//! is a [`ContextBlob`] scoped to the current interaction. Blobs are never
//! persisted and are not part of a session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared media kind of an uploaded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Pdf,
    Image,
}

impl UploadKind {
    /// Infer the kind from a filename extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(UploadKind::Pdf),
            "jpg" | "jpeg" | "png" => Some(UploadKind::Image),
            _ => None,
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadKind::Pdf => write!(f, "pdf"),
            UploadKind::Image => write!(f, "image"),
        }
    }
}

/// An uploaded artifact with its declared kind and raw bytes.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub kind: UploadKind,
    pub bytes: Vec<u8>,
}

/// Extracted context for one interaction.
///
/// `Text` carries a PDF's text layer (or OCR output); `Image` retains the
/// original encoded bytes for submission to a vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextBlob {
    Text(String),
    Image(Vec<u8>),
}

impl ContextBlob {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContextBlob::Text(t) => Some(t),
            ContextBlob::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&[u8]> {
        match self {
            ContextBlob::Text(_) => None,
            ContextBlob::Image(bytes) => Some(bytes),
        }
    }
}

/// How the context was obtained, for display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionDetail {
    /// The PDF had a usable digital text layer.
    PdfTextLayer { chars: usize },
    /// The text layer was empty; pages were rendered and OCR'd.
    /// `pages_failed` counts pages skipped due to render/OCR failures.
    PdfOcr {
        chars: usize,
        pages_ocrd: usize,
        pages_failed: usize,
    },
    /// A decoded image; original bytes retained.
    Image {
        width: u32,
        height: u32,
        format: String,
    },
}

impl fmt::Display for ExtractionDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionDetail::PdfTextLayer { chars } => {
                write!(f, "extracted {chars} chars from text layer")
            }
            ExtractionDetail::PdfOcr {
                chars,
                pages_ocrd,
                pages_failed,
            } => {
                write!(f, "OCR extracted {chars} chars from {pages_ocrd} pages")?;
                if *pages_failed > 0 {
                    write!(f, " ({pages_failed} pages skipped)")?;
                }
                Ok(())
            }
            ExtractionDetail::Image {
                width,
                height,
                format,
            } => write!(f, "{format} image, {width}x{height}"),
        }
    }
}

/// Result of extracting context from an upload.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub blob: ContextBlob,
    pub detail: ExtractionDetail,
}

impl ExtractionReport {
    /// Whether OCR had to be engaged (worth a warning in the UI).
    pub fn used_ocr(&self) -> bool {
        matches!(self.detail, ExtractionDetail::PdfOcr { .. })
    }
}

/// Errors from context extraction. The chat turn proceeds without context
/// when extraction fails; these are warnings, not aborts.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("upload exceeds size limit ({size} bytes > {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    #[error("unreadable pdf: {0}")]
    Pdf(String),

    #[error("unreadable image: {0}")]
    Image(String),

    #[error("ocr failed: {0}")]
    Ocr(String),

    #[error("io error during extraction: {0}")]
    Io(#[from] std::io::Error),
}
