//! Context extraction from uploaded PDFs and images.

pub(crate) mod image;
pub(crate) mod pdf;

use theseus_core::context::extractor::ContextExtractor;
use theseus_types::context::{ExtractError, ExtractionReport, Upload, UploadKind};

/// Extractor dispatching on the upload's declared media kind.
pub struct MediaExtractor {
    max_upload_bytes: usize,
}

impl MediaExtractor {
    /// Create an extractor with a defensive upload size bound.
    pub fn new(max_upload_bytes: usize) -> Self {
        Self { max_upload_bytes }
    }
}

impl ContextExtractor for MediaExtractor {
    async fn extract(&self, upload: Upload) -> Result<ExtractionReport, ExtractError> {
        if upload.bytes.len() > self.max_upload_bytes {
            return Err(ExtractError::TooLarge {
                size: upload.bytes.len(),
                limit: self.max_upload_bytes,
            });
        }

        match upload.kind {
            UploadKind::Pdf => pdf::extract_pdf(&upload.bytes).await,
            UploadKind::Image => image::extract_image(upload.bytes),
        }
    }
}
