//! ContextExtractor trait definition.

use theseus_types::context::{ExtractError, ExtractionReport, Upload};

/// Turns an uploaded artifact into usable model context.
///
/// Implementations live in `theseus-infra`. A failed extraction is a
/// warning to the user, not an abort: the chat turn proceeds with no
/// context attached.
pub trait ContextExtractor: Send + Sync {
    fn extract(
        &self,
        upload: Upload,
    ) -> impl std::future::Future<Output = Result<ExtractionReport, ExtractError>> + Send;
}
