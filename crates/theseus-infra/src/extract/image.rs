//! Image context extraction.
//!
//! Images are decoded only to validate the upload and report dimensions;
//! the original encoded bytes are what travels to the vision model, so no
//! re-encoding loss is possible.

use theseus_types::context::{ContextBlob, ExtractError, ExtractionDetail, ExtractionReport};

pub(crate) fn extract_image(bytes: Vec<u8>) -> Result<ExtractionReport, ExtractError> {
    let format = image::guess_format(&bytes)
        .map(|f| format!("{f:?}").to_lowercase())
        .map_err(|err| ExtractError::Image(err.to_string()))?;

    let decoded =
        image::load_from_memory(&bytes).map_err(|err| ExtractError::Image(err.to_string()))?;

    Ok(ExtractionReport {
        detail: ExtractionDetail::Image {
            width: decoded.width(),
            height: decoded.height(),
            format,
        },
        blob: ContextBlob::Image(bytes),
    })
}
