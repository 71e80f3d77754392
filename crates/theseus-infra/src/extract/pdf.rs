//! PDF context extraction: digital text layer first, OCR fallback.
//!
//! The text layer is read with `pdf-extract`. When the result is empty or
//! whitespace-only (a scanned document), pages are rendered to PNG with
//! `pdftoppm` and read with `tesseract`, one page at a time. A page that
//! fails to render or OCR is skipped and counted; the remaining pages
//! still contribute, in page order.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, warn};

use theseus_types::context::{ContextBlob, ExtractError, ExtractionDetail, ExtractionReport};

/// Render resolution for OCR page images, in DPI.
const OCR_RENDER_DPI: &str = "200";

/// Extract context from a PDF upload.
pub(crate) async fn extract_pdf(bytes: &[u8]) -> Result<ExtractionReport, ExtractError> {
    // A damaged text layer routes to OCR just like an empty one; only the
    // OCR fallback can fail extraction outright.
    let text = match text_layer(bytes.to_vec()).await {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "text-layer extraction failed, trying OCR");
            String::new()
        }
    };

    if !text.trim().is_empty() {
        let chars = text.chars().count();
        return Ok(ExtractionReport {
            blob: ContextBlob::Text(text),
            detail: ExtractionDetail::PdfTextLayer { chars },
        });
    }

    ocr_fallback(bytes).await
}

/// Digital text-layer pass. `pdf-extract` is synchronous CPU work, so it
/// runs on the blocking pool.
async fn text_layer(bytes: Vec<u8>) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|err| ExtractError::Pdf(err.to_string()))
    })
    .await
    .map_err(|err| ExtractError::Pdf(format!("extraction task failed: {err}")))?
}

/// Render every page to an image and OCR them in page order.
async fn ocr_fallback(bytes: &[u8]) -> Result<ExtractionReport, ExtractError> {
    let workdir = tempfile::tempdir()?;
    let pdf_path = workdir.path().join("upload.pdf");
    tokio::fs::write(&pdf_path, bytes).await?;

    let prefix = workdir.path().join("page");
    let render = Command::new("pdftoppm")
        .args(["-png", "-r", OCR_RENDER_DPI])
        .arg(&pdf_path)
        .arg(&prefix)
        .output()
        .await
        .map_err(|err| ExtractError::Ocr(format!("pdftoppm: {err}")))?;

    if !render.status.success() {
        let stderr = String::from_utf8_lossy(&render.stderr);
        return Err(ExtractError::Ocr(format!(
            "pdftoppm failed: {}",
            stderr.trim()
        )));
    }

    let pages = rendered_pages(workdir.path()).await?;
    if pages.is_empty() {
        return Err(ExtractError::Ocr("no pages rendered".to_string()));
    }

    let mut text = String::new();
    let mut pages_ocrd = 0usize;
    let mut pages_failed = 0usize;
    for page in &pages {
        match ocr_page(page).await {
            Ok(page_text) => {
                text.push_str(&page_text);
                pages_ocrd += 1;
            }
            Err(err) => {
                warn!(page = %page.display(), error = %err, "skipping page");
                pages_failed += 1;
            }
        }
    }

    if pages_ocrd == 0 {
        return Err(ExtractError::Ocr(format!(
            "all {} pages failed to OCR",
            pages.len()
        )));
    }

    debug!(pages_ocrd, pages_failed, "OCR fallback finished");
    Ok(ExtractionReport {
        detail: ExtractionDetail::PdfOcr {
            chars: text.chars().count(),
            pages_ocrd,
            pages_failed,
        },
        blob: ContextBlob::Text(text),
    })
}

/// Collect the rendered page images in page order.
///
/// `pdftoppm` zero-pads page numbers to the width of the last page, but a
/// numeric sort keeps this robust regardless of padding.
async fn rendered_pages(dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut pages = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("png") {
            pages.push(path);
        }
    }
    pages.sort_by_key(|p| page_number(p).unwrap_or(u32::MAX));
    Ok(pages)
}

/// Page number from a `pdftoppm` output name like `page-07.png`.
fn page_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    let digits = stem.rsplit('-').next()?;
    digits.parse().ok()
}

/// OCR one rendered page to text on stdout.
async fn ocr_page(image: &Path) -> Result<String, ExtractError> {
    let output = Command::new("tesseract")
        .arg(image)
        .arg("stdout")
        .output()
        .await
        .map_err(|err| ExtractError::Ocr(format!("tesseract: {err}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractError::Ocr(format!(
            "tesseract failed: {}",
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_parsing() {
        assert_eq!(page_number(Path::new("/tmp/x/page-1.png")), Some(1));
        assert_eq!(page_number(Path::new("/tmp/x/page-07.png")), Some(7));
        assert_eq!(page_number(Path::new("/tmp/x/page-12.png")), Some(12));
        assert_eq!(page_number(Path::new("/tmp/x/page-odd.png")), None);
    }

    #[test]
    fn test_page_ordering_is_numeric_not_lexicographic() {
        let mut pages = vec![
            PathBuf::from("/tmp/x/page-10.png"),
            PathBuf::from("/tmp/x/page-2.png"),
            PathBuf::from("/tmp/x/page-1.png"),
        ];
        pages.sort_by_key(|p| page_number(p).unwrap_or(u32::MAX));
        assert_eq!(
            pages,
            vec![
                PathBuf::from("/tmp/x/page-1.png"),
                PathBuf::from("/tmp/x/page-2.png"),
                PathBuf::from("/tmp/x/page-10.png"),
            ]
        );
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_extraction() {
        // Not a PDF: the text layer errors, and the OCR fallback cannot
        // render pages either.
        let result = extract_pdf(b"definitely not a pdf").await;
        assert!(result.is_err());
    }
}
