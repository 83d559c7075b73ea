use std::panic;

use super::{DocumentKind, ExtractedText, ExtractionError};

/// One segment per page, in page order. Pages with no extractable text
/// (scanned images, blank pages) are skipped.
pub(super) fn extract_pdf(payload: &[u8]) -> Result<ExtractedText, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(payload))
        .map_err(|_| ExtractionError::corrupt(DocumentKind::Pdf, "PDF parser aborted"))?
        .map_err(|e| ExtractionError::corrupt(DocumentKind::Pdf, e))?;

    let segments = pages
        .iter()
        .filter_map(|raw| page_segment(raw))
        .map(str::to_string)
        .collect::<Vec<_>>();

    Ok(ExtractedText::from_segments(segments))
}

/// The parser opens each page with blank lines and may close it with more;
/// those breaks are not part of the page's text. Whitespace-only pages count
/// as empty.
fn page_segment(raw: &str) -> Option<&str> {
    let segment = raw.trim_matches(['\r', '\n']);
    if segment.trim().is_empty() {
        None
    } else {
        Some(segment)
    }
}
