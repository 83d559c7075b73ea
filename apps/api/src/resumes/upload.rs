use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
};
use tracing::debug;

use crate::errors::AppError;
use crate::extraction::{extract, DocumentKind, ExtractedText, ExtractionError, SourceDocument};

/// Name of the multipart field carrying the resume.
pub const FILE_FIELD: &str = "file";

/// Reads the `file` field of a multipart upload into a `SourceDocument`.
///
/// Files whose extension is not `.pdf` or `.docx` are rejected here, before
/// their bytes are read, so they never reach the extractor. Bodies larger
/// than `max_bytes` fail with `PayloadTooLarge`.
pub async fn read_resume_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<SourceDocument, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;

        if let DocumentKind::Unsupported(ext) = DocumentKind::from_filename(&filename) {
            return Err(ExtractionError::UnsupportedFormat(ext).into());
        }

        let payload = field.bytes().await.map_err(|e| upload_error(e, max_bytes))?;
        return Ok(SourceDocument::new(filename, payload));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

// The body limit surfaces as an opaque stream error; name the limit instead.
fn upload_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(max_bytes)
    } else {
        AppError::Upload(err)
    }
}

/// Runs the (blocking) document parse off the async runtime.
pub async fn extract_upload(document: SourceDocument) -> Result<ExtractedText, AppError> {
    let text = tokio::task::spawn_blocking(move || extract(document))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;
    Ok(text)
}
