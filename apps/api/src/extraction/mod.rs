//! Document Extractor: turns an uploaded resume (PDF or DOCX) into plain text.
//!
//! The declared kind comes from the filename extension only; there is no
//! content sniffing. A payload that does not parse as its declared kind is a
//! `CorruptDocument`, never a best-effort misparse.
//!
//! Empty units are handled differently per format: PDF pages without
//! extractable text are dropped, DOCX blank paragraphs are kept so the
//! original vertical spacing survives.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

mod docx;
mod pdf;

#[cfg(test)]
pub(crate) mod fixtures;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported document format: '{0}' (expected .pdf or .docx)")]
    UnsupportedFormat(String),

    #[error("Could not read {kind} document: {reason}")]
    CorruptDocument { kind: DocumentKind, reason: String },
}

impl ExtractionError {
    fn corrupt(kind: DocumentKind, reason: impl fmt::Display) -> Self {
        ExtractionError::CorruptDocument {
            kind,
            reason: reason.to_string(),
        }
    }
}

/// Declared kind of an uploaded document, derived from its filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    /// Anything else. Carries the lowercased extension (empty if none).
    Unsupported(String),
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Self {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            _ => DocumentKind::Unsupported(extension),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => f.write_str("PDF"),
            DocumentKind::Docx => f.write_str("DOCX"),
            DocumentKind::Unsupported(ext) if ext.is_empty() => f.write_str("(no extension)"),
            DocumentKind::Unsupported(ext) => write!(f, ".{ext}"),
        }
    }
}

/// An uploaded file as received. Immutable; consumed once by [`extract`].
#[derive(Debug, Clone)]
pub struct SourceDocument {
    filename: String,
    kind: DocumentKind,
    payload: Bytes,
}

impl SourceDocument {
    pub fn new(filename: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        let filename = filename.into();
        let kind = DocumentKind::from_filename(&filename);
        Self {
            filename,
            kind,
            payload: payload.into(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn kind(&self) -> &DocumentKind {
        &self.kind
    }

    pub fn size_bytes(&self) -> usize {
        self.payload.len()
    }
}

/// Text extracted from a document: segments in source order, joined by `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractedText {
    text: String,
    #[serde(skip)]
    segments: usize,
}

impl ExtractedText {
    /// Joins segments with newlines, exactly as given. Callers decide which
    /// segments to drop before handing them over.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        let mut count = 0;
        for segment in segments {
            if count > 0 {
                text.push('\n');
            }
            text.push_str(segment.as_ref());
            count += 1;
        }
        Self {
            text,
            segments: count,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn segment_count(&self) -> usize {
        self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Wraps text that was extracted elsewhere (e.g. submitted by a client).
impl From<String> for ExtractedText {
    fn from(text: String) -> Self {
        let segments = if text.is_empty() {
            0
        } else {
            text.split('\n').count()
        };
        Self { text, segments }
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Extracts the text of `document` according to its declared kind.
pub fn extract(document: SourceDocument) -> Result<ExtractedText, ExtractionError> {
    let SourceDocument {
        filename,
        kind,
        payload,
    } = document;

    let text = match kind {
        DocumentKind::Pdf => pdf::extract_pdf(&payload)?,
        DocumentKind::Docx => docx::extract_docx(&payload)?,
        DocumentKind::Unsupported(ext) => return Err(ExtractionError::UnsupportedFormat(ext)),
    };

    debug!(
        "Extracted {} segments ({} chars) from '{}'",
        text.segment_count(),
        text.as_str().chars().count(),
        filename
    );

    Ok(text)
}
