//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::{AnalysisResult, AnalysisView};
use crate::errors::AppError;
use crate::extraction::{DocumentKind, ExtractedText};
use crate::resumes::upload::{extract_upload, read_resume_upload};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub upload_id: Uuid,
    pub filename: String,
    pub kind: DocumentKind,
    pub text: ExtractedText,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeUploadResponse {
    pub upload_id: Uuid,
    pub filename: String,
    pub kind: DocumentKind,
    #[serde(flatten)]
    pub analysis: AnalysisView,
    pub resume_text: ExtractedText,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let upload_id = Uuid::new_v4();

    async move {
        let document = read_resume_upload(multipart, state.config.max_upload_bytes).await?;
        let filename = document.filename().to_string();
        let kind = document.kind().clone();
        info!("Received {kind} '{filename}' ({} bytes)", document.size_bytes());

        let text = extract_upload(document).await?;
        if text.is_empty() {
            warn!("No extractable text in '{filename}'");
        }

        Ok::<_, AppError>(Json(ExtractResponse {
            upload_id,
            filename,
            kind,
            text,
        }))
    }
    .instrument(info_span!("resume_extract", %upload_id))
    .await
}

/// POST /api/v1/resumes/analyze
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeUploadResponse>, AppError> {
    let upload_id = Uuid::new_v4();

    async move {
        let document = read_resume_upload(multipart, state.config.max_upload_bytes).await?;
        let filename = document.filename().to_string();
        let kind = document.kind().clone();
        info!("Received {kind} '{filename}' ({} bytes)", document.size_bytes());

        let resume_text = extract_upload(document).await?;
        if resume_text.is_empty() {
            warn!("No extractable text in '{filename}'; analyzing empty resume");
        }
        let result = run_analysis(&state, &resume_text).await;

        Ok::<_, AppError>(Json(AnalyzeUploadResponse {
            upload_id,
            filename,
            kind,
            analysis: AnalysisView::from(&result),
            resume_text,
        }))
    }
    .instrument(info_span!("resume_analyze", %upload_id))
    .await
}

/// POST /api/v1/analysis
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisView>, AppError> {
    let text = ExtractedText::from(req.resume_text);
    let result = run_analysis(&state, &text).await;
    Ok(Json(AnalysisView::from(&result)))
}

async fn run_analysis(state: &AppState, text: &ExtractedText) -> AnalysisResult {
    let result = AnalysisResult::from(state.analyzer.analyze(text).await);
    match &result {
        AnalysisResult::Completed(analysis) => {
            info!("Analysis completed ({} chars)", analysis.chars().count())
        }
        AnalysisResult::Failed(e) => warn!("Completion service failed: {e}"),
    }
    result
}
