//! Analysis Request Builder. Wraps extracted resume text in the fixed
//! instruction prompt and forwards it to the completion service.
//!
//! `analyze` never formats errors: it returns the trimmed completion text or
//! the `LlmError`. The warning string shown to users is produced by
//! [`AnalysisResult::display`] at the presentation boundary.

use std::sync::Arc;

use serde::Serialize;

use crate::extraction::ExtractedText;
use crate::llm_client::{CompletionService, GenerationParams, LlmError};

pub mod prompts;

use prompts::RESUME_ANALYSIS_PROMPT;

/// Prefix of every rendered completion failure.
pub const WARNING_MARKER: &str = "⚠️ Error: ";

/// Builds the analysis prompt for `text`.
pub fn build_prompt(text: &ExtractedText) -> String {
    RESUME_ANALYSIS_PROMPT.replace("{resume_text}", text.as_str())
}

#[derive(Clone)]
pub struct ResumeAnalyzer {
    completion: Arc<dyn CompletionService>,
    params: GenerationParams,
}

impl ResumeAnalyzer {
    pub fn new(completion: Arc<dyn CompletionService>, params: GenerationParams) -> Self {
        Self { completion, params }
    }

    /// One completion call, no retry. Returns the first choice's text trimmed.
    pub async fn analyze(&self, text: &ExtractedText) -> Result<String, LlmError> {
        let prompt = build_prompt(text);
        let response = self.completion.complete(&prompt, self.params).await?;
        let first = response.first_text().ok_or(LlmError::EmptyContent)?;
        Ok(first.trim().to_string())
    }
}

/// Outcome of an analysis request, as handed to the presentation layer.
#[derive(Debug)]
pub enum AnalysisResult {
    Completed(String),
    Failed(LlmError),
}

impl AnalysisResult {
    pub fn is_completed(&self) -> bool {
        matches!(self, AnalysisResult::Completed(_))
    }

    /// Display string: the analysis itself, or a single warning line
    /// describing the failure.
    pub fn display(&self) -> String {
        match self {
            AnalysisResult::Completed(text) => text.clone(),
            AnalysisResult::Failed(err) => {
                let description = err.to_string();
                let single_line = description.split_whitespace().collect::<Vec<_>>().join(" ");
                format!("{WARNING_MARKER}{single_line}")
            }
        }
    }
}

impl From<Result<String, LlmError>> for AnalysisResult {
    fn from(result: Result<String, LlmError>) -> Self {
        match result {
            Ok(text) => AnalysisResult::Completed(text),
            Err(err) => AnalysisResult::Failed(err),
        }
    }
}

/// JSON view of an analysis result.
#[derive(Debug, Serialize)]
pub struct AnalysisView {
    pub ok: bool,
    pub analysis: String,
}

impl From<&AnalysisResult> for AnalysisView {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            ok: result.is_completed(),
            analysis: result.display(),
        }
    }
}
