use crate::analysis::ResumeAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything in here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Analysis Request Builder wired to the configured completion service.
    pub analyzer: ResumeAnalyzer,
    pub config: Config,
}
