use anyhow::{Context, Result};

use crate::llm_client::CompletionConfig;

const DEFAULT_BASE_URL: &str = "https://api.cerebras.ai/v1";
const DEFAULT_MODEL: &str = "llama-3.3-70b";
const DEFAULT_MAX_TOKENS: u32 = 1500;
const DEFAULT_TEMPERATURE: f32 = 0.4;
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub completion: CompletionConfig,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            completion: CompletionConfig {
                api_key: require_env("CEREBRAS_API_KEY")?,
                base_url: optional_env("COMPLETION_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: optional_env("COMPLETION_MODEL")
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens: parse_env("COMPLETION_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
                temperature: parse_env("COMPLETION_TEMPERATURE", DEFAULT_TEMPERATURE)?,
                timeout_secs: parse_env("COMPLETION_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            },
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid value, got '{raw}'")),
        None => Ok(default),
    }
}
