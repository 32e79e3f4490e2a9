use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a numeric variable cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server-side fallback key. Requests may carry their own key instead.
    pub anthropic_api_key: Option<String>,
    /// Model for extraction, classification and translation.
    pub extraction_model: String,
    /// Model for menu generation.
    pub menu_model: String,
    /// Transport attempts per model call. 1 disables backoff retries.
    pub llm_max_attempts: u32,
    pub llm_timeout_secs: u64,
    pub diet_catalog_path: Option<PathBuf>,
    pub menu_country: String,
    pub menu_currency: String,
    /// TrueType font used for PDF export. Builtin Helvetica when unset.
    pub export_font_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            extraction_model: env_or("EXTRACTION_MODEL", "claude-haiku-4-5"),
            menu_model: env_or("MENU_MODEL", "claude-sonnet-4-5"),
            llm_max_attempts: env_or("LLM_MAX_ATTEMPTS", "1")
                .parse::<u32>()
                .context("LLM_MAX_ATTEMPTS must be a positive integer")?
                .max(1),
            llm_timeout_secs: env_or("LLM_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a number of seconds")?,
            diet_catalog_path: optional_env("DIET_CATALOG_PATH").map(PathBuf::from),
            menu_country: env_or("MENU_COUNTRY", "Ukraine"),
            menu_currency: env_or("MENU_CURRENCY", "UAH"),
            export_font_path: optional_env("EXPORT_FONT_PATH").map(PathBuf::from),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
