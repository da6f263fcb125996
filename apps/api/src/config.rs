use anyhow::{bail, Context, Result};

use crate::interview::store::DEFAULT_IDLE_TTL_SECS;
use crate::normalize::ResumeRendering;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_JSEARCH_BASE_URL: &str = "https://jsearch.p.rapidapi.com";

/// Application configuration loaded from environment variables.
/// Startup fails if either API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub jsearch_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub jsearch_base_url: String,
    pub resume_rendering: ResumeRendering,
    pub pdftoppm_bin: String,
    pub ffmpeg_bin: String,
    pub port: u16,
    pub rust_log: String,
    /// Mock-interview sessions idle longer than this are dropped.
    pub interview_idle_ttl_secs: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => bail!("Required environment variable '{key}' is not set"),
            }
        };
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            google_api_key: require("GOOGLE_API_KEY")?,
            jsearch_api_key: require("JSEARCH_API_KEY")?,
            gemini_model: or_default("GEMINI_MODEL", crate::llm_client::DEFAULT_MODEL),
            gemini_base_url: or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            jsearch_base_url: or_default("JSEARCH_BASE_URL", DEFAULT_JSEARCH_BASE_URL),
            resume_rendering: or_default("RESUME_RENDERING", "image")
                .parse::<ResumeRendering>()
                .map_err(anyhow::Error::msg)
                .context("RESUME_RENDERING must be 'image' or 'text'")?,
            pdftoppm_bin: or_default("PDFTOPPM_BIN", "pdftoppm"),
            ffmpeg_bin: or_default("FFMPEG_BIN", "ffmpeg"),
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
            interview_idle_ttl_secs: match lookup("INTERVIEW_IDLE_TTL_SECS") {
                Some(value) => value
                    .trim()
                    .parse::<u32>()
                    .context("INTERVIEW_IDLE_TTL_SECS must be a number of seconds")?,
                None => DEFAULT_IDLE_TTL_SECS,
            },
        })
    }
}
