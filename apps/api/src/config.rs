use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only the LLM credential is required; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub database_path: String,
    pub port: u16,
    pub rust_log: String,
    /// Minimum accepted answer length, in bytes of raw text.
    pub min_answer_length: usize,
    /// Upper bound on questions per interview; longer LLM output is truncated.
    pub max_questions: usize,
    /// Advisory per-question time limit. Reported to the client, not enforced.
    pub question_time_limit_secs: u64,
    pub passing_score: f64,
    pub enable_voice: bool,
    pub enable_analytics: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "interview_training.db".to_string()),
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            min_answer_length: env_or("MIN_ANSWER_LENGTH", 50)?,
            max_questions: env_or("MAX_QUESTIONS", 10)?,
            question_time_limit_secs: env_or("QUESTION_TIME_LIMIT_SECS", 300)?,
            passing_score: env_or("PASSING_SCORE", 70.0)?,
            enable_voice: env_flag("ENABLE_VOICE", false)?,
            enable_analytics: env_flag("ENABLE_ANALYTICS", true)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}

fn env_flag(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => anyhow::bail!("Environment variable '{key}' must be a boolean, got '{raw}'"),
        },
        Err(_) => Ok(default),
    }
}
