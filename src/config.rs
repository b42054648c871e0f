//! Application configuration.
//!
//! Runtime settings are resolved with priority config.toml > .env/environment
//! > default. Tunable constants live here as well so the rest of the crate
//! never hardcodes them.

use serde::Deserialize;
use std::path::PathBuf;

use crate::paths;

// ==================== File Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server: Option<ServerSection>,
    database: Option<DatabaseSection>,
    llm: Option<LlmSection>,
    learner: Option<LearnerSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmSection {
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LearnerSection {
    explanation_language: Option<String>,
}

/// Resolved settings used by `main` to wire the application.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server_addr: String,
    pub server_port: u16,
    pub database_path: PathBuf,
    pub llm: LlmSettings,
    pub explanation_language: String,
}

#[derive(Clone)]
pub struct LlmSettings {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Settings {
    /// Load settings from `config.toml` in the working directory, falling back
    /// to environment variables (after loading `.env`) and then defaults.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        let file = match std::fs::read_to_string("config.toml") {
            Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring unparsable config.toml: {}", e);
                    FileConfig::default()
                }
            },
            Err(_) => FileConfig::default(),
        };

        Self::resolve(file, |key| std::env::var(key).ok())
    }

    fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let server = file.server.unwrap_or_default();
        let database = file.database.unwrap_or_default();
        let llm = file.llm.unwrap_or_default();
        let learner = file.learner.unwrap_or_default();

        let server_addr = server
            .addr
            .or_else(|| env("SERVER_ADDR"))
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());

        let server_port = server
            .port
            .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
            .unwrap_or(DEFAULT_SERVER_PORT);

        let database_path = match database.path {
            Some(path) => {
                tracing::info!("Using database from config.toml: {}", path);
                PathBuf::from(path)
            }
            None => match env("DATABASE_PATH") {
                Some(path) => {
                    tracing::info!("Using database from DATABASE_PATH env: {}", path);
                    PathBuf::from(path)
                }
                None => PathBuf::from(paths::db_path()),
            },
        };

        let llm = LlmSettings {
            model: llm
                .model
                .or_else(|| env("GEMINI_MODEL"))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: llm
                .api_key
                .or_else(|| env("GEMINI_API_KEY"))
                .filter(|k| !k.trim().is_empty()),
            base_url: llm
                .base_url
                .or_else(|| env("GEMINI_BASE_URL"))
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
        };

        let explanation_language = learner
            .explanation_language
            .or_else(|| env("EXPLANATION_LANGUAGE"))
            .unwrap_or_else(|| DEFAULT_EXPLANATION_LANGUAGE.to_string());

        Self {
            server_addr,
            server_port,
            database_path,
            llm,
            explanation_language,
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}

// ==================== Server Configuration ====================

pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0";

pub const DEFAULT_SERVER_PORT: u16 = 3000;

// ==================== LLM Configuration ====================

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Language used for explanations, goals and critiques. Exercise content
/// itself is always English.
pub const DEFAULT_EXPLANATION_LANGUAGE: &str = "Brazilian Portuguese";

// ==================== Progression ====================

pub const MIN_LEVEL: u8 = 1;

/// Highest reachable level; experience stops accumulating here.
pub const MAX_LEVEL: u8 = 50;

/// Experience needed to advance one level.
pub const EXPERIENCE_PER_LEVEL: u32 = 100;

/// Experience gained per score point.
pub const XP_MULTIPLIER: f64 = 1.5;

/// Last level of the Beginner tier.
pub const BEGINNER_MAX_LEVEL: u8 = 20;

/// Last level of the Intermediate tier.
pub const INTERMEDIATE_MAX_LEVEL: u8 = 40;

// ==================== Exercises ====================

/// Number of comprehension questions requested per reading exercise.
pub const READING_QUESTION_COUNT: usize = 3;

/// Drafts shorter than this (in characters, ignoring surrounding whitespace)
/// cannot be submitted for grading.
pub const MIN_DRAFT_CHARS: usize = 10;

/// Seconds a submitted reading exercise stays on screen before it finishes.
pub const REVIEW_DELAY_SECS: u64 = 3;

/// Seconds between automatic refreshes of pages waiting on the LLM.
pub const PENDING_REFRESH_SECS: u64 = 2;

// ==================== Storage & UI ====================

/// Key under which the progress record is stored.
pub const PROGRESS_KEY: &str = "learner_progress";

/// Seconds a notification stays visible unless dismissed.
pub const NOTICE_TTL_SECS: i64 = 6;

/// Number of history entries shown on the dashboard.
pub const HISTORY_DISPLAY_LIMIT: usize = 10;
