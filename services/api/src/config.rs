//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// The fixed name of the durable history slot.
pub const HISTORY_SLOT: &str = "phishguard_history";

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Key for the analysis endpoint; required by the `api` binary.
    pub analysis_api_key: Option<String>,
    /// Base URL of an OpenAI-compatible chat-completions endpoint.
    pub analysis_api_base: String,
    pub analysis_model: String,
    pub history_dir: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Analysis Service Settings ---
        // Gemini is the default backend; an OpenAI key works with a matching base URL.
        let analysis_api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        let analysis_api_base =
            std::env::var("ANALYSIS_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let analysis_model =
            std::env::var("ANALYSIS_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        // --- Storage Settings ---
        let history_dir = std::env::var("HISTORY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        Ok(Self {
            bind_address,
            log_level,
            analysis_api_key,
            analysis_api_base,
            analysis_model,
            history_dir,
        })
    }

    /// The file holding the serialized history list.
    pub fn history_path(&self) -> PathBuf {
        self.history_dir.join(format!("{}.json", HISTORY_SLOT))
    }

    /// Returns the analysis key or the error naming the variables to set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.analysis_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("GEMINI_API_KEY or OPENAI_API_KEY".to_string()))
    }
}
