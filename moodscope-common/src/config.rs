//! Configuration management for moodscope services.
//!
//! Services share a configuration file at `~/.moodscope/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `MOODSCOPE_PORT` → network.port
//! - `MOODSCOPE_BIND_ADDRESS` → network.bind
//! - `MOODSCOPE_LOG_LEVEL` → observability.log_level
//! - `MOODSCOPE_LOG_FORMAT` → observability.log_format
//! - `TWITTER_BEARER_TOKEN` → twitter.bearer_token
//! - `HF_API_TOKEN` → classifiers.api_token
//! - `OPENAI_API_KEY` → summarizer.api_key

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".moodscope"),
        |dirs| dirs.home_dir().join(".moodscope"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Network Configuration
// ============================================================================

/// Listener configuration for the HTTP service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Bind address. Default "127.0.0.1" (local only).
    #[serde(default = "default_bind_address")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    5000
}

// ============================================================================
// Collaborator Configuration
// ============================================================================

/// X (Twitter) API v2 access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    #[serde(default = "default_twitter_base_url")]
    pub base_url: String,

    /// App-only bearer token.
    #[serde(default)]
    pub bearer_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            base_url: default_twitter_base_url(),
            bearer_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_twitter_base_url() -> String {
    "https://api.twitter.com".into()
}

/// Hosted text-classification inference endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_inference_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_token: Option<String>,

    /// Model scoring depression severity (Not depression / Moderate / Severe).
    #[serde(default = "default_severity_model")]
    pub severity_model: String,

    /// Model scoring emotional polarity (Positive / Neutral / Negative).
    #[serde(default = "default_sentiment_model")]
    pub sentiment_model: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_base_url(),
            api_token: None,
            severity_model: default_severity_model(),
            sentiment_model: default_sentiment_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_inference_base_url() -> String {
    "https://api-inference.huggingface.co".into()
}

fn default_severity_model() -> String {
    "rafalposwiata/deproberta-large-depression".into()
}

fn default_sentiment_model() -> String {
    "cardiffnlp/twitter-roberta-base-sentiment-latest".into()
}

/// Chat-completions endpoint used for narrative summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_summarizer_model")]
    pub model: String,

    #[serde(default = "default_summarizer_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            api_key: None,
            model: default_summarizer_model(),
            timeout_secs: default_summarizer_timeout_secs(),
        }
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".into()
}

fn default_summarizer_model() -> String {
    "gpt-4".into()
}

fn default_summarizer_timeout_secs() -> u64 {
    300
}

fn default_timeout_secs() -> u64 {
    30
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets pinned to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration for moodscope services.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub twitter: TwitterConfig,

    #[serde(default)]
    pub classifiers: ClassifierConfig,

    #[serde(default)]
    pub summarizer: SummarizerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| Error::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("MOODSCOPE_PORT") {
            if let Ok(p) = port.parse() {
                self.network.port = p;
            } else {
                tracing::warn!(value = %port, "Ignoring unparsable MOODSCOPE_PORT");
            }
        }
        if let Some(bind) = lookup("MOODSCOPE_BIND_ADDRESS") {
            self.network.bind = bind;
        }
        if let Some(level) = lookup("MOODSCOPE_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("MOODSCOPE_LOG_FORMAT") {
            self.observability.log_format = format;
        }

        // Credentials
        if let Some(token) = lookup("TWITTER_BEARER_TOKEN") {
            self.twitter.bearer_token = Some(token);
        }
        if let Some(token) = lookup("HF_API_TOKEN") {
            self.classifiers.api_token = Some(token);
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.summarizer.api_key = Some(key);
        }
    }

    /// Address string for the HTTP listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.network.bind, self.network.port)
    }

    /// Names of collaborator credentials that are not set.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.twitter.bearer_token) {
            missing.push("twitter.bearer_token");
        }
        if is_blank(&self.summarizer.api_key) {
            missing.push("summarizer.api_key");
        }
        missing
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
