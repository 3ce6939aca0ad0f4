//! Configuration management for emotiond.
//!
//! Loads settings from /etc/emotion-lens/config.toml or uses defaults.
//! The gateway credential never lives in the file: it is read once from the
//! environment variable named by `gateway.api_key_env` and carried in
//! `GatewayConfig::api_key` from then on.

use anyhow::{Context, Result};
use emotion_common::DEFAULT_BIND;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/emotion-lens/config.toml";

/// Environment variable holding the gateway credential unless overridden
pub const DEFAULT_API_KEY_ENV: &str = "EMOTION_GATEWAY_API_KEY";

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Largest accepted request body; media data URLs are big
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Upstream chat-completions gateway
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// OpenAI-compatible chat completions endpoint
    #[serde(default = "default_gateway_url")]
    pub url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Whole-request timeout for the upstream call
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Name of the environment variable holding the bearer credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_gateway_url() -> String {
    "https://ai.gateway.lovable.dev/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            api_key_env: default_api_key_env(),
            api_key: None,
        }
    }
}

impl GatewayConfig {
    /// Pick up the credential from `api_key_env`; blank values count as missing
    pub fn resolve_api_key(&mut self) {
        self.api_key = std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if self.api_key.is_none() {
            warn!(
                "{} is not set; analyze requests will fail until it is configured",
                self.api_key_env
            );
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl EmotionConfig {
    /// Load config from an explicit path, or the system path, or defaults.
    ///
    /// An explicit path that cannot be read or parsed is an error; a broken
    /// system config only produces a warning.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let system = Path::new(CONFIG_PATH);
        if !system.exists() {
            info!("No config at {}, using defaults", CONFIG_PATH);
            return Ok(Self::default());
        }

        Ok(Self::load_from_path(system).unwrap_or_else(|e| {
            warn!("Config unreadable, using defaults: {:#}", e);
            Self::default()
        }))
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: EmotionConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
