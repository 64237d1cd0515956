use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the paperlens server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// API key passed to the Gemini `generateContent` endpoint.
    pub gemini_api_key: String,
    /// Model identifier used for summarization and question answering.
    pub gemini_model: String,
    /// Base URL of the Gemini API, overridable for tests.
    pub gemini_base_url: String,
    /// Request timeout applied to every model call, in seconds.
    pub gemini_timeout_secs: u64,
    /// Base URL of the arXiv export API used for citation metadata.
    pub arxiv_api_url: String,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 120;
const DEFAULT_ARXIV_API_URL: &str = "https://export.arxiv.org";

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            gemini_api_key: load_env("GEMINI_API_KEY")?,
            gemini_model: load_env_optional("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: load_env_optional("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_timeout_secs: load_env_optional("GEMINI_TIMEOUT_SECS")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("GEMINI_TIMEOUT_SECS".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_GEMINI_TIMEOUT_SECS),
            arxiv_api_url: load_env_optional("ARXIV_API_URL")
                .unwrap_or_else(|| DEFAULT_ARXIV_API_URL.to_string()),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        model = %config.gemini_model,
        gemini_base_url = %config.gemini_base_url,
        arxiv_api_url = %config.arxiv_api_url,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
