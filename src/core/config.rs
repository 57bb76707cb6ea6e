//! Configuration management for csv-analyst
//!
//! Supports environment variables, a config file, and runtime overrides.
//!
//! Config file location: ~/.config/csv-analyst/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::warn;

use crate::core::error::{AnalystError, Result};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Main configuration for csv-analyst
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model provider configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Dataset configuration
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Agent configuration
    #[serde(default)]
    pub agent: AgentConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Which backend answers chat completions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// OpenAI-compatible chat completions API
    #[default]
    OpenAi,
    /// Local Ollama server
    Ollama,
}

impl FromStr for ProviderType {
    type Err = AnalystError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(AnalystError::config(format!(
                "Unknown provider '{}'. Available: openai, ollama",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::OpenAi => write!(f, "openai"),
            ProviderType::Ollama => write!(f, "ollama"),
        }
    }
}

/// Model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider backend
    pub provider: ProviderType,
    /// Model name
    /// Default: gpt-5-mini
    pub model: String,
    /// Base URL of the provider API (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens per model call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API key, only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path of the CSV file loaded at startup
    pub path: PathBuf,
    /// Name of the SQL table the rows are loaded into
    pub table_name: String,
    /// What the data is, used in the system prompt and banner
    pub description: String,
    /// Maximum rows rendered for one query result
    pub query_row_limit: usize,
}

/// Agent behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum model calls per question before the loop is force-stopped
    /// Default: 5
    pub max_iterations: usize,
    /// Whether to show debug output
    pub debug: bool,
    /// System prompt override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: env::var("CSV_ANALYST_PROVIDER")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
            model: env::var("CSV_ANALYST_MODEL").unwrap_or_else(|_| "gpt-5-mini".to_string()),
            base_url: env::var("OPENAI_BASE_URL").ok(),
            // gpt-5 models only accept the server default
            temperature: None,
            max_tokens: None,
            timeout_secs: 120,
            api_key: env::var("OPENAI_API_KEY").ok(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: env::var("CSV_ANALYST_DATA")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/2018.csv")),
            table_name: "data".to_string(),
            description: "the World Happiness Report 2018".to_string(),
            query_row_limit: 50,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            debug: env::var("CSV_ANALYST_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            system_prompt: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
        }
    }
}

impl LlmConfig {
    /// Base URL with the provider default filled in and no trailing slash
    pub fn endpoint(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(match self.provider {
            ProviderType::OpenAi => OPENAI_BASE_URL,
            ProviderType::Ollama => OLLAMA_BASE_URL,
        });
        base.trim_end_matches('/').to_string()
    }
}

impl ServerConfig {
    /// Get the socket address
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("csv-analyst")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > config file > env vars > defaults
    pub fn load() -> Self {
        let (config, warning) = Self::load_checked();
        if let Some(warning) = warning {
            warn!("{}", warning);
        }
        config
    }

    /// Like [`Config::load`], but hands back the reason an unusable config
    /// file was ignored instead of logging it
    pub fn load_checked() -> (Self, Option<String>) {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();
        Self::load_from(&Self::config_file())
    }

    /// Load from `path`, falling back to defaults (which respect env vars)
    /// when the file is missing or invalid
    pub fn load_from(path: &Path) -> (Self, Option<String>) {
        if !path.exists() {
            return (Self::default(), None);
        }

        match Self::load_from_file(path) {
            Ok(config) => (config, None),
            Err(e) => (
                Self::default(),
                Some(format!("Ignoring {}: {}", path.display(), e)),
            ),
        }
    }

    /// Load configuration from a file only
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AnalystError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text. The API key is always taken from
    /// the environment.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)
            .map_err(|e| AnalystError::config(format!("Failed to parse config: {}", e)))?;
        config.llm.api_key = env::var("OPENAI_API_KEY").ok();
        Ok(config)
    }

    /// Check that the settings can be used to start an agent
    pub fn validate(&self) -> Result<()> {
        if self.agent.max_iterations == 0 {
            return Err(AnalystError::config("agent.max_iterations must be at least 1"));
        }
        if self.llm.model.trim().is_empty() {
            return Err(AnalystError::config("llm.model must not be empty"));
        }
        if self.llm.provider == ProviderType::OpenAi && self.llm.api_key.is_none() {
            return Err(AnalystError::config(
                "OPENAI_API_KEY is not set (add it to the environment or a .env file)",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> Config {
        let mut config = Config::default();
        config.llm.provider = ProviderType::OpenAi;
        config.llm.model = "gpt-5-mini".into();
        config.llm.api_key = Some("sk-test".into());
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.agent.max_iterations, 5);
        assert_eq!(config.dataset.table_name, "data");
        assert_eq!(config.dataset.query_row_limit, 50);
    }

    #[test]
    fn test_endpoint_defaults() {
        let mut llm = config_with_key().llm;
        llm.base_url = None;
        assert_eq!(llm.endpoint(), "https://api.openai.com/v1");

        llm.provider = ProviderType::Ollama;
        assert_eq!(llm.endpoint(), "http://localhost:11434");

        llm.base_url = Some("http://proxy.local/v1/".into());
        assert_eq!(llm.endpoint(), "http://proxy.local/v1");
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("OpenAI".parse::<ProviderType>().unwrap(), ProviderType::OpenAi);
        assert_eq!("ollama".parse::<ProviderType>().unwrap(), ProviderType::Ollama);
        assert!("gemini".parse::<ProviderType>().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml(
            r#"
            [dataset]
            path = "data/other.csv"
            table_name = "scores"
            description = "exam scores"
            query_row_limit = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.dataset.table_name, "scores");
        assert_eq!(config.dataset.path, PathBuf::from("data/other.csv"));
        assert_eq!(config.agent.max_iterations, 5);
        assert_eq!(config.llm.max_tokens, None);
    }

    #[test]
    fn test_from_toml_max_tokens() {
        let config = Config::from_toml(
            r#"
            [llm]
            provider = "ollama"
            model = "qwen3:8b"
            max_tokens = 1024
            timeout_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.max_tokens, Some(1024));
        assert_eq!(config.llm.provider, ProviderType::Ollama);
    }

    #[test]
    fn test_serialization_skips_api_key() {
        let toml_str = toml::to_string_pretty(&config_with_key()).unwrap();
        assert!(toml_str.contains("max_iterations"));
        assert!(!toml_str.contains("sk-test"));
    }

    #[test]
    fn test_validate() {
        assert!(config_with_key().validate().is_ok());

        let mut config = config_with_key();
        config.llm.api_key = None;
        assert!(config.validate().is_err());

        config.llm.provider = ProviderType::Ollama;
        assert!(config.validate().is_ok());

        config.agent.max_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_reports_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let (config, warning) = Config::load_from(&path);
        assert!(warning.is_none());
        assert_eq!(config.agent.max_iterations, 5);

        fs::write(&path, "[agent]\nmax_iterations = 3\ndebug = false\n").unwrap();
        let (config, warning) = Config::load_from(&path);
        assert!(warning.is_none());
        assert_eq!(config.agent.max_iterations, 3);

        fs::write(&path, "[agent\nmax_iterations = ").unwrap();
        let (config, warning) = Config::load_from(&path);
        let warning = warning.unwrap();
        assert!(warning.starts_with("Ignoring "), "{}", warning);
        assert!(warning.contains("config.toml"));
        assert!(warning.contains("Failed to parse config"));
        assert_eq!(config.agent.max_iterations, 5);
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("csv-analyst"));
    }
}
