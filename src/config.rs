use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    pub neo4j: Neo4jConfig,
    #[serde(default)]
    pub http_server: HttpServerConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Broker extraction is disabled when this section is absent
    #[serde(default)]
    pub llm: Option<LlmConfig>,
}

/// Application-level settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            log_level: default_log_level(),
        }
    }
}

/// Neo4j connection settings (HTTP transactional endpoint)
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jConfig {
    /// Base HTTP url of the server, e.g. `http://localhost:7474`
    pub uri: String,
    #[serde(default = "default_neo4j_username")]
    pub username: String,
    /// Name of the environment variable holding the password
    #[serde(default = "default_neo4j_password_env")]
    pub password_env: String,
    #[serde(default = "default_neo4j_database")]
    pub database: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Page size limits for list and recent endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_limit")]
    pub default_limit: u32,
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: default_max_limit(),
            recent_limit: default_recent_limit(),
        }
    }
}

/// Language model settings used for broker name extraction
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_llm_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_title() -> String {
    "Real Estate Dashboard API".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_neo4j_username() -> String {
    "neo4j".to_string()
}

fn default_neo4j_password_env() -> String {
    "NEO4J_PASSWORD".to_string()
}

fn default_neo4j_database() -> String {
    "neo4j".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:3001".to_string(),
    ]
}

fn default_page_limit() -> u32 {
    12
}

fn default_max_limit() -> u32 {
    100
}

fn default_recent_limit() -> u32 {
    20
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_retries() -> usize {
    3
}

fn default_llm_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in BROKERGRAPH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("BROKERGRAPH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml(&config_str)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("Failed to parse config.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.neo4j.uri.trim().is_empty() {
            anyhow::bail!("neo4j.uri must not be empty");
        }

        url::Url::parse(&self.neo4j.uri)
            .with_context(|| format!("neo4j.uri is not a valid url: {}", self.neo4j.uri))?;

        if self.neo4j.database.trim().is_empty() {
            anyhow::bail!("neo4j.database must not be empty");
        }

        if self.http_server.port == 0 {
            anyhow::bail!("http_server.port must be greater than 0");
        }

        let p = &self.pagination;
        if p.default_limit == 0 || p.default_limit > p.max_limit {
            anyhow::bail!("pagination.default_limit must be between 1 and max_limit");
        }

        if p.recent_limit == 0 || p.recent_limit > p.max_limit {
            anyhow::bail!("pagination.recent_limit must be between 1 and max_limit");
        }

        if let Some(llm) = &self.llm {
            if llm.model.trim().is_empty() {
                anyhow::bail!("llm.model must not be empty");
            }
            if !(0.0..=2.0).contains(&llm.temperature) {
                anyhow::bail!("llm.temperature must be between 0.0 and 2.0");
            }
        }

        Ok(())
    }

    /// Bind address for the HTTP server
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_server.host, self.http_server.port)
    }
}
