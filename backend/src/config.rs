//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use crate::credentials::HashCost;
use crate::model::config::{DEFAULT_MODEL, DEFAULT_REGION, DEFAULT_TIMEOUT_SECS};
use crate::model::{GenerationParams, VertexProvider, VertexSettings};
use std::env;
use thiserror::Error;

/// Default database name
pub const DEFAULT_DB_NAME: &str = "ai_mongo_agent";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Production deployments must name their database explicitly
    #[error("Production database URL not found in environment variables (DATABASE_URL)")]
    MissingDatabaseUrl,

    /// APP_ENV has a value other than development or production
    #[error("Unknown APP_ENV value: {0}")]
    UnknownEnvironment(String),
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development with a default database location
    Development,
    /// Production, where the database URL is mandatory
    Production,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment
    pub environment: Environment,
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Model service configuration
    pub model: ModelConfig,
    /// Password hash cost
    pub hashing: HashCost,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection string
    pub url: String,
    /// Database name (names the default database file)
    pub name: String,
}

/// Model service configuration
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Google Cloud project identifier (empty if not configured)
    pub project_id: String,
    /// Google Cloud region
    pub region: String,
    /// Vertex AI client settings
    pub vertex: VertexSettings,
}

impl Config {
    /// Load configuration from environment variables with defaults
    ///
    /// # Errors
    /// * `UnknownEnvironment` - APP_ENV is set to an unsupported value
    /// * `MissingDatabaseUrl` - Production without DATABASE_URL
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").ok().as_deref() {
            None | Some("") | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => return Err(ConfigError::UnknownEnvironment(other.to_string())),
        };

        let db_name = non_empty_var("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
        let db_url = match (non_empty_var("DATABASE_URL"), environment) {
            (Some(url), _) => url,
            (None, Environment::Production) => return Err(ConfigError::MissingDatabaseUrl),
            (None, Environment::Development) => {
                format!("sqlite:{}/{}.db", default_data_dir(), db_name)
            }
        };

        let defaults = HashCost::default();
        let hashing = HashCost {
            memory_kib: parse_var("PASSWORD_HASH_MEMORY_KIB").unwrap_or(defaults.memory_kib),
            iterations: parse_var("PASSWORD_HASH_ITERATIONS").unwrap_or(defaults.iterations),
            parallelism: parse_var("PASSWORD_HASH_PARALLELISM").unwrap_or(defaults.parallelism),
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                port: parse_var("PORT").unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            database: DatabaseConfig {
                url: db_url,
                name: db_name,
            },
            model: ModelConfig {
                project_id: env::var("GOOGLE_CLOUD_PROJECT").unwrap_or_default(),
                region: non_empty_var("GOOGLE_CLOUD_REGION")
                    .unwrap_or_else(|| DEFAULT_REGION.to_string()),
                vertex: VertexSettings {
                    model: non_empty_var("VERTEX_MODEL")
                        .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                    access_token: non_empty_var("VERTEX_ACCESS_TOKEN"),
                    api_base_url: non_empty_var("VERTEX_API_BASE_URL"),
                    timeout_secs: parse_var("VERTEX_TIMEOUT_SECS").unwrap_or(DEFAULT_TIMEOUT_SECS),
                    params: GenerationParams::default(),
                },
            },
            hashing,
        })
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Build the model provider for new sessions
    pub fn model_provider(&self) -> VertexProvider {
        VertexProvider::new(
            self.model.project_id.clone(),
            self.model.region.clone(),
            self.model.vertex.clone(),
        )
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn default_data_dir() -> String {
    env::var("DATA_DIR").unwrap_or_else(|_| {
        // Default to ~/.ai-agent or current directory
        if let Some(home) = env::var_os("HOME") {
            format!("{}/.ai-agent", home.to_string_lossy())
        } else {
            ".ai-agent".to_string()
        }
    })
}
