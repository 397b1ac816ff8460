use std::path::Path;

use serde::Deserialize;
use sortable_common::{
    error::Error,
    resource::{ResourceConfig, ResourceRegistry},
};

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// `database_url` value selecting the process-local store.
/// Nothing is persisted across restarts.
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Memory,
    Postgres(String),
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_run_migrations() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Prefix all routes are mounted under, e.g. `/admin`.
    #[serde(default)]
    pub base_path: String,
    /// Used when `DATABASE_URL` is not set. `memory` selects the in-process store.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

impl ServerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        parse_yaml(&raw)
    }

    /// `env_url` is the value of `DATABASE_URL`, which wins over the file.
    pub fn database_url(&self, env_url: Option<String>) -> Result<String, Error> {
        env_url
            .filter(|url| !url.is_empty())
            .or_else(|| self.database_url.clone())
            .ok_or_else(|| {
                Error::Config(format!(
                    "no database configured, set {DATABASE_URL_ENV} or `database_url`"
                ))
            })
    }

    pub fn store_target(&self, env_url: Option<String>) -> Result<StoreTarget, Error> {
        let url = self.database_url(env_url)?;

        if url == MEMORY_DATABASE_URL {
            Ok(StoreTarget::Memory)
        } else {
            Ok(StoreTarget::Postgres(url))
        }
    }

    pub fn registry(&self) -> Result<ResourceRegistry, Error> {
        if self.resources.is_empty() {
            return Err(Error::Config("no sortable resources configured".into()));
        }

        ResourceRegistry::new(self.resources.iter().cloned())
    }
}

pub fn parse_yaml(yaml_str: &str) -> Result<ServerConfig, Error> {
    let config: ServerConfig = serde_yaml::from_str(yaml_str).map_err(|e| {
        let err = if let Some(line) = e.location() {
            ParseError::InvalidYaml {
                line: line.line(),
                column: line.column(),
                message: e.to_string(),
            }
        } else {
            ParseError::InvalidYamlNoLocation {
                message: e.to_string(),
            }
        };
        Error::Config(err.to_string())
    })?;

    Ok(config)
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid YAML config at line {line}, column {column}: {message}")]
    InvalidYaml {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid YAML config: {message}")]
    InvalidYamlNoLocation { message: String },
}
