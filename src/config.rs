//! Configuration management for the Essay Review server

use serde::Deserialize;
use std::env;
use thiserror::Error;

use crate::annotations::OverlapPolicy;
use crate::html::HighlightConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub annotations: AnnotationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationConfig {
    pub overlap_policy: OverlapPolicy,
    pub highlight_class: String,
}

impl AnnotationConfig {
    /// Highlight settings for rendered essays
    pub fn highlight(&self) -> HighlightConfig {
        HighlightConfig {
            class_name: self.highlight_class.clone(),
            ..HighlightConfig::default()
        }
    }
}

/// Invalid configuration values
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite:./essays.db".to_string(),
            },
            annotations: AnnotationConfig {
                overlap_policy: OverlapPolicy::Reject,
                highlight_class: HighlightConfig::default().class_name,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: match env::var("SERVER_PORT") {
                    Ok(port) => port.parse().map_err(|e: std::num::ParseIntError| {
                        ConfigError::Invalid {
                            name: "SERVER_PORT",
                            reason: e.to_string(),
                        }
                    })?,
                    Err(_) => defaults.server.port,
                },
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            annotations: AnnotationConfig {
                overlap_policy: match env::var("ANNOTATION_OVERLAP_POLICY") {
                    Ok(policy) => policy
                        .parse()
                        .map_err(|reason| ConfigError::Invalid {
                            name: "ANNOTATION_OVERLAP_POLICY",
                            reason,
                        })?,
                    Err(_) => defaults.annotations.overlap_policy,
                },
                highlight_class: env::var("HIGHLIGHT_CLASS")
                    .unwrap_or(defaults.annotations.highlight_class),
            },
        })
    }
}
