//! Service configuration. Loaded once at startup from a JSON file.

use crate::error::ConfigError;
use crate::features::UnknownPolicy;
use crate::risk::{HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "RISK_SERVICE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listener
    pub server: ServerConfig,
    /// Training data, artifact location and tree parameters
    pub model: ModelConfig,
    /// Handling of values outside the known categories
    pub encoder: EncoderConfig,
    /// Risk band thresholds
    pub risk: RiskConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Persisted model artifact; loaded if present, written after training
    pub artifact_path: PathBuf,
    /// Training CSV used when no artifact exists
    pub training_data_path: PathBuf,
    pub max_depth: usize,
    /// Seed for split candidate ordering
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub unknown_values: UnknownPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Rejection probability at or above this is high risk (0.0–1.0)
    pub high_threshold: f64,
    /// Rejection probability at or above this is medium risk
    pub medium_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            encoder: EncoderConfig::default(),
            risk: RiskConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("data/risk_model.json"),
            training_data_path: PathBuf::from("data/training_data.csv"),
            max_depth: 7,
            seed: 42,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            unknown_values: UnknownPolicy::Degrade,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            high_threshold: HIGH_RISK_THRESHOLD,
            medium_threshold: MEDIUM_RISK_THRESHOLD,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl ServiceConfig {
    /// Load from JSON file if present; a missing file gives the defaults.
    ///
    /// Unreadable or invalid files are an error.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Path from `RISK_SERVICE_CONFIG`, falling back to `config.json`
    pub fn path_from_env() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.json"))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
