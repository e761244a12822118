use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub model_path: PathBuf,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_owned());

        let port = var("PORT", "5000");
        let port = port.parse::<u16>().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            expected: "a number between 0 and 65535",
            value: port,
        })?;

        let max_upload_mb = var("MAX_UPLOAD_MB", "16");
        let max_upload_bytes = max_upload_mb
            .parse::<usize>()
            .ok()
            .filter(|&mb| mb > 0)
            .and_then(|mb| mb.checked_mul(1024 * 1024))
            .ok_or(ConfigError::Invalid {
                name: "MAX_UPLOAD_MB",
                expected: "a positive number of megabytes",
                value: max_upload_mb,
            })?;

        Ok(Config {
            host: var("HOST", "127.0.0.1"),
            port,
            upload_dir: PathBuf::from(var("UPLOAD_DIR", "uploads")),
            model_path: PathBuf::from(var("MODEL_PATH", "XRAY-E10-multi-label-v2.onnx")),
            max_upload_bytes,
        })
    }
}
