use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvoyError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Malformed envoy data in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type EnvoyResult<T> = Result<T, EnvoyError>;
