use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StormError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("display error: {0}")]
    Display(String),

    #[error("mqtt error: {0}")]
    Mqtt(String),
}
