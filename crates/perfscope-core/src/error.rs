use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Browser session error: {0}")]
    Session(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("In-page evaluation failed: {0}")]
    Evaluation(String),

    #[error("Timed out after {}ms waiting for {waiting_for}", .after.as_millis())]
    Timeout {
        waiting_for: String,
        after: std::time::Duration,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
