//! Error types for the kp-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// behind one interface for front ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Failed to read settings file: {path}")]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Selection error: {0}")]
    Select(String),

    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("no metrics")]
    NoMetrics,

    #[error("Render error: {0}")]
    Render(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True when nothing matched and there was no figure to draw.
    pub fn is_empty_metric_set(&self) -> bool {
        matches!(self, AppError::NoMetrics)
    }
}

/// Result type for kp-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<kp_ingest::IngestError> for AppError {
    fn from(err: kp_ingest::IngestError) -> Self {
        AppError::Ingest(err.to_string())
    }
}

impl From<kp_render::RenderError> for AppError {
    fn from(err: kp_render::RenderError) -> Self {
        match err {
            kp_render::RenderError::EmptyMetricSet => AppError::NoMetrics,
            other => AppError::Render(other.to_string()),
        }
    }
}

impl From<crate::selector::SelectError> for AppError {
    fn from(err: crate::selector::SelectError) -> Self {
        AppError::Select(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
