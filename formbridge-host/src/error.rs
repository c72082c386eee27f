//! Host harness errors

use formbridge::ConfigurationError;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid engine config: {0}")]
    Config(#[from] ConfigurationError),

    #[error("logger setup failed: {0}")]
    Logger(#[from] log::SetLoggerError),
}
