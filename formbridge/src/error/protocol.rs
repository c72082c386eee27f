//! Host protocol errors

/// Host commands or UI events that cannot be honored right now.
#[derive(Debug, thiserror::Error)]
pub enum HostProtocolError {
    /// Read-only projection needs populated values to display.
    #[error("read-only mode requested but no population data was applied")]
    NotPopulated,

    /// The engine has not been initialized yet.
    #[error("`{command}` issued before the form was initialized")]
    NotInitialized { command: &'static str },

    /// `init` was requested without a form definition.
    #[error("init requested without a form definition")]
    NoForm,

    /// The command text could not be decoded.
    #[error("invalid command: {0}")]
    InvalidCommand(#[from] serde_json::Error),

    /// A UI event named a field or instance that is not in the tree.
    #[error("unknown target: {0}")]
    UnknownTarget(String),

    /// The target exists but does not support the requested interaction.
    #[error("`{action}` is not supported by field `{name}`")]
    Unsupported { action: &'static str, name: String },
}
