//! Error types for the form engine.
//!
//! Nothing in this crate is fatal to the embedding process. Configuration
//! errors omit a field, protocol errors defer or ignore a host command, and
//! validation failures are field state rather than Rust errors.

mod configuration;
mod protocol;

pub use configuration::ConfigurationError;
pub use protocol::HostProtocolError;

/// Any error surfaced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Protocol(#[from] HostProtocolError),
}
