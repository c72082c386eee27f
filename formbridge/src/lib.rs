//! Headless form engine
//!
//! Compiles a declarative JSON form schema into a live tree of stateful
//! widgets, validates input against per-field rules, keeps an aggregate
//! submittable state and talks to its embedding host over an event bridge.

pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod form;
pub mod host;
pub mod pickers;
pub mod render;
pub mod schema;
pub mod transition;
pub mod validation;
pub mod widgets;

pub use bridge::{Bridge, ChannelSink, Command, EventKind, EventSink, FormEvent, Outbound, Reply};
pub use config::{EngineConfig, FormParams};
pub use engine::{FormEngine, PostRequest, SubmitOutcome, SuccessCallback, UiEvent};
pub use error::{ConfigurationError, FormError, HostProtocolError};
pub use schema::FormDefinition;
