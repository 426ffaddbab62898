//! Boundary between the relay and the simulator event backend.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Payload passed to an event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventValue {
    /// Numeric argument, for example `1` for "on".
    Number(u32),
    /// Boolean argument for set-style events.
    Flag(bool),
}

impl fmt::Display for EventValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Flag(value) => write!(f, "{value}"),
        }
    }
}

/// Errors reported by an event backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The backend could not provide an event registry.
    #[error("event registry unavailable: {message}")]
    RegistryUnavailable {
        /// Backend-provided description.
        message: String,
    },
    /// A resolved handler failed while firing its event.
    #[error("event '{event}' failed: {message}")]
    Invocation {
        /// Event that failed.
        event: String,
        /// Backend-provided description.
        message: String,
    },
}

/// Source of the event registry.
///
/// The registry is opened at most once per sink, on the first dispatch.
pub trait EventBackend: Send + Sync {
    /// Opens the registry of invocable events.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::RegistryUnavailable`] when the backend cannot be
    /// reached.
    fn open_registry(&self) -> Result<Box<dyn EventRegistry>, SinkError>;
}

/// Lookup from event name to handler.
pub trait EventRegistry: Send + Sync {
    /// Returns the handler for `event`, or `None` when the name is unknown.
    fn resolve(&self, event: &str) -> Option<Arc<dyn EventHandler>>;
}

/// A resolved, invocable event.
pub trait EventHandler: Send + Sync {
    /// Fires the event with an optional payload.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Invocation`] when the backend rejects the call.
    fn invoke(&self, value: Option<EventValue>) -> Result<(), SinkError>;
}
