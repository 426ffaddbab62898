//! Event sink backed by a simulator event backend.

use std::fmt;

use once_cell::sync::OnceCell;
use tracing::{debug, error, info, warn};

use hotkeyndq_config::BackendMode;

use super::backend::{EventBackend, EventRegistry, EventValue};
use super::cache::HandlerCache;
use super::dry_run::DryRunBackend;
use super::{EventSink, SINK_TARGET};

/// Event sink chosen from [`BackendMode`] at server start.
#[derive(Debug)]
pub enum BackendEventSink {
    /// A backend is present; its registry is opened on first dispatch.
    Connected(ConnectedSink),
    /// No backend; every dispatch is dropped with a log line.
    Disconnected,
}

impl BackendEventSink {
    /// Builds the sink for the configured backend mode.
    #[must_use]
    pub fn for_mode(mode: BackendMode) -> Self {
        match mode {
            BackendMode::DryRun => Self::connected(DryRunBackend::new()),
            BackendMode::Disconnected => Self::Disconnected,
        }
    }

    /// Wraps an arbitrary backend.
    #[must_use]
    pub fn connected(backend: impl EventBackend + 'static) -> Self {
        Self::Connected(ConnectedSink::new(Box::new(backend)))
    }
}

impl EventSink for BackendEventSink {
    fn dispatch(&self, event: &str, value: Option<EventValue>) {
        match self {
            Self::Connected(sink) => sink.dispatch(event, value),
            Self::Disconnected => warn!(
                target: SINK_TARGET,
                event,
                value = ?value,
                "no event backend connected; command dropped"
            ),
        }
    }
}

/// Sink state for a present backend.
pub struct ConnectedSink {
    backend: Box<dyn EventBackend>,
    registry: OnceCell<Option<Box<dyn EventRegistry>>>,
    handlers: HandlerCache,
}

impl ConnectedSink {
    fn new(backend: Box<dyn EventBackend>) -> Self {
        Self {
            backend,
            registry: OnceCell::new(),
            handlers: HandlerCache::new(),
        }
    }

    /// Opens the registry on first use. A failure is logged once and leaves
    /// the sink permanently inert.
    fn registry(&self) -> Option<&dyn EventRegistry> {
        self.registry
            .get_or_init(|| match self.backend.open_registry() {
                Ok(registry) => {
                    info!(target: SINK_TARGET, "event registry opened");
                    Some(registry)
                }
                Err(error) => {
                    error!(
                        target: SINK_TARGET,
                        error = %error,
                        "event registry unavailable; commands will be dropped"
                    );
                    None
                }
            })
            .as_deref()
    }

    fn dispatch(&self, event: &str, value: Option<EventValue>) {
        let Some(registry) = self.registry() else {
            debug!(target: SINK_TARGET, event, "event dropped without registry");
            return;
        };
        let Some(handler) = self
            .handlers
            .get_or_resolve(event, |name| registry.resolve(name))
        else {
            warn!(target: SINK_TARGET, event, "unknown event mapping");
            return;
        };
        if let Err(error) = handler.invoke(value) {
            warn!(
                target: SINK_TARGET,
                event,
                error = %error,
                "event invocation failed"
            );
        }
    }
}

impl fmt::Debug for ConnectedSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = match self.registry.get() {
            None => "pending",
            Some(Some(_)) => "open",
            Some(None) => "unavailable",
        };
        f.debug_struct("ConnectedSink")
            .field("registry", &registry)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}
