//! Routing of decoded messages to the event sink.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{debug, info};

use crate::protocol::Message;
use crate::shutdown::{ShutdownCoordinator, ShutdownReason};
use crate::sink::EventSink;

use super::DISPATCH_TARGET;
use super::mapper::resolve_command;

/// What happened to a routed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RouteOutcome {
    /// The command was mapped and handed to the sink.
    Dispatched,
    /// Not a command; nothing was sent.
    Ignored,
    /// The quit command was received and shutdown was triggered.
    Quit,
}

/// Routes commands from every connection into the shared sink.
#[derive(Clone)]
pub(crate) struct CommandRouter {
    sink: Arc<dyn EventSink>,
    shutdown: ShutdownCoordinator,
}

impl CommandRouter {
    pub(crate) const fn new(sink: Arc<dyn EventSink>, shutdown: ShutdownCoordinator) -> Self {
        Self { sink, shutdown }
    }

    pub(crate) fn route(&self, message: &Message, peer: SocketAddr) -> RouteOutcome {
        let Some(command) = message.command_id() else {
            debug!(
                target: DISPATCH_TARGET,
                %peer,
                kind = ?message.kind,
                "ignoring non-command message"
            );
            return RouteOutcome::Ignored;
        };

        if message.is_quit() {
            let first = self.shutdown.trigger(ShutdownReason::QuitCommand { peer });
            info!(
                target: DISPATCH_TARGET,
                %peer,
                first,
                "quit command received"
            );
            return RouteOutcome::Quit;
        }

        let mapped = resolve_command(command);
        debug!(
            target: DISPATCH_TARGET,
            %peer,
            command,
            event = mapped.event,
            value = ?mapped.value,
            "dispatching command"
        );
        self.sink.dispatch(mapped.event, mapped.value);
        RouteOutcome::Dispatched
    }
}
