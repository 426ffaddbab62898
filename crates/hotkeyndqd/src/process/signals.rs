use std::io;
use std::thread;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use thiserror::Error;
use tracing::{info, warn};

use crate::shutdown::{ShutdownCoordinator, ShutdownReason};

use super::PROCESS_TARGET;

/// Abstraction over external shutdown notification mechanisms.
pub trait ShutdownSignal: Send + Sync {
    /// Starts forwarding shutdown notifications to `shutdown`.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError::Install`] when the watcher cannot be set up.
    fn watch(&self, shutdown: ShutdownCoordinator) -> Result<SignalWatch, ShutdownError>;
}

/// Errors reported by shutdown signal listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Running signal watcher. Closing or dropping it stops the watcher thread.
#[derive(Debug, Default)]
pub struct SignalWatch {
    handle: Option<Handle>,
    thread: Option<thread::JoinHandle<()>>,
}

impl SignalWatch {
    /// A watch with no background thread, for signal sources that need none.
    #[must_use]
    pub fn inert() -> Self {
        Self::default()
    }

    /// Stops watching and waits for the watcher thread to exit.
    pub fn close(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.close();
        }
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!(target: PROCESS_TARGET, "signal watcher thread panicked");
        }
    }
}

impl Drop for SignalWatch {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Watches SIGTERM, SIGINT, SIGQUIT and SIGHUP.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShutdownSignal;

impl SystemShutdownSignal {
    /// Builds the signal watcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    fn watch(&self, shutdown: ShutdownCoordinator) -> Result<SignalWatch, ShutdownError> {
        let mut signals = Signals::new([SIGTERM, SIGINT, SIGQUIT, SIGHUP])
            .map_err(|source| ShutdownError::Install { source })?;
        let handle = signals.handle();
        let thread = thread::spawn(move || {
            for signal in signals.forever() {
                let first = shutdown.trigger(ShutdownReason::Signal(signal));
                info!(
                    target: PROCESS_TARGET,
                    signal,
                    first,
                    "shutdown signal received"
                );
            }
        });
        Ok(SignalWatch {
            handle: Some(handle),
            thread: Some(thread),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn closing_the_watch_stops_the_thread() {
        let watch = SystemShutdownSignal::new()
            .watch(ShutdownCoordinator::new())
            .expect("install signal watcher");
        watch.close();
    }

    #[test]
    fn inert_watch_closes_immediately() {
        SignalWatch::inert().close();
    }

    #[test]
    fn delivered_signal_triggers_shutdown() {
        let shutdown = ShutdownCoordinator::new();
        let watch = SystemShutdownSignal::new()
            .watch(shutdown.clone())
            .expect("install signal watcher");

        signal_hook::low_level::raise(SIGHUP).expect("raise SIGHUP");
        let reason = shutdown.wait(Duration::from_millis(10));

        assert_eq!(reason, ShutdownReason::Signal(SIGHUP));
        watch.close();
    }
}
