//! Process-wide stop flag shared by every long-running loop.
//!
//! The first call to [`ShutdownCoordinator::trigger`] records why the relay is
//! stopping; later calls are ignored. Loops observe the flag between bounded
//! waits, so shutdown latency never exceeds one poll interval.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Why the relay is stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// A client sent the quit command.
    QuitCommand {
        /// Client that sent it.
        peer: SocketAddr,
    },
    /// The process received a termination signal.
    Signal(i32),
    /// The embedding code asked the server to stop.
    Requested,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuitCommand { peer } => write!(f, "quit command from {peer}"),
            Self::Signal(signal) => write!(f, "signal {signal}"),
            Self::Requested => f.write_str("stop requested"),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    triggered: AtomicBool,
    reason: OnceCell<ShutdownReason>,
}

/// Cloneable handle to the shared stop flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownCoordinator {
    inner: Arc<Inner>,
}

impl ShutdownCoordinator {
    /// Creates an untriggered coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Returns `true` when this call set the flag.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        let first = self.inner.reason.set(reason).is_ok();
        self.inner.triggered.store(true, Ordering::SeqCst);
        first
    }

    /// Returns `true` once shutdown has been requested.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }

    /// Reason recorded by the first trigger.
    #[must_use]
    pub fn reason(&self) -> Option<ShutdownReason> {
        self.inner.reason.get().copied()
    }

    /// Blocks the caller until shutdown is requested, checking every `poll`.
    pub fn wait(&self, poll: Duration) -> ShutdownReason {
        while !self.is_triggered() {
            thread::sleep(poll);
        }
        self.reason().unwrap_or(ShutdownReason::Requested)
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;

    #[test]
    fn first_reason_wins() {
        let shutdown = ShutdownCoordinator::new();
        let peer = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 40_000);

        assert!(!shutdown.is_triggered());
        assert!(shutdown.trigger(ShutdownReason::QuitCommand { peer }));
        assert!(!shutdown.trigger(ShutdownReason::Signal(15)));

        assert!(shutdown.is_triggered());
        assert_eq!(shutdown.reason(), Some(ShutdownReason::QuitCommand { peer }));
    }

    #[test]
    fn clones_observe_the_same_flag() {
        let shutdown = ShutdownCoordinator::new();
        let observer = shutdown.clone();
        let waiter = thread::spawn(move || observer.wait(Duration::from_millis(5)));

        shutdown.trigger(ShutdownReason::Requested);
        let reason = waiter.join().expect("join waiter");
        assert_eq!(reason, ShutdownReason::Requested);
    }
}
