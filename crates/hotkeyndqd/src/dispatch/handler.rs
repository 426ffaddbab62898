//! Per-connection command loop.
//!
//! Each accepted socket is served by [`CommandConnectionHandler::handle`] on
//! its own thread. The loop reads with a timeout equal to the poll interval
//! so it notices shutdown promptly, frames the byte stream into messages,
//! and routes them in arrival order.

use std::io;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::shutdown::ShutdownCoordinator;
use crate::transport::{
    ConnectionHandler, FrameError, LineFramer, is_timeout, read_chunk_with_retry,
};

use super::DISPATCH_TARGET;
use super::router::{CommandRouter, RouteOutcome};

const READ_CHUNK_BYTES: usize = 1024;

/// Connection handler that relays commands to the event sink.
pub(crate) struct CommandConnectionHandler {
    router: CommandRouter,
    shutdown: ShutdownCoordinator,
    poll_interval: Duration,
    max_line_bytes: usize,
}

/// Why a connection loop ended.
#[derive(Debug)]
enum SessionEnd {
    PeerClosed,
    Shutdown,
    QuitRequested,
    Overflow(FrameError),
    Failed(io::Error),
}

impl CommandConnectionHandler {
    pub(crate) const fn new(
        router: CommandRouter,
        shutdown: ShutdownCoordinator,
        poll_interval: Duration,
        max_line_bytes: usize,
    ) -> Self {
        Self {
            router,
            shutdown,
            poll_interval,
            max_line_bytes,
        }
    }

    fn serve(&self, stream: &mut TcpStream, peer: SocketAddr) -> SessionEnd {
        if let Err(error) = stream.set_read_timeout(Some(self.poll_interval)) {
            return SessionEnd::Failed(error);
        }

        let mut framer = LineFramer::new(self.max_line_bytes);
        let mut chunk = [0_u8; READ_CHUNK_BYTES];
        loop {
            if self.shutdown.is_triggered() {
                return SessionEnd::Shutdown;
            }

            let bytes_read = match read_chunk_with_retry(stream, &mut chunk) {
                Ok(0) => return SessionEnd::PeerClosed,
                Ok(read) => read,
                Err(error) if is_timeout(&error) => continue,
                Err(error) => return SessionEnd::Failed(error),
            };

            framer.push(&chunk[..bytes_read]);
            for message in framer.messages() {
                if self.router.route(&message, peer) == RouteOutcome::Quit {
                    return SessionEnd::QuitRequested;
                }
            }
            if let Err(error) = framer.ensure_within_limit() {
                return SessionEnd::Overflow(error);
            }
        }
    }
}

impl ConnectionHandler for CommandConnectionHandler {
    fn handle(&self, mut stream: TcpStream, peer: SocketAddr) {
        info!(target: DISPATCH_TARGET, %peer, "client connected");
        match self.serve(&mut stream, peer) {
            SessionEnd::PeerClosed => {
                info!(target: DISPATCH_TARGET, %peer, "client disconnected");
            }
            SessionEnd::Shutdown => {
                debug!(target: DISPATCH_TARGET, %peer, "closing connection for shutdown");
            }
            SessionEnd::QuitRequested => {
                info!(target: DISPATCH_TARGET, %peer, "connection closed after quit command");
            }
            SessionEnd::Overflow(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    %peer,
                    error = %error,
                    "closing connection with oversized line"
                );
            }
            SessionEnd::Failed(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    %peer,
                    error = %error,
                    "connection read failed"
                );
            }
        }
    }
}
