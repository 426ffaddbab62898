//! TCP accept loop for the command port.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::shutdown::ShutdownCoordinator;

use super::{ConnectionHandler, ListenerError, TRANSPORT_TARGET};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Bound, not yet accepting, command listener.
#[derive(Debug)]
pub(crate) struct CommandListener {
    listener: TcpListener,
    addr: SocketAddr,
}

impl CommandListener {
    pub(crate) fn bind(host: &str, port: u16) -> Result<Self, ListenerError> {
        let listener = bind_tcp(host, port)?;
        let addr = listener
            .local_addr()
            .map_err(|source| ListenerError::LocalAddr { source })?;
        Ok(Self { listener, addr })
    }

    pub(crate) const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Starts accepting on a background thread until `shutdown` triggers.
    ///
    /// The listening socket is closed when the thread exits, so connection
    /// attempts made after shutdown are refused.
    pub(crate) fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
        shutdown: ShutdownCoordinator,
    ) -> Result<ListenerHandle, ListenerError> {
        self.listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        let handle = thread::spawn(move || run_accept_loop(self, &shutdown, handler));
        Ok(ListenerHandle {
            handle: Some(handle),
        })
    }
}

/// Handle to the background accept thread.
#[derive(Debug)]
pub(crate) struct ListenerHandle {
    handle: Option<thread::JoinHandle<()>>,
}

impl ListenerHandle {
    pub(crate) fn join(mut self) -> Result<(), ListenerError> {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(()) => Ok(()),
                Err(_) => Err(ListenerError::ThreadPanic),
            }
        } else {
            Ok(())
        }
    }
}

fn run_accept_loop(
    listener: CommandListener,
    shutdown: &ShutdownCoordinator,
    handler: Arc<dyn ConnectionHandler>,
) {
    info!(
        target: TRANSPORT_TARGET,
        addr = %listener.addr,
        "command listener active"
    );
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.is_triggered() {
        match accept_connection(&listener.listener) {
            Ok(Some((stream, peer))) => {
                last_error = None;
                debug!(target: TRANSPORT_TARGET, %peer, "connection accepted");
                let handler = Arc::clone(&handler);
                thread::spawn(move || handler.handle(stream, peer));
            }
            Ok(None) => {
                thread::sleep(ACCEPT_BACKOFF);
            }
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: TRANSPORT_TARGET,
                        error = %error,
                        "command accept error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }

    info!(
        target: TRANSPORT_TARGET,
        addr = %listener.addr,
        "command listener closed"
    );
}

fn accept_connection(listener: &TcpListener) -> io::Result<Option<(TcpStream, SocketAddr)>> {
    match listener.accept() {
        Ok((stream, peer)) => {
            stream.set_nonblocking(false)?;
            Ok(Some((stream, peer)))
        }
        Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(error) => Err(error),
    }
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?;
    let addr = addrs.next().ok_or_else(|| ListenerError::ResolveEmpty {
        host: host.to_owned(),
        port,
    })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })
}
