//! UDP loop answering discovery probes.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::protocol::DISCOVERY_PROBE;
use crate::shutdown::ShutdownCoordinator;
use crate::transport::is_timeout;

use super::identity::ServerIdentity;
use super::{DISCOVERY_TARGET, DiscoveryError};

const ERROR_BACKOFF: Duration = Duration::from_millis(150);
const MAX_DATAGRAM_BYTES: usize = 512;

/// Bound, not yet running, discovery socket.
#[derive(Debug)]
pub(crate) struct DiscoveryResponder {
    socket: UdpSocket,
    addr: SocketAddr,
}

impl DiscoveryResponder {
    pub(crate) fn bind(host: &str, port: u16) -> Result<Self, DiscoveryError> {
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|source| DiscoveryError::Resolve {
                host: host.to_owned(),
                port,
                source,
            })?
            .next()
            .ok_or_else(|| DiscoveryError::ResolveEmpty {
                host: host.to_owned(),
                port,
            })?;
        let socket =
            UdpSocket::bind(addr).map_err(|source| DiscoveryError::Bind { addr, source })?;
        let addr = socket
            .local_addr()
            .map_err(|source| DiscoveryError::LocalAddr { source })?;
        Ok(Self { socket, addr })
    }

    pub(crate) const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Answers probes on a background thread until `shutdown` triggers.
    pub(crate) fn start(
        self,
        identity: ServerIdentity,
        shutdown: ShutdownCoordinator,
        poll_interval: Duration,
    ) -> Result<DiscoveryHandle, DiscoveryError> {
        self.socket
            .set_read_timeout(Some(poll_interval))
            .map_err(|source| DiscoveryError::SocketOption { source })?;
        let handle = thread::spawn(move || run_responder(&self, &identity, &shutdown));
        Ok(DiscoveryHandle {
            handle: Some(handle),
        })
    }
}

/// Handle to the background discovery thread.
#[derive(Debug)]
pub(crate) struct DiscoveryHandle {
    handle: Option<thread::JoinHandle<()>>,
}

impl DiscoveryHandle {
    pub(crate) fn join(mut self) -> Result<(), DiscoveryError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| DiscoveryError::ThreadPanic),
            None => Ok(()),
        }
    }
}

fn run_responder(
    responder: &DiscoveryResponder,
    identity: &ServerIdentity,
    shutdown: &ShutdownCoordinator,
) {
    info!(
        target: DISCOVERY_TARGET,
        addr = %responder.addr,
        name = identity.name(),
        "discovery responder active"
    );
    let mut datagram = [0_u8; MAX_DATAGRAM_BYTES];
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.is_triggered() {
        match responder.socket.recv_from(&mut datagram) {
            Ok((len, peer)) => {
                last_error = None;
                answer(&responder.socket, identity, &datagram[..len], peer);
            }
            Err(error) if is_timeout(&error) || error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: DISCOVERY_TARGET,
                        error = %error,
                        "discovery receive error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
    info!(target: DISCOVERY_TARGET, "discovery responder stopped");
}

fn answer(socket: &UdpSocket, identity: &ServerIdentity, datagram: &[u8], peer: SocketAddr) {
    match std::str::from_utf8(datagram) {
        Ok(DISCOVERY_PROBE) => {}
        Ok(_) => {
            debug!(target: DISCOVERY_TARGET, %peer, "ignoring unrecognised datagram");
            return;
        }
        Err(_) => {
            debug!(target: DISCOVERY_TARGET, %peer, "ignoring non-text datagram");
            return;
        }
    }

    let reply = identity.reply_for(peer);
    let payload = match serde_json::to_vec(&reply) {
        Ok(payload) => payload,
        Err(error) => {
            warn!(target: DISCOVERY_TARGET, %error, "failed to encode discovery reply");
            return;
        }
    };
    match socket.send_to(&payload, peer) {
        Ok(_) => info!(
            target: DISCOVERY_TARGET,
            %peer,
            ip = %reply.ip,
            port = reply.port,
            "answered discovery probe"
        ),
        Err(error) => warn!(
            target: DISCOVERY_TARGET,
            %peer,
            %error,
            "failed to send discovery reply"
        ),
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use hotkeyndq_config::Config;

    use super::*;
    use crate::protocol::DiscoveryReply;
    use crate::shutdown::ShutdownReason;

    const POLL: Duration = Duration::from_millis(20);

    struct Running {
        addr: SocketAddr,
        shutdown: ShutdownCoordinator,
        handle: DiscoveryHandle,
    }

    impl Running {
        fn stop(self) {
            self.shutdown.trigger(ShutdownReason::Requested);
            self.handle.join().expect("join responder");
        }
    }

    #[fixture]
    fn running() -> Running {
        let responder = DiscoveryResponder::bind("127.0.0.1", 0).expect("bind responder");
        let addr = responder.local_addr();
        let config = Config {
            server_name: Some("Cockpit PC".to_owned()),
            ..Config::default()
        };
        let identity = ServerIdentity::from_config(&config, 6123).expect("identity");
        let shutdown = ShutdownCoordinator::new();
        let handle = responder
            .start(identity, shutdown.clone(), POLL)
            .expect("start responder");
        Running {
            addr,
            shutdown,
            handle,
        }
    }

    fn client() -> UdpSocket {
        let socket = UdpSocket::bind("127.0.0.1:0").expect("bind client");
        socket
            .set_read_timeout(Some(Duration::from_millis(300)))
            .expect("client timeout");
        socket
    }

    #[rstest]
    fn answers_probe_with_command_port(running: Running) {
        let client = client();
        client
            .send_to(DISCOVERY_PROBE.as_bytes(), running.addr)
            .expect("send probe");

        let mut buf = [0_u8; 512];
        let (len, from) = client.recv_from(&mut buf).expect("receive reply");
        let reply: DiscoveryReply = serde_json::from_slice(&buf[..len]).expect("decode reply");

        assert_eq!(from, running.addr);
        assert_eq!(reply, DiscoveryReply::new("127.0.0.1", 6123, "Cockpit PC"));
        running.stop();
    }

    #[rstest]
    #[case(b"HOTKEYNDQ_DISCOVER\n".as_slice())]
    #[case(b"hotkeyndq_discover".as_slice())]
    #[case(b"HELLO".as_slice())]
    #[case(&[0xff, 0xfe, 0x00])]
    fn ignores_anything_but_the_exact_probe(running: Running, #[case] datagram: &[u8]) {
        let client = client();
        client.send_to(datagram, running.addr).expect("send datagram");

        let mut buf = [0_u8; 512];
        let error = client.recv_from(&mut buf).expect_err("no reply expected");
        assert!(is_timeout(&error), "unexpected error: {error}");
        running.stop();
    }

    #[rstest]
    fn answers_every_probe(running: Running) {
        let client = client();
        let mut buf = [0_u8; 512];
        for _ in 0..3 {
            client
                .send_to(DISCOVERY_PROBE.as_bytes(), running.addr)
                .expect("send probe");
            client.recv_from(&mut buf).expect("receive reply");
        }
        running.stop();
    }
}
