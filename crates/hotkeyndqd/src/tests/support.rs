//! Recording doubles and loopback helpers shared by the crate test suites.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, UdpSocket};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use hotkeyndq_config::{BackendMode, Config};

use crate::health::HealthReporter;
use crate::process::{ShutdownError, ShutdownSignal, SignalWatch};
use crate::protocol::{DISCOVERY_PROBE, DiscoveryReply};
use crate::shutdown::{ShutdownCoordinator, ShutdownReason};
use crate::sink::{EventSink, EventValue};
use crate::transport::is_timeout;

pub const WAIT_TIMEOUT: Duration = Duration::from_secs(3);
pub const POLL_INTERVAL_MS: u64 = 20;
/// Generous bound for work the relay does within one poll interval.
pub const PROMPT_CLOSE: Duration = Duration::from_millis(POLL_INTERVAL_MS * 25);

/// Configuration binding both sockets to ephemeral loopback ports.
pub fn loopback_config() -> Config {
    Config {
        bind_host: "127.0.0.1".to_owned(),
        command_port: 0,
        discovery_port: 0,
        server_name: Some("Test Cockpit".to_owned()),
        poll_interval_ms: POLL_INTERVAL_MS,
        log_filter: "off".to_owned(),
        ..Config::default()
    }
}

/// Polls `condition` until it holds or [`WAIT_TIMEOUT`] elapses.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT_TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

/// Sink that records every dispatched event.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, Option<EventValue>)>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(String, Option<EventValue>)> {
        self.events.lock().expect("sink mutex poisoned").clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.events().into_iter().map(|(name, _)| name).collect()
    }

    pub fn wait_for_count(&self, expected: usize) -> bool {
        wait_until(|| self.events().len() >= expected)
    }
}

impl EventSink for RecordingSink {
    fn dispatch(&self, event: &str, value: Option<EventValue>) {
        self.events
            .lock()
            .expect("sink mutex poisoned")
            .push((event.to_owned(), value));
    }
}

/// Structured health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BackendSelected(BackendMode),
    ServerStarting,
    CommandListenerReady(SocketAddr),
    DiscoveryReady(SocketAddr),
    ShutdownRequested(ShutdownReason),
    ServerStopped,
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }

    pub fn command_addr(&self) -> Option<SocketAddr> {
        self.events().into_iter().find_map(|event| match event {
            HealthEvent::CommandListenerReady(addr) => Some(addr),
            _ => None,
        })
    }

    pub fn discovery_addr(&self) -> Option<SocketAddr> {
        self.events().into_iter().find_map(|event| match event {
            HealthEvent::DiscoveryReady(addr) => Some(addr),
            _ => None,
        })
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn backend_selected(&self, mode: BackendMode) {
        self.record(HealthEvent::BackendSelected(mode));
    }

    fn server_starting(&self, _config: &Config) {
        self.record(HealthEvent::ServerStarting);
    }

    fn command_listener_ready(&self, addr: SocketAddr) {
        self.record(HealthEvent::CommandListenerReady(addr));
    }

    fn discovery_ready(&self, addr: SocketAddr) {
        self.record(HealthEvent::DiscoveryReady(addr));
    }

    fn shutdown_requested(&self, reason: &ShutdownReason) {
        self.record(HealthEvent::ShutdownRequested(*reason));
    }

    fn server_stopped(&self) {
        self.record(HealthEvent::ServerStopped);
    }
}

/// Signal source the test fires by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualShutdownSignal {
    captured: Arc<Mutex<Option<ShutdownCoordinator>>>,
}

impl ManualShutdownSignal {
    /// Simulates SIGTERM. Returns `false` when the server never started
    /// watching.
    pub fn fire(&self) -> bool {
        let captured = self.captured.lock().expect("signal mutex poisoned");
        match captured.as_ref() {
            Some(shutdown) => {
                shutdown.trigger(ShutdownReason::Signal(15));
                true
            }
            None => false,
        }
    }
}

impl ShutdownSignal for ManualShutdownSignal {
    fn watch(&self, shutdown: ShutdownCoordinator) -> Result<SignalWatch, ShutdownError> {
        *self.captured.lock().expect("signal mutex poisoned") = Some(shutdown);
        Ok(SignalWatch::inert())
    }
}

/// Client connection to the command port.
pub struct CommandClient {
    stream: TcpStream,
}

impl CommandClient {
    pub fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).expect("connect to command port");
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .expect("client read timeout");
        Self { stream }
    }

    pub fn send_line(&mut self, line: &str) {
        self.stream
            .write_all(format!("{line}\n").as_bytes())
            .expect("write command line");
    }

    pub fn send_command(&mut self, id: &str) {
        self.send_line(&format!(r#"{{"type":"command","id":"{id}"}}"#));
    }

    /// Writes bytes without framing. The server may reset the connection
    /// part-way through, so the result is returned rather than asserted.
    pub fn send_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes)
    }

    /// Returns `true` when the server closes or resets this connection
    /// within `timeout`. Receiving data or timing out both mean it is open.
    pub fn closed_by_server_within(&mut self, timeout: Duration) -> bool {
        self.stream
            .set_read_timeout(Some(timeout))
            .expect("client read timeout");
        let mut buf = [0_u8; 16];
        match self.stream.read(&mut buf) {
            Ok(0) => true,
            Ok(_) => false,
            Err(error) => !is_timeout(&error),
        }
    }
}

/// Sends `payload` to the discovery port and waits briefly for a reply.
pub fn probe(addr: SocketAddr, payload: &[u8], timeout: Duration) -> Option<Vec<u8>> {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind probe socket");
    socket
        .set_read_timeout(Some(timeout))
        .expect("probe read timeout");
    socket.send_to(payload, addr).expect("send probe");
    let mut buf = [0_u8; 512];
    socket
        .recv_from(&mut buf)
        .ok()
        .map(|(len, _)| buf[..len].to_vec())
}

/// Sends the discovery probe and decodes the reply.
pub fn discover(addr: SocketAddr) -> DiscoveryReply {
    let reply = probe(addr, DISCOVERY_PROBE.as_bytes(), Duration::from_secs(2))
        .expect("discovery reply");
    serde_json::from_slice(&reply).expect("decode discovery reply")
}

/// Returns `true` when a fresh connection to `addr` is refused or times out.
pub fn connection_refused(addr: SocketAddr) -> bool {
    wait_until(|| TcpStream::connect_timeout(&addr, Duration::from_millis(200)).is_err())
}
