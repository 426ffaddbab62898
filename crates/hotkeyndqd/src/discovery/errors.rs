//! Error types for the discovery responder.

use std::io;
use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

/// Errors surfaced while binding or running the discovery responder.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to resolve discovery address {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("no addresses resolved for {host}:{port}")]
    ResolveEmpty { host: String, port: u16 },
    #[error("failed to bind discovery socket at {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to read the bound discovery address: {source}")]
    LocalAddr {
        #[source]
        source: io::Error,
    },
    #[error("failed to configure discovery socket: {source}")]
    SocketOption {
        #[source]
        source: io::Error,
    },
    #[error("advertise address '{address}' is not an IP address: {source}")]
    InvalidAdvertiseAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },
    #[error("discovery thread panicked")]
    ThreadPanic,
}
