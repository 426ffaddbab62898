//! Address and name the relay advertises to probing clients.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use hotkeyndq_config::Config;
use tracing::debug;

use crate::protocol::DiscoveryReply;

use super::{DISCOVERY_TARGET, DiscoveryError};

/// Name used when neither configuration nor the OS provides one.
pub const FALLBACK_SERVER_NAME: &str = "HotKeyNDQ Server";

/// Identity resolved once at start-up and reused for every reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServerIdentity {
    name: String,
    advertise: Option<IpAddr>,
    bind_ip: Option<IpAddr>,
    command_port: u16,
}

impl ServerIdentity {
    /// Builds the identity from configuration and the bound command port.
    pub(crate) fn from_config(config: &Config, command_port: u16) -> Result<Self, DiscoveryError> {
        let advertise = config
            .advertise_address()
            .map(|address| {
                address
                    .parse::<IpAddr>()
                    .map_err(|source| DiscoveryError::InvalidAdvertiseAddress {
                        address: address.to_owned(),
                        source,
                    })
            })
            .transpose()?;
        let bind_ip = config
            .bind_host()
            .parse::<IpAddr>()
            .ok()
            .filter(|ip| !ip.is_unspecified());
        let name = config
            .server_name()
            .map(str::to_owned)
            .or_else(host_name)
            .unwrap_or_else(|| FALLBACK_SERVER_NAME.to_owned());
        Ok(Self {
            name,
            advertise,
            bind_ip,
            command_port,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Builds the reply for a probe from `peer`.
    pub(crate) fn reply_for(&self, peer: SocketAddr) -> DiscoveryReply {
        let ip = self
            .advertise
            .or_else(|| local_ip_towards(peer))
            .or(self.bind_ip)
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        DiscoveryReply::new(ip.to_string(), self.command_port, self.name.clone())
    }
}

/// Local address of the interface the OS would use to reach `peer`.
///
/// Connecting a UDP socket sends nothing; it only selects a route.
fn local_ip_towards(peer: SocketAddr) -> Option<IpAddr> {
    let unspecified = match peer {
        SocketAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        SocketAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };
    let probe = UdpSocket::bind((unspecified, 0)).ok()?;
    if let Err(error) = probe.connect(peer) {
        debug!(target: DISCOVERY_TARGET, %peer, %error, "no route towards prober");
        return None;
    }
    probe
        .local_addr()
        .ok()
        .map(|addr| addr.ip())
        .filter(|ip| !ip.is_unspecified())
}

fn host_name() -> Option<String> {
    nix::unistd::gethostname()
        .ok()
        .and_then(|name| name.into_string().ok())
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
}
