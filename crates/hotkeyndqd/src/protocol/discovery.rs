//! Wire format of the UDP discovery exchange.

use serde::{Deserialize, Serialize};

/// Exact datagram body a client broadcasts to locate a relay.
pub const DISCOVERY_PROBE: &str = "HOTKEYNDQ_DISCOVER";

/// Discriminator carried by every discovery reply.
pub const DISCOVERY_RESPONSE_TYPE: &str = "discovery_response";

/// Reply sent to a client that probed the discovery port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryReply {
    /// Always [`DISCOVERY_RESPONSE_TYPE`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Address the client should connect to.
    pub ip: String,
    /// TCP command port.
    pub port: u16,
    /// Human-readable server name shown in the client.
    pub name: String,
}

impl DiscoveryReply {
    /// Builds a reply advertising `ip:port` under `name`.
    #[must_use]
    pub fn new(ip: impl Into<String>, port: u16, name: impl Into<String>) -> Self {
        Self {
            kind: DISCOVERY_RESPONSE_TYPE.to_owned(),
            ip: ip.into(),
            port,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_with_type_discriminator() {
        let reply = DiscoveryReply::new("192.168.1.20", 5555, "Cockpit PC");
        let json: serde_json::Value = serde_json::to_value(&reply).expect("serialise reply");
        assert_eq!(json["type"], "discovery_response");
        assert_eq!(json["ip"], "192.168.1.20");
        assert_eq!(json["port"], 5555);
        assert_eq!(json["name"], "Cockpit PC");
    }
}
