//! LAN discovery over UDP.
//!
//! Clients broadcast `HOTKEYNDQ_DISCOVER` to the discovery port and the relay
//! answers with the address, command port and name to connect to.

mod errors;
mod identity;
mod responder;

pub use self::errors::DiscoveryError;
pub use self::identity::FALLBACK_SERVER_NAME;
pub(crate) use self::identity::ServerIdentity;
pub(crate) use self::responder::{DiscoveryHandle, DiscoveryResponder};

const DISCOVERY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::discovery");
