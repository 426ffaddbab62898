//! Message shapes shared by the command port and the discovery port.

mod discovery;
mod message;

pub use discovery::{DISCOVERY_PROBE, DISCOVERY_RESPONSE_TYPE, DiscoveryReply};
pub use message::{COMMAND_TYPE, Message, MessageError, QUIT_SENTINEL};
