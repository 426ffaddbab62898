//! Command dispatch from connections to the event sink.
//!
//! Clients send one JSON object per line:
//!
//! ```json
//! {"type":"command","id":"AVIONICS_MASTER_ON"}
//! ```
//!
//! Commands are mapped to simulator events by [`resolve_command`] and handed
//! to the shared sink. `QUIT_SERVER` stops the relay instead. Other message
//! types are logged and ignored; nothing is ever written back to the client.

mod handler;
mod mapper;
mod router;

pub(crate) use self::handler::CommandConnectionHandler;
pub use self::mapper::{MappedEvent, resolve_command};
pub(crate) use self::router::CommandRouter;

const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
