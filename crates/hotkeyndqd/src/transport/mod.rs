//! TCP transport for the command port.
//!
//! The listener accepts connections on a background thread and hands each
//! socket to a [`ConnectionHandler`] on a thread of its own. The framer turns
//! the byte stream into newline-delimited messages.

mod errors;
mod framer;
mod handler;
mod listener;
#[cfg(test)]
mod test_utils;

pub use self::errors::{FrameError, ListenerError};
pub(crate) use self::framer::LineFramer;
pub(crate) use self::handler::{ConnectionHandler, is_timeout, read_chunk_with_retry};
pub(crate) use self::listener::{CommandListener, ListenerHandle};
#[cfg(test)]
pub(crate) use self::test_utils::CountingHandler;

const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
