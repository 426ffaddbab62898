//! Decoding of client messages received on the command port.
//!
//! Every line a client sends is a JSON object with a `type` discriminator and,
//! for commands, an `id` naming the command. Any other fields are accepted
//! and ignored so newer clients can attach metadata without breaking older
//! relays.

use serde::Deserialize;
use thiserror::Error;

/// Discriminator value marking a command message.
pub const COMMAND_TYPE: &str = "command";

/// Command identifier that stops the relay instead of reaching the backend.
pub const QUIT_SENTINEL: &str = "QUIT_SERVER";

/// A decoded client message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    /// Message discriminator, for example `"command"`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Command identifier; only meaningful for command messages.
    #[serde(default)]
    pub id: Option<String>,
}

/// Errors raised when a line cannot be decoded into a [`Message`].
#[derive(Debug, Error)]
#[error("malformed message: {source}")]
pub struct MessageError {
    #[from]
    source: serde_json::Error,
}

impl Message {
    /// Parses one line (without its newline delimiter) into a message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError`] when the line is not a JSON object matching
    /// the message shape.
    pub fn parse(line: &[u8]) -> Result<Self, MessageError> {
        Ok(serde_json::from_slice(line)?)
    }

    /// Returns the command identifier when this is a command with an `id`.
    #[must_use]
    pub fn command_id(&self) -> Option<&str> {
        if self.kind.as_deref() != Some(COMMAND_TYPE) {
            return None;
        }
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns `true` for the command that requests relay shutdown.
    #[must_use]
    pub fn is_quit(&self) -> bool {
        self.command_id() == Some(QUIT_SENTINEL)
    }
}
