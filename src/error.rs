//! Unified error handling for rosterbot.
//!
//! Registry and event errors signal a mismatch between observed protocol
//! events and expected server behavior. They are recoverable by policy:
//! the offending event is rejected without partial mutation, reported,
//! and dropped. A single bad server message must not take the bot down.

use thiserror::Error;

/// Lossy-decode identifier bytes for error display.
///
/// Errors are for reporting only; byte-exact identity stays in the
/// registry.
pub(crate) fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Registry invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The nick has no record.
    #[error("unknown nick: {0}")]
    UnknownNick(String),

    /// The nick's record does not list the channel.
    #[error("nick {nick} is not in channel {channel}")]
    NotInChannel {
        /// The nick the event acted on.
        nick: String,
        /// The channel the event named.
        channel: String,
    },

    /// Duplicate JOIN: the channel is already in the nick's set.
    #[error("nick {nick} is already in channel {channel}")]
    AlreadyInChannel {
        /// The joining nick.
        nick: String,
        /// The channel it is already in.
        channel: String,
    },

    /// Rename target already has a record.
    #[error("nick already exists: {0}")]
    NameCollision(String),

    /// No nick currently occupies the channel.
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
}

/// Errors raised while mapping a protocol event onto the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The command requires an acting nick but the line had no prefix.
    #[error("{command} event without a source prefix")]
    MissingPrefix {
        /// The command that needed a prefix.
        command: String,
    },

    /// The command was missing a required argument.
    #[error("{command} event missing required arguments")]
    MissingArgument {
        /// The command that was short on arguments.
        command: String,
    },

    /// The registry rejected the event.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
