//! # roster-proto
//!
//! Byte-oriented IRC protocol parsing for rosterbot.
//!
//! IRC gives no encoding guarantee, and nick/channel identity is
//! byte-exact, so everything in this crate works on `&[u8]` and leaves
//! text decoding to the presentation layer.
//!
//! ## Features
//!
//! - Line decomposition into prefix, command, and arguments
//! - Prefix identity helpers (`nick!user@host` splitting)
//! - NAMES-reply token handling (sigil stripping)
//! - Optional Tokio line codec for framing wire traffic
//!
//! ## Quick Start
//!
//! ```rust
//! use roster_proto::parse_line;
//!
//! let line = parse_line(b":nick!u@h PRIVMSG #chan :hello there").unwrap();
//! assert_eq!(line.prefix, Some(&b"nick!u@h"[..]));
//! assert_eq!(line.command, b"PRIVMSG");
//! assert_eq!(line.params.as_slice(), &[&b"#chan"[..], &b"hello there"[..]]);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

#[cfg(feature = "tokio")]
pub mod codec;
pub mod error;
pub mod line;
pub mod names;
pub mod prefix;

#[cfg(feature = "tokio")]
pub use codec::LineCodec;
pub use error::LineParseError;
pub use line::{parse_line, ParsedLine};
