//! Bot state.
//!
//! Contains the nick/channel membership registry.

mod registry;

pub use registry::NickRegistry;
