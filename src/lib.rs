//! rosterbot library surface.
//!
//! The binary in `main.rs` is a thin shell; everything it wires together
//! lives here so integration tests can drive the same code paths.

pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod network;
pub mod state;
