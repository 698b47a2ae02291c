//! Configuration types
//!
//! Board-agnostic configuration read from `timeswitch.toml` by the
//! firmware build script and baked into the binary as constants.

pub mod types;

pub use types::*;
