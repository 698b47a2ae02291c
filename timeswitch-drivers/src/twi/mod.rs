//! Polled TWI (I2C) bus master
//!
//! Drives the two-wire peripheral through the [`TwiRegisters`] trait:
//!
//! - [`TwiMaster`] - bus controller lifecycle and the START, STOP,
//!   byte write and byte read primitives
//! - [`Transaction`] - START..STOP session that releases the bus on error
//! - [`StatusCode`] / [`TwiError`] - hardware status decoding
//! - [`WaitPolicy`] - spin or bounded polling for completion
//!
//! The master also implements `I2cBus` (and so `RegisterAccess`) and
//! `embedded_hal::i2c::I2c`.
//!
//! Transfers are fail-fast: nothing is retried and the caller decides
//! what to do with the error.
//!
//! [`TwiRegisters`]: timeswitch_hal::TwiRegisters

mod bus;
mod master;
mod status;
mod transaction;
mod wait;

#[cfg(test)]
pub(crate) mod sim;

pub use master::{AckPolicy, Address, Disabled, Enabled, TwiConfig, TwiMaster};
pub use status::{StatusCode, TwiError};
pub use transaction::{Addressing, Receiving, Transaction, Transmitting};
pub use wait::{WaitPolicy, DEFAULT_MAX_POLLS};
