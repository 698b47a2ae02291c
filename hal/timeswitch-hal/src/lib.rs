//! Timeswitch Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that are implemented
//! by chip-specific HALs (ATmega8, simulated hardware in tests). The bus
//! driver, the RTC and display drivers and the application logic are all
//! written against these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (timeswitch-firmware)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  timeswitch-drivers (TWI master, RTC)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  timeswitch-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  timeswitch-hal-avr (ATmega8 registers) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`twi::TwiRegisters`] - Two-wire peripheral register file
//! - [`i2c::I2cBus`], [`i2c::RegisterAccess`] - Byte-level bus and device registers
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod twi;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use i2c::{I2cBus, RegisterAccess};
pub use twi::{Prescaler, TwiRegisters};
