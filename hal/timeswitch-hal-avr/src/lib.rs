//! ATmega8-specific HAL for the timeswitch firmware
//!
//! This crate implements the `timeswitch-hal` traits on top of the
//! `avr-device` ATmega8 peripheral access crate:
//!
//! - [`twi::Atmega8Twi`] - the two-wire interface register block
//! - [`gpio`] - port B/C/D pins as inputs with pull-up or push-pull outputs
//! - [`delay::BusyDelay`] - cycle-counted busy wait implementing `DelayNs`
//!
//! # Safety
//!
//! Pins reach their port registers through `PORTx::ptr()`. Each pin must
//! be configured at most once, which the firmware guarantees by
//! constructing them from its entry point only.
//!
//! Register access only exists on the AVR target; pin parsing and clock
//! selection are also used on the host by the firmware build script.
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting support

#![no_std]

pub mod delay;
pub mod gpio;
pub mod twi;

pub use delay::BusyDelay;
pub use gpio::{Input, Output, Pin, PinSpec, Port};
#[cfg(target_arch = "avr")]
pub use twi::Atmega8Twi;
