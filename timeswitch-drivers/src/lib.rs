//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in timeswitch-core and timeswitch-hal:
//!
//! - Two-wire (I2C) bus master on top of the TWI register block
//! - DS3231 real-time clock
//! - HD44780 character LCD in 4-bit mode

#![no_std]
#![deny(unsafe_code)]

pub mod lcd;
pub mod rtc;
pub mod twi;
