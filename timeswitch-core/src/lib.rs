//! Board-agnostic core logic for the appliance timer
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Time-of-day arithmetic and BCD conversion
//! - Hardware abstraction traits (character display, real-time clock)
//! - Keypad edge detection
//! - Menu state machine and screen rendering
//! - Off-time schedule check
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod app;
pub mod config;
pub mod input;
pub mod menu;
pub mod schedule;
pub mod time;
pub mod traits;
