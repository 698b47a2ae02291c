//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod display;
pub mod rtc;

pub use display::{CharDisplay, DISPLAY_COLUMNS, DISPLAY_ROWS};
pub use rtc::RtcDevice;
