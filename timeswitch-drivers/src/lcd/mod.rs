//! Character display drivers

pub mod hd44780;

pub use hd44780::{CursorStyle, Hd44780, LcdError, LcdPins};
