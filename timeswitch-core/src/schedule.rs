//! Switch-off schedule
//!
//! The clock's on-time alarm switches the appliance on by itself. Its
//! second alarm register only stores the off time; the firmware compares
//! it against the clock and clears the alarm flags to switch off.

use crate::time::TimeOfDay;

/// True during the minute the appliance should switch off
///
/// Seconds are ignored, so this holds for a whole minute; clearing the
/// alarm flags repeatedly within it is harmless.
pub fn off_time_reached(now: &TimeOfDay, off: &TimeOfDay) -> bool {
    now.same_minute(off)
}
