//! Real-time clock trait

use crate::time::TimeOfDay;

/// Battery-backed clock with a switch-on and a switch-off alarm
///
/// The clock drives the appliance through its interrupt output: the
/// on-time alarm asserts it, clearing the alarm flags releases it.
pub trait RtcDevice {
    /// Error type for clock access
    type Error;

    /// Current time
    fn time(&mut self) -> Result<TimeOfDay, Self::Error>;

    /// Set the current time
    fn set_time(&mut self, time: TimeOfDay) -> Result<(), Self::Error>;

    /// Time the appliance switches on
    fn on_time(&mut self) -> Result<TimeOfDay, Self::Error>;

    /// Set the switch-on time
    fn set_on_time(&mut self, time: TimeOfDay) -> Result<(), Self::Error>;

    /// Time the appliance switches off (seconds are always zero)
    fn off_time(&mut self) -> Result<TimeOfDay, Self::Error>;

    /// Set the switch-off time, seconds are ignored
    fn set_off_time(&mut self, time: TimeOfDay) -> Result<(), Self::Error>;

    /// Arm or disarm the alarm output
    fn set_alarm_enabled(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Clear pending alarm flags, which switches the appliance off
    fn clear_status(&mut self) -> Result<(), Self::Error>;
}
