//! DS3231 real-time clock
//!
//! Battery-backed clock on the two-wire bus with two alarms. Alarm 1
//! holds the switch-on time and drives the INT/SQW output low when it
//! fires; clearing the status register releases it again, which is how
//! the appliance is switched off. Alarm 2 only stores the switch-off time.
//!
//! All time registers are packed BCD:
//!
//! ```text
//! 0x00 seconds   CH   10s 10s 10s | units
//! 0x01 minutes   0    10m 10m 10m | units
//! 0x02 hours     0    12/24 10h 10h | units
//! ```

use timeswitch_core::time::{from_bcd, to_bcd, TimeOfDay, BCD_TENS_HOURS, BCD_TENS_MINUTES};
use timeswitch_core::traits::RtcDevice;
use timeswitch_hal::{I2cBus, RegisterAccess};

/// Fixed bus address
pub const DS3231_ADDR: u8 = 0x68;

/// DS3231 register addresses
pub mod reg {
    /// Seconds (bit 7 is the oscillator-halt flag on clones)
    pub const SECONDS: u8 = 0x00;
    pub const MINUTES: u8 = 0x01;
    /// Hours (bit 6 selects 12-hour mode)
    pub const HOURS: u8 = 0x02;
    /// Alarm 1 seconds, minutes, hours, day
    pub const ALARM1_SECONDS: u8 = 0x07;
    pub const ALARM1_DAY: u8 = 0x0A;
    /// Alarm 2 minutes, hours
    pub const ALARM2_MINUTES: u8 = 0x0B;
    pub const ALARM2_HOURS: u8 = 0x0C;
    /// Control
    pub const CONTROL: u8 = 0x0E;
    /// Status (alarm flags)
    pub const STATUS: u8 = 0x0F;
}

/// Control register bits
pub mod control {
    /// Alarm 1 interrupt enable
    pub const A1IE: u8 = 1 << 0;
    /// Alarm 2 interrupt enable
    pub const A2IE: u8 = 1 << 1;
    /// Alarms drive INT instead of the square wave
    pub const INTCN: u8 = 1 << 2;
}

/// Oscillator-halt bit in the seconds register
const CLOCK_HALT: u8 = 1 << 7;

/// 12-hour mode bit in the hours register
const HOUR_12: u8 = 1 << 6;

/// Alarm 1 day register: ignore the day, match h:m:s
const A1M4: u8 = 1 << 7;

/// DS3231 error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ds3231Error<E> {
    /// Bus transfer failed
    Bus(E),
    /// Registers hold a time outside 00:00:00..23:59:59
    InvalidTime,
}

/// DS3231 driver
pub struct Ds3231<B> {
    bus: B,
}

impl<B: I2cBus> Ds3231<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Prepare the clock for timer use
    ///
    /// Clears pending alarms, routes both alarms to INT, makes sure the
    /// oscillator runs and switches to 24-hour mode.
    pub fn init(&mut self) -> Result<(), Ds3231Error<B::Error>> {
        self.clear_status()?;
        self.bus
            .write_register(DS3231_ADDR, reg::CONTROL, 0)
            .map_err(Ds3231Error::Bus)?;
        self.bus
            .write_register(
                DS3231_ADDR,
                reg::CONTROL,
                control::INTCN | control::A2IE | control::A1IE,
            )
            .map_err(Ds3231Error::Bus)?;
        self.bus
            .update_register(DS3231_ADDR, reg::SECONDS, |v| v & !CLOCK_HALT)
            .map_err(Ds3231Error::Bus)?;
        self.bus
            .update_register(DS3231_ADDR, reg::HOURS, |v| v & !HOUR_12)
            .map_err(Ds3231Error::Bus)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("DS3231 initialized");

        Ok(())
    }

    fn read_hms(&mut self, start: u8) -> Result<TimeOfDay, Ds3231Error<B::Error>> {
        let mut raw = [0u8; 3];
        self.bus
            .read_registers(DS3231_ADDR, start, &mut raw)
            .map_err(Ds3231Error::Bus)?;
        decode(raw[2], raw[1], raw[0])
    }

    fn read_hm(&mut self, start: u8) -> Result<TimeOfDay, Ds3231Error<B::Error>> {
        let mut raw = [0u8; 2];
        self.bus
            .read_registers(DS3231_ADDR, start, &mut raw)
            .map_err(Ds3231Error::Bus)?;
        decode(raw[1], raw[0], 0)
    }

    /// Current time
    pub fn time(&mut self) -> Result<TimeOfDay, Ds3231Error<B::Error>> {
        self.read_hms(reg::SECONDS)
    }

    /// Set the current time
    ///
    /// Writing the seconds register also clears the oscillator-halt bit.
    pub fn set_time(&mut self, time: TimeOfDay) -> Result<(), Ds3231Error<B::Error>> {
        let raw = encode(time)?;
        self.bus
            .write_registers(DS3231_ADDR, reg::SECONDS, &raw)
            .map_err(Ds3231Error::Bus)
    }

    /// Alarm 1 time
    pub fn on_time(&mut self) -> Result<TimeOfDay, Ds3231Error<B::Error>> {
        self.read_hms(reg::ALARM1_SECONDS)
    }

    /// Program alarm 1 to fire daily at `time`
    pub fn set_on_time(&mut self, time: TimeOfDay) -> Result<(), Ds3231Error<B::Error>> {
        let [s, m, h] = encode(time)?;
        self.bus
            .write_registers(DS3231_ADDR, reg::ALARM1_SECONDS, &[s, m, h, A1M4])
            .map_err(Ds3231Error::Bus)
    }

    /// Alarm 2 time, seconds are always zero
    pub fn off_time(&mut self) -> Result<TimeOfDay, Ds3231Error<B::Error>> {
        self.read_hm(reg::ALARM2_MINUTES)
    }

    /// Store the switch-off time in alarm 2
    pub fn set_off_time(&mut self, time: TimeOfDay) -> Result<(), Ds3231Error<B::Error>> {
        let [_, m, h] = encode(time)?;
        self.bus
            .write_register(DS3231_ADDR, reg::ALARM2_MINUTES, m)
            .and_then(|()| self.bus.write_register(DS3231_ADDR, reg::ALARM2_HOURS, h))
            .map_err(Ds3231Error::Bus)
    }

    /// Arm or disarm both alarm interrupts
    ///
    /// INT stays routed to the alarms either way. Pending flags are
    /// cleared afterwards so the output is released.
    pub fn set_alarm_enabled(&mut self, enabled: bool) -> Result<(), Ds3231Error<B::Error>> {
        let value = if enabled {
            control::INTCN | control::A2IE | control::A1IE
        } else {
            control::INTCN
        };
        self.bus
            .write_register(DS3231_ADDR, reg::CONTROL, value)
            .map_err(Ds3231Error::Bus)?;
        self.clear_status()
    }

    /// Clear the alarm flags
    pub fn clear_status(&mut self) -> Result<(), Ds3231Error<B::Error>> {
        self.bus
            .write_register(DS3231_ADDR, reg::STATUS, 0)
            .map_err(Ds3231Error::Bus)
    }
}

/// Decode hours, minutes, seconds registers
fn decode<E>(hours: u8, minutes: u8, seconds: u8) -> Result<TimeOfDay, Ds3231Error<E>> {
    TimeOfDay::new(
        from_bcd(hours, BCD_TENS_HOURS),
        from_bcd(minutes, BCD_TENS_MINUTES),
        from_bcd(seconds, BCD_TENS_MINUTES),
    )
    .ok_or(Ds3231Error::InvalidTime)
}

/// Encode as `[seconds, minutes, hours]` in 24-hour mode
fn encode<E>(time: TimeOfDay) -> Result<[u8; 3], Ds3231Error<E>> {
    if !time.is_valid() {
        return Err(Ds3231Error::InvalidTime);
    }
    Ok([
        to_bcd(time.seconds),
        to_bcd(time.minutes),
        to_bcd(time.hours),
    ])
}

impl<B: I2cBus> RtcDevice for Ds3231<B> {
    type Error = Ds3231Error<B::Error>;

    fn time(&mut self) -> Result<TimeOfDay, Self::Error> {
        Ds3231::time(self)
    }

    fn set_time(&mut self, time: TimeOfDay) -> Result<(), Self::Error> {
        Ds3231::set_time(self, time)
    }

    fn on_time(&mut self) -> Result<TimeOfDay, Self::Error> {
        Ds3231::on_time(self)
    }

    fn set_on_time(&mut self, time: TimeOfDay) -> Result<(), Self::Error> {
        Ds3231::set_on_time(self, time)
    }

    fn off_time(&mut self) -> Result<TimeOfDay, Self::Error> {
        Ds3231::off_time(self)
    }

    fn set_off_time(&mut self, time: TimeOfDay) -> Result<(), Self::Error> {
        Ds3231::set_off_time(self, time)
    }

    fn set_alarm_enabled(&mut self, enabled: bool) -> Result<(), Self::Error> {
        Ds3231::set_alarm_enabled(self, enabled)
    }

    fn clear_status(&mut self) -> Result<(), Self::Error> {
        Ds3231::clear_status(self)
    }
}
