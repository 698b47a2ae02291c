//! Time of day and BCD encoding
//!
//! The clock only deals in a 24-hour time of day; there is no date.

use core::fmt::Write;

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tens-digit mask for BCD seconds and minutes
pub const BCD_TENS_MINUTES: u8 = 0x70;

/// Tens-digit mask for BCD hours in 24-hour mode
pub const BCD_TENS_HOURS: u8 = 0x30;

/// Units-digit mask for all BCD fields
pub const BCD_UNITS: u8 = 0x0F;

/// Encode a value below 100 as packed BCD
pub const fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Decode packed BCD, keeping only the tens bits selected by `tens_mask`
///
/// Control bits that share the register (oscillator halt, 12/24-hour
/// select, alarm mask) fall outside the mask and are ignored.
pub const fn from_bcd(raw: u8, tens_mask: u8) -> u8 {
    ((raw & tens_mask) >> 4) * 10 + (raw & BCD_UNITS)
}

/// Editable time field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Hours,
    Minutes,
    Seconds,
}

impl Field {
    /// Number of values the field cycles through
    pub const fn modulus(self) -> u8 {
        match self {
            Field::Hours => 24,
            Field::Minutes | Field::Seconds => 60,
        }
    }
}

/// 24-hour time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl TimeOfDay {
    /// 00:00:00
    pub const MIDNIGHT: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Build a time, rejecting out-of-range fields
    pub const fn new(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        if hours < 24 && minutes < 60 && seconds < 60 {
            Some(Self {
                hours,
                minutes,
                seconds,
            })
        } else {
            None
        }
    }

    /// Hours and minutes only
    pub const fn hm(hours: u8, minutes: u8) -> Option<Self> {
        Self::new(hours, minutes, 0)
    }

    /// Check every field is in range
    pub const fn is_valid(&self) -> bool {
        self.hours < 24 && self.minutes < 60 && self.seconds < 60
    }

    pub const fn get(&self, field: Field) -> u8 {
        match field {
            Field::Hours => self.hours,
            Field::Minutes => self.minutes,
            Field::Seconds => self.seconds,
        }
    }

    fn slot(&mut self, field: Field) -> &mut u8 {
        match field {
            Field::Hours => &mut self.hours,
            Field::Minutes => &mut self.minutes,
            Field::Seconds => &mut self.seconds,
        }
    }

    /// Step a field up, wrapping 23 -> 0 or 59 -> 0
    ///
    /// Other fields are left alone (no carry).
    pub fn increment(&mut self, field: Field) {
        let modulus = field.modulus();
        let slot = self.slot(field);
        *slot = if *slot + 1 >= modulus { 0 } else { *slot + 1 };
    }

    /// Step a field down, wrapping 0 -> 23 or 0 -> 59
    pub fn decrement(&mut self, field: Field) {
        let modulus = field.modulus();
        let slot = self.slot(field);
        *slot = if *slot == 0 || *slot >= modulus {
            modulus - 1
        } else {
            *slot - 1
        };
    }

    /// Same hour and minute, seconds ignored
    pub const fn same_minute(&self, other: &TimeOfDay) -> bool {
        self.hours == other.hours && self.minutes == other.minutes
    }

    /// Format as `hh:mm:ss`
    pub fn format_hms(&self) -> String<8> {
        let mut s = String::new();
        // Eight characters always fit
        let _ = write!(s, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds);
        s
    }

    /// Format as `hh:mm`
    pub fn format_hm(&self) -> String<5> {
        let mut s = String::new();
        let _ = write!(s, "{:02}:{:02}", self.hours, self.minutes);
        s
    }
}
