//! Two-wire interface (TWI) peripheral abstraction
//!
//! The TWI peripheral is driven through four 8-bit registers:
//!
//! ```text
//! TWCR  control   │ TWINT │ TWEA │ TWSTA │ TWSTO │ TWWC │ TWEN │  -  │ TWIE │
//! TWSR  status    │        status (7..3)          │  -  │   TWPS (1..0)   │
//! TWBR  bit rate  │                  bit-rate divisor                     │
//! TWDR  data      │             byte to send / byte received              │
//! ```
//!
//! The driver polls and never writes TWDR while an action is pending, so
//! `TWWC` and `TWIE` stay clear.
//!
//! A chip HAL exposes the register file through [`TwiRegisters`]; the
//! bus protocol itself lives in the driver crate.

/// Control register (TWCR) bits
pub mod control {
    /// Action complete flag. Writing 1 clears it and starts the next action.
    pub const TWINT: u8 = 0x80;
    /// Return ACK after the next received byte
    pub const TWEA: u8 = 0x40;
    /// Request a START condition
    pub const TWSTA: u8 = 0x20;
    /// Request a STOP condition, cleared by hardware once sent
    pub const TWSTO: u8 = 0x10;
    /// Peripheral enable
    pub const TWEN: u8 = 0x04;
}

/// Status register (TWSR) fields
pub mod status {
    /// Significant status bits
    pub const STATUS_MASK: u8 = 0xF8;
    /// Prescaler select bits
    pub const PRESCALER_MASK: u8 = 0x03;
}

/// Raw access to the TWI register file
///
/// Reads take `&mut self` because reading hardware registers is not
/// free of side effects on every part, and simulated peripherals advance
/// their state when polled.
pub trait TwiRegisters {
    /// Read the control register (TWCR)
    fn read_control(&mut self) -> u8;

    /// Write the control register (TWCR)
    fn write_control(&mut self, value: u8);

    /// Read the raw status register (TWSR), prescaler bits included
    fn read_status(&mut self) -> u8;

    /// Write the status register (only the prescaler bits are writable)
    fn write_status(&mut self, value: u8);

    /// Write the bit-rate register (TWBR)
    fn write_bit_rate(&mut self, value: u8);

    /// Read the data register (TWDR)
    fn read_data(&mut self) -> u8;

    /// Write the data register (TWDR)
    fn write_data(&mut self, value: u8);

    /// Set bits in the control register without clearing `TWINT`
    ///
    /// A read-modify-write would write back a set `TWINT` and start the
    /// next bus action by accident, so the flag is masked off first.
    fn set_control_bits(&mut self, bits: u8) {
        let value = self.read_control() & !control::TWINT;
        self.write_control(value | bits);
    }

    /// Clear bits in the control register without clearing `TWINT`
    fn clear_control_bits(&mut self, bits: u8) {
        let value = self.read_control() & !control::TWINT;
        self.write_control(value & !bits);
    }
}

/// Bit-rate prescaler (TWPS1..0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    /// Divide by 1
    #[default]
    Div1,
    /// Divide by 4
    Div4,
    /// Divide by 16
    Div16,
    /// Divide by 64
    Div64,
}

impl Prescaler {
    /// TWPS register bits
    pub const fn bits(self) -> u8 {
        match self {
            Prescaler::Div1 => 0,
            Prescaler::Div4 => 1,
            Prescaler::Div16 => 2,
            Prescaler::Div64 => 3,
        }
    }

    /// Decode from TWSR (only the two prescaler bits are considered)
    pub const fn from_bits(bits: u8) -> Self {
        match bits & status::PRESCALER_MASK {
            0 => Prescaler::Div1,
            1 => Prescaler::Div4,
            2 => Prescaler::Div16,
            _ => Prescaler::Div64,
        }
    }

    /// Division factor
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div4 => 4,
            Prescaler::Div16 => 16,
            Prescaler::Div64 => 64,
        }
    }

    /// Parse the division factor used in configuration files
    pub const fn from_divisor(divisor: u32) -> Option<Self> {
        match divisor {
            1 => Some(Prescaler::Div1),
            4 => Some(Prescaler::Div4),
            16 => Some(Prescaler::Div16),
            64 => Some(Prescaler::Div64),
            _ => None,
        }
    }
}

/// SCL frequency for a given CPU clock, bit rate and prescaler
///
/// `f_scl = f_cpu / (16 + 2 * TWBR * prescaler)`
pub const fn scl_frequency(cpu_hz: u32, bit_rate: u8, prescaler: Prescaler) -> u32 {
    cpu_hz / (16 + 2 * bit_rate as u32 * prescaler.divisor())
}

/// Smallest bit-rate value whose SCL frequency does not exceed `scl_hz`
///
/// Returns `None` if the target cannot be reached with this prescaler.
pub const fn bit_rate_for(cpu_hz: u32, scl_hz: u32, prescaler: Prescaler) -> Option<u8> {
    if scl_hz == 0 || cpu_hz / scl_hz < 16 {
        return None;
    }
    let cycles = cpu_hz / scl_hz - 16;
    let step = 2 * prescaler.divisor();
    let twbr = (cycles + step - 1) / step;
    if twbr > u8::MAX as u32 {
        None
    } else {
        Some(twbr as u8)
    }
}
