//! Configuration type definitions
//!
//! Every section has defaults matching the reference board (ATmega8 on
//! its 1 MHz internal oscillator, DS3231 clock, 16x2 LCD on port D,
//! buttons on PB1..PB3), so a config file only lists what differs.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum pin name length (`"PB1"`)
pub const MAX_PIN_NAME_LEN: usize = 4;

/// Pin name as written in the config file
pub type PinName = String<MAX_PIN_NAME_LEN>;

fn pin(name: &str) -> PinName {
    PinName::try_from(name).unwrap_or_default()
}

/// Configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// CPU clock must be non-zero
    ZeroCpuClock,
    /// Prescaler must be 1, 4, 16 or 64
    InvalidPrescaler(u8),
    /// A requested bus clock must be non-zero
    ZeroBusClock,
    /// Messages must show for at least one tick
    ZeroMessageTicks,
    /// Main-loop period must be non-zero
    ZeroTickPeriod,
    /// The same pin is assigned twice
    DuplicatePin,
}

/// User interface timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UiConfig {
    /// Ticks a confirmation message stays up
    pub message_ticks: u8,
    /// Main-loop period in milliseconds
    pub tick_ms: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        // One second of message at 50 ms per tick
        Self {
            message_ticks: 20,
            tick_ms: 50,
        }
    }
}

/// Two-wire bus settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BusConfig {
    /// Bit-rate register value
    pub bit_rate: u8,
    /// Bit-rate prescaler (1, 4, 16 or 64)
    pub prescaler: u8,
    /// Poll budget per bus action; 0 waits forever
    pub max_polls: u32,
    /// Target SCL frequency in Hz; derives `bit_rate` and `prescaler` when set
    pub scl_hz: Option<u32>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            bit_rate: 2,
            prescaler: 64,
            max_polls: 10_000,
            scl_hz: None,
        }
    }
}

/// Board wiring
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinConfig {
    /// Left, Right, Enter buttons (active low)
    pub keys: [PinName; 3],
    /// LCD D4..D7
    pub lcd_data: [PinName; 4],
    /// LCD register select
    pub lcd_rs: PinName,
    /// LCD read/write
    pub lcd_rw: PinName,
    /// LCD enable strobe
    pub lcd_enable: PinName,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            keys: [pin("PB1"), pin("PB2"), pin("PB3")],
            lcd_data: [pin("PD0"), pin("PD1"), pin("PD2"), pin("PD3")],
            lcd_rs: pin("PD6"),
            lcd_rw: pin("PD5"),
            lcd_enable: pin("PD4"),
        }
    }
}

impl PinConfig {
    /// Every assigned pin
    pub fn all(&self) -> impl Iterator<Item = &PinName> {
        self.keys
            .iter()
            .chain(self.lcd_data.iter())
            .chain([&self.lcd_rs, &self.lcd_rw, &self.lcd_enable])
    }
}

/// Complete firmware configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FirmwareConfig {
    /// CPU clock in Hz
    pub cpu_hz: u32,
    pub bus: BusConfig,
    pub ui: UiConfig,
    pub pins: PinConfig,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            cpu_hz: 1_000_000,
            bus: BusConfig::default(),
            ui: UiConfig::default(),
            pins: PinConfig::default(),
        }
    }
}

impl FirmwareConfig {
    /// Check values the types alone cannot rule out
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cpu_hz == 0 {
            return Err(ConfigError::ZeroCpuClock);
        }
        if ![1, 4, 16, 64].contains(&self.bus.prescaler) {
            return Err(ConfigError::InvalidPrescaler(self.bus.prescaler));
        }
        if self.bus.scl_hz == Some(0) {
            return Err(ConfigError::ZeroBusClock);
        }
        if self.ui.message_ticks == 0 {
            return Err(ConfigError::ZeroMessageTicks);
        }
        if self.ui.tick_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }

        let pins = &self.pins;
        for (i, a) in pins.all().enumerate() {
            if pins.all().skip(i + 1).any(|b| a == b) {
                return Err(ConfigError::DuplicatePin);
            }
        }
        Ok(())
    }
}
