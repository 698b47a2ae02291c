//! TWI bus controller and transfer primitives
//!
//! [`TwiMaster`] owns the register block. Its lifecycle is tracked in the
//! type: the bus primitives only exist on an `Enabled` controller, so a
//! transfer before `initialize()` or after `close()` does not compile.
//!
//! ```text
//! TwiMaster<R, Disabled> ──initialize()──▶ TwiMaster<R, Enabled>
//!          ▲  │ close()                            │
//!          │  └──────┘                             │
//!          └──────────────── close() ──────────────┘
//! ```

use core::marker::PhantomData;

use timeswitch_hal::twi::{
    control::{TWEA, TWEN, TWINT, TWSTA, TWSTO},
    scl_frequency,
    status::PRESCALER_MASK,
    Prescaler, TwiRegisters,
};

use super::status::{StatusCode, TwiError};
use super::wait::WaitPolicy;

/// Controller state: peripheral disabled
pub struct Disabled;

/// Controller state: peripheral enabled, bus primitives available
pub struct Enabled;

/// Bus controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwiConfig {
    /// Bit-rate register (TWBR) value
    pub bit_rate: u8,
    /// Bit-rate prescaler
    pub prescaler: Prescaler,
    /// How long to wait for each bus action
    pub wait: WaitPolicy,
}

impl Default for TwiConfig {
    fn default() -> Self {
        // ~3.7 kHz SCL on a 1 MHz core
        Self {
            bit_rate: 2,
            prescaler: Prescaler::Div64,
            wait: WaitPolicy::default(),
        }
    }
}

/// Acknowledge policy for a received byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckPolicy {
    /// Acknowledge, more bytes will follow
    Ack,
    /// Do not acknowledge, this is the last byte
    Nack,
}

/// 7-bit device address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

impl Address {
    /// Wrap a 7-bit address (bit 7 is ignored)
    pub const fn new(address: u8) -> Self {
        Self(address & 0x7F)
    }

    /// 7-bit address value
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Address byte for a write transfer (SLA+W)
    pub const fn write_byte(self) -> u8 {
        self.0 << 1
    }

    /// Address byte for a read transfer (SLA+R)
    pub const fn read_byte(self) -> u8 {
        (self.0 << 1) | 0x01
    }
}

/// TWI bus master
pub struct TwiMaster<R, S = Enabled> {
    regs: R,
    config: TwiConfig,
    _state: PhantomData<S>,
}

impl<R, S> TwiMaster<R, S> {
    /// Active configuration
    pub fn config(&self) -> &TwiConfig {
        &self.config
    }

    /// SCL frequency produced by the configuration at `cpu_hz`
    pub fn scl_frequency(&self, cpu_hz: u32) -> u32 {
        scl_frequency(cpu_hz, self.config.bit_rate, self.config.prescaler)
    }

    #[cfg(test)]
    pub(crate) fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    fn into_state<T>(self) -> TwiMaster<R, T> {
        TwiMaster {
            regs: self.regs,
            config: self.config,
            _state: PhantomData,
        }
    }
}

impl<R: TwiRegisters> TwiMaster<R, Disabled> {
    /// Wrap the register block; the peripheral is left untouched
    pub fn new(regs: R, config: TwiConfig) -> Self {
        Self {
            regs,
            config,
            _state: PhantomData,
        }
    }

    /// Program the bus clock and enable the peripheral
    pub fn initialize(mut self) -> TwiMaster<R, Enabled> {
        self.regs.write_bit_rate(self.config.bit_rate);
        let status = self.regs.read_status();
        self.regs
            .write_status((status & !PRESCALER_MASK) | self.config.prescaler.bits());
        self.regs.set_control_bits(TWEN);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "TWI enabled: TWBR={} prescaler={}",
            self.config.bit_rate,
            self.config.prescaler
        );

        self.into_state()
    }

    /// Clear the enable bit
    ///
    /// Closing a controller that was never enabled is harmless and leaves
    /// it ready for [`initialize`](Self::initialize).
    pub fn close(mut self) -> Self {
        self.regs.clear_control_bits(TWEN);
        self
    }

    /// Give the register block back
    pub fn release(self) -> R {
        self.regs
    }
}

impl<R: TwiRegisters> TwiMaster<R, Enabled> {
    /// Disable the peripheral
    pub fn close(mut self) -> TwiMaster<R, Disabled> {
        self.regs.clear_control_bits(TWEN);
        self.into_state()
    }

    /// Send a START (or repeated START) condition
    pub fn start(&mut self) -> Result<StatusCode, TwiError> {
        self.regs.write_control(TWINT | TWEN | TWSTA);
        self.wait_for_action()?;

        let status = self.status();
        if status.is_start() {
            Ok(status)
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("TWI start failed: {}", status);
            Err(TwiError::UnexpectedStatus(status))
        }
    }

    /// Send a STOP condition and wait until it is on the wire
    pub fn stop(&mut self) -> Result<(), TwiError> {
        self.regs.write_control(TWINT | TWEN | TWSTO);
        let regs = &mut self.regs;
        self.config
            .wait
            .wait_until(|| regs.read_control() & TWSTO == 0)
    }

    /// Transmit one byte (address or data) and check it was acknowledged
    pub fn write_byte(&mut self, value: u8) -> Result<StatusCode, TwiError> {
        self.regs.write_data(value);
        self.regs.write_control(TWEN | TWINT);
        self.wait_for_action()?;

        let status = self.status();
        if status.is_byte_accepted() {
            Ok(status)
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("TWI write {=u8:#x} failed: {}", value, status);
            Err(TwiError::from_write_status(status))
        }
    }

    /// Receive one byte, answering with `ack`
    pub fn read_byte(&mut self, ack: AckPolicy) -> Result<u8, TwiError> {
        // TWEA must be in place before TWINT releases the bus
        match ack {
            AckPolicy::Ack => self.regs.set_control_bits(TWEA),
            AckPolicy::Nack => self.regs.clear_control_bits(TWEA),
        }
        self.regs.set_control_bits(TWINT);
        self.wait_for_action()?;

        let status = self.status();
        if status.is_byte_received() {
            Ok(self.regs.read_data())
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("TWI read failed: {}", status);
            Err(TwiError::UnexpectedStatus(status))
        }
    }

    fn wait_for_action(&mut self) -> Result<(), TwiError> {
        let regs = &mut self.regs;
        self.config
            .wait
            .wait_until(|| regs.read_control() & TWINT != 0)
    }

    fn status(&mut self) -> StatusCode {
        StatusCode::decode(self.regs.read_status())
    }
}
