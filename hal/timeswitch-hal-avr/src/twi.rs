//! TWI register block for the ATmega8

use timeswitch_hal::twi::{bit_rate_for, Prescaler};

#[cfg(target_arch = "avr")]
use avr_device::atmega8::TWI;
#[cfg(target_arch = "avr")]
use timeswitch_hal::twi::TwiRegisters;

/// The on-chip TWI peripheral
#[cfg(target_arch = "avr")]
pub struct Atmega8Twi {
    twi: TWI,
}

#[cfg(target_arch = "avr")]
impl Atmega8Twi {
    /// Wrap the TWI peripheral taken from `avr_device::atmega8::Peripherals`
    pub fn new(twi: TWI) -> Self {
        Self { twi }
    }

    /// Give the peripheral back
    pub fn free(self) -> TWI {
        self.twi
    }
}

#[cfg(target_arch = "avr")]
impl TwiRegisters for Atmega8Twi {
    fn read_control(&mut self) -> u8 {
        self.twi.twcr().read().bits()
    }

    fn write_control(&mut self, value: u8) {
        self.twi.twcr().write(|w| unsafe { w.bits(value) });
    }

    fn read_status(&mut self) -> u8 {
        self.twi.twsr().read().bits()
    }

    fn write_status(&mut self, value: u8) {
        self.twi.twsr().write(|w| unsafe { w.bits(value) });
    }

    fn write_bit_rate(&mut self, value: u8) {
        self.twi.twbr().write(|w| unsafe { w.bits(value) });
    }

    fn read_data(&mut self) -> u8 {
        self.twi.twdr().read().bits()
    }

    fn write_data(&mut self, value: u8) {
        self.twi.twdr().write(|w| unsafe { w.bits(value) });
    }
}

/// Pick the smallest prescaler that reaches `scl_hz` at `cpu_hz`
///
/// Smaller prescalers give a finer bit-rate step, so they are tried first.
pub fn clock_settings(cpu_hz: u32, scl_hz: u32) -> Option<(u8, Prescaler)> {
    [
        Prescaler::Div1,
        Prescaler::Div4,
        Prescaler::Div16,
        Prescaler::Div64,
    ]
    .into_iter()
    .find_map(|p| bit_rate_for(cpu_hz, scl_hz, p).map(|twbr| (twbr, p)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeswitch_hal::twi::scl_frequency;

    #[test]
    fn test_clock_settings_prefers_fine_prescaler() {
        assert_eq!(
            clock_settings(16_000_000, 100_000),
            Some((72, Prescaler::Div1))
        );
    }

    #[test]
    fn test_clock_settings_slow_bus() {
        // 1 MHz internal oscillator, 1 kHz overflows TWBR without a prescaler
        let (twbr, prescaler) = clock_settings(1_000_000, 1_000).unwrap();
        assert_eq!((twbr, prescaler), (123, Prescaler::Div4));
        assert!(scl_frequency(1_000_000, twbr, prescaler) <= 1_000);
    }

    #[test]
    fn test_clock_settings_unreachable() {
        assert_eq!(clock_settings(1_000_000, 400_000), None);
        assert_eq!(clock_settings(16_000_000, 100), None);
        assert_eq!(clock_settings(1_000_000, 0), None);
    }
}
