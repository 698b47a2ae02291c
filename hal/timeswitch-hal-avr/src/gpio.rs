//! GPIO pins for the ATmega8
//!
//! Pins are identified at runtime by port and bit so board wiring can be
//! chosen in the firmware configuration file.

use core::marker::PhantomData;

/// I/O port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    B,
    C,
    D,
}

impl Port {
    /// Number of bonded pins on the port
    pub const fn width(self) -> u8 {
        match self {
            Port::C => 7,
            Port::B | Port::D => 8,
        }
    }
}

/// Pin identifier parsed from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinSpec {
    pub port: Port,
    pub bit: u8,
}

impl PinSpec {
    /// Parse a pin name such as `"PB1"` or `"PD6"`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let mut chars = s.chars();
        if chars.next()? != 'P' {
            return None;
        }
        let port = match chars.next()? {
            'B' => Port::B,
            'C' => Port::C,
            'D' => Port::D,
            _ => return None,
        };
        let bit: u8 = chars.as_str().parse().ok()?;
        if bit >= port.width() {
            return None;
        }
        Some(Self { port, bit })
    }

    /// Bit mask within the port registers
    pub const fn mask(self) -> u8 {
        1 << self.bit
    }
}

/// Pin mode marker: input with pull-up
pub struct Input;

/// Pin mode marker: push-pull output
pub struct Output;

/// A single port pin in mode `M`
pub struct Pin<M> {
    spec: PinSpec,
    _mode: PhantomData<M>,
}

/// Run `$body` with `$reg` bound to the named register of `$port`
#[cfg(target_arch = "avr")]
macro_rules! with_register {
    ($port:expr, [$b:ident, $c:ident, $d:ident], |$reg:ident| $body:expr) => {{
        use avr_device::atmega8::{PORTB, PORTC, PORTD};
        // SAFETY: the port register blocks are always mapped. Interrupts
        // are never enabled, so read-modify-writes cannot race.
        match $port {
            Port::B => {
                let $reg = unsafe { &*PORTB::ptr() }.$b();
                $body
            }
            Port::C => {
                let $reg = unsafe { &*PORTC::ptr() }.$c();
                $body
            }
            Port::D => {
                let $reg = unsafe { &*PORTD::ptr() }.$d();
                $body
            }
        }
    }};
}

#[cfg(target_arch = "avr")]
fn modify_direction(port: Port, f: impl Fn(u8) -> u8) {
    with_register!(port, [ddrb, ddrc, ddrd], |ddr| {
        ddr.modify(|r, w| unsafe { w.bits(f(r.bits())) });
    })
}

#[cfg(target_arch = "avr")]
fn modify_output(port: Port, f: impl Fn(u8) -> u8) {
    with_register!(port, [portb, portc, portd], |out| {
        out.modify(|r, w| unsafe { w.bits(f(r.bits())) });
    })
}

#[cfg(target_arch = "avr")]
fn read_input(port: Port) -> u8 {
    with_register!(port, [pinb, pinc, pind], |pin| pin.read().bits())
}

#[cfg(target_arch = "avr")]
impl Pin<Input> {
    /// Configure a pin as input with the internal pull-up enabled
    ///
    /// # Safety
    ///
    /// The caller must not hold another handle to the same pin.
    pub unsafe fn pull_up_input(spec: PinSpec) -> Self {
        let mask = spec.mask();
        modify_direction(spec.port, |v| v & !mask);
        modify_output(spec.port, |v| v | mask);
        Self {
            spec,
            _mode: PhantomData,
        }
    }
}

#[cfg(target_arch = "avr")]
impl Pin<Output> {
    /// Configure a pin as push-pull output, initially low
    ///
    /// # Safety
    ///
    /// The caller must not hold another handle to the same pin.
    pub unsafe fn output(spec: PinSpec) -> Self {
        let mask = spec.mask();
        modify_output(spec.port, |v| v & !mask);
        modify_direction(spec.port, |v| v | mask);
        Self {
            spec,
            _mode: PhantomData,
        }
    }
}

impl<M> Pin<M> {
    /// Pin identifier
    pub fn spec(&self) -> PinSpec {
        self.spec
    }
}

#[cfg(target_arch = "avr")]
impl timeswitch_hal::InputPin for Pin<Input> {
    fn is_high(&self) -> bool {
        read_input(self.spec.port) & self.spec.mask() != 0
    }
}

#[cfg(target_arch = "avr")]
impl timeswitch_hal::OutputPin for Pin<Output> {
    fn set_high(&mut self) {
        let mask = self.spec.mask();
        modify_output(self.spec.port, |v| v | mask);
    }

    fn set_low(&mut self) {
        let mask = self.spec.mask();
        modify_output(self.spec.port, |v| v & !mask);
    }
}
