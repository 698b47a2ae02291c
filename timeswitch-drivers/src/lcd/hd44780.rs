//! HD44780 character LCD (4-bit parallel)
//!
//! Only D4..D7 are wired; every byte goes out as two nibbles, high
//! first, latched on the falling edge of E. RW is held low and the busy
//! flag is never read, so each command is followed by its worst-case
//! execution time instead.

use embedded_hal::delay::DelayNs;
use timeswitch_core::traits::{CharDisplay, DISPLAY_COLUMNS, DISPLAY_ROWS};
use timeswitch_hal::gpio::OutputPin;

/// Controller commands
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const ENTRY_MODE: u8 = 0x04;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const SET_DDRAM: u8 = 0x80;

    /// Entry mode: move the cursor right after each character
    pub const ENTRY_INCREMENT: u8 = 0x02;
    /// Display control: display on
    pub const DISPLAY_ON: u8 = 0x04;
    /// Function set: two lines, 5x8 font, 4-bit bus
    pub const TWO_LINES: u8 = 0x08;
}

/// Start address of each row in display RAM
const ROW_OFFSETS: [u8; DISPLAY_ROWS as usize] = [0x00, 0x40];

/// Wait after power-up before the first command (µs)
const POWER_UP_US: u32 = 40_000;
/// Execution time of clear and home (µs)
const CLEAR_US: u32 = 2_000;
/// Execution time of every other command and data write (µs)
const COMMAND_US: u32 = 50;

/// Cursor appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CursorStyle {
    #[default]
    Hidden,
    Underline,
    Blink,
    UnderlineBlink,
}

impl CursorStyle {
    /// Cursor bits of the display control command
    const fn bits(self) -> u8 {
        match self {
            CursorStyle::Hidden => 0b00,
            CursorStyle::Underline => 0b10,
            CursorStyle::Blink => 0b01,
            CursorStyle::UnderlineBlink => 0b11,
        }
    }
}

/// LCD error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError {
    /// Column or row outside the 16x2 area
    InvalidPosition { col: u8, row: u8 },
}

/// Pins wired to the controller
pub struct LcdPins<P> {
    /// D4..D7
    pub data: [P; 4],
    pub rs: P,
    pub rw: P,
    pub enable: P,
}

/// HD44780 driver
pub struct Hd44780<P, D> {
    pins: LcdPins<P>,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    pub fn new(pins: LcdPins<P>, delay: D) -> Self {
        Self { pins, delay }
    }

    /// Run the 4-bit initialization sequence
    ///
    /// The controller may power up in either bus width, so it is first
    /// forced into 8-bit mode with three bare nibbles and then switched
    /// to 4-bit.
    pub fn init(&mut self, cursor: CursorStyle) {
        self.pins.rw.set_low();
        self.pins.rs.set_low();
        self.pins.enable.set_low();
        self.delay.delay_us(POWER_UP_US);

        self.write_nibble(0x3);
        self.delay.delay_us(4_100);
        self.write_nibble(0x3);
        self.delay.delay_us(100);
        self.write_nibble(0x3);
        self.delay.delay_us(COMMAND_US);
        self.write_nibble(0x2);
        self.delay.delay_us(COMMAND_US);

        self.command(cmd::FUNCTION_SET | cmd::TWO_LINES);
        self.set_cursor_style(cursor);
        self.clear();
        self.command(cmd::ENTRY_MODE | cmd::ENTRY_INCREMENT);

        #[cfg(feature = "defmt")]
        defmt::debug!("LCD initialized");
    }

    /// Switch the display on with the given cursor
    pub fn set_cursor_style(&mut self, cursor: CursorStyle) {
        self.command(cmd::DISPLAY_CONTROL | cmd::DISPLAY_ON | cursor.bits());
    }

    /// Blank the display and home the cursor
    pub fn clear(&mut self) {
        self.command(cmd::CLEAR);
        self.delay.delay_us(CLEAR_US);
    }

    /// Move the cursor
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), LcdError> {
        if col >= DISPLAY_COLUMNS || row >= DISPLAY_ROWS {
            return Err(LcdError::InvalidPosition { col, row });
        }
        self.command(cmd::SET_DDRAM | (ROW_OFFSETS[row as usize] + col));
        Ok(())
    }

    /// Write text at the cursor
    ///
    /// Bytes outside printable ASCII are shown as `?`. The controller
    /// does not wrap to the next row.
    pub fn write_str(&mut self, text: &str) {
        for byte in text.bytes() {
            let byte = if byte.is_ascii() && !byte.is_ascii_control() {
                byte
            } else {
                b'?'
            };
            self.data(byte);
        }
    }

    /// Give the pins and delay back
    pub fn release(self) -> (LcdPins<P>, D) {
        (self.pins, self.delay)
    }

    fn command(&mut self, value: u8) {
        self.pins.rs.set_low();
        self.write_byte(value);
    }

    fn data(&mut self, value: u8) {
        self.pins.rs.set_high();
        self.write_byte(value);
    }

    fn write_byte(&mut self, value: u8) {
        self.write_nibble(value >> 4);
        self.write_nibble(value & 0x0F);
        self.delay.delay_us(COMMAND_US);
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (bit, pin) in self.pins.data.iter_mut().enumerate() {
            pin.set_state(nibble & (1 << bit) != 0);
        }
        self.pins.enable.set_high();
        self.delay.delay_us(1);
        self.pins.enable.set_low();
        self.delay.delay_us(1);
    }
}

impl<P: OutputPin, D: DelayNs> CharDisplay for Hd44780<P, D> {
    type Error = LcdError;

    fn clear(&mut self) -> Result<(), LcdError> {
        Hd44780::clear(self);
        Ok(())
    }

    fn write_str_at(&mut self, col: u8, row: u8, text: &str) -> Result<(), LcdError> {
        self.set_cursor(col, row)?;
        let room = (DISPLAY_COLUMNS - col) as usize;
        let end = text
            .char_indices()
            .map(|(i, _)| i)
            .nth(room)
            .unwrap_or(text.len());
        self.write_str(&text[..end]);
        Ok(())
    }
}
