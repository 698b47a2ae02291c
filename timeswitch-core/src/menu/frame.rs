//! Off-screen frame buffer
//!
//! Screens are drawn into a [`Frame`] first. Only rows that differ from
//! what is already on the glass are sent to the display, which keeps the
//! slow character bus quiet and avoids flicker from full clears.

use core::convert::Infallible;

use crate::traits::{CharDisplay, DISPLAY_COLUMNS, DISPLAY_ROWS};

const COLS: usize = DISPLAY_COLUMNS as usize;
const ROWS: usize = DISPLAY_ROWS as usize;

/// 16x2 character buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    cells: [[u8; COLS]; ROWS],
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Blank frame
    pub const fn new() -> Self {
        Self {
            cells: [[b' '; COLS]; ROWS],
        }
    }

    /// Text of a row (all 16 columns)
    pub fn row(&self, row: u8) -> &str {
        self.cells
            .get(row as usize)
            .and_then(|cells| core::str::from_utf8(cells).ok())
            .unwrap_or("")
    }

    /// Send rows that differ from `shown` to the display
    ///
    /// With no previous frame the display is cleared and every row sent.
    pub fn flush<D: CharDisplay>(&self, shown: Option<&Frame>, display: &mut D) -> Result<(), D::Error> {
        if shown.is_none() {
            display.clear()?;
        }
        for row in 0..DISPLAY_ROWS {
            let changed = shown.map_or(true, |prev| prev.cells[row as usize] != self.cells[row as usize]);
            if changed {
                display.write_str_at(0, row, self.row(row))?;
            }
        }
        Ok(())
    }
}

impl CharDisplay for Frame {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Infallible> {
        self.cells = [[b' '; COLS]; ROWS];
        Ok(())
    }

    fn write_str_at(&mut self, col: u8, row: u8, text: &str) -> Result<(), Infallible> {
        if let Some(cells) = self.cells.get_mut(row as usize) {
            let start = (col as usize).min(COLS);
            for (cell, byte) in cells[start..].iter_mut().zip(text.bytes()) {
                // The controller ROM only maps ASCII reliably
                *cell = if byte.is_ascii() && !byte.is_ascii_control() {
                    byte
                } else {
                    b'?'
                };
            }
        }
        Ok(())
    }
}
