//! Character display trait

/// Columns on the display
pub const DISPLAY_COLUMNS: u8 = 16;

/// Rows on the display
pub const DISPLAY_ROWS: u8 = 2;

/// Fixed-cell character display (16x2)
///
/// Text that runs past the last column is cut off by the implementation.
pub trait CharDisplay {
    /// Error type for display operations
    type Error;

    /// Blank the whole display and home the cursor
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Write ASCII text starting at `col`, `row`
    fn write_str_at(&mut self, col: u8, row: u8, text: &str) -> Result<(), Self::Error>;

    /// Write a number zero-padded to `width` digits
    ///
    /// Values wider than `width` keep their low-order digits.
    fn write_int_at(&mut self, col: u8, row: u8, value: u16, width: u8) -> Result<(), Self::Error> {
        let mut digits = [b'0'; 5];
        let width = (width as usize).clamp(1, digits.len());
        let mut v = value;
        for d in digits[..width].iter_mut().rev() {
            *d = b'0' + (v % 10) as u8;
            v /= 10;
        }
        let text = core::str::from_utf8(&digits[..width]).unwrap_or("");
        self.write_str_at(col, row, text)
    }
}
