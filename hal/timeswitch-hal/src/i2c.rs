//! I2C bus abstractions
//!
//! Provides the byte-level bus master trait implemented by the TWI
//! driver, and the device-register convention layered on top of it.

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices. Every call is one complete transaction bracketed
/// by START and STOP.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write several buffers back-to-back in a single transfer
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `parts` - Buffers sent in order, with no repeated START between them
    fn write_parts(&mut self, address: u8, parts: &[&[u8]]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// Every byte but the last is acknowledged; the last one is NACKed.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.write_parts(address, &[data])
    }
}

/// Device register convention
///
/// Register-addressed devices (RTCs, sensors, port expanders) take the
/// register address as the first written byte. Reads send the register
/// address, then issue a repeated START in read direction:
///
/// ```text
/// write: S  SLA+W  reg  value  P
/// read:  S  SLA+W  reg  Sr  SLA+R  value(NACK)  P
/// ```
///
/// Any failing step aborts the transaction and releases the bus.
pub trait RegisterAccess: I2cBus {
    /// Write a single register
    fn write_register(&mut self, device: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.write_parts(device, &[&[register], &[value]])
    }

    /// Read a single register
    fn read_register(&mut self, device: u8, register: u8) -> Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.write_read(device, &[register], &mut value)?;
        Ok(value[0])
    }

    /// Write consecutive registers starting at `start`
    ///
    /// Relies on the device auto-incrementing its register pointer.
    fn write_registers(&mut self, device: u8, start: u8, values: &[u8]) -> Result<(), Self::Error> {
        self.write_parts(device, &[&[start], values])
    }

    /// Read consecutive registers starting at `start`
    fn read_registers(
        &mut self,
        device: u8,
        start: u8,
        values: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.write_read(device, &[start], values)
    }

    /// Read-modify-write a single register
    ///
    /// Returns the value that was written back.
    fn update_register<F>(&mut self, device: u8, register: u8, f: F) -> Result<u8, Self::Error>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = f(self.read_register(device, register)?);
        self.write_register(device, register, value)?;
        Ok(value)
    }
}

// Blanket implementation for all bus masters
impl<T: I2cBus + ?Sized> RegisterAccess for T {}
