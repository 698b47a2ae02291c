//! Bus trait implementations for the TWI master
//!
//! [`I2cBus`] gives the register-access convention used by device
//! drivers; `embedded_hal::i2c::I2c` lets third-party drivers share the bus.

use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
use timeswitch_hal::{twi::TwiRegisters, I2cBus};

use super::master::{AckPolicy, Address, Enabled, TwiMaster};
use super::status::TwiError;
use super::transaction::{Addressing, Receiving, Transaction, Transmitting};

impl<R: TwiRegisters> I2cBus for TwiMaster<R, Enabled> {
    type Error = TwiError;

    fn write_parts(&mut self, address: u8, parts: &[&[u8]]) -> Result<(), TwiError> {
        let session = self.start_transaction()?.address_write(Address::new(address))?;
        parts
            .iter()
            .try_fold(session, |session, part| session.write_all(part))?
            .finish()
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), TwiError> {
        if buf.is_empty() {
            return Ok(());
        }
        self.start_transaction()?
            .address_read(Address::new(address))?
            .read_to_end(buf)?
            .finish()
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), TwiError> {
        let address = Address::new(address);
        let session = self
            .start_transaction()?
            .address_write(address)?
            .write_all(write_data)?;
        if read_buf.is_empty() {
            return session.finish();
        }
        session
            .restart()?
            .address_read(address)?
            .read_to_end(read_buf)?
            .finish()
    }
}

impl<R: TwiRegisters> ErrorType for TwiMaster<R, Enabled> {
    type Error = TwiError;
}

/// A read with nothing to receive puts nothing on the bus
fn is_empty_read(operation: &Operation<'_>) -> bool {
    matches!(operation, Operation::Read(buf) if buf.is_empty())
}

/// Where an `I2c::transaction` currently is
enum Phase<'a, R: TwiRegisters> {
    Addressing(Transaction<'a, R, Addressing>),
    Transmitting(Transaction<'a, R, Transmitting>),
    Receiving(Transaction<'a, R, Receiving>),
}

impl<R: TwiRegisters> I2c<SevenBitAddress> for TwiMaster<R, Enabled> {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), TwiError> {
        if operations.iter().all(is_empty_read) {
            return Ok(());
        }

        let address = Address::new(address);
        let mut phase = Phase::Addressing(Transaction::begin(self)?);

        for i in 0..operations.len() {
            if is_empty_read(&operations[i]) {
                continue;
            }

            // Adjacent reads form one run; only the end of a run is NACKed
            let next_is_read = matches!(
                operations[i + 1..].iter().find(|op| !is_empty_read(op)),
                Some(Operation::Read(_))
            );
            let last = if next_is_read {
                AckPolicy::Ack
            } else {
                AckPolicy::Nack
            };

            phase = match (phase, &mut operations[i]) {
                (Phase::Addressing(t), Operation::Write(bytes)) => {
                    Phase::Transmitting(t.address_write(address)?.write_all(bytes)?)
                }
                (Phase::Addressing(t), Operation::Read(buf)) => {
                    Phase::Receiving(t.address_read(address)?.read(buf, last)?)
                }
                (Phase::Transmitting(t), Operation::Write(bytes)) => {
                    Phase::Transmitting(t.write_all(bytes)?)
                }
                (Phase::Transmitting(t), Operation::Read(buf)) => Phase::Receiving(
                    t.restart()?.address_read(address)?.read(buf, last)?,
                ),
                (Phase::Receiving(t), Operation::Read(buf)) => {
                    Phase::Receiving(t.read(buf, last)?)
                }
                (Phase::Receiving(t), Operation::Write(bytes)) => Phase::Transmitting(
                    t.restart()?.address_write(address)?.write_all(bytes)?,
                ),
            };
        }

        match phase {
            Phase::Addressing(t) => t.finish(),
            Phase::Transmitting(t) => t.finish(),
            Phase::Receiving(t) => t.finish(),
        }
    }
}
