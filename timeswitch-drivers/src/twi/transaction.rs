//! START..STOP session type
//!
//! A [`Transaction`] borrows the enabled controller for the whole span
//! between START and STOP, so no other transfer can interleave. Each
//! state only offers the steps that are legal on the wire:
//!
//! ```text
//! begin() ──▶ Addressing ──address_write()──▶ Transmitting ──write()──┐
//!                 ▲   │                            │  ▲───────────────┘
//!                 │   └──address_read()──▶ Receiving ──read()──┐
//!                 │                          │  ▲──────────────┘
//!                 └────────── restart() ─────┴──┘
//!
//! finish() from any state sends STOP
//! ```
//!
//! Every step consumes the session. When a step fails the session sends
//! STOP before returning the error, so the bus is released and the
//! controller is ready for the next transaction.

use core::marker::PhantomData;

use timeswitch_hal::twi::TwiRegisters;

use super::master::{AckPolicy, Address, Enabled, TwiMaster};
use super::status::TwiError;

/// Session state: START sent, waiting for an address byte
pub struct Addressing;

/// Session state: addressed for writing
pub struct Transmitting;

/// Session state: addressed for reading
pub struct Receiving;

/// An open bus transaction
#[must_use = "a transaction holds the bus until `finish()` sends STOP"]
pub struct Transaction<'a, R: TwiRegisters, S> {
    master: &'a mut TwiMaster<R, Enabled>,
    _state: PhantomData<S>,
}

impl<'a, R: TwiRegisters, S> Transaction<'a, R, S> {
    fn into_state<T>(self) -> Transaction<'a, R, T> {
        Transaction {
            master: self.master,
            _state: PhantomData,
        }
    }

    /// Release the bus after a failed step and hand back the error
    fn abort(self, error: TwiError) -> TwiError {
        #[cfg(feature = "defmt")]
        defmt::debug!("TWI transaction aborted: {}", error);

        // The step error is what the caller needs; a failing STOP adds nothing
        let _ = self.master.stop();
        error
    }

    /// Send STOP and end the transaction
    pub fn finish(self) -> Result<(), TwiError> {
        self.master.stop()
    }
}

impl<'a, R: TwiRegisters> Transaction<'a, R, Addressing> {
    /// Send START and open a transaction
    pub fn begin(master: &'a mut TwiMaster<R, Enabled>) -> Result<Self, TwiError> {
        let session = Self {
            master,
            _state: PhantomData,
        };
        match session.master.start() {
            Ok(_) => Ok(session),
            Err(e) => Err(session.abort(e)),
        }
    }

    /// Address a device for writing (SLA+W)
    pub fn address_write(self, address: Address) -> Result<Transaction<'a, R, Transmitting>, TwiError> {
        match self.master.write_byte(address.write_byte()) {
            Ok(_) => Ok(self.into_state()),
            Err(e) => Err(self.abort(e)),
        }
    }

    /// Address a device for reading (SLA+R)
    pub fn address_read(self, address: Address) -> Result<Transaction<'a, R, Receiving>, TwiError> {
        match self.master.write_byte(address.read_byte()) {
            Ok(_) => Ok(self.into_state()),
            Err(e) => Err(self.abort(e)),
        }
    }
}

impl<'a, R: TwiRegisters> Transaction<'a, R, Transmitting> {
    /// Send one data byte
    pub fn write(self, byte: u8) -> Result<Self, TwiError> {
        match self.master.write_byte(byte) {
            Ok(_) => Ok(self),
            Err(e) => Err(self.abort(e)),
        }
    }

    /// Send data bytes, stopping at the first refused byte
    pub fn write_all(self, bytes: &[u8]) -> Result<Self, TwiError> {
        bytes.iter().try_fold(self, |session, &byte| session.write(byte))
    }

    /// Send a repeated START
    pub fn restart(self) -> Result<Transaction<'a, R, Addressing>, TwiError> {
        restart(self)
    }
}

impl<'a, R: TwiRegisters> Transaction<'a, R, Receiving> {
    /// Receive one byte
    pub fn read_byte(self, ack: AckPolicy) -> Result<(Self, u8), TwiError> {
        match self.master.read_byte(ack) {
            Ok(byte) => Ok((self, byte)),
            Err(e) => Err(self.abort(e)),
        }
    }

    /// Fill `buf`, acknowledging every byte except the last, which is
    /// answered with `last`
    pub fn read(self, buf: &mut [u8], last: AckPolicy) -> Result<Self, TwiError> {
        let count = buf.len();
        let mut session = self;
        for (i, slot) in buf.iter_mut().enumerate() {
            let ack = if i + 1 == count { last } else { AckPolicy::Ack };
            let (next, byte) = session.read_byte(ack)?;
            *slot = byte;
            session = next;
        }
        Ok(session)
    }

    /// Fill `buf` and NACK the final byte
    pub fn read_to_end(self, buf: &mut [u8]) -> Result<Self, TwiError> {
        self.read(buf, AckPolicy::Nack)
    }

    /// Send a repeated START
    pub fn restart(self) -> Result<Transaction<'a, R, Addressing>, TwiError> {
        restart(self)
    }
}

fn restart<'a, R: TwiRegisters, S>(
    session: Transaction<'a, R, S>,
) -> Result<Transaction<'a, R, Addressing>, TwiError> {
    match session.master.start() {
        Ok(_) => Ok(session.into_state()),
        Err(e) => Err(session.abort(e)),
    }
}

impl<R: TwiRegisters> TwiMaster<R, Enabled> {
    /// Open a transaction (sends START)
    pub fn start_transaction(&mut self) -> Result<Transaction<'_, R, Addressing>, TwiError> {
        Transaction::begin(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twi::master::TwiConfig;
    use crate::twi::sim::{BusEvent, SimTwi};
    use crate::twi::status::StatusCode;

    fn master(sim: SimTwi) -> TwiMaster<SimTwi, Enabled> {
        TwiMaster::new(sim, TwiConfig::default()).initialize()
    }

    #[test]
    fn test_write_then_read_sequence() {
        let mut m = master(SimTwi::device(0x68));
        m.regs_mut().set_register(0x05, 0x99);

        let mut buf = [0u8; 1];
        m.start_transaction()
            .and_then(|t| t.address_write(Address::new(0x68)))
            .and_then(|t| t.write(0x05))
            .and_then(|t| t.restart())
            .and_then(|t| t.address_read(Address::new(0x68)))
            .and_then(|t| t.read_to_end(&mut buf))
            .and_then(|t| t.finish())
            .unwrap();

        assert_eq!(buf, [0x99]);
        assert_eq!(
            m.regs_mut().events(),
            &[
                BusEvent::Start,
                BusEvent::Sent(0xD0),
                BusEvent::Sent(0x05),
                BusEvent::RepeatedStart,
                BusEvent::Sent(0xD1),
                BusEvent::Received(0x99, AckPolicy::Nack),
                BusEvent::Stop,
            ]
        );
    }

    #[test]
    fn test_multi_byte_read_acks_all_but_last() {
        let mut m = master(SimTwi::device(0x68));
        for r in 0..3 {
            m.regs_mut().set_register(r, 0x10 + r);
        }

        let mut buf = [0u8; 3];
        m.start_transaction()
            .and_then(|t| t.address_read(Address::new(0x68)))
            .and_then(|t| t.read_to_end(&mut buf))
            .and_then(|t| t.finish())
            .unwrap();

        assert_eq!(buf, [0x10, 0x11, 0x12]);
        assert_eq!(
            &m.regs_mut().events()[2..5],
            &[
                BusEvent::Received(0x10, AckPolicy::Ack),
                BusEvent::Received(0x11, AckPolicy::Ack),
                BusEvent::Received(0x12, AckPolicy::Nack),
            ]
        );
    }

    #[test]
    fn test_address_nack_releases_bus() {
        let mut m = master(SimTwi::device(0x68));
        let result = m
            .start_transaction()
            .and_then(|t| t.address_write(Address::new(0x50)));

        assert!(matches!(result, Err(TwiError::AddressNotAcknowledged)));
        assert_eq!(
            m.regs_mut().events(),
            &[BusEvent::Start, BusEvent::Sent(0xA0), BusEvent::Stop]
        );
    }

    #[test]
    fn test_data_nack_stops_remaining_bytes() {
        let mut m = master(SimTwi::scripted(&[0x08, 0x18, 0x28, 0x30, 0x28], &[]));
        let result = m
            .start_transaction()
            .and_then(|t| t.address_write(Address::new(0x68)))
            .and_then(|t| t.write_all(&[0x01, 0x02, 0x03]));

        assert!(matches!(result, Err(TwiError::DataNotAcknowledged)));
        assert_eq!(
            m.regs_mut().events(),
            &[
                BusEvent::Start,
                BusEvent::Sent(0xD0),
                BusEvent::Sent(0x01),
                BusEvent::Sent(0x02),
                BusEvent::Stop,
            ]
        );
    }

    #[test]
    fn test_failed_start_releases_bus() {
        let mut m = master(SimTwi::scripted(&[0x38], &[]));
        let result = m.start_transaction();
        assert!(matches!(
            result,
            Err(TwiError::UnexpectedStatus(StatusCode::ArbitrationLost))
        ));
        assert_eq!(m.regs_mut().events().last(), Some(&BusEvent::Stop));
    }

    #[test]
    fn test_controller_usable_after_failure() {
        let mut m = master(SimTwi::device(0x68));
        assert!(m
            .start_transaction()
            .and_then(|t| t.address_write(Address::new(0x51)))
            .is_err());

        m.start_transaction()
            .and_then(|t| t.address_write(Address::new(0x68)))
            .and_then(|t| t.write_all(&[0x00, 0x42]))
            .and_then(|t| t.finish())
            .unwrap();
        assert_eq!(m.regs_mut().register(0x00), 0x42);
    }

    #[test]
    fn test_empty_read_sends_nothing() {
        let mut m = master(SimTwi::device(0x68));
        let mut buf = [0u8; 0];
        m.start_transaction()
            .and_then(|t| t.address_read(Address::new(0x68)))
            .and_then(|t| t.read_to_end(&mut buf))
            .and_then(|t| t.finish())
            .unwrap();
        assert_eq!(m.regs_mut().events().len(), 3);
    }
}
