//! TWI status codes and driver errors
//!
//! Every bus action ends with a status code in TWSR bits 7..3. The low
//! three bits (prescaler and a reserved bit) are masked off before decoding.

use timeswitch_hal::twi::status::STATUS_MASK;

/// Decoded master-mode status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusCode {
    /// 0x08: START transmitted
    Start,
    /// 0x10: repeated START transmitted
    RepeatedStart,
    /// 0x18: SLA+W transmitted, ACK received
    AddressWriteAck,
    /// 0x20: SLA+W transmitted, NACK received
    AddressWriteNack,
    /// 0x28: data byte transmitted, ACK received
    DataSentAck,
    /// 0x30: data byte transmitted, NACK received
    DataSentNack,
    /// 0x38: arbitration lost
    ArbitrationLost,
    /// 0x40: SLA+R transmitted, ACK received
    AddressReadAck,
    /// 0x48: SLA+R transmitted, NACK received
    AddressReadNack,
    /// 0x50: data byte received, ACK returned
    DataReceivedAck,
    /// 0x58: data byte received, NACK returned
    DataReceivedNack,
    /// 0xF8: no relevant state information
    NoInfo,
    /// 0x00: illegal START/STOP on the bus
    BusError,
    /// Slave-mode or reserved code
    Unknown(u8),
}

impl StatusCode {
    /// Decode a raw TWSR value
    pub const fn decode(raw: u8) -> Self {
        match raw & STATUS_MASK {
            0x08 => StatusCode::Start,
            0x10 => StatusCode::RepeatedStart,
            0x18 => StatusCode::AddressWriteAck,
            0x20 => StatusCode::AddressWriteNack,
            0x28 => StatusCode::DataSentAck,
            0x30 => StatusCode::DataSentNack,
            0x38 => StatusCode::ArbitrationLost,
            0x40 => StatusCode::AddressReadAck,
            0x48 => StatusCode::AddressReadNack,
            0x50 => StatusCode::DataReceivedAck,
            0x58 => StatusCode::DataReceivedNack,
            0xF8 => StatusCode::NoInfo,
            0x00 => StatusCode::BusError,
            other => StatusCode::Unknown(other),
        }
    }

    /// Masked status value
    pub const fn raw(self) -> u8 {
        match self {
            StatusCode::Start => 0x08,
            StatusCode::RepeatedStart => 0x10,
            StatusCode::AddressWriteAck => 0x18,
            StatusCode::AddressWriteNack => 0x20,
            StatusCode::DataSentAck => 0x28,
            StatusCode::DataSentNack => 0x30,
            StatusCode::ArbitrationLost => 0x38,
            StatusCode::AddressReadAck => 0x40,
            StatusCode::AddressReadNack => 0x48,
            StatusCode::DataReceivedAck => 0x50,
            StatusCode::DataReceivedNack => 0x58,
            StatusCode::NoInfo => 0xF8,
            StatusCode::BusError => 0x00,
            StatusCode::Unknown(raw) => raw,
        }
    }

    /// A START or repeated START went out
    pub const fn is_start(self) -> bool {
        matches!(self, StatusCode::Start | StatusCode::RepeatedStart)
    }

    /// A transmitted byte (address or data) was acknowledged
    pub const fn is_byte_accepted(self) -> bool {
        matches!(
            self,
            StatusCode::AddressWriteAck | StatusCode::DataSentAck | StatusCode::AddressReadAck
        )
    }

    /// A byte was received (with either acknowledge policy)
    pub const fn is_byte_received(self) -> bool {
        matches!(
            self,
            StatusCode::DataReceivedAck | StatusCode::DataReceivedNack
        )
    }
}

/// TWI driver error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiError {
    /// No device acknowledged the address byte
    AddressNotAcknowledged,
    /// The device refused a data byte
    DataNotAcknowledged,
    /// The peripheral reported a status outside the expected set
    UnexpectedStatus(StatusCode),
    /// The hardware did not complete the action within the poll budget
    BusTimeout,
}

impl TwiError {
    /// Map a failed byte transmission status to an error
    pub(crate) const fn from_write_status(status: StatusCode) -> Self {
        match status {
            StatusCode::AddressWriteNack | StatusCode::AddressReadNack => {
                TwiError::AddressNotAcknowledged
            }
            StatusCode::DataSentNack => TwiError::DataNotAcknowledged,
            other => TwiError::UnexpectedStatus(other),
        }
    }
}

impl embedded_hal::i2c::Error for TwiError {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

        match self {
            TwiError::AddressNotAcknowledged => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            TwiError::DataNotAcknowledged => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            TwiError::UnexpectedStatus(StatusCode::ArbitrationLost) => ErrorKind::ArbitrationLoss,
            TwiError::UnexpectedStatus(StatusCode::BusError) => ErrorKind::Bus,
            TwiError::UnexpectedStatus(_) | TwiError::BusTimeout => ErrorKind::Other,
        }
    }
}
