//! Simulated TWI peripheral for host tests
//!
//! Follows the hardware rules the driver depends on:
//! - writing TWINT=1 clears the flag and starts the requested action,
//!   which completes immediately and sets the flag again
//! - writing TWINT=0 leaves the flag as it was
//! - TWSTO clears itself once the STOP is sent, without setting TWINT
//! - only the prescaler bits of TWSR are writable
//!
//! The bus side is either a script of status codes, a register device
//! that stores what it is sent, or a stuck bus that never completes.

use heapless::{Deque, Vec};
use timeswitch_hal::twi::{
    control::{TWEA, TWEN, TWINT, TWSTA, TWSTO},
    status::{PRESCALER_MASK, STATUS_MASK},
    TwiRegisters,
};

use super::master::AckPolicy;

/// Observable bus activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Start,
    RepeatedStart,
    Stop,
    Sent(u8),
    Received(u8, AckPolicy),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Address,
    Write { pointer_set: bool },
    Read,
}

struct RegisterDevice {
    address: u8,
    registers: [u8; 256],
    pointer: u8,
    phase: Phase,
}

enum Mode {
    Scripted {
        statuses: Deque<u8, 32>,
        data: Deque<u8, 32>,
    },
    Device(RegisterDevice),
    Stuck,
}

pub struct SimTwi {
    control: u8,
    status: u8,
    bit_rate: u8,
    data: u8,
    data_written: bool,
    in_transaction: bool,
    polls: u32,
    mode: Mode,
    control_log: Vec<u8, 64>,
    events: Vec<BusEvent, 64>,
}

impl SimTwi {
    fn with_mode(mode: Mode) -> Self {
        Self {
            control: 0,
            status: 0xF8,
            bit_rate: 0,
            data: 0xFF,
            data_written: false,
            in_transaction: false,
            polls: 0,
            mode,
            control_log: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Each START or byte action reports the next status from `statuses`;
    /// received bytes come from `data`
    pub fn scripted(statuses: &[u8], data: &[u8]) -> Self {
        let mut status_queue = Deque::new();
        for &s in statuses {
            status_queue.push_back(s).unwrap();
        }
        let mut data_queue = Deque::new();
        for &d in data {
            data_queue.push_back(d).unwrap();
        }
        Self::with_mode(Mode::Scripted {
            statuses: status_queue,
            data: data_queue,
        })
    }

    /// A register device at `address` that reads back what was written
    pub fn device(address: u8) -> Self {
        Self::with_mode(Mode::Device(RegisterDevice {
            address,
            registers: [0; 256],
            pointer: 0,
            phase: Phase::Idle,
        }))
    }

    /// A bus on which no action ever completes
    pub fn stuck() -> Self {
        Self::with_mode(Mode::Stuck)
    }

    pub fn bit_rate(&self) -> u8 {
        self.bit_rate
    }

    pub fn prescaler_bits(&self) -> u8 {
        self.status & PRESCALER_MASK
    }

    pub fn control_log(&self) -> &[u8] {
        &self.control_log
    }

    pub fn clear_control_log(&mut self) {
        self.control_log.clear();
    }

    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }

    pub fn reset_polls(&mut self) {
        self.polls = 0;
    }

    /// Device register contents
    pub fn register(&self, register: u8) -> u8 {
        match &self.mode {
            Mode::Device(dev) => dev.registers[register as usize],
            _ => panic!("not a register device"),
        }
    }

    pub fn set_register(&mut self, register: u8, value: u8) {
        match &mut self.mode {
            Mode::Device(dev) => dev.registers[register as usize] = value,
            _ => panic!("not a register device"),
        }
    }

    fn log(&mut self, event: BusEvent) {
        // Long tests overflow the log; only short sequences are inspected
        let _ = self.events.push(event);
    }

    fn start_condition(&mut self) -> u8 {
        let repeated = self.in_transaction;
        self.in_transaction = true;
        self.data_written = false;
        self.log(if repeated {
            BusEvent::RepeatedStart
        } else {
            BusEvent::Start
        });

        match &mut self.mode {
            Mode::Scripted { statuses, .. } => statuses.pop_front().unwrap_or(0xF8),
            Mode::Device(dev) => {
                dev.phase = Phase::Address;
                if repeated {
                    0x10
                } else {
                    0x08
                }
            }
            Mode::Stuck => 0xF8,
        }
    }

    fn stop_condition(&mut self) {
        self.in_transaction = false;
        if let Mode::Device(dev) = &mut self.mode {
            dev.phase = Phase::Idle;
        }
        self.log(BusEvent::Stop);
    }

    fn transfer(&mut self) -> u8 {
        let written = core::mem::replace(&mut self.data_written, false);
        let ack = if self.control & TWEA != 0 {
            AckPolicy::Ack
        } else {
            AckPolicy::Nack
        };

        let (status, event) = match &mut self.mode {
            Mode::Scripted { statuses, data } => {
                let status = statuses.pop_front().unwrap_or(0xF8);
                if written {
                    (status, BusEvent::Sent(self.data))
                } else {
                    self.data = data.pop_front().unwrap_or(0xFF);
                    (status, BusEvent::Received(self.data, ack))
                }
            }
            Mode::Device(dev) => match dev.phase {
                Phase::Address => {
                    let byte = self.data;
                    let read = byte & 0x01 != 0;
                    let status = if byte >> 1 != dev.address {
                        dev.phase = Phase::Idle;
                        if read {
                            0x48
                        } else {
                            0x20
                        }
                    } else if read {
                        dev.phase = Phase::Read;
                        0x40
                    } else {
                        dev.phase = Phase::Write { pointer_set: false };
                        0x18
                    };
                    (status, BusEvent::Sent(byte))
                }
                Phase::Write { pointer_set } => {
                    let byte = self.data;
                    if pointer_set {
                        dev.registers[dev.pointer as usize] = byte;
                        dev.pointer = dev.pointer.wrapping_add(1);
                    } else {
                        dev.pointer = byte;
                        dev.phase = Phase::Write { pointer_set: true };
                    }
                    (0x28, BusEvent::Sent(byte))
                }
                Phase::Read => {
                    self.data = dev.registers[dev.pointer as usize];
                    dev.pointer = dev.pointer.wrapping_add(1);
                    let status = match ack {
                        AckPolicy::Ack => 0x50,
                        AckPolicy::Nack => 0x58,
                    };
                    (status, BusEvent::Received(self.data, ack))
                }
                Phase::Idle => (0xF8, BusEvent::Sent(self.data)),
            },
            Mode::Stuck => (0xF8, BusEvent::Sent(self.data)),
        };
        self.log(event);
        status
    }
}

impl TwiRegisters for SimTwi {
    fn read_control(&mut self) -> u8 {
        self.polls += 1;
        self.control
    }

    fn write_control(&mut self, value: u8) {
        let _ = self.control_log.push(value);

        if value & TWINT == 0 {
            self.control = value | (self.control & TWINT);
            return;
        }

        self.control = value & !TWINT;
        if matches!(self.mode, Mode::Stuck) || value & TWEN == 0 {
            return;
        }

        if value & TWSTO != 0 {
            self.stop_condition();
            self.control &= !TWSTO;
            return;
        }

        let status = if value & TWSTA != 0 {
            self.start_condition()
        } else {
            self.transfer()
        };
        self.status = (status & STATUS_MASK) | (self.status & PRESCALER_MASK);
        self.control |= TWINT;
    }

    fn read_status(&mut self) -> u8 {
        self.status
    }

    fn write_status(&mut self, value: u8) {
        self.status = (self.status & STATUS_MASK) | (value & PRESCALER_MASK);
    }

    fn write_bit_rate(&mut self, value: u8) {
        self.bit_rate = value;
    }

    fn read_data(&mut self) -> u8 {
        self.data
    }

    fn write_data(&mut self, value: u8) {
        self.data = value;
        self.data_written = true;
    }
}
