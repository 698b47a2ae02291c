//! Completion wait strategies
//!
//! The TWI peripheral signals completion by setting a control flag. The
//! driver polls it; the policy decides how long to keep polling.

use super::status::TwiError;

/// Default poll budget for [`WaitPolicy::Bounded`]
///
/// At a few kHz SCL one byte takes a few milliseconds, which is
/// comfortably below this many polls even on a 1 MHz core.
pub const DEFAULT_MAX_POLLS: u32 = 10_000;

/// How long to poll for completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitPolicy {
    /// Poll until the hardware completes, forever if need be
    Spin,
    /// Give up with [`TwiError::BusTimeout`] after `max_polls` polls
    Bounded { max_polls: u32 },
}

impl Default for WaitPolicy {
    fn default() -> Self {
        WaitPolicy::Bounded {
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl WaitPolicy {
    /// Poll `done` until it returns true
    pub fn wait_until<F>(self, mut done: F) -> Result<(), TwiError>
    where
        F: FnMut() -> bool,
    {
        match self {
            WaitPolicy::Spin => {
                while !done() {}
                Ok(())
            }
            WaitPolicy::Bounded { max_polls } => {
                for _ in 0..max_polls {
                    if done() {
                        return Ok(());
                    }
                }
                Err(TwiError::BusTimeout)
            }
        }
    }
}
