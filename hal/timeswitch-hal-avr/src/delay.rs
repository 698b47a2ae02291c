//! Busy-wait delay
//!
//! Blocks for *at least* the requested time by spinning a counted loop.

use embedded_hal::delay::DelayNs;

/// CPU cycles spent per loop iteration (nop + counter + branch)
const CYCLES_PER_ITERATION: u32 = 4;

/// Cycle-counted delay for a known CPU clock
#[derive(Debug, Clone, Copy)]
pub struct BusyDelay {
    cpu_hz: u32,
}

impl BusyDelay {
    /// Create a delay for a CPU running at `cpu_hz`
    pub const fn new(cpu_hz: u32) -> Self {
        Self { cpu_hz }
    }

    /// Loop iterations needed to wait `us` microseconds, rounded up
    pub const fn iterations_for_us(&self, us: u32) -> u32 {
        let cycles = (self.cpu_hz as u64 * us as u64).div_ceil(1_000_000);
        let iterations = cycles.div_ceil(CYCLES_PER_ITERATION as u64);
        if iterations > u32::MAX as u64 {
            u32::MAX
        } else {
            iterations as u32
        }
    }

    #[inline(never)]
    fn spin(iterations: u32) {
        for _ in 0..iterations {
            #[cfg(target_arch = "avr")]
            avr_device::asm::nop();
            #[cfg(not(target_arch = "avr"))]
            core::hint::spin_loop();
        }
    }
}

impl DelayNs for BusyDelay {
    fn delay_ns(&mut self, ns: u32) {
        Self::spin(self.iterations_for_us(ns.div_ceil(1_000)));
    }

    fn delay_us(&mut self, us: u32) {
        Self::spin(self.iterations_for_us(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}
