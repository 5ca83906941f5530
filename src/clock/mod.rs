//! # Clock Emulation
//!
//! `gettimeofday` at sub-second resolution synthesized from two host
//! sources: the coarse wall clock (whole seconds, subject to adjustments
//! such as daylight-saving changes) and the free-running tick counter
//! (~60.15 Hz, drifts independently of the wall clock). The emulator
//! keeps a tick baseline that is advanced by the *expected* tick count
//! for each elapsed wall-clock second, so raw tick jitter is smoothed;
//! when the wall clock runs ahead of the ticks the baseline is resynced
//! and the excess absorbed as drift correction. The result never runs
//! ahead of the tick rate or significantly behind true elapsed time.

use spin::Mutex;

use crate::compat::{Timeval, MAC_UNIX_EPOCH_DELTA_SECS};
use crate::toolbox::SystemClock;

/// Nominal whole ticks per wall-clock second
const TICKS_PER_SEC: u32 = 60;

/// Microseconds per tick at 60.15 Hz, as the ratio 20_000_000 / 2003
const USEC_PER_TICK_NUM: u64 = 20_000_000;
const USEC_PER_TICK_DEN: u64 = 2003;

/// Baseline state of the emulated clock
///
/// One value per process; mutated only by [`ClockEmulator::now`] and
/// never destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    /// No observation yet; the first query establishes the baseline
    Uninitialized,
    /// Tracking tick drift against the wall clock
    Tracking {
        /// Tick value the current second started at
        baseline_ticks: u32,
        /// Wall-clock second of the last observation
        last_secs: u32,
    },
}

/// Drift-compensated software clock
///
/// Process-wide singleton; the baseline sits behind a `spin::Mutex` so
/// the emulator stays sound if the shim is ever driven from more than
/// one thread of control.
#[derive(Debug)]
pub struct ClockEmulator {
    state: Mutex<ClockState>,
}

impl ClockEmulator {
    /// Create an emulator with no baseline yet
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(ClockState::Uninitialized),
        }
    }

    /// Current baseline state (observability for callers and tests)
    pub fn state(&self) -> ClockState {
        *self.state.lock()
    }

    /// Read the emulated wall-clock time, Unix epoch
    pub fn now<C: SystemClock + ?Sized>(&self, clock: &C) -> Timeval {
        let secs = clock.date_time_secs();
        let ticks = clock.tick_count();

        let mut state = self.state.lock();
        let baseline = match *state {
            ClockState::Uninitialized => {
                *state = ClockState::Tracking {
                    baseline_ticks: ticks,
                    last_secs: secs,
                };
                ticks
            }
            ClockState::Tracking {
                baseline_ticks,
                last_secs,
            } => {
                let elapsed_ticks = ticks.wrapping_sub(baseline_ticks);
                let elapsed_secs = secs.wrapping_sub(last_secs);
                // Expected ticks for that many seconds at 60.15 Hz
                let expected_ticks = elapsed_secs
                    .wrapping_mul(TICKS_PER_SEC)
                    .wrapping_add(elapsed_secs.wrapping_mul(3) / 20);

                let baseline = if expected_ticks > elapsed_ticks {
                    // Wall clock is authoritative: the ticks fell behind
                    // (or the clock jumped forward). Absorb the gap.
                    ticks
                } else {
                    // Smooth sub-second jitter: advance by exactly the
                    // expected amount and keep the remainder fractional.
                    baseline_ticks.wrapping_add(expected_ticks)
                };
                *state = ClockState::Tracking {
                    baseline_ticks: baseline,
                    last_secs: secs,
                };
                baseline
            }
        };
        drop(state);

        let frac_ticks = ticks.wrapping_sub(baseline) as u64;
        Timeval {
            tv_sec: secs as i64 - MAC_UNIX_EPOCH_DELTA_SECS,
            tv_usec: (frac_ticks * USEC_PER_TICK_NUM / USEC_PER_TICK_DEN) as i64,
        }
    }
}

impl Default for ClockEmulator {
    fn default() -> Self {
        Self::new()
    }
}
