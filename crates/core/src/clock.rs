//! Time sources for RTP timestamp derivation.
//!
//! Timestamps on outgoing packets are computed from elapsed wall time
//! scaled by the negotiated codec's clock rate, so the channel needs a
//! time source. It is modeled as a capability trait rather than a direct
//! `Instant::now()` call, which keeps timestamp behavior deterministic
//! under test and lets independently paced engines coexist in one process.

use std::time::Instant;

use parking_lot::Mutex;

/// Read-only time capability: elapsed seconds since an arbitrary but
/// fixed epoch. Must be monotonic.
pub trait Clock: Send + Sync {
    /// Seconds elapsed since this clock's epoch.
    fn now_secs(&self) -> f64;
}

/// Production clock backed by [`std::time::Instant`].
///
/// The epoch is the moment of construction, which satisfies the
/// "arbitrary but fixed" contract and is immune to wall-clock jumps.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Deterministic clock that only moves when told to.
///
/// Used by tests and the demo binary to pin timestamp arithmetic to
/// known values. Shared across channels via `Arc`, so the current time
/// lives behind a mutex.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current time to an absolute value in seconds.
    pub fn set(&self, secs: f64) {
        *self.now.lock() = secs;
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: f64) {
        *self.now.lock() += secs;
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        *self.now.lock()
    }
}
