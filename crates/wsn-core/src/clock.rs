//! Simulation clock.
//!
//! The clock is the single source of truth for simulation time. Ticks
//! start at 0 after a reset and are incremented at the start of every
//! tick, so the first call to `step()` runs tick 1.
//!
//! Advancing uses checked arithmetic: reaching `u64::MAX` is reported as
//! [`ClockError::TickOverflow`] instead of wrapping back to zero, which
//! would silently break every tenure and downtime computation.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Monotonic tick counter for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimClock {
    /// Current tick (0 before the first step).
    tick: u64,
}

impl SimClock {
    /// Create a clock at tick 0.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// Create a clock at an arbitrary tick (useful for testing).
    pub const fn from_tick(tick: u64) -> Self {
        Self { tick }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Rewind to tick 0.
    pub const fn reset(&mut self) {
        self.tick = 0;
    }

    /// Ticks elapsed since `since`, saturating at zero for future ticks.
    pub const fn elapsed_since(&self, since: u64) -> u64 {
        self.tick.saturating_sub(since)
    }
}
