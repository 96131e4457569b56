//! Monotonic time sources.
//!
//! The engine reads time through [`Clock`] so firmware can plug in a hardware
//! timer while tests drive time by hand.

use core::cell::Cell;

use crate::config::{Micros, Millis};

/// Monotonic clock with microsecond resolution.
pub trait Clock {
    /// Current time. Must never go backwards.
    fn now_micros(&self) -> Micros;

    /// Current time at millisecond granularity.
    #[inline]
    fn now_millis(&self) -> Millis {
        self.now_micros().to_millis()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now_micros(&self) -> Micros {
        (**self).now_micros()
    }
}

/// Clock advanced explicitly by the caller.
///
/// Interior mutability lets a test keep a shared reference while the
/// controller holds another.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock starting at `start`.
    pub fn starting_at(start: Micros) -> Self {
        Self {
            now: Cell::new(start.0),
        }
    }

    /// Move time forward.
    pub fn advance(&self, delta: Micros) {
        self.now.set(self.now.get() + delta.0);
    }

    /// Move time forward by whole milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Millis(millis).to_micros());
    }

    /// Jump to an absolute time. Ignored if it would go backwards.
    pub fn set(&self, now: Micros) {
        if now.0 >= self.now.get() {
            self.now.set(now.0);
        }
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_micros(&self) -> Micros {
        Micros(self.now.get())
    }
}

/// Wall clock backed by `std::time::Instant`, zero at construction.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Clock whose zero is now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_micros(&self) -> Micros {
        let elapsed = self.origin.elapsed().as_micros();
        Micros(u64::try_from(elapsed).unwrap_or(u64::MAX))
    }
}
