//! Shared monotonic tick source.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use critter_logic::Tick;

/// Supplies the current tick. Implementations must never go backwards.
pub trait TimeSource {
    fn current_tick(&self) -> Tick;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_tick(&self) -> Tick {
        (**self).current_tick()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_tick(&self) -> Tick {
        (**self).current_tick()
    }
}

/// Manually driven clock for tests and headless runs.
///
/// Shareable through `Arc` so a harness can advance time while the engine
/// holds the same clock.
#[derive(Debug, Default)]
pub struct ManualClock {
    tick: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Tick) -> Self {
        Self {
            tick: AtomicU64::new(start),
        }
    }

    /// Move forward by `ticks`, saturating at `u64::MAX`. Returns the new tick.
    pub fn advance(&self, ticks: u64) -> Tick {
        let previous = self
            .tick
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(ticks))
            })
            .unwrap_or_else(|t| t);
        previous.saturating_add(ticks)
    }

    /// Jump to `tick`. Earlier ticks are ignored so the clock stays monotonic.
    pub fn set(&self, tick: Tick) -> Tick {
        self.tick.fetch_max(tick, Ordering::SeqCst).max(tick)
    }
}

impl TimeSource for ManualClock {
    fn current_tick(&self) -> Tick {
        self.tick.load(Ordering::SeqCst)
    }
}
