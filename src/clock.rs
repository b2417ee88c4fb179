//! Clock source: the tick counter behind every software timer.
//!
//! The hardware side (`drivers::hw_timer`) only decides *when* a tick
//! happens; this type owns the counter itself.  Each [`fire`](ClockSource::fire)
//! advances the counter by exactly one, wrapping at `u32::MAX`.

use crate::timers::Tick;

#[derive(Debug, Clone, Default)]
pub struct ClockSource {
    counter: Tick,
}

impl ClockSource {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// Advance the counter by one and return the new value.
    pub fn fire(&mut self) -> Tick {
        self.counter = self.counter.wrapping_add(1);
        self.counter
    }

    /// Advance the counter without delivering the intermediate values,
    /// as a stalled or glitching tick source would.
    pub fn skip(&mut self, ticks: Tick) {
        self.counter = self.counter.wrapping_add(ticks);
    }

    /// Current counter value (the last tick delivered or skipped).
    pub fn counter(&self) -> Tick {
        self.counter
    }

    /// Back to tick zero, as after a power-on reset.
    pub fn reset(&mut self) {
        self.counter = 0;
    }
}
