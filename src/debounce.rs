//! Timer-bank debouncer for the monitored inputs.
//!
//! The first raw edge on an input opens a settle window by arming that
//! input's timer slot; further raw edges while the window is open are
//! dropped (no re-arm, no extension).  When the slot expires the settled
//! level is sampled once and becomes a single logical edge.
//!
//! ```text
//!  raw:      ─┐┌┐┌─┐┌──────────────
//!             └┘└┘ └┘
//!  window:    [───── debounce ─────]
//!  logical:                        ▲ Rising (input sampled asserted)
//! ```

use crate::pins;
use crate::timers::{Tick, TimerBank, TimerId};

/// Physical inputs the controller listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputId {
    /// Tier-select switch.
    Switch,
    /// Auxiliary sense line, reported only.
    Sense,
}

impl InputId {
    /// Every monitored input; one interrupt handler each.
    pub const ALL: [InputId; 2] = [Self::Switch, Self::Sense];

    /// Map an interrupting GPIO to a monitored input.  Anything else is
    /// not ours and yields `None`.
    pub fn from_gpio(gpio: i32) -> Option<Self> {
        match gpio {
            pins::SWIN_GPIO => Some(Self::Switch),
            pins::SENSE_GPIO => Some(Self::Sense),
            _ => None,
        }
    }

    pub const fn gpio(self) -> i32 {
        match self {
            Self::Switch => pins::SWIN_GPIO,
            Self::Sense => pins::SENSE_GPIO,
        }
    }

    /// Timer slot holding this input's settle window.
    pub const fn timer(self) -> TimerId {
        match self {
            Self::Switch => TimerId::DebounceSwitch,
            Self::Sense => TimerId::DebounceSense,
        }
    }
}

/// A debounced change of the logical input: `Rising` is press or
/// activation, `Falling` is release.  Pin polarity is resolved below
/// the [`InputPort`](crate::app::ports::InputPort).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

impl Edge {
    /// Classify the state sampled at the end of a settle window.
    pub fn from_level(asserted: bool) -> Self {
        if asserted { Self::Rising } else { Self::Falling }
    }
}

/// Opens settle windows in the timer bank.  Stateless apart from the
/// window length: the open/closed state of each window *is* the slot.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    window: Tick,
}

impl Debouncer {
    pub fn new(window: Tick) -> Self {
        Self { window }
    }

    /// Handle a raw edge notification.  Returns `true` if this edge
    /// opened a new window, `false` if one was already open.
    pub fn on_raw_edge(&self, input: InputId, timers: &mut TimerBank) -> bool {
        let slot = input.timer();
        if timers.is_armed(slot) {
            return false;
        }
        timers.arm(slot, self.window);
        true
    }
}
