//! Software timer bank.
//!
//! A fixed, statically enumerated set of one-shot timers driven by the
//! clock tick.  Each [`TimerId`] owns exactly one slot; arming overwrites
//! any pending expiry for that identity, so there is never more than one
//! outstanding firing per timer.
//!
//! ```text
//!  ClockSource ──▶ TimerBank::on_tick(now)
//!                      │  for id in TimerId::ALL (fixed order)
//!                      │    armed && due?  ──▶ disarm ──▶ delegate.on_timer_expired(id, bank)
//!                      ▼
//!                 handlers may arm / cancel any slot, including their own
//! ```
//!
//! Dispatch is an exhaustive `match` on [`TimerId`] inside the delegate,
//! not a table of callbacks, so a slot without a handler cannot exist.

use serde::{Deserialize, Serialize};

/// One unit of the fixed-period time base.  Wraps at `u32::MAX`.
pub type Tick = u32;

/// Largest delay accepted by [`ExpiryPolicy::Reached`].  Anything at or
/// above half the counter range is indistinguishable from "already past".
pub const MAX_DELAY_TICKS: Tick = (1 << 31) - 1;

// ═══════════════════════════════════════════════════════════════
//  Identities
// ═══════════════════════════════════════════════════════════════

/// Every software timer in the system.  The discriminant is the slot
/// index and also the order slots are visited within one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TimerId {
    /// Settle window for the tier switch input.
    DebounceSwitch = 0,
    /// Settle window for the auxiliary sense input.
    DebounceSense = 1,
    /// Grace period after release; expiry resets the tier to Idle.
    Cooldown = 2,
    /// On/off phase timer for the cycling tiers.
    OnOff = 3,
}

impl TimerId {
    /// Total number of timers; sizes the slot array.
    pub const COUNT: usize = 4;

    /// All identities in dispatch order.
    pub const ALL: [TimerId; Self::COUNT] = [
        Self::DebounceSwitch,
        Self::DebounceSense,
        Self::Cooldown,
        Self::OnOff,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::DebounceSwitch => "debounce-switch",
            Self::DebounceSense => "debounce-sense",
            Self::Cooldown => "cooldown",
            Self::OnOff => "on-off",
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Expiry policy
// ═══════════════════════════════════════════════════════════════

/// How an armed slot decides that it is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPolicy {
    /// Due only on the tick whose value equals the expiry.  If that
    /// value is never delivered (stalled or skipped clock), the timer
    /// stays armed and silent until the counter wraps back around.
    #[default]
    Exact,
    /// Due on the first tick at or after the expiry.  Wraparound-safe:
    /// `now - expiry` is taken modulo 2^32 and treated as "reached" when
    /// it lies in the lower half of the range.
    Reached,
}

impl ExpiryPolicy {
    pub fn is_due(self, expiry: Tick, now: Tick) -> bool {
        match self {
            Self::Exact => expiry == now,
            Self::Reached => now.wrapping_sub(expiry) <= MAX_DELAY_TICKS,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Delegate
// ═══════════════════════════════════════════════════════════════

/// Receives expirations from [`TimerBank::on_tick`].
///
/// The slot is already disarmed when this runs, so the handler may
/// re-arm it immediately.  The bank is passed back in so handlers can
/// arm or cancel any timer.
pub trait TimerDelegate {
    fn on_timer_expired(&mut self, id: TimerId, timers: &mut TimerBank);
}

// ═══════════════════════════════════════════════════════════════
//  Bank
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    armed: bool,
    expiry: Tick,
}

/// Fixed-size bank of one-shot software timers.
#[derive(Debug, Clone)]
pub struct TimerBank {
    slots: [Slot; TimerId::COUNT],
    /// Current tick: the last value delivered through
    /// [`on_tick`](Self::on_tick) or passed over by
    /// [`advance_to`](Self::advance_to).
    now: Tick,
    policy: ExpiryPolicy,
}

impl TimerBank {
    pub fn new(policy: ExpiryPolicy) -> Self {
        Self {
            slots: [Slot::default(); TimerId::COUNT],
            now: 0,
            policy,
        }
    }

    /// Arm `id` to expire `delay` ticks after the current tick.
    /// Overwrites any pending expiry for the same identity.
    pub fn arm(&mut self, id: TimerId, delay: Tick) {
        let slot = &mut self.slots[id.index()];
        slot.expiry = self.now.wrapping_add(delay);
        slot.armed = true;
    }

    /// Disarm `id`.  No-op if it is not armed.
    pub fn cancel(&mut self, id: TimerId) {
        self.slots[id.index()].armed = false;
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.slots[id.index()].armed
    }

    /// Pending expiry tick, or `None` when disarmed.
    pub fn expiry(&self, id: TimerId) -> Option<Tick> {
        let slot = self.slots[id.index()];
        slot.armed.then_some(slot.expiry)
    }

    /// Every armed timer with its expiry, in dispatch order.
    pub fn pending(&self) -> heapless::Vec<(TimerId, Tick), { TimerId::COUNT }> {
        TimerId::ALL
            .iter()
            .filter_map(|&id| self.expiry(id).map(|at| (id, at)))
            .collect()
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn set_policy(&mut self, policy: ExpiryPolicy) {
        self.policy = policy;
    }

    /// Move the bank's notion of the current tick to `now` without
    /// dispatching anything.  Tick values in between are lost; arming
    /// afterwards counts from `now`.
    pub fn advance_to(&mut self, now: Tick) {
        self.now = now;
    }

    /// Process one clock tick.
    ///
    /// Slots are visited in [`TimerId::ALL`] order and re-checked live,
    /// so a handler that cancels a later slot due on the same tick
    /// suppresses that firing.  Each due slot is disarmed before its
    /// handler runs and fires exactly once.
    pub fn on_tick(&mut self, now: Tick, delegate: &mut dyn TimerDelegate) {
        self.now = now;
        for id in TimerId::ALL {
            if self.take_if_due(id) {
                delegate.on_timer_expired(id, self);
            }
        }
    }

    fn take_if_due(&mut self, id: TimerId) -> bool {
        let (policy, now) = (self.policy, self.now);
        let slot = &mut self.slots[id.index()];
        if slot.armed && policy.is_due(slot.expiry, now) {
            slot.armed = false;
            true
        } else {
            false
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
