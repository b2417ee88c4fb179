//! Outbound controller events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; the firmware logs them.

use crate::debounce::{Edge, InputId};
use crate::fsm::{OutputState, Tier};
use crate::timers::{Tick, TimerId};

/// Structured events emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The controller reached its baseline after power-on or reset.
    Started { tier: Tier, output: OutputState },

    /// A settle window closed and produced one logical edge.
    EdgeSettled { input: InputId, edge: Edge },

    /// The tier moved.
    TierChanged { from: Tier, to: Tier },

    /// Relay and indicator switched.
    OutputChanged(OutputState),

    /// Release seen; the tier drops to Idle at `expires_at` unless
    /// another press arrives first.
    CooldownArmed { expires_at: Tick },

    /// A press arrived while the cooldown was running.
    CooldownAborted,

    /// The cooldown ran out uninterrupted.
    CooldownExpired,

    /// New configuration accepted at runtime.
    ConfigUpdated,

    /// Periodic diagnostic snapshot.
    Status(StatusSnapshot),
}

/// A point-in-time view of the controller, suitable for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub now: Tick,
    pub tier: Tier,
    pub output: OutputState,
    /// Armed timers and their expiry ticks, in dispatch order.
    pub pending: heapless::Vec<(TimerId, Tick), { TimerId::COUNT }>,
}
