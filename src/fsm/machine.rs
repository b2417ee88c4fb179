//! Transition handlers for the tier state machine.
//!
//! [`TierMachine`] holds only the tier and the logical output.  Timers,
//! configuration and ports are borrowed per call, so the same handlers
//! serve the debounced-edge path and the timer-expiry path.

use super::{OutputState, Tier};
use crate::app::events::ControllerEvent;
use crate::app::ports::{EventSink, OutputPort};
use crate::config::ControllerConfig;
use crate::debounce::Edge;
use crate::timers::{TimerBank, TimerId};

#[derive(Debug, Clone, Default)]
pub struct TierMachine {
    tier: Tier,
    output: OutputState,
}

impl TierMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn output(&self) -> OutputState {
        self.output
    }

    /// Return to the power-on baseline: Idle, output off, tier timers
    /// disarmed.  The output is written even if it is already off so the
    /// pins match the logical state after a reset.
    pub fn reset(
        &mut self,
        timers: &mut TimerBank,
        out: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        timers.cancel(TimerId::Cooldown);
        timers.cancel(TimerId::OnOff);
        self.set_tier(Tier::Idle, sink);
        self.drive(OutputState::Off, out, sink);
    }

    /// Apply a debounced edge from the tier switch.
    pub fn on_edge(
        &mut self,
        edge: Edge,
        timers: &mut TimerBank,
        config: &ControllerConfig,
        out: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        match edge {
            Edge::Rising => self.on_rising(timers, config, out, sink),
            Edge::Falling => self.on_falling(timers, config, sink),
        }
    }

    fn on_rising(
        &mut self,
        timers: &mut TimerBank,
        config: &ControllerConfig,
        out: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        if timers.is_armed(TimerId::Cooldown) {
            timers.cancel(TimerId::Cooldown);
            sink.emit(&ControllerEvent::CooldownAborted);
        }

        self.set_tier(self.tier.next(), sink);
        self.drive(OutputState::On, out, sink);

        match config.phase_ticks(self.tier, OutputState::On) {
            Some(on) => timers.arm(TimerId::OnOff, on),
            None => timers.cancel(TimerId::OnOff),
        }
    }

    fn on_falling(
        &mut self,
        timers: &mut TimerBank,
        config: &ControllerConfig,
        sink: &mut impl EventSink,
    ) {
        timers.arm(TimerId::Cooldown, config.cooldown_ticks);
        let expires_at = timers.now().wrapping_add(config.cooldown_ticks);
        sink.emit(&ControllerEvent::CooldownArmed { expires_at });
    }

    /// The release grace period ran out without a new press.
    pub fn on_cooldown_expired(
        &mut self,
        timers: &mut TimerBank,
        out: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        sink.emit(&ControllerEvent::CooldownExpired);
        timers.cancel(TimerId::OnOff);
        self.set_tier(Tier::Idle, sink);
        self.drive(OutputState::Off, out, sink);
    }

    /// An on or off phase of a cycling tier ended.
    pub fn on_phase_expired(
        &mut self,
        timers: &mut TimerBank,
        config: &ControllerConfig,
        out: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        // Only cycling tiers arm the phase timer.  A stray expiry in any
        // other tier leaves the output alone.
        if !self.tier.is_cycling() {
            timers.cancel(TimerId::OnOff);
            return;
        }

        let next = self.output.toggled();
        self.drive(next, out, sink);
        if let Some(phase) = config.phase_ticks(self.tier, next) {
            timers.arm(TimerId::OnOff, phase);
        }
    }

    fn set_tier(&mut self, to: Tier, sink: &mut impl EventSink) {
        let from = self.tier;
        if from != to {
            self.tier = to;
            sink.emit(&ControllerEvent::TierChanged { from, to });
        }
    }

    /// Record and write the output.  The port is always written; the
    /// event only fires on an actual change.
    fn drive(&mut self, to: OutputState, out: &mut impl OutputPort, sink: &mut impl EventSink) {
        out.set_output(to.is_on());
        if self.output != to {
            self.output = to;
            sink.emit(&ControllerEvent::OutputChanged(to));
        }
    }
}
