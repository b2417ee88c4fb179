//! Controller service: the hexagonal core.
//!
//! [`Controller`] owns the clock, the timer bank, the debouncer and the
//! tier machine.  All I/O flows through port traits injected at call
//! sites, so the entire controller is testable with mock adapters.
//!
//! ```text
//!   InputPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          Controller           │
//!  OutputPort ◀── │ Clock · Timers · Debounce · FSM│
//!                 └──────────────────────────────┘
//! ```

use crate::clock::ClockSource;
use crate::config::ControllerConfig;
use crate::debounce::{Debouncer, Edge, InputId};
use crate::error::{ConfigError, Result};
use crate::fsm::{OutputState, Tier, TierMachine};
use crate::timers::{Tick, TimerBank, TimerDelegate, TimerId};

use super::events::{ControllerEvent, StatusSnapshot};
use super::ports::{EventSink, InputPort, OutputPort};

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

/// The controller aggregate.  One instance lives for the whole run.
///
/// Nothing in here logs: on the target every method runs inside the
/// shared critical section.  Observable behaviour leaves through the
/// [`EventSink`] instead.
#[derive(Debug, Clone)]
pub struct Controller {
    config: ControllerConfig,
    clock: ClockSource,
    timers: TimerBank,
    debouncer: Debouncer,
    machine: TierMachine,
}

impl Controller {
    /// Build the aggregate at its baseline: Idle, Off, nothing armed.
    ///
    /// Does **not** touch the output; call [`start`](Self::start) once
    /// the ports exist.
    pub fn new(config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            clock: ClockSource::new(),
            timers: TimerBank::new(config.expiry_policy),
            debouncer: Debouncer::new(config.debounce_ticks),
            machine: TierMachine::new(),
            config,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the output to its baseline and announce the start.
    pub fn start(&mut self, hw: &mut impl OutputPort, sink: &mut impl EventSink) {
        self.machine.reset(&mut self.timers, hw, sink);
        sink.emit(&ControllerEvent::Started {
            tier: self.machine.tier(),
            output: self.machine.output(),
        });
    }

    /// Return to the power-on state: counter at zero, every timer
    /// disarmed, Idle, output driven off.
    pub fn reset(&mut self, hw: &mut impl OutputPort, sink: &mut impl EventSink) {
        self.clock.reset();
        self.timers = TimerBank::new(self.config.expiry_policy);
        self.machine.reset(&mut self.timers, hw, sink);
        sink.emit(&ControllerEvent::Started {
            tier: self.machine.tier(),
            output: self.machine.output(),
        });
    }

    // ── Time base ─────────────────────────────────────────────

    /// One clock firing: advance the counter and dispatch every timer
    /// due at the new value.  Returns the tick that was delivered.
    ///
    /// The `hw` parameter satisfies **both** [`InputPort`] and
    /// [`OutputPort`]: settled levels are read and the output driven
    /// within the same dispatch.
    pub fn clock_tick<H, S>(&mut self, hw: &mut H, sink: &mut S) -> Tick
    where
        H: InputPort + OutputPort,
        S: EventSink,
    {
        let now = self.clock.fire();
        let mut dispatch = Dispatch {
            config: &self.config,
            machine: &mut self.machine,
            hw,
            sink,
        };
        self.timers.on_tick(now, &mut dispatch);
        now
    }

    /// Advance the counter by `ticks` without delivering the values in
    /// between, as a stalled tick source would.  Timers due inside the
    /// gap are missed; edges arriving afterwards arm from the new count.
    pub fn skip_ticks(&mut self, ticks: Tick) {
        self.clock.skip(ticks);
        self.timers.advance_to(self.clock.counter());
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Raw edge on `gpio`.  GPIOs outside the monitored set are ignored.
    /// Returns `true` if the edge opened a settle window.
    pub fn on_raw_edge(&mut self, gpio: i32) -> bool {
        match InputId::from_gpio(gpio) {
            Some(input) => self.on_input_changed(input),
            None => false,
        }
    }

    /// Raw edge on a known input.
    pub fn on_input_changed(&mut self, input: InputId) -> bool {
        self.debouncer.on_raw_edge(input, &mut self.timers)
    }

    // ── Configuration ─────────────────────────────────────────

    /// Validate and swap in new parameters.
    ///
    /// Timers already armed keep their expiry; new durations apply at
    /// the next arming.  The expiry policy applies from the next tick.
    /// A different tick period only takes effect once the hardware
    /// timer is restarted.
    pub fn update_config(
        &mut self,
        config: ControllerConfig,
        sink: &mut impl EventSink,
    ) -> core::result::Result<(), ConfigError> {
        config.validate()?;
        self.timers.set_policy(config.expiry_policy);
        self.debouncer = Debouncer::new(config.debounce_ticks);
        self.config = config;
        sink.emit(&ControllerEvent::ConfigUpdated);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn tier(&self) -> Tier {
        self.machine.tier()
    }

    pub fn output(&self) -> OutputState {
        self.machine.output()
    }

    /// Current value of the tick counter.
    pub fn now(&self) -> Tick {
        self.clock.counter()
    }

    pub fn timers(&self) -> &TimerBank {
        &self.timers
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            now: self.clock.counter(),
            tier: self.machine.tier(),
            output: self.machine.output(),
            pending: self.timers.pending(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Expiry dispatch
// ───────────────────────────────────────────────────────────────

/// Borrows the controller's parts for the length of one tick.
struct Dispatch<'a, H, S> {
    config: &'a ControllerConfig,
    machine: &'a mut TierMachine,
    hw: &'a mut H,
    sink: &'a mut S,
}

impl<H, S> Dispatch<'_, H, S>
where
    H: InputPort + OutputPort,
    S: EventSink,
{
    fn settle(&mut self, input: InputId, timers: &mut TimerBank) {
        let edge = Edge::from_level(self.hw.read_level(input));
        self.sink.emit(&ControllerEvent::EdgeSettled { input, edge });
        match input {
            InputId::Switch => {
                self.machine
                    .on_edge(edge, timers, self.config, &mut *self.hw, &mut *self.sink);
            }
            // Reported only.
            InputId::Sense => {}
        }
    }
}

impl<H, S> TimerDelegate for Dispatch<'_, H, S>
where
    H: InputPort + OutputPort,
    S: EventSink,
{
    fn on_timer_expired(&mut self, id: TimerId, timers: &mut TimerBank) {
        match id {
            TimerId::DebounceSwitch => self.settle(InputId::Switch, timers),
            TimerId::DebounceSense => self.settle(InputId::Sense, timers),
            TimerId::Cooldown => {
                self.machine
                    .on_cooldown_expired(timers, &mut *self.hw, &mut *self.sink);
            }
            TimerId::OnOff => {
                self.machine
                    .on_phase_expired(timers, self.config, &mut *self.hw, &mut *self.sink);
            }
        }
    }
}
