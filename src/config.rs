//! Controller configuration parameters.
//!
//! Every duration the controller uses is a named field here, expressed in
//! clock ticks.  Defaults suit the stock board (1 ms tick).  The
//! firmware can override them from a JSON document at build time, and
//! [`Controller::update_config`](crate::app::service::Controller::update_config)
//! swaps them at runtime.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fsm::{OutputState, Tier};
use crate::timers::{ExpiryPolicy, MAX_DELAY_TICKS, Tick};

/// Core controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Clock ---
    /// Tick period in microseconds.
    pub tick_period_us: u32,
    /// How armed timers decide they are due.
    pub expiry_policy: ExpiryPolicy,

    // --- Input ---
    /// Settle window after the first raw edge on an input.
    pub debounce_ticks: Tick,

    // --- Tier control ---
    /// Inactivity window after release before the tier resets to Idle.
    pub cooldown_ticks: Tick,
    /// On phase of every cycling tier.
    pub on_ticks: Tick,
    /// Off phase of the first cycling tier.
    pub half1_off_ticks: Tick,
    /// Off phase of the second cycling tier (shorter than `half1_off_ticks`).
    pub half2_off_ticks: Tick,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_period_us: 1000, // 1 kHz

            expiry_policy: ExpiryPolicy::Exact,

            debounce_ticks: 100,

            cooldown_ticks: 1000,
            on_ticks: 1000,
            half1_off_ticks: 5000,
            half2_off_ticks: 2500,
        }
    }
}

impl ControllerConfig {
    /// Parse a JSON document.  Missing fields take their defaults; the
    /// result is validated before it is returned.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(doc).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the timer bank or the tier table cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_us == 0 {
            return Err(ConfigError::ValidationFailed("tick_period_us must be non-zero"));
        }

        // A zero delay expires on the tick that armed it, which has
        // already been dispatched.
        let durations = [
            (self.debounce_ticks, "debounce_ticks must be non-zero"),
            (self.cooldown_ticks, "cooldown_ticks must be non-zero"),
            (self.on_ticks, "on_ticks must be non-zero"),
            (self.half1_off_ticks, "half1_off_ticks must be non-zero"),
            (self.half2_off_ticks, "half2_off_ticks must be non-zero"),
        ];
        for (ticks, if_zero) in durations {
            if ticks == 0 {
                return Err(ConfigError::ValidationFailed(if_zero));
            }
            if ticks > MAX_DELAY_TICKS {
                return Err(ConfigError::ValidationFailed(
                    "durations must be below 2^31 ticks",
                ));
            }
        }

        if self.half2_off_ticks >= self.half1_off_ticks {
            return Err(ConfigError::ValidationFailed(
                "half2_off_ticks must be shorter than half1_off_ticks",
            ));
        }
        Ok(())
    }

    /// Off phase for a cycling tier, `None` for Idle and Full.
    pub fn off_ticks(&self, tier: Tier) -> Option<Tick> {
        match tier {
            Tier::Half1 => Some(self.half1_off_ticks),
            Tier::Half2 => Some(self.half2_off_ticks),
            Tier::Idle | Tier::Full => None,
        }
    }

    /// Phase length after switching a cycling tier to `output`.
    /// `None` means the tier does not cycle and nothing is re-armed.
    pub fn phase_ticks(&self, tier: Tier, output: OutputState) -> Option<Tick> {
        if !tier.is_cycling() {
            return None;
        }
        match output {
            OutputState::On => Some(self.on_ticks),
            OutputState::Off => self.off_ticks(tier),
        }
    }
}
