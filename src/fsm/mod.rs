//! Tier state machine.
//!
//! ```text
//!            rise          rise          rise
//!   ┌──────┐ ───▶ ┌──────┐ ───▶ ┌───────┐ ───▶ ┌───────┐ ◀─┐ rise
//!   │ Idle │      │ Full │      │ Half1 │      │ Half2 │ ──┘ (saturate)
//!   └──────┘      └──────┘      └───────┘      └───────┘
//!       ▲             │              │              │
//!       └─────────────┴──────────────┴──────────────┘
//!                  cooldown expiry (fall + quiet window)
//! ```
//!
//! Full holds the output on.  Half1 and Half2 cycle it: on for the
//! shared on phase, off for the tier's own off phase.  A falling edge
//! only starts the cooldown; nothing changes until it expires
//! uninterrupted.  Every transition is a method on [`TierMachine`]
//! which mutates the timer bank and drives the output port directly.

pub mod machine;

pub use machine::TierMachine;

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Ordered intensity tiers.  The discriminant is the tier's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Tier {
    #[default]
    Idle = 0,
    /// Output held on.
    Full = 1,
    /// Cycling, longest off phase.
    Half1 = 2,
    /// Cycling, shorter off phase.
    Half2 = 3,
}

impl Tier {
    /// Highest tier; rising edges saturate here.
    pub const MAX: Tier = Tier::Half2;

    /// One step up, saturating at [`Tier::MAX`].
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::Full,
            Self::Full => Self::Half1,
            Self::Half1 | Self::Half2 => Self::Half2,
        }
    }

    /// Whether the output toggles on a timer in this tier.
    pub fn is_cycling(self) -> bool {
        matches!(self, Self::Half1 | Self::Half2)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Full => "full",
            Self::Half1 => "half1",
            Self::Half2 => "half2",
        }
    }
}

// ---------------------------------------------------------------------------
// Output state
// ---------------------------------------------------------------------------

/// Logical output shared by the relay and its indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputState {
    #[default]
    Off,
    On,
}

impl OutputState {
    pub fn is_on(self) -> bool {
        self == Self::On
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}
