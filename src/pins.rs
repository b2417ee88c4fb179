//! GPIO pin assignments for the ARWE controller board.
//!
//! Single source of truth; every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Inputs (any-edge interrupts, internal pull-up, active LOW)
// ---------------------------------------------------------------------------

/// Momentary switch to GND that selects the intensity tier.  LOW = pressed.
pub const SWIN_GPIO: i32 = 4;
/// Auxiliary sense contact to GND.  LOW = active.  Debounced and
/// reported, no control effect.
pub const SENSE_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Outputs (always written together)
// ---------------------------------------------------------------------------

/// Relay coil driver for the actuator (fan / heater).  HIGH = energised.
pub const RELAY_GPIO: i32 = 6;
/// Indicator LED mirroring the relay.  HIGH = lit.
pub const LED_GPIO: i32 = 7;

// The edge latch in `events` holds one bit per GPIO in an `AtomicU32`.
const _: () = assert!(SWIN_GPIO < 32 && SENSE_GPIO < 32);
