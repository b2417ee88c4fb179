//! Port traits: the boundary between the controller and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! The [`Controller`](super::service::Controller) takes these as generics
//! at each call site and never touches a pin directly.

use crate::debounce::InputId;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: sample the settled level of a monitored input.
pub trait InputPort {
    /// `true` when the input is asserted (switch pressed, sense active),
    /// whatever the electrical polarity of the pin.
    fn read_level(&mut self, input: InputId) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the relay and its indicator, always driven together.
pub trait OutputPort {
    /// Drive relay and indicator to `on`.  Implementations must make
    /// both writes appear as one to any observer.
    fn set_output(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The controller emits structured
/// [`ControllerEvent`](super::events::ControllerEvent)s through this port.
/// Delivery is best-effort; a sink must not block.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ControllerEvent);
}
