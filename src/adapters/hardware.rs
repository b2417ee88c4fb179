//! Hardware adapter: bridges the board to the controller's ports.
//!
//! Owns the relay/indicator driver and the two input pins, exposing them
//! through [`InputPort`] and [`OutputPort`].  This is the only module in
//! the system that touches actual hardware.  On non-espidf targets the
//! GPIO helpers underneath are simulation stubs.
//!
//! Both inputs are contacts to GND over the internal pull-up, so a LOW
//! line is reported to the controller as asserted.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{InputPort, OutputPort};
use crate::debounce::InputId;
use crate::drivers::hw_init::{GpioIn, GpioOut};
use crate::drivers::relay::RelayIndicator;
use crate::pins;

/// Concrete adapter that combines all board I/O behind the port traits.
pub struct HardwareAdapter<R = GpioOut, L = GpioOut, I = GpioIn> {
    output: RelayIndicator<R, L>,
    switch: I,
    sense: I,
}

impl HardwareAdapter {
    /// The board as wired in [`pins`].
    pub fn board() -> Self {
        Self::new(
            RelayIndicator::new(GpioOut(pins::RELAY_GPIO), GpioOut(pins::LED_GPIO)),
            GpioIn(pins::SWIN_GPIO),
            GpioIn(pins::SENSE_GPIO),
        )
    }
}

impl<R: OutputPin, L: OutputPin, I: InputPin> HardwareAdapter<R, L, I> {
    pub fn new(output: RelayIndicator<R, L>, switch: I, sense: I) -> Self {
        Self {
            output,
            switch,
            sense,
        }
    }
}

// ── InputPort implementation ──────────────────────────────────

impl<R: OutputPin, L: OutputPin, I: InputPin> InputPort for HardwareAdapter<R, L, I> {
    fn read_level(&mut self, input: InputId) -> bool {
        let pin = match input {
            InputId::Switch => &mut self.switch,
            InputId::Sense => &mut self.sense,
        };
        // Active low: pressed pulls the line to GND.
        pin.is_low().unwrap_or_else(|_| {
            warn!("hardware: read of {:?} failed, treating as released", input);
            false
        })
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<R: OutputPin, L: OutputPin, I: InputPin> OutputPort for HardwareAdapter<R, L, I> {
    fn set_output(&mut self, on: bool) {
        self.output.set(on);
    }
}
