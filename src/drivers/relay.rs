//! Relay + indicator output driver.
//!
//! The relay coil and the LED that mirrors it are separate pins but one
//! logical output.  Both writes happen inside a single critical section
//! so nothing can run between them and see the pair disagree.
//!
//! ## Dual-target design
//!
//! Generic over `embedded_hal::digital::OutputPin`.  On ESP-IDF the
//! pins are [`GpioOut`](super::hw_init::GpioOut); on host they are
//! whatever the test supplies.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

pub struct RelayIndicator<R, L> {
    relay: R,
    led: L,
}

impl<R: OutputPin, L: OutputPin> RelayIndicator<R, L> {
    /// Wrap the pins.  Nothing is written until the first [`set`](Self::set).
    pub fn new(relay: R, led: L) -> Self {
        Self { relay, led }
    }

    pub fn set(&mut self, on: bool) {
        let level = PinState::from(on);
        let (relay_ok, led_ok) = critical_section::with(|_| {
            (
                self.relay.set_state(level).is_ok(),
                self.led.set_state(level).is_ok(),
            )
        });
        if !relay_ok {
            warn!("relay: relay pin write failed");
        }
        if !led_ok {
            warn!("relay: indicator pin write failed");
        }
    }
}
