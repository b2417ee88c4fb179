//! ARWE tiered relay controller library.
//!
//! Exposes the pure-logic modules for integration testing and the
//! firmware binary.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod clock;
pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod fsm;
pub mod pins;
pub mod timers;

// Hardware-facing layers; host builds get simulation stubs.
pub mod adapters;
pub mod drivers;
