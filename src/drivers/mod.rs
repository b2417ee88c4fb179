//! Board drivers: peripheral initialisation, tick timer, relay output.

pub mod hw_init;
pub mod hw_timer;
pub mod relay;
