//! Application core: timer dispatch and tier logic, zero I/O.
//!
//! All interaction with hardware happens through the **port traits**
//! defined in [`ports`], so the whole controller is testable on the host
//! with mock adapters.

pub mod events;
pub mod ports;
pub mod service;
pub mod shared;
