//! Interrupt-side edge latch.
//!
//! GPIO ISRs must not touch the controller (it lives behind a critical
//! section and logs).  Instead each ISR sets one bit in a lock-free mask;
//! the tick task drains the mask just before it delivers the next tick,
//! so edge handling and tick handling run in the same context and can
//! never preempt each other.
//!
//! ```text
//! ┌─────────────┐  latch_edge(gpio)  ┌──────────────┐  drain_edges  ┌──────────────┐
//! │ GPIO ISR    │───────────────────▶│ PENDING_EDGES│──────────────▶│  Tick task   │
//! │ (any edge)  │   fetch_or (bit)   │  AtomicU32   │    swap(0)    │  Controller  │
//! └─────────────┘                    └──────────────┘               └──────────────┘
//! ```
//!
//! Several raw edges on one pin between two ticks collapse into one
//! notification.  The debouncer ignores all but the first anyway.

use core::sync::atomic::{AtomicU32, Ordering};

/// One bit per GPIO number below 32.
static PENDING_EDGES: AtomicU32 = AtomicU32::new(0);

/// Record a raw edge on `gpio`.
/// Safe to call from ISR context (single atomic RMW, no locks).
/// GPIOs outside the latch's range are dropped; none of them is monitored.
pub fn latch_edge(gpio: i32) {
    if (0..32).contains(&gpio) {
        PENDING_EDGES.fetch_or(1 << gpio, Ordering::AcqRel);
    }
}

/// Take every latched edge, lowest GPIO first.
pub fn drain_edges(mut handler: impl FnMut(i32)) {
    let mut mask = PENDING_EDGES.swap(0, Ordering::AcqRel);
    while mask != 0 {
        let gpio = mask.trailing_zeros();
        mask &= mask - 1;
        handler(gpio as i32);
    }
}

/// Whether any edge is waiting.
pub fn edges_pending() -> bool {
    PENDING_EDGES.load(Ordering::Acquire) != 0
}
