//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing controller events to the ESP-IDF
//! logger (UART / USB-CDC in production) as one `TAG | key=value` line
//! each.  Best-effort: the `log` facade drops records when no logger is
//! installed.

use core::fmt::Write;

use log::info;

use crate::app::events::{ControllerEvent, StatusSnapshot};
use crate::app::ports::EventSink;

/// Adapter that logs every [`ControllerEvent`] to the serial console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControllerEvent) {
        match event {
            ControllerEvent::Started { tier, output } => {
                info!("START | tier={} output={:?}", tier.name(), output);
            }
            ControllerEvent::EdgeSettled { input, edge } => {
                info!("EDGE  | input={:?} edge={:?}", input, edge);
            }
            ControllerEvent::TierChanged { from, to } => {
                info!("TIER  | {} -> {}", from.name(), to.name());
            }
            ControllerEvent::OutputChanged(state) => {
                info!("OUT   | output={:?}", state);
            }
            ControllerEvent::CooldownArmed { expires_at } => {
                info!("COOL  | armed expires_at={}", expires_at);
            }
            ControllerEvent::CooldownAborted => {
                info!("COOL  | aborted");
            }
            ControllerEvent::CooldownExpired => {
                info!("COOL  | expired");
            }
            ControllerEvent::ConfigUpdated => {
                info!("CONF  | updated");
            }
            ControllerEvent::Status(snap) => log_status(snap),
        }
    }
}

fn log_status(snap: &StatusSnapshot) {
    let mut pending: heapless::String<128> = heapless::String::new();
    for (id, at) in &snap.pending {
        // Overflow only truncates the diagnostic line.
        let _ = write!(pending, " {}@{}", id.name(), at);
    }
    info!(
        "STAT  | t={} tier={} output={:?} armed=[{}]",
        snap.now,
        snap.tier.name(),
        snap.output,
        pending.trim_start(),
    );
}
