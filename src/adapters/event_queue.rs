//! Queued event sink for the tick context.
//!
//! On the target the controller runs inside a critical section, where
//! the logger must not be called.  [`QueuedEventSink`] only copies each
//! event into a bounded embassy-sync channel; the main loop drains the
//! channel into a real sink (normally [`LogEventSink`](super::log_sink::LogEventSink))
//! outside any lock.
//!
//! ```text
//! ┌───────────┐  try_send   ┌──────────────┐  try_receive  ┌──────────────┐
//! │ Tick task │────────────▶│ EVENT_QUEUE  │──────────────▶│  Main loop   │
//! │ (locked)  │  drop+count │  Channel<32> │               │ LogEventSink │
//! └───────────┘  when full  └──────────────┘               └──────────────┘
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::events::ControllerEvent;
use crate::app::ports::EventSink;

/// Channel depth.  One tick emits at most a handful of events.
const QUEUE_DEPTH: usize = 32;

static EVENT_QUEUE: Channel<CriticalSectionRawMutex, ControllerEvent, QUEUE_DEPTH> = Channel::new();

/// Events discarded because the queue was full.
static DROPPED: AtomicU32 = AtomicU32::new(0);

/// Sink half: never blocks, never logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueuedEventSink;

impl EventSink for QueuedEventSink {
    fn emit(&mut self, event: &ControllerEvent) {
        if EVENT_QUEUE.try_send(event.clone()).is_err() {
            DROPPED.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Move every queued event into `sink`.  Returns how many were moved.
pub fn drain_into(sink: &mut impl EventSink) -> usize {
    let mut moved = 0;
    while let Ok(event) = EVENT_QUEUE.try_receive() {
        sink.emit(&event);
        moved += 1;
    }
    moved
}

/// Take and reset the dropped-event counter.
pub fn take_dropped() -> u32 {
    DROPPED.swap(0, Ordering::Relaxed)
}
