//! Cross-context access to the controller.
//!
//! The controller, its hardware adapter and its event sink live together
//! in one `static` behind an embassy-sync blocking mutex over
//! [`CriticalSectionRawMutex`].  The tick task and the main loop both go
//! through it, so a tick can never observe a half-finished edge or
//! snapshot and vice versa.
//!
//! ```text
//! ┌────────────┐ clock_tick / raw_edge ┌──────────────────────┐
//! │ Tick task  │──────────────────────▶│  SharedController    │
//! └────────────┘                       │  Mutex<CS, RefCell<  │
//! ┌────────────┐  with / snapshot      │   Option<Runtime>>>  │
//! │ Main loop  │──────────────────────▶│                      │
//! └────────────┘                       └──────────────────────┘
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use super::events::StatusSnapshot;
use super::ports::{EventSink, InputPort, OutputPort};
use super::service::Controller;
use crate::timers::Tick;

struct Runtime<H, S> {
    controller: Controller,
    hw: H,
    sink: S,
}

/// A controller plus its ports, installable into a `static`.
pub struct SharedController<H, S> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<Runtime<H, S>>>>,
}

impl<H, S> SharedController<H, S>
where
    H: InputPort + OutputPort,
    S: EventSink,
{
    /// Empty slot.  Every operation is a no-op until [`install`](Self::install).
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Move the controller in and drive it to its baseline.
    /// Replaces any previously installed runtime.
    pub fn install(&self, controller: Controller, hw: H, sink: S) {
        self.inner.lock(|cell| {
            let mut slot = cell.borrow_mut();
            let rt = slot.insert(Runtime {
                controller,
                hw,
                sink,
            });
            rt.controller.start(&mut rt.hw, &mut rt.sink);
        });
    }

    /// Deliver one clock firing.  Returns the dispatched tick, or `None`
    /// before installation.
    pub fn clock_tick(&self) -> Option<Tick> {
        self.with(|ctrl, hw, sink| ctrl.clock_tick(hw, sink))
    }

    /// Forward a raw GPIO edge.  Returns `true` if it opened a window.
    pub fn raw_edge(&self, gpio: i32) -> bool {
        self.with(|ctrl, _, _| ctrl.on_raw_edge(gpio))
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> Option<StatusSnapshot> {
        self.with(|ctrl, _, _| ctrl.snapshot())
    }

    /// Run `f` with exclusive access to the controller and its ports.
    ///
    /// `f` runs inside a critical section: keep it short and do not log.
    pub fn with<R>(&self, f: impl FnOnce(&mut Controller, &mut H, &mut S) -> R) -> Option<R> {
        self.inner.lock(|cell| {
            let mut slot = cell.borrow_mut();
            let rt = slot.as_mut()?;
            Some(f(&mut rt.controller, &mut rt.hw, &mut rt.sink))
        })
    }
}

impl<H, S> Default for SharedController<H, S>
where
    H: InputPort + OutputPort,
    S: EventSink,
{
    fn default() -> Self {
        Self::new()
    }
}
