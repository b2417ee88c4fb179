//! Hardware tick timer using ESP-IDF's esp_timer API.
//!
//! One periodic timer is the controller's only time base.  Its callback
//! runs in the ESP timer task (not ISR) and does two things, in order:
//! forward every raw edge latched by the GPIO ISRs since the last tick,
//! then deliver the tick itself.  Edges and ticks therefore run in the
//! same context and never preempt each other.
//!
//! On simulation targets nothing is started; tests call
//! [`on_timer_fired`] directly.

use crate::app::ports::{EventSink, InputPort, OutputPort};
use crate::app::shared::SharedController;
use crate::drivers::hw_init::HwInitError;
use crate::events::{drain_edges, edges_pending};
use crate::timers::Tick;

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicPtr, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static TICK_TIMER: AtomicPtr<esp_timer> = AtomicPtr::new(core::ptr::null_mut());

/// Body of one timer firing: drain latched edges, then tick.
/// Returns the dispatched tick, or `None` if nothing is installed.
pub fn on_timer_fired<H, S>(runtime: &SharedController<H, S>) -> Option<Tick>
where
    H: InputPort + OutputPort,
    S: EventSink,
{
    // Plain load first; most ticks have no edge to forward.
    if edges_pending() {
        drain_edges(|gpio| {
            runtime.raw_edge(gpio);
        });
    }
    runtime.clock_tick()
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb<H, S>(arg: *mut core::ffi::c_void)
where
    H: InputPort + OutputPort,
    S: EventSink,
{
    // SAFETY: `arg` is the `&'static SharedController<H, S>` handed to
    // start_tick_timer(); it outlives every callback.
    let runtime = unsafe { &*(arg as *const SharedController<H, S>) };
    on_timer_fired(runtime);
}

/// Start the periodic tick at `period_us`.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer<H, S>(
    period_us: u32,
    runtime: &'static SharedController<H, S>,
) -> Result<(), HwInitError>
where
    H: InputPort + OutputPort,
    S: EventSink,
{
    let args = esp_timer_create_args_t {
        callback: Some(tick_cb::<H, S>),
        arg: runtime as *const SharedController<H, S> as *mut core::ffi::c_void,
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: c"arwe_tick".as_ptr(),
        skip_unhandled_events: false,
    };

    let mut handle: esp_timer_handle_t = core::ptr::null_mut();
    // SAFETY: args lives for the call; esp_timer copies it.
    let ret = unsafe { esp_timer_create(&args, &mut handle) };
    if ret != ESP_OK {
        return Err(HwInitError::TimerFailed(ret));
    }

    // SAFETY: handle was just created successfully.
    let ret = unsafe { esp_timer_start_periodic(handle, u64::from(period_us)) };
    if ret != ESP_OK {
        // SAFETY: not started, safe to delete.
        unsafe { esp_timer_delete(handle) };
        return Err(HwInitError::TimerFailed(ret));
    }

    let previous = TICK_TIMER.swap(handle, Ordering::AcqRel);
    if !previous.is_null() {
        // SAFETY: previous is a handle this module created.
        unsafe {
            esp_timer_stop(previous);
            esp_timer_delete(previous);
        }
    }

    info!("hw_timer: tick @ {}us started", period_us);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer<H, S>(
    period_us: u32,
    _runtime: &'static SharedController<H, S>,
) -> Result<(), HwInitError>
where
    H: InputPort + OutputPort,
    S: EventSink,
{
    log::info!("hw_timer(sim): tick @ {}us not started (call on_timer_fired)", period_us);
    Ok(())
}

/// Stop the tick timer.  No-op if it was never started.
#[cfg(target_os = "espidf")]
pub fn stop_tick_timer() {
    let handle = TICK_TIMER.swap(core::ptr::null_mut(), Ordering::AcqRel);
    if !handle.is_null() {
        // SAFETY: handle came from start_tick_timer(); swapped out so no
        // one else can stop or delete it.
        unsafe {
            esp_timer_stop(handle);
            esp_timer_delete(handle);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_tick_timer() {}
