//! ARWE firmware entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                      │
//! │   HardwareAdapter (Input+Output)    QueuedEventSink (Sink)    │
//! │  ──────────────── Port Trait Boundary ─────────────────────   │
//! │  ┌────────────────────────────────────────────────────────┐   │
//! │  │   Controller: Clock · TimerBank · Debouncer · FSM      │   │
//! │  └────────────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//!   GPIO ISR ──▶ edge latch ──┐
//!   esp_timer (tick task) ────┴──▶ SharedController ──▶ event queue ──▶ main loop ──▶ log
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use arwe::adapters::event_queue::{self, QueuedEventSink};
use arwe::adapters::hardware::HardwareAdapter;
use arwe::adapters::log_sink::LogEventSink;
use arwe::app::events::ControllerEvent;
use arwe::app::ports::EventSink;
use arwe::app::service::Controller;
use arwe::app::shared::SharedController;
use arwe::config::ControllerConfig;
use arwe::drivers::{hw_init, hw_timer};

/// The one controller instance, shared by the tick task and this loop.
static RUNTIME: SharedController<HardwareAdapter, QueuedEventSink> = SharedController::new();

/// Milliseconds between status records.
const STATUS_INTERVAL_MS: u32 = 1000;

/// Event queue poll period.
const POLL_MS: u32 = 50;

fn load_config() -> ControllerConfig {
    match option_env!("ARWE_CONFIG_JSON") {
        Some(doc) => match ControllerConfig::from_json(doc) {
            Ok(cfg) => {
                info!("Config loaded from ARWE_CONFIG_JSON");
                cfg
            }
            Err(e) => {
                warn!("ARWE_CONFIG_JSON rejected ({}), using defaults", e);
                ControllerConfig::default()
            }
        },
        None => {
            warn!("No ARWE_CONFIG_JSON at build time, using defaults");
            ControllerConfig::default()
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Starting ARWE v{:<21}║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();
    info!(
        "Config: tick={}us debounce={} cooldown={} on={} off={}/{} policy={:?}",
        config.tick_period_us,
        config.debounce_ticks,
        config.cooldown_ticks,
        config.on_ticks,
        config.half1_off_ticks,
        config.half2_off_ticks,
        config.expiry_policy,
    );
    let period_us = config.tick_period_us;
    let controller = Controller::new(config)?;

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without the relay pins there is nothing safe to do.
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 4. Controller + interrupts + tick ─────────────────────
    RUNTIME.install(controller, HardwareAdapter::board(), QueuedEventSink);
    hw_init::init_isr_service()?;
    hw_timer::start_tick_timer(period_us, &RUNTIME)?;

    info!("System ready. Entering status loop.");

    // ── 5. Status loop ────────────────────────────────────────
    let mut log_sink = LogEventSink::new();
    let mut since_status_ms: u32 = 0;

    loop {
        esp_idf_svc::hal::delay::FreeRtos::delay_ms(POLL_MS);

        event_queue::drain_into(&mut log_sink);
        let dropped = event_queue::take_dropped();
        if dropped > 0 {
            warn!("event queue overflow: {} events dropped", dropped);
        }

        since_status_ms += POLL_MS;
        if since_status_ms >= STATUS_INTERVAL_MS {
            since_status_ms = 0;
            if let Some(snap) = RUNTIME.snapshot() {
                log_sink.emit(&ControllerEvent::Status(snap));
            }
        }
    }
}
