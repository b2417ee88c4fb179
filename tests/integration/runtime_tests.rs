//! Integration tests: ISR edge latch → timer callback → SharedController
//! → queued event sink, the firmware's runtime path on the host.

use arwe::adapters::event_queue::{self, QueuedEventSink};
use arwe::adapters::log_sink::LogEventSink;
use arwe::app::events::ControllerEvent;
use arwe::app::ports::EventSink;
use arwe::app::service::Controller;
use arwe::app::shared::SharedController;
use arwe::config::ControllerConfig;
use arwe::drivers::hw_timer;
use arwe::events;
use arwe::fsm::{OutputState, Tier};
use arwe::pins;

use crate::mock_hw::{MockBoard, RecordingSink};

static RUNTIME: SharedController<MockBoard, QueuedEventSink> = SharedController::new();

// The edge latch and the event queue are process-wide statics; this is
// the only test in the binary that touches them.
#[test]
fn latched_edges_reach_controller_through_timer_callback() {
    let ctrl = Controller::new(ControllerConfig::default()).unwrap();
    RUNTIME.install(ctrl, MockBoard::new(), QueuedEventSink);
    assert!(hw_timer::start_tick_timer(1000, &RUNTIME).is_ok());

    RUNTIME.with(|_, hw, _| hw.switch_high = true);
    events::latch_edge(pins::SWIN_GPIO);
    events::latch_edge(pins::RELAY_GPIO);

    for _ in 0..100 {
        hw_timer::on_timer_fired(&RUNTIME);
    }
    assert!(!events::edges_pending());

    let snap = RUNTIME.snapshot().unwrap();
    assert_eq!(snap.now, 100);
    assert_eq!(snap.tier, Tier::Full);
    assert_eq!(snap.output, OutputState::On);

    let mut log = RecordingSink::new();
    event_queue::drain_into(&mut log);
    assert_eq!(
        log.events.first(),
        Some(&ControllerEvent::Started {
            tier: Tier::Idle,
            output: OutputState::Off
        })
    );
    assert!(log.events.contains(&ControllerEvent::OutputChanged(OutputState::On)));
    assert_eq!(event_queue::take_dropped(), 0);

    // The log renderer accepts everything the controller produces.
    let mut sink = LogEventSink::new();
    for event in &log.events {
        sink.emit(event);
    }
    sink.emit(&ControllerEvent::Status(snap));

    hw_timer::stop_tick_timer();
}

#[test]
fn callback_before_install_is_inert() {
    let empty: SharedController<MockBoard, RecordingSink> = SharedController::new();
    assert_eq!(empty.clock_tick(), None);
    assert_eq!(empty.snapshot(), None);
}
