//! Integration tests: raw edges + clock ticks → Controller → output.

use arwe::app::events::ControllerEvent;
use arwe::app::service::Controller;
use arwe::config::ControllerConfig;
use arwe::debounce::{Edge, InputId};
use arwe::fsm::{OutputState, Tier};
use arwe::pins;
use arwe::timers::{ExpiryPolicy, Tick, TimerId};

use crate::mock_hw::{MockBoard, RecordingSink};

// ── Bench ─────────────────────────────────────────────────────

struct Bench {
    ctrl: Controller,
    board: MockBoard,
    sink: RecordingSink,
}

impl Bench {
    fn new(config: ControllerConfig) -> Self {
        let mut ctrl = Controller::new(config).unwrap();
        let mut board = MockBoard::new();
        let mut sink = RecordingSink::new();
        ctrl.start(&mut board, &mut sink);
        Self { ctrl, board, sink }
    }

    fn defaults() -> Self {
        Self::new(ControllerConfig::default())
    }

    fn tick(&mut self) -> Tick {
        self.ctrl.clock_tick(&mut self.board, &mut self.sink)
    }

    /// Deliver ticks until `t` has been dispatched.
    fn run_to(&mut self, t: Tick) {
        while self.ctrl.now() != t {
            self.tick();
        }
    }

    fn press(&mut self) -> bool {
        self.board.switch_high = true;
        self.ctrl.on_raw_edge(pins::SWIN_GPIO)
    }

    fn release(&mut self) -> bool {
        self.board.switch_high = false;
        self.ctrl.on_raw_edge(pins::SWIN_GPIO)
    }

    fn settled_edges(&self, input: InputId) -> Vec<Edge> {
        self.sink
            .events
            .iter()
            .filter_map(|e| match e {
                ControllerEvent::EdgeSettled { input: i, edge } if *i == input => Some(*edge),
                _ => None,
            })
            .collect()
    }
}

// ── Scenario A: single press, release, cooldown ───────────────

#[test]
fn scenario_single_press_then_cooldown() {
    let mut b = Bench::defaults();
    assert_eq!(b.board.output(), Some(false));

    assert!(b.press());
    b.run_to(99);
    assert_eq!(b.ctrl.tier(), Tier::Idle);

    b.run_to(100);
    assert_eq!(b.ctrl.tier(), Tier::Full);
    assert_eq!(b.ctrl.output(), OutputState::On);
    assert_eq!(b.board.output(), Some(true));
    assert!(!b.ctrl.timers().is_armed(TimerId::OnOff));

    b.run_to(150);
    assert!(b.release());
    b.run_to(250);
    assert_eq!(b.ctrl.timers().expiry(TimerId::Cooldown), Some(1250));
    assert_eq!(b.ctrl.tier(), Tier::Full);
    assert_eq!(b.ctrl.output(), OutputState::On);

    b.run_to(1249);
    assert_eq!(b.ctrl.tier(), Tier::Full);

    b.run_to(1250);
    assert_eq!(b.ctrl.tier(), Tier::Idle);
    assert_eq!(b.ctrl.output(), OutputState::Off);
    assert_eq!(b.board.output(), Some(false));
    assert!(b.ctrl.timers().pending().is_empty());

    assert_eq!(
        b.sink.tier_changes(),
        vec![(Tier::Idle, Tier::Full), (Tier::Full, Tier::Idle)]
    );
}

// ── Scenario B: second tier cycles until cooldown ─────────────

#[test]
fn scenario_second_tier_cycles_until_cooldown() {
    let mut b = Bench::defaults();

    b.press();
    b.run_to(150);
    b.release();
    b.run_to(300);
    // Press again while the cooldown is running.
    b.press();
    b.run_to(400);
    assert_eq!(b.ctrl.tier(), Tier::Half1);
    assert!(!b.ctrl.timers().is_armed(TimerId::Cooldown));
    assert_eq!(b.ctrl.timers().expiry(TimerId::OnOff), Some(1400));

    b.run_to(1400);
    assert_eq!(b.ctrl.output(), OutputState::Off);
    assert_eq!(b.ctrl.timers().expiry(TimerId::OnOff), Some(6400));

    b.run_to(6399);
    assert_eq!(b.ctrl.output(), OutputState::Off);
    b.run_to(6400);
    assert_eq!(b.ctrl.output(), OutputState::On);
    assert_eq!(b.ctrl.timers().expiry(TimerId::OnOff), Some(7400));

    b.run_to(7400);
    assert_eq!(b.ctrl.output(), OutputState::Off);
    assert_eq!(b.ctrl.timers().expiry(TimerId::OnOff), Some(12_400));

    b.run_to(7500);
    b.release();
    b.run_to(7600);
    assert_eq!(b.ctrl.timers().expiry(TimerId::Cooldown), Some(8600));
    assert!(b.ctrl.timers().is_armed(TimerId::OnOff));

    b.run_to(8600);
    assert_eq!(b.ctrl.tier(), Tier::Idle);
    assert_eq!(b.ctrl.output(), OutputState::Off);
    assert!(!b.ctrl.timers().is_armed(TimerId::OnOff));

    // Nothing fires after the reset.
    let writes = b.board.writes.len();
    b.run_to(20_000);
    assert_eq!(b.board.writes.len(), writes);
    assert!(b.sink.events.contains(&ControllerEvent::CooldownAborted));
}

#[test]
fn highest_tier_uses_shorter_off_phase() {
    let mut b = Bench::defaults();
    for t in [0, 200, 400] {
        b.run_to(t);
        b.press();
        b.run_to(t + 100);
        b.release();
    }
    assert_eq!(b.ctrl.tier(), Tier::Half2);
    assert_eq!(b.ctrl.timers().expiry(TimerId::OnOff), Some(1500));

    b.run_to(1500);
    assert_eq!(b.ctrl.output(), OutputState::Off);
    assert_eq!(b.ctrl.timers().expiry(TimerId::OnOff), Some(1500 + 2500));
}

// ── Debounce ──────────────────────────────────────────────────

#[test]
fn chatter_inside_window_yields_one_edge() {
    let mut b = Bench::defaults();
    assert!(b.press());
    for t in [10, 20, 30, 99] {
        b.run_to(t);
        assert!(!b.release());
        assert!(!b.press());
    }
    b.run_to(500);
    assert_eq!(b.settled_edges(InputId::Switch), vec![Edge::Rising]);
    assert_eq!(b.ctrl.tier(), Tier::Full);
}

#[test]
fn settled_level_decides_edge_direction() {
    let mut b = Bench::defaults();
    // Bounce that ends low: the window reports Falling, not Rising.
    b.press();
    b.run_to(50);
    b.board.switch_high = false;
    b.run_to(100);
    assert_eq!(b.settled_edges(InputId::Switch), vec![Edge::Falling]);
    assert_eq!(b.ctrl.tier(), Tier::Idle);
    assert!(b.ctrl.timers().is_armed(TimerId::Cooldown));
}

#[test]
fn sense_input_is_reported_only() {
    let mut b = Bench::defaults();
    b.board.sense_high = true;
    assert!(b.ctrl.on_raw_edge(pins::SENSE_GPIO));
    b.run_to(100);
    assert_eq!(b.settled_edges(InputId::Sense), vec![Edge::Rising]);
    assert_eq!(b.ctrl.tier(), Tier::Idle);
    assert_eq!(b.board.writes, vec![false]);
}

#[test]
fn unknown_interrupt_source_is_ignored() {
    let mut b = Bench::defaults();
    for gpio in [-1, 0, pins::RELAY_GPIO, pins::LED_GPIO, 31, 99] {
        assert!(!b.ctrl.on_raw_edge(gpio));
    }
    b.run_to(2000);
    assert!(b.ctrl.timers().pending().is_empty());
    assert_eq!(b.sink.events.len(), 1); // Started only
}

// ── Tiers ─────────────────────────────────────────────────────

#[test]
fn tier_saturates_at_highest() {
    let mut b = Bench::defaults();
    let mut t = 0;
    for _ in 0..6 {
        b.run_to(t);
        b.press();
        b.run_to(t + 100);
        b.release();
        t += 200;
    }
    b.run_to(t);
    assert_eq!(b.ctrl.tier(), Tier::Half2);
    let to_tiers: Vec<Tier> = b.sink.tier_changes().into_iter().map(|(_, to)| to).collect();
    assert_eq!(to_tiers, vec![Tier::Full, Tier::Half1, Tier::Half2]);
}

#[test]
fn press_due_on_cooldown_tick_cancels_it() {
    let mut b = Bench::defaults();
    b.press();
    b.run_to(150);
    b.release();
    b.run_to(1150);
    assert_eq!(b.ctrl.timers().expiry(TimerId::Cooldown), Some(1250));
    // Debounce for this press expires on 1250 too.
    b.press();
    b.run_to(1250);
    assert_eq!(b.ctrl.tier(), Tier::Half1);
    assert_eq!(
        b.sink
            .count(|e| matches!(e, ControllerEvent::CooldownExpired)),
        0
    );
}

// ── Missed ticks and wraparound ───────────────────────────────

#[test]
fn missed_tick_under_exact_never_fires() {
    let mut b = Bench::defaults();
    b.press();
    b.ctrl.skip_ticks(100);
    for _ in 0..10_000 {
        b.tick();
    }
    assert_eq!(b.ctrl.tier(), Tier::Idle);
    assert!(b.ctrl.timers().is_armed(TimerId::DebounceSwitch));
    // The stuck window swallows later edges too.
    assert!(!b.press());
    assert!(b.settled_edges(InputId::Switch).is_empty());
}

#[test]
fn missed_tick_under_reached_fires_late() {
    let mut b = Bench::new(ControllerConfig {
        expiry_policy: ExpiryPolicy::Reached,
        ..Default::default()
    });
    b.press();
    b.ctrl.skip_ticks(100);
    assert_eq!(b.tick(), 101);
    assert_eq!(b.ctrl.tier(), Tier::Full);
}

#[test]
fn expiry_wraps_around_counter() {
    for policy in [ExpiryPolicy::Exact, ExpiryPolicy::Reached] {
        let mut b = Bench::new(ControllerConfig {
            expiry_policy: policy,
            ..Default::default()
        });
        b.ctrl.skip_ticks(u32::MAX - 50);
        b.tick();
        assert_eq!(b.ctrl.now(), u32::MAX - 49);

        b.press();
        assert_eq!(b.ctrl.timers().expiry(TimerId::DebounceSwitch), Some(50));
        b.run_to(49);
        assert_eq!(b.ctrl.tier(), Tier::Idle, "{policy:?}");
        b.run_to(50);
        assert_eq!(b.ctrl.tier(), Tier::Full, "{policy:?}");
    }
}

#[test]
fn press_after_skipped_ticks_still_settles() {
    let mut b = Bench::defaults();
    b.ctrl.skip_ticks(100);
    assert!(b.press());
    for _ in 0..5000 {
        b.tick();
    }
    assert_eq!(b.settled_edges(InputId::Switch), vec![Edge::Rising]);
    assert_eq!(b.ctrl.tier(), Tier::Full);
    assert_eq!(b.board.output(), Some(true));
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn reset_mid_cycle_restores_baseline() {
    let mut b = Bench::defaults();
    b.press();
    b.run_to(200);
    b.release();
    b.run_to(300);
    b.press();
    b.run_to(450);
    assert_eq!(b.ctrl.tier(), Tier::Half1);

    b.ctrl.reset(&mut b.board, &mut b.sink);
    assert_eq!(b.ctrl.tier(), Tier::Idle);
    assert_eq!(b.board.output(), Some(false));
    assert_eq!(b.ctrl.now(), 0);
    assert!(b.ctrl.timers().pending().is_empty());

    // Works like a fresh start afterwards.
    b.press();
    b.run_to(100);
    assert_eq!(b.ctrl.tier(), Tier::Full);
}

#[test]
fn config_update_applies_at_next_arming() {
    let mut b = Bench::defaults();
    b.press();
    b.run_to(100);
    b.release();
    b.run_to(200);
    assert_eq!(b.ctrl.timers().expiry(TimerId::Cooldown), Some(1200));

    let config = ControllerConfig {
        cooldown_ticks: 300,
        ..Default::default()
    };
    b.ctrl.update_config(config, &mut b.sink).unwrap();
    // Already armed: unchanged.
    assert_eq!(b.ctrl.timers().expiry(TimerId::Cooldown), Some(1200));

    b.press();
    b.run_to(300);
    b.release();
    b.run_to(400);
    assert_eq!(b.ctrl.timers().expiry(TimerId::Cooldown), Some(700));
}

#[test]
fn status_snapshot_reflects_state() {
    let mut b = Bench::defaults();
    b.press();
    b.run_to(100);
    b.release();
    b.run_to(200);
    let snap = b.ctrl.snapshot();
    assert_eq!(snap.now, 200);
    assert_eq!(snap.tier, Tier::Full);
    assert_eq!(snap.output, OutputState::On);
    assert_eq!(snap.pending.as_slice(), &[(TimerId::Cooldown, 1200)]);
}
