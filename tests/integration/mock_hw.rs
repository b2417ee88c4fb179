//! Mock board for integration tests.
//!
//! Records every output write and every emitted event so tests can
//! assert on the full history without touching real GPIO registers.

use arwe::app::events::ControllerEvent;
use arwe::app::ports::{EventSink, InputPort, OutputPort};
use arwe::debounce::InputId;
use arwe::fsm::Tier;

// ── MockBoard ─────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockBoard {
    pub switch_high: bool,
    pub sense_high: bool,
    /// Every `set_output` call, in order.
    pub writes: Vec<bool>,
    pub reads: Vec<InputId>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written, `None` before the first write.
    pub fn output(&self) -> Option<bool> {
        self.writes.last().copied()
    }
}

impl InputPort for MockBoard {
    fn read_level(&mut self, input: InputId) -> bool {
        self.reads.push(input);
        match input {
            InputId::Switch => self.switch_high,
            InputId::Sense => self.sense_high,
        }
    }
}

impl OutputPort for MockBoard {
    fn set_output(&mut self, on: bool) {
        self.writes.push(on);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<ControllerEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tier_changes(&self) -> Vec<(Tier, Tier)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ControllerEvent::TierChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&ControllerEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ControllerEvent) {
        self.events.push(event.clone());
    }
}
