//! Model-based property tests.
//!
//! These tests generate random input sequences and verify that the real
//! sequencer behaves identically to a small reference model of the gesture
//! rules.
//!
//! # Architecture
//!
//! ```text
//! proptest generates: Vec<Operation>
//!                          │
//!           ┌──────────────┼──────────────┐
//!           ▼              ▼              ▼
//!      ModelGesture  UnlockSequencer   Compare
//!      (reference)   (virtual clock)   Results
//! ```

use std::time::Duration;

use proptest::prelude::*;
use slidelock_core::{InputEvent, LockState, SequencerConfig, Trigger, UnlockSequencer};
use slidelock_harness::SimClock;

const TRACK_WIDTH: f64 = 270.0;
const MAX_DISTANCE: f64 = 200.0;
const THRESHOLD: f64 = MAX_DISTANCE * 0.7;
const DAMPING: f64 = 0.5;
const IDLE_MS: u64 = 10_000;
const DEBOUNCE_MS: u64 = 200;

#[derive(Debug, Clone)]
enum Operation {
    Wheel(f64),
    DragStart,
    DragMove(f64),
    DragEnd(f64),
    AdvanceTime(u64),
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (-300.0f64..300.0).prop_map(Operation::Wheel),
        1 => Just(Operation::DragStart),
        2 => (-40.0f64..260.0).prop_map(Operation::DragMove),
        1 => (-40.0f64..260.0).prop_map(Operation::DragEnd),
        3 => prop_oneof![0u64..300, 0u64..12_000].prop_map(Operation::AdvanceTime),
    ]
}

/// Reference model: the gesture rules written as plainly as possible.
#[derive(Debug, Default)]
struct ModelGesture {
    now_ms: u64,
    progress: f64,
    dragging: bool,
    idle_deadline: Option<u64>,
    scroll_deadline: Option<u64>,
    committed: Option<Trigger>,
}

impl ModelGesture {
    fn mounted() -> Self {
        Self { idle_deadline: Some(IDLE_MS), ..Self::default() }
    }

    fn apply(&mut self, op: &Operation) {
        if self.committed.is_some() {
            if let Operation::AdvanceTime(ms) = op {
                self.now_ms += ms;
            }
            return;
        }
        match *op {
            Operation::Wheel(delta) => {
                if delta == 0.0 {
                    return;
                }
                let candidate = self.progress + delta * DAMPING;
                self.progress = candidate.clamp(0.0, MAX_DISTANCE);
                if self.scroll_deadline.is_none() && candidate > THRESHOLD {
                    self.scroll_deadline = Some(self.now_ms + DEBOUNCE_MS);
                }
            },
            Operation::DragStart => {
                self.idle_deadline = None;
                self.dragging = true;
            },
            Operation::DragMove(x) => {
                if self.dragging {
                    self.progress = x.clamp(0.0, MAX_DISTANCE);
                }
            },
            Operation::DragEnd(offset) => {
                if !self.dragging {
                    return;
                }
                self.dragging = false;
                if offset > THRESHOLD {
                    self.commit(Trigger::Drag);
                } else {
                    self.progress = 0.0;
                    self.scroll_deadline = None;
                }
            },
            Operation::AdvanceTime(ms) => {
                self.now_ms += ms;
                let due = |d: Option<u64>| d.is_some_and(|d| self.now_ms >= d);
                if due(self.scroll_deadline) {
                    self.commit(Trigger::Scroll);
                } else if due(self.idle_deadline) {
                    self.commit(Trigger::Idle);
                }
            },
        }
    }

    fn commit(&mut self, trigger: Trigger) {
        self.committed = Some(trigger);
        self.progress = MAX_DISTANCE;
        self.idle_deadline = None;
        self.scroll_deadline = None;
        self.dragging = false;
    }

    fn lock_state(&self) -> LockState {
        self.committed.map_or(LockState::Locked, LockState::Committing)
    }

    fn next_deadline_ms(&self) -> Option<u64> {
        match (self.idle_deadline, self.scroll_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

/// Real sequencer on a virtual clock.
struct RealWorld {
    clock: SimClock,
    sequencer: UnlockSequencer,
}

impl RealWorld {
    fn new() -> Self {
        let clock = SimClock::new();
        let mut sequencer = UnlockSequencer::new(SequencerConfig::default()).unwrap();
        sequencer.mount(TRACK_WIDTH, clock.now()).unwrap();
        Self { clock, sequencer }
    }

    fn apply(&mut self, op: &Operation) {
        let now = self.clock.now();
        match *op {
            Operation::Wheel(delta_y) => {
                self.sequencer.handle(InputEvent::Wheel { delta_y }, now);
            },
            Operation::DragStart => {
                self.sequencer.handle(InputEvent::DragStart, now);
            },
            Operation::DragMove(x) => {
                self.sequencer.handle(InputEvent::DragMove { x }, now);
            },
            Operation::DragEnd(offset) => {
                self.sequencer.handle(InputEvent::DragEnd { offset }, now);
            },
            Operation::AdvanceTime(ms) => {
                self.clock.advance(Duration::from_millis(ms));
                self.sequencer.tick(self.clock.now());
            },
        }
    }

    fn next_deadline_ms(&self) -> Option<u64> {
        self.sequencer.next_deadline().map(|d| {
            u64::try_from(self.clock.offset_of(d).as_millis()).unwrap_or(u64::MAX)
        })
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// This is the core model-based test. It generates random operation
    /// sequences and checks progress, lock state and the next deadline after
    /// every step.
    #[test]
    fn sequencer_matches_model(ops in prop::collection::vec(operation(), 1..80)) {
        let mut model = ModelGesture::mounted();
        let mut real = RealWorld::new();

        for (step, op) in ops.iter().enumerate() {
            model.apply(op);
            real.apply(op);

            let snap = real.sequencer.snapshot();
            prop_assert_eq!(snap.progress, model.progress, "progress diverged at step {}: {:?}", step, op);
            prop_assert_eq!(snap.lock, model.lock_state(), "lock state diverged at step {}: {:?}", step, op);
            prop_assert_eq!(real.next_deadline_ms(), model.next_deadline_ms(), "deadline diverged at step {}: {:?}", step, op);
        }
    }
}
