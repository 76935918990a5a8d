//! Gesture state machine: classifies a pointer event stream into drag phases.
//!
//! The machine only mutates in-memory session state and reports what
//! happened. It never performs automation or I/O, so it is safe to drive
//! from inside a low-level input callback.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Screen position in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Kind of pointer event fed to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEventKind {
    ButtonDown,
    Move,
    ButtonUp,
}

/// A pointer event from the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
    /// Milliseconds since the input source started.
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn button_down(x: i32, y: i32) -> Self {
        Self::at(PointerEventKind::ButtonDown, x, y)
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self::at(PointerEventKind::Move, x, y)
    }

    pub fn button_up(x: i32, y: i32) -> Self {
        Self::at(PointerEventKind::ButtonUp, x, y)
    }

    fn at(kind: PointerEventKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
            timestamp_ms: 0,
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}

/// Phase of the current drag session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragPhase {
    #[default]
    Idle,
    Pressed,
    Dragging,
}

/// Per-axis movement threshold in pixels.
///
/// Crossing either axis alone starts a drag. A zero axis means any nonzero
/// movement on that axis crosses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragThreshold {
    pub x: u32,
    pub y: u32,
}

impl DragThreshold {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn uniform(px: u32) -> Self {
        Self { x: px, y: px }
    }

    /// Whether a displacement from the session start crosses the threshold.
    pub fn is_crossed(&self, from: Point, to: Point) -> bool {
        let dx = (i64::from(to.x) - i64::from(from.x)).unsigned_abs();
        let dy = (i64::from(to.y) - i64::from(from.y)).unsigned_abs();
        dx >= u64::from(self.x.max(1)) || dy >= u64::from(self.y.max(1))
    }
}

impl Default for DragThreshold {
    fn default() -> Self {
        Self::uniform(4)
    }
}

/// State of one press-move-release cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragSession {
    pub start_position: Point,
    pub phase: DragPhase,
    pub detection_triggered: bool,
}

/// A phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub old: DragPhase,
    pub new: DragPhase,
}

/// What processing one event produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureOutcome {
    pub phase_change: Option<PhaseChange>,
    /// Set when detection must run now; carries the pointer position of the
    /// triggering event.
    pub detect_at: Option<Point>,
}

/// Drives a [`DragSession`] from pointer events.
#[derive(Debug, Clone)]
pub struct GestureStateMachine {
    threshold: DragThreshold,
    session: DragSession,
}

impl GestureStateMachine {
    pub fn new(threshold: DragThreshold) -> Self {
        Self {
            threshold,
            session: DragSession::default(),
        }
    }

    pub fn threshold(&self) -> DragThreshold {
        self.threshold
    }

    pub fn phase(&self) -> DragPhase {
        self.session.phase
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Process one pointer event.
    pub fn process(&mut self, event: &PointerEvent) -> GestureOutcome {
        let old = self.session.phase;
        let mut outcome = GestureOutcome::default();

        match event.kind {
            PointerEventKind::ButtonDown => {
                // A new press supersedes whatever session was in progress.
                self.session = DragSession {
                    start_position: event.position,
                    phase: DragPhase::Pressed,
                    detection_triggered: false,
                };
            }
            PointerEventKind::Move => match old {
                DragPhase::Idle => {}
                DragPhase::Pressed => {
                    if self
                        .threshold
                        .is_crossed(self.session.start_position, event.position)
                    {
                        self.session.phase = DragPhase::Dragging;
                        outcome.detect_at = self.trigger_once(event.position);
                    }
                }
                DragPhase::Dragging => {
                    outcome.detect_at = self.trigger_once(event.position);
                }
            },
            PointerEventKind::ButtonUp => {
                if old != DragPhase::Idle {
                    self.session = DragSession::default();
                }
            }
        }

        let new = self.session.phase;
        if old != new {
            debug!(?old, ?new, position = ?event.position, "drag phase changed");
            outcome.phase_change = Some(PhaseChange { old, new });
        } else {
            trace!(phase = ?new, kind = ?event.kind, "pointer event");
        }
        outcome
    }

    fn trigger_once(&mut self, position: Point) -> Option<Point> {
        if self.session.detection_triggered {
            return None;
        }
        self.session.detection_triggered = true;
        Some(position)
    }
}
