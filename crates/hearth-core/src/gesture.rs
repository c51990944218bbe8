#![forbid(unsafe_code)]

//! Press-gesture disambiguation: tap vs long-press drag.
//!
//! [`GestureDisambiguator`] is a per-pointer-session state machine. A press
//! opens a session in the **Pending** phase; what happens next decides the
//! classification:
//!
//! - release before the hold threshold, with total movement within the
//!   tolerance, emits a single [`GestureEvent::Tap`];
//! - holding past the threshold (observed via [`poll`]) promotes the session
//!   to **Dragging** and emits [`GestureEvent::DragStart`];
//! - moving past the tolerance while Pending promotes early — movement is
//!   treated as an immediate drag, never as a cancelled gesture.
//!
//! The hold threshold is driven entirely by [`poll`] being called with the
//! current time (the host calls it on its tick cadence). There is no OS
//! timer, so cancellation is deterministic: after [`reset`] no stale timer
//! can fire.
//!
//! # Invariants
//!
//! 1. A single press→release interaction emits at most one of
//!    `Tap` / `DragStart`, never both.
//! 2. `DragMove`, `DragEnd`, and `DragCancel` are only emitted after a
//!    `DragStart` for the same session.
//! 3. A press landing on an opaque region (a nested interactive control)
//!    opens no session at all; no event of any kind follows from it.
//! 4. `reset()` returns the machine to Idle without emitting; a subsequent
//!    `poll`/`release`/`motion` observes nothing to act on.
//!
//! # Failure Modes
//!
//! - A release that arrives past the hold threshold without an intervening
//!   `poll` emits nothing: too long for a tap, and the drag never visibly
//!   started, so there is nothing coherent to report.
//! - A second press while a session is open replaces the session (the
//!   previous press lost its release; terminals drop events under load).
//!
//! [`poll`]: GestureDisambiguator::poll
//! [`reset`]: GestureDisambiguator::reset

use std::time::{Duration, Instant};

use crate::geometry::{Position, Rect};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for press classification.
///
/// Both values are configuration inputs; collections with different feels
/// use different values (an immediate-drag surface uses a zero hold
/// threshold).
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Hold duration before a stationary press becomes a drag (default: 300ms).
    pub hold_threshold: Duration,
    /// Maximum manhattan distance (cells) a press may travel and still count
    /// as a tap; moving further promotes to a drag (default: 5).
    pub move_tolerance: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_threshold: Duration::from_millis(300),
            move_tolerance: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Events and phases
// ---------------------------------------------------------------------------

/// Classified gesture event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// Short press without significant movement. `pos` is the press origin.
    Tap { pos: Position },
    /// The press was promoted to a drag. `pos` is the press origin.
    DragStart { pos: Position },
    /// Pointer movement during an active drag.
    DragMove { start: Position, current: Position },
    /// The drag ended with a release at `end`.
    DragEnd { start: Position, end: Position },
    /// The drag was abandoned (pointer cancel, focus loss).
    DragCancel,
}

/// Observable phase of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// No press session.
    Idle,
    /// Press seen, classification not yet decided.
    Pending,
    /// Press promoted to a drag.
    Dragging,
}

/// Transient per-press state.
#[derive(Debug, Clone)]
struct PressSession {
    start_pos: Position,
    start_time: Instant,
    last_pos: Position,
    dragging: bool,
}

// ---------------------------------------------------------------------------
// GestureDisambiguator
// ---------------------------------------------------------------------------

/// Stateful press classifier.
///
/// Feed it `press`/`motion`/`release` from pointer events and `poll` from
/// the host tick; it hands back at most one [`GestureEvent`] per call.
#[derive(Debug)]
pub struct GestureDisambiguator {
    config: GestureConfig,
    session: Option<PressSession>,
    opaque_regions: Vec<Rect>,
}

impl GestureDisambiguator {
    /// Create a disambiguator with the given thresholds.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            session: None,
            opaque_regions: Vec::new(),
        }
    }

    /// Replace the set of regions that are opaque to gesture capture.
    ///
    /// A press inside any of these rectangles opens no session: the nested
    /// control under the pointer owns the interaction. The view layer
    /// refreshes this set whenever its layout changes.
    pub fn set_opaque_regions(&mut self, regions: Vec<Rect>) {
        self.opaque_regions = regions;
    }

    /// Begin a press session at `pos`.
    ///
    /// Ignored when `pos` lies in an opaque region. An already-open session
    /// is replaced (its release was lost).
    pub fn press(&mut self, pos: Position, now: Instant) {
        if self.opaque_regions.iter().any(|r| r.contains_pos(pos)) {
            #[cfg(feature = "tracing")]
            tracing::trace!(?pos, "press on opaque region ignored");
            return;
        }
        self.session = Some(PressSession {
            start_pos: pos,
            start_time: now,
            last_pos: pos,
            dragging: false,
        });
    }

    /// Observe pointer movement.
    ///
    /// While Pending, movement past the tolerance (or a hold past the
    /// threshold that `poll` has not yet seen) promotes the session and
    /// emits `DragStart`; later movement emits `DragMove`.
    pub fn motion(&mut self, pos: Position, now: Instant) -> Option<GestureEvent> {
        let session = self.session.as_mut()?;

        if session.dragging {
            session.last_pos = pos;
            return Some(GestureEvent::DragMove {
                start: session.start_pos,
                current: pos,
            });
        }

        let travelled = session.start_pos.manhattan_distance(pos);
        let held = now.duration_since(session.start_time) >= self.config.hold_threshold;
        session.last_pos = pos;

        if travelled > self.config.move_tolerance || held {
            session.dragging = true;
            #[cfg(feature = "tracing")]
            tracing::trace!(start = ?session.start_pos, travelled, held, "promoted to drag");
            return Some(GestureEvent::DragStart {
                pos: session.start_pos,
            });
        }

        None
    }

    /// Drive the hold timer. Call on every host tick.
    ///
    /// Emits `DragStart` when a Pending session has been held at least the
    /// hold threshold.
    pub fn poll(&mut self, now: Instant) -> Option<GestureEvent> {
        let session = self.session.as_mut()?;
        if session.dragging {
            return None;
        }
        if now.duration_since(session.start_time) >= self.config.hold_threshold {
            session.dragging = true;
            #[cfg(feature = "tracing")]
            tracing::trace!(start = ?session.start_pos, "hold threshold reached");
            return Some(GestureEvent::DragStart {
                pos: session.start_pos,
            });
        }
        None
    }

    /// End the press session with a release at `pos`.
    ///
    /// A Pending session under the hold threshold that stayed within the
    /// movement tolerance is a `Tap`; a Dragging session ends with
    /// `DragEnd`. Anything else dissolves silently.
    pub fn release(&mut self, pos: Position, now: Instant) -> Option<GestureEvent> {
        let session = self.session.take()?;

        if session.dragging {
            return Some(GestureEvent::DragEnd {
                start: session.start_pos,
                end: pos,
            });
        }

        let short = now.duration_since(session.start_time) < self.config.hold_threshold;
        let stationary = session.start_pos.manhattan_distance(pos) <= self.config.move_tolerance;
        if short && stationary {
            return Some(GestureEvent::Tap {
                pos: session.start_pos,
            });
        }

        None
    }

    /// Abandon the session (pointer cancel, focus loss).
    ///
    /// Emits `DragCancel` if a drag had started; a Pending session
    /// dissolves silently.
    pub fn cancel(&mut self) -> Option<GestureEvent> {
        let session = self.session.take()?;
        session.dragging.then_some(GestureEvent::DragCancel)
    }

    /// Teardown: drop the session without emitting anything.
    ///
    /// Subsequent `poll`/`motion`/`release` calls observe an Idle machine.
    pub fn reset(&mut self) {
        self.session = None;
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        match &self.session {
            None => GesturePhase::Idle,
            Some(s) if s.dragging => GesturePhase::Dragging,
            Some(_) => GesturePhase::Pending,
        }
    }

    /// Whether a drag is currently in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.dragging)
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Update the configuration.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
