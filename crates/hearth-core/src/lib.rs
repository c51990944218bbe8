#![forbid(unsafe_code)]

//! Core: canonical input events, geometry, and gesture disambiguation.
//!
//! # Role in hearth
//! `hearth-core` is the input layer. It owns the normalized event types the
//! dashboard consumes and the press classifier that turns raw pointer
//! sequences into taps and drags.
//!
//! # Primary responsibilities
//! - **Event**: canonical input events (keys, mouse, resize, focus, tick).
//! - **Geometry**: cell positions and rectangles for hit testing.
//! - **GestureDisambiguator**: per-press state machine separating "tap"
//!   (short press, no significant movement) from "drag" (held past a
//!   threshold, or moved past a tolerance).
//!
//! # How it fits in the system
//! The collection layer (`hearth-sortable`) is input-agnostic; the dashboard
//! binary feeds `hearth-core` events into a disambiguator per collection and
//! translates the resulting gesture events into reorder and toggle calls.

pub mod event;
pub mod geometry;
pub mod gesture;
pub mod logging;

pub use event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind,
};
pub use geometry::{Position, Rect};
pub use gesture::{GestureConfig, GestureDisambiguator, GestureEvent, GesturePhase};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
