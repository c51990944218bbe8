#![forbid(unsafe_code)]

//! Colors for the dashboard sections.

use crossterm::style::Color;

/// Warm accent carried over from the host app's palette (#B07C5B).
pub const ACCENT: Color = Color::Rgb {
    r: 0xB0,
    g: 0x7C,
    b: 0x5B,
};

/// Section surfaces (#F6EBE1).
pub const SURFACE: Color = Color::Rgb {
    r: 0xF6,
    g: 0xEB,
    b: 0xE1,
};

/// Secondary text.
pub const MUTED: Color = Color::DarkGrey;

/// Devices that are on.
pub const ON: Color = Color::Green;

/// Devices that are off.
pub const OFF: Color = Color::DarkGrey;

/// The item being dragged.
pub const DRAGGING: Color = Color::Yellow;

/// The drop target under the pointer.
pub const DROP_TARGET: Color = Color::Cyan;
