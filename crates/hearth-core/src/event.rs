#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! These are the normalized events the rest of hearth consumes. All events
//! derive `Clone`, `PartialEq`, and `Eq` for use in tests and pattern
//! matching.
//!
//! # Design Notes
//!
//! - Mouse coordinates are 0-indexed terminal cells.
//! - `Tick` is a host-generated cadence event; it drives timers (the hold
//!   threshold in the gesture layer) without any OS timer.
//! - The crossterm conversion lives behind the `crossterm` feature so the
//!   core stays backend-free.

use bitflags::bitflags;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A mouse event.
    Mouse(MouseEvent),

    /// Terminal was resized.
    Resize {
        /// New terminal width in columns.
        width: u16,
        /// New terminal height in rows.
        height: u16,
    },

    /// Focus gained or lost.
    ///
    /// `true` = focus gained, `false` = focus lost.
    Focus(bool),

    /// Periodic host tick; carries no data.
    Tick,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// Function key (F1 = 1).
    F(u8),
}

/// The type of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEventKind {
    /// Key was pressed (includes auto-repeat).
    #[default]
    Press,
    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// The kind of mouse event.
    pub kind: MouseEventKind,

    /// Column (0-indexed).
    pub x: u16,

    /// Row (0-indexed).
    pub y: u16,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

/// The kind of a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    /// A button was pressed.
    Down(MouseButton),
    /// A button was released.
    Up(MouseButton),
    /// The mouse moved with a button held.
    Drag(MouseButton),
    /// The mouse moved with no button held.
    Moved,
    ScrollUp,
    ScrollDown,
}

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[cfg(feature = "crossterm")]
impl Event {
    /// Convert a crossterm event into a canonical event.
    ///
    /// Returns `None` for event kinds hearth does not model (paste,
    /// horizontal scroll, keys outside the mapped set).
    #[must_use]
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        use crossterm::event as ct;

        match event {
            ct::Event::Key(key) => {
                let code = match key.code {
                    ct::KeyCode::Char(c) => KeyCode::Char(c),
                    ct::KeyCode::Enter => KeyCode::Enter,
                    ct::KeyCode::Esc => KeyCode::Escape,
                    ct::KeyCode::Backspace => KeyCode::Backspace,
                    ct::KeyCode::Tab => KeyCode::Tab,
                    ct::KeyCode::Up => KeyCode::Up,
                    ct::KeyCode::Down => KeyCode::Down,
                    ct::KeyCode::Left => KeyCode::Left,
                    ct::KeyCode::Right => KeyCode::Right,
                    ct::KeyCode::Home => KeyCode::Home,
                    ct::KeyCode::End => KeyCode::End,
                    ct::KeyCode::PageUp => KeyCode::PageUp,
                    ct::KeyCode::PageDown => KeyCode::PageDown,
                    ct::KeyCode::F(n) => KeyCode::F(n),
                    _ => return None,
                };
                let kind = match key.kind {
                    ct::KeyEventKind::Press | ct::KeyEventKind::Repeat => KeyEventKind::Press,
                    ct::KeyEventKind::Release => KeyEventKind::Release,
                };
                Some(Event::Key(KeyEvent {
                    code,
                    modifiers: convert_modifiers(key.modifiers),
                    kind,
                }))
            }
            ct::Event::Mouse(mouse) => {
                let kind = match mouse.kind {
                    ct::MouseEventKind::Down(b) => MouseEventKind::Down(convert_button(b)?),
                    ct::MouseEventKind::Up(b) => MouseEventKind::Up(convert_button(b)?),
                    ct::MouseEventKind::Drag(b) => MouseEventKind::Drag(convert_button(b)?),
                    ct::MouseEventKind::Moved => MouseEventKind::Moved,
                    ct::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
                    ct::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
                    ct::MouseEventKind::ScrollLeft | ct::MouseEventKind::ScrollRight => {
                        return None;
                    }
                };
                Some(Event::Mouse(MouseEvent {
                    kind,
                    x: mouse.column,
                    y: mouse.row,
                    modifiers: convert_modifiers(mouse.modifiers),
                }))
            }
            ct::Event::Resize(width, height) => Some(Event::Resize { width, height }),
            ct::Event::FocusGained => Some(Event::Focus(true)),
            ct::Event::FocusLost => Some(Event::Focus(false)),
            _ => None,
        }
    }
}

#[cfg(feature = "crossterm")]
fn convert_modifiers(modifiers: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;

    let mut out = Modifiers::NONE;
    if modifiers.contains(KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if modifiers.contains(KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if modifiers.contains(KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if modifiers.contains(KeyModifiers::SUPER) {
        out |= Modifiers::SUPER;
    }
    out
}

#[cfg(feature = "crossterm")]
fn convert_button(button: crossterm::event::MouseButton) -> Option<MouseButton> {
    use crossterm::event::MouseButton as CtButton;

    match button {
        CtButton::Left => Some(MouseButton::Left),
        CtButton::Right => Some(MouseButton::Right),
        CtButton::Middle => Some(MouseButton::Middle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_builders() {
        let key = KeyEvent::new(KeyCode::Char('q')).with_modifiers(Modifiers::CTRL);
        assert!(key.is_char('q'));
        assert!(!key.is_char('x'));
        assert!(key.ctrl());
        assert_eq!(key.kind, KeyEventKind::Press);
    }

    #[test]
    fn modifiers_combine() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::ALT));
    }

    #[test]
    fn events_compare_by_value() {
        let a = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            x: 3,
            y: 7,
            modifiers: Modifiers::NONE,
        });
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Event::Tick);
    }
}
