//! Semantic events delivered to elements.
//!
//! The same keyboard and button payloads travel from the window to the
//! input hub and on into the tree; pointer motion is reclassified per tree
//! level into [`MotionAction::Enter`], [`MotionAction::Exit`] or
//! [`MotionAction::Move`].

use crate::input::{Key, Modifiers, MouseButton};
use firecrest_core::Vec2;

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Key went down.
    Press,
    /// Key went up.
    Release,
    /// Key is held and the platform auto-repeated it.
    Repeat,
}

/// What happened to a mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    /// Button went down.
    Press,
    /// Button went up.
    Release,
}

/// Pointer motion relative to one element's rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionAction {
    /// Outside before, inside now.
    Enter,
    /// Inside before, outside now.
    Exit,
    /// Inside before and now.
    Move,
}

/// A keyboard sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// The key.
    pub key: Key,
    /// Press, release or repeat.
    pub action: KeyAction,
    /// Modifiers held at the time of the event.
    pub mods: Modifiers,
}

impl KeyboardEvent {
    /// Creates a keyboard event without modifiers.
    #[must_use]
    pub fn new(key: Key, action: KeyAction) -> Self {
        Self { key, action, mods: Modifiers::default() }
    }

    /// Returns the event with the given modifiers.
    #[must_use]
    pub fn with_mods(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }

    /// Press or auto-repeat.
    #[inline]
    #[must_use]
    pub fn is_press_or_repeat(&self) -> bool {
        matches!(self.action, KeyAction::Press | KeyAction::Repeat)
    }
}

/// A mouse button sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonEvent {
    /// The button.
    pub button: MouseButton,
    /// Press or release.
    pub action: ButtonAction,
    /// Modifiers held at the time of the event.
    pub mods: Modifiers,
}

impl MouseButtonEvent {
    /// Creates a button event without modifiers.
    #[must_use]
    pub fn new(button: MouseButton, action: ButtonAction) -> Self {
        Self { button, action, mods: Modifiers::default() }
    }
}

/// Raw pointer motion, in y-up window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorEvent {
    /// Pointer position after the motion.
    pub position: Vec2,
    /// Pointer position before the motion.
    pub last_position: Vec2,
}

/// Pointer motion as seen by one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMotionEvent {
    /// Enter, exit or move, relative to the receiving element.
    pub action: MotionAction,
    /// Pointer position after the motion.
    pub position: Vec2,
    /// Pointer position before the motion.
    pub last_position: Vec2,
}

impl MouseMotionEvent {
    /// Attaches an action to a raw motion sample.
    #[must_use]
    pub fn from_cursor(action: MotionAction, cursor: CursorEvent) -> Self {
        Self {
            action,
            position: cursor.position,
            last_position: cursor.last_position,
        }
    }

    /// Strips the action again, for forwarding to the next tree level.
    #[must_use]
    pub fn cursor(&self) -> CursorEvent {
        CursorEvent {
            position: self.position,
            last_position: self.last_position,
        }
    }
}

/// A wheel or trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    /// Scroll amount; positive y scrolls up.
    pub offset: Vec2,
}
