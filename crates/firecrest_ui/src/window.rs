//! Window boundary.
//!
//! A [`Platform`] is whatever actually owns the OS window and input devices.
//! The [`Window`] wraps one, converts its top-left-origin coordinates to the
//! y-up convention used everywhere else and feeds the results to its
//! [`Input`] hub.

use crate::events::{KeyboardEvent, MouseButtonEvent};
use crate::input::Input;
use firecrest_core::Vec2;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// One event as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent {
    /// Key press, release or repeat.
    Key(KeyboardEvent),
    /// A typed character.
    Char(char),
    /// The pointer moved to this position.
    CursorMoved(Vec2),
    /// Mouse button press or release.
    MouseButton(MouseButtonEvent),
    /// Wheel or trackpad scroll.
    Scroll(Vec2),
    /// The window's client area changed size.
    Resized(Vec2),
}

/// Window backend.
pub trait Platform {
    /// Client area size in pixels.
    fn dimensions(&self) -> Vec2;

    /// Drains the events that arrived since the last call. Pointer positions
    /// use a top-left origin.
    fn poll_events(&mut self) -> Vec<RawEvent>;

    /// Hides and confines the OS cursor, or releases it.
    fn set_cursor_captured(&mut self, captured: bool);
}

/// A platform with no OS window; events are injected with
/// [`HeadlessPlatform::push`].
///
/// Clones share the queue, so a test can keep a handle after moving the
/// platform into a [`Window`].
#[derive(Clone)]
pub struct HeadlessPlatform {
    size: Rc<Cell<Vec2>>,
    queue: Rc<RefCell<VecDeque<RawEvent>>>,
    cursor_captured: Rc<Cell<bool>>,
}

impl HeadlessPlatform {
    /// A platform reporting the given size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Rc::new(Cell::new(Vec2::new(width, height))),
            queue: Rc::new(RefCell::new(VecDeque::new())),
            cursor_captured: Rc::new(Cell::new(false)),
        }
    }

    /// Queues an event for the next poll.
    pub fn push(&self, event: RawEvent) {
        if let RawEvent::Resized(size) = event {
            self.size.set(size);
        }
        self.queue.borrow_mut().push_back(event);
    }

    /// Whether the window asked for cursor capture.
    #[must_use]
    pub fn cursor_captured(&self) -> bool {
        self.cursor_captured.get()
    }
}

impl Platform for HeadlessPlatform {
    fn dimensions(&self) -> Vec2 {
        self.size.get()
    }

    fn poll_events(&mut self) -> Vec<RawEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        self.cursor_captured.set(captured);
    }
}

/// One window: its platform, its input hub and its size.
pub struct Window {
    platform: RefCell<Box<dyn Platform>>,
    input: Input,
    size: Cell<Vec2>,
    cursor_captured: Cell<bool>,
}

impl Window {
    /// Wraps a platform.
    #[must_use]
    pub fn new(platform: impl Platform + 'static) -> Rc<Self> {
        let size = platform.dimensions();
        Rc::new(Self {
            platform: RefCell::new(Box::new(platform)),
            input: Input::new(),
            size: Cell::new(size),
            cursor_captured: Cell::new(false),
        })
    }

    /// A window over a fresh [`HeadlessPlatform`], plus a handle to inject
    /// events into it.
    #[must_use]
    pub fn headless(width: f32, height: f32) -> (Rc<Self>, HeadlessPlatform) {
        let platform = HeadlessPlatform::new(width, height);
        (Self::new(platform.clone()), platform)
    }

    /// The input hub.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// Client area size.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> Vec2 {
        self.size.get()
    }

    /// Pulls pending events from the platform and delivers them. Listeners
    /// run synchronously, in arrival order.
    pub fn poll_events(&self) {
        let events = self.platform.borrow_mut().poll_events();
        for event in events {
            self.deliver(event);
        }
    }

    /// Delivers one platform event, converting it to y-up coordinates.
    pub fn deliver(&self, event: RawEvent) {
        let event = match event {
            RawEvent::CursorMoved(position) => {
                RawEvent::CursorMoved(Vec2::new(position.x, self.size.get().y - position.y))
            }
            RawEvent::Resized(size) => {
                self.size.set(size);
                event
            }
            other => other,
        };
        self.input.deliver(event);
    }

    /// Whether the OS cursor is captured.
    #[must_use]
    pub fn is_cursor_captured(&self) -> bool {
        self.cursor_captured.get()
    }

    /// Captures or releases the OS cursor. Does nothing if already in that
    /// state.
    pub fn set_cursor_captured(&self, captured: bool) {
        if self.cursor_captured.replace(captured) != captured {
            self.platform.borrow_mut().set_cursor_captured(captured);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::KeyAction;
    use crate::input::Key;

    #[test]
    fn test_cursor_is_flipped_to_y_up() {
        let (window, platform) = Window::headless(200.0, 100.0);
        platform.push(RawEvent::CursorMoved(Vec2::new(10.0, 30.0)));
        window.poll_events();
        assert_eq!(window.input().mouse(), Vec2::new(10.0, 70.0));
    }

    #[test]
    fn test_resize_is_tracked() {
        let (window, platform) = Window::headless(200.0, 100.0);
        platform.push(RawEvent::Resized(Vec2::new(300.0, 150.0)));
        platform.push(RawEvent::CursorMoved(Vec2::new(0.0, 0.0)));
        window.poll_events();

        assert_eq!(window.dimensions(), Vec2::new(300.0, 150.0));
        assert_eq!(window.input().mouse(), Vec2::new(0.0, 150.0));
    }

    #[test]
    fn test_events_arrive_in_order() {
        let (window, platform) = Window::headless(100.0, 100.0);
        platform.push(RawEvent::Char('h'));
        platform.push(RawEvent::Key(KeyboardEvent::new(Key::Enter, KeyAction::Press)));
        platform.push(RawEvent::Char('i'));
        window.poll_events();
        window.input().update();

        assert_eq!(window.input().typed_text(), "hi");
        assert!(window.input().key_pressed(Key::Enter));
    }

    #[test]
    fn test_cursor_capture_reaches_platform() {
        let (window, platform) = Window::headless(100.0, 100.0);
        window.set_cursor_captured(true);
        assert!(window.is_cursor_captured());
        assert!(platform.cursor_captured());

        window.set_cursor_captured(false);
        assert!(!platform.cursor_captured());
    }
}
