//! Input handling for UI.
//!
//! [`Input`] is the raw-event hub of one window. Listeners subscribed to it
//! run synchronously as events are delivered; key, character and button
//! samples are also buffered and folded into a per-frame [`InputState`] at
//! the next [`Input::update`].

use crate::events::{CursorEvent, KeyAction, KeyboardEvent, ButtonAction, MouseButtonEvent, ScrollEvent};
use crate::window::RawEvent;
use firecrest_core::Vec2;
use slotmap::SlotMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Thumb button, back.
    Back,
    /// Thumb button, forward.
    Forward,
}

/// Keyboard key.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape key.
    Escape,
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Space bar.
    Space,
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
    /// Alphabetic keys.
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    /// More alphabetic keys.
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    /// Number keys.
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    /// Function keys.
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Control key is held.
    pub ctrl: bool,
    /// Alt key is held.
    pub alt: bool,
    /// Super/Command key is held.
    pub super_key: bool,
}

impl Modifiers {
    /// Only Control held.
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false, super_key: false };
}

/// Input state for the current frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Mouse buttons pressed this frame.
    buttons_pressed: u8,
    /// Mouse buttons released this frame.
    buttons_released: u8,
    /// Mouse buttons currently held.
    buttons_down: u8,
    /// Mouse scroll delta.
    pub scroll_delta: Vec2,
    /// Modifier keys state.
    pub modifiers: Modifiers,
    /// Keys pressed this frame.
    keys_pressed: Vec<Key>,
    /// Keys released this frame.
    keys_released: Vec<Key>,
    /// Keys currently held.
    keys_down: Vec<Key>,
    /// Text input this frame.
    pub text_input: String,
}

impl InputState {
    /// Creates a new empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new frame, clearing per-frame state.
    pub fn begin_frame(&mut self) {
        self.buttons_pressed = 0;
        self.buttons_released = 0;
        self.scroll_delta = Vec2::ZERO;
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.text_input.clear();
    }

    /// Records a mouse button press.
    pub fn mouse_button_down(&mut self, button: MouseButton) {
        let mask = Self::button_mask(button);
        self.buttons_pressed |= mask;
        self.buttons_down |= mask;
    }

    /// Records a mouse button release.
    pub fn mouse_button_up(&mut self, button: MouseButton) {
        let mask = Self::button_mask(button);
        self.buttons_released |= mask;
        self.buttons_down &= !mask;
    }

    /// Records scroll input.
    pub fn scroll(&mut self, delta: Vec2) {
        self.scroll_delta += delta;
    }

    /// Records a key press.
    pub fn key_down(&mut self, key: Key) {
        if !self.keys_down.contains(&key) {
            self.keys_pressed.push(key);
            self.keys_down.push(key);
        }
    }

    /// Records a key release.
    pub fn key_up(&mut self, key: Key) {
        self.keys_released.push(key);
        self.keys_down.retain(|&k| k != key);
    }

    /// Records text input.
    pub fn text(&mut self, ch: char) {
        self.text_input.push(ch);
    }

    /// Returns true if the mouse button was clicked this frame.
    #[must_use]
    pub fn mouse_clicked(&self, button: MouseButton) -> bool {
        (self.buttons_pressed & Self::button_mask(button)) != 0
    }

    /// Returns true if the mouse button was released this frame.
    #[must_use]
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        (self.buttons_released & Self::button_mask(button)) != 0
    }

    /// Returns true if the mouse button is currently held.
    #[must_use]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        (self.buttons_down & Self::button_mask(button)) != 0
    }

    /// Returns true if the key was pressed this frame.
    #[must_use]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    #[must_use]
    pub fn key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    /// Returns true if the key is currently held.
    #[must_use]
    pub fn key_held(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns the bit mask for a button.
    const fn button_mask(button: MouseButton) -> u8 {
        match button {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 4,
            MouseButton::Back => 8,
            MouseButton::Forward => 16,
        }
    }
}

slotmap::new_key_type! {
    /// Token returned by the `subscribe_*` methods of [`Input`].
    pub struct SubscriptionId;
}

type Callback<E> = Rc<dyn Fn(&Input, E)>;

#[derive(Clone)]
enum Listener {
    Key(Callback<KeyboardEvent>),
    Char(Callback<char>),
    Motion(Callback<CursorEvent>),
    Button(Callback<MouseButtonEvent>),
    Scroll(Callback<ScrollEvent>),
}

/// A raw sample waiting for the next [`Input::update`].
#[derive(Debug, Clone, Copy)]
enum Sample {
    Key(KeyboardEvent),
    Char(char),
    Button(MouseButtonEvent),
    Scroll(Vec2),
}

/// Raw-event hub of one window.
pub struct Input {
    listeners: RefCell<SlotMap<SubscriptionId, Listener>>,
    pending: RefCell<Vec<Sample>>,
    state: RefCell<InputState>,
    mouse: Cell<Vec2>,
    last_mouse: Cell<Vec2>,
    clipboard: RefCell<String>,
}

impl Input {
    /// Creates an input hub with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(SlotMap::with_key()),
            pending: RefCell::new(Vec::with_capacity(32)),
            state: RefCell::new(InputState::new()),
            mouse: Cell::new(Vec2::ZERO),
            last_mouse: Cell::new(Vec2::ZERO),
            clipboard: RefCell::new(String::new()),
        }
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.listeners.borrow_mut().insert(listener)
    }

    /// Calls `f` for every keyboard event.
    pub fn subscribe_key(&self, f: impl Fn(&Input, KeyboardEvent) + 'static) -> SubscriptionId {
        self.subscribe(Listener::Key(Rc::new(f)))
    }

    /// Calls `f` for every typed character.
    pub fn subscribe_char(&self, f: impl Fn(&Input, char) + 'static) -> SubscriptionId {
        self.subscribe(Listener::Char(Rc::new(f)))
    }

    /// Calls `f` for every pointer motion.
    pub fn subscribe_mouse_motion(
        &self,
        f: impl Fn(&Input, CursorEvent) + 'static,
    ) -> SubscriptionId {
        self.subscribe(Listener::Motion(Rc::new(f)))
    }

    /// Calls `f` for every mouse button event.
    pub fn subscribe_mouse_button(
        &self,
        f: impl Fn(&Input, MouseButtonEvent) + 'static,
    ) -> SubscriptionId {
        self.subscribe(Listener::Button(Rc::new(f)))
    }

    /// Calls `f` for every scroll event.
    pub fn subscribe_scroll(&self, f: impl Fn(&Input, ScrollEvent) + 'static) -> SubscriptionId {
        self.subscribe(Listener::Scroll(Rc::new(f)))
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(id).is_some()
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    // =========================================================================
    // Delivery
    // =========================================================================

    /// Feeds one raw event, in y-up window pixels, to the listeners.
    pub fn deliver(&self, event: RawEvent) {
        match event {
            RawEvent::Key(key) => {
                self.pending.borrow_mut().push(Sample::Key(key));
                self.notify(|listener, input| {
                    if let Listener::Key(f) = listener {
                        f(input, key);
                    }
                });
            }
            RawEvent::Char(ch) => {
                self.pending.borrow_mut().push(Sample::Char(ch));
                self.notify(|listener, input| {
                    if let Listener::Char(f) = listener {
                        f(input, ch);
                    }
                });
            }
            RawEvent::CursorMoved(position) => {
                self.last_mouse.set(self.mouse.get());
                self.mouse.set(position);
                let cursor = CursorEvent { position, last_position: self.last_mouse.get() };
                self.notify(|listener, input| {
                    if let Listener::Motion(f) = listener {
                        f(input, cursor);
                    }
                });
            }
            RawEvent::MouseButton(button) => {
                self.pending.borrow_mut().push(Sample::Button(button));
                self.notify(|listener, input| {
                    if let Listener::Button(f) = listener {
                        f(input, button);
                    }
                });
            }
            RawEvent::Scroll(offset) => {
                self.pending.borrow_mut().push(Sample::Scroll(offset));
                self.notify(|listener, input| {
                    if let Listener::Scroll(f) = listener {
                        f(input, ScrollEvent { offset });
                    }
                });
            }
            RawEvent::Resized(_) => {}
        }
    }

    /// Calls `f` on a snapshot of the listeners, so callbacks may subscribe
    /// and unsubscribe freely.
    fn notify(&self, f: impl Fn(&Listener, &Self)) {
        let snapshot: Vec<(SubscriptionId, Listener)> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (id, listener.clone()))
            .collect();
        for (id, listener) in &snapshot {
            // Skip listeners removed by an earlier callback of this event.
            if self.listeners.borrow().contains_key(*id) {
                f(listener, self);
            }
        }
    }

    /// Starts a new frame and folds the samples buffered since the previous
    /// call into the frame state, in arrival order.
    pub fn update(&self) {
        let samples = std::mem::take(&mut *self.pending.borrow_mut());
        let mut state = self.state.borrow_mut();
        state.begin_frame();

        for sample in samples {
            match sample {
                Sample::Key(event) => {
                    state.modifiers = event.mods;
                    match event.action {
                        KeyAction::Press => state.key_down(event.key),
                        KeyAction::Release => state.key_up(event.key),
                        KeyAction::Repeat => {}
                    }
                }
                Sample::Char(ch) => state.text(ch),
                Sample::Button(event) => match event.action {
                    ButtonAction::Press => state.mouse_button_down(event.button),
                    ButtonAction::Release => state.mouse_button_up(event.button),
                },
                Sample::Scroll(delta) => state.scroll(delta),
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns true if the key was pressed this frame.
    #[must_use]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.state.borrow().key_pressed(key)
    }

    /// Returns true if the key was released this frame.
    #[must_use]
    pub fn key_released(&self, key: Key) -> bool {
        self.state.borrow().key_released(key)
    }

    /// Returns true if the key is currently held.
    #[must_use]
    pub fn key_held(&self, key: Key) -> bool {
        self.state.borrow().key_held(key)
    }

    /// Returns true if the mouse button was clicked this frame.
    #[must_use]
    pub fn mouse_clicked(&self, button: MouseButton) -> bool {
        self.state.borrow().mouse_clicked(button)
    }

    /// Returns true if the mouse button is currently held.
    #[must_use]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.state.borrow().mouse_down(button)
    }

    /// Returns true if the mouse button was released this frame.
    #[must_use]
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.state.borrow().mouse_released(button)
    }

    /// Text typed this frame.
    #[must_use]
    pub fn typed_text(&self) -> String {
        self.state.borrow().text_input.clone()
    }

    /// Scroll accumulated this frame.
    #[must_use]
    pub fn scroll_delta(&self) -> Vec2 {
        self.state.borrow().scroll_delta
    }

    /// Modifiers of the latest keyboard sample.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.state.borrow().modifiers
    }

    /// Current pointer position, y-up.
    #[inline]
    #[must_use]
    pub fn mouse(&self) -> Vec2 {
        self.mouse.get()
    }

    /// Pointer position before the latest motion.
    #[inline]
    #[must_use]
    pub fn last_mouse(&self) -> Vec2 {
        self.last_mouse.get()
    }

    /// Clipboard contents.
    #[must_use]
    pub fn clipboard(&self) -> String {
        self.clipboard.borrow().clone()
    }

    /// Replaces the clipboard contents.
    pub fn set_clipboard(&self, text: impl Into<String>) {
        *self.clipboard.borrow_mut() = text.into();
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_click() {
        let mut input = InputState::new();

        input.mouse_button_down(MouseButton::Left);
        assert!(input.mouse_clicked(MouseButton::Left));
        assert!(input.mouse_down(MouseButton::Left));

        input.begin_frame();
        assert!(!input.mouse_clicked(MouseButton::Left));
        assert!(input.mouse_down(MouseButton::Left));

        input.mouse_button_up(MouseButton::Left);
        assert!(input.mouse_released(MouseButton::Left));
        assert!(!input.mouse_down(MouseButton::Left));
    }

    #[test]
    fn test_samples_are_buffered_until_update() {
        let input = Input::new();
        input.deliver(RawEvent::Key(KeyboardEvent::new(Key::A, KeyAction::Press)));
        input.deliver(RawEvent::Char('a'));
        input.deliver(RawEvent::Char('b'));
        input.deliver(RawEvent::Scroll(Vec2::new(0.0, 1.0)));
        input.deliver(RawEvent::Scroll(Vec2::new(0.0, 2.0)));
        assert!(!input.key_pressed(Key::A));

        input.update();
        assert!(input.key_pressed(Key::A));
        assert!(input.key_held(Key::A));
        assert_eq!(input.typed_text(), "ab");
        assert_eq!(input.scroll_delta(), Vec2::new(0.0, 3.0));

        input.deliver(RawEvent::Key(KeyboardEvent::new(Key::A, KeyAction::Release)));
        input.update();
        assert!(!input.key_pressed(Key::A));
        assert!(input.key_released(Key::A));
        assert!(!input.key_held(Key::A));
        assert_eq!(input.typed_text(), "");
    }

    #[test]
    fn test_listeners_run_synchronously() {
        let input = Input::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        input.subscribe_mouse_motion(move |_, e| sink.borrow_mut().push((e.last_position, e.position)));

        input.deliver(RawEvent::CursorMoved(Vec2::new(1.0, 2.0)));
        input.deliver(RawEvent::CursorMoved(Vec2::new(3.0, 4.0)));

        assert_eq!(
            *seen.borrow(),
            vec![
                (Vec2::ZERO, Vec2::new(1.0, 2.0)),
                (Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)),
            ]
        );
        assert_eq!(input.mouse(), Vec2::new(3.0, 4.0));
        assert_eq!(input.last_mouse(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_unsubscribe() {
        let input = Input::new();
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        let id = input.subscribe_char(move |_, _| c.set(c.get() + 1));
        input.deliver(RawEvent::Char('x'));
        assert!(input.unsubscribe(id));
        assert!(!input.unsubscribe(id));
        input.deliver(RawEvent::Char('y'));

        assert_eq!(count.get(), 1);
        assert_eq!(input.listener_count(), 0);
    }

    #[test]
    fn test_listener_may_unsubscribe_during_delivery() {
        let input = Rc::new(Input::new());
        let calls = Rc::new(Cell::new(0));
        let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        let (c, own) = (Rc::clone(&calls), Rc::clone(&own_id));
        let id = input.subscribe_key(move |input, _| {
            c.set(c.get() + 1);
            if let Some(id) = own.get() {
                input.unsubscribe(id);
            }
        });
        own_id.set(Some(id));

        input.deliver(RawEvent::Key(KeyboardEvent::new(Key::Enter, KeyAction::Press)));
        input.deliver(RawEvent::Key(KeyboardEvent::new(Key::Enter, KeyAction::Release)));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_clipboard() {
        let input = Input::new();
        assert_eq!(input.clipboard(), "");
        input.set_clipboard("pasted");
        assert_eq!(input.clipboard(), "pasted");
    }
}
