//! The display: a window's element tree and its event routing.
//!
//! A [`Display`] subscribes to the five raw input callbacks of its window
//! and turns them into element events:
//!
//! - pointer motion is classified per root child as enter, exit or move;
//! - buttons and the wheel go to the root children under the pointer;
//! - keys and characters go to the focused element only;
//! - while the pointer is captured, pointer events go to the focused
//!   element only.
//!
//! A left release re-runs the hit-test and moves focus to the result, or
//! clears it on a miss.

use crate::alignment::ElementAlignment;
use crate::element::{Element, ElementId};
use crate::error::UiResult;
use crate::events::{
    ButtonAction, CursorEvent, KeyboardEvent, MotionAction, MouseButtonEvent, MouseMotionEvent,
    ScrollEvent,
};
use crate::input::{Input, MouseButton, SubscriptionId};
use crate::render::{Frame, UIBatch, UIRenderer};
use crate::tree::ElementTree;
use crate::window::Window;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

/// The element tree of one window.
pub struct Display {
    tree: Rc<RefCell<ElementTree>>,
    window: Rc<Window>,
    subscriptions: [SubscriptionId; 5],
    last_frame: Cell<Option<Instant>>,
}

impl Display {
    /// Creates an empty tree sized to `window` and starts routing its input.
    #[must_use]
    pub fn new(window: Rc<Window>) -> Self {
        let tree = Rc::new(RefCell::new(ElementTree::new(window.dimensions())));
        let input = window.input();

        let subscriptions = [
            input.subscribe_mouse_motion(router(&tree, &window, route_motion)),
            input.subscribe_mouse_button(router(&tree, &window, route_button)),
            input.subscribe_scroll(router(&tree, &window, route_scroll)),
            input.subscribe_key(router(&tree, &window, route_key)),
            input.subscribe_char(router(&tree, &window, route_char)),
        ];
        tracing::debug!("display subscribed to window input: {:?}", subscriptions);

        Self {
            tree,
            window,
            subscriptions,
            last_frame: Cell::new(None),
        }
    }

    /// The element tree.
    ///
    /// # Panics
    ///
    /// If the tree is mutably borrowed, which only happens while an event
    /// is being routed.
    #[must_use]
    pub fn tree(&self) -> Ref<'_, ElementTree> {
        self.tree.borrow()
    }

    /// The element tree, mutably.
    ///
    /// # Panics
    ///
    /// If the tree is already borrowed.
    #[must_use]
    pub fn tree_mut(&self) -> RefMut<'_, ElementTree> {
        self.tree.borrow_mut()
    }

    /// The root container.
    #[must_use]
    pub fn root(&self) -> ElementId {
        self.tree.borrow().root()
    }

    /// The window this display routes.
    #[must_use]
    pub fn window(&self) -> &Rc<Window> {
        &self.window
    }

    /// Inserts `element` under the root.
    ///
    /// # Errors
    ///
    /// Whatever [`ElementTree::create_child`] reports.
    pub fn create_child<E: Element>(
        &self,
        alignment: ElementAlignment,
        element: E,
    ) -> UiResult<ElementId> {
        let mut tree = self.tree.borrow_mut();
        let root = tree.root();
        tree.create_child(root, alignment, element)
    }

    /// The focused element.
    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.tree.borrow().focused()
    }

    /// Moves focus to `id`; see [`ElementTree::focus_on`].
    pub fn focus_on(&self, id: ElementId) -> bool {
        let mut tree = self.tree.borrow_mut();
        let moved = tree.focus_on(id);
        self.window.set_cursor_captured(tree.is_mouse_captured());
        moved
    }

    /// Clears focus.
    pub fn un_focus(&self) {
        let mut tree = self.tree.borrow_mut();
        tree.un_focus();
        self.window.set_cursor_captured(tree.is_mouse_captured());
    }

    /// Whether an element holds the pointer.
    #[must_use]
    pub fn is_mouse_captured(&self) -> bool {
        self.tree.borrow().is_mouse_captured()
    }

    /// Renders a frame, timing it against the previous call.
    pub fn render<'r>(&self, renderer: &'r mut UIRenderer) -> &'r [UIBatch] {
        let now = Instant::now();
        let delta = self
            .last_frame
            .replace(Some(now))
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.render_frame(delta, renderer)
    }

    /// Renders a frame with an explicit delta: the whole tree in pre-order,
    /// clipped to the window.
    pub fn render_frame<'r>(&self, delta: Duration, renderer: &'r mut UIRenderer) -> &'r [UIBatch] {
        renderer.begin_frame();
        let Ok(mut tree) = self.tree.try_borrow_mut() else {
            tracing::warn!("skipped frame: element tree is busy");
            return renderer.end_frame();
        };

        tree.set_viewport(self.window.dimensions());
        let root = tree.root();
        renderer.push_clip(tree.pixel_rect(root));
        tree.render(root, &mut Frame::new(renderer, delta));
        renderer.pop_clip();
        renderer.end_frame()
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        let input = self.window.input();
        for id in self.subscriptions {
            input.unsubscribe(id);
        }
        tracing::debug!("display unsubscribed from window input");
    }
}

/// Wraps a routing function into an input listener.
///
/// The listener holds the tree and window weakly: the window's input owns
/// its listeners, so strong handles would never be released.
fn router<E: 'static>(
    tree: &Rc<RefCell<ElementTree>>,
    window: &Rc<Window>,
    route: fn(&mut ElementTree, &Input, E),
) -> impl Fn(&Input, E) + 'static {
    let tree: Weak<RefCell<ElementTree>> = Rc::downgrade(tree);
    let window: Weak<Window> = Rc::downgrade(window);

    move |input, event| {
        let (Some(cell), Some(window)) = (tree.upgrade(), window.upgrade()) else {
            return;
        };
        let Ok(mut tree) = cell.try_borrow_mut() else {
            tracing::warn!("dropped input event: element tree is busy");
            return;
        };

        tree.set_viewport(window.dimensions());
        route(&mut tree, input, event);
        window.set_cursor_captured(tree.is_mouse_captured());
    }
}

fn route_motion(tree: &mut ElementTree, input: &Input, event: CursorEvent) {
    if tree.is_mouse_captured() {
        if let Some(focused) = tree.focused() {
            let event = MouseMotionEvent::from_cursor(MotionAction::Move, event);
            tree.send_mouse_motion(focused, input, event);
        }
    } else {
        let root = tree.root();
        tree.dispatch_mouse_motion(root, input, event);
    }
}

fn route_button(tree: &mut ElementTree, input: &Input, event: MouseButtonEvent) {
    if tree.is_mouse_captured() {
        if let Some(focused) = tree.focused() {
            tree.send_mouse_button(focused, input, event);
        }
    } else {
        let root = tree.root();
        tree.dispatch_mouse_button(root, input, event);
    }

    if event.button == MouseButton::Left && event.action == ButtonAction::Release {
        let target = tree.find_focused_element(input.mouse());
        tree.set_focus(target);
    }
}

fn route_scroll(tree: &mut ElementTree, input: &Input, event: ScrollEvent) {
    if tree.is_mouse_captured() {
        if let Some(focused) = tree.focused() {
            tree.send_scroll(focused, input, event);
        }
    } else {
        let root = tree.root();
        tree.dispatch_scroll(root, input, event);
    }
}

fn route_key(tree: &mut ElementTree, input: &Input, event: KeyboardEvent) {
    if let Some(focused) = tree.focused() {
        tree.send_key(focused, input, event);
    }
}

fn route_char(tree: &mut ElementTree, input: &Input, ch: char) {
    if let Some(focused) = tree.focused() {
        tree.send_char(focused, input, ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderCommand;
    use crate::widget::ColoredRect;
    use firecrest_core::{Color, Rect, Vec2};

    #[test]
    fn test_frame_is_clipped_to_window() {
        let (window, _platform) = Window::headless(200.0, 100.0);
        let display = Display::new(window);
        display
            .create_child(ElementAlignment::fixed(10.0, 10.0, 20.0, 20.0), ColoredRect::new(Color::RED))
            .unwrap();

        let mut renderer = UIRenderer::new();
        let batches = display.render_frame(Duration::from_millis(16), &mut renderer);

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].clip, Some(Rect::new(0.0, 0.0, 200.0, 100.0)));
        assert_eq!(
            batches[0].commands,
            vec![RenderCommand::Rect {
                bounds: Rect::new(10.0, 10.0, 20.0, 20.0),
                color: Color::RED,
                corner_radius: 0.0,
            }]
        );
    }

    #[test]
    fn test_viewport_follows_resize() {
        let (window, platform) = Window::headless(200.0, 100.0);
        let display = Display::new(Rc::clone(&window));
        platform.push(crate::window::RawEvent::Resized(Vec2::new(400.0, 300.0)));
        window.poll_events();

        let mut renderer = UIRenderer::new();
        let batches = display.render(&mut renderer);
        assert!(batches.is_empty());

        let root = display.root();
        assert_eq!(display.tree().pixel_rect(root), Rect::new(0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (window, _platform) = Window::headless(200.0, 100.0);
        let display = Display::new(Rc::clone(&window));
        assert_eq!(window.input().listener_count(), 5);

        drop(display);
        assert_eq!(window.input().listener_count(), 0);
    }
}
