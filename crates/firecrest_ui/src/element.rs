//! Core element types and traits.
//!
//! An [`Element`] is the behaviour of one node of the [`ElementTree`]. The
//! tree owns the element, its alignment record and its place in the
//! hierarchy; the element itself only sees the tree through an
//! [`ElementContext`] while one of its hooks runs.

use crate::alignment::ElementAlignment;
use crate::error::UiResult;
use crate::events::{KeyboardEvent, MouseButtonEvent, MouseMotionEvent, ScrollEvent};
use crate::input::Input;
use crate::layout::Layout;
use crate::render::Frame;
use crate::tree::ElementTree;
use firecrest_core::{Rect, Vec2};
use std::any::Any;

slotmap::new_key_type! {
    /// Stable identifier of an element.
    ///
    /// IDs are generational: removing an element never invalidates the IDs
    /// of its siblings, and a stale ID never aliases a newer element.
    pub struct ElementId;
}

/// Type-erasure helper for downcasting trait objects back to their
/// concrete type.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Returns `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Base trait for all elements.
///
/// Every hook has a default. Containers get their behaviour from the
/// defaults, which forward events to the children under the pointer and
/// render the children in order.
pub trait Element: AsAny {
    /// Returns the layout that positions this element's children, or `None`
    /// for a leaf.
    ///
    /// Called once, when the element is inserted into the tree.
    fn layout(&self) -> Option<Box<dyn Layout>> {
        None
    }

    /// Runs once after insertion, before the parent layout sees the new
    /// child. Composite widgets build their own children here.
    fn created(&mut self, _cx: &mut ElementContext<'_>) {}

    /// Generates render commands for this element and its children.
    fn render(&mut self, cx: &mut ElementContext<'_>, frame: &mut Frame<'_>) {
        cx.render_children(frame);
    }

    /// Pointer entered, left or moved over this element.
    fn on_mouse_motion(
        &mut self,
        cx: &mut ElementContext<'_>,
        input: &Input,
        event: MouseMotionEvent,
    ) {
        cx.dispatch_mouse_motion(input, event);
    }

    /// A mouse button changed while the pointer was over this element.
    fn on_mouse_button(
        &mut self,
        cx: &mut ElementContext<'_>,
        input: &Input,
        event: MouseButtonEvent,
    ) {
        cx.dispatch_mouse_button(input, event);
    }

    /// The wheel scrolled while the pointer was over this element.
    fn on_scroll(&mut self, cx: &mut ElementContext<'_>, input: &Input, event: ScrollEvent) {
        cx.dispatch_scroll(input, event);
    }

    /// A key changed while this element held focus.
    fn on_key(&mut self, _cx: &mut ElementContext<'_>, _input: &Input, _event: KeyboardEvent) {}

    /// A character was typed while this element held focus.
    fn on_char(&mut self, _cx: &mut ElementContext<'_>, _input: &Input, _ch: char) {}

    /// This element became the focused element.
    fn on_focus_acquired(&mut self, _cx: &mut ElementContext<'_>) {}

    /// This element stopped being the focused element.
    fn on_focus_lost(&mut self, _cx: &mut ElementContext<'_>) {}
}

/// The plain container: children are placed by their own alignment,
/// relative to the container's box.
#[derive(Debug, Clone, Copy, Default)]
pub struct Container;

impl Element for Container {
    fn layout(&self) -> Option<Box<dyn Layout>> {
        Some(Box::new(crate::layout::FreeLayout))
    }
}

/// An element's window onto the tree while one of its hooks runs.
pub struct ElementContext<'a> {
    tree: &'a mut ElementTree,
    id: ElementId,
}

impl<'a> ElementContext<'a> {
    pub(crate) fn new(tree: &'a mut ElementTree, id: ElementId) -> Self {
        Self { tree, id }
    }

    /// The element this context belongs to.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Read access to the whole tree.
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &ElementTree {
        &*self.tree
    }

    /// Write access to the whole tree.
    #[inline]
    pub fn tree_mut(&mut self) -> &mut ElementTree {
        &mut *self.tree
    }

    /// This element's alignment record.
    #[must_use]
    pub fn alignment(&self) -> Option<&ElementAlignment> {
        self.tree.alignment(self.id)
    }

    /// Edits this element's alignment record in place.
    pub fn update_alignment(&mut self, f: impl FnOnce(&mut ElementAlignment)) {
        if let Some(alignment) = self.tree.alignment_mut(self.id) {
            f(alignment);
        }
    }

    /// Resolved position of this element.
    #[must_use]
    pub fn pixel_position(&self) -> Vec2 {
        self.tree.pixel_position(self.id)
    }

    /// Resolved size of this element.
    #[must_use]
    pub fn pixel_size(&self) -> Vec2 {
        self.tree.pixel_size(self.id)
    }

    /// Resolved rectangle of this element.
    #[must_use]
    pub fn pixel_rect(&self) -> Rect {
        self.tree.pixel_rect(self.id)
    }

    /// Resolved size of the parent (the viewport for the root).
    #[must_use]
    pub fn parent_pixel_size(&self) -> Vec2 {
        self.tree.parent_pixel_size(self.id)
    }

    /// Direct children of this element.
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        self.tree.children(self.id)
    }

    /// Inserts a child under this element.
    ///
    /// # Errors
    ///
    /// Fails if this element is a leaf.
    pub fn create_child<E: Element>(
        &mut self,
        alignment: ElementAlignment,
        element: E,
    ) -> UiResult<ElementId> {
        self.tree.create_child(self.id, alignment, element)
    }

    /// Whether this element currently holds focus.
    #[must_use]
    pub fn has_focus(&self) -> bool {
        self.tree.has_focus(self.id)
    }

    /// Marks this element as a focus target for hit-testing.
    pub fn set_focusable(&mut self, focusable: bool) {
        self.tree.set_focusable(self.id, focusable);
    }

    /// Gives up focus if this element holds it.
    pub fn un_focus(&mut self) {
        if self.tree.focused() == Some(self.id) {
            self.tree.un_focus();
        }
    }

    /// Asks for exclusive pointer capture. Only the focused element can
    /// capture, and only while nobody else does.
    pub fn lock_mouse(&mut self) -> bool {
        self.tree.lock_mouse(self.id)
    }

    /// Releases pointer capture held by this element.
    pub fn unlock_mouse(&mut self) -> bool {
        self.tree.unlock_mouse(self.id)
    }

    /// Renders every child in order.
    pub fn render_children(&mut self, frame: &mut Frame<'_>) {
        self.tree.render_children(self.id, frame);
    }

    /// Renders one element, normally one of this element's children.
    pub fn render_child(&mut self, child: ElementId, frame: &mut Frame<'_>) {
        self.tree.render(child, frame);
    }

    /// Forwards pointer motion to the children, reclassified per child.
    pub fn dispatch_mouse_motion(&mut self, input: &Input, event: MouseMotionEvent) {
        self.tree.dispatch_mouse_motion(self.id, input, event.cursor());
    }

    /// Forwards a button event to the children under the pointer.
    pub fn dispatch_mouse_button(&mut self, input: &Input, event: MouseButtonEvent) {
        self.tree.dispatch_mouse_button(self.id, input, event);
    }

    /// Forwards a scroll event to the children under the pointer.
    pub fn dispatch_scroll(&mut self, input: &Input, event: ScrollEvent) {
        self.tree.dispatch_scroll(self.id, input, event);
    }
}
