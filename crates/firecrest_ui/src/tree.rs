//! Element tree for hierarchical UI management.
//!
//! The tree is a slot-map arena: every node lives in one [`SlotMap`] keyed by
//! [`ElementId`], and parent/child links are plain IDs. Removing a subtree
//! frees its slots without disturbing any other ID.
//!
//! The tree also owns the two pieces of shared interaction state: the single
//! focused element and the mouse-capture flag. Both change only through
//! [`ElementTree::focus_on`], [`ElementTree::un_focus`],
//! [`ElementTree::lock_mouse`] and [`ElementTree::unlock_mouse`].
//!
//! ## Running element hooks
//!
//! While a hook runs, its element is taken out of its node and handed an
//! [`ElementContext`] with full access to the tree; it is put back when the
//! hook returns. Focus notifications aimed at an element whose hook is still
//! running are queued and delivered, in order, as soon as it is back.

use crate::alignment::{ElementAlignment, Slot};
use crate::element::{Container, Element, ElementContext, ElementId};
use crate::error::{UiError, UiResult};
use crate::events::{
    CursorEvent, KeyboardEvent, MotionAction, MouseButtonEvent, MouseMotionEvent, ScrollEvent,
};
use crate::input::Input;
use crate::layout::Layout;
use crate::render::Frame;
use firecrest_core::{Rect, Vec2};
use slotmap::SlotMap;
use std::collections::VecDeque;

/// One slot of the arena.
struct Node {
    /// `None` only while one of the element's own hooks runs.
    element: Option<Box<dyn Element>>,
    /// Present for containers.
    layout: Option<Box<dyn Layout>>,
    alignment: ElementAlignment,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    focusable: bool,
    has_focus: bool,
}

impl Node {
    fn new(
        parent: Option<ElementId>,
        alignment: ElementAlignment,
        layout: Option<Box<dyn Layout>>,
    ) -> Self {
        Self {
            element: None,
            layout,
            alignment,
            parent,
            children: Vec::new(),
            focusable: false,
            has_focus: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusChange {
    Acquired,
    Lost,
}

/// Owns every element of one window.
pub struct ElementTree {
    nodes: SlotMap<ElementId, Node>,
    root: ElementId,
    /// Size the root is resolved against.
    viewport: Vec2,
    focused: Option<ElementId>,
    mouse_captured: bool,
    pending_focus: VecDeque<(ElementId, FocusChange)>,
}

impl ElementTree {
    /// Creates a tree whose root is a plain [`Container`] filling the viewport.
    #[must_use]
    pub fn new(viewport: Vec2) -> Self {
        let mut nodes = SlotMap::with_capacity_and_key(64);
        let root_element: Box<dyn Element> = Box::new(Container);
        let mut root_node = Node::new(None, ElementAlignment::default(), root_element.layout());
        root_node.element = Some(root_element);
        let root = nodes.insert(root_node);

        Self {
            nodes,
            root,
            viewport,
            focused: None,
            mouse_captured: false,
            pending_focus: VecDeque::new(),
        }
    }

    /// The root container.
    #[inline]
    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Size the root is resolved against.
    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Updates the size the root is resolved against.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Number of live elements, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `id` refers to a live element.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Inserts `element` as the last child of `parent`.
    ///
    /// The element's [`Element::created`] hook runs first, then the parent
    /// layout's [`Layout::child_created`] hook, which may replace parts of
    /// the alignment.
    ///
    /// # Errors
    ///
    /// [`UiError::ElementNotFound`] if `parent` is gone and
    /// [`UiError::NotAContainer`] if it is a leaf.
    pub fn create_child<E: Element>(
        &mut self,
        parent: ElementId,
        alignment: ElementAlignment,
        element: E,
    ) -> UiResult<ElementId> {
        let parent_node = self.nodes.get(parent).ok_or(UiError::ElementNotFound(parent))?;
        if parent_node.layout.is_none() {
            return Err(UiError::NotAContainer(parent));
        }

        let mut element: Box<dyn Element> = Box::new(element);
        let id = self.nodes.insert(Node::new(Some(parent), alignment, element.layout()));

        if let Some(node) = self.nodes.get_mut(id) {
            if let Some(layout) = node.layout.as_mut() {
                layout.attached(id, &mut node.alignment);
            }
        }
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }

        {
            let mut cx = ElementContext::new(self, id);
            element.created(&mut cx);
        }
        self.restore(id, element);

        if let Some(mut alignment) = self.nodes.get_mut(id).map(|n| std::mem::take(&mut n.alignment)) {
            if let Some(layout) = self.nodes.get_mut(parent).and_then(|n| n.layout.as_mut()) {
                layout.child_created(parent, id, &mut alignment);
            }
            if let Some(node) = self.nodes.get_mut(id) {
                node.alignment = alignment;
            }
        }

        tracing::trace!("created element {:?} under {:?}", id, parent);
        Ok(id)
    }

    /// Removes an element and its whole subtree.
    ///
    /// If the focused element is in the subtree, focus and mouse capture are
    /// cleared without notifying the removed element.
    ///
    /// # Errors
    ///
    /// [`UiError::RootRemoval`] for the root and [`UiError::ElementNotFound`]
    /// for an unknown ID.
    pub fn remove(&mut self, id: ElementId) -> UiResult<()> {
        if id == self.root {
            return Err(UiError::RootRemoval);
        }
        let parent = self.nodes.get(id).ok_or(UiError::ElementNotFound(id))?.parent;

        let subtree: Vec<ElementId> = self.iter_dfs(id).collect();
        if let Some(focused) = self.focused {
            if subtree.contains(&focused) {
                self.focused = None;
                self.mouse_captured = false;
                tracing::debug!("focused element {:?} removed; focus cleared", focused);
            }
        }

        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent_node.children.retain(|&child| child != id);
        }
        for node in &subtree {
            self.nodes.remove(*node);
        }
        self.pending_focus.retain(|(target, _)| !subtree.contains(target));

        tracing::debug!("removed element {:?} ({} nodes)", id, subtree.len());
        Ok(())
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Parent of an element; `None` for the root and for unknown IDs.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Direct children of an element, in insertion order.
    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Borrows an element as its concrete type.
    ///
    /// Returns `None` for unknown IDs, for the wrong type, and while one of
    /// the element's own hooks runs.
    #[must_use]
    pub fn get<E: Element>(&self, id: ElementId) -> Option<&E> {
        let element = self.nodes.get(id)?.element.as_deref()?;
        element.as_any().downcast_ref::<E>()
    }

    /// Mutably borrows an element as its concrete type.
    #[must_use]
    pub fn get_mut<E: Element>(&mut self, id: ElementId) -> Option<&mut E> {
        let element = self.nodes.get_mut(id)?.element.as_deref_mut()?;
        element.as_any_mut().downcast_mut::<E>()
    }

    /// Runs `f` on an element with a context, the way the tree runs hooks.
    ///
    /// Use this for widget mutators that need to touch the tree, such as
    /// setting a label's text.
    pub fn with_element<E: Element, R>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut E, &mut ElementContext<'_>) -> R,
    ) -> Option<R> {
        self.visit(id, |element, cx| element.as_any_mut().downcast_mut::<E>().map(|e| f(e, cx)))
            .flatten()
    }

    /// Alignment record of an element.
    #[must_use]
    pub fn alignment(&self, id: ElementId) -> Option<&ElementAlignment> {
        self.nodes.get(id).map(|node| &node.alignment)
    }

    /// Mutable alignment record of an element.
    #[must_use]
    pub fn alignment_mut(&mut self, id: ElementId) -> Option<&mut ElementAlignment> {
        self.nodes.get_mut(id).map(|node| &mut node.alignment)
    }

    /// Borrows a container's layout as its concrete type.
    #[must_use]
    pub fn layout<L: Layout>(&self, id: ElementId) -> Option<&L> {
        let layout = self.nodes.get(id)?.layout.as_deref()?;
        layout.as_any().downcast_ref::<L>()
    }

    /// Mutably borrows a container's layout as its concrete type.
    #[must_use]
    pub fn layout_mut<L: Layout>(&mut self, id: ElementId) -> Option<&mut L> {
        let layout = self.nodes.get_mut(id)?.layout.as_deref_mut()?;
        layout.as_any_mut().downcast_mut::<L>()
    }

    /// Whether hit-testing may pick this element.
    #[must_use]
    pub fn is_focusable(&self, id: ElementId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.focusable)
    }

    /// Marks an element as a focus target.
    pub fn set_focusable(&mut self, id: ElementId, focusable: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.focusable = focusable;
        }
    }

    /// Whether an element currently holds focus.
    #[must_use]
    pub fn has_focus(&self, id: ElementId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.has_focus)
    }

    /// The focused element, if any.
    #[inline]
    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Whether pointer events currently bypass hit-testing.
    #[inline]
    #[must_use]
    pub fn is_mouse_captured(&self) -> bool {
        self.mouse_captured
    }

    /// Element IDs of a subtree in pre-order (parent before children),
    /// which is also drawing order.
    pub fn iter_dfs(&self, from: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        ElementDfsIterator {
            tree: self,
            stack: if self.contains(from) { vec![from] } else { Vec::new() },
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Resolved bottom-left corner of an element in window pixels.
    #[must_use]
    pub fn pixel_position(&self, id: ElementId) -> Vec2 {
        let Some(node) = self.nodes.get(id) else {
            return Vec2::ZERO;
        };
        match node.parent {
            None => node.alignment.pixel_position(self, self.viewport),
            Some(parent) => self
                .container_layout(parent)
                .map_or(Vec2::ZERO, |layout| {
                    layout.child_pixel_position(self, parent, &node.alignment)
                }),
        }
    }

    /// Resolved size of an element in pixels.
    #[must_use]
    pub fn pixel_size(&self, id: ElementId) -> Vec2 {
        let Some(node) = self.nodes.get(id) else {
            return Vec2::ZERO;
        };
        match node.parent {
            None => node.alignment.pixel_size(self, self.viewport),
            Some(parent) => self
                .container_layout(parent)
                .map_or(Vec2::ZERO, |layout| layout.child_pixel_size(self, parent, &node.alignment)),
        }
    }

    /// Size `id` would resolve to if it had `alignment` instead of its own
    /// record.
    #[must_use]
    pub fn pixel_size_as(&self, id: ElementId, alignment: &ElementAlignment) -> Vec2 {
        match self.parent(id) {
            None => alignment.pixel_size(self, self.viewport),
            Some(parent) => self
                .container_layout(parent)
                .map_or(Vec2::ZERO, |layout| layout.child_pixel_size(self, parent, alignment)),
        }
    }

    /// Resolved rectangle of an element.
    #[must_use]
    pub fn pixel_rect(&self, id: ElementId) -> Rect {
        Rect::from_pos_size(self.pixel_position(id), self.pixel_size(id))
    }

    /// Resolved size of an element's parent; the viewport for the root.
    #[must_use]
    pub fn parent_pixel_size(&self, id: ElementId) -> Vec2 {
        match self.parent(id) {
            Some(parent) => self.pixel_size(parent),
            None => self.viewport,
        }
    }

    /// Evaluates a value computed by a container's layout.
    #[must_use]
    pub fn resolve_layout(
        &self,
        container: ElementId,
        subject: ElementId,
        slot: Slot,
        p1: f32,
        p2: f32,
    ) -> f32 {
        self.container_layout(container)
            .map_or(0.0, |layout| layout.resolve(self, container, subject, slot, p1, p2))
    }

    fn container_layout(&self, id: ElementId) -> Option<&dyn Layout> {
        self.nodes.get(id)?.layout.as_deref()
    }

    /// Depth of an element: 0 for the root, one less for every level down.
    #[must_use]
    pub fn depth(&self, id: ElementId) -> i32 {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth -= 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Most negative depth reachable in the subtree of `id`.
    #[must_use]
    pub fn max_depth(&self, id: ElementId) -> i32 {
        let own = self.depth(id);
        self.children(id)
            .iter()
            .map(|&child| self.max_depth(child))
            .fold(own, i32::min)
    }

    // =========================================================================
    // Focus & capture
    // =========================================================================

    /// Hit-tests from the root.
    #[must_use]
    pub fn find_focused_element(&self, point: Vec2) -> Option<ElementId> {
        self.find_focused_element_in(self.root, point)
    }

    /// Hit-tests the subtree of `id`.
    ///
    /// Descends into the first child whose rectangle contains the point. If
    /// that branch yields nothing focusable, the answer is `id` itself when it
    /// is focusable; later siblings are never tried.
    #[must_use]
    pub fn find_focused_element_in(&self, id: ElementId, point: Vec2) -> Option<ElementId> {
        let node = self.nodes.get(id)?;
        let hit = node
            .children
            .iter()
            .copied()
            .find(|&child| self.pixel_rect(child).contains(point));

        if let Some(found) = hit.and_then(|child| self.find_focused_element_in(child, point)) {
            return Some(found);
        }
        node.focusable.then_some(id)
    }

    /// Moves focus to `id`. The previous holder is notified of the loss
    /// before `id` is notified of the gain. Focusing the element that
    /// already holds focus changes nothing.
    ///
    /// Returns `false` for an unknown ID.
    pub fn focus_on(&mut self, id: ElementId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.focused == Some(id) {
            return true;
        }

        self.un_focus();
        self.focused = Some(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.has_focus = true;
        }
        tracing::debug!("focus moved to {:?}", id);
        self.notify_focus(id, FocusChange::Acquired);
        true
    }

    /// Clears focus. A no-op when nothing is focused.
    pub fn un_focus(&mut self) {
        let Some(previous) = self.focused.take() else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(previous) {
            node.has_focus = false;
        }
        tracing::debug!("focus left {:?}", previous);
        self.notify_focus(previous, FocusChange::Lost);
    }

    /// Focuses `target`, or clears focus for `None`.
    pub fn set_focus(&mut self, target: Option<ElementId>) {
        match target {
            Some(id) => {
                self.focus_on(id);
            }
            None => self.un_focus(),
        }
    }

    /// Grants pointer capture to `requester` if it is the focused element
    /// and the pointer is free.
    pub fn lock_mouse(&mut self, requester: ElementId) -> bool {
        if self.focused != Some(requester) || self.mouse_captured {
            tracing::trace!("mouse capture denied to {:?}", requester);
            return false;
        }
        self.mouse_captured = true;
        tracing::debug!("mouse captured by {:?}", requester);
        true
    }

    /// Releases pointer capture if `requester` is the focused element and
    /// the pointer is captured.
    pub fn unlock_mouse(&mut self, requester: ElementId) -> bool {
        if self.focused != Some(requester) || !self.mouse_captured {
            tracing::trace!("mouse release denied to {:?}", requester);
            return false;
        }
        self.mouse_captured = false;
        tracing::debug!("mouse released by {:?}", requester);
        true
    }

    fn notify_focus(&mut self, id: ElementId, change: FocusChange) {
        self.pending_focus.push_back((id, change));
        self.flush_pending_focus();
    }

    fn flush_pending_focus(&mut self) {
        while let Some(&(id, change)) = self.pending_focus.front() {
            match self.nodes.get(id).map(|node| node.element.is_some()) {
                None => {
                    self.pending_focus.pop_front();
                }
                // Still running one of its hooks; delivered once it is restored.
                Some(false) => break,
                Some(true) => {
                    self.pending_focus.pop_front();
                    self.visit(id, |element, cx| match change {
                        FocusChange::Acquired => element.on_focus_acquired(cx),
                        FocusChange::Lost => element.on_focus_lost(cx),
                    });
                }
            }
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Runs `f` on an element with a context.
    ///
    /// Returns `None` if the element is unknown or already running a hook.
    pub fn visit<R>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut dyn Element, &mut ElementContext<'_>) -> R,
    ) -> Option<R> {
        let mut element = self.nodes.get_mut(id)?.element.take()?;
        let result = {
            let mut cx = ElementContext::new(self, id);
            f(&mut *element, &mut cx)
        };
        self.restore(id, element);
        Some(result)
    }

    fn restore(&mut self, id: ElementId, element: Box<dyn Element>) {
        match self.nodes.get_mut(id) {
            Some(node) if node.element.is_none() => node.element = Some(element),
            _ => tracing::warn!("element {:?} was removed while running its own hook", id),
        }
        if !self.pending_focus.is_empty() {
            self.flush_pending_focus();
        }
    }

    /// Forwards pointer motion to the children of `container`, classifying
    /// it per child as enter, exit or move. Children the pointer neither
    /// left nor entered get nothing.
    pub fn dispatch_mouse_motion(&mut self, container: ElementId, input: &Input, event: CursorEvent) {
        for child in self.children(container).to_vec() {
            let rect = self.pixel_rect(child);
            let action = match (rect.contains(event.last_position), rect.contains(event.position)) {
                (true, true) => MotionAction::Move,
                (true, false) => MotionAction::Exit,
                (false, true) => MotionAction::Enter,
                (false, false) => continue,
            };
            self.send_mouse_motion(child, input, MouseMotionEvent::from_cursor(action, event));
        }
    }

    /// Forwards a button event to the children of `container` under the
    /// current pointer position.
    pub fn dispatch_mouse_button(
        &mut self,
        container: ElementId,
        input: &Input,
        event: MouseButtonEvent,
    ) {
        let mouse = input.mouse();
        for child in self.children(container).to_vec() {
            if self.pixel_rect(child).contains(mouse) {
                self.send_mouse_button(child, input, event);
            }
        }
    }

    /// Forwards a scroll event to the children of `container` under the
    /// current pointer position.
    pub fn dispatch_scroll(&mut self, container: ElementId, input: &Input, event: ScrollEvent) {
        let mouse = input.mouse();
        for child in self.children(container).to_vec() {
            if self.pixel_rect(child).contains(mouse) {
                self.send_scroll(child, input, event);
            }
        }
    }

    /// Delivers pointer motion to one element.
    pub fn send_mouse_motion(&mut self, id: ElementId, input: &Input, event: MouseMotionEvent) {
        self.visit(id, |element, cx| element.on_mouse_motion(cx, input, event));
    }

    /// Delivers a button event to one element.
    pub fn send_mouse_button(&mut self, id: ElementId, input: &Input, event: MouseButtonEvent) {
        self.visit(id, |element, cx| element.on_mouse_button(cx, input, event));
    }

    /// Delivers a scroll event to one element.
    pub fn send_scroll(&mut self, id: ElementId, input: &Input, event: ScrollEvent) {
        self.visit(id, |element, cx| element.on_scroll(cx, input, event));
    }

    /// Delivers a keyboard event to one element.
    pub fn send_key(&mut self, id: ElementId, input: &Input, event: KeyboardEvent) {
        self.visit(id, |element, cx| element.on_key(cx, input, event));
    }

    /// Delivers a typed character to one element.
    pub fn send_char(&mut self, id: ElementId, input: &Input, ch: char) {
        self.visit(id, |element, cx| element.on_char(cx, input, ch));
    }

    /// Renders one element; containers render their subtree.
    pub fn render(&mut self, id: ElementId, frame: &mut Frame<'_>) {
        self.visit(id, |element, cx| element.render(cx, frame));
    }

    /// Renders the children of `container` in order.
    pub fn render_children(&mut self, container: ElementId, frame: &mut Frame<'_>) {
        for child in self.children(container).to_vec() {
            self.render(child, frame);
        }
    }
}

/// Pre-order iterator over a subtree.
struct ElementDfsIterator<'a> {
    tree: &'a ElementTree,
    stack: Vec<ElementId>,
}

impl Iterator for ElementDfsIterator<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;

        // Push children in reverse order so they're visited first-to-last
        self.stack.extend(self.tree.children(id).iter().rev().copied());

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::Align;
    use crate::events::{ButtonAction, KeyAction};
    use crate::input::{Key, MouseButton};
    use crate::window::RawEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records every hook it receives.
    struct Probe {
        name: &'static str,
        log: Log,
        focusable: bool,
    }

    impl Probe {
        fn new(name: &'static str, log: &Log) -> Self {
            Self { name, log: Rc::clone(log), focusable: false }
        }

        fn focusable(mut self) -> Self {
            self.focusable = true;
            self
        }

        fn record(&self, what: impl std::fmt::Display) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, what));
        }
    }

    impl Element for Probe {
        fn created(&mut self, cx: &mut ElementContext<'_>) {
            cx.set_focusable(self.focusable);
        }

        fn on_mouse_motion(&mut self, _: &mut ElementContext<'_>, _: &Input, e: MouseMotionEvent) {
            self.record(format!("{:?}", e.action));
        }

        fn on_mouse_button(&mut self, _: &mut ElementContext<'_>, _: &Input, e: MouseButtonEvent) {
            self.record(format!("{:?}", e.action));
        }

        fn on_focus_acquired(&mut self, _: &mut ElementContext<'_>) {
            self.record("acquired");
        }

        fn on_focus_lost(&mut self, _: &mut ElementContext<'_>) {
            self.record("lost");
        }
    }

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn tree() -> ElementTree {
        ElementTree::new(Vec2::new(100.0, 100.0))
    }

    #[test]
    fn test_tree_hierarchy() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_child(root, ElementAlignment::default(), Container).unwrap();
        let b = tree.create_child(root, ElementAlignment::default(), Container).unwrap();
        let c = tree.create_child(a, ElementAlignment::default(), Container).unwrap();

        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.parent(c), Some(a));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.iter_dfs(root).collect::<Vec<_>>(), vec![root, a, c, b]);
    }

    #[test]
    fn test_leaf_cannot_own_children() {
        let mut tree = tree();
        let log = log();
        let root = tree.root();
        let leaf = tree.create_child(root, ElementAlignment::default(), Probe::new("p", &log)).unwrap();

        let err = tree.create_child(leaf, ElementAlignment::default(), Container).unwrap_err();
        assert_eq!(err, UiError::NotAContainer(leaf));
    }

    #[test]
    fn test_remove_keeps_sibling_ids() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_child(root, ElementAlignment::default(), Container).unwrap();
        let b = tree.create_child(root, ElementAlignment::default(), Container).unwrap();
        let nested = tree.create_child(a, ElementAlignment::default(), Container).unwrap();

        tree.remove(a).unwrap();

        assert!(!tree.contains(a));
        assert!(!tree.contains(nested));
        assert!(tree.contains(b));
        assert_eq!(tree.children(root), &[b]);
        assert_eq!(tree.remove(a), Err(UiError::ElementNotFound(a)));
        assert_eq!(tree.remove(root), Err(UiError::RootRemoval));
    }

    #[test]
    fn test_default_resolution_is_relative_to_parent() {
        let mut tree = tree();
        let root = tree.root();
        let panel = tree
            .create_child(root, ElementAlignment::fixed(10.0, 20.0, 50.0, 40.0), Container)
            .unwrap();
        let inner = tree
            .create_child(
                panel,
                ElementAlignment::new(5.0, Align::relative(0.5), Align::relative(0.5), 10.0),
                Container,
            )
            .unwrap();

        assert_eq!(tree.pixel_rect(panel), Rect::new(10.0, 20.0, 50.0, 40.0));
        assert_eq!(tree.pixel_rect(inner), Rect::new(15.0, 40.0, 25.0, 10.0));
        assert_eq!(tree.parent_pixel_size(inner), Vec2::new(50.0, 40.0));
    }

    #[test]
    fn test_depth() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.create_child(root, ElementAlignment::default(), Container).unwrap();
        let b = tree.create_child(a, ElementAlignment::default(), Container).unwrap();
        let _c = tree.create_child(b, ElementAlignment::default(), Container).unwrap();
        let _d = tree.create_child(root, ElementAlignment::default(), Container).unwrap();

        assert_eq!(tree.depth(root), 0);
        assert_eq!(tree.depth(b), -2);
        assert_eq!(tree.max_depth(root), -3);
        assert_eq!(tree.max_depth(b), -3);
    }

    #[test]
    fn test_motion_enter_exit_move() {
        let mut tree = tree();
        let log = log();
        let input = Input::new();
        let root = tree.root();
        tree.create_child(root, ElementAlignment::fixed(0.0, 0.0, 10.0, 10.0), Probe::new("c", &log))
            .unwrap();

        let motion = |from: (f32, f32), to: (f32, f32)| CursorEvent {
            last_position: from.into(),
            position: to.into(),
        };

        tree.dispatch_mouse_motion(root, &input, motion((5.0, 5.0), (15.0, 5.0)));
        assert_eq!(*log.borrow(), vec!["c:Exit"]);

        log.borrow_mut().clear();
        tree.dispatch_mouse_motion(root, &input, motion((15.0, 5.0), (5.0, 5.0)));
        assert_eq!(*log.borrow(), vec!["c:Enter"]);

        log.borrow_mut().clear();
        tree.dispatch_mouse_motion(root, &input, motion((5.0, 5.0), (6.0, 6.0)));
        tree.dispatch_mouse_motion(root, &input, motion((50.0, 50.0), (60.0, 60.0)));
        assert_eq!(*log.borrow(), vec!["c:Move"]);
    }

    #[test]
    fn test_buttons_reach_only_children_under_pointer() {
        let mut tree = tree();
        let log = log();
        let input = Input::new();
        let root = tree.root();
        tree.create_child(root, ElementAlignment::fixed(0.0, 0.0, 10.0, 10.0), Probe::new("a", &log))
            .unwrap();
        tree.create_child(root, ElementAlignment::fixed(50.0, 0.0, 10.0, 10.0), Probe::new("b", &log))
            .unwrap();

        input.deliver(RawEvent::CursorMoved(Vec2::new(55.0, 5.0)));
        tree.dispatch_mouse_button(
            root,
            &input,
            MouseButtonEvent::new(MouseButton::Left, ButtonAction::Press),
        );

        assert_eq!(*log.borrow(), vec!["b:Press"]);
    }

    #[test]
    fn test_focus_exclusivity_and_order() {
        let mut tree = tree();
        let log = log();
        let root = tree.root();
        let e1 = tree.create_child(root, ElementAlignment::default(), Probe::new("e1", &log)).unwrap();
        let e2 = tree.create_child(root, ElementAlignment::default(), Probe::new("e2", &log)).unwrap();

        assert!(tree.focus_on(e1));
        assert!(tree.focus_on(e2));

        assert!(!tree.has_focus(e1));
        assert!(tree.has_focus(e2));
        assert_eq!(tree.focused(), Some(e2));
        assert_eq!(*log.borrow(), vec!["e1:acquired", "e1:lost", "e2:acquired"]);
    }

    #[test]
    fn test_refocus_same_element_is_silent() {
        let mut tree = tree();
        let log = log();
        let root = tree.root();
        let e = tree.create_child(root, ElementAlignment::default(), Probe::new("e", &log)).unwrap();

        tree.focus_on(e);
        tree.focus_on(e);
        assert_eq!(*log.borrow(), vec!["e:acquired"]);
    }

    #[test]
    fn test_un_focus_without_focus_is_noop() {
        let mut tree = tree();
        tree.un_focus();
        assert_eq!(tree.focused(), None);
        assert!(!tree.is_mouse_captured());
    }

    #[test]
    fn test_hit_test_first_branch_wins() {
        let mut tree = tree();
        let log = log();
        let root = tree.root();
        // An unfocusable container covering the left half, overlapping a
        // focusable element that sits later in the child list.
        let left = tree.create_child(root, ElementAlignment::fixed(0.0, 0.0, 50.0, 100.0), Container).unwrap();
        let inner = tree
            .create_child(left, ElementAlignment::fixed(0.0, 0.0, 10.0, 10.0), Probe::new("inner", &log).focusable())
            .unwrap();
        let _overlap = tree
            .create_child(root, ElementAlignment::fixed(0.0, 0.0, 100.0, 100.0), Probe::new("overlap", &log).focusable())
            .unwrap();

        assert_eq!(tree.find_focused_element(Vec2::new(5.0, 5.0)), Some(inner));
        // Inside `left` but outside `inner`: the sibling is never consulted.
        assert_eq!(tree.find_focused_element(Vec2::new(30.0, 50.0)), None);
        // Repeated queries agree.
        assert_eq!(
            tree.find_focused_element(Vec2::new(5.0, 5.0)),
            tree.find_focused_element(Vec2::new(5.0, 5.0))
        );
    }

    #[test]
    fn test_hit_test_empty_tree() {
        let tree = tree();
        assert_eq!(tree.find_focused_element(Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_mouse_capture_arbitration() {
        let mut tree = tree();
        let log = log();
        let root = tree.root();
        let a = tree.create_child(root, ElementAlignment::default(), Probe::new("a", &log)).unwrap();
        let b = tree.create_child(root, ElementAlignment::default(), Probe::new("b", &log)).unwrap();

        // Nobody focused.
        assert!(!tree.lock_mouse(a));
        tree.focus_on(a);
        // Wrong requester.
        assert!(!tree.lock_mouse(b));
        assert!(!tree.is_mouse_captured());

        assert!(tree.lock_mouse(a));
        // Already locked.
        assert!(!tree.lock_mouse(a));
        assert!(!tree.unlock_mouse(b));
        assert!(tree.is_mouse_captured());

        assert!(tree.unlock_mouse(a));
        assert!(!tree.unlock_mouse(a));
    }

    #[test]
    fn test_removing_focused_element_clears_focus_and_capture() {
        let mut tree = tree();
        let log = log();
        let root = tree.root();
        let panel = tree.create_child(root, ElementAlignment::default(), Container).unwrap();
        let e = tree.create_child(panel, ElementAlignment::default(), Probe::new("e", &log)).unwrap();
        tree.focus_on(e);
        tree.lock_mouse(e);

        tree.remove(panel).unwrap();

        assert_eq!(tree.focused(), None);
        assert!(!tree.is_mouse_captured());
    }

    /// Gives up focus from inside its own key handler.
    struct SelfUnfocus {
        log: Log,
    }

    impl Element for SelfUnfocus {
        fn on_key(&mut self, cx: &mut ElementContext<'_>, _: &Input, _: KeyboardEvent) {
            cx.un_focus();
            self.log.borrow_mut().push("handler done".into());
        }

        fn on_focus_lost(&mut self, _: &mut ElementContext<'_>) {
            self.log.borrow_mut().push("lost".into());
        }
    }

    #[test]
    fn test_focus_loss_from_own_handler_is_delivered_after_it_returns() {
        let mut tree = tree();
        let log = log();
        let input = Input::new();
        let root = tree.root();
        let e = tree
            .create_child(root, ElementAlignment::default(), SelfUnfocus { log: Rc::clone(&log) })
            .unwrap();
        tree.focus_on(e);

        tree.send_key(e, &input, KeyboardEvent::new(Key::Escape, KeyAction::Press));

        assert_eq!(tree.focused(), None);
        assert_eq!(*log.borrow(), vec!["handler done", "lost"]);
    }

    #[test]
    fn test_typed_access() {
        let mut tree = tree();
        let log = log();
        let root = tree.root();
        let p = tree.create_child(root, ElementAlignment::default(), Probe::new("p", &log)).unwrap();

        assert!(tree.get::<Probe>(p).is_some());
        assert!(tree.get::<Container>(p).is_none());
        assert!(tree.get::<Container>(root).is_some());
        assert_eq!(tree.with_element::<Probe, _>(p, |probe, cx| (probe.name, cx.id())), Some(("p", p)));
    }
}
