//! Scrolling.
//!
//! Scrolling content is a top-to-bottom stack whose first child is an
//! invisible [`Spacer`] with height equal to the scroll offset. The offset is
//! never positive: at 0 the first real child touches the top edge, and more
//! negative offsets pull the content up past it.

use super::{Spacer, StackLayout, VerticalDirection, Layout};
use crate::alignment::{Align, ElementAlignment};
use crate::config::ScrollConfig;
use crate::element::{Element, ElementContext, ElementId};
use crate::events::ScrollEvent;
use crate::input::Input;
use crate::render::{Frame, RenderCommand};
use crate::tree::ElementTree;
use firecrest_core::{map, Rect};

/// Scroll offset bookkeeping for a top-to-bottom stack.
///
/// Embedded by elements that scroll their own children, such as
/// [`Scrollable`] and [`TextInput`](crate::widget::TextInput).
#[derive(Debug, Clone)]
pub struct ScrollState {
    offset: f32,
    spacer: Option<ElementId>,
    sticking_to_bottom: bool,
    config: ScrollConfig,
}

impl ScrollState {
    /// Creates a state at the top of the content.
    #[must_use]
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            offset: 0.0,
            spacer: None,
            sticking_to_bottom: false,
            config,
        }
    }

    /// Inserts the offset spacer as the first child of the calling element.
    /// Call from [`Element::created`], before any other child exists.
    pub fn attach(&mut self, cx: &mut ElementContext<'_>) {
        match cx.create_child(ElementAlignment::default().with_height(0.0), Spacer) {
            Ok(spacer) => self.spacer = Some(spacer),
            Err(e) => tracing::warn!("cannot attach scroll spacer to {:?}: {}", cx.id(), e),
        }
    }

    /// Current offset, 0 at the top and negative below it.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Whether the content follows its bottom edge as it grows.
    #[inline]
    #[must_use]
    pub fn is_sticking_to_bottom(&self) -> bool {
        self.sticking_to_bottom
    }

    /// Scrolling configuration.
    #[must_use]
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Total height of the children of `container`, spacer excluded.
    #[must_use]
    pub fn content_height(&self, tree: &ElementTree, container: ElementId) -> f32 {
        tree.children(container)
            .iter()
            .filter(|&&child| Some(child) != self.spacer)
            .map(|&child| tree.pixel_size(child).y)
            .sum()
    }

    /// Lowest offset that still keeps the viewport covered.
    fn min_offset(&self, cx: &ElementContext<'_>) -> f32 {
        (cx.pixel_size().y - self.content_height(cx.tree(), cx.id())).min(0.0)
    }

    /// Scrolls by wheel units; positive scrolls towards the top.
    pub fn scroll(&mut self, cx: &mut ElementContext<'_>, units: f32) {
        self.scroll_by_pixels(cx, units * self.config.speed);
    }

    /// Scrolls by raw pixels; positive scrolls towards the top.
    ///
    /// Scrolling up releases the bottom; reaching the bottom sticks to it.
    pub fn scroll_by_pixels(&mut self, cx: &mut ElementContext<'_>, pixels: f32) {
        self.offset += pixels;

        let bottom = cx.pixel_size().y - self.content_height(cx.tree(), cx.id());
        if self.sticking_to_bottom && pixels > 0.0 {
            self.sticking_to_bottom = false;
        } else if bottom >= self.offset {
            self.sticking_to_bottom = true;
        }

        if self.config.clamp {
            self.offset = self.offset.max(bottom.min(0.0)).min(0.0);
        }
        self.sync_spacer(cx);
    }

    /// Jumps to the top and stops following the bottom.
    pub fn go_to_top(&mut self, cx: &mut ElementContext<'_>) {
        self.offset = 0.0;
        self.sticking_to_bottom = false;
        self.sync_spacer(cx);
    }

    /// Jumps to the bottom and keeps following it.
    pub fn go_to_bottom(&mut self, cx: &mut ElementContext<'_>) {
        self.offset = self.min_offset(cx);
        self.sticking_to_bottom = true;
        self.sync_spacer(cx);
    }

    fn sync_spacer(&self, cx: &mut ElementContext<'_>) {
        let Some(spacer) = self.spacer else {
            return;
        };
        if let Some(alignment) = cx.tree_mut().alignment_mut(spacer) {
            alignment.height = Align::Pixels(self.offset);
        }
    }

    /// Draws the scrollbar thumb along the right edge. Nothing is drawn
    /// while the content fits.
    pub fn render_scrollbar(&self, cx: &ElementContext<'_>, frame: &mut Frame<'_>) {
        let rect = cx.pixel_rect();
        let total = self.content_height(cx.tree(), cx.id());
        if total <= rect.height {
            return;
        }

        let ScrollConfig {
            scrollbar_width: width,
            scrollbar_padding: padding,
            scrollbar_min_height: min_height,
            scrollbar_color: color,
            ..
        } = self.config;

        let visual = rect.height - padding / 2.0;
        let height = (visual * visual / total).max(min_height).min(visual);
        let min_offset = self.min_offset(cx);
        let y = if min_offset < 0.0 {
            map(self.offset, min_offset, 0.0, 0.0, visual - height)
        } else {
            visual - height
        };

        frame.push(RenderCommand::Rect {
            bounds: Rect::new(
                rect.right() - width - padding,
                rect.y + padding / 2.0 + y,
                width,
                height,
            ),
            color,
            corner_radius: width / 2.0,
        });
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

/// A clipped column of children that scrolls with the wheel.
#[derive(Debug, Clone, Default)]
pub struct Scrollable {
    state: ScrollState,
}

impl Scrollable {
    /// Creates a scrollable column.
    #[must_use]
    pub fn new(config: ScrollConfig) -> Self {
        Self { state: ScrollState::new(config) }
    }

    /// Scroll bookkeeping.
    #[must_use]
    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    /// Scroll bookkeeping, for use with
    /// [`ElementTree::with_element`](crate::tree::ElementTree::with_element).
    pub fn state_mut(&mut self) -> &mut ScrollState {
        &mut self.state
    }
}

impl Element for Scrollable {
    fn layout(&self) -> Option<Box<dyn Layout>> {
        Some(Box::new(StackLayout::vertical(VerticalDirection::TopToBottom, 0.0)))
    }

    fn created(&mut self, cx: &mut ElementContext<'_>) {
        self.state.attach(cx);
    }

    fn render(&mut self, cx: &mut ElementContext<'_>, frame: &mut Frame<'_>) {
        if self.state.is_sticking_to_bottom() {
            self.state.go_to_bottom(cx);
        }
        frame.renderer.push_clip(cx.pixel_rect());
        cx.render_children(frame);
        if self.state.config().clamp {
            self.state.render_scrollbar(cx, frame);
        }
        frame.renderer.pop_clip();
    }

    fn on_scroll(&mut self, cx: &mut ElementContext<'_>, _input: &Input, event: ScrollEvent) {
        self.state.scroll(cx, event.offset.y);
    }
}
