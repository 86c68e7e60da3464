//! The text element and its line cache.
//!
//! A [`Text`] keeps the wrapped lines of its content between frames. The
//! cache is rebuilt, from scratch, when any of the text, size, color, wrap
//! mode or tight flag was assigned a different value, or when the width it
//! was wrapped against changed.
//!
//! Line offsets are stored top-down: line `i` has its baseline at
//! `-(i + 1) * line_height` below the top edge of the box, so they stay
//! valid however tall the box ends up.

use super::{wrap_text, FontMetrics, WrapMode};
use crate::alignment::Align;
use crate::element::{Element, ElementContext};
use crate::render::{Frame, RenderCommand};
use firecrest_core::{Color, Rect, Tracked, Vec2};
use std::rc::Rc;

/// One cached line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// The line's characters.
    pub text: String,
    /// Baseline start relative to the top-left corner of the box.
    pub offset: Vec2,
    /// Char index in the full text where the line starts.
    pub start: usize,
}

/// A block of text.
///
/// Flexible text keeps the box its alignment gives it and wraps and clips
/// inside. Tight text shrinks its box to the wrapped content: the width
/// becomes the widest line when nothing had to be broken, and the height
/// becomes `line_height * lines - descender`.
pub struct Text {
    font: Rc<dyn FontMetrics>,
    text: Tracked<String>,
    size: Tracked<f32>,
    color: Tracked<Color>,
    wrap_mode: Tracked<WrapMode>,
    wrap_tightly: Tracked<bool>,
    default_width: Align,
    default_height: Align,
    lines: Vec<TextLine>,
    built_for_width: Option<f32>,
}

impl Text {
    /// Empty text at `size`.
    #[must_use]
    pub fn new(font: Rc<dyn FontMetrics>, size: f32) -> Self {
        Self {
            font,
            text: Tracked::new(String::new()),
            size: Tracked::new(size),
            color: Tracked::new(Color::WHITE),
            wrap_mode: Tracked::new(WrapMode::Wrap),
            wrap_tightly: Tracked::new(false),
            default_width: Align::Relative(1.0),
            default_height: Align::Relative(1.0),
            lines: Vec::new(),
            built_for_width: None,
        }
    }

    /// Sets the initial content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text.set(text.into());
        self
    }

    /// Sets the initial color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color.set(color);
        self
    }

    /// Sets the initial wrap mode.
    #[must_use]
    pub fn with_wrap_mode(mut self, mode: WrapMode) -> Self {
        self.wrap_mode.set(mode);
        self
    }

    /// Shrinks the box to the content.
    #[must_use]
    pub fn wrap_tightly(mut self, tight: bool) -> Self {
        self.wrap_tightly.set(tight);
        self
    }

    /// Current content.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.get()
    }

    /// Font size.
    #[must_use]
    pub fn size(&self) -> f32 {
        *self.size.get()
    }

    /// Text color.
    #[must_use]
    pub fn color(&self) -> Color {
        *self.color.get()
    }

    /// Wrap mode.
    #[must_use]
    pub fn wrap_mode(&self) -> WrapMode {
        *self.wrap_mode.get()
    }

    /// Whether the box shrinks to the content.
    #[must_use]
    pub fn is_tight(&self) -> bool {
        *self.wrap_tightly.get()
    }

    /// The measuring font.
    #[must_use]
    pub fn font(&self) -> &Rc<dyn FontMetrics> {
        &self.font
    }

    /// Distance between baselines at the current size.
    #[must_use]
    pub fn line_height(&self) -> f32 {
        self.font.line_height(self.size())
    }

    /// Replaces the content and rebuilds right away.
    pub fn set_text(&mut self, cx: &mut ElementContext<'_>, text: impl Into<String>) {
        self.text.set(text.into());
        self.refresh(cx);
    }

    /// Edits the content in place and rebuilds right away.
    pub fn update_text(&mut self, cx: &mut ElementContext<'_>, f: impl FnOnce(&mut String)) {
        self.text.update(f);
        self.refresh(cx);
    }

    /// Changes the font size; takes effect on the next refresh.
    pub fn set_size(&mut self, size: f32) {
        self.size.set(size);
    }

    /// Changes the color; takes effect on the next refresh.
    pub fn set_color(&mut self, color: Color) {
        self.color.set(color);
    }

    /// Changes the wrap mode; takes effect on the next refresh.
    pub fn set_wrap_mode(&mut self, mode: WrapMode) {
        self.wrap_mode.set(mode);
    }

    /// Changes the tight flag; takes effect on the next refresh.
    pub fn set_wrap_tightly(&mut self, tight: bool) {
        self.wrap_tightly.set(tight);
    }

    /// Whether a tracked input changed since the last build.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.text.is_modified()
            || self.size.is_modified()
            || self.color.is_modified()
            || self.wrap_mode.is_modified()
            || self.wrap_tightly.is_modified()
    }

    fn clear_dirty(&mut self) {
        self.text.take_modified();
        self.size.take_modified();
        self.color.take_modified();
        self.wrap_mode.take_modified();
        self.wrap_tightly.take_modified();
    }

    /// Cached lines with top-down offsets.
    #[must_use]
    pub fn local_lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Cached lines with absolute baseline positions inside `rect`, the
    /// element's resolved rectangle.
    pub fn lines_at(&self, rect: Rect) -> impl Iterator<Item = (&str, Vec2)> + '_ {
        let top_left = Vec2::new(rect.x, rect.top());
        self.lines
            .iter()
            .map(move |line| (line.text.as_str(), top_left + line.offset))
    }

    /// Width the content is wrapped against: the element's width under its
    /// default width function.
    fn max_width(&self, cx: &ElementContext<'_>) -> f32 {
        let mut probe = cx.alignment().cloned().unwrap_or_default();
        probe.width = self.default_width.clone();
        cx.tree().pixel_size_as(cx.id(), &probe).x
    }

    /// Rebuilds the cache if an input changed. Returns whether it did.
    pub fn refresh(&mut self, cx: &mut ElementContext<'_>) -> bool {
        let width = self.max_width(cx);
        if self.is_dirty() || self.built_for_width != Some(width) {
            self.rebuild(cx);
            true
        } else {
            false
        }
    }

    /// Rebuilds the cache unconditionally.
    #[allow(clippy::cast_precision_loss)]
    pub fn rebuild(&mut self, cx: &mut ElementContext<'_>) {
        self.clear_dirty();

        let font = Rc::clone(&self.font);
        let size = self.size();
        let max_width = self.max_width(cx);
        let wrapped = wrap_text(self.text.get(), max_width, self.wrap_mode(), |s| {
            font.advance(s, size)
        });

        let line_height = font.line_height(size);
        self.lines = wrapped
            .lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| TextLine {
                text: line.text,
                offset: Vec2::new(0.0, -((i + 1) as f32) * line_height),
                start: line.start,
            })
            .collect();

        let (width, height) = if self.is_tight() {
            let widest = self
                .lines
                .iter()
                .map(|line| font.advance(&line.text, size))
                .fold(0.0_f32, f32::max);
            let width = if !wrapped.broke && widest <= max_width {
                Align::Pixels(widest)
            } else {
                self.default_width.clone()
            };
            let height = line_height * self.lines.len() as f32 - font.descender(size);
            (width, Align::Pixels(height))
        } else {
            (self.default_width.clone(), self.default_height.clone())
        };
        cx.update_alignment(|alignment| {
            alignment.width = width;
            alignment.height = height;
        });

        self.built_for_width = Some(max_width);
        tracing::trace!("rebuilt text cache of {:?}: {} lines", cx.id(), self.lines.len());
    }
}

impl Element for Text {
    fn created(&mut self, cx: &mut ElementContext<'_>) {
        if let Some(alignment) = cx.alignment() {
            self.default_width = alignment.width.clone();
            self.default_height = alignment.height.clone();
        }
        self.rebuild(cx);
    }

    fn render(&mut self, cx: &mut ElementContext<'_>, frame: &mut Frame<'_>) {
        self.refresh(cx);
        if self.text.get().is_empty() {
            return;
        }

        let rect = cx.pixel_rect();
        frame.renderer.push_clip(rect);
        for (line, baseline) in self.lines_at(rect) {
            if baseline.y >= rect.y && baseline.y <= rect.top() {
                frame.push(RenderCommand::Text {
                    text: line.to_owned(),
                    position: baseline,
                    font_size: self.size(),
                    color: self.color(),
                });
            }
        }
        frame.renderer.pop_clip();
    }
}
