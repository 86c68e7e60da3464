//! Line graphs.

use super::ColoredRect;
use crate::alignment::{Align, ElementAlignment};
use crate::config::GraphConfig;
use crate::element::{Element, ElementContext, ElementId};
use crate::layout::{FreeLayout, HorizontalCenterer, Layout};
use crate::render::{Frame, RenderCommand};
use crate::text::{FontMetrics, Text, WrapMode};
use firecrest_core::{map, Vec2};
use std::rc::Rc;

const NO_DATA: &str = "Min: N/A Max: N/A";

/// A bare polyline over a grid.
///
/// Points must be sorted by ascending x: the first and last point give the
/// horizontal range.
#[derive(Debug, Clone)]
pub struct PlainGraph {
    data: Vec<Vec2>,
    y_bounds: Option<(f32, f32)>,
    draw_grid: bool,
    config: GraphConfig,
}

impl PlainGraph {
    /// An empty graph.
    #[must_use]
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            data: Vec::new(),
            y_bounds: None,
            draw_grid: true,
            config: config.clone(),
        }
    }

    /// Current points.
    #[must_use]
    pub fn data(&self) -> &[Vec2] {
        &self.data
    }

    /// Replaces the points.
    pub fn set_data(&mut self, data: Vec<Vec2>) {
        self.data = data;
    }

    /// Fixes the vertical range. Equal bounds switch back to fitting the
    /// data.
    pub fn set_y_bounds(&mut self, min: f32, max: f32) {
        #[allow(clippy::float_cmp)]
        let auto = min == max;
        self.y_bounds = if auto { None } else { Some((min, max)) };
    }

    /// Fixed vertical range, if any.
    #[must_use]
    pub fn y_bounds(&self) -> Option<(f32, f32)> {
        self.y_bounds
    }

    /// Turns the grid on or off.
    pub fn set_draw_grid(&mut self, draw_grid: bool) {
        self.draw_grid = draw_grid;
    }

    fn data_y_range(&self) -> (f32, f32) {
        self.y_bounds.unwrap_or_else(|| y_range(&self.data))
    }
}

/// Smallest and largest y.
fn y_range(data: &[Vec2]) -> (f32, f32) {
    data.iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(low, high), p| (low.min(p.y), high.max(p.y)))
}

/// Multiples of the largest power of ten below `max - min`, strictly inside
/// the range. Empty for a degenerate range.
#[allow(clippy::cast_possible_truncation)]
fn grid_lines(min: f32, max: f32) -> Vec<f32> {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return Vec::new();
    }

    let interval = 10.0_f32.powi(span.log10().floor() as i32);
    let mut at = min + interval;
    at -= at % interval;

    let mut lines = Vec::new();
    while at < max {
        lines.push(at);
        at += interval;
    }
    lines
}

impl Element for PlainGraph {
    fn render(&mut self, cx: &mut ElementContext<'_>, frame: &mut Frame<'_>) {
        let (Some(first), Some(last)) = (self.data.first(), self.data.last()) else {
            return;
        };
        let (min_x, max_x) = (first.x, last.x);
        let (min_y, max_y) = self.data_y_range();

        let rect = cx.pixel_rect();
        let to_screen = |p: Vec2| {
            Vec2::new(
                map(p.x, min_x, max_x, rect.x, rect.right()),
                map(p.y, min_y, max_y, rect.y, rect.top()),
            )
        };

        if self.draw_grid {
            let grid = self.config.grid_color;
            for x in grid_lines(min_x, max_x) {
                let x = map(x, min_x, max_x, rect.x, rect.right());
                frame.push(RenderCommand::Line {
                    from: Vec2::new(x, rect.y),
                    to: Vec2::new(x, rect.top()),
                    color: grid,
                    width: 1.0,
                });
            }
            for y in grid_lines(min_y, max_y) {
                let y = map(y, min_y, max_y, rect.y, rect.top());
                frame.push(RenderCommand::Line {
                    from: Vec2::new(rect.x, y),
                    to: Vec2::new(rect.right(), y),
                    color: grid,
                    width: 1.0,
                });
            }
        }

        frame.push(RenderCommand::LineStrip {
            points: self.data.iter().copied().map(to_screen).collect(),
            color: self.config.line_color,
            width: self.config.line_width,
        });
    }
}

/// A graph panel: background, plot and a centred min/max caption along
/// the bottom edge. The plot takes the height the caption leaves.
pub struct Graph {
    pending_label: Option<Text>,
    config: GraphConfig,
    background: Option<ElementId>,
    plot: Option<ElementId>,
    caption: Option<ElementId>,
    label: Option<ElementId>,
}

impl Graph {
    /// Creates an empty graph whose caption uses `font` at `size`.
    #[must_use]
    pub fn new(font: Rc<dyn FontMetrics>, size: f32, config: &GraphConfig) -> Self {
        let label = Text::new(font, size)
            .with_text(NO_DATA)
            .with_wrap_mode(WrapMode::NoWrap)
            .wrap_tightly(true);
        Self {
            pending_label: Some(label),
            config: config.clone(),
            background: None,
            plot: None,
            caption: None,
            label: None,
        }
    }

    /// The plot element.
    #[must_use]
    pub fn plot_id(&self) -> Option<ElementId> {
        self.plot
    }

    /// The caption text element.
    #[must_use]
    pub fn label_id(&self) -> Option<ElementId> {
        self.label
    }

    /// Replaces the points and updates the caption.
    pub fn set_data(&mut self, cx: &mut ElementContext<'_>, data: Vec<Vec2>) {
        let caption = if data.is_empty() {
            NO_DATA.to_owned()
        } else {
            let (min, max) = y_range(&data);
            format!("Min: {min:.2} Max: {max:.2}")
        };

        let tree = cx.tree_mut();
        if let Some(plot) = self.plot.and_then(|id| tree.get_mut::<PlainGraph>(id)) {
            plot.set_data(data);
        }
        if let Some(label) = self.label {
            tree.with_element::<Text, _>(label, |t, cx| t.set_text(cx, caption));
        }
    }

    /// Fixes the plot's vertical range; see [`PlainGraph::set_y_bounds`].
    pub fn set_y_bounds(&mut self, cx: &mut ElementContext<'_>, min: f32, max: f32) {
        if let Some(plot) = self.plot.and_then(|id| cx.tree_mut().get_mut::<PlainGraph>(id)) {
            plot.set_y_bounds(min, max);
        }
    }

    fn build(&mut self, cx: &mut ElementContext<'_>, label: Text) -> crate::error::UiResult<()> {
        let background = cx.create_child(ElementAlignment::default(), ColoredRect::new(self.config.background))?;
        let caption = cx.create_child(ElementAlignment::default(), HorizontalCenterer)?;
        let label = cx.tree_mut().create_child(caption, ElementAlignment::default(), label)?;
        let plot = cx.create_child(
            ElementAlignment::default()
                .with_y(Align::mirror_height(label))
                .with_height(Align::relative(1.0) - Align::mirror_height(label)),
            PlainGraph::new(&self.config),
        )?;

        self.background = Some(background);
        self.caption = Some(caption);
        self.label = Some(label);
        self.plot = Some(plot);
        Ok(())
    }
}

impl Element for Graph {
    fn layout(&self) -> Option<Box<dyn Layout>> {
        Some(Box::new(FreeLayout))
    }

    fn created(&mut self, cx: &mut ElementContext<'_>) {
        if let Some(label) = self.pending_label.take() {
            if let Err(e) = self.build(cx, label) {
                tracing::warn!("cannot build graph {:?}: {}", cx.id(), e);
            }
        }
    }

    fn render(&mut self, cx: &mut ElementContext<'_>, frame: &mut Frame<'_>) {
        for child in [self.background, self.plot, self.caption].into_iter().flatten() {
            cx.render_child(child, frame);
        }
    }
}
