//! Filled rectangles.

use crate::element::{Element, ElementContext};
use crate::render::{Frame, RenderCommand};
use firecrest_core::Color;

/// A filled, optionally rounded rectangle covering the element's box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredRect {
    /// Fill color.
    pub color: Color,
    /// Corner radius; 0 for square corners.
    pub corner_radius: f32,
}

impl ColoredRect {
    /// A square-cornered fill.
    #[must_use]
    pub const fn new(color: Color) -> Self {
        Self { color, corner_radius: 0.0 }
    }

    /// A rounded fill.
    #[must_use]
    pub const fn rounded(color: Color, corner_radius: f32) -> Self {
        Self { color, corner_radius }
    }
}

impl Element for ColoredRect {
    fn render(&mut self, cx: &mut ElementContext<'_>, frame: &mut Frame<'_>) {
        frame.push(RenderCommand::Rect {
            bounds: cx.pixel_rect(),
            color: self.color,
            corner_radius: self.corner_radius,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::ElementAlignment;
    use crate::render::UIRenderer;
    use crate::tree::ElementTree;
    use firecrest_core::{Rect, Vec2};
    use std::time::Duration;

    #[test]
    fn test_fills_its_box() {
        let mut tree = ElementTree::new(Vec2::new(100.0, 100.0));
        let root = tree.root();
        tree.create_child(root, ElementAlignment::fixed(10.0, 20.0, 30.0, 40.0), ColoredRect::rounded(Color::RED, 4.0))
            .unwrap();

        let mut renderer = UIRenderer::new();
        renderer.begin_frame();
        tree.render(root, &mut Frame::new(&mut renderer, Duration::ZERO));

        assert_eq!(
            renderer.commands(),
            &[RenderCommand::Rect {
                bounds: Rect::new(10.0, 20.0, 30.0, 40.0),
                color: Color::RED,
                corner_radius: 4.0,
            }]
        );
    }
}
