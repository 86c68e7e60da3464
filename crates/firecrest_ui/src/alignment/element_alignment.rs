//! The four alignment functions of one element.

use super::Align;
use crate::tree::ElementTree;
use firecrest_core::Vec2;

/// Position and size functions of an element.
///
/// The default fills the parent: origin at the parent's origin, width and
/// height equal to the parent's.
#[derive(Debug, Clone)]
pub struct ElementAlignment {
    /// Left edge, evaluated as `f(parent_width, parent_height)`.
    pub x: Align,
    /// Bottom edge, evaluated as `f(parent_height, parent_width)`.
    pub y: Align,
    /// Width, evaluated as `f(parent_width, parent_height)`.
    pub width: Align,
    /// Height, evaluated as `f(parent_height, parent_width)`.
    pub height: Align,
}

impl Default for ElementAlignment {
    fn default() -> Self {
        Self {
            x: Align::Pixels(0.0),
            y: Align::Pixels(0.0),
            width: Align::Relative(1.0),
            height: Align::Relative(1.0),
        }
    }
}

impl ElementAlignment {
    /// Creates an alignment from four functions.
    #[must_use]
    pub fn new(
        x: impl Into<Align>,
        y: impl Into<Align>,
        width: impl Into<Align>,
        height: impl Into<Align>,
    ) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            width: width.into(),
            height: height.into(),
        }
    }

    /// A fixed pixel rectangle.
    #[must_use]
    pub fn fixed(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, width, height)
    }

    /// Replaces the x function.
    #[must_use]
    pub fn with_x(mut self, x: impl Into<Align>) -> Self {
        self.x = x.into();
        self
    }

    /// Replaces the y function.
    #[must_use]
    pub fn with_y(mut self, y: impl Into<Align>) -> Self {
        self.y = y.into();
        self
    }

    /// Replaces the width function.
    #[must_use]
    pub fn with_width(mut self, width: impl Into<Align>) -> Self {
        self.width = width.into();
        self
    }

    /// Replaces the height function.
    #[must_use]
    pub fn with_height(mut self, height: impl Into<Align>) -> Self {
        self.height = height.into();
        self
    }

    /// Returns the function stored in `slot`.
    #[must_use]
    pub fn get(&self, slot: super::Slot) -> &Align {
        match slot {
            super::Slot::X => &self.x,
            super::Slot::Y => &self.y,
            super::Slot::Width => &self.width,
            super::Slot::Height => &self.height,
        }
    }

    /// Returns the function stored in `slot`, mutably.
    pub fn get_mut(&mut self, slot: super::Slot) -> &mut Align {
        match slot {
            super::Slot::X => &mut self.x,
            super::Slot::Y => &mut self.y,
            super::Slot::Width => &mut self.width,
            super::Slot::Height => &mut self.height,
        }
    }

    /// Position relative to a parent of the given size.
    #[must_use]
    pub fn pixel_position(&self, tree: &ElementTree, parent: Vec2) -> Vec2 {
        Vec2::new(
            self.x.eval(tree, parent.x, parent.y),
            self.y.eval(tree, parent.y, parent.x),
        )
    }

    /// Size inside a parent of the given size.
    #[must_use]
    pub fn pixel_size(&self, tree: &ElementTree, parent: Vec2) -> Vec2 {
        Vec2::new(
            self.width.eval(tree, parent.x, parent.y),
            self.height.eval(tree, parent.y, parent.x),
        )
    }
}
