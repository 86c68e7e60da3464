//! Layout system for child positioning.
//!
//! A container's [`Layout`] is the parent side of the resolution protocol:
//! a child's pixel position and size are always computed by its parent's
//! layout from the child's alignment record. Specialised layouts install
//! [`Align::Layout`](crate::alignment::Align::Layout) functions on their
//! children (and sometimes on the container itself) and evaluate them in
//! [`Layout::resolve`].
//!
//! | Element                 | Layout          | Installs                         |
//! |-------------------------|-----------------|----------------------------------|
//! | `Container`             | [`FreeLayout`]  | nothing                          |
//! | `HorizontalPositioning` | [`StackLayout`] | child x                          |
//! | `VerticalPositioning`   | [`StackLayout`] | child y                          |
//! | `VerticalContainer`     | [`StackLayout`] | child y, flexible child height   |
//! | `HorizontalCenterer`    | [`CenterLayout`]| child x, own height              |
//! | `VerticalCenterer`      | [`CenterLayout`]| child y, own width               |
//! | `Scrollable`            | [`StackLayout`] | child y, spacer height = offset  |
//! | `TextBox`               | [`ContentLayout`]| nothing; sizes against its parent |

mod center;
mod scroll;
mod stack;

pub use center::{CenterLayout, HorizontalCenterer, VerticalCenterer};
pub use scroll::{ScrollState, Scrollable};
pub use stack::{
    HorizontalDirection, HorizontalPositioning, StackLayout, VerticalContainer,
    VerticalDirection, VerticalPositioning,
};

use crate::alignment::{ElementAlignment, Slot};
use crate::element::{AsAny, Element, ElementId};
use crate::tree::ElementTree;
use firecrest_core::Vec2;

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Along x.
    Horizontal,
    /// Along y.
    Vertical,
}

impl Axis {
    /// Position slot along this axis.
    #[must_use]
    pub const fn position_slot(self) -> Slot {
        match self {
            Self::Horizontal => Slot::X,
            Self::Vertical => Slot::Y,
        }
    }

    /// Extent slot along this axis.
    #[must_use]
    pub const fn extent_slot(self) -> Slot {
        match self {
            Self::Horizontal => Slot::Width,
            Self::Vertical => Slot::Height,
        }
    }

    /// Component of `v` along this axis.
    #[must_use]
    pub const fn of(self, v: Vec2) -> f32 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }
}

/// Parent-side geometry contract of a container.
pub trait Layout: AsAny {
    /// Runs once when the container itself is inserted.
    fn attached(&mut self, _container: ElementId, _alignment: &mut ElementAlignment) {}

    /// Runs once right after a child is inserted.
    fn child_created(
        &mut self,
        _container: ElementId,
        _child: ElementId,
        _alignment: &mut ElementAlignment,
    ) {
    }

    /// Evaluates an installed [`Align::Layout`](crate::alignment::Align::Layout)
    /// function for `subject`.
    #[allow(clippy::too_many_arguments)]
    fn resolve(
        &self,
        _tree: &ElementTree,
        _container: ElementId,
        _subject: ElementId,
        _slot: Slot,
        _p1: f32,
        _p2: f32,
    ) -> f32 {
        0.0
    }

    /// Window position of a child with the given alignment.
    fn child_pixel_position(
        &self,
        tree: &ElementTree,
        container: ElementId,
        alignment: &ElementAlignment,
    ) -> Vec2 {
        tree.pixel_position(container) + alignment.pixel_position(tree, tree.pixel_size(container))
    }

    /// Size of a child with the given alignment.
    fn child_pixel_size(
        &self,
        tree: &ElementTree,
        container: ElementId,
        alignment: &ElementAlignment,
    ) -> Vec2 {
        alignment.pixel_size(tree, tree.pixel_size(container))
    }
}

/// Children are placed by their own alignment relative to the container.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeLayout;

impl Layout for FreeLayout {}

/// Children are placed inside the container but sized against the
/// container's parent, so the container can mirror a child's size.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentLayout;

impl Layout for ContentLayout {
    fn child_pixel_size(
        &self,
        tree: &ElementTree,
        container: ElementId,
        alignment: &ElementAlignment,
    ) -> Vec2 {
        alignment.pixel_size(tree, tree.parent_pixel_size(container))
    }
}

/// An invisible leaf that only takes up room.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spacer;

impl Element for Spacer {}
