//! Centering layouts.
//!
//! A centerer sizes itself to its content along the centering-free axis and
//! centers every child along the other one. Children size themselves
//! against the centerer's *parent*, so a centerer is transparent to the
//! sizes of what it holds.

use super::{Axis, Layout};
use crate::alignment::{Align, ElementAlignment, Slot};
use crate::element::{Element, ElementId};
use crate::tree::ElementTree;
use firecrest_core::Vec2;

/// Centers children along one axis.
#[derive(Debug, Clone, Copy)]
pub struct CenterLayout {
    axis: Axis,
}

impl CenterLayout {
    /// Centers children along `axis`.
    #[must_use]
    pub const fn new(axis: Axis) -> Self {
        Self { axis }
    }

    /// The other axis, along which the container hugs its content.
    const fn content_axis(self) -> Axis {
        match self.axis {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Span of the children along the content axis, evaluated with the
    /// container's own arguments.
    fn content_extent(&self, tree: &ElementTree, container: ElementId, p1: f32, p2: f32) -> f32 {
        let axis = self.content_axis();
        let (low, high) = tree
            .children(container)
            .iter()
            .filter_map(|&child| tree.alignment(child))
            .map(|alignment| {
                let start = alignment.get(axis.position_slot()).eval(tree, p1, p2);
                let extent = alignment.get(axis.extent_slot()).eval(tree, p1, p2);
                (start, start + extent)
            })
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(low, high), (start, end)| {
                (low.min(start), high.max(end))
            });

        if low.is_finite() {
            high - low
        } else {
            0.0
        }
    }
}

impl Layout for CenterLayout {
    fn attached(&mut self, container: ElementId, alignment: &mut ElementAlignment) {
        let slot = self.content_axis().extent_slot();
        *alignment.get_mut(slot) = Align::Layout { container, subject: container, slot };
    }

    fn child_created(
        &mut self,
        container: ElementId,
        child: ElementId,
        alignment: &mut ElementAlignment,
    ) {
        let slot = self.axis.position_slot();
        *alignment.get_mut(slot) = Align::Layout { container, subject: child, slot };
    }

    fn resolve(
        &self,
        tree: &ElementTree,
        container: ElementId,
        subject: ElementId,
        slot: Slot,
        p1: f32,
        p2: f32,
    ) -> f32 {
        if subject == container {
            if slot == self.content_axis().extent_slot() {
                return self.content_extent(tree, container, p1, p2);
            }
        } else if slot == self.axis.position_slot() {
            return (p1 - self.axis.of(tree.pixel_size(subject))) * 0.5;
        }
        0.0
    }

    fn child_pixel_size(
        &self,
        tree: &ElementTree,
        container: ElementId,
        alignment: &ElementAlignment,
    ) -> Vec2 {
        alignment.pixel_size(tree, tree.parent_pixel_size(container))
    }
}

/// Centers its children horizontally; its height hugs the content.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalCenterer;

impl Element for HorizontalCenterer {
    fn layout(&self) -> Option<Box<dyn Layout>> {
        Some(Box::new(CenterLayout::new(Axis::Horizontal)))
    }
}

/// Centers its children vertically; its width hugs the content.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalCenterer;

impl Element for VerticalCenterer {
    fn layout(&self) -> Option<Box<dyn Layout>> {
        Some(Box::new(CenterLayout::new(Axis::Vertical)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Container;
    use firecrest_core::Rect;

    #[test]
    fn test_horizontal_centerer() {
        let mut tree = ElementTree::new(Vec2::new(200.0, 100.0));
        let root = tree.root();
        let centerer = tree
            .create_child(root, ElementAlignment::default().with_y(10.0), HorizontalCenterer)
            .unwrap();
        let child = tree
            .create_child(centerer, ElementAlignment::default().with_width(50.0).with_height(30.0), Container)
            .unwrap();

        // Own height hugs the child; width stays the default fill.
        assert_eq!(tree.pixel_rect(centerer), Rect::new(0.0, 10.0, 200.0, 30.0));
        assert_eq!(tree.pixel_rect(child), Rect::new(75.0, 10.0, 50.0, 30.0));
    }

    #[test]
    fn test_child_sizes_resolve_against_centerer_parent() {
        let mut tree = ElementTree::new(Vec2::new(200.0, 100.0));
        let root = tree.root();
        let centerer = tree.create_child(root, ElementAlignment::default(), HorizontalCenterer).unwrap();
        let child = tree
            .create_child(
                centerer,
                ElementAlignment::default()
                    .with_width(Align::relative(0.5))
                    .with_height(Align::relative(0.2)),
                Container,
            )
            .unwrap();

        // 20% of the root height, not of the (content-sized) centerer.
        assert_eq!(tree.pixel_size(child), Vec2::new(100.0, 20.0));
        assert_eq!(tree.pixel_size(centerer).y, 20.0);
        assert_eq!(tree.pixel_position(child).x, 50.0);
    }

    #[test]
    fn test_vertical_centerer_and_content_span() {
        let mut tree = ElementTree::new(Vec2::new(200.0, 100.0));
        let root = tree.root();
        let centerer = tree.create_child(root, ElementAlignment::default(), VerticalCenterer).unwrap();
        let a = tree
            .create_child(centerer, ElementAlignment::fixed(10.0, 0.0, 20.0, 40.0), Container)
            .unwrap();
        let _b = tree
            .create_child(centerer, ElementAlignment::fixed(40.0, 0.0, 30.0, 10.0), Container)
            .unwrap();

        // Span from x=10 to x=70.
        assert_eq!(tree.pixel_size(centerer), Vec2::new(60.0, 100.0));
        assert_eq!(tree.pixel_position(a), Vec2::new(10.0, 30.0));
    }

    #[test]
    fn test_empty_centerer_has_no_extent() {
        let mut tree = ElementTree::new(Vec2::new(200.0, 100.0));
        let root = tree.root();
        let centerer = tree.create_child(root, ElementAlignment::default(), HorizontalCenterer).unwrap();
        assert_eq!(tree.pixel_size(centerer).y, 0.0);
    }
}
