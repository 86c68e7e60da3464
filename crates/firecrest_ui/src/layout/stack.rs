//! Stacking layouts.
//!
//! A stack places each child right after the children before it, skipping
//! the spacing after children with no extent. Offsets are re-summed on every
//! query, so resizing or removing a child reflows its later siblings.

use super::{Axis, Layout};
use crate::alignment::{Align, ElementAlignment, Slot};
use crate::element::{Element, ElementId};
use crate::error::{UiError, UiResult};
use crate::tree::ElementTree;

/// Horizontal stacking direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalDirection {
    /// First child at the left edge.
    #[default]
    LeftToRight,
    /// First child at the right edge.
    RightToLeft,
}

/// Vertical stacking direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalDirection {
    /// First child at the top edge.
    #[default]
    TopToBottom,
    /// First child at the bottom edge.
    BottomToTop,
}

/// Places children one after another along an axis.
#[derive(Debug, Clone)]
pub struct StackLayout {
    axis: Axis,
    /// Accumulate from the far edge (right or top) instead of the origin.
    from_far_edge: bool,
    /// Gap after every child with a positive extent.
    pub spacing: f32,
    flexible: Vec<ElementId>,
}

impl StackLayout {
    /// A left-to-right or right-to-left row.
    #[must_use]
    pub fn horizontal(direction: HorizontalDirection, spacing: f32) -> Self {
        Self {
            axis: Axis::Horizontal,
            from_far_edge: direction == HorizontalDirection::RightToLeft,
            spacing,
            flexible: Vec::new(),
        }
    }

    /// A top-to-bottom or bottom-to-top column.
    #[must_use]
    pub fn vertical(direction: VerticalDirection, spacing: f32) -> Self {
        Self {
            axis: Axis::Vertical,
            from_far_edge: direction == VerticalDirection::TopToBottom,
            spacing,
            flexible: Vec::new(),
        }
    }

    /// Stacking axis.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Children that share the room left over by the others.
    #[must_use]
    pub fn flexible_children(&self) -> &[ElementId] {
        &self.flexible
    }

    /// Makes `children` of `container` share the room left over by its
    /// other children equally.
    ///
    /// # Errors
    ///
    /// [`UiError::NotAContainer`] if `container` is not a stack and
    /// [`UiError::ElementNotFound`] if one of `children` is not its child.
    pub fn set_flexible_children(
        tree: &mut ElementTree,
        container: ElementId,
        children: &[ElementId],
    ) -> UiResult<()> {
        if let Some(&stranger) = children.iter().find(|&&c| tree.parent(c) != Some(container)) {
            return Err(UiError::ElementNotFound(stranger));
        }
        let layout = tree
            .layout_mut::<Self>(container)
            .ok_or(UiError::NotAContainer(container))?;
        layout.flexible = children.to_vec();
        let slot = layout.axis.extent_slot();

        for &child in children {
            if let Some(alignment) = tree.alignment_mut(child) {
                *alignment.get_mut(slot) = Align::Layout { container, subject: child, slot };
            }
        }
        Ok(())
    }

    fn extent(&self, tree: &ElementTree, id: ElementId) -> f32 {
        self.axis.of(tree.pixel_size(id))
    }

    fn spaced(&self, extent: f32) -> f32 {
        if extent > 0.0 {
            extent + self.spacing
        } else {
            extent
        }
    }

    /// Extent taken by the children before `subject`, spacing included.
    fn offset_before(&self, tree: &ElementTree, container: ElementId, subject: ElementId) -> f32 {
        tree.children(container)
            .iter()
            .take_while(|&&child| child != subject)
            .map(|&child| self.spaced(self.extent(tree, child)))
            .sum()
    }

    #[allow(clippy::cast_precision_loss)]
    fn flexible_extent(&self, tree: &ElementTree, container: ElementId, p1: f32) -> f32 {
        if self.flexible.is_empty() {
            return 0.0;
        }
        let fixed: f32 = tree
            .children(container)
            .iter()
            .filter(|&&child| !self.flexible.contains(&child))
            .map(|&child| self.spaced(self.extent(tree, child)))
            .sum();
        (p1 - fixed) / self.flexible.len() as f32
    }
}

impl Layout for StackLayout {
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
        _p2: f32,
    ) -> f32 {
        if slot == self.axis.position_slot() {
            let offset = self.offset_before(tree, container, subject);
            if self.from_far_edge {
                p1 - offset - self.extent(tree, subject)
            } else {
                offset
            }
        } else if slot == self.axis.extent_slot() {
            self.flexible_extent(tree, container, p1)
        } else {
            0.0
        }
    }
}

/// A row of children.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalPositioning {
    /// Which edge the first child sits at.
    pub direction: HorizontalDirection,
    /// Gap between children.
    pub spacing: f32,
}

impl HorizontalPositioning {
    /// Creates a row.
    #[must_use]
    pub fn new(direction: HorizontalDirection, spacing: f32) -> Self {
        Self { direction, spacing }
    }
}

impl Element for HorizontalPositioning {
    fn layout(&self) -> Option<Box<dyn Layout>> {
        Some(Box::new(StackLayout::horizontal(self.direction, self.spacing)))
    }
}

/// A column of children.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalPositioning {
    /// Which edge the first child sits at.
    pub direction: VerticalDirection,
    /// Gap between children.
    pub spacing: f32,
}

impl VerticalPositioning {
    /// Creates a column.
    #[must_use]
    pub fn new(direction: VerticalDirection, spacing: f32) -> Self {
        Self { direction, spacing }
    }
}

impl Element for VerticalPositioning {
    fn layout(&self) -> Option<Box<dyn Layout>> {
        Some(Box::new(StackLayout::vertical(self.direction, self.spacing)))
    }
}

/// A top-to-bottom column whose flexible children fill the leftover height.
///
/// See [`StackLayout::set_flexible_children`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalContainer {
    /// Gap between children.
    pub spacing: f32,
}

impl VerticalContainer {
    /// Creates a column.
    #[must_use]
    pub fn new(spacing: f32) -> Self {
        Self { spacing }
    }
}

impl Element for VerticalContainer {
    fn layout(&self) -> Option<Box<dyn Layout>> {
        Some(Box::new(StackLayout::vertical(VerticalDirection::TopToBottom, self.spacing)))
    }
}
