//! The composable alignment function.

use crate::element::ElementId;
use crate::tree::ElementTree;
use std::fmt;
use std::ops::{Add, Sub};
use std::rc::Rc;

/// Which of an element's four alignment functions a value stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Left edge.
    X,
    /// Bottom edge.
    Y,
    /// Horizontal extent.
    Width,
    /// Vertical extent.
    Height,
}

/// A lazily evaluated function `(parent1, parent2) -> pixels`.
///
/// Cloning is cheap: closures are reference counted and composite variants
/// clone their operands.
#[derive(Clone)]
pub enum Align {
    /// A constant, ignoring both arguments.
    Pixels(f32),
    /// A fraction of `parent1`.
    Relative(f32),
    /// The smaller of two functions.
    Min(Box<Align>, Box<Align>),
    /// The larger of two functions.
    Max(Box<Align>, Box<Align>),
    /// The sum of two functions.
    Sum(Box<Align>, Box<Align>),
    /// The first function minus the second.
    Difference(Box<Align>, Box<Align>),
    /// `if_true` when the predicate holds, `if_false` otherwise. Only the
    /// chosen branch is evaluated.
    Conditional {
        /// Evaluated first, with the same arguments.
        predicate: Rc<dyn Fn(f32, f32) -> bool>,
        /// Branch taken when the predicate holds.
        if_true: Box<Align>,
        /// Branch taken otherwise.
        if_false: Box<Align>,
    },
    /// The inner function with its arguments swapped.
    Swapped(Box<Align>),
    /// Whatever width function the target element has installed, evaluated
    /// with the caller's arguments. Zero once the target is gone.
    MirrorWidth(ElementId),
    /// Whatever height function the target element has installed, evaluated
    /// with the caller's arguments. Zero once the target is gone.
    MirrorHeight(ElementId),
    /// A value computed by the container's layout, such as a stacked
    /// child's offset or a centerer's content extent.
    Layout {
        /// The container whose layout computes the value.
        container: ElementId,
        /// The element the value is for.
        subject: ElementId,
        /// Which value.
        slot: Slot,
    },
    /// An arbitrary pure function of the two arguments.
    Custom(Rc<dyn Fn(f32, f32) -> f32>),
    /// An arbitrary pure function that may read other elements' geometry.
    Derived(Rc<dyn Fn(&ElementTree, f32, f32) -> f32>),
}

impl Align {
    /// Constant pixels.
    #[must_use]
    pub const fn pixels(value: f32) -> Self {
        Self::Pixels(value)
    }

    /// Fraction of the parent extent along the same axis.
    #[must_use]
    pub const fn relative(fraction: f32) -> Self {
        Self::Relative(fraction)
    }

    /// Smaller of two functions.
    #[must_use]
    pub fn min(a: impl Into<Self>, b: impl Into<Self>) -> Self {
        Self::Min(Box::new(a.into()), Box::new(b.into()))
    }

    /// Larger of two functions.
    #[must_use]
    pub fn max(a: impl Into<Self>, b: impl Into<Self>) -> Self {
        Self::Max(Box::new(a.into()), Box::new(b.into()))
    }

    /// Branch on a predicate of the arguments.
    #[must_use]
    pub fn conditional(
        predicate: impl Fn(f32, f32) -> bool + 'static,
        if_true: impl Into<Self>,
        if_false: impl Into<Self>,
    ) -> Self {
        Self::Conditional {
            predicate: Rc::new(predicate),
            if_true: Box::new(if_true.into()),
            if_false: Box::new(if_false.into()),
        }
    }

    /// This function with its arguments swapped.
    #[must_use]
    pub fn swapped(self) -> Self {
        Self::Swapped(Box::new(self))
    }

    /// Mirror of another element's width function.
    #[must_use]
    pub const fn mirror_width(target: ElementId) -> Self {
        Self::MirrorWidth(target)
    }

    /// Mirror of another element's height function.
    #[must_use]
    pub const fn mirror_height(target: ElementId) -> Self {
        Self::MirrorHeight(target)
    }

    /// Arbitrary function of the arguments.
    #[must_use]
    pub fn custom(f: impl Fn(f32, f32) -> f32 + 'static) -> Self {
        Self::Custom(Rc::new(f))
    }

    /// Arbitrary function of the tree and the arguments.
    #[must_use]
    pub fn derived(f: impl Fn(&ElementTree, f32, f32) -> f32 + 'static) -> Self {
        Self::Derived(Rc::new(f))
    }

    /// Evaluates the function.
    #[must_use]
    pub fn eval(&self, tree: &ElementTree, p1: f32, p2: f32) -> f32 {
        match self {
            Self::Pixels(value) => *value,
            Self::Relative(fraction) => fraction * p1,
            Self::Min(a, b) => a.eval(tree, p1, p2).min(b.eval(tree, p1, p2)),
            Self::Max(a, b) => a.eval(tree, p1, p2).max(b.eval(tree, p1, p2)),
            Self::Sum(a, b) => a.eval(tree, p1, p2) + b.eval(tree, p1, p2),
            Self::Difference(a, b) => a.eval(tree, p1, p2) - b.eval(tree, p1, p2),
            Self::Conditional { predicate, if_true, if_false } => {
                if predicate(p1, p2) {
                    if_true.eval(tree, p1, p2)
                } else {
                    if_false.eval(tree, p1, p2)
                }
            }
            Self::Swapped(inner) => inner.eval(tree, p2, p1),
            Self::MirrorWidth(target) => tree
                .alignment(*target)
                .map_or(0.0, |alignment| alignment.width.eval(tree, p1, p2)),
            Self::MirrorHeight(target) => tree
                .alignment(*target)
                .map_or(0.0, |alignment| alignment.height.eval(tree, p1, p2)),
            Self::Layout { container, subject, slot } => {
                tree.resolve_layout(*container, *subject, *slot, p1, p2)
            }
            Self::Custom(f) => f(p1, p2),
            Self::Derived(f) => f(tree, p1, p2),
        }
    }
}

impl Default for Align {
    fn default() -> Self {
        Self::Pixels(0.0)
    }
}

impl From<f32> for Align {
    fn from(value: f32) -> Self {
        Self::Pixels(value)
    }
}

impl Add for Align {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::Sum(Box::new(self), Box::new(rhs))
    }
}

impl Sub for Align {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::Difference(Box::new(self), Box::new(rhs))
    }
}

impl fmt::Debug for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(value) => write!(f, "Pixels({value})"),
            Self::Relative(fraction) => write!(f, "Relative({fraction})"),
            Self::Min(a, b) => f.debug_tuple("Min").field(a).field(b).finish(),
            Self::Max(a, b) => f.debug_tuple("Max").field(a).field(b).finish(),
            Self::Sum(a, b) => f.debug_tuple("Sum").field(a).field(b).finish(),
            Self::Difference(a, b) => f.debug_tuple("Difference").field(a).field(b).finish(),
            Self::Conditional { if_true, if_false, .. } => f
                .debug_struct("Conditional")
                .field("if_true", if_true)
                .field("if_false", if_false)
                .finish_non_exhaustive(),
            Self::Swapped(inner) => f.debug_tuple("Swapped").field(inner).finish(),
            Self::MirrorWidth(target) => f.debug_tuple("MirrorWidth").field(target).finish(),
            Self::MirrorHeight(target) => f.debug_tuple("MirrorHeight").field(target).finish(),
            Self::Layout { container, subject, slot } => f
                .debug_struct("Layout")
                .field("container", container)
                .field("subject", subject)
                .field("slot", slot)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::ElementAlignment;
    use crate::element::Container;
    use firecrest_core::Vec2;
    use std::cell::Cell;

    fn tree() -> ElementTree {
        ElementTree::new(Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_pixels_ignores_arguments() {
        let tree = tree();
        let f = Align::pixels(42.0);
        for (p1, p2) in [(0.0, 0.0), (100.0, -3.0), (-7.5, 1e6)] {
            assert_eq!(f.eval(&tree, p1, p2), 42.0);
        }
    }

    #[test]
    fn test_relative_uses_parent1_only() {
        let tree = tree();
        let f = Align::relative(0.25);
        assert_eq!(f.eval(&tree, 200.0, 1.0), 50.0);
        assert_eq!(f.eval(&tree, 200.0, 9999.0), 50.0);
    }

    #[test]
    fn test_min_max_and_arithmetic() {
        let tree = tree();
        let min = Align::min(Align::relative(0.5), 30.0);
        let max = Align::max(Align::relative(0.5), 30.0);
        assert_eq!(min.eval(&tree, 100.0, 0.0), 30.0);
        assert_eq!(max.eval(&tree, 100.0, 0.0), 50.0);

        let inset = Align::relative(1.0) - Align::pixels(20.0);
        assert_eq!(inset.eval(&tree, 100.0, 0.0), 80.0);
        let shifted = Align::relative(0.5) + Align::pixels(4.0);
        assert_eq!(shifted.eval(&tree, 10.0, 0.0), 9.0);
    }

    #[test]
    fn test_conditional_short_circuits() {
        let tree = tree();
        let true_calls = Rc::new(Cell::new(0));
        let false_calls = Rc::new(Cell::new(0));

        let probe = |counter: &Rc<Cell<u32>>, value: f32| {
            let counter = Rc::clone(counter);
            Align::custom(move |_, _| {
                counter.set(counter.get() + 1);
                value
            })
        };

        let f = Align::conditional(
            |p1, _| p1 > 100.0,
            probe(&true_calls, 1.0),
            probe(&false_calls, 2.0),
        );

        assert_eq!(f.eval(&tree, 150.0, 0.0), 1.0);
        assert_eq!((true_calls.get(), false_calls.get()), (1, 0));

        assert_eq!(f.eval(&tree, 50.0, 0.0), 2.0);
        assert_eq!((true_calls.get(), false_calls.get()), (1, 1));
    }

    #[test]
    fn test_swapped() {
        let tree = tree();
        let f = Align::relative(0.5).swapped();
        assert_eq!(f.eval(&tree, 10.0, 300.0), 150.0);
    }

    #[test]
    fn test_mirror_reads_installed_function_not_pixels() {
        let mut tree = tree();
        let root = tree.root();
        let target = tree
            .create_child(
                root,
                ElementAlignment::default().with_width(Align::relative(0.5)),
                Container,
            )
            .unwrap();

        let mirror = Align::mirror_width(target);
        // Evaluated with the caller's arguments, not the target's parent size.
        assert_eq!(mirror.eval(&tree, 40.0, 0.0), 20.0);

        tree.alignment_mut(target).unwrap().width = Align::pixels(7.0);
        assert_eq!(mirror.eval(&tree, 40.0, 0.0), 7.0);

        tree.remove(target).unwrap();
        assert_eq!(mirror.eval(&tree, 40.0, 0.0), 0.0);
    }

    #[test]
    fn test_debug_output() {
        let f = Align::max(Align::pixels(1.0), Align::custom(|a, _| a));
        assert_eq!(format!("{f:?}"), "Max(Pixels(1), Custom(..))");
    }
}
