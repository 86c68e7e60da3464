//! Alignment functions.
//!
//! Every element is placed by four [`Align`] functions, one each for x, y,
//! width and height. A function maps `(parent1, parent2)` to a pixel value,
//! where `parent1` is the parent's extent along the function's own axis and
//! `parent2` the cross-axis extent:
//!
//! ```text
//!   x, width   ->  f(parent_width,  parent_height)
//!   y, height  ->  f(parent_height, parent_width)
//! ```
//!
//! Functions are evaluated on every query. Nothing is memoized, so a
//! function that reads another element's geometry always sees the current
//! tree.

mod element_alignment;
mod function;

pub use element_alignment::ElementAlignment;
pub use function::{Align, Slot};
