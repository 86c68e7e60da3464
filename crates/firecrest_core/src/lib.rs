//! # Firecrest Core
//!
//! Value types shared by every Firecrest crate:
//! - [`Vec2`] pixel positions and sizes
//! - [`Rect`] hit-testing and clip regions
//! - [`Color`] RGBA colors
//! - [`Tracked`] change detection on assignment
//!
//! ## Coordinate System
//!
//! ```text
//!   y
//!   ^
//!   |   +---------+ (x + width, y + height)
//!   |   |  Rect   |
//!   |   +---------+
//!   |  (x, y)
//!   +------------------> x
//! ```
//!
//! All geometry is y-up with the origin at the bottom-left corner of the
//! window, matching the convention of the graphics backend.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod color;
pub mod math;
pub mod rect;
pub mod tracked;

pub use color::Color;
pub use math::{map, Vec2};
pub use rect::Rect;
pub use tracked::Tracked;
