//! Built-in widgets.
//!
//! Composite widgets build their children in [`Element::created`] and keep
//! the IDs they need; mutators go through
//! [`ElementTree::with_element`](crate::tree::ElementTree::with_element) so
//! they can reach those children.
//!
//! [`Element::created`]: crate::element::Element::created

mod button;
mod graph;
mod rect;
mod text_box;
mod text_input;

pub use button::{Button, ButtonColors};
pub use graph::{Graph, PlainGraph};
pub use rect::ColoredRect;
pub use text_box::TextBox;
pub use text_input::TextInput;
