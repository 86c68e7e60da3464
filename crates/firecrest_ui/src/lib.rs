//! # Firecrest UI
//!
//! A retained-mode element tree whose geometry is a lazily evaluated
//! function of each parent's size.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        UI PIPELINE                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Platform → Window → Input → Display → ElementTree → Frame   │
//! │                ↓                 ↓            ↓         ↓    │
//! │           y-up flip        routing/focus   layout   commands │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every element carries an [`ElementAlignment`]: four [`Align`] functions
//! that give its x, y, width and height from its parent's size. Nothing is
//! cached; a position is re-derived each time it is asked for, so a parent
//! resize or a sibling growing is picked up on the next query.
//!
//! ## Quick start
//!
//! ```
//! use firecrest_ui::{Display, ElementAlignment, UIRenderer, Window};
//! use firecrest_ui::widget::ColoredRect;
//! use firecrest_core::Color;
//!
//! let (window, _platform) = Window::headless(640.0, 480.0);
//! let display = Display::new(window);
//! display
//!     .create_child(ElementAlignment::fixed(10.0, 10.0, 100.0, 50.0), ColoredRect::new(Color::RED))
//!     .unwrap();
//!
//! let mut renderer = UIRenderer::new();
//! let batches = display.render(&mut renderer);
//! assert_eq!(batches.len(), 1);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod alignment;
pub mod config;
pub mod display;
pub mod element;
pub mod error;
pub mod events;
pub mod input;
pub mod layout;
pub mod render;
pub mod text;
pub mod tree;
pub mod widget;
pub mod window;

pub use alignment::{Align, ElementAlignment, Slot};
pub use config::UiConfig;
pub use display::Display;
pub use element::{Container, Element, ElementContext, ElementId};
pub use error::{UiError, UiResult};
pub use events::{
    ButtonAction, CursorEvent, KeyAction, KeyboardEvent, MotionAction, MouseButtonEvent,
    MouseMotionEvent, ScrollEvent,
};
pub use input::{Input, InputState, Key, Modifiers, MouseButton, SubscriptionId};
pub use layout::Layout;
pub use render::{Frame, RenderCommand, UIBatch, UIRenderer};
pub use text::{FontFace, FontMetrics, Text};
pub use tree::ElementTree;
pub use window::{HeadlessPlatform, Platform, RawEvent, Window};
