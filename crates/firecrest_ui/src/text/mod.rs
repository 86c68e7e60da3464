//! Text measurement, line breaking and the text element.
//!
//! - [`FontMetrics`]: the measuring side of the text backend
//! - [`FontFace`]: metrics loaded from a TOML glyph table
//! - [`wrap_text`]: greedy line breaking by measured width
//! - [`Text`]: an element caching its wrapped lines

mod font;
mod cache;
mod wrap;

pub use font::{FontFace, FontLibrary, FontMetrics, GlyphTable};
pub use cache::{Text, TextLine};
pub use wrap::{wrap_text, WrapMode, Wrapped, WrappedLine};
