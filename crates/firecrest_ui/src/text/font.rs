//! Font faces and the shared font library.
//!
//! A [`FontFace`] answers measurement queries from a glyph table: advance
//! widths per character plus vertical metrics, all given at a nominal size
//! and scaled linearly. Every live face holds the process-wide
//! [`FontLibrary`], which comes up with the first face and goes away with
//! the last one.

use crate::error::{UiError, UiResult};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

/// Measuring side of a text backend.
pub trait FontMetrics {
    /// Pixel advance of `text` at `size`.
    fn advance(&self, text: &str, size: f32) -> f32;

    /// Distance between consecutive baselines.
    fn line_height(&self, size: f32) -> f32;

    /// Height above the baseline.
    fn ascender(&self, size: f32) -> f32;

    /// Depth below the baseline, negative.
    fn descender(&self, size: f32) -> f32;
}

// =============================================================================
// Font library
// =============================================================================

static LIBRARY: Mutex<Weak<FontLibrary>> = parking_lot::const_mutex(Weak::new());
static GENERATION: AtomicU64 = AtomicU64::new(0);

/// Process-wide font engine state, shared by every [`FontFace`].
#[derive(Debug)]
pub struct FontLibrary {
    generation: u64,
    faces: AtomicUsize,
}

impl FontLibrary {
    /// Returns the live library, initialising a new one if none exists.
    #[must_use]
    pub fn acquire() -> Arc<Self> {
        let mut slot = LIBRARY.lock();
        if let Some(library) = slot.upgrade() {
            return library;
        }

        let generation = GENERATION.fetch_add(1, Ordering::Relaxed) + 1;
        let library = Arc::new(Self {
            generation,
            faces: AtomicUsize::new(0),
        });
        *slot = Arc::downgrade(&library);
        tracing::debug!("font library initialised (generation {})", generation);
        library
    }

    /// Whether a library is currently alive.
    #[must_use]
    pub fn is_initialised() -> bool {
        LIBRARY.lock().strong_count() > 0
    }

    /// Counts up once per initialisation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of faces holding this library.
    #[must_use]
    pub fn live_faces(&self) -> usize {
        self.faces.load(Ordering::Relaxed)
    }
}

impl Drop for FontLibrary {
    fn drop(&mut self) {
        tracing::debug!("font library torn down (generation {})", self.generation);
    }
}

// =============================================================================
// Glyph table
// =============================================================================

/// Serialized metrics of one face, all at `nominal_size`.
///
/// ```toml
/// nominal_size = 16.0
/// line_height = 20.0
/// ascender = 14.0
/// descender = -4.0
/// default_advance = 8.0
///
/// [advances]
/// "i" = 4.0
/// "m" = 12.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphTable {
    /// Size the other values are given at.
    pub nominal_size: f32,
    /// Distance between consecutive baselines.
    pub line_height: f32,
    /// Height above the baseline.
    pub ascender: f32,
    /// Depth below the baseline, negative.
    pub descender: f32,
    /// Advance of characters missing from `advances`.
    #[serde(default)]
    pub default_advance: Option<f32>,
    /// Advance per single-character key.
    #[serde(default)]
    pub advances: HashMap<String, f32>,
}

impl GlyphTable {
    /// A table where every character advances by `advance`. The line height
    /// equals the nominal size, split 4:1 above and below the baseline.
    #[must_use]
    pub fn monospace(nominal_size: f32, advance: f32) -> Self {
        Self {
            nominal_size,
            line_height: nominal_size,
            ascender: nominal_size * 0.8,
            descender: -nominal_size * 0.2,
            default_advance: Some(advance),
            advances: HashMap::new(),
        }
    }
}

// =============================================================================
// Font face
// =============================================================================

/// Scaled metrics of one loaded face.
#[derive(Debug)]
pub struct FontFace {
    name: String,
    nominal_size: f32,
    line_height: f32,
    ascender: f32,
    descender: f32,
    default_advance: Option<f32>,
    advances: HashMap<char, f32>,
    library: Arc<FontLibrary>,
}

impl FontFace {
    /// A monospace face, see [`GlyphTable::monospace`].
    #[must_use]
    pub fn monospace(nominal_size: f32, advance: f32) -> Self {
        Self::build("monospace".to_owned(), GlyphTable::monospace(nominal_size, advance), HashMap::new())
    }

    /// Builds a face from a parsed table.
    ///
    /// # Errors
    ///
    /// [`UiError::ResourceLoad`] if the nominal size is not positive or an
    /// advance key is not exactly one character.
    pub fn from_table(name: &str, table: GlyphTable) -> UiResult<Self> {
        let fail = |reason: String| UiError::ResourceLoad { path: PathBuf::from(name), reason };

        if table.nominal_size <= 0.0 {
            return Err(fail(format!("nominal size {} is not positive", table.nominal_size)));
        }
        let mut advances = HashMap::with_capacity(table.advances.len());
        for (key, &advance) in &table.advances {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => {
                    advances.insert(ch, advance);
                }
                _ => return Err(fail(format!("advance key {key:?} is not a single character"))),
            }
        }
        Ok(Self::build(name.to_owned(), table, advances))
    }

    /// Parses a face from TOML glyph table source.
    ///
    /// # Errors
    ///
    /// [`UiError::ResourceLoad`] if the source does not parse or the table
    /// is invalid.
    pub fn from_toml_str(name: &str, source: &str) -> UiResult<Self> {
        let table: GlyphTable = toml::from_str(source).map_err(|e| UiError::ResourceLoad {
            path: PathBuf::from(name),
            reason: e.to_string(),
        })?;
        Self::from_table(name, table)
    }

    /// Loads a face from a TOML glyph table file.
    ///
    /// # Errors
    ///
    /// [`UiError::ResourceLoad`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> UiResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| UiError::ResourceLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let face = Self::from_toml_str(&path.to_string_lossy(), &source)?;
        tracing::info!("loaded font face {}", face.name);
        Ok(face)
    }

    fn build(name: String, table: GlyphTable, advances: HashMap<char, f32>) -> Self {
        let library = FontLibrary::acquire();
        library.faces.fetch_add(1, Ordering::Relaxed);
        Self {
            name,
            nominal_size: table.nominal_size,
            line_height: table.line_height,
            ascender: table.ascender,
            descender: table.descender,
            default_advance: table.default_advance,
            advances,
            library,
        }
    }

    /// Face name, the file path for loaded faces.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The library this face holds.
    #[must_use]
    pub fn library(&self) -> &Arc<FontLibrary> {
        &self.library
    }

    #[inline]
    fn scale(&self, size: f32) -> f32 {
        size / self.nominal_size
    }
}

impl FontMetrics for FontFace {
    fn advance(&self, text: &str, size: f32) -> f32 {
        let nominal: f32 = text
            .chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| self.advances.get(&ch).copied().or(self.default_advance).unwrap_or(0.0))
            .sum();
        nominal * self.scale(size)
    }

    fn line_height(&self, size: f32) -> f32 {
        self.line_height * self.scale(size)
    }

    fn ascender(&self, size: f32) -> f32 {
        self.ascender * self.scale(size)
    }

    fn descender(&self, size: f32) -> f32 {
        self.descender * self.scale(size)
    }
}

impl Drop for FontFace {
    fn drop(&mut self) {
        self.library.faces.fetch_sub(1, Ordering::Relaxed);
    }
}
