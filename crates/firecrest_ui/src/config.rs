//! # UI Configuration
//!
//! Tunables for the built-in widgets, loaded once at startup from TOML.
//! Every table and every key is optional; missing values fall back to the
//! defaults below.
//!
//! ```toml
//! [scroll]
//! speed = 40.0
//! clamp = true
//!
//! [text_input]
//! blink_interval = 60
//!
//! [button]
//! corner_radius = 15.0
//! ```

use crate::error::{UiError, UiResult};
use firecrest_core::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scrolling behaviour and scrollbar appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Pixels scrolled per wheel unit.
    pub speed: f32,
    /// Keep the content inside the viewport and draw a scrollbar.
    pub clamp: bool,
    /// Scrollbar thickness.
    pub scrollbar_width: f32,
    /// Gap between scrollbar and the right edge.
    pub scrollbar_padding: f32,
    /// Shortest scrollbar thumb.
    pub scrollbar_min_height: f32,
    /// Thumb color.
    pub scrollbar_color: Color,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            speed: 40.0,
            clamp: true,
            scrollbar_width: 6.0,
            scrollbar_padding: 2.0,
            scrollbar_min_height: 30.0,
            scrollbar_color: Color::rgba(0.5, 0.5, 0.5, 0.75),
        }
    }
}

/// Caret appearance for text inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextInputConfig {
    /// Blink period in frames; the caret is visible for the first half.
    pub blink_interval: u32,
    /// Caret width in pixels.
    pub cursor_width: f32,
    /// Caret color.
    pub cursor_color: Color,
}

impl Default for TextInputConfig {
    fn default() -> Self {
        Self {
            blink_interval: 60,
            cursor_width: 3.0,
            cursor_color: Color::WHITE,
        }
    }
}

/// Button appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    /// Background corner radius.
    pub corner_radius: f32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self { corner_radius: 15.0 }
    }
}

/// Graph appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Data line color.
    pub line_color: Color,
    /// Grid line color.
    pub grid_color: Color,
    /// Data line width.
    pub line_width: f32,
    /// Panel background.
    pub background: Color,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            line_color: Color::rgba(0.1, 0.8, 0.3, 1.0),
            grid_color: Color::rgba(0.2, 0.2, 0.2, 1.0),
            line_width: 2.0,
            background: Color::BLACK,
        }
    }
}

/// Top-level UI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// `[scroll]` table.
    pub scroll: ScrollConfig,
    /// `[text_input]` table.
    pub text_input: TextInputConfig,
    /// `[button]` table.
    pub button: ButtonConfig,
    /// `[graph]` table.
    pub graph: GraphConfig,
}

impl UiConfig {
    /// Parses a configuration from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidConfig`] if the source is not valid TOML or
    /// a value has the wrong type.
    pub fn from_toml_str(source: &str) -> UiResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| UiError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::ResourceLoad`] if the file cannot be read and
    /// [`UiError::InvalidConfig`] if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> UiResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| UiError::ResourceLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> UiResult<()> {
        if self.text_input.blink_interval == 0 {
            return Err(UiError::InvalidConfig(
                "text_input.blink_interval must be at least one frame".into(),
            ));
        }
        if self.scroll.scrollbar_min_height < 0.0 || self.scroll.scrollbar_width < 0.0 {
            return Err(UiError::InvalidConfig(
                "scrollbar dimensions must not be negative".into(),
            ));
        }
        Ok(())
    }
}
