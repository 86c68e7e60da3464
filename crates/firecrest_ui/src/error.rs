//! # UI Error Types
//!
//! Failures that a caller can act on. Focus and capture edge cases are not
//! errors; they are reported through boolean results.

use crate::element::ElementId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or configuring a UI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// The element does not exist (never created, or already removed).
    #[error("element not found: {0:?}")]
    ElementNotFound(ElementId),

    /// A child was created under an element that has no layout.
    #[error("element {0:?} is not a container")]
    NotAContainer(ElementId),

    /// The tree root lives as long as the tree itself.
    #[error("the root element cannot be removed")]
    RootRemoval,

    /// A backing resource (font glyph table, config file) could not be loaded.
    #[error("failed to load resource {path}: {reason}")]
    ResourceLoad {
        /// Path of the resource.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;
