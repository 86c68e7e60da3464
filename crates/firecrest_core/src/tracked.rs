//! Change detection on assignment.
//!
//! A [`Tracked`] value remembers whether it was assigned a *different*
//! value since the last time somebody asked. Caches that depend on several
//! inputs keep each input in a `Tracked` and rebuild when any of them
//! reports a change.

use std::ops::Deref;

/// A value that records whether it changed since it was last inspected.
#[derive(Debug, Clone, Default)]
pub struct Tracked<T> {
    value: T,
    modified: bool,
}

impl<T: PartialEq> Tracked<T> {
    /// Wraps `value`. A fresh value counts as modified so the first
    /// inspection always triggers a build.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self { value, modified: true }
    }

    /// Assigns a new value, marking the cell modified only if it differs.
    pub fn set(&mut self, value: T) {
        if self.value != value {
            self.value = value;
            self.modified = true;
        }
    }

    /// Mutates the value in place and marks the cell modified unconditionally.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.value);
        self.modified = true;
    }

    /// Returns the current value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Returns whether the value changed since the last call, and resets the flag.
    pub fn take_modified(&mut self) -> bool {
        std::mem::replace(&mut self.modified, false)
    }

    /// Returns whether the value changed, without resetting the flag.
    #[inline]
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}
