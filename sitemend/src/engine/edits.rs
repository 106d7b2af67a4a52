//! Byte-range edit list for text rewrites.
//!
//! Rules that modify existing spans of a document express their work as a
//! set of byte-range edits. The list validates bounds and overlaps before
//! anything is applied, and applies edits back-to-front so earlier offsets
//! stay valid while the string is being modified.
//!
//! # Usage
//!
//! ```
//! use sitemend::engine::edits::{Edit, EditList};
//!
//! let mut edits = EditList::new();
//! edits.push(Edit::replace(0, 5, "hi"));
//! let out = edits.apply("hello world").expect("should apply");
//! assert_eq!(out, "hi world");
//! ```

use thiserror::Error;

/// A single edit operation over a byte range of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Replacement content.
    pub replacement: String,
}

impl Edit {
    /// Replace the range `start..end` with `replacement`.
    #[must_use]
    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    /// Delete the range `start..end`.
    #[must_use]
    pub fn delete(start: usize, end: usize) -> Self {
        Self::replace(start, end, "")
    }

    /// Insert `content` before `position`.
    #[must_use]
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self::replace(position, position, content)
    }

    /// Check whether this edit overlaps another.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Error raised when an edit list cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Two or more edits cover overlapping ranges.
    #[error("overlapping edits at indices {first} and {second}")]
    Overlapping {
        /// Index of the first overlapping edit.
        first: usize,
        /// Index of the second overlapping edit.
        second: usize,
    },
    /// An edit range extends past the end of the source.
    #[error("edit {index} out of bounds: end {end} > source length {source_len}")]
    OutOfBounds {
        /// Index of the offending edit.
        index: usize,
        /// End byte of the edit.
        end: usize,
        /// Length of the source text.
        source_len: usize,
    },
}

/// An ordered collection of pending edits.
#[derive(Debug, Clone, Default)]
pub struct EditList {
    edits: Vec<Edit>,
}

impl EditList {
    /// Create an empty edit list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an edit.
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Number of queued edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether the list holds no edits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Validate the queued edits against a source of the given length.
    ///
    /// # Errors
    /// Returns an error if any edit is out of bounds or overlaps another.
    pub fn validate(&self, source_len: usize) -> Result<(), EditError> {
        for (i, edit) in self.edits.iter().enumerate() {
            if edit.end > source_len || edit.start > edit.end {
                return Err(EditError::OutOfBounds {
                    index: i,
                    end: edit.end,
                    source_len,
                });
            }
        }

        for i in 0..self.edits.len() {
            for j in (i + 1)..self.edits.len() {
                if self.edits[i].overlaps(&self.edits[j]) {
                    return Err(EditError::Overlapping {
                        first: i,
                        second: j,
                    });
                }
            }
        }

        Ok(())
    }

    /// Apply all edits to `source` and return the rewritten text.
    ///
    /// Edits are applied in descending start order so byte offsets recorded
    /// against the original text remain valid throughout.
    ///
    /// # Errors
    /// Returns an error if any edit is out of bounds or overlaps another.
    pub fn apply(mut self, source: &str) -> Result<String, EditError> {
        self.validate(source.len())?;

        self.edits.sort_by(|a, b| b.start.cmp(&a.start));

        let mut result = source.to_owned();
        for edit in self.edits {
            result.replace_range(edit.start..edit.end, &edit.replacement);
        }

        Ok(result)
    }
}
