//! Error handling for BoardKit
//!
//! Provides the error types shared by the editor crates:
//! - Editor errors (scene objects, images, crop sessions, drawing surfaces)
//! - A unified top-level error with conversions from the layered errors
//!
//! All error types use `thiserror` for ergonomic error handling. Interaction
//! paths never surface these for user-input-shaped failures; they are reserved
//! for I/O-shaped work such as decoding images or exporting rasters.

use thiserror::Error;

/// Editor error type
///
/// Represents failures in operations on scene objects that cannot be
/// degraded to a no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// No object with the given id exists in the scene
    #[error("Object {id} not found in scene")]
    ObjectNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// The object exists but is of a different kind
    #[error("Object {id} is not a {expected} object")]
    WrongObjectKind {
        /// The id of the object.
        id: String,
        /// The kind that was required.
        expected: String,
    },

    /// Image bytes could not be decoded
    #[error("Failed to decode image: {reason}")]
    ImageDecode {
        /// Decoder message.
        reason: String,
    },

    /// A crop result cannot be applied to the current raster
    #[error("Invalid crop: {reason}")]
    InvalidCrop {
        /// Why the crop was rejected.
        reason: String,
    },

    /// A crop operation was requested without a crop session
    #[error("No active crop session")]
    NoActiveCrop,

    /// The drawing surface could not be created or exported
    #[error("Surface error: {reason}")]
    Surface {
        /// The reason reported by the backend.
        reason: String,
    },
}

impl EditorError {
    /// Shorthand for [`EditorError::ObjectNotFound`].
    pub fn not_found(id: impl ToString) -> Self {
        EditorError::ObjectNotFound { id: id.to_string() }
    }
}

/// Main error type for BoardKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Editor error
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an editor error
    pub fn is_editor_error(&self) -> bool {
        matches!(self, Error::Editor(_))
    }

    /// Check if this error reports a missing object
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Editor(EditorError::ObjectNotFound { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_error_converts_into_error() {
        let err: Error = EditorError::not_found("abc").into();
        assert!(err.is_editor_error());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Object abc not found in scene");
    }

    #[test]
    fn test_io_error_is_not_editor_error() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(!err.is_editor_error());
        assert!(err.to_string().contains("gone"));
    }
}
