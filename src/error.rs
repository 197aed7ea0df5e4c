//! Structured error types for the layout engine.
//!
//! Geometry and axis errors are precondition violations and abort the pass
//! immediately. Backend failures (fonts, images, output) are reported through
//! the same enum so the caller gets one descriptive error for the whole build.

use thiserror::Error;

use crate::geometry::alignment::Alignment;

/// The unified error type returned by every measure, render and build call.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A dimension was zero where a positive value is required, or negative.
    #[error("invalid size for {element}: {width}x{height}")]
    InvalidSize {
        element: &'static str,
        width: f64,
        height: f64,
    },

    /// An axis value outside {Horizontal, Vertical}.
    #[error("invalid axis value {0}, expected 0 (horizontal) or 1 (vertical)")]
    InvalidAxis(u8),

    /// An alignment combining mutually exclusive flags on one axis.
    #[error("invalid alignment {0:?}: mutually exclusive flags on the same axis")]
    InvalidAlignment(Alignment),

    /// Content cannot fit the space it was given.
    #[error("{element} overflows its box: {detail}")]
    ElementOverflow {
        element: &'static str,
        detail: String,
    },

    /// A selector resolved to an index with no matching candidate.
    #[error("selector index {index} out of range for {count} candidates")]
    SelectorOutOfRange { index: usize, count: usize },

    /// The canvas collaborator failed (font, image, measurement, output).
    #[error("backend failure during {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LayoutError {
    pub(crate) fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        LayoutError::Backend {
            operation,
            message: message.into(),
        }
    }

    pub(crate) fn overflow(element: &'static str, detail: impl Into<String>) -> Self {
        LayoutError::ElementOverflow {
            element,
            detail: detail.into(),
        }
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        LayoutError::backend("serialize display list", e.to_string())
    }
}

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_element() {
        let err = LayoutError::InvalidSize {
            element: "Text",
            width: 0.0,
            height: 12.0,
        };
        assert_eq!(err.to_string(), "invalid size for Text: 0x12");

        let err = LayoutError::overflow("Text", "no line fits in 4pt");
        assert!(err.to_string().starts_with("Text overflows"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: LayoutError = io.into();
        assert!(matches!(err, LayoutError::Io(_)));
    }
}
