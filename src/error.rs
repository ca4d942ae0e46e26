/// Error handling module for the conversion engine.
///
/// This module defines error types and utilities for error reporting
/// throughout the parsing and rendering pipeline.
use crate::node::Attribute;
use crate::parser::state::State;
use crate::token::ElementType;
use std::fmt;
use std::io;

/// Main error type for the conversion engine.
///
/// Apart from `Io`, every variant denotes an internal consistency fault:
/// the pipeline aborts, the front-end prints a short diagnostic, and the
/// process still exits cleanly. Recoverable parse problems never surface
/// here; they degrade to literal text and a logged warning instead.
#[derive(Debug)]
pub enum ConvertError {
    /// I/O failure while reading input or writing output.
    Io { source: io::Error },

    /// A close token named an element other than the one the cursor points at.
    ShapeMismatch {
        expected: ElementType,
        found: ElementType,
    },

    /// A structural operation ran after the cursor left the document root.
    DetachedCursor,

    /// The tree root was requested a second time.
    RootTaken,

    /// A state that is not resumable was pushed onto the return stack.
    InvalidReturnState { state: State },

    /// The return stack exceeded its nesting cap.
    ReturnStackOverflow,

    /// A table header row closed with zero columns.
    EmptyTableHeader,

    /// A table open arrived while a table was already being built.
    TableRestarted,

    /// A table emit was requested without a table under construction.
    MissingTable,

    /// The table manager received an element it does not accept.
    UnexpectedTableToken { element: ElementType },

    /// An attribute had no entry in the CSS property map.
    UnknownAttribute { attribute: Attribute },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Io { source } => {
                write!(f, "IO error: {}", source)
            }
            ConvertError::ShapeMismatch { expected, found } => {
                write!(
                    f,
                    "cursor element ({}) and closing element ({}) do not match",
                    expected.tag_name(),
                    found.tag_name()
                )
            }
            ConvertError::DetachedCursor => {
                write!(f, "tree cursor is detached from the document root")
            }
            ConvertError::RootTaken => {
                write!(f, "document root has already been handed off")
            }
            ConvertError::InvalidReturnState { state } => {
                write!(f, "state {:?} is not a valid return state", state)
            }
            ConvertError::ReturnStackOverflow => {
                write!(f, "return stack exceeded its nesting cap")
            }
            ConvertError::EmptyTableHeader => {
                write!(f, "table header row has no columns")
            }
            ConvertError::TableRestarted => {
                write!(f, "table opened while another table is being built")
            }
            ConvertError::MissingTable => {
                write!(f, "table emit requested with no table under construction")
            }
            ConvertError::UnexpectedTableToken { element } => {
                write!(
                    f,
                    "element {} is not accepted inside a table",
                    element.tag_name()
                )
            }
            ConvertError::UnknownAttribute { attribute } => {
                write!(f, "attribute {} has no CSS mapping", attribute.name())
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io { source } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for ConvertError {
    fn from(error: io::Error) -> Self {
        ConvertError::Io { source: error }
    }
}

/// Convenience type alias for Results in the conversion engine.
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let error = ConvertError::ShapeMismatch {
            expected: ElementType::Paragraph,
            found: ElementType::Span,
        };

        let error_str = format!("{}", error);
        assert!(error_str.contains("p"));
        assert!(error_str.contains("span"));
        assert!(error_str.contains("do not match"));
    }

    #[test]
    fn test_io_error_source() {
        let error = ConvertError::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(std::error::Error::source(&error).is_some());
        assert!(format!("{}", error).contains("IO error"));
    }

    #[test]
    fn test_internal_errors_have_no_source() {
        let error = ConvertError::DetachedCursor;
        assert!(std::error::Error::source(&error).is_none());
    }
}
