/*

    Error types of the bounding volume crate.

    - GeometryError: invalid arguments to volume operations
      and malformed text-format input
    - LoadError: failures while loading culling queries

    @date: 20 Nov, 2025
    @author: Bartu
*/

use std::num::ParseFloatError;
use thiserror::Error;

/// Result type for geometry operations
pub type GeomResult<T> = Result<T, GeometryError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("corner index {index} is out of range, expected 0..8")]
    CornerIndexOutOfRange { index: usize },

    #[error("plane index {index} is out of range, expected 0..6")]
    PlaneIndexOutOfRange { index: usize },

    #[error("cannot create a bounding volume from an empty point set")]
    EmptyPointSet,

    #[error("output slice has {actual} slots but {required} are required")]
    OutputTooSmall { required: usize, actual: usize },

    #[error("expected {expected} components, got {actual}")]
    ComponentCount { expected: usize, actual: usize },

    #[error("failed to parse '{token}' as a number: {source}")]
    InvalidNumber {
        token: String,
        #[source]
        source: ParseFloatError,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("query '{name}' has neither a Matrix nor a Camera")]
    MissingView { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let e = GeometryError::CornerIndexOutOfRange { index: 9 };
        assert_eq!(e.to_string(), "corner index 9 is out of range, expected 0..8");

        let e = GeometryError::OutputTooSmall { required: 8, actual: 3 };
        assert!(e.to_string().contains("3 slots"));

        let e = LoadError::MissingView { name: "q".into() };
        assert!(e.to_string().contains("'q'"));
    }

    #[test]
    fn invalid_number_keeps_parse_source() {
        let source = "abc".parse::<f64>().unwrap_err();
        let e = GeometryError::InvalidNumber { token: "abc".into(), source };
        assert!(std::error::Error::source(&e).is_some());
    }
}
