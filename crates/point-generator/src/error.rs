//! Error types for point generation.

use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;
use thiserror::Error;

/// A single `key=value` pair of a field descriptor that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid field '{pair}': {reason}")]
pub struct FieldParseError {
    /// The offending pair, verbatim.
    pub pair: String,
    pub reason: FieldParseReason,
}

impl FieldParseError {
    pub fn new(pair: impl Into<String>, reason: FieldParseReason) -> Self {
        Self {
            pair: pair.into(),
            reason,
        }
    }
}

/// Why a field pair was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldParseReason {
    #[error("empty field pair")]
    EmptyPair,

    #[error("missing '=' between key and value")]
    MissingEquals,

    #[error("empty field key")]
    EmptyKey,

    #[error("malformed integer: {0}")]
    InvalidInteger(ParseIntError),

    #[error("malformed float: {0}")]
    InvalidFloat(ParseFloatError),
}

/// Error type for generator operations.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Series-key or field-map file could not be read or written
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Field descriptor could not be parsed
    #[error("Field parse error: {0}")]
    FieldParse(#[from] FieldParseError),

    /// No field descriptor is mapped to the series prefix
    #[error("Unknown series prefix '{prefix}': no field descriptor in field map")]
    MissingFieldSpec { prefix: String },

    /// Series-key template is not usable
    #[error("Invalid series key template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// Field-map line is not `<prefix> <descriptor>`
    #[error("Malformed field map line {line}: '{content}'")]
    MalformedFieldMap { line: usize, content: String },

    /// Field-map prefix appears more than once
    #[error("Duplicate field map prefix '{prefix}' on line {line}")]
    DuplicatePrefix { prefix: String, line: usize },
}

impl GeneratorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error concerns a single record rather than the whole batch.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            GeneratorError::FieldParse(_) | GeneratorError::MissingFieldSpec { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_parse_error_display() {
        let err = FieldParseError::new("count", FieldParseReason::MissingEquals);
        assert_eq!(
            err.to_string(),
            "Invalid field 'count': missing '=' between key and value"
        );
    }

    #[test]
    fn test_record_error_classification() {
        assert!(GeneratorError::MissingFieldSpec {
            prefix: "cpu".to_string()
        }
        .is_record_error());
        assert!(GeneratorError::from(FieldParseError::new(
            "",
            FieldParseReason::EmptyPair
        ))
        .is_record_error());
        assert!(!GeneratorError::io(
            "/missing",
            std::io::Error::from(std::io::ErrorKind::NotFound)
        )
        .is_record_error());
    }
}
