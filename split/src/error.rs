//! Errors reported while decoding persisted splitting parameters.
use crate::SplittingKind;

/// Persisted splitting parameters could not be decoded.
///
/// Decoding never substitutes defaults for missing or invalid fields, since a strategy rebuilt
/// from incomplete parameters would address a table differently than the one that wrote it.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum DecodeError {
    /// The input ended where a field was expected.
    #[error("missing field {field:?}")]
    MissingField {
        /// Name of the expected field.
        field: &'static str,
    },
    /// The input ended in the middle of a field.
    #[error("unexpected end of input while reading field {field:?}")]
    Truncated {
        /// Name of the field being read.
        field: &'static str,
    },
    /// A field with a different name was found where another was expected.
    #[error("expected field {expected:?}, found {found:?}")]
    UnexpectedField {
        /// Name of the expected field.
        expected: &'static str,
        /// Name found in the input.
        found: String,
    },
    /// A field has the expected name but a different type.
    #[error("field {field:?} has type code {found:#04x}, expected {expected:#04x}")]
    UnexpectedType {
        /// Name of the field.
        field: &'static str,
        /// Type code the field should have.
        expected: u8,
        /// Type code found in the input.
        found: u8,
    },
    /// Bytes remain after all expected fields were read.
    #[error("{0} trailing bytes after the last field")]
    TrailingBytes(usize),
    /// All fields were present but describe a strategy that cannot exist.
    #[error("invalid {kind} splitting parameters: {reason}")]
    InvalidParameters {
        /// Variant the parameters were decoded for.
        kind: SplittingKind,
        /// What is wrong with them.
        reason: String,
    },
}
