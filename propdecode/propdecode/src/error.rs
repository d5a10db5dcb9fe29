//! Error types for schema resolution and record decoding.

use propdecode_core::{BoxError, ConversionError};

/// The destination type's declaration is malformed or self-contradictory.
///
/// Detected on first resolution, before any record is decoded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// Directive text does not follow `skip` / `rename(<name>)`.
    #[error("malformed directive '{directive}' on {type_name}.{field}: {reason}")]
    MalformedDirective {
        type_name: &'static str,
        field: &'static str,
        directive: String,
        reason: String,
    },

    /// The same directive appears more than once on a field.
    #[error("conflicting directive '{directive}' on {type_name}.{field}")]
    ConflictingDirectives {
        type_name: &'static str,
        field: &'static str,
        directive: String,
    },

    /// Two fields resolve to the same source property.
    #[error("{type_name}.{first} and {type_name}.{second} both resolve to property '{property}'")]
    DuplicateProperty {
        type_name: &'static str,
        property: String,
        first: &'static str,
        second: &'static str,
    },

    /// The same struct field is declared twice.
    #[error("field {type_name}.{field} is declared more than once")]
    DuplicateField {
        type_name: &'static str,
        field: &'static str,
    },

    /// A non-skipped field has no type or setter.
    #[error("field {type_name}.{field} is not skipped but has no decoder")]
    MissingSlot {
        type_name: &'static str,
        field: &'static str,
    },
}

/// Error returned by [`Decoder::decode`](crate::Decoder::decode).
///
/// Exactly one error surfaces per failed call; `record` is the zero-based
/// position of the failing source record.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A present value cannot be represented in the field's type.
    #[error("record {record}: cannot decode property '{property}' into field '{field}': {source}")]
    Conversion {
        record: usize,
        property: String,
        field: &'static str,
        #[source]
        source: ConversionError,
    },

    /// A required property is absent and missing fields are not allowed.
    #[error("record {record}: property '{property}' for field '{field}' is missing")]
    MissingField {
        record: usize,
        property: String,
        field: &'static str,
    },

    /// The record's self-decoding hook failed. The hook's error is kept as the
    /// source unchanged.
    #[error("record {record}: unmarshal hook failed: {source}")]
    Unmarshal {
        record: usize,
        #[source]
        source: BoxError,
    },

    /// The raw object handle failed to produce a property.
    #[error("record {record}: failed to fetch property '{property}': {source}")]
    Source {
        record: usize,
        property: String,
        #[source]
        source: BoxError,
    },
}

impl DecodeError {
    /// Position of the failing record, if the error is tied to one.
    pub fn record(&self) -> Option<usize> {
        match self {
            DecodeError::Schema(_) => None,
            DecodeError::Conversion { record, .. }
            | DecodeError::MissingField { record, .. }
            | DecodeError::Unmarshal { record, .. }
            | DecodeError::Source { record, .. } => Some(*record),
        }
    }
}
