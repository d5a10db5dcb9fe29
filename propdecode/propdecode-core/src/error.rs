//! Error types for the coercion layer.

/// Opaque error produced by collaborators outside this crate (object handles,
/// self-decoding hooks, enumerators).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A [`Value`](crate::Value) could not be represented in a destination type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// The value kind has no conversion into the destination type.
    #[error("cannot convert {source_kind} value into {target}")]
    Mismatch {
        source_kind: &'static str,
        target: String,
    },

    /// Integer or float value does not fit the destination type.
    #[error("value {value} is out of range for {target}")]
    OutOfRange { value: String, target: String },

    /// Timestamp text does not follow the CIM datetime encoding.
    #[error("malformed timestamp '{text}': {reason}")]
    Timestamp { text: String, reason: String },

    /// An array element failed to convert.
    #[error("array element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<ConversionError>,
    },
}

impl ConversionError {
    pub fn mismatch(source_kind: &'static str, target: impl Into<String>) -> Self {
        Self::Mismatch {
            source_kind,
            target: target.into(),
        }
    }

    pub fn out_of_range(value: impl ToString, target: impl Into<String>) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
            target: target.into(),
        }
    }

    pub fn timestamp(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Timestamp {
            text: text.into(),
            reason: reason.into(),
        }
    }
}
