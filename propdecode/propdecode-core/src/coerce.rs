//! Conversion from dynamic [`Value`]s into static destination types.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};

use crate::{
    datetime::{parse_cim_datetime, parse_cim_interval},
    error::ConversionError,
    types::{FieldType, TypeKind},
    value::Value,
};

/// A destination field type that can be decoded from a [`Value`].
///
/// Implementations must be pure: no side effects beyond returning the
/// converted value or an error.
pub trait FromValue: Sized {
    /// Static description used by the schema resolver and in error messages.
    fn field_type() -> FieldType;

    fn from_value(value: &Value) -> Result<Self, ConversionError>;
}

/// Build the error for a value kind that `T` does not accept.
pub fn mismatch<T: FromValue>(value: &Value) -> ConversionError {
    ConversionError::mismatch(value.kind_name(), T::field_type().to_string())
}

// Any integer kind into any integer type; only the numeric range decides.
macro_rules! impl_integer {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn field_type() -> FieldType {
                    FieldType::required(TypeKind::$kind)
                }

                fn from_value(value: &Value) -> Result<Self, ConversionError> {
                    let wide = value.as_i128().ok_or_else(|| mismatch::<Self>(value))?;
                    <$ty>::try_from(wide)
                        .map_err(|_| ConversionError::out_of_range(wide, TypeKind::$kind.type_name()))
                }
            }
        )*
    };
}

impl_integer! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

impl FromValue for bool {
    fn field_type() -> FieldType {
        FieldType::required(TypeKind::Bool)
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(v) => Ok(*v),
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl FromValue for String {
    fn field_type() -> FieldType {
        FieldType::required(TypeKind::String)
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::String(v) => Ok(v.to_string()),
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl FromValue for f64 {
    fn field_type() -> FieldType {
        FieldType::required(TypeKind::F64)
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::F32(v) => Ok(f64::from(*v)),
            Value::F64(v) => Ok(*v),
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl FromValue for f32 {
    fn field_type() -> FieldType {
        FieldType::required(TypeKind::F32)
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::F32(v) => Ok(*v),
            Value::F64(v) => {
                let narrow = *v as f32;
                if f64::from(narrow) == *v || v.is_nan() {
                    Ok(narrow)
                } else {
                    Err(ConversionError::out_of_range(v, TypeKind::F32.type_name()))
                }
            }
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl FromValue for DateTime<FixedOffset> {
    fn field_type() -> FieldType {
        FieldType::required(TypeKind::DateTime)
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::DateTime(text) => parse_cim_datetime(text),
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn field_type() -> FieldType {
        FieldType::required(TypeKind::DateTime)
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        DateTime::<FixedOffset>::from_value(value).map(|dt| dt.with_timezone(&Utc))
    }
}

impl FromValue for Duration {
    fn field_type() -> FieldType {
        FieldType::required(TypeKind::Duration)
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::DateTime(text) => parse_cim_interval(text),
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::required(TypeKind::List(Box::new(T::field_type().kind)))
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    T::from_value(item).map_err(|e| ConversionError::Element {
                        index,
                        source: Box::new(e),
                    })
                })
                .collect(),
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn field_type() -> FieldType {
        FieldType::new(T::field_type().kind, true)
    }

    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
