//! Core types for decoding dynamically typed property records.
//!
//! This crate provides the intermediate [`Value`] representation, the
//! [`SourceObject`] contract implemented by source enumerators, the
//! [`FromValue`] coercion rules, and the [`Record`] declaration tables that
//! the `propdecode` decoder consumes.

mod coerce;
mod datetime;
mod declaration;
mod error;
mod source;
mod types;
mod value;

pub use coerce::{FromValue, mismatch};
pub use datetime::{parse_cim_datetime, parse_cim_interval};
pub use declaration::{Assign, Declaration, FieldDecl, FieldSlot, Record, Unmarshal, UnmarshalFn};
pub use error::{BoxError, ConversionError};
pub use source::{SourceObject, SourceRecord};
pub use types::{FieldType, TypeKind};
pub use value::Value;
