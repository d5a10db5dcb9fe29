//! Decode dynamically typed property records into strongly typed structs.
//!
//! A destination type describes its fields through [`Record`], usually via
//! `#[derive(Record)]`:
//!
//! ```
//! use propdecode::{Decoder, Record, SourceRecord};
//!
//! #[derive(Debug, Default, Record)]
//! struct Process {
//!     #[prop(rename = "ProcessId")]
//!     pid: u32,
//!     #[prop(rename = "Name")]
//!     name: String,
//!     #[prop(rename = "Description")]
//!     description: Option<String>,
//!     #[prop(skip)]
//!     note: String,
//! }
//!
//! let rows = vec![SourceRecord::new().with("ProcessId", 4_u32).with("Name", "System")];
//! let processes: Vec<Process> = Decoder::new().decode(rows).unwrap();
//! assert_eq!(processes[0].pid, 4);
//! assert_eq!(processes[0].description, None);
//! ```
//!
//! Types that implement [`Unmarshal`] and declare
//! [`Declaration::self_decoding`] receive each raw [`SourceObject`] instead.

mod client;
mod decoder;
mod error;
pub mod schema;

pub use client::{Client, QueryError, SourceEnumerator};
pub use decoder::{DecodeOptions, Decoder, DecoderBuilder, decode};
pub use error::{DecodeError, SchemaError};
pub use propdecode_core as core;
pub use propdecode_core::{
    Assign, BoxError, ConversionError, Declaration, FieldDecl, FieldSlot, FieldType, FromValue,
    Record, SourceObject, SourceRecord, TypeKind, Unmarshal, UnmarshalFn, Value,
};
pub use propdecode_derive::Record;
pub use schema::{Schema, SchemaEntry};
