//! Static descriptions of destination field types.

use std::fmt::{Display, Formatter, Result};

/// Destination type kind of a record field.
///
/// Variant names mirror [`Value`](crate::Value) where a direct counterpart
/// exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    DateTime,
    Duration,
    List(Box<TypeKind>),
    /// User-provided [`FromValue`](crate::FromValue) implementation.
    Custom(&'static str),
}

impl TypeKind {
    pub fn type_name(&self) -> String {
        match self {
            TypeKind::Bool => "bool".into(),
            TypeKind::I8 => "i8".into(),
            TypeKind::I16 => "i16".into(),
            TypeKind::I32 => "i32".into(),
            TypeKind::I64 => "i64".into(),
            TypeKind::Isize => "isize".into(),
            TypeKind::U8 => "u8".into(),
            TypeKind::U16 => "u16".into(),
            TypeKind::U32 => "u32".into(),
            TypeKind::U64 => "u64".into(),
            TypeKind::Usize => "usize".into(),
            TypeKind::F32 => "f32".into(),
            TypeKind::F64 => "f64".into(),
            TypeKind::String => "string".into(),
            TypeKind::DateTime => "datetime".into(),
            TypeKind::Duration => "duration".into(),
            TypeKind::List(elem) => format!("list<{}>", elem.type_name()),
            TypeKind::Custom(name) => (*name).into(),
        }
    }
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(&self.type_name())
    }
}

/// Static type of one destination field.
///
/// `optional` is set for types that can hold an absence marker (`Option<T>`).
/// Absent and null source values decode to that marker instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    pub kind: TypeKind,
    pub optional: bool,
}

impl FieldType {
    pub fn new(kind: TypeKind, optional: bool) -> Self {
        Self { kind, optional }
    }

    pub fn required(kind: TypeKind) -> Self {
        Self::new(kind, false)
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.optional {
            write!(f, "optional<{}>", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}
