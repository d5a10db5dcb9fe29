//! Destination record contracts: field declaration tables and the
//! self-decoding capability.

use std::{borrow::Cow, fmt};

use crate::{
    coerce::FromValue,
    error::{BoxError, ConversionError},
    source::SourceObject,
    types::FieldType,
    value::Value,
};

/// Assigns a coerced value to one field of `T`.
pub type Assign<T> = fn(&mut T, &Value) -> Result<(), ConversionError>;

/// Populates a whole `T` from a raw object handle.
pub type UnmarshalFn<T> = fn(&mut T, &dyn SourceObject) -> Result<(), BoxError>;

/// A typed record shape that the decoder can produce.
///
/// Usually implemented through `#[derive(Record)]`. `Default` supplies the
/// zero value that unset fields keep.
pub trait Record: Default + 'static {
    fn declaration() -> Declaration<Self>;
}

/// Self-decoding capability.
///
/// Records implementing this take full responsibility for their population
/// from the raw object, bypassing field resolution and coercion.
pub trait Unmarshal {
    fn unmarshal(&mut self, src: &dyn SourceObject) -> Result<(), BoxError>;
}

/// How a [`Record`] wants to be decoded.
pub enum Declaration<T> {
    /// Generic path: one declaration per struct field, in declaration order.
    Fields(Vec<FieldDecl<T>>),
    /// Capability path: the hook receives every raw object.
    SelfDecoding(UnmarshalFn<T>),
}

impl<T: Unmarshal> Declaration<T> {
    pub fn self_decoding() -> Self {
        Declaration::SelfDecoding(<T as Unmarshal>::unmarshal)
    }
}

impl<T> fmt::Debug for Declaration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            Declaration::SelfDecoding(_) => f.write_str("SelfDecoding"),
        }
    }
}

/// Type and setter of a decodable field.
pub struct FieldSlot<T> {
    pub ty: FieldType,
    pub assign: Assign<T>,
}

/// One struct field as declared on the destination type.
///
/// `directive` holds the raw directive text (`rename(Name)`, `skip`, or a
/// comma-separated combination); it is validated when the schema is resolved.
pub struct FieldDecl<T> {
    pub field: &'static str,
    pub directive: Option<Cow<'static, str>>,
    pub slot: Option<FieldSlot<T>>,
}

impl<T> FieldDecl<T> {
    pub fn new(field: &'static str, ty: FieldType, assign: Assign<T>) -> Self {
        Self {
            field,
            directive: None,
            slot: Some(FieldSlot { ty, assign }),
        }
    }

    /// Declare a field whose type is decoded through [`FromValue`].
    pub fn typed<V: FromValue>(field: &'static str, assign: Assign<T>) -> Self {
        Self::new(field, V::field_type(), assign)
    }

    /// Declare a field that never takes part in decoding.
    pub fn skipped(field: &'static str) -> Self {
        Self {
            field,
            directive: Some(Cow::Borrowed("skip")),
            slot: None,
        }
    }

    /// Append raw directive text.
    pub fn directive(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        let text = text.into();
        self.directive = Some(match self.directive.take() {
            Some(existing) => Cow::Owned(format!("{existing}, {text}")),
            None => text,
        });
        self
    }

    pub fn rename(self, property: &str) -> Self {
        self.directive(format!("rename({property})"))
    }
}

impl<T> fmt::Debug for FieldDecl<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDecl")
            .field("field", &self.field)
            .field("directive", &self.directive)
            .field("ty", &self.slot.as_ref().map(|slot| &slot.ty))
            .finish()
    }
}
