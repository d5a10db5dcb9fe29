//! Record decoder: projects source objects into typed records.

use std::sync::Arc;

use propdecode_core::{Declaration, Record, SourceObject, UnmarshalFn, Value};
use tracing::{debug, trace};

use crate::{
    error::DecodeError,
    schema::{Schema, resolve},
};

/// Decode configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// When `false` (default), every non-skipped, non-optional field must
    /// receive a value. When `true`, absent or null properties leave the field
    /// at its `Default` value.
    pub allow_missing_fields: bool,
}

/// Decodes sequences of [`SourceObject`]s into [`Record`]s.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

/// Builder for configuring [`Decoder`].
#[derive(Debug, Clone, Default)]
pub struct DecoderBuilder {
    options: DecodeOptions,
}

impl DecoderBuilder {
    pub fn allow_missing_fields(mut self, allow: bool) -> Self {
        self.options.allow_missing_fields = allow;
        self
    }

    pub fn build(self) -> Decoder {
        Decoder::with_options(self.options)
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for [`Decoder`].
    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DecodeOptions {
        &mut self.options
    }

    /// Decode every object, in order.
    ///
    /// Types declared as self-decoding are handed each raw object; all other
    /// types go through the cached schema and per-field coercion. The first
    /// error aborts the call and no partial output is returned.
    pub fn decode<T, I>(&self, objects: I) -> Result<Vec<T>, DecodeError>
    where
        T: Record,
        I: IntoIterator,
        I::Item: SourceObject,
    {
        let record_type = std::any::type_name::<T>();
        let path = DecodePath::<T>::select()?;
        debug!(record_type, self_decoding = path.is_hook(), "decoding records");

        let records = objects
            .into_iter()
            .enumerate()
            .map(|(record, object)| self.decode_record(&path, record, &object))
            .collect::<Result<Vec<T>, _>>()?;

        debug!(record_type, count = records.len(), "decoded records");
        Ok(records)
    }

    /// Decode a single object, reported as record 0 on failure.
    pub fn decode_one<T: Record>(&self, object: impl SourceObject) -> Result<T, DecodeError> {
        let path = DecodePath::<T>::select()?;
        self.decode_record(&path, 0, &object)
    }

    fn decode_record<T: Record>(
        &self,
        path: &DecodePath<T>,
        record: usize,
        object: &impl SourceObject,
    ) -> Result<T, DecodeError> {
        match path {
            DecodePath::Hook(hook) => unmarshal(*hook, record, object),
            DecodePath::Fields(schema) => self.decode_fields(schema, record, object),
        }
    }

    fn decode_fields<T: Record>(
        &self,
        schema: &Schema<T>,
        record: usize,
        object: &impl SourceObject,
    ) -> Result<T, DecodeError> {
        let allow_missing = self.options.allow_missing_fields;
        let mut out = T::default();

        for (entry, slot) in schema.decoded_entries() {
            let fetched =
                object
                    .property(&entry.property)
                    .map_err(|source| DecodeError::Source {
                        record,
                        property: entry.property.clone(),
                        source,
                    })?;

            let value = match fetched {
                None | Some(Value::Null) if slot.ty.optional => Value::Null,
                None if allow_missing => continue,
                None => {
                    return Err(DecodeError::MissingField {
                        record,
                        property: entry.property.clone(),
                        field: entry.field,
                    });
                }
                Some(Value::Null) if allow_missing => continue,
                Some(value) => value,
            };

            (slot.assign)(&mut out, &value).map_err(|source| DecodeError::Conversion {
                record,
                property: entry.property.clone(),
                field: entry.field,
                source,
            })?;
        }

        trace!(record_type = schema.type_name(), record, "decoded record");
        Ok(out)
    }
}

/// Per-type decoding route, chosen once per call.
enum DecodePath<T> {
    Hook(UnmarshalFn<T>),
    Fields(Arc<Schema<T>>),
}

impl<T: Record> DecodePath<T> {
    fn select() -> Result<Self, DecodeError> {
        match T::declaration() {
            Declaration::SelfDecoding(hook) => Ok(DecodePath::Hook(hook)),
            Declaration::Fields(_) => Ok(DecodePath::Fields(resolve::<T>()?)),
        }
    }

    fn is_hook(&self) -> bool {
        matches!(self, DecodePath::Hook(_))
    }
}

fn unmarshal<T: Record>(
    hook: UnmarshalFn<T>,
    record: usize,
    object: &impl SourceObject,
) -> Result<T, DecodeError> {
    let mut out = T::default();
    hook(&mut out, object).map_err(|source| DecodeError::Unmarshal { record, source })?;
    trace!(record, "unmarshalled record");
    Ok(out)
}

/// Decode `objects` into `T` with a one-off [`Decoder`].
pub fn decode<T, I>(objects: I, options: DecodeOptions) -> Result<Vec<T>, DecodeError>
where
    T: Record,
    I: IntoIterator,
    I::Item: SourceObject,
{
    Decoder::with_options(options).decode(objects)
}
