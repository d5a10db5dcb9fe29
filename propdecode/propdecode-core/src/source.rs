//! Source records and the raw object contract consumed by the decoder.

use std::sync::Arc;

use crate::{error::BoxError, value::Value};

/// Raw handle to one object of the external system.
///
/// Self-decoding records receive this handle directly; the generic path uses
/// it to fetch one property per declared field.
pub trait SourceObject {
    /// Fetch a property by name.
    ///
    /// `Ok(None)` means the object has no such property. `Err` is reserved for
    /// failures of the handle itself.
    fn property(&self, name: &str) -> Result<Option<Value>, BoxError>;
}

impl<O: SourceObject + ?Sized> SourceObject for &O {
    fn property(&self, name: &str) -> Result<Option<Value>, BoxError> {
        (**self).property(name)
    }
}

impl<O: SourceObject + ?Sized> SourceObject for Box<O> {
    fn property(&self, name: &str) -> Result<Option<Value>, BoxError> {
        (**self).property(name)
    }
}

impl<O: SourceObject + ?Sized> SourceObject for Arc<O> {
    fn property(&self, name: &str) -> Result<Option<Value>, BoxError> {
        (**self).property(name)
    }
}

/// One materialized row of `name -> value` pairs, in source order.
///
/// Property names are matched ASCII case-insensitively, mirroring the naming
/// rules of the external object model. The first matching entry wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRecord {
    properties: Vec<(Arc<str>, Value)>,
}

impl SourceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a property and return the record, for building rows inline.
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<Value>) {
        self.properties
            .push((Arc::from(name.as_ref()), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn get_exact(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(key, _)| key.as_ref() == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties
            .iter()
            .map(|(key, value)| (key.as_ref(), value))
    }
}

impl SourceObject for SourceRecord {
    fn property(&self, name: &str) -> Result<Option<Value>, BoxError> {
        Ok(self.get(name).cloned())
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for SourceRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = SourceRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}
