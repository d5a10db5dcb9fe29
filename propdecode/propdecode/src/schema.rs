//! Destination schema resolution and the process-wide schema cache.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

use propdecode_core::{Declaration, FieldDecl, FieldSlot, FieldType, Record};
use tracing::debug;

use crate::error::SchemaError;

static SCHEMAS: LazyLock<SchemaCache> = LazyLock::new(SchemaCache::default);

/// Resolved mapping from one source property to one destination field.
pub struct SchemaEntry<T> {
    pub property: String,
    pub field: &'static str,
    pub skip: bool,
    slot: Option<FieldSlot<T>>,
}

impl<T> SchemaEntry<T> {
    pub fn field_type(&self) -> Option<&FieldType> {
        self.slot.as_ref().map(|slot| &slot.ty)
    }

    pub fn is_optional(&self) -> bool {
        self.field_type().is_some_and(|ty| ty.optional)
    }
}

/// Destination schema of a record type, in field declaration order.
pub struct Schema<T> {
    type_name: &'static str,
    entries: Vec<SchemaEntry<T>>,
}

impl<T> Schema<T> {
    /// Resolve field declarations without touching the cache.
    pub fn build(type_name: &'static str, decls: Vec<FieldDecl<T>>) -> Result<Self, SchemaError> {
        let mut entries: Vec<SchemaEntry<T>> = Vec::with_capacity(decls.len());

        for decl in decls {
            let directives = match decl.directive.as_deref() {
                Some(text) => parse_directives(type_name, decl.field, text)?,
                None => Directives::default(),
            };
            if decl.slot.is_none() && !directives.skip {
                return Err(SchemaError::MissingSlot {
                    type_name,
                    field: decl.field,
                });
            }

            let property = directives
                .rename
                .unwrap_or_else(|| decl.field.to_string());

            for entry in &entries {
                if entry.field == decl.field {
                    return Err(SchemaError::DuplicateField {
                        type_name,
                        field: decl.field,
                    });
                }
                if entry.property.eq_ignore_ascii_case(&property) {
                    return Err(SchemaError::DuplicateProperty {
                        type_name,
                        property,
                        first: entry.field,
                        second: decl.field,
                    });
                }
            }

            entries.push(SchemaEntry {
                property,
                field: decl.field,
                skip: directives.skip,
                slot: decl.slot,
            });
        }

        Ok(Self { type_name, entries })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn entries(&self) -> &[SchemaEntry<T>] {
        &self.entries
    }

    /// Look up an entry by property name (ASCII case-insensitive).
    pub fn entry(&self, property: &str) -> Option<&SchemaEntry<T>> {
        self.entries
            .iter()
            .find(|entry| entry.property.eq_ignore_ascii_case(property))
    }

    /// Entries taking part in decoding, with their slots.
    pub(crate) fn decoded_entries(&self) -> impl Iterator<Item = (&SchemaEntry<T>, &FieldSlot<T>)> {
        self.entries
            .iter()
            .filter(|entry| !entry.skip)
            .filter_map(|entry| entry.slot.as_ref().map(|slot| (entry, slot)))
    }
}

/// Resolve (and memoize) the schema of `T`.
///
/// Records declared as self-decoding have no fields and resolve to an empty
/// schema.
pub fn resolve<T: Record>() -> Result<Arc<Schema<T>>, SchemaError> {
    if let Some(schema) = SCHEMAS.get::<T>() {
        return Ok(schema);
    }

    let type_name = std::any::type_name::<T>();
    let decls = match T::declaration() {
        Declaration::Fields(decls) => decls,
        Declaration::SelfDecoding(_) => Vec::new(),
    };
    let schema = Schema::build(type_name, decls)?;
    debug!(
        record_type = type_name,
        entries = schema.entries.len(),
        skipped = schema.entries.iter().filter(|e| e.skip).count(),
        "resolved record schema"
    );
    Ok(SCHEMAS.insert(schema))
}

/// Whether the schema of `T` has already been resolved in this process.
pub fn is_cached<T: Record>() -> bool {
    SCHEMAS.get::<T>().is_some()
}

#[derive(Default)]
struct SchemaCache {
    schemas: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl SchemaCache {
    fn get<T: 'static>(&self) -> Option<Arc<Schema<T>>> {
        let schemas = self.schemas.read().unwrap_or_else(PoisonError::into_inner);
        let cached = Arc::clone(schemas.get(&TypeId::of::<T>())?);
        cached.downcast().ok()
    }

    // First insert wins; a racing resolution gets the stored schema back.
    fn insert<T: 'static>(&self, schema: Schema<T>) -> Arc<Schema<T>> {
        let fresh = Arc::new(schema);
        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        let stored = Arc::clone(
            schemas
                .entry(TypeId::of::<T>())
                .or_insert_with(|| Arc::clone(&fresh) as Arc<dyn Any + Send + Sync>),
        );
        stored.downcast().unwrap_or(fresh)
    }
}

#[derive(Debug, Default)]
struct Directives {
    rename: Option<String>,
    skip: bool,
}

fn parse_directives(
    type_name: &'static str,
    field: &'static str,
    text: &str,
) -> Result<Directives, SchemaError> {
    let malformed = |reason: &str| SchemaError::MalformedDirective {
        type_name,
        field,
        directive: text.to_string(),
        reason: reason.to_string(),
    };
    let conflicting = |item: &str| SchemaError::ConflictingDirectives {
        type_name,
        field,
        directive: item.to_string(),
    };

    let mut directives = Directives::default();
    for item in text.split(',').map(str::trim) {
        if item.is_empty() {
            return Err(malformed("empty directive"));
        }

        let (word, args) = match item.find('(') {
            Some(open) => (item[..open].trim_end(), Some(&item[open..])),
            None => (item, None),
        };

        match (word, args) {
            ("skip", None) => {
                if directives.skip {
                    return Err(conflicting(item));
                }
                directives.skip = true;
            }
            ("skip", Some(_)) => return Err(malformed("skip takes no arguments")),
            ("rename", Some(args)) => {
                let name = args
                    .strip_prefix('(')
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(|| malformed("expected rename(<name>)"))?
                    .trim();
                if name.is_empty() {
                    return Err(malformed("empty property name"));
                }
                if name
                    .chars()
                    .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | ','))
                {
                    return Err(malformed("invalid character in property name"));
                }
                if directives.rename.is_some() {
                    return Err(conflicting(item));
                }
                directives.rename = Some(name.to_string());
            }
            ("rename", None) => return Err(malformed("expected rename(<name>)")),
            _ => return Err(malformed("unknown directive")),
        }
    }

    Ok(directives)
}
