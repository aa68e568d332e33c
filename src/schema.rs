use crate::value::{Document, FieldValue, DOC_ID_FIELD};
use std::collections::{BTreeMap, BTreeSet};

/// Coarse SQL-flavoured type tag inferred for a field value.
///
/// The derived `Ord` doubles as the tie-break when a field was observed with
/// several types: the ERD maps the smallest tag, so rendering is
/// deterministic regardless of scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldType {
    Null,
    Boolean,
    Integer,
    Double,
    Varchar,
    Timestamp,
    Map,
    Array,
}

impl FieldType {
    /// Classifies a decoded field value.
    ///
    /// Booleans are a dedicated variant in `FieldValue`, so they can never be
    /// misread as integers; timestamps were decoded at the wire boundary, so
    /// no attribute probing happens here. Anything unrecognized falls back to
    /// `Varchar`.
    pub fn of(value: &FieldValue) -> Self {
        match value {
            FieldValue::Null => FieldType::Null,
            FieldValue::Boolean(_) => FieldType::Boolean,
            FieldValue::Integer(_) => FieldType::Integer,
            FieldValue::Double(_) => FieldType::Double,
            FieldValue::Str(_) => FieldType::Varchar,
            FieldValue::Timestamp(_) => FieldType::Timestamp,
            FieldValue::Map(_) => FieldType::Map,
            FieldValue::Array(_) => FieldType::Array,
            FieldValue::Other(_) => FieldType::Varchar,
        }
    }

    /// Display tag used by the schema summary.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldType::Null => "NULL",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Integer => "INTEGER",
            FieldType::Double => "DOUBLE",
            FieldType::Varchar => "VARCHAR",
            FieldType::Timestamp => "TIMESTAMP",
            FieldType::Map => "MAP",
            FieldType::Array => "ARRAY",
        }
    }

    /// dbdiagram.io column type for the ERD.
    pub fn sql_name(&self) -> &'static str {
        match self {
            FieldType::Integer => "int",
            FieldType::Double => "decimal",
            FieldType::Boolean => "boolean",
            FieldType::Timestamp => "timestamp",
            FieldType::Map | FieldType::Array => "json",
            FieldType::Varchar | FieldType::Null => "varchar",
        }
    }
}

/// Observed type tags per (collection, field).
///
/// Sets only ever grow; a tag is present iff at least one scanned document
/// exhibited that coarse type for that field. `BTreeMap`/`BTreeSet` keep the
/// rendering order stable without re-sorting at print time.
#[derive(Debug, Default)]
pub struct SchemaInventory {
    collections: BTreeMap<String, BTreeMap<String, BTreeSet<FieldType>>>,
}

impl SchemaInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one document's fields into the inventory.
    ///
    /// The store key is injected as the synthetic `_id` field (always a
    /// string). Infallible: unknown value shapes classify as VARCHAR.
    pub fn record(&mut self, collection: &str, document: &Document) {
        let fields = self.collections.entry(collection.to_string()).or_default();

        fields
            .entry(DOC_ID_FIELD.to_string())
            .or_default()
            .insert(FieldType::Varchar);

        for (field, value) in &document.fields {
            fields
                .entry(field.clone())
                .or_default()
                .insert(FieldType::of(value));
        }
    }

    /// Collections that contributed at least one document, sorted.
    pub fn collections(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, BTreeSet<FieldType>>)> {
        self.collections.iter().map(|(name, f)| (name.as_str(), f))
    }

    pub fn contains_collection(&self, collection: &str) -> bool {
        self.collections.contains_key(collection)
    }

    /// Whether a field was ever observed in a collection (the injected `_id`
    /// counts once the collection has any document).
    pub fn contains_field(&self, collection: &str, field: &str) -> bool {
        self.collections
            .get(collection)
            .map(|fields| fields.contains_key(field))
            .unwrap_or(false)
    }

    pub fn field_types(&self, collection: &str, field: &str) -> Option<&BTreeSet<FieldType>> {
        self.collections.get(collection).and_then(|f| f.get(field))
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
