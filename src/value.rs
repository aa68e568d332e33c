use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Name of the synthetic field carrying the store's per-document key.
///
/// Firestore keeps the document id outside the field map; we inject it under
/// this name so the dump and the schema analysis see it like any other field.
pub const DOC_ID_FIELD: &str = "_id";

/// A single decoded Firestore field value.
///
/// Timestamps are decoded into a real `chrono` type at the wire boundary, so
/// downstream classification never has to probe for timestamp-shaped objects.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Str(String),
    Timestamp(DateTime<Utc>),
    Map(BTreeMap<String, FieldValue>),
    Array(Vec<FieldValue>),
    /// Value kinds the parking app never stores (geo points, unknown kinds).
    /// Kept as raw JSON so the dump can pass them through unchanged.
    Other(Value),
}

impl FieldValue {
    /// Decodes a Firestore REST `Value` object (e.g. `{"stringValue": "x"}`).
    ///
    /// Integer values arrive as strings on the wire; references and bytes are
    /// treated as plain strings since the app stores ids as text either way.
    /// An unrecognized kind decodes to `Other` rather than failing the run.
    pub fn decode(wire: &Value) -> Result<Self, AppError> {
        let obj = wire.as_object().ok_or_else(|| {
            AppError::DecodeError(format!("expected a Firestore value object, got {}", wire))
        })?;

        let (kind, inner) = obj.iter().next().ok_or_else(|| {
            AppError::DecodeError("empty Firestore value object".to_string())
        })?;

        match kind.as_str() {
            "nullValue" => Ok(FieldValue::Null),
            "booleanValue" => inner
                .as_bool()
                .map(FieldValue::Boolean)
                .ok_or_else(|| AppError::DecodeError(format!("bad booleanValue: {}", inner))),
            "integerValue" => {
                // The REST encoding carries int64 as a JSON string
                let parsed = match inner {
                    Value::String(s) => s.parse::<i64>().ok(),
                    Value::Number(n) => n.as_i64(),
                    _ => None,
                };
                parsed
                    .map(FieldValue::Integer)
                    .ok_or_else(|| AppError::DecodeError(format!("bad integerValue: {}", inner)))
            }
            "doubleValue" => inner
                .as_f64()
                .map(FieldValue::Double)
                .ok_or_else(|| AppError::DecodeError(format!("bad doubleValue: {}", inner))),
            "stringValue" | "referenceValue" | "bytesValue" => inner
                .as_str()
                .map(|s| FieldValue::Str(s.to_string()))
                .ok_or_else(|| AppError::DecodeError(format!("bad {}: {}", kind, inner))),
            "timestampValue" => {
                let raw = inner.as_str().ok_or_else(|| {
                    AppError::DecodeError(format!("bad timestampValue: {}", inner))
                })?;
                let ts = DateTime::parse_from_rfc3339(raw).map_err(|e| {
                    AppError::DecodeError(format!("bad timestampValue {:?}: {}", raw, e))
                })?;
                Ok(FieldValue::Timestamp(ts.with_timezone(&Utc)))
            }
            "mapValue" => {
                let mut map = BTreeMap::new();
                if let Some(fields) = inner.get("fields").and_then(|f| f.as_object()) {
                    for (name, value) in fields {
                        map.insert(name.clone(), FieldValue::decode(value)?);
                    }
                }
                Ok(FieldValue::Map(map))
            }
            "arrayValue" => {
                let mut items = Vec::new();
                if let Some(values) = inner.get("values").and_then(|v| v.as_array()) {
                    for value in values {
                        items.push(FieldValue::decode(value)?);
                    }
                }
                Ok(FieldValue::Array(items))
            }
            _ => Ok(FieldValue::Other(inner.clone())),
        }
    }

    /// Encodes the value back into the Firestore REST wire form.
    ///
    /// Used for partial updates; `Other` round-trips as a string since the
    /// resetter only ever writes nulls, booleans and strings anyway.
    pub fn encode(&self) -> Value {
        match self {
            FieldValue::Null => json!({ "nullValue": null }),
            FieldValue::Boolean(b) => json!({ "booleanValue": b }),
            FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
            FieldValue::Double(d) => json!({ "doubleValue": d }),
            FieldValue::Str(s) => json!({ "stringValue": s }),
            FieldValue::Timestamp(ts) => {
                json!({ "timestampValue": ts.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true) })
            }
            FieldValue::Map(map) => {
                let fields: serde_json::Map<String, Value> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), v.encode()))
                    .collect();
                json!({ "mapValue": { "fields": fields } })
            }
            FieldValue::Array(items) => {
                let values: Vec<Value> = items.iter().map(|v| v.encode()).collect();
                json!({ "arrayValue": { "values": values } })
            }
            FieldValue::Other(v) => json!({ "stringValue": v.to_string() }),
        }
    }

    /// String accessor, `None` for non-string values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// One document: the store key plus its decoded field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Decodes a Firestore REST document resource.
    ///
    /// The document id is the last segment of the resource `name`
    /// (`projects/p/databases/(default)/documents/users/alice` -> `alice`).
    pub fn decode(wire: &Value) -> Result<Self, AppError> {
        let name = wire
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| AppError::DecodeError("document missing 'name'".to_string()))?;
        let id = name
            .rsplit('/')
            .next()
            .unwrap_or(name)
            .to_string();

        let mut fields = BTreeMap::new();
        if let Some(wire_fields) = wire.get("fields").and_then(|f| f.as_object()) {
            for (field, value) in wire_fields {
                fields.insert(field.clone(), FieldValue::decode(value)?);
            }
        }

        Ok(Self { id, fields })
    }

    /// Convenience getter for a field value.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }
}
