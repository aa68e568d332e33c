use crate::extract::DocumentStore;
use crate::value::{Document, FieldValue, DOC_ID_FIELD};
use chrono::{Local, TimeZone};
use serde_json::{json, Map, Value};

/// Converts one field value into its dump representation.
///
/// Timestamps become local-time ISO-8601 strings at second precision (the
/// format the original dump artifact used); maps and arrays recurse so nested
/// structure survives serialization.
pub fn dump_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Boolean(b) => json!(b),
        FieldValue::Integer(i) => json!(i),
        FieldValue::Double(d) => json!(d),
        FieldValue::Str(s) => json!(s),
        FieldValue::Timestamp(ts) => {
            let local = Local
                .timestamp_opt(ts.timestamp(), 0)
                .single()
                .unwrap_or_else(|| Local.timestamp_opt(0, 0).unwrap());
            json!(local.format("%Y-%m-%dT%H:%M:%S").to_string())
        }
        FieldValue::Map(map) => {
            let obj: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), dump_value(v)))
                .collect();
            Value::Object(obj)
        }
        FieldValue::Array(items) => Value::Array(items.iter().map(dump_value).collect()),
        FieldValue::Other(raw) => raw.clone(),
    }
}

fn dump_document(document: &Document) -> Value {
    let mut obj = Map::new();
    obj.insert(DOC_ID_FIELD.to_string(), json!(document.id));
    for (field, value) in &document.fields {
        obj.insert(field.clone(), dump_value(value));
    }
    Value::Object(obj)
}

/// Builds the full dump: collection name -> documents in retrieval order.
pub fn render_dump(store: &DocumentStore) -> Value {
    let mut out = Map::new();
    for (collection, documents) in store {
        let docs: Vec<Value> = documents.iter().map(dump_document).collect();
        out.insert(collection.clone(), Value::Array(docs));
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn timestamps_dump_as_local_iso_strings() {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let dumped = dump_value(&FieldValue::Timestamp(ts));
        let s = dumped.as_str().expect("timestamp should dump as a string");
        // Second precision, no offset suffix
        assert_eq!(s.len(), 19);
        assert!(s.contains('T'));
    }

    #[test]
    fn nested_structure_survives() {
        let mut inner = std::collections::BTreeMap::new();
        inner.insert("lat".to_string(), FieldValue::Double(1.5));
        let value = FieldValue::Array(vec![FieldValue::Map(inner), FieldValue::Integer(3)]);

        let dumped = dump_value(&value);
        assert_eq!(dumped[0]["lat"], json!(1.5));
        assert_eq!(dumped[1], json!(3));
    }

    #[test]
    fn dump_injects_document_id() {
        let mut store = DocumentStore::new();
        let mut doc = Document::new("u1");
        doc.fields
            .insert("name".to_string(), FieldValue::Str("Alice".into()));
        store.insert("users".to_string(), vec![doc]);

        let dump = render_dump(&store);
        assert_eq!(dump["users"][0]["_id"], json!("u1"));
        assert_eq!(dump["users"][0]["name"], json!("Alice"));
    }
}
