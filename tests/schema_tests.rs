/// End-to-end tests for the inference -> report -> ERD path, built around the
/// worked examples from the schema analyzer's contract.
use chrono::{Local, TimeZone};
use parklens::dump::render_dump;
use parklens::erd::render_erd;
use parklens::extract::DocumentStore;
use parklens::report::{render_counts, render_summary};
use parklens::schema::{FieldType, SchemaInventory};
use parklens::value::{Document, FieldValue};
use std::collections::BTreeSet;

fn doc(id: &str, fields: Vec<(&str, FieldValue)>) -> Document {
    let mut d = Document::new(id);
    for (k, v) in fields {
        d.fields.insert(k.to_string(), v);
    }
    d
}

/// The two parking_spots documents used as the reference example.
fn spots() -> Vec<Document> {
    vec![
        doc(
            "spot_001",
            vec![
                ("status", FieldValue::Str("OCCUPIED".into())),
                ("lot_id", FieldValue::Str("lotA".into())),
                ("capacity", FieldValue::Integer(2)),
            ],
        ),
        doc("spot_002", vec![("lot_id", FieldValue::Null)]),
    ]
}

fn spots_inventory() -> SchemaInventory {
    let mut inv = SchemaInventory::new();
    for d in spots() {
        inv.record("parking_spots", &d);
    }
    inv
}

#[test]
fn reference_example_inventory() {
    let inv = spots_inventory();

    let lot_id: &BTreeSet<FieldType> = inv.field_types("parking_spots", "lot_id").unwrap();
    let expected: BTreeSet<_> = [FieldType::Varchar, FieldType::Null].into_iter().collect();
    assert_eq!(lot_id, &expected);

    let status = inv.field_types("parking_spots", "status").unwrap();
    assert_eq!(status.len(), 1);
    assert!(status.contains(&FieldType::Varchar));

    let capacity = inv.field_types("parking_spots", "capacity").unwrap();
    assert_eq!(capacity.len(), 1);
    assert!(capacity.contains(&FieldType::Integer));
}

#[test]
fn inventory_never_contains_unobserved_tags() {
    let inv = spots_inventory();
    // capacity appeared only in spot_001 as an integer; its absence in
    // spot_002 must not add a NULL tag
    let capacity = inv.field_types("parking_spots", "capacity").unwrap();
    assert!(!capacity.contains(&FieldType::Null));
}

#[test]
fn summary_renders_sorted_tags() {
    let inv = spots_inventory();
    let summary = render_summary(&inv);

    assert!(summary.contains("PARKING_SPOTS"));
    // NULL | VARCHAR in lexicographic tag order
    assert!(summary.contains("NULL | VARCHAR"));
    assert!(summary.contains("INTEGER"));
}

#[test]
fn counts_cover_all_collections_including_empty() {
    let mut store = DocumentStore::new();
    store.insert("parking_spots".to_string(), spots());
    store.insert("users".to_string(), vec![]);

    let counts = render_counts(&store);
    assert!(counts.contains("Total Collections: 2"));
    assert!(counts.contains("Total Documents:   2"));
    assert!(counts.contains("users"));
}

#[test]
fn erd_reference_example() {
    let inv = spots_inventory();
    let erd = render_erd(&inv, Local.with_ymd_and_hms(2026, 1, 10, 9, 30, 0).unwrap());

    assert!(erd.contains("Table parking_spots {"));
    // lot_id is foreign-key shaped but does not match parking_spot_id, so no pk
    assert!(erd.contains("  lot_id varchar\n"));
    assert!(erd.contains("  capacity int\n"));
    assert!(erd.contains("  _id varchar [pk]\n"));
}

#[test]
fn erd_emits_relationship_only_when_both_ends_exist() {
    // parking_lots not observed: no edge
    let erd = render_erd(
        &spots_inventory(),
        Local.with_ymd_and_hms(2026, 1, 10, 9, 30, 0).unwrap(),
    );
    assert!(!erd.contains("Ref: parking_spots.lot_id"));

    // Observe a lot document: exactly one edge appears
    let mut inv = spots_inventory();
    inv.record(
        "parking_lots",
        &doc("lotA", vec![("name", FieldValue::Str("Main Lot".into()))]),
    );
    let erd = render_erd(&inv, Local.with_ymd_and_hms(2026, 1, 10, 9, 30, 0).unwrap());
    assert_eq!(
        erd.matches("Ref: parking_spots.lot_id > parking_lots._id")
            .count(),
        1
    );
}

#[test]
fn erd_sorts_collections_lexicographically() {
    let mut inv = SchemaInventory::new();
    inv.record("vehicles", &doc("v1", vec![]));
    inv.record("notifications", &doc("n1", vec![]));

    let erd = render_erd(&inv, Local.with_ymd_and_hms(2026, 1, 10, 9, 30, 0).unwrap());
    let notifications = erd.find("Table notifications").unwrap();
    let vehicles = erd.find("Table vehicles").unwrap();
    assert!(notifications < vehicles);
}

#[test]
fn erd_for_empty_inventory_is_header_only() {
    let inv = SchemaInventory::new();
    let erd = render_erd(&inv, Local.with_ymd_and_hms(2026, 1, 10, 9, 30, 0).unwrap());
    assert!(erd.contains("// Smart Parking Database Schema"));
    assert!(erd.contains("// Relationships"));
    assert!(!erd.contains("Table "));
    assert!(!erd.contains("Ref: "));
}

#[test]
fn dump_preserves_retrieval_order_and_ids() {
    let mut store = DocumentStore::new();
    store.insert("parking_spots".to_string(), spots());

    let dump = render_dump(&store);
    let docs = dump["parking_spots"].as_array().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["_id"], "spot_001");
    assert_eq!(docs[1]["_id"], "spot_002");
    assert_eq!(docs[1]["lot_id"], serde_json::Value::Null);
}
