use crate::schema::SchemaInventory;
use crate::value::DOC_ID_FIELD;
use chrono::{DateTime, Local};
use std::fmt::Write;

/// A hand-authored candidate foreign-key edge between two collections.
///
/// Firestore offers no relationship metadata, so the list is fixed per
/// application; an edge is only emitted when both ends were actually observed.
#[derive(Debug, Clone, Copy)]
pub struct Relationship {
    pub from_table: &'static str,
    pub from_field: &'static str,
    pub to_table: &'static str,
    pub to_field: &'static str,
}

/// Known relationships, taken from how the mobile app reads the data.
pub const RELATIONSHIPS: &[Relationship] = &[
    // Users relations
    Relationship { from_table: "parking_sessions", from_field: "user_id", to_table: "users", to_field: DOC_ID_FIELD },
    Relationship { from_table: "reservations", from_field: "user_id", to_table: "users", to_field: DOC_ID_FIELD },
    Relationship { from_table: "vehicles", from_field: "user_id", to_table: "users", to_field: DOC_ID_FIELD },
    Relationship { from_table: "notifications", from_field: "recipient_id", to_table: "users", to_field: DOC_ID_FIELD },
    // Parking lots relations
    Relationship { from_table: "parking_spots", from_field: "lot_id", to_table: "parking_lots", to_field: DOC_ID_FIELD },
    Relationship { from_table: "parking_sessions", from_field: "lot_id", to_table: "parking_lots", to_field: DOC_ID_FIELD },
    Relationship { from_table: "reservations", from_field: "lot_id", to_table: "parking_lots", to_field: DOC_ID_FIELD },
    // Parking spots relations
    Relationship { from_table: "parking_sessions", from_field: "spot_id", to_table: "parking_spots", to_field: DOC_ID_FIELD },
    // Reservations relations
    Relationship { from_table: "parking_sessions", from_field: "session_id", to_table: "reservations", to_field: DOC_ID_FIELD },
];

/// Explicit singular forms for the known collections.
///
/// Primary-key detection needs the singular table name (`users` -> `user_id`);
/// a lookup table avoids guessing at English morphology. Unknown collections
/// fall back to trailing-character truncation, which is what the matching
/// semantics were originally defined in terms of.
const SINGULAR_NAMES: &[(&str, &str)] = &[
    ("users", "user"),
    ("parking_lots", "parking_lot"),
    ("parking_spots", "parking_spot"),
    ("parking_sessions", "parking_session"),
    ("reservations", "reservation"),
    ("vehicles", "vehicle"),
    ("notifications", "notification"),
];

fn singularize(collection: &str) -> String {
    for (plural, singular) in SINGULAR_NAMES {
        if *plural == collection {
            return (*singular).to_string();
        }
    }
    let mut chopped = collection.to_string();
    chopped.pop();
    chopped
}

/// Whether a field is the table's primary key.
///
/// Only the injected id field or the exactly-derived `<singular>_id` /
/// `<singular>Id` names qualify; other `*_id` fields are foreign keys and get
/// no marker.
fn is_primary_key(collection: &str, field: &str) -> bool {
    if field == DOC_ID_FIELD {
        return true;
    }
    let singular = singularize(collection);
    field == format!("{}_id", singular) || field == format!("{}Id", singular)
}

/// Renders the inventory as a dbdiagram.io schema description.
///
/// The caller supplies the generation timestamp so rendering stays pure and
/// testable. A field observed with several types maps its smallest tag under
/// the `FieldType` order.
pub fn render_erd(inventory: &SchemaInventory, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// Smart Parking Database Schema");
    let _ = writeln!(out, "// Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "// Smart Parking Management System");
    let _ = writeln!(out);

    for (collection, fields) in inventory.collections() {
        let _ = writeln!(out, "Table {} {{", collection);

        for (field, types) in fields {
            // BTreeSet iterates in FieldType priority order; first() is the
            // deterministic pick
            let sql_type = types
                .iter()
                .next()
                .map(|t| t.sql_name())
                .unwrap_or("varchar");

            if is_primary_key(collection, field) {
                let _ = writeln!(out, "  {} {} [pk]", field, sql_type);
            } else {
                let _ = writeln!(out, "  {} {}", field, sql_type);
            }
        }

        let _ = writeln!(out, "}}");
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "// Relationships");
    for rel in RELATIONSHIPS {
        let both_ends_exist = inventory.contains_field(rel.from_table, rel.from_field)
            && inventory.contains_field(rel.to_table, rel.to_field);
        if both_ends_exist {
            let _ = writeln!(
                out,
                "Ref: {}.{} > {}.{}",
                rel.from_table, rel.from_field, rel.to_table, rel.to_field
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Document, FieldValue};
    use chrono::TimeZone;

    fn spot_inventory() -> SchemaInventory {
        let mut inv = SchemaInventory::new();
        let mut doc = Document::new("spot_001");
        doc.fields
            .insert("status".to_string(), FieldValue::Str("OCCUPIED".into()));
        doc.fields
            .insert("lot_id".to_string(), FieldValue::Str("lotA".into()));
        doc.fields
            .insert("capacity".to_string(), FieldValue::Integer(2));
        inv.record("parking_spots", &doc);

        let mut doc2 = Document::new("spot_002");
        doc2.fields.insert("lot_id".to_string(), FieldValue::Null);
        inv.record("parking_spots", &doc2);
        inv
    }

    fn render(inv: &SchemaInventory) -> String {
        let at = Local.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        render_erd(inv, at)
    }

    #[test]
    fn id_field_gets_pk_marker_but_foreign_keys_do_not() {
        let erd = render(&spot_inventory());
        assert!(erd.contains("  _id varchar [pk]"));
        // lot_id looks like a foreign key but is not the derived pk name
        assert!(erd.contains("  lot_id varchar"));
        assert!(!erd.contains("  lot_id varchar [pk]"));
    }

    #[test]
    fn multi_type_field_maps_smallest_tag() {
        let erd = render(&spot_inventory());
        // lot_id observed as {NULL, VARCHAR}; NULL is smallest and maps to varchar
        assert!(erd.contains("  lot_id varchar"));
        assert!(erd.contains("  capacity int"));
    }

    #[test]
    fn singular_table_derived_pk_matches() {
        let mut inv = SchemaInventory::new();
        let mut doc = Document::new("v1");
        doc.fields
            .insert("vehicle_id".to_string(), FieldValue::Str("v1".into()));
        inv.record("vehicles", &doc);

        let erd = render(&inv);
        assert!(erd.contains("  vehicle_id varchar [pk]"));
    }

    #[test]
    fn relationship_needs_both_ends_observed() {
        // Only parking_spots observed: the spots->lots edge must not appear
        let erd = render(&spot_inventory());
        assert!(!erd.contains("Ref: parking_spots.lot_id > parking_lots._id"));

        let mut inv = spot_inventory();
        let mut lot = Document::new("lotA");
        lot.fields
            .insert("name".to_string(), FieldValue::Str("Main".into()));
        inv.record("parking_lots", &lot);

        let erd = render(&inv);
        let edge = "Ref: parking_spots.lot_id > parking_lots._id";
        assert_eq!(erd.matches(edge).count(), 1);
    }

    #[test]
    fn header_carries_generation_timestamp() {
        let erd = render(&spot_inventory());
        assert!(erd.starts_with("// Smart Parking Database Schema\n"));
        assert!(erd.contains("// Generated: 2026-01-10 12:00:00"));
    }
}
