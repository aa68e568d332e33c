use crate::extract::DocumentStore;
use crate::schema::SchemaInventory;
use std::fmt::Write;

const RULE: &str = "============================================================";
const DASH: &str = "------------------------------------------------------------";

/// Renders the per-collection field/type summary.
///
/// Collections, fields and tags all come out lexicographically sorted, so the
/// same inventory always renders the same text.
pub fn render_summary(inventory: &SchemaInventory) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "📋 DATABASE SCHEMA SUMMARY");
    let _ = writeln!(out, "{}", RULE);

    for (collection, fields) in inventory.collections() {
        let _ = writeln!(out);
        let _ = writeln!(out, "📦 {}", collection.to_uppercase());
        let _ = writeln!(out, "{}", DASH);

        for (field, types) in fields {
            // Tags sort lexicographically here, not by inference priority
            let mut tags: Vec<&str> = types.iter().map(|t| t.tag()).collect();
            tags.sort_unstable();
            let _ = writeln!(out, "   • {:<30} : {}", field, tags.join(" | "));
        }
    }

    out
}

/// Renders per-collection document counts plus totals.
pub fn render_counts(store: &DocumentStore) -> String {
    let total_docs: usize = store.values().map(|docs| docs.len()).sum();

    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "📊 DATABASE STATISTICS");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out);
    let _ = writeln!(out, "   Total Collections: {}", store.len());
    let _ = writeln!(out, "   Total Documents:   {}", total_docs);
    let _ = writeln!(out);

    for (collection, documents) in store {
        let _ = writeln!(out, "   • {:<20} : {:>4} documents", collection, documents.len());
    }

    out
}
