use crate::dump;
use crate::erd;
use crate::errors::{AppError, ResultExt};
use crate::firestore::FirestoreClient;
use crate::report;
use crate::schema::SchemaInventory;
use crate::value::Document;
use chrono::Local;
use std::collections::BTreeMap;
use std::path::Path;

/// All captured documents, keyed by collection, in retrieval order.
/// Collections that yielded nothing (or failed to fetch) map to empty lists.
pub type DocumentStore = BTreeMap<String, Vec<Document>>;

/// The collections the parking app writes, from the mobile app's data layer.
pub const COLLECTIONS: &[&str] = &[
    "users",
    "parking_lots",
    "parking_spots",
    "parking_sessions",
    "reservations",
    "vehicles",
    "notifications",
];

/// Output artifact paths. Fixed by design; there are no CLI flags.
pub const DATA_DUMP_FILE: &str = "parking_data_dump.json";
pub const ERD_FILE: &str = "parking_schema.dbdiagram";

/// Walks the fixed collections, capturing documents and accumulating the
/// schema inventory. Owns the client for the duration of one run.
pub struct SchemaExtractor {
    client: FirestoreClient,
    pub store: DocumentStore,
    pub inventory: SchemaInventory,
}

impl SchemaExtractor {
    pub fn new(client: FirestoreClient) -> Self {
        Self {
            client,
            store: DocumentStore::new(),
            inventory: SchemaInventory::new(),
        }
    }

    /// Extracts every fixed collection in order.
    ///
    /// A fetch failure on one collection is the single non-fatal error tier:
    /// it is logged, the collection is recorded as empty, and the walk
    /// continues with the rest.
    pub async fn extract_all(&mut self) -> Result<(), AppError> {
        println!("\n📊 Extracting data from Firestore...");
        println!("{}", "=".repeat(60));

        for collection in COLLECTIONS {
            println!("\n📁 Collection: {}", collection);
            match self.client.list_documents(collection).await {
                Ok(documents) => {
                    for document in &documents {
                        self.inventory.record(collection, document);
                    }
                    println!("   ✓ Extracted {} documents", documents.len());
                    self.store.insert(collection.to_string(), documents);
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch {}: {}", collection, e);
                    println!("   ✗ Error: {}", e);
                    self.store.insert(collection.to_string(), Vec::new());
                }
            }
        }

        println!("\n{}", "=".repeat(60));
        println!("✓ Extraction complete!\n");
        Ok(())
    }

    /// Writes the pretty-printed JSON dump, overwriting any previous run.
    pub async fn save_dump(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        println!("\n💾 Saving data to {}...", path.display());

        let dump = dump::render_dump(&self.store);
        let pretty = serde_json::to_string_pretty(&dump)?;
        tokio::fs::write(path, pretty)
            .await
            .context(format!("writing data dump to {}", path.display()))?;

        println!("   ✓ Data saved successfully!\n");
        Ok(())
    }

    /// Renders the ERD (stamped with the current local time) and writes it.
    pub async fn save_erd(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        let erd = erd::render_erd(&self.inventory, Local::now());
        tokio::fs::write(path, erd)
            .await
            .context(format!("writing ERD to {}", path.display()))?;

        println!("\n✅ ERD saved to: {}", path.display());
        Ok(())
    }

    /// Prints the schema summary and document statistics to stdout.
    pub fn print_reports(&self) {
        print!("\n{}", report::render_summary(&self.inventory));
        print!("\n{}", report::render_counts(&self.store));
    }
}
