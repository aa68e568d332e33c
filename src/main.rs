use parklens::config::Config;
use parklens::extract::{SchemaExtractor, DATA_DUMP_FILE, ERD_FILE};
use parklens::firestore::FirestoreClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the extractor/analyzer.
///
/// Connects to Firestore, extracts the fixed collections, prints the schema
/// summary and statistics, then writes the JSON dump and the ERD file. Any
/// failure past the per-collection fetch tier terminates the run non-zero.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parklens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("{}", "=".repeat(60));
    println!("  🚗 ParkLens Firestore Database Analyzer");
    println!("  📊 Extract, Analyze & Generate ERD");
    println!("{}", "=".repeat(60));

    // Load configuration
    let config = Config::from_env()?;

    // Single client handle, reused for the whole run
    let client = FirestoreClient::new(
        config.firestore_base_url.clone(),
        config.project_id.clone(),
        config.access_token.clone(),
    )?;
    tracing::info!("Firestore client initialized for {}", config.project_id);

    let mut extractor = SchemaExtractor::new(client);
    extractor.extract_all().await?;

    extractor.print_reports();

    extractor.save_dump(DATA_DUMP_FILE).await?;
    extractor.save_erd(ERD_FILE).await?;

    println!("\n📌 Next steps:");
    println!("   1. Open https://dbdiagram.io/d");
    println!("   2. Paste the contents of {}", ERD_FILE);
    println!("   3. Visualize your database schema!");

    println!("\n{}", "=".repeat(60));
    println!("✨ Analysis Complete!");
    println!("{}", "=".repeat(60));

    Ok(())
}
