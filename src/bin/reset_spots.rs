//! Script to reset the demo parking spots back to AVAILABLE.

use parklens::config::Config;
use parklens::firestore::FirestoreClient;
use parklens::reset::{reset_spot, ResetOutcome, SPOT_IDS};

/// Main entry point for the reset script.
///
/// Looks up each fixed spot id; missing spots are reported and skipped, found
/// spots get the canonical AVAILABLE field set written back. Running it twice
/// leaves the documents in the same state.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("{}", "=".repeat(60));
    println!("Resetting Parking Spots to AVAILABLE");
    println!("{}", "=".repeat(60));

    let config = Config::from_env()?;
    let client = FirestoreClient::new(
        config.firestore_base_url.clone(),
        config.project_id.clone(),
        config.access_token.clone(),
    )?;

    println!("\nResetting {} spots...\n", SPOT_IDS.len());

    for spot_id in SPOT_IDS {
        match reset_spot(&client, spot_id).await? {
            ResetOutcome::Missing => {
                println!("⚠️  {}: Not found, skipping", spot_id);
            }
            ResetOutcome::Reset {
                spot_code,
                prior_status,
                prior_car,
            } => {
                println!("📍 {} ({}):", spot_id, spot_code);
                println!("   Current: {}, Car: {}", prior_status, prior_car);
                println!("   ✅ Reset to AVAILABLE\n");
            }
        }
    }

    println!("{}", "=".repeat(60));
    println!("✅ All spots reset successfully!");
    println!("{}", "=".repeat(60));

    Ok(())
}
