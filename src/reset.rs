use crate::errors::AppError;
use crate::firestore::FirestoreClient;
use crate::value::FieldValue;
use std::collections::BTreeMap;

/// Collection holding the spot documents.
pub const SPOTS_COLLECTION: &str = "parking_spots";

/// The demo spots the reset targets.
pub const SPOT_IDS: &[&str] = &["spot_001", "spot_002", "spot_003"];

/// What happened to one spot during a reset run.
#[derive(Debug, Clone, PartialEq)]
pub enum ResetOutcome {
    /// The spot was found and rewritten to AVAILABLE.
    Reset {
        spot_code: String,
        prior_status: String,
        prior_car: String,
    },
    /// No document with that id; skipped without writing.
    Missing,
}

/// The canonical AVAILABLE field set.
///
/// Both snake_case and camelCase occupant fields get cleared since older app
/// builds wrote the camelCase variants. Only these fields are touched; the
/// update mask leaves everything else on the document alone.
pub fn available_fields() -> BTreeMap<String, FieldValue> {
    let mut fields = BTreeMap::new();
    fields.insert("status".to_string(), FieldValue::Str("AVAILABLE".into()));
    fields.insert("is_available".to_string(), FieldValue::Boolean(true));
    fields.insert("is_occupied".to_string(), FieldValue::Boolean(false));
    fields.insert("is_reserved".to_string(), FieldValue::Boolean(false));
    fields.insert("current_car_label".to_string(), FieldValue::Null);
    fields.insert("currentCarLabel".to_string(), FieldValue::Null);
    fields.insert("occupied_by_session_id".to_string(), FieldValue::Null);
    fields.insert("currentSessionId".to_string(), FieldValue::Null);
    fields.insert("reserved_by_user_id".to_string(), FieldValue::Null);
    fields
}

fn display_str(value: Option<&FieldValue>, default: &str) -> String {
    match value {
        Some(FieldValue::Str(s)) => s.clone(),
        Some(FieldValue::Null) | None => default.to_string(),
        Some(other) => format!("{:?}", other),
    }
}

/// Resets a single spot to AVAILABLE.
///
/// A missing document is reported, not an error; re-running against an
/// already-reset spot writes the identical field set again (idempotent).
/// Update failures propagate and are fatal to the run.
pub async fn reset_spot(
    client: &FirestoreClient,
    spot_id: &str,
) -> Result<ResetOutcome, AppError> {
    let document = match client.get_document(SPOTS_COLLECTION, spot_id).await? {
        Some(doc) => doc,
        None => {
            tracing::warn!("{}: not found, skipping", spot_id);
            return Ok(ResetOutcome::Missing);
        }
    };

    let prior_status = display_str(document.get("status"), "UNKNOWN");
    let prior_car = display_str(document.get("current_car_label"), "None");
    let spot_code = display_str(document.get("spot_code"), "N/A");

    client
        .update_fields(SPOTS_COLLECTION, spot_id, &available_fields())
        .await?;

    tracing::info!("{} reset to AVAILABLE (was {})", spot_id, prior_status);
    Ok(ResetOutcome::Reset {
        spot_code,
        prior_status,
        prior_car,
    })
}
