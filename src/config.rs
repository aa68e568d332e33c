use serde::Deserialize;

/// Default Firestore REST endpoint. Overridable for tests and the emulator.
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub project_id: String,
    pub access_token: Option<String>, // Optional: emulator and mocked tests need none
    pub firestore_base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            project_id: std::env::var("FIRESTORE_PROJECT_ID")
                .map_err(|_| {
                    anyhow::anyhow!("FIRESTORE_PROJECT_ID environment variable required")
                })
                .and_then(|id| {
                    if id.trim().is_empty() {
                        anyhow::bail!("FIRESTORE_PROJECT_ID cannot be empty");
                    }
                    Ok(id)
                })?,
            access_token: std::env::var("GOOGLE_ACCESS_TOKEN")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            firestore_base_url: match std::env::var("FIRESTORE_BASE_URL") {
                Ok(url) => {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("FIRESTORE_BASE_URL must start with http:// or https://");
                    }
                    url.trim_end_matches('/').to_string()
                }
                Err(_) => DEFAULT_FIRESTORE_BASE_URL.to_string(),
            },
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Project ID: {}", config.project_id);
        tracing::debug!("Firestore base URL: {}", config.firestore_base_url);
        if config.access_token.is_some() {
            tracing::debug!("Access token configured");
        } else {
            tracing::warn!("No GOOGLE_ACCESS_TOKEN set; requests will be unauthenticated");
        }

        Ok(config)
    }
}
