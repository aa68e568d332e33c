use crate::errors::AppError;
use crate::value::{Document, FieldValue};
use reqwest;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing;

/// Page size for document listing. Firestore caps pages at 300 anyway.
const LIST_PAGE_SIZE: u32 = 300;

/// Client for the Firestore REST v1 API.
///
/// One handle is constructed at startup and passed to every operation; there
/// is no ambient global connection.
#[derive(Clone)]
pub struct FirestoreClient {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    access_token: Option<String>,
}

impl FirestoreClient {
    /// Creates a new `FirestoreClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - REST endpoint, e.g. `https://firestore.googleapis.com/v1`.
    /// * `project_id` - GCP project the database lives in.
    /// * `access_token` - Bearer token; `None` for the emulator or mocks.
    pub fn new(
        base_url: String,
        project_id: String,
        access_token: Option<String>,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::StoreError(format!("Failed to create Firestore client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id,
            access_token,
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    fn request(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => req.header("Authorization", format!("Bearer {}", token)),
            None => req,
        }
    }

    /// Streams every document in a collection, in server order.
    ///
    /// Follows `nextPageToken` until the listing is exhausted. An empty or
    /// nonexistent collection yields an empty Vec (Firestore lists it as
    /// empty rather than erroring).
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, AppError> {
        let url = format!("{}/{}", self.documents_url(), collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self
                .client
                .get(&url)
                .query(&[("pageSize", LIST_PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token)]);
            }

            let response = self.request(req).send().await.map_err(|e| {
                AppError::StoreError(format!("Listing {} failed: {}", collection, e))
            })?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(AppError::StoreError(format!(
                    "Listing {} returned {}: {}",
                    collection, status, error_text
                )));
            }

            let page: Value = response.json().await.map_err(|e| {
                AppError::StoreError(format!("Failed to parse listing of {}: {}", collection, e))
            })?;

            if let Some(docs) = page.get("documents").and_then(|d| d.as_array()) {
                for doc in docs {
                    documents.push(Document::decode(doc)?);
                }
            }

            page_token = page
                .get("nextPageToken")
                .and_then(|t| t.as_str())
                .map(|t| t.to_string());
            if page_token.is_none() {
                break;
            }
        }

        tracing::debug!("Listed {} documents from {}", documents.len(), collection);
        Ok(documents)
    }

    /// Fetches a single document by id. A 404 maps to `Ok(None)`.
    pub async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, AppError> {
        let url = format!("{}/{}/{}", self.documents_url(), collection, id);

        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| {
                AppError::StoreError(format!("Fetching {}/{} failed: {}", collection, id, e))
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::StoreError(format!(
                "Fetching {}/{} returned {}: {}",
                collection, id, status, error_text
            )));
        }

        let wire: Value = response.json().await.map_err(|e| {
            AppError::StoreError(format!("Failed to parse {}/{}: {}", collection, id, e))
        })?;

        Ok(Some(Document::decode(&wire)?))
    }

    /// Applies a partial update to one document.
    ///
    /// Each field in `fields` goes into the `updateMask`, so only the named
    /// fields are touched; everything else on the document is left as-is.
    pub async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: &BTreeMap<String, FieldValue>,
    ) -> Result<(), AppError> {
        let url = format!("{}/{}/{}", self.documents_url(), collection, id);

        let mask: Vec<(&str, &str)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", k.as_str()))
            .collect();
        let wire_fields: serde_json::Map<String, Value> = fields
            .iter()
            .map(|(k, v)| (k.clone(), v.encode()))
            .collect();
        let body = json!({ "fields": wire_fields });

        let response = self
            .request(self.client.patch(&url).query(&mask).json(&body))
            .send()
            .await
            .map_err(|e| {
                AppError::StoreError(format!("Updating {}/{} failed: {}", collection, id, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::StoreError(format!(
                "Updating {}/{} returned {}: {}",
                collection, id, status, error_text
            )));
        }

        tracing::debug!("Updated {} fields on {}/{}", fields.len(), collection, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = FirestoreClient::new(
            "https://firestore.googleapis.com/v1".to_string(),
            "demo-project".to_string(),
            None,
        );
        assert!(client.is_ok());
    }
}
