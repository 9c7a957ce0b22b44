//! Typesense HTTP client.
//!
//! Blocking `reqwest` client with the configured connection timeout. Every
//! request carries the `X-TYPESENSE-API-KEY` header.

use super::schema::collection_schema;
use super::{CollectionStats, DocumentStore, ImportSummary};
use crate::config::StoreConfig;
use crate::document::IndexDocument;
use crate::error::{CodeSearchError, Result};
use crate::search::SearchResponse;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info, warn};

const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

pub struct TypesenseStore {
    base_url: String,
    api_key: String,
    collection: String,
    client: Client,
}

impl TypesenseStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        Self::with_url(
            &config.base_url(),
            &config.api_key,
            &config.collection,
            Duration::from_secs(config.connection_timeout_secs),
        )
    }

    /// Client against an explicit base url (`http://host:port`)
    pub fn with_url(
        base_url: &str,
        api_key: &str,
        collection: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| CodeSearchError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            collection: collection.to_string(),
            client,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn collection_url(&self) -> String {
        self.url(&format!("/collections/{}", self.collection))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .map_err(|e| CodeSearchError::RemoteUnavailable {
                url: self.base_url.clone(),
                message: e.to_string(),
            })
    }

    /// Turn a non-2xx response into `RemoteStatus`
    fn check(operation: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(CodeSearchError::RemoteStatus {
            operation: operation.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let text = response.text().map_err(|e| CodeSearchError::RemoteUnavailable {
            url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            message: format!("failed to read response body: {e}"),
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    fn drop_collection(&self) -> Result<()> {
        let response = self.send(self.client.delete(self.collection_url()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check("drop collection", response)?;
        info!("Dropped collection {}", self.collection);
        Ok(())
    }

    fn create_collection(&self) -> Result<()> {
        let schema = collection_schema(&self.collection);
        let response = self.send(self.client.post(self.url("/collections")).json(&schema))?;
        Self::check("create collection", response)?;
        info!("Created collection {}", self.collection);
        Ok(())
    }
}

/// A 400 from search that names a field means the collection predates the
/// current schema
fn looks_like_schema_mismatch(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower.contains("field") || lower.contains("index")
}

/// Parse the JSONL result of an import: one `{"success": bool, "error"?: str}`
/// per document
fn parse_import_results(body: &str) -> ImportSummary {
    let mut summary = ImportSummary::default();
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(value) if value.get("success").and_then(|s| s.as_bool()) == Some(true) => {
                summary.imported += 1;
            }
            Ok(value) => {
                summary.failed += 1;
                let message = value
                    .get("error")
                    .and_then(|e| e.as_str())
                    .unwrap_or("unknown error")
                    .to_string();
                summary.errors.push(message);
            }
            Err(e) => {
                summary.failed += 1;
                summary.errors.push(format!("unparseable import result: {e}"));
            }
        }
    }
    summary
}

impl DocumentStore for TypesenseStore {
    fn health(&self) -> Result<bool> {
        let response = self.send(self.client.get(self.url("/health")))?;
        if !response.status().is_success() {
            return Ok(false);
        }
        let body: serde_json::Value = Self::read_json(response)?;
        Ok(body.get("ok").and_then(|v| v.as_bool()).unwrap_or(false))
    }

    fn collection_stats(&self) -> Result<Option<CollectionStats>> {
        let response = self.send(self.client.get(self.collection_url()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: serde_json::Value = Self::read_json(Self::check("get collection", response)?)?;
        Ok(Some(CollectionStats {
            name: body
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or(&self.collection)
                .to_string(),
            num_documents: body.get("num_documents").and_then(|v| v.as_u64()).unwrap_or(0),
        }))
    }

    fn ensure_collection(&self, reset: bool) -> Result<()> {
        if reset {
            self.drop_collection()?;
        } else if self.collection_stats()?.is_some() {
            debug!("Collection {} already exists", self.collection);
            return Ok(());
        }
        self.create_collection()
    }

    fn import_upsert(&self, docs: &[IndexDocument]) -> Result<ImportSummary> {
        if docs.is_empty() {
            return Ok(ImportSummary::default());
        }
        let mut body = String::new();
        for doc in docs {
            body.push_str(&serde_json::to_string(doc)?);
            body.push('\n');
        }
        let url = format!("{}/documents/import", self.collection_url());
        let request = self
            .client
            .post(url)
            .query(&[("action", "upsert")])
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body);
        let response = Self::check("import", self.send(request)?)?;
        let text = response.text().map_err(|e| CodeSearchError::RemoteUnavailable {
            url: self.base_url.clone(),
            message: format!("failed to read import result: {e}"),
        })?;

        let summary = parse_import_results(&text);
        if summary.failed > 0 {
            warn!(
                "Import: {} of {} documents failed (first: {})",
                summary.failed,
                docs.len(),
                summary.errors.first().map(String::as_str).unwrap_or("")
            );
        }
        Ok(summary)
    }

    fn delete_document(&self, id: &str) -> Result<bool> {
        let url = format!("{}/documents/{}", self.collection_url(), id);
        let response = self.send(self.client.delete(url))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::check("delete", response)?;
        Ok(true)
    }

    fn search(&self, params: &[(String, String)]) -> Result<SearchResponse> {
        let url = format!("{}/documents/search", self.collection_url());
        let response = self.send(self.client.get(url).query(params))?;
        if response.status() == StatusCode::BAD_REQUEST {
            let body = response.text().unwrap_or_default();
            if looks_like_schema_mismatch(&body) {
                return Err(CodeSearchError::SchemaMismatch(body));
            }
            return Err(CodeSearchError::RemoteStatus {
                operation: "search".into(),
                status: 400,
                body,
            });
        }
        Self::read_json(Self::check("search", response)?)
    }
}
