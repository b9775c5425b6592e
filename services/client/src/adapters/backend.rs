//! services/client/src/adapters/backend.rs
//!
//! This module contains the HTTP adapter for the textbook backend. It implements
//! the `RetrievalService` and `LearningMaterialsService` ports from the `core`
//! crate on top of a single `reqwest` client.
//!
//! Every response body is checked against the expected shape here, at the
//! boundary, so malformed payloads surface as `PortError::MalformedResponse`
//! instead of half-populated results.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use textbook_core::domain::{LearningMaterial, MaterialType, SearchResult};
use textbook_core::ports::{LearningMaterialsService, PortError, PortResult, RetrievalService};
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that talks JSON over HTTP to the retrieval backend.
#[derive(Clone, Debug, Default)]
pub struct HttpBackendAdapter {
    client: reqwest::Client,
}

impl HttpBackendAdapter {
    /// Creates a new `HttpBackendAdapter` around an existing client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Builds a client with an optional overall request timeout. No retries are
    /// ever attempted.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?))
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

fn transport_error(err: reqwest::Error) -> PortError {
    PortError::Network(err.to_string())
}

/// Rejects non-success statuses and returns the raw body otherwise.
async fn success_body(response: reqwest::Response) -> PortResult<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), url = %response.url(), "Backend answered with an error status");
        return Err(PortError::Http {
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await.map_err(transport_error)?;
    Ok(body.to_vec())
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> PortResult<T> {
    serde_json::from_slice(body).map_err(|e| PortError::MalformedResponse(e.to_string()))
}

//=========================================================================================
// Wire Structs
//=========================================================================================

#[derive(Serialize)]
struct RetrieveRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct RetrieveResponse {
    #[serde(default)]
    results: Option<Vec<SearchResultRecord>>,
}

#[derive(Deserialize)]
struct SearchResultRecord {
    content: String,
    source: String,
    score: f64,
}

impl SearchResultRecord {
    fn to_domain(self) -> SearchResult {
        SearchResult {
            content: self.content,
            source: self.source,
            score: self.score,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum MaterialTypeRecord {
    Summary,
    Quiz,
    LearningBooster,
}

#[derive(Deserialize)]
struct LearningMaterialRecord {
    material_type: MaterialTypeRecord,
    content: String,
}

impl LearningMaterialRecord {
    fn to_domain(self) -> LearningMaterial {
        let material_type = match self.material_type {
            MaterialTypeRecord::Summary => MaterialType::Summary,
            MaterialTypeRecord::Quiz => MaterialType::Quiz,
            MaterialTypeRecord::LearningBooster => MaterialType::LearningBooster,
        };
        LearningMaterial {
            material_type,
            content: self.content,
        }
    }
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl RetrievalService for HttpBackendAdapter {
    /// Posts `{query}` to `{endpoint_base_url}/retrieve`.
    ///
    /// Blank queries fail locally without touching the network.
    async fn search(&self, query: &str, endpoint_base_url: &str) -> PortResult<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(PortError::Validation("Please enter a search query".to_string()));
        }

        let url = endpoint(endpoint_base_url, "retrieve");
        debug!(%url, "Sending retrieval request");

        let response = self
            .client
            .post(&url)
            .json(&RetrieveRequest { query })
            .send()
            .await
            .map_err(transport_error)?;

        let payload: RetrieveResponse = decode(&success_body(response).await?)?;
        let results: Vec<SearchResult> = payload
            .results
            .unwrap_or_default()
            .into_iter()
            .map(SearchResultRecord::to_domain)
            .collect();

        debug!(count = results.len(), "Retrieval request completed");
        Ok(results)
    }
}

#[async_trait]
impl LearningMaterialsService for HttpBackendAdapter {
    async fn get_learning_materials(
        &self,
        chapter_id: u32,
        endpoint_base_url: &str,
    ) -> PortResult<Vec<LearningMaterial>> {
        let url = endpoint(
            endpoint_base_url,
            &format!("chapters/{}/learning-materials", chapter_id),
        );
        debug!(%url, "Fetching learning materials");

        let response = self.client.get(&url).send().await.map_err(transport_error)?;
        let records: Vec<LearningMaterialRecord> = decode(&success_body(response).await?)?;

        Ok(records
            .into_iter()
            .map(LearningMaterialRecord::to_domain)
            .collect())
    }
}
