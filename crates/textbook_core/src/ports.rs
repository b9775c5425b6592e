//! crates/textbook_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the client's core logic.
//! These traits form the boundary of the hexagonal architecture, so the session
//! store and search controller never depend on a concrete storage medium or
//! HTTP stack, and a real identity provider can be substituted later.

use async_trait::async_trait;
use crate::domain::{LearningMaterial, SearchResult, Session};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by every port operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    /// Bad or missing input. No network call or storage write was made.
    #[error("{0}")]
    Validation(String),
    /// The remote service answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    /// DNS failure, refused connection, timeout and similar transport faults.
    #[error("Network error: {0}")]
    Network(String),
    /// The persisted session storage could not be read or written.
    #[error("Session storage unavailable: {0}")]
    StorageUnavailable(String),
    /// The remote service answered with a body that does not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    pub fn is_validation(&self) -> bool {
        matches!(self, PortError::Validation(_))
    }

    /// The HTTP status carried by an `Http` error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PortError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable client-local storage for the single active session record.
///
/// Implementations own exactly one record under a fixed key and must not touch
/// anything else in the underlying medium.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Reads the persisted session, valid or not. `Ok(None)` when nothing is stored.
    async fn get(&self) -> PortResult<Option<Session>>;

    /// Persists `session`, replacing any previous record.
    async fn set(&self, session: &Session) -> PortResult<()>;

    /// Removes the persisted record. Clearing an empty storage is not an error.
    async fn clear(&self) -> PortResult<()>;
}

#[async_trait]
pub trait RetrievalService: Send + Sync {
    /// Sends `query` to `{endpoint_base_url}/retrieve` and returns the ranked
    /// passages in server order.
    async fn search(&self, query: &str, endpoint_base_url: &str) -> PortResult<Vec<SearchResult>>;
}

#[async_trait]
pub trait LearningMaterialsService: Send + Sync {
    /// Fetches the generated materials attached to a chapter.
    async fn get_learning_materials(
        &self,
        chapter_id: u32,
        endpoint_base_url: &str,
    ) -> PortResult<Vec<LearningMaterial>>;
}
