//! services/client/src/adapters/file_storage.rs
//!
//! This module contains the file-backed session storage, the concrete
//! implementation of the `SessionStorage` port used by the command-line client.
//! The file is a small JSON key-value document, the local equivalent of a
//! browser's `localStorage`; only the `textbook-auth-session` key is ever
//! touched, other keys are preserved as-is.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use textbook_core::domain::{AuthProvider, Session, User};
use textbook_core::ports::{PortError, PortResult, SessionStorage};
use tracing::{debug, warn};

/// The fixed key under which the session record lives.
pub const SESSION_STORAGE_KEY: &str = "textbook-auth-session";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A session storage adapter persisting to a JSON file.
#[derive(Clone, Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Creates a new `FileSessionStorage`. The file and its parent directory are
    /// created lazily on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> PortResult<Map<String, Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Map::new()),
            Ok(bytes) => serde_json::from_slice::<Map<String, Value>>(&bytes).map_err(|e| {
                PortError::StorageUnavailable(format!(
                    "{} is not a JSON object: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(storage_error(&self.path, "read", e)),
        }
    }

    async fn write_document(&self, document: Map<String, Value>) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(parent, "create", e))?;
        }

        let bytes = serde_json::to_vec_pretty(&Value::Object(document))
            .map_err(|e| PortError::StorageUnavailable(e.to_string()))?;

        // Write next to the target and rename so a crash never leaves half a record.
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|e| storage_error(&staging, "write", e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| storage_error(&self.path, "replace", e))
    }
}

fn storage_error(path: &Path, action: &str, err: std::io::Error) -> PortError {
    PortError::StorageUnavailable(format!("failed to {} {}: {}", action, path.display(), err))
}

//=========================================================================================
// Persisted Record Structs
//=========================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
enum ProviderRecord {
    #[default]
    Email,
    Google,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: String,
    email: String,
    #[serde(alias = "name")]
    display_name: String,
    #[serde(default)]
    provider: ProviderRecord,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    user: UserRecord,
    token: String,
    expires_at: DateTime<Utc>,
}

impl SessionRecord {
    fn to_domain(self) -> Session {
        let provider = match self.user.provider {
            ProviderRecord::Email => AuthProvider::Email,
            ProviderRecord::Google => AuthProvider::Google,
        };
        Session {
            user: User {
                id: self.user.id,
                email: self.user.email,
                display_name: self.user.display_name,
                provider,
            },
            token: self.token,
            expires_at: self.expires_at,
        }
    }

    fn from_domain(session: &Session) -> Self {
        let provider = match session.user.provider {
            AuthProvider::Email => ProviderRecord::Email,
            AuthProvider::Google => ProviderRecord::Google,
        };
        Self {
            user: UserRecord {
                id: session.user.id.clone(),
                email: session.user.email.clone(),
                display_name: session.user.display_name.clone(),
                provider,
            },
            token: session.token.clone(),
            expires_at: session.expires_at,
        }
    }
}

//=========================================================================================
// `SessionStorage` Trait Implementation
//=========================================================================================

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn get(&self) -> PortResult<Option<Session>> {
        let mut document = self.read_document().await?;
        let Some(value) = document.get(SESSION_STORAGE_KEY).cloned() else {
            return Ok(None);
        };

        match serde_json::from_value::<SessionRecord>(value) {
            Ok(record) => Ok(Some(record.to_domain())),
            Err(e) => {
                // An undecodable record can never become valid again.
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable session record");
                document.remove(SESSION_STORAGE_KEY);
                self.write_document(document).await?;
                Ok(None)
            }
        }
    }

    async fn set(&self, session: &Session) -> PortResult<()> {
        let mut document = self.read_document().await?;
        let record = serde_json::to_value(SessionRecord::from_domain(session))
            .map_err(|e| PortError::StorageUnavailable(e.to_string()))?;
        document.insert(SESSION_STORAGE_KEY.to_string(), record);
        self.write_document(document).await?;
        debug!(path = %self.path.display(), "Session record written");
        Ok(())
    }

    async fn clear(&self) -> PortResult<()> {
        let mut document = self.read_document().await?;
        if document.remove(SESSION_STORAGE_KEY).is_none() {
            return Ok(());
        }
        self.write_document(document).await?;
        debug!(path = %self.path.display(), "Session record cleared");
        Ok(())
    }
}
