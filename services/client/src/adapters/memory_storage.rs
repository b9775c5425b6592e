//! services/client/src/adapters/memory_storage.rs
//!
//! An in-memory `SessionStorage` for tests and for embedding the session store
//! where nothing should outlive the process.

use async_trait::async_trait;
use std::sync::Arc;
use textbook_core::domain::Session;
use textbook_core::ports::{PortResult, SessionStorage};
use tokio::sync::Mutex;

/// Holds at most one session. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStorage {
    slot: Arc<Mutex<Option<Session>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the storage with an existing record, valid or not.
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn get(&self) -> PortResult<Option<Session>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn set(&self, session: &Session) -> PortResult<()> {
        *self.slot.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> PortResult<()> {
        self.slot.lock().await.take();
        Ok(())
    }
}
