//! services/client/src/auth/session_store.rs
//!
//! The session store: sign-in, sign-out, session retrieval and expiry checks on
//! top of an injected `SessionStorage`.
//!
//! The store emulates an external identity provider's client contract closely
//! enough that callers can later be pointed at a real provider unchanged. It
//! keeps no copy of the session in memory; storage is the only source of truth,
//! and validity is re-checked on every read.

use chrono::{Duration, Utc};
use std::sync::Arc;
use textbook_core::domain::{AuthProvider, Credentials, Session, User};
use textbook_core::ports::{PortError, PortResult, SessionStorage};
use tracing::{debug, info};
use uuid::Uuid;

/// How long a freshly issued session stays valid.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Profile returned by the simulated Google sign-in.
pub const GOOGLE_PLACEHOLDER_EMAIL: &str = "user@gmail.com";
pub const GOOGLE_PLACEHOLDER_NAME: &str = "Google User";

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    sign_in_delay: std::time::Duration,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            sign_in_delay: std::time::Duration::ZERO,
        }
    }

    /// Adds a simulated provider round-trip to every successful sign-in.
    pub fn with_sign_in_delay(mut self, delay: std::time::Duration) -> Self {
        self.sign_in_delay = delay;
        self
    }

    /// Signs in with the given provider and persists the new session, replacing
    /// any previous one.
    ///
    /// `Email` requires a non-blank email and a non-empty password; otherwise a
    /// `PortError::Validation` is returned and nothing is written.
    ///
    /// `Google` is a stand-in for an OAuth redirect flow: it always succeeds with
    /// a fixed placeholder profile and ignores `credentials`. It has none of the
    /// guarantees of real OAuth.
    pub async fn sign_in(
        &self,
        provider: AuthProvider,
        credentials: &Credentials,
    ) -> PortResult<Session> {
        let user = match provider {
            AuthProvider::Email => {
                let email = credentials.email.trim();
                if email.is_empty() || credentials.password.is_empty() {
                    return Err(PortError::Validation(
                        "Email and password are required".to_string(),
                    ));
                }
                User {
                    id: format!("user_{}", Uuid::new_v4().simple()),
                    email: email.to_string(),
                    display_name: email.split('@').next().unwrap_or(email).to_string(),
                    provider,
                }
            }
            AuthProvider::Google => User {
                id: format!("google_user_{}", Uuid::new_v4().simple()),
                email: GOOGLE_PLACEHOLDER_EMAIL.to_string(),
                display_name: GOOGLE_PLACEHOLDER_NAME.to_string(),
                provider,
            },
        };

        if !self.sign_in_delay.is_zero() {
            tokio::time::sleep(self.sign_in_delay).await;
        }

        let session = Session {
            user,
            token: format!("tok_{}", Uuid::new_v4().simple()),
            expires_at: Utc::now() + Duration::hours(SESSION_TTL_HOURS),
        };
        self.storage.set(&session).await?;

        info!(user_id = %session.user.id, %provider, "Signed in");
        Ok(session)
    }

    /// Clears the persisted session. Signing out twice is not an error.
    pub async fn sign_out(&self) -> PortResult<()> {
        self.storage.clear().await?;
        info!("Signed out");
        Ok(())
    }

    /// Returns the current session if one exists and has not expired.
    ///
    /// An expired record is purged from storage before `None` is returned.
    pub async fn get_session(&self) -> PortResult<Option<Session>> {
        let Some(session) = self.storage.get().await? else {
            return Ok(None);
        };

        if session.is_valid_at(Utc::now()) {
            return Ok(Some(session));
        }

        debug!(user_id = %session.user.id, expired_at = %session.expires_at, "Purging expired session");
        self.storage.clear().await?;
        Ok(None)
    }

    pub async fn is_authenticated(&self) -> PortResult<bool> {
        Ok(self
            .get_session()
            .await?
            .is_some_and(|session| !session.user.id.is_empty()))
    }

    pub async fn get_auth_token(&self) -> PortResult<Option<String>> {
        Ok(self.get_session().await?.map(|session| session.token))
    }

    pub async fn get_user(&self) -> PortResult<Option<User>> {
        Ok(self.get_session().await?.map(|session| session.user))
    }

    pub async fn get_user_id(&self) -> PortResult<Option<String>> {
        Ok(self.get_user().await?.map(|user| user.id))
    }

    /// Reports whether the stored session is still usable. Tokens are never
    /// rotated; this only re-runs the expiry check.
    pub async fn refresh(&self) -> PortResult<bool> {
        Ok(self.get_session().await?.is_some())
    }
}
