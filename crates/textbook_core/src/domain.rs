//! crates/textbook_core/src/domain.rs
//!
//! Defines the pure, core data structures for the textbook companion.
//! These structs are independent of any storage medium or wire format.

use chrono::{DateTime, Utc};
use std::fmt;

/// The identity provider a session was obtained from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthProvider {
    Email,
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Email => "email",
            AuthProvider::Google => "google",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(AuthProvider::Email),
            "google" => Ok(AuthProvider::Google),
            other => Err(format!("unknown auth provider '{}'", other)),
        }
    }
}

// The signed-in user as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub provider: AuthProvider,
}

/// One authenticated browser-like context.
///
/// `token` is opaque: the client never interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session is valid only while `expires_at` is strictly in the future.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Credentials handed to a sign-in call. Providers that do not take
/// credentials ignore them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// One ranked passage returned by the retrieval endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub content: String,
    pub source: String,
    /// Conventionally in [0, 1]; never clamped by the client.
    pub score: f64,
}

/// The kinds of generated material attached to a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialType {
    Summary,
    Quiz,
    LearningBooster,
}

impl MaterialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Summary => "summary",
            MaterialType::Quiz => "quiz",
            MaterialType::LearningBooster => "learning_booster",
        }
    }
}

/// A piece of learning material for a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningMaterial {
    pub material_type: MaterialType,
    pub content: String,
}
