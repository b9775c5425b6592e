//! The textbook companion client: session management against a local store and
//! search/learning-material lookups against the textbook backend.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod error;
pub mod search;
