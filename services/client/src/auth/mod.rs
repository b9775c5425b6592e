pub mod service;
pub mod session_store;

pub use service::{AuthFailure, AuthService};
pub use session_store::SessionStore;
