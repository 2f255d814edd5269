//! Authentication and session lifecycle.
//!
//! The entry point is [`SessionManager`], which owns the [`Session`] state
//! machine and keeps a [`crate::storage::CredentialStore`] in step with it.
//! Supporting pieces live in their own modules: the [`User`] profile
//! adapter, [`LoginPayload`] classification and token extraction, and the
//! [`AuthError`] taxonomy.

mod credentials;
mod errors;
mod session;
mod session_manager;
mod user;

pub use credentials::{extract_token, LoginPayload};
pub use errors::AuthError;
pub use session::{Session, SessionState};
pub use session_manager::{LogoutOutcome, ProfileUpdate, RestoreOutcome, SessionManager};
pub use user::User;
