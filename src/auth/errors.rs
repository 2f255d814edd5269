//! Error types for session operations.

use thiserror::Error;

/// Errors surfaced by the [`crate::SessionManager`] operations.
///
/// The taxonomy separates failures the UI should message differently:
///
/// - [`AuthError::MissingCredentials`] is client-side validation; no network
///   call was made.
/// - [`AuthError::Rejected`] and [`AuthError::ProfileLoadFailed`] mean the
///   backend refused the credentials or the post-login profile fetch failed;
///   no session was established (or it was rolled back).
/// - [`AuthError::Network`] is a transport-level failure converted to a
///   uniform result rather than propagating a raw client error.
///
/// Every variant renders to a human-readable message suitable for direct
/// display; no structured error code is exposed to the UI layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Identifier or secret was empty; never reaches the network.
    #[error("Missing credentials")]
    MissingCredentials,

    /// The backend explicitly rejected the login attempt.
    #[error("{message}")]
    Rejected {
        /// The server's `error`/`detail` message, or a generic fallback.
        message: String,
    },

    /// Login produced a token, but the follow-up profile fetch failed.
    /// The just-persisted token has been removed again.
    #[error("Failed to load profile after login")]
    ProfileLoadFailed,

    /// Transport-level failure (unreachable host, malformed response).
    #[error("Network error: {message}")]
    Network {
        /// Description of the underlying transport error.
        message: String,
    },
}

impl AuthError {
    /// Wraps a reqwest transport error.
    pub(crate) fn network(err: &reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}
