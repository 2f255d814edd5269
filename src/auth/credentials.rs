//! Login payload construction and token extraction.
//!
//! The backend accepts either an email or a username as the login
//! identifier, and has issued tokens under several response field names over
//! its lifetime. Both tolerances live here, next to their tests, so the
//! session manager itself stays strict.

use serde::Serialize;

/// A login request payload.
///
/// The identifier is classified by [`LoginPayload::classify`]: anything
/// containing an `@` is sent as `email`, everything else as `username`.
/// The serialized shape matches what the backend expects:
/// `{"email": ..., "password": ...}` or `{"username": ..., "password": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LoginPayload {
    /// Email-based login.
    Email {
        /// Email address used as the identifier.
        email: String,
        /// Account password.
        password: String,
    },
    /// Username-based login.
    Username {
        /// Username used as the identifier.
        username: String,
        /// Account password.
        password: String,
    },
}

impl LoginPayload {
    /// Builds a payload from a raw identifier and password.
    #[must_use]
    pub fn classify(identifier: &str, password: &str) -> Self {
        if identifier.contains('@') {
            Self::Email {
                email: identifier.to_string(),
                password: password.to_string(),
            }
        } else {
            Self::Username {
                username: identifier.to_string(),
                password: password.to_string(),
            }
        }
    }
}

/// Extracts a bearer token from a login response.
///
/// The backend (and earlier revisions of it) has returned the token as
/// `token`, `key`, `auth_token`, or nested under `data.token`; the first
/// non-empty match in that order wins.
#[must_use]
pub fn extract_token(body: &serde_json::Value) -> Option<&str> {
    let direct = |field: &str| body.get(field).and_then(serde_json::Value::as_str);

    direct("token")
        .or_else(|| direct("key"))
        .or_else(|| direct("auth_token"))
        .or_else(|| {
            body.get("data")
                .and_then(|data| data.get("token"))
                .and_then(serde_json::Value::as_str)
        })
        .filter(|token| !token.is_empty())
}
