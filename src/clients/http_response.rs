//! HTTP response types for the habit tracker SDK.
//!
//! This module provides the [`HttpResponse`] type for accessing parsed API
//! response data, including the backend's "error-shaped" body convention.

/// An HTTP response from the backend API.
///
/// Contains the response status code and the parsed JSON body. The backend
/// sometimes signals failure through the body rather than the status code:
/// a JSON object carrying a `detail` or `error` field is treated as an error
/// payload even under a 2xx status. [`HttpResponse::error_message`] exposes
/// that convention in one place.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// The parsed response body.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(code: u16, body: serde_json::Value) -> Self {
        Self { code, body }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Extracts the backend's error message from an error-shaped body.
    ///
    /// Checks the `error` field first, then `detail`, mirroring the shapes
    /// the backend actually produces (`{"success": false, "error": ...}` on
    /// auth failures, `{"detail": ...}` from the framework's permission and
    /// validation layers). Returns `None` for success-shaped bodies.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.body
            .get("error")
            .or_else(|| self.body.get("detail"))
            .and_then(serde_json::Value::as_str)
    }

    /// Returns `true` if the body carries a `detail` or `error` field.
    #[must_use]
    pub fn is_error_shaped(&self) -> bool {
        self.body.get("error").is_some() || self.body.get("detail").is_some()
    }
}
