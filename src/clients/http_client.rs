//! HTTP client for backend API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! JSON requests to the habit tracker backend.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::HabitConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the backend API.
///
/// The client handles:
/// - Base URI construction from the configured [`crate::BaseUrl`] plus `/api`
/// - Default headers including User-Agent and the `Authorization: Token ...`
///   header when a bearer token is supplied
/// - JSON body parsing with tolerance for empty and malformed bodies
/// - Mapping non-2xx responses to [`HttpResponseError`] with the backend's
///   own error message where one is present
///
/// There is deliberately no retry loop and no request timeout: the backend
/// contract is a single interactive call per user action.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use habit_api::{HabitConfig, HttpClient, HttpMethod, HttpRequest};
///
/// let client = HttpClient::new(&config, Some("access-token"));
///
/// let request = HttpRequest::builder(HttpMethod::Get, "habits/")
///     .build()
///     .unwrap();
///
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// API root (e.g. `http://127.0.0.1:8000/api`).
    base_uri: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - SDK configuration providing the backend address
    /// * `token` - Optional bearer token; when given, every request carries
    ///   an `Authorization: Token <token>` header
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &HabitConfig, token: Option<&str>) -> Self {
        let base_uri = config.api_root();

        // Build User-Agent header
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Habit API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        // Add auth header if a token is present
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            default_headers.insert("Authorization".to_string(), format!("Token {token}"));
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_uri,
            default_headers,
        }
    }

    /// Returns the API root for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request to the backend API.
    ///
    /// This method handles:
    /// - Request validation
    /// - URL construction
    /// - Header merging
    /// - Response body parsing
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = format!("{}/{}", self.base_uri, request.path);

        // Merge headers
        let mut headers = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            headers.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = req_builder.send().await?;
        Self::handle_response(&url, res).await
    }

    /// Sends a multipart request to the backend API.
    ///
    /// Used for endpoints that accept file uploads alongside text fields,
    /// such as habit create/update with an image. The default headers are
    /// applied as in [`request`](Self::request); the multipart content type
    /// and boundary come from the form itself.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    pub async fn request_multipart(
        &self,
        method: HttpMethod,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<HttpResponse, HttpError> {
        let url = format!("{}/{}", self.base_uri, path);

        let mut req_builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        let res = req_builder.multipart(form).send().await?;
        Self::handle_response(&url, res).await
    }

    async fn handle_response(
        url: &str,
        res: reqwest::Response,
    ) -> Result<HttpResponse, HttpError> {
        let code = res.status().as_u16();
        let body_text = res.text().await.unwrap_or_default();

        // Parse body as JSON; DELETE and action endpoints may return nothing
        let body = if body_text.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&body_text).unwrap_or_else(|_| {
                // For 5xx errors, keep the raw body for diagnostics
                if code >= 500 {
                    serde_json::json!({ "raw_body": body_text })
                } else {
                    serde_json::json!({})
                }
            })
        };

        let response = HttpResponse::new(code, body);

        if response.is_ok() {
            return Ok(response);
        }

        let message = response
            .error_message()
            .map_or_else(|| format!("Request failed with status {code}"), String::from);

        tracing::debug!(%url, code, "backend returned an error response");

        Err(HttpError::Response(HttpResponseError { code, message }))
    }
}
