//! HTTP client functionality for backend API communication.
//!
//! This module provides the low-level HTTP plumbing shared by the session
//! manager and the REST resource clients:
//!
//! - [`HttpClient`]: Async client carrying the base URI and default headers
//! - [`HttpRequest`] / [`HttpRequestBuilder`]: Validated request construction
//! - [`HttpResponse`]: Parsed response with the error-shaped-body convention
//! - [`HttpError`]: Unified error type for HTTP operations
//!
//! # Example
//!
//! ```rust,ignore
//! use habit_api::clients::{HttpClient, HttpMethod, HttpRequest};
//!
//! let client = HttpClient::new(&config, Some("access-token"));
//! let request = HttpRequest::builder(HttpMethod::Get, "habits/")
//!     .build()?;
//! let response = client.request(request).await?;
//! ```

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
