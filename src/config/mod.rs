//! Configuration types for the habit tracker SDK.
//!
//! This module provides the core configuration types used to initialize
//! and configure the SDK for API communication with the backend.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HabitConfig`]: The main configuration struct holding all SDK settings
//! - [`HabitConfigBuilder`]: A builder for constructing [`HabitConfig`] instances
//! - [`BaseUrl`]: A validated backend address newtype
//!
//! # Example
//!
//! ```rust
//! use habit_api::{BaseUrl, HabitConfig};
//!
//! let config = HabitConfig::builder()
//!     .base_url(BaseUrl::new("http://127.0.0.1:8000").unwrap())
//!     .user_agent_prefix("MyApp/1.0")
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::BaseUrl;

use crate::error::ConfigError;

/// Path prefix for all API endpoints, appended to the base URL.
pub const API_BASE_PATH: &str = "/api";

/// Configuration for the habit tracker SDK.
///
/// This struct holds all configuration needed for SDK operations: the
/// backend address and optional HTTP client settings.
///
/// # Thread Safety
///
/// `HabitConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use habit_api::{BaseUrl, HabitConfig};
///
/// let config = HabitConfig::builder()
///     .base_url(BaseUrl::new("http://127.0.0.1:8000").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.base_url().as_ref(), "http://127.0.0.1:8000");
/// ```
#[derive(Clone, Debug)]
pub struct HabitConfig {
    base_url: BaseUrl,
    user_agent_prefix: Option<String>,
}

impl HabitConfig {
    /// Creates a new builder for constructing a `HabitConfig`.
    #[must_use]
    pub fn builder() -> HabitConfigBuilder {
        HabitConfigBuilder::new()
    }

    /// Returns the backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the root of the API surface, e.g. `http://host:8000/api`.
    #[must_use]
    pub fn api_root(&self) -> String {
        format!("{}{API_BASE_PATH}", self.base_url)
    }
}

// Verify HabitConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HabitConfig>();
};

/// Builder for constructing [`HabitConfig`] instances.
///
/// The only required field is `base_url`; everything else has a sensible
/// default.
///
/// # Example
///
/// ```rust
/// use habit_api::{BaseUrl, HabitConfig};
///
/// let config = HabitConfig::builder()
///     .base_url(BaseUrl::new("https://tracker.example.com").unwrap())
///     .user_agent_prefix("Dashboard/2.1")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct HabitConfigBuilder {
    base_url: Option<BaseUrl>,
    user_agent_prefix: Option<String>,
}

impl HabitConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`HabitConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set.
    pub fn build(self) -> Result<HabitConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        Ok(HabitConfig {
            base_url,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
