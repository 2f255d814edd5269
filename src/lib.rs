//! # Habit Tracker API Rust SDK
//!
//! A Rust client SDK for the Smart Habit Tracker HTTP API, providing
//! type-safe configuration, session management, and typed resource clients
//! for habits, completions, reminders, and AI suggestions.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`HabitConfig`] and [`HabitConfigBuilder`]
//! - A validated [`BaseUrl`] newtype for the backend address
//! - A [`SessionManager`] owning the authenticated-user state machine
//!   (restore, login, signup, profile updates, logout)
//! - Pluggable credential persistence via the [`CredentialStore`] trait,
//!   with in-memory and file-backed implementations
//! - An async HTTP client speaking the backend's token-auth JSON contract
//! - Typed CRUD clients for habit, reminder, and suggestion resources
//!
//! ## Quick Start
//!
//! ```rust
//! use habit_api::{BaseUrl, HabitConfig};
//!
//! let config = HabitConfig::builder()
//!     .base_url(BaseUrl::new("http://127.0.0.1:8000").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Session Management
//!
//! The [`SessionManager`] is an explicit, injectable object: create one at
//! startup, call [`SessionManager::restore`] once to re-establish a session
//! from a previously persisted token, then drive it with login/logout calls.
//!
//! ```rust,ignore
//! use habit_api::{HabitConfig, MemoryStore, SessionManager};
//!
//! let mut session = SessionManager::new(config, Box::new(MemoryStore::new()));
//!
//! // Attempt to resume a prior session (best-effort, never fails)
//! let outcome = session.restore().await;
//! if !outcome.authenticated {
//!     session.login("me@example.com", "secret").await?;
//! }
//!
//! let user = session.user().expect("authenticated");
//! println!("Hello, {}", user.name);
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use habit_api::rest::RestClient;
//!
//! let rest = RestClient::new(&config, session.token().as_deref());
//! let habits = rest.habits().list().await?;
//! for habit in &habits {
//!     println!("{}: streak {}", habit.name, habit.streak);
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the session is an explicit object passed to
//!   consumers, not ambient process-wide state
//! - **Tolerant decoding at the edge, strict types inside**: loosely-shaped
//!   backend responses are mapped through adapters into strict records
//! - **Best-effort operations are explicit**: restore and logout never fail;
//!   they return a definite outcome and expose the swallowed diagnostic
//! - **Fail-fast validation**: configuration newtypes validate on construction
//! - **Async-first**: designed for use with the Tokio runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;
pub mod storage;

// Re-export public types at crate root for convenience
pub use auth::{
    AuthError, LoginPayload, LogoutOutcome, ProfileUpdate, RestoreOutcome, Session,
    SessionManager, SessionState, User,
};
pub use config::{BaseUrl, HabitConfig, HabitConfigBuilder};
pub use error::ConfigError;
pub use storage::{CredentialStore, FileStore, MemoryStore, StoreKey};

// Re-export HTTP client types
pub use clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError,
};

// Re-export REST resource types
pub use rest::{
    Habit, HabitDraft, HabitsClient, Reminder, ReminderDraft, RemindersClient, RestClient,
    Suggestion, SuggestionsClient, ToggleOutcome,
};
