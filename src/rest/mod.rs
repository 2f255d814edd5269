//! Typed REST clients for the habit tracker's resource endpoints.
//!
//! This module covers the non-auth API surface: habits and their
//! completions, reminders, and AI suggestions. Each resource gets its own
//! client, and [`RestClient`] bundles them over one shared [`HttpClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use habit_api::{HabitConfig, RestClient};
//!
//! let rest = RestClient::new(&config, manager.token().as_deref());
//!
//! let habits = rest.habits().list().await?;
//! for habit in &habits {
//!     println!("{}: streak {}", habit.name, habit.streak);
//! }
//! ```

mod habits;
mod reminders;
mod suggestions;

pub use habits::{Habit, HabitDraft, HabitsClient, ToggleOutcome};
pub use reminders::{Reminder, ReminderDraft, RemindersClient};
pub use suggestions::{Suggestion, SuggestionsClient};

use crate::clients::HttpClient;
use crate::config::HabitConfig;

/// Facade over the resource clients.
///
/// Construct one per session; rebuilding after login or logout picks up the
/// new token. All per-resource clients borrow the same underlying HTTP
/// client and its default headers.
#[derive(Debug)]
pub struct RestClient {
    http: HttpClient,
}

impl RestClient {
    /// Creates a client for the given configuration and bearer token.
    #[must_use]
    pub fn new(config: &HabitConfig, token: Option<&str>) -> Self {
        Self {
            http: HttpClient::new(config, token),
        }
    }

    /// Returns the habits client.
    #[must_use]
    pub const fn habits(&self) -> HabitsClient<'_> {
        HabitsClient::new(&self.http)
    }

    /// Returns the reminders client.
    #[must_use]
    pub const fn reminders(&self) -> RemindersClient<'_> {
        RemindersClient::new(&self.http)
    }

    /// Returns the suggestions client.
    #[must_use]
    pub const fn suggestions(&self) -> SuggestionsClient<'_> {
        SuggestionsClient::new(&self.http)
    }
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};
