//! The authenticated user record and its profile adapter.
//!
//! The backend's profile endpoint has grown several shapes over time (camel
//! and snake case timestamps, `name` vs `first_name`, avatar under two
//! different keys). Rather than scattering fallbacks through the session
//! code, [`User::from_profile`] maps the loosely-typed response into one
//! strict record, with the field-priority order specified once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The profile of an authenticated user.
///
/// Built from a profile response via [`User::from_profile`]; present on the
/// session only while a backing token exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend user id.
    pub id: i64,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Login username.
    pub username: String,
    /// Avatar URL, if one has been uploaded or cached.
    pub avatar_url: Option<String>,
    /// Account creation time, when the backend reports one.
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Maps a profile response body into a `User`.
    ///
    /// Field priorities (first present wins):
    ///
    /// - `name`: `name`, `first_name`, `username`
    /// - `username`: `username`, `name`, `email`
    /// - `avatar_url`: `avatar_url`, `avatar`, then `fallback_avatar`
    /// - `created_at`: `createdAt`, `created_at`, `date_joined` (RFC 3339)
    ///
    /// Missing string fields default to empty rather than failing: the
    /// backend omits fields freely and the UI treats them as blanks.
    #[must_use]
    pub fn from_profile(profile: &serde_json::Value, fallback_avatar: Option<&str>) -> Self {
        let get = |field: &str| {
            profile
                .get(field)
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.is_empty())
        };

        let name = get("name")
            .or_else(|| get("first_name"))
            .or_else(|| get("username"))
            .unwrap_or_default()
            .to_string();

        let username = get("username")
            .or_else(|| get("name"))
            .or_else(|| get("email"))
            .unwrap_or_default()
            .to_string();

        let avatar_url = get("avatar_url")
            .or_else(|| get("avatar"))
            .or(fallback_avatar)
            .map(String::from);

        let created_at = get("createdAt")
            .or_else(|| get("created_at"))
            .or_else(|| get("date_joined"))
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Self {
            id: profile.get("id").and_then(serde_json::Value::as_i64).unwrap_or_default(),
            email: get("email").unwrap_or_default().to_string(),
            name,
            username,
            avatar_url,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_profile_maps_directly() {
        let user = User::from_profile(
            &json!({
                "id": 7,
                "email": "a@b.com",
                "name": "Alice",
                "username": "alice",
                "avatar_url": "http://cdn/a.png",
                "created_at": "2024-03-01T10:00:00+00:00"
            }),
            None,
        );

        assert_eq!(user.id, 7);
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.name, "Alice");
        assert_eq!(user.username, "alice");
        assert_eq!(user.avatar_url.as_deref(), Some("http://cdn/a.png"));
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_name_falls_back_to_first_name_then_username() {
        let from_first_name =
            User::from_profile(&json!({"first_name": "Ana", "username": "ana42"}), None);
        assert_eq!(from_first_name.name, "Ana");

        let from_username = User::from_profile(&json!({"username": "ana42"}), None);
        assert_eq!(from_username.name, "ana42");
    }

    #[test]
    fn test_username_falls_back_to_name_then_email() {
        let from_name = User::from_profile(&json!({"name": "Ana"}), None);
        assert_eq!(from_name.username, "Ana");

        let from_email = User::from_profile(&json!({"email": "ana@x.com"}), None);
        assert_eq!(from_email.username, "ana@x.com");
    }

    #[test]
    fn test_avatar_prefers_avatar_url_over_avatar() {
        let user = User::from_profile(
            &json!({"avatar_url": "http://cdn/primary.png", "avatar": "http://cdn/alt.png"}),
            Some("http://cdn/cached.png"),
        );
        assert_eq!(user.avatar_url.as_deref(), Some("http://cdn/primary.png"));
    }

    #[test]
    fn test_avatar_falls_back_to_alternate_key_then_cache() {
        let from_alt = User::from_profile(&json!({"avatar": "http://cdn/alt.png"}), None);
        assert_eq!(from_alt.avatar_url.as_deref(), Some("http://cdn/alt.png"));

        let from_cache = User::from_profile(&json!({}), Some("http://cdn/cached.png"));
        assert_eq!(from_cache.avatar_url.as_deref(), Some("http://cdn/cached.png"));

        let absent = User::from_profile(&json!({}), None);
        assert!(absent.avatar_url.is_none());
    }

    #[test]
    fn test_created_at_accepts_each_key_shape() {
        for key in ["createdAt", "created_at", "date_joined"] {
            let user = User::from_profile(&json!({key: "2024-03-01T10:00:00+00:00"}), None);
            assert!(user.created_at.is_some(), "expected {key} to parse");
        }
    }

    #[test]
    fn test_unparseable_created_at_becomes_none() {
        let user = User::from_profile(&json!({"created_at": "yesterday"}), None);
        assert!(user.created_at.is_none());
    }

    #[test]
    fn test_empty_strings_are_skipped_in_priority_order() {
        let user = User::from_profile(&json!({"name": "", "first_name": "Ana"}), None);
        assert_eq!(user.name, "Ana");
    }
}
