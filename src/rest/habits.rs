//! Habit resources and their client.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::clients::{DataType, HttpClient, HttpError, HttpMethod, HttpRequest};

/// A habit as returned by the backend.
///
/// The serializer omits fields freely depending on backend version, so
/// everything except `id` and `name` is defaulted. Completion statistics
/// (`streak`, `total_completions`) come back camel-cased from some backend
/// revisions; the aliases absorb that.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Backend habit id.
    pub id: i64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Emoji or icon identifier shown on the habit card.
    #[serde(default)]
    pub icon: Option<String>,
    /// Card color theme name.
    #[serde(default)]
    pub color: Option<String>,
    /// Cadence label such as `Daily` or `Weekly`.
    #[serde(default)]
    pub target: Option<String>,
    /// Grouping category such as `health`.
    #[serde(default)]
    pub category: Option<String>,
    /// Difficulty label.
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Times per cadence period.
    #[serde(default)]
    pub frequency: Option<u32>,
    /// Reminder time in `HH:MM:SS` form.
    #[serde(default)]
    pub reminder: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Stored image reference: a media path or inline base64 data.
    #[serde(default)]
    pub image: Option<String>,
    /// Absolute URL for the stored image; the serializer emits this next to
    /// `image` on every body, `null` when no image is set.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Current consecutive-day streak.
    #[serde(default)]
    pub streak: u32,
    /// Lifetime completion count.
    #[serde(default, alias = "totalCompletions")]
    pub total_completions: u32,
    /// Most recent completion date.
    #[serde(default, alias = "lastCompleted")]
    pub last_completed: Option<NaiveDate>,
    /// Creation timestamp, as reported by the backend.
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    /// Completion dates, when the serializer inlines them.
    #[serde(default)]
    pub completions: Vec<NaiveDate>,
}

/// Writable habit fields for create and update calls.
///
/// `None` fields are omitted from the payload, so a partial update only
/// touches what it names.
#[derive(Clone, Debug, Default, Serialize)]
pub struct HabitDraft {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Emoji or icon identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Card color theme name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Cadence label such as `Daily`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Grouping category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Difficulty label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Times per cadence period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    /// Reminder time in `HH:MM:SS` form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<String>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HabitDraft {
    /// Builds the multipart form for an image-carrying create or update,
    /// one text part per present field plus the image file.
    fn form_with_image(&self, image: Vec<u8>) -> Result<reqwest::multipart::Form, HttpError> {
        let mut form = reqwest::multipart::Form::new();

        let text_fields = [
            ("name", &self.name),
            ("description", &self.description),
            ("icon", &self.icon),
            ("color", &self.color),
            ("target", &self.target),
            ("category", &self.category),
            ("difficulty", &self.difficulty),
            ("reminder", &self.reminder),
            ("notes", &self.notes),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                form = form.text(field, value.clone());
            }
        }
        if let Some(frequency) = self.frequency {
            form = form.text("frequency", frequency.to_string());
        }

        let part = reqwest::multipart::Part::bytes(image)
            .file_name("habit")
            .mime_str("application/octet-stream")?;
        Ok(form.part("image", part))
    }
}

/// Result of toggling a completion.
#[derive(Clone, Debug, Deserialize)]
pub struct ToggleOutcome {
    /// What the backend did: `"completed"` or `"uncompleted"`.
    pub action: String,
    /// The habit with recalculated statistics, when the backend returns it.
    #[serde(default)]
    pub habit: Option<Habit>,
    /// The habit's completion dates after the toggle.
    #[serde(default)]
    pub completions: Vec<NaiveDate>,
}

/// Client for the `habits/` resource.
#[derive(Debug)]
pub struct HabitsClient<'a> {
    http: &'a HttpClient,
}

impl<'a> HabitsClient<'a> {
    pub(crate) const fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Lists all habits for the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure, a non-2xx response, or a
    /// body that does not decode as a habit list.
    pub async fn list(&self) -> Result<Vec<Habit>, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, "habits/").build()?;
        let response = self.http.request(request).await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Creates a habit.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    pub async fn create(&self, draft: &HabitDraft) -> Result<Habit, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Post, "habits/")
            .body(serde_json::to_value(draft)?)
            .body_type(DataType::Json)
            .build()?;
        let response = self.http.request(request).await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Creates a habit with an image, as a multipart form.
    ///
    /// The draft's present fields become text parts and the image bytes go
    /// under the `image` field, matching the backend's upload contract.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    pub async fn create_with_image(
        &self,
        draft: &HabitDraft,
        image: Vec<u8>,
    ) -> Result<Habit, HttpError> {
        let form = draft.form_with_image(image)?;
        let response = self
            .http
            .request_multipart(HttpMethod::Post, "habits/", form)
            .await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Partially updates a habit.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    pub async fn update(&self, id: i64, draft: &HabitDraft) -> Result<Habit, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Patch, format!("habits/{id}/"))
            .body(serde_json::to_value(draft)?)
            .body_type(DataType::Json)
            .build()?;
        let response = self.http.request(request).await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Partially updates a habit and replaces its image.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    pub async fn update_with_image(
        &self,
        id: i64,
        draft: &HabitDraft,
        image: Vec<u8>,
    ) -> Result<Habit, HttpError> {
        let form = draft.form_with_image(image)?;
        let response = self
            .http
            .request_multipart(HttpMethod::Patch, &format!("habits/{id}/"), form)
            .await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Deletes a habit.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    pub async fn delete(&self, id: i64) -> Result<(), HttpError> {
        let request = HttpRequest::builder(HttpMethod::Delete, format!("habits/{id}/")).build()?;
        self.http.request(request).await?;
        Ok(())
    }

    /// Toggles a completion for the given date.
    ///
    /// With `None` the backend records or removes today's completion, using
    /// its own clock.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    pub async fn toggle_completion(
        &self,
        id: i64,
        date: Option<NaiveDate>,
    ) -> Result<ToggleOutcome, HttpError> {
        let body = date.map_or_else(|| json!({}), |date| json!({ "date": date }));

        let request = HttpRequest::builder(HttpMethod::Post, format!("habits/{id}/toggle_completion/"))
            .body(body)
            .body_type(DataType::Json)
            .build()?;
        let response = self.http.request(request).await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Fetches every completion, keyed by habit id.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    pub async fn completions(&self) -> Result<HashMap<i64, Vec<NaiveDate>>, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, "habits/completions/").build()?;
        let response = self.http.request(request).await?;

        // The backend keys this map by stringified habit id.
        let raw: HashMap<String, Vec<NaiveDate>> = serde_json::from_value(response.body)?;
        Ok(raw
            .into_iter()
            .filter_map(|(id, dates)| id.parse().ok().map(|id| (id, dates)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_habit_deserializes_sparse_body() {
        let habit: Habit = serde_json::from_value(json!({"id": 3, "name": "Read"})).unwrap();

        assert_eq!(habit.id, 3);
        assert_eq!(habit.name, "Read");
        assert_eq!(habit.streak, 0);
        assert!(habit.icon.is_none());
        assert!(habit.completions.is_empty());
    }

    #[test]
    fn test_habit_accepts_camel_cased_statistics() {
        let habit: Habit = serde_json::from_value(json!({
            "id": 3,
            "name": "Read",
            "totalCompletions": 12,
            "lastCompleted": "2026-08-20"
        }))
        .unwrap();

        assert_eq!(habit.total_completions, 12);
        assert_eq!(
            habit.last_completed,
            NaiveDate::from_ymd_opt(2026, 8, 20)
        );
    }

    #[test]
    fn test_habit_decodes_body_with_image_and_image_url() {
        // The serializer emits both keys on every habit body: the stored
        // media path and the absolute URL derived from it.
        let habit: Habit = serde_json::from_value(json!({
            "id": 1,
            "name": "Read",
            "image": "habits/read.png",
            "image_url": "http://127.0.0.1:8000/media/habits/read.png"
        }))
        .unwrap();

        assert_eq!(habit.image.as_deref(), Some("habits/read.png"));
        assert_eq!(
            habit.image_url.as_deref(),
            Some("http://127.0.0.1:8000/media/habits/read.png")
        );
    }

    #[test]
    fn test_habit_decodes_frequency_and_reminder() {
        let habit: Habit = serde_json::from_value(json!({
            "id": 1,
            "name": "Read",
            "frequency": 3,
            "reminder": "21:30:00"
        }))
        .unwrap();

        assert_eq!(habit.frequency, Some(3));
        assert_eq!(habit.reminder.as_deref(), Some("21:30:00"));
    }

    #[test]
    fn test_draft_omits_absent_fields() {
        let draft = HabitDraft {
            name: Some("Read".to_string()),
            ..HabitDraft::default()
        };

        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({"name": "Read"})
        );
    }

    #[test]
    fn test_draft_serializes_frequency_and_reminder() {
        let draft = HabitDraft {
            name: Some("Read".to_string()),
            frequency: Some(2),
            reminder: Some("07:00:00".to_string()),
            ..HabitDraft::default()
        };

        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({"name": "Read", "frequency": 2, "reminder": "07:00:00"})
        );
    }

    #[test]
    fn test_toggle_outcome_tolerates_missing_habit() {
        let outcome: ToggleOutcome = serde_json::from_value(json!({
            "action": "completed",
            "completions": ["2026-08-24"]
        }))
        .unwrap();

        assert_eq!(outcome.action, "completed");
        assert!(outcome.habit.is_none());
        assert_eq!(outcome.completions.len(), 1);
    }
}
