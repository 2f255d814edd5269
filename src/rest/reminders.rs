//! Reminder resources and their client.

use serde::{Deserialize, Serialize};

use crate::clients::{DataType, HttpClient, HttpError, HttpMethod, HttpRequest};

/// A reminder as returned by the backend.
///
/// `habit_name` and `habit_icon` are denormalized from the linked habit by
/// the serializer; a reminder with no linked habit is a general reminder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Backend reminder id.
    pub id: i64,
    /// Linked habit id, if any.
    #[serde(default)]
    pub habit: Option<i64>,
    /// Name of the linked habit.
    #[serde(default)]
    pub habit_name: Option<String>,
    /// Icon of the linked habit.
    #[serde(default)]
    pub habit_icon: Option<String>,
    /// Fire time in `HH:MM` form.
    #[serde(default)]
    pub time: String,
    /// Day selection: `everyday`, `weekdays`, `weekends`, or `custom`.
    #[serde(default)]
    pub days: String,
    /// Day names when `days` is `custom`.
    #[serde(default)]
    pub custom_days: Vec<String>,
    /// Notification message.
    #[serde(default)]
    pub message: String,
    /// Whether the reminder currently fires.
    #[serde(default)]
    pub is_active: bool,
    /// Creation timestamp, as reported by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Writable reminder fields for create and update calls.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ReminderDraft {
    /// Linked habit id; `null` creates a general reminder.
    pub habit: Option<i64>,
    /// Fire time in `HH:MM` form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Day selection keyword.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<String>,
    /// Day names when `days` is `custom`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_days: Option<Vec<String>>,
    /// Notification message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct ToggleBody {
    #[serde(default)]
    is_active: bool,
}

/// Client for the `reminders/` resource.
#[derive(Debug)]
pub struct RemindersClient<'a> {
    http: &'a HttpClient,
}

impl<'a> RemindersClient<'a> {
    pub(crate) const fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Lists all reminders for the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure, a non-2xx response, or a
    /// body that does not decode as a reminder list.
    pub async fn list(&self) -> Result<Vec<Reminder>, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, "reminders/").build()?;
        let response = self.http.request(request).await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Creates a reminder.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    pub async fn create(&self, draft: &ReminderDraft) -> Result<Reminder, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Post, "reminders/")
            .body(serde_json::to_value(draft)?)
            .body_type(DataType::Json)
            .build()?;
        let response = self.http.request(request).await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Partially updates a reminder.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    pub async fn update(&self, id: i64, draft: &ReminderDraft) -> Result<Reminder, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Patch, format!("reminders/{id}/"))
            .body(serde_json::to_value(draft)?)
            .body_type(DataType::Json)
            .build()?;
        let response = self.http.request(request).await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Deletes a reminder.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    pub async fn delete(&self, id: i64) -> Result<(), HttpError> {
        let request =
            HttpRequest::builder(HttpMethod::Delete, format!("reminders/{id}/")).build()?;
        self.http.request(request).await?;
        Ok(())
    }

    /// Flips a reminder's active flag. Returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    pub async fn toggle(&self, id: i64) -> Result<bool, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Post, format!("reminders/{id}/toggle/"))
            .allow_empty_body()
            .build()?;
        let response = self.http.request(request).await?;

        let body: ToggleBody = serde_json::from_value(response.body)?;
        Ok(body.is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reminder_deserializes_general_reminder() {
        let reminder: Reminder = serde_json::from_value(json!({
            "id": 4,
            "habit": null,
            "time": "09:00",
            "days": "everyday",
            "message": "Drink water",
            "is_active": true
        }))
        .unwrap();

        assert!(reminder.habit.is_none());
        assert!(reminder.habit_name.is_none());
        assert_eq!(reminder.time, "09:00");
        assert!(reminder.is_active);
    }

    #[test]
    fn test_reminder_deserializes_denormalized_habit_fields() {
        let reminder: Reminder = serde_json::from_value(json!({
            "id": 4,
            "habit": 7,
            "habit_name": "Read",
            "habit_icon": "📚",
            "time": "21:30",
            "days": "custom",
            "custom_days": ["mon", "wed"]
        }))
        .unwrap();

        assert_eq!(reminder.habit, Some(7));
        assert_eq!(reminder.habit_name.as_deref(), Some("Read"));
        assert_eq!(reminder.custom_days, vec!["mon", "wed"]);
    }

    #[test]
    fn test_draft_always_carries_habit_key() {
        // The backend distinguishes "general reminder" (habit: null) from a
        // linked one, so the key is serialized even when None.
        let draft = ReminderDraft {
            time: Some("07:30".to_string()),
            ..ReminderDraft::default()
        };

        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({"habit": null, "time": "07:30"})
        );
    }
}
