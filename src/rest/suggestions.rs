//! AI suggestion payloads and their client.

use serde::Deserialize;

use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest};

/// A single AI-generated suggestion.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Suggestion {
    /// Headline for the suggestion card.
    #[serde(default)]
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub description: String,
    /// Grouping category such as `consistency` or `recovery`.
    #[serde(default)]
    pub category: Option<String>,
    /// Icon identifier for the card.
    #[serde(default)]
    pub icon: Option<String>,
    /// Name of the habit the suggestion refers to, if any.
    #[serde(default)]
    pub habit_name: Option<String>,
    /// Suggested call to action.
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Deserialize)]
struct SuggestionsBody {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

/// Client for the `ai-suggestions/` endpoint.
#[derive(Debug)]
pub struct SuggestionsClient<'a> {
    http: &'a HttpClient,
}

impl<'a> SuggestionsClient<'a> {
    pub(crate) const fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Fetches the current suggestion set.
    ///
    /// The backend wraps the list in a `suggestions` envelope; an absent or
    /// empty envelope decodes to an empty list rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure or a non-2xx response.
    pub async fn fetch(&self) -> Result<Vec<Suggestion>, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, "ai-suggestions/").build()?;
        let response = self.http.request(request).await?;

        let body: SuggestionsBody = serde_json::from_value(response.body)?;
        Ok(body.suggestions)
    }
}
