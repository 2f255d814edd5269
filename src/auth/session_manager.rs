//! The session manager: login, signup, restore, profile updates, logout.
//!
//! This is the one component of the client with real sequencing
//! obligations. It owns the [`Session`] state machine, mediates every auth
//! call against the backend, and keeps the persisted credential store in
//! step with the in-memory state.
//!
//! # Best-effort operations
//!
//! [`SessionManager::restore`] and [`SessionManager::logout`] never fail:
//! surfacing their errors would not change the correct UI behavior (fall
//! back to anonymous; proceed with local logout regardless). They return
//! definite outcome types that carry the swallowed diagnostic so callers
//! can still log it.
//!
//! # Concurrency
//!
//! Operations take `&mut self`; at most one can be in flight at a time from
//! a given caller, which matches the interactive, human-paced input this
//! client serves. There is no cross-manager mutual exclusion.

use serde_json::Value;

use crate::auth::credentials::{extract_token, LoginPayload};
use crate::auth::errors::AuthError;
use crate::auth::session::{Session, SessionState};
use crate::auth::user::User;
use crate::config::HabitConfig;
use crate::storage::{CredentialStore, StoreKey};

/// Outcome of the startup session restore.
///
/// Restore is best-effort: it always completes, and any failure along the
/// way (unreachable backend, rejected token) is reported here rather than
/// raised.
#[derive(Clone, Debug, Default)]
pub struct RestoreOutcome {
    /// Whether a session was re-established.
    pub authenticated: bool,
    /// The swallowed failure, if the restore fell back to anonymous
    /// for any reason other than "no token was persisted".
    pub diagnostic: Option<String>,
}

/// Outcome of a logout.
///
/// Local logout always succeeds; the backend notification is best-effort.
#[derive(Clone, Debug, Default)]
pub struct LogoutOutcome {
    /// The swallowed server-notification failure, if any.
    pub diagnostic: Option<String>,
}

/// A partial profile update; only present fields are sent to the backend.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    /// New display name, if changing.
    pub name: Option<String>,
    /// New email address, if changing.
    pub email: Option<String>,
}

/// Owns the authenticated-user state and mediates auth calls.
///
/// The manager is an explicit, injectable object with a defined lifecycle:
/// construct it at startup with a [`CredentialStore`], call
/// [`restore`](Self::restore) once, then drive it with login/logout calls
/// and pass it (or its [`Session`] view) to whatever needs user identity.
///
/// # Example
///
/// ```rust,ignore
/// let mut manager = SessionManager::new(config, Box::new(MemoryStore::new()));
///
/// let outcome = manager.restore().await;
/// if !outcome.authenticated {
///     manager.login("a@b.com", "password").await?;
/// }
/// println!("{}", manager.user().unwrap().name);
/// ```
pub struct SessionManager {
    config: HabitConfig,
    store: Box<dyn CredentialStore>,
    session: Session,
    http: reqwest::Client,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a manager over the given configuration and credential store.
    ///
    /// The session starts empty in the `Unresolved` state; call
    /// [`restore`](Self::restore) to hydrate it from persisted storage.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: HabitConfig, store: Box<dyn CredentialStore>) -> Self {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            store,
            session: Session::new(),
            http,
        }
    }

    /// Returns the current session view.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Returns the authenticated user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.session.user()
    }

    /// Returns `true` while the initial restore has not completed.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    /// Returns the persisted bearer token, if one exists.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.store.get(StoreKey::Token)
    }

    /// Attempts to re-establish a session from the persisted token.
    ///
    /// Called once at startup. With no persisted token this resolves to
    /// anonymous without a network call. With a token, the profile endpoint
    /// decides: success authenticates, anything else falls back to
    /// anonymous. A token the backend rejects is left in storage untouched.
    ///
    /// Best-effort: never fails. The swallowed diagnostic, if any, is
    /// logged and returned in the outcome.
    pub async fn restore(&mut self) -> RestoreOutcome {
        self.session.set_resolving();

        let Some(token) = self.store.get(StoreKey::Token) else {
            self.session.set_anonymous();
            return RestoreOutcome::default();
        };

        match self.fetch_profile(&token).await {
            Ok(profile) if !is_error_shaped(&profile) => {
                self.adopt_profile(&profile);
                RestoreOutcome {
                    authenticated: true,
                    diagnostic: None,
                }
            }
            Ok(profile) => {
                let diagnostic = error_message(&profile)
                    .unwrap_or("profile endpoint rejected the persisted token")
                    .to_string();
                tracing::warn!("session restore failed: {diagnostic}");
                self.session.set_anonymous();
                RestoreOutcome {
                    authenticated: false,
                    diagnostic: Some(diagnostic),
                }
            }
            Err(diagnostic) => {
                tracing::warn!("session restore failed: {diagnostic}");
                self.session.set_anonymous();
                RestoreOutcome {
                    authenticated: false,
                    diagnostic: Some(diagnostic),
                }
            }
        }
    }

    /// Logs in with a raw identifier and password.
    ///
    /// The identifier is classified as an email if it contains an `@`,
    /// otherwise as a username.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingCredentials`] if either argument is empty;
    ///   no network call is made
    /// - [`AuthError::Rejected`] if the backend refuses the credentials
    /// - [`AuthError::ProfileLoadFailed`] if the post-login profile fetch
    ///   fails; the just-persisted token is removed again
    /// - [`AuthError::Network`] on transport failure
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<(), AuthError> {
        if identifier.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        self.login_with(LoginPayload::classify(identifier, password))
            .await
    }

    /// Logs in with a pre-built payload.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login), minus the empty-credential check
    /// (a payload is shaped by construction).
    pub async fn login_with(&mut self, payload: LoginPayload) -> Result<(), AuthError> {
        let url = format!("{}/login/", self.config.api_root());
        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AuthError::network(&e))?;

        // Auth failures come back as error-shaped bodies, often on non-2xx
        // statuses; the token check below covers both, so the status itself
        // is not inspected here.
        let body: Value = response.json().await.map_err(|e| AuthError::network(&e))?;

        let Some(token) = extract_token(&body).map(String::from) else {
            let message = error_message(&body).unwrap_or("Invalid login").to_string();
            return Err(AuthError::Rejected { message });
        };

        // Persist the token before the profile fetch: the fetch authenticates
        // with it, and the rollback below depends on this ordering.
        self.store.set(StoreKey::Token, &token);

        match self.fetch_profile(&token).await {
            Ok(profile) if !is_error_shaped(&profile) => {
                self.adopt_profile(&profile);
                Ok(())
            }
            Ok(_) | Err(_) => {
                self.store.remove(StoreKey::Token);
                self.session.set_anonymous();
                Err(AuthError::ProfileLoadFailed)
            }
        }
    }

    /// Registers a new account.
    ///
    /// The username is derived from the local part of the email address, and
    /// the password is sent twice to satisfy the backend's confirmation
    /// field. Returns the backend's response body unmodified; signup does
    /// not establish a session, so callers follow a successful signup with
    /// [`login`](Self::login).
    ///
    /// # Errors
    ///
    /// [`AuthError::Network`] on transport failure.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Value, AuthError> {
        let username = email.split('@').next().unwrap_or(email);
        let url = format!("{}/register/", self.config.api_root());

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
                "password2": password,
                "name": name,
            }))
            .send()
            .await
            .map_err(|e| AuthError::network(&e))?;

        response.json().await.map_err(|e| AuthError::network(&e))
    }

    /// Updates the profile's name and/or email.
    ///
    /// Only present fields are sent. On a non-error response the returned
    /// `name`/`email` are merged into the in-memory user (prior values kept
    /// for omitted fields) and the display-field cache is re-persisted. On
    /// an error-shaped response the user is left untouched and the payload
    /// is returned for the caller to render.
    ///
    /// # Errors
    ///
    /// [`AuthError::Network`] on transport failure.
    pub async fn update_profile(&mut self, update: ProfileUpdate) -> Result<Value, AuthError> {
        let mut form = reqwest::multipart::Form::new();
        if let Some(name) = update.name {
            form = form.text("name", name);
        }
        if let Some(email) = update.email {
            form = form.text("email", email);
        }

        let body = self.patch_profile(form).await?;

        if !is_error_shaped(&body) {
            let returned_name = string_field(&body, "name");
            let returned_email = string_field(&body, "email");

            if let Some(user) = self.session.user_mut() {
                if let Some(name) = &returned_name {
                    user.name.clone_from(name);
                    user.username.clone_from(name);
                }
                if let Some(email) = &returned_email {
                    user.email.clone_from(email);
                }
            }

            if let Some(user) = self.session.user() {
                self.store.set(StoreKey::Username, &user.username);
                self.store.set(StoreKey::Email, &user.email);
            }
        }

        Ok(body)
    }

    /// Uploads a new avatar image.
    ///
    /// On success the avatar URL is extracted from either of the backend's
    /// two field names, applied to the in-memory user, and persisted. The
    /// raw backend result is returned either way.
    ///
    /// # Errors
    ///
    /// [`AuthError::Network`] on transport failure.
    pub async fn update_avatar(&mut self, image: Vec<u8>) -> Result<Value, AuthError> {
        let part = reqwest::multipart::Part::bytes(image)
            .file_name("avatar")
            .mime_str("application/octet-stream")
            .map_err(|e| AuthError::network(&e))?;
        let form = reqwest::multipart::Form::new().part("avatar", part);

        let body = self.patch_profile(form).await?;

        let avatar_url = string_field(&body, "avatar_url").or_else(|| string_field(&body, "avatar"));
        if let Some(avatar_url) = avatar_url {
            if let Some(user) = self.session.user_mut() {
                user.avatar_url = Some(avatar_url.clone());
            }
            self.store.set(StoreKey::AvatarUrl, &avatar_url);
        }

        Ok(body)
    }

    /// Logs out.
    ///
    /// Notifies the backend on a best-effort basis (any failure is swallowed
    /// and logged), then clears the in-memory user and every persisted store
    /// key. Idempotent: calling while already anonymous only re-clears
    /// storage.
    pub async fn logout(&mut self) -> LogoutOutcome {
        let diagnostic = match self.notify_logout().await {
            Ok(()) => None,
            Err(message) => {
                tracing::warn!("logout notification failed: {message}");
                Some(message)
            }
        };

        self.session.set_anonymous();
        self.store.clear_all();

        LogoutOutcome { diagnostic }
    }

    async fn notify_logout(&self) -> Result<(), String> {
        let Some(token) = self.store.get(StoreKey::Token) else {
            return Ok(());
        };

        let url = format!("{}/logout/", self.config.api_root());
        self.http
            .post(&url)
            .header("Authorization", format!("Token {token}"))
            .send()
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    /// Fetches the profile using the given token. Transport and decode
    /// failures come back as a diagnostic string; error-shaped bodies are
    /// returned as `Ok` for the caller to classify.
    async fn fetch_profile(&self, token: &str) -> Result<Value, String> {
        let url = format!("{}/profile/", self.config.api_root());
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Token {token}"))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        response.json().await.map_err(|e| e.to_string())
    }

    async fn patch_profile(&self, form: reqwest::multipart::Form) -> Result<Value, AuthError> {
        let url = format!("{}/profile/", self.config.api_root());
        let mut request = self.http.patch(&url).multipart(form);
        if let Some(token) = self.store.get(StoreKey::Token) {
            request = request.header("Authorization", format!("Token {token}"));
        }

        let response = request.send().await.map_err(|e| AuthError::network(&e))?;
        response.json().await.map_err(|e| AuthError::network(&e))
    }

    /// Installs a successful profile response as the authenticated user and
    /// re-persists the display-field cache.
    fn adopt_profile(&mut self, profile: &Value) {
        let fallback_avatar = self.store.get(StoreKey::AvatarUrl);
        let user = User::from_profile(profile, fallback_avatar.as_deref());

        if !user.username.is_empty() {
            self.store.set(StoreKey::Username, &user.username);
        }
        if !user.email.is_empty() {
            self.store.set(StoreKey::Email, &user.email);
        }
        if let Some(avatar_url) = &user.avatar_url {
            self.store.set(StoreKey::AvatarUrl, avatar_url);
        }

        self.session.set_authenticated(user);
    }
}

fn is_error_shaped(body: &Value) -> bool {
    body.get("detail").is_some() || body.get("error").is_some()
}

fn error_message(body: &Value) -> Option<&str> {
    body.get("error")
        .or_else(|| body.get("detail"))
        .and_then(Value::as_str)
}

fn string_field(body: &Value, field: &str) -> Option<String> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseUrl;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn manager_for(uri: &str) -> SessionManager {
        let config = HabitConfig::builder()
            .base_url(BaseUrl::new(uri).unwrap())
            .build()
            .unwrap();
        SessionManager::new(config, Box::new(MemoryStore::new()))
    }

    fn seed_token(manager: &SessionManager, token: &str) {
        manager.store.set(StoreKey::Token, token);
    }

    // ========================================================================
    // Restore
    // ========================================================================

    #[tokio::test]
    async fn test_restore_without_token_resolves_anonymous_without_network() {
        // No mock server at all: any network call would fail the test with
        // a connection error showing up in the diagnostic.
        let mut manager = manager_for("http://127.0.0.1:1");

        let outcome = manager.restore().await;

        assert!(!outcome.authenticated);
        assert!(outcome.diagnostic.is_none());
        assert_eq!(manager.state(), SessionState::Anonymous);
        assert!(!manager.is_loading());
    }

    #[tokio::test]
    async fn test_restore_with_valid_token_authenticates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profile/"))
            .and(header("Authorization", "Token persisted-tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1, "email": "a@b.com", "name": "Alice", "username": "alice"
            })))
            .mount(&server)
            .await;

        let mut manager = manager_for(&server.uri());
        seed_token(&manager, "persisted-tok");

        let outcome = manager.restore().await;

        assert!(outcome.authenticated);
        assert_eq!(manager.state(), SessionState::Authenticated);
        assert_eq!(manager.user().unwrap().name, "Alice");
        assert_eq!(
            manager.store.get(StoreKey::Username),
            Some("alice".to_string())
        );
        assert_eq!(
            manager.store.get(StoreKey::Email),
            Some("a@b.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_restore_with_rejected_token_falls_back_to_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profile/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"detail": "Invalid token."})),
            )
            .mount(&server)
            .await;

        let mut manager = manager_for(&server.uri());
        seed_token(&manager, "stale-tok");

        let outcome = manager.restore().await;

        assert!(!outcome.authenticated);
        assert_eq!(outcome.diagnostic.as_deref(), Some("Invalid token."));
        assert_eq!(manager.state(), SessionState::Anonymous);
        // The stale token is deliberately left in storage.
        assert_eq!(manager.token(), Some("stale-tok".to_string()));
    }

    #[tokio::test]
    async fn test_restore_network_failure_is_swallowed() {
        let mut manager = manager_for("http://127.0.0.1:1");
        seed_token(&manager, "tok");

        let outcome = manager.restore().await;

        assert!(!outcome.authenticated);
        assert!(outcome.diagnostic.is_some());
        assert_eq!(manager.state(), SessionState::Anonymous);
        assert!(!manager.is_loading());
    }

    #[tokio::test]
    async fn test_restore_merges_cached_avatar_when_server_omits_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profile/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1, "email": "a@b.com", "username": "alice"
            })))
            .mount(&server)
            .await;

        let mut manager = manager_for(&server.uri());
        seed_token(&manager, "tok");
        manager.store.set(StoreKey::AvatarUrl, "http://cdn/cached.png");

        manager.restore().await;

        assert_eq!(
            manager.user().unwrap().avatar_url.as_deref(),
            Some("http://cdn/cached.png")
        );
    }

    // ========================================================================
    // Login
    // ========================================================================

    #[tokio::test]
    async fn test_login_rejects_empty_credentials_without_network() {
        let mut manager = manager_for("http://127.0.0.1:1");

        assert_eq!(
            manager.login("", "pw").await,
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            manager.login("alice", "").await,
            Err(AuthError::MissingCredentials)
        );
        assert!(manager.token().is_none());
    }

    #[tokio::test]
    async fn test_login_with_email_identifier_sends_email_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login/"))
            .and(body_json(json!({"email": "a@b.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/profile/"))
            .and(header("Authorization", "Token abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1, "email": "a@b.com", "name": "Alice"
            })))
            .mount(&server)
            .await;

        let mut manager = manager_for(&server.uri());
        manager.login("a@b.com", "pw").await.unwrap();

        assert_eq!(manager.state(), SessionState::Authenticated);
        assert_eq!(manager.user().unwrap().email, "a@b.com");
        assert_eq!(manager.token(), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn test_login_with_username_identifier_sends_username_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login/"))
            .and(body_json(json!({"username": "alice", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/profile/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 1, "username": "alice"})),
            )
            .mount(&server)
            .await;

        let mut manager = manager_for(&server.uri());
        manager.login("alice", "pw").await.unwrap();

        assert_eq!(manager.state(), SessionState::Authenticated);
    }

    #[tokio::test]
    async fn test_login_without_token_in_response_surfaces_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login/"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"detail": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let mut manager = manager_for(&server.uri());
        let error = manager.login("a@b.com", "pw").await.unwrap_err();

        assert_eq!(
            error,
            AuthError::Rejected {
                message: "Invalid credentials".to_string()
            }
        );
        assert_eq!(manager.state(), SessionState::Unresolved);
        assert!(manager.token().is_none());
    }

    #[tokio::test]
    async fn test_login_without_token_and_without_message_uses_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;

        let mut manager = manager_for(&server.uri());
        let error = manager.login("a@b.com", "pw").await.unwrap_err();

        assert_eq!(
            error,
            AuthError::Rejected {
                message: "Invalid login".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_login_accepts_token_under_alternate_field_names() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"token": "nested"}})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/profile/"))
            .and(header("Authorization", "Token nested"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2})))
            .mount(&server)
            .await;

        let mut manager = manager_for(&server.uri());
        manager.login("a@b.com", "pw").await.unwrap();

        assert_eq!(manager.token(), Some("nested".to_string()));
    }

    #[tokio::test]
    async fn test_login_rolls_back_token_when_profile_fetch_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/profile/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"detail": "Invalid token."})),
            )
            .mount(&server)
            .await;

        let mut manager = manager_for(&server.uri());
        let error = manager.login("a@b.com", "pw").await.unwrap_err();

        assert_eq!(error, AuthError::ProfileLoadFailed);
        assert_eq!(manager.state(), SessionState::Anonymous);
        assert!(manager.token().is_none(), "token must be rolled back");
    }

    #[tokio::test]
    async fn test_login_network_failure_becomes_network_error() {
        let mut manager = manager_for("http://127.0.0.1:1");

        let error = manager.login("a@b.com", "pw").await.unwrap_err();

        assert!(matches!(error, AuthError::Network { .. }));
    }

    // ========================================================================
    // Signup
    // ========================================================================

    #[tokio::test]
    async fn test_signup_derives_username_and_doubles_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/register/"))
            .and(body_json(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "pw",
                "password2": "pw",
                "name": "Alice",
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let manager = manager_for(&server.uri());
        let body = manager.signup("Alice", "alice@example.com", "pw").await.unwrap();

        assert_eq!(body, json!({"success": true}));
        // Signup does not establish a session.
        assert_eq!(manager.state(), SessionState::Unresolved);
        assert!(manager.token().is_none());
    }

    #[tokio::test]
    async fn test_signup_returns_backend_error_shape_unmodified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/register/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "password": ["Passwords do not match"]
            })))
            .mount(&server)
            .await;

        let manager = manager_for(&server.uri());
        let body = manager.signup("Alice", "alice@example.com", "pw").await.unwrap();

        assert_eq!(body["password"][0], "Passwords do not match");
    }

    // ========================================================================
    // Profile updates
    // ========================================================================

    async fn authenticated_manager(server: &MockServer) -> SessionManager {
        Mock::given(method("GET"))
            .and(path("/api/profile/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1, "email": "a@b.com", "name": "Alice", "username": "alice"
            })))
            .mount(server)
            .await;

        let mut manager = manager_for(&server.uri());
        seed_token(&manager, "tok");
        manager.restore().await;
        manager
    }

    #[tokio::test]
    async fn test_update_profile_merges_name_and_keeps_email() {
        let server = MockServer::start().await;
        let mut manager = authenticated_manager(&server).await;

        Mock::given(method("PATCH"))
            .and(path("/api/profile/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Alicia"})))
            .mount(&server)
            .await;

        manager
            .update_profile(ProfileUpdate {
                name: Some("Alicia".to_string()),
                email: None,
            })
            .await
            .unwrap();

        let user = manager.user().unwrap();
        assert_eq!(user.name, "Alicia");
        assert_eq!(user.email, "a@b.com", "omitted email must be unchanged");
        assert_eq!(
            manager.store.get(StoreKey::Username),
            Some("Alicia".to_string())
        );
    }

    #[tokio::test]
    async fn test_update_profile_error_shape_leaves_user_untouched() {
        let server = MockServer::start().await;
        let mut manager = authenticated_manager(&server).await;

        Mock::given(method("PATCH"))
            .and(path("/api/profile/"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "Invalid email"})),
            )
            .mount(&server)
            .await;

        let body = manager
            .update_profile(ProfileUpdate {
                email: Some("broken".to_string()),
                name: None,
            })
            .await
            .unwrap();

        assert_eq!(body["detail"], "Invalid email");
        assert_eq!(manager.user().unwrap().email, "a@b.com");
    }

    #[tokio::test]
    async fn test_update_avatar_extracts_either_field_and_persists() {
        let server = MockServer::start().await;
        let mut manager = authenticated_manager(&server).await;

        Mock::given(method("PATCH"))
            .and(path("/api/profile/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"avatar": "http://cdn/new.png"})),
            )
            .mount(&server)
            .await;

        manager.update_avatar(vec![1, 2, 3]).await.unwrap();

        assert_eq!(
            manager.user().unwrap().avatar_url.as_deref(),
            Some("http://cdn/new.png")
        );
        assert_eq!(
            manager.store.get(StoreKey::AvatarUrl),
            Some("http://cdn/new.png".to_string())
        );
    }

    // ========================================================================
    // Logout
    // ========================================================================

    #[tokio::test]
    async fn test_logout_clears_user_and_all_store_keys() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/logout/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;
        let mut manager = authenticated_manager(&server).await;

        let outcome = manager.logout().await;

        assert!(outcome.diagnostic.is_none());
        assert_eq!(manager.state(), SessionState::Anonymous);
        assert!(manager.user().is_none());
        for key in StoreKey::ALL {
            assert!(manager.store.get(key).is_none(), "expected {key} cleared");
        }
    }

    #[tokio::test]
    async fn test_logout_succeeds_locally_when_server_is_unreachable() {
        let mut manager = manager_for("http://127.0.0.1:1");
        seed_token(&manager, "tok");
        manager.store.set(StoreKey::Username, "alice");

        let outcome = manager.logout().await;

        assert!(outcome.diagnostic.is_some());
        assert_eq!(manager.state(), SessionState::Anonymous);
        for key in StoreKey::ALL {
            assert!(manager.store.get(key).is_none());
        }
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let mut manager = manager_for("http://127.0.0.1:1");

        let first = manager.logout().await;
        let second = manager.logout().await;

        // Without a token there is nothing to notify, so no diagnostic.
        assert!(first.diagnostic.is_none());
        assert!(second.diagnostic.is_none());
        assert_eq!(manager.state(), SessionState::Anonymous);
    }
}
