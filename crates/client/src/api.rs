//! REST API client for the makerlog HTTP endpoints.
//!
//! Wraps the auth, project, task, log-entry and today endpoints using
//! [`reqwest`]. The session is carried by a shared cookie jar attached to
//! the underlying client; this module never reads or writes the cookie.

use std::fmt;
use std::sync::Arc;

use makerlog_core::models::{
    CreateLogEntry, CreateProject, CreateTask, LogEntry, LoginRequest, Project, RegisterRequest,
    Task, UpdateLogEntry, UpdateProject, UpdateTask, User,
};
use makerlog_core::types::DbId;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

/// HTTP client for one makerlog API server.
///
/// Cheap to clone; clones share the connection pool and the cookie jar.
/// The only instance state besides those is the immutable base URL, so a
/// single client may be used from many tasks at once.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    cookie_jar: Arc<Jar>,
}

/// Per-call request shape handed to the request primitive.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method (default: `GET`).
    pub method: Method,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
    /// Extra headers. These replace the defaults of the same name.
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self::with_method(Method::POST)
    }

    pub fn put() -> Self {
        Self::with_method(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::with_method(Method::DELETE)
    }

    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Attach `body` serialized as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body).map_err(ApiError::Encode)?);
        Ok(self)
    }

    /// Add or override a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client with a fresh, empty session.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Self::with_cookie_jar(config, Arc::new(Jar::default()))
    }

    /// Create a client whose session lives in `cookie_jar`.
    ///
    /// Lets the caller restore a previously saved session or share one
    /// session between several clients.
    pub fn with_cookie_jar(config: ClientConfig, cookie_jar: Arc<Jar>) -> ApiResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)
            .map_err(|_| ApiError::InvalidBaseUrl(config.base_url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(config.base_url));
        }

        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookie_jar))
            .build()?;

        Ok(Self {
            client,
            base_url,
            cookie_jar,
        })
    }

    /// Base URL every endpoint path is appended to, without a trailing `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The cookie jar holding the session credential.
    pub fn cookie_jar(&self) -> &Arc<Jar> {
        &self.cookie_jar
    }

    // ---- auth ----

    /// `POST /api/auth/register`. The server starts a session on success.
    pub async fn register(&self, data: &RegisterRequest) -> ApiResult<User> {
        self.request("/api/auth/register", RequestOptions::post().json(data)?)
            .await
    }

    /// `POST /api/auth/login`. The server starts a session on success.
    pub async fn login(&self, data: &LoginRequest) -> ApiResult<User> {
        self.request("/api/auth/login", RequestOptions::post().json(data)?)
            .await
    }

    /// `POST /api/auth/logout`. The server clears the session cookie.
    pub async fn logout(&self) -> ApiResult<()> {
        self.request_empty("/api/auth/logout", RequestOptions::post())
            .await
    }

    /// `GET /api/auth/me`. Fails with 401 when there is no active session.
    pub async fn get_me(&self) -> ApiResult<User> {
        self.request("/api/auth/me", RequestOptions::get()).await
    }

    // ---- projects ----

    pub async fn get_projects(&self) -> ApiResult<Vec<Project>> {
        self.request("/api/projects", RequestOptions::get()).await
    }

    pub async fn get_project(&self, id: DbId) -> ApiResult<Project> {
        self.request(&format!("/api/projects/{id}"), RequestOptions::get())
            .await
    }

    pub async fn create_project(&self, data: &CreateProject) -> ApiResult<Project> {
        self.request("/api/projects", RequestOptions::post().json(data)?)
            .await
    }

    /// `PUT /api/projects/{id}` with only the fields set in `data`.
    pub async fn update_project(&self, id: DbId, data: &UpdateProject) -> ApiResult<Project> {
        self.request(
            &format!("/api/projects/{id}"),
            RequestOptions::put().json(data)?,
        )
        .await
    }

    pub async fn delete_project(&self, id: DbId) -> ApiResult<()> {
        self.request_empty(&format!("/api/projects/{id}"), RequestOptions::delete())
            .await
    }

    // ---- tasks ----

    /// `GET /api/tasks`, optionally filtered to one project.
    pub async fn get_tasks(&self, project_id: Option<DbId>) -> ApiResult<Vec<Task>> {
        self.request(
            &with_project_filter("/api/tasks", project_id),
            RequestOptions::get(),
        )
        .await
    }

    pub async fn get_task(&self, id: DbId) -> ApiResult<Task> {
        self.request(&format!("/api/tasks/{id}"), RequestOptions::get())
            .await
    }

    pub async fn create_task(&self, data: &CreateTask) -> ApiResult<Task> {
        self.request("/api/tasks", RequestOptions::post().json(data)?)
            .await
    }

    /// `PUT /api/tasks/{id}` with only the fields set in `data`.
    pub async fn update_task(&self, id: DbId, data: &UpdateTask) -> ApiResult<Task> {
        self.request(&format!("/api/tasks/{id}"), RequestOptions::put().json(data)?)
            .await
    }

    pub async fn delete_task(&self, id: DbId) -> ApiResult<()> {
        self.request_empty(&format!("/api/tasks/{id}"), RequestOptions::delete())
            .await
    }

    // ---- log entries ----

    /// `GET /api/log-entries`, optionally filtered to one project.
    pub async fn get_log_entries(&self, project_id: Option<DbId>) -> ApiResult<Vec<LogEntry>> {
        self.request(
            &with_project_filter("/api/log-entries", project_id),
            RequestOptions::get(),
        )
        .await
    }

    pub async fn get_log_entry(&self, id: DbId) -> ApiResult<LogEntry> {
        self.request(&format!("/api/log-entries/{id}"), RequestOptions::get())
            .await
    }

    pub async fn create_log_entry(&self, data: &CreateLogEntry) -> ApiResult<LogEntry> {
        self.request("/api/log-entries", RequestOptions::post().json(data)?)
            .await
    }

    /// `PUT /api/log-entries/{id}` with only the fields set in `data`.
    pub async fn update_log_entry(&self, id: DbId, data: &UpdateLogEntry) -> ApiResult<LogEntry> {
        self.request(
            &format!("/api/log-entries/{id}"),
            RequestOptions::put().json(data)?,
        )
        .await
    }

    pub async fn delete_log_entry(&self, id: DbId) -> ApiResult<()> {
        self.request_empty(&format!("/api/log-entries/{id}"), RequestOptions::delete())
            .await
    }

    /// `GET /api/today`. "Today" is decided by the server's clock.
    pub async fn get_today_log_entries(&self) -> ApiResult<Vec<LogEntry>> {
        self.request("/api/today", RequestOptions::get()).await
    }

    // ---- private helpers ----

    /// Build the outgoing request: base URL + endpoint, JSON content type
    /// unless overridden, and the serialized body.
    fn prepare(&self, endpoint: &str, options: RequestOptions) -> reqwest::RequestBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(options.headers);

        let builder = self
            .client
            .request(options.method, format!("{}{}", self.base_url, endpoint))
            .headers(headers);

        match options.body {
            Some(body) => builder.body(body.to_string()),
            None => builder,
        }
    }

    /// Send a request and ensure a success status. Every call passes here.
    async fn send(&self, endpoint: &str, options: RequestOptions) -> ApiResult<reqwest::Response> {
        let method = options.method.clone();
        let response = self.prepare(endpoint, options).send().await?;

        tracing::debug!(
            method = %method,
            path = endpoint,
            status = response.status().as_u16(),
            "API request completed",
        );

        Self::ensure_success(response).await
    }

    /// Send a request and decode its JSON body.
    ///
    /// A `204 No Content` or empty body decodes from JSON `null`, which
    /// yields `()` for unit results and a decode error for anything that
    /// requires data.
    async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let response = self.send(endpoint, options).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return serde_json::from_value(serde_json::Value::Null).map_err(ApiError::Decode);
        }

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_value(serde_json::Value::Null).map_err(ApiError::Decode);
        }

        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }

    /// Send a request whose result carries no data, discarding any body.
    async fn request_empty(&self, endpoint: &str, options: RequestOptions) -> ApiResult<()> {
        self.send(endpoint, options).await?;
        Ok(())
    }

    /// Returns the response unchanged on success, or an
    /// [`ApiError::Http`] carrying the body text on failure.
    async fn ensure_success(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(response)
    }
}

/// Append `?project_id=<id>` when a filter is given.
fn with_project_filter(path: &str, project_id: Option<DbId>) -> String {
    match project_id {
        Some(id) => format!("{path}?project_id={id}"),
        None => path.to_string(),
    }
}
