//! In-process fake of the makerlog API server.
//!
//! Binds an axum router to `127.0.0.1:0`, keeps users, sessions and
//! entities in memory, records every request it receives, and can be
//! scripted to answer a given method + path with a fixed status and body.
//! Error bodies are plain text terminated by a newline, as the real
//! server writes them.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::{Body, Bytes};
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use makerlog_client::{ApiClient, ClientConfig};
use makerlog_core::models::{
    CreateLogEntry, CreateProject, CreateTask, LogEntry, LoginRequest, Project, RegisterRequest,
    Task, UpdateLogEntry, UpdateProject, UpdateTask, User,
};
use makerlog_core::types::DbId;

pub const SESSION_COOKIE: &str = "makerlog_session";

/// One request as the fake server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    /// Request body parsed as JSON (`Null` when empty).
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn cookie(&self) -> Option<&str> {
        self.headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Path plus `?query` when present.
    pub fn target(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }
}

#[derive(Default)]
struct Store {
    next_id: DbId,
    users: Vec<(User, String)>,
    sessions: HashMap<String, DbId>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    logs: Vec<LogEntry>,
    recorded: Vec<RecordedRequest>,
    scripted: HashMap<(Method, String), (StatusCode, String)>,
}

impl Store {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared handle to the fake server's state.
#[derive(Clone, Default)]
pub struct FakeApi {
    store: Arc<Mutex<Store>>,
}

impl FakeApi {
    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.store.lock().unwrap().recorded.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("fake server has not received any request")
    }

    pub fn clear_requests(&self) {
        self.store.lock().unwrap().recorded.clear();
    }

    /// Answer every `method path` request with `status` and `body`,
    /// bypassing the in-memory backend.
    pub fn script(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.store
            .lock()
            .unwrap()
            .scripted
            .insert((method, path.to_string()), (status, body.to_string()));
    }
}

/// A running fake server.
pub struct TestServer {
    pub base_url: String,
    pub api: FakeApi,
}

impl TestServer {
    /// A client with an empty session pointed at this server.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(ClientConfig::new(self.base_url.clone())).unwrap()
    }

    /// A client that has registered (and is therefore logged in) as a
    /// fresh user.
    pub async fn logged_in_client(&self) -> ApiClient {
        let client = self.client();
        client
            .register(&RegisterRequest {
                email: format!("user{}@example.com", self.api.requests().len()),
                password: "correct horse".into(),
                name: "Test User".into(),
            })
            .await
            .expect("registration against the fake server should succeed");
        client
    }
}

/// Start a fake server on an ephemeral port.
pub async fn spawn() -> TestServer {
    let api = FakeApi::default();
    let app = router(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        api,
    }
}

fn router(api: FakeApi) -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/log-entries", get(list_logs).post(create_log))
        .route(
            "/api/log-entries/{id}",
            get(get_log).put(update_log).delete(delete_log),
        )
        .route("/api/today", get(today))
        .layer(middleware::from_fn_with_state(api.clone(), record))
        .with_state(api)
}

// ---------------------------------------------------------------------------
// Middleware: record every request, replay scripted answers
// ---------------------------------------------------------------------------

async fn record(State(api): State<FakeApi>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let scripted = {
        let mut store = api.store.lock().unwrap();
        store.recorded.push(RecordedRequest {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers.clone(),
            body: bytes.clone(),
        });
        store
            .scripted
            .get(&(parts.method.clone(), parts.uri.path().to_string()))
            .cloned()
    };

    if let Some((status, body)) = scripted {
        return (status, body).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Plain-text error with a trailing newline.
fn plain_error(status: StatusCode, message: &str) -> Response {
    (status, format!("{message}\n")).into_response()
}

fn unauthorized() -> Response {
    plain_error(StatusCode::UNAUTHORIZED, "Unauthorized")
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(&format!("{SESSION_COOKIE}=")))
        .map(str::to_string)
}

fn current_user(api: &FakeApi, headers: &HeaderMap) -> Result<DbId, Response> {
    let token = session_token(headers).ok_or_else(unauthorized)?;
    api.store
        .lock()
        .unwrap()
        .sessions
        .get(&token)
        .copied()
        .ok_or_else(unauthorized)
}

fn with_session_cookie(status: StatusCode, user: &User, token: &str) -> Response {
    let mut response = (status, Json(user.clone())).into_response();
    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly");
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).unwrap(),
    );
    response
}

/// Log entries go out with `log_date` as a midnight timestamp.
fn log_json(entry: &LogEntry) -> Value {
    let mut value = serde_json::to_value(entry).unwrap();
    value["log_date"] = json!(format!("{}T00:00:00Z", entry.log_date));
    value
}

#[derive(Deserialize)]
struct ProjectFilter {
    project_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn register(State(api): State<FakeApi>, Json(req): Json<RegisterRequest>) -> Response {
    if req.email.is_empty() || req.password.is_empty() || req.name.is_empty() {
        return plain_error(
            StatusCode::BAD_REQUEST,
            "Email, password, and name are required",
        );
    }

    let mut store = api.store.lock().unwrap();
    if store.users.iter().any(|(u, _)| u.email == req.email) {
        return plain_error(StatusCode::CONFLICT, "Email already registered");
    }

    let now = Utc::now();
    let user = User {
        id: store.next_id(),
        email: req.email,
        name: req.name,
        created_at: now,
        updated_at: now,
    };
    let token = format!("token-{}", user.id);
    store.sessions.insert(token.clone(), user.id);
    store.users.push((user.clone(), req.password));

    with_session_cookie(StatusCode::CREATED, &user, &token)
}

async fn login(State(api): State<FakeApi>, Json(req): Json<LoginRequest>) -> Response {
    let mut store = api.store.lock().unwrap();
    let Some(user) = store
        .users
        .iter()
        .find(|(u, password)| u.email == req.email && *password == req.password)
        .map(|(u, _)| u.clone())
    else {
        return plain_error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };

    let token = format!("token-{}-{}", user.id, store.sessions.len());
    store.sessions.insert(token.clone(), user.id);
    with_session_cookie(StatusCode::OK, &user, &token)
}

async fn logout(State(api): State<FakeApi>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        api.store.lock().unwrap().sessions.remove(&token);
    }
    let mut response = StatusCode::OK.into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&format!("{SESSION_COOKIE}=; Path=/; Max-Age=0")).unwrap(),
    );
    response
}

async fn me(State(api): State<FakeApi>, headers: HeaderMap) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let store = api.store.lock().unwrap();
    let user = store
        .users
        .iter()
        .find(|(u, _)| u.id == user_id)
        .map(|(u, _)| u.clone())
        .ok_or_else(|| plain_error(StatusCode::NOT_FOUND, "User not found"))?;
    Ok(Json(user).into_response())
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

async fn list_projects(
    State(api): State<FakeApi>,
    headers: HeaderMap,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let store = api.store.lock().unwrap();
    let projects: Vec<Project> = store
        .projects
        .iter()
        .filter(|p| p.user_id == user_id)
        .cloned()
        .collect();
    Ok(Json(projects).into_response())
}

async fn create_project(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Json(req): Json<CreateProject>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    if req.name.is_empty() {
        return Err(plain_error(StatusCode::BAD_REQUEST, "Project name is required"));
    }

    let mut store = api.store.lock().unwrap();
    let now = Utc::now();
    let project = Project {
        id: store.next_id(),
        user_id,
        name: req.name,
        description: req.description,
        created_at: now,
        updated_at: now,
    };
    store.projects.push(project.clone());
    Ok((StatusCode::CREATED, Json(project)).into_response())
}

async fn get_project(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<DbId>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let store = api.store.lock().unwrap();
    store
        .projects
        .iter()
        .find(|p| p.id == id && p.user_id == user_id)
        .map(|p| Json(p.clone()).into_response())
        .ok_or_else(|| plain_error(StatusCode::NOT_FOUND, "Project not found"))
}

async fn update_project(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<DbId>,
    Json(req): Json<UpdateProject>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let mut store = api.store.lock().unwrap();
    let project = store
        .projects
        .iter_mut()
        .find(|p| p.id == id && p.user_id == user_id)
        .ok_or_else(|| plain_error(StatusCode::NOT_FOUND, "Project not found"))?;

    if let Some(name) = req.name {
        project.name = name;
    }
    if let Some(description) = req.description {
        project.description = description;
    }
    project.updated_at = Utc::now();
    Ok(Json(project.clone()).into_response())
}

async fn delete_project(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<DbId>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let mut store = api.store.lock().unwrap();
    store.projects.retain(|p| !(p.id == id && p.user_id == user_id));
    store.tasks.retain(|t| t.project_id != id);
    Ok(StatusCode::NO_CONTENT.into_response())
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

async fn list_tasks(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Query(filter): Query<ProjectFilter>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let store = api.store.lock().unwrap();
    let tasks: Vec<Task> = store
        .tasks
        .iter()
        .filter(|t| t.user_id == user_id)
        .filter(|t| filter.project_id.map_or(true, |p| t.project_id == p))
        .cloned()
        .collect();
    Ok(Json(tasks).into_response())
}

async fn create_task(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Json(req): Json<CreateTask>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    if req.title.is_empty() {
        return Err(plain_error(StatusCode::BAD_REQUEST, "Task title is required"));
    }

    let mut store = api.store.lock().unwrap();
    let now = Utc::now();
    let task = Task {
        id: store.next_id(),
        user_id,
        project_id: req.project_id,
        title: req.title,
        description: req.description,
        status: req.status.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };
    store.tasks.push(task.clone());
    Ok((StatusCode::CREATED, Json(task)).into_response())
}

async fn get_task(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<DbId>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let store = api.store.lock().unwrap();
    store
        .tasks
        .iter()
        .find(|t| t.id == id && t.user_id == user_id)
        .map(|t| Json(t.clone()).into_response())
        .ok_or_else(|| plain_error(StatusCode::NOT_FOUND, "Task not found"))
}

async fn update_task(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<DbId>,
    Json(req): Json<UpdateTask>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let mut store = api.store.lock().unwrap();
    let task = store
        .tasks
        .iter_mut()
        .find(|t| t.id == id && t.user_id == user_id)
        .ok_or_else(|| plain_error(StatusCode::NOT_FOUND, "Task not found"))?;

    if let Some(project_id) = req.project_id {
        task.project_id = project_id;
    }
    if let Some(title) = req.title {
        task.title = title;
    }
    if let Some(description) = req.description {
        task.description = description;
    }
    if let Some(status) = req.status {
        task.status = status;
    }
    task.updated_at = Utc::now();
    Ok(Json(task.clone()).into_response())
}

async fn delete_task(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<DbId>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let mut store = api.store.lock().unwrap();
    store.tasks.retain(|t| !(t.id == id && t.user_id == user_id));
    Ok(StatusCode::NO_CONTENT.into_response())
}

// ---------------------------------------------------------------------------
// Log entries
// ---------------------------------------------------------------------------

async fn list_logs(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Query(filter): Query<ProjectFilter>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let store = api.store.lock().unwrap();
    let logs: Vec<Value> = store
        .logs
        .iter()
        .filter(|l| l.user_id == user_id)
        .filter(|l| filter.project_id.map_or(true, |p| l.project_id == Some(p)))
        .map(log_json)
        .collect();
    Ok(Json(logs).into_response())
}

async fn create_log(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Json(req): Json<CreateLogEntry>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    if req.content.is_empty() {
        return Err(plain_error(StatusCode::BAD_REQUEST, "Content is required"));
    }

    let mut store = api.store.lock().unwrap();
    let now = Utc::now();
    let entry = LogEntry {
        id: store.next_id(),
        user_id,
        task_id: req.task_id,
        project_id: req.project_id,
        content: req.content,
        log_date: req.log_date.unwrap_or_else(|| now.date_naive()),
        created_at: now,
        updated_at: now,
    };
    store.logs.push(entry.clone());
    Ok((StatusCode::CREATED, Json(log_json(&entry))).into_response())
}

async fn get_log(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<DbId>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let store = api.store.lock().unwrap();
    store
        .logs
        .iter()
        .find(|l| l.id == id && l.user_id == user_id)
        .map(|l| Json(log_json(l)).into_response())
        .ok_or_else(|| plain_error(StatusCode::NOT_FOUND, "Log entry not found"))
}

async fn update_log(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<DbId>,
    Json(req): Json<UpdateLogEntry>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let mut store = api.store.lock().unwrap();
    let entry = store
        .logs
        .iter_mut()
        .find(|l| l.id == id && l.user_id == user_id)
        .ok_or_else(|| plain_error(StatusCode::NOT_FOUND, "Log entry not found"))?;

    if let Some(task_id) = req.task_id {
        entry.task_id = Some(task_id);
    }
    if let Some(project_id) = req.project_id {
        entry.project_id = Some(project_id);
    }
    if let Some(content) = req.content {
        entry.content = content;
    }
    if let Some(log_date) = req.log_date {
        entry.log_date = log_date;
    }
    entry.updated_at = Utc::now();
    Ok(Json(log_json(entry)).into_response())
}

async fn delete_log(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Path(id): Path<DbId>,
) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let mut store = api.store.lock().unwrap();
    store.logs.retain(|l| !(l.id == id && l.user_id == user_id));
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn today(State(api): State<FakeApi>, headers: HeaderMap) -> Result<Response, Response> {
    let user_id = current_user(&api, &headers)?;
    let today = Utc::now().date_naive();
    let store = api.store.lock().unwrap();
    let logs: Vec<Value> = store
        .logs
        .iter()
        .filter(|l| l.user_id == user_id && l.log_date == today)
        .map(log_json)
        .collect();
    Ok(Json(logs).into_response())
}
