use crate::domain::session::driven_ports::SessionWriter;
use crate::domain::session::Credentials;
use crate::external_connections::ExternalConnectivity;
use crate::gateway::http_session_driven_ports::HttpSessionWriter;
use axum::extract::{Path, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

pub const TEST_EMAIL: &str = "jane@example.com";
pub const TEST_PASSWORD: &str = "hunter22";
const TEST_USER_ID: &str = "65f0c0ffee0000000000beef";
const SESSION_COOKIE: &str = "jwt=fake-session-token";

struct BackendState {
    tasks: Vec<Value>,
    next_id: u32,
    echo_updates: bool,
    forced_status: Option<StatusCode>,
    last_body: Value,
}

type SharedState = Arc<Mutex<BackendState>>;

/// Small in-process stand-in for the task backend. It speaks the same wire format, sets the
/// same session cookie, and can be told to misbehave.
pub struct FakeBackend {
    pub base_url: String,
    state: SharedState,
}

impl FakeBackend {
    pub async fn start() -> FakeBackend {
        let state = Arc::new(Mutex::new(BackendState {
            tasks: Vec::new(),
            next_id: 1,
            echo_updates: true,
            forced_status: None,
            last_body: Value::Null,
        }));
        let router = Router::new()
            .route("/api/login", post(login))
            .route("/api/user", get(current_user))
            .route("/api/logout", post(logout))
            .route("/api/register", post(register))
            .route("/api/tasks", get(list_tasks).post(create_task))
            .route(
                "/api/tasks/:id",
                put(replace_task).patch(patch_task).delete(delete_task),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("fake backend could not bind");
        let address = listener
            .local_addr()
            .expect("fake backend has no local address");
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("fake backend stopped unexpectedly");
        });

        FakeBackend {
            base_url: format!("http://{address}"),
            state,
        }
    }

    /// Logs the test user in so [ext_cxn]'s cookie jar holds a valid session
    pub async fn log_in(&self, ext_cxn: &impl ExternalConnectivity) {
        HttpSessionWriter
            .login(
                &Credentials {
                    email: TEST_EMAIL.to_owned(),
                    password: TEST_PASSWORD.to_owned(),
                },
                ext_cxn,
            )
            .await
            .expect("fake backend login failed");
    }

    pub fn seed_task(&self, task: Value) {
        self.lock().tasks.push(task);
    }

    pub fn task_count(&self) -> usize {
        self.lock().tasks.len()
    }

    /// JSON body of the most recent write request
    pub fn last_body(&self) -> Value {
        self.lock().last_body.clone()
    }

    /// Makes updates answer with a bare message, the way the production backend does
    pub fn stop_echoing_updates(&self) {
        self.lock().echo_updates = false;
    }

    /// Every later request fails with [status] and the backend's usual error body
    pub fn fail_with(&self, status: u16) {
        self.lock().forced_status =
            Some(StatusCode::from_u16(status).expect("invalid status code for fake backend"));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackendState> {
        self.state.lock().expect("fake backend state poisoned")
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn is_logged_in(headers: &HeaderMap) -> bool {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|cookies| cookies.split("; ").any(|cookie| cookie == SESSION_COOKIE))
}

/// Shared preamble for authenticated routes: forced failures first, then the cookie check
fn guard(state: &SharedState, headers: &HeaderMap, failure: &str) -> Result<(), Response> {
    if let Some(status) = state.lock().expect("fake backend state poisoned").forced_status {
        return Err(error_response(status, failure));
    }
    if !is_logged_in(headers) {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Authorization token is missing",
        ));
    }

    Ok(())
}

fn test_user() -> Value {
    json!({
        "_id": TEST_USER_ID,
        "name": "Jane Doe",
        "email": TEST_EMAIL,
        "role_id": "000000000000000000000000",
    })
}

async fn login(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    if let Some(status) = state.lock().expect("fake backend state poisoned").forced_status {
        return error_response(status, "Failed to sign the token");
    }
    if body["email"] != TEST_EMAIL || body["password"] != TEST_PASSWORD {
        return error_response(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }

    (
        StatusCode::OK,
        [(SET_COOKIE, format!("{SESSION_COOKIE}; Path=/; HttpOnly"))],
        Json(json!({ "message": "Login successful", "token": "fake-session-token" })),
    )
        .into_response()
}

async fn current_user(headers: HeaderMap) -> Response {
    if !is_logged_in(&headers) {
        return error_response(StatusCode::UNAUTHORIZED, "Missing token");
    }

    Json(test_user()).into_response()
}

async fn logout() -> Response {
    (
        [(SET_COOKIE, "jwt=; Path=/; Max-Age=0; HttpOnly")],
        Json(json!({ "message": "success" })),
    )
        .into_response()
}

async fn register(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    if let Some(status) = state.lock().expect("fake backend state poisoned").forced_status {
        return error_response(status, "Failed to create user");
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "_id": "65f0c0ffee0000000000cafe",
            "name": body["name"],
            "email": body["email"],
            "role_id": "000000000000000000000000",
        })),
    )
        .into_response()
}

async fn list_tasks(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(response) = guard(&state, &headers, "Failed to retrieve tasks") {
        return response;
    }

    let tasks = state.lock().expect("fake backend state poisoned").tasks.clone();
    Json(json!({ "tasks": tasks })).into_response()
}

async fn create_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = guard(&state, &headers, "Failed to create task") {
        return response;
    }

    let mut locked = state.lock().expect("fake backend state poisoned");
    let task = json!({
        "_id": format!("{:024x}", locked.next_id),
        "name": body["name"],
        "description": body["description"],
        "status": body["status"],
        "created_at": "2024-03-14T09:26:53Z",
        "updated_at": "0001-01-01T00:00:00Z",
    });
    locked.next_id += 1;
    locked.tasks.push(task.clone());
    locked.last_body = body;

    (
        StatusCode::CREATED,
        Json(json!({ "message": "Task created successfully", "task": task })),
    )
        .into_response()
}

/// Merges [changes] into the stored task and answers the way the backend is configured to
fn update_task(state: &SharedState, id: &str, changes: Value) -> Response {
    let mut locked = state.lock().expect("fake backend state poisoned");
    locked.last_body = changes.clone();
    let echo_updates = locked.echo_updates;
    let Some(task) = locked.tasks.iter_mut().find(|task| task["_id"] == id) else {
        return error_response(StatusCode::NOT_FOUND, "Task not found");
    };

    if let (Some(stored), Value::Object(changes)) = (task.as_object_mut(), changes) {
        stored.extend(changes);
        stored.insert("updated_at".into(), json!("2024-03-15T10:00:00Z"));
    }

    if echo_updates {
        Json(json!({ "message": "Task updated successfully", "task": task })).into_response()
    } else {
        Json(json!({ "message": "Task updated successfully" })).into_response()
    }
}

async fn replace_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = guard(&state, &headers, "Failed to update task") {
        return response;
    }

    update_task(&state, &id, body)
}

async fn patch_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = guard(&state, &headers, "Failed to update task") {
        return response;
    }

    update_task(&state, &id, body)
}

async fn delete_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = guard(&state, &headers, "Failed to delete task") {
        return response;
    }

    let mut locked = state.lock().expect("fake backend state poisoned");
    let before = locked.tasks.len();
    locked.tasks.retain(|task| task["_id"] != id.as_str());
    if locked.tasks.len() == before {
        return error_response(StatusCode::NOT_FOUND, "Task not found");
    }

    Json(json!({ "message": "Task deleted successfully" })).into_response()
}
