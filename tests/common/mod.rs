#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
};
use serde_json::{Value, json};

use taskmate::api::TaskMateHttpClient;
use taskmate::config::ClientConfig;

pub const PASSWORD: &str = "secret";

#[derive(Default)]
pub struct StubData {
    pub users: Vec<Value>,
    pub tasks: Vec<Value>,
    pub completions: Vec<Value>,
    /// Authorization header seen on each request, in order.
    pub auth_headers: Vec<Option<String>>,
    pub fail_completions: bool,
    pub fail_task_list: bool,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct StubBackend {
    pub data: Arc<Mutex<StubData>>,
}

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn reject(status: StatusCode, body: Value) -> (StatusCode, Json<Value>) {
    (status, Json(body))
}

fn id_of(value: &Value) -> Option<i64> {
    match value.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

impl StubBackend {
    /// One teacher (#1), two students (#7, #9) and three tasks.
    pub fn seeded() -> Self {
        let backend = Self::default();
        {
            let mut data = backend.data.lock().unwrap();
            data.users = vec![
                json!({"id": 1, "userName": "Ms. Rahman", "email": "teacher@school.test", "role": "TEACHER"}),
                json!({"id": "7", "userName": "Amy", "email": "amy@school.test", "role": "student"}),
                json!({"id": 9, "userName": "Ben", "email": "ben@school.test", "role": "STUDENT"}),
            ];
            data.tasks = vec![
                json!({"id": 1, "title": "Read chapter 1", "description": "Pages 1-20", "creatorId": 1,
                       "assigneeId": 7, "status": "COMPLETED", "points": 10}),
                json!({"id": "2", "title": "Essay", "description": "500 words", "creatorId": "1",
                       "assigneeId": "7", "status": "PENDING", "points": 15,
                       "deadline": "2020-01-01T00:00:00Z"}),
                json!({"id": 3, "title": "Worksheet", "description": "Fractions", "creatorId": 1,
                       "assigneeId": 9, "status": "PENDING", "points": null}),
            ];
            data.next_id = 100;
        }
        backend
    }

    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route("/login", post(login))
            .route("/users", get(list_users))
            .route("/users/create", post(create_user))
            .route("/tasks", get(list_tasks))
            .route("/tasks/create", post(create_task))
            .route("/tasks/{id}", delete(delete_task).patch(update_task))
            .route("/completeTasks/create", post(create_completion))
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("Failed to read stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub backend crashed");
        });
        format!("http://{}/", addr)
    }

    pub fn task(&self, id: i64) -> Option<Value> {
        let data = self.data.lock().unwrap();
        data.tasks.iter().find(|t| id_of(t) == Some(id)).cloned()
    }

    fn record(&self, headers: &HeaderMap) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        self.data.lock().unwrap().auth_headers.push(auth);
    }
}

pub async fn spawn_seeded() -> (StubBackend, String) {
    let backend = StubBackend::seeded();
    let url = backend.clone().spawn().await;
    (backend, url)
}

pub fn http_client(base_url: &str, token: Option<&str>) -> TaskMateHttpClient {
    TaskMateHttpClient::new(ClientConfig::new(base_url))
        .expect("Failed to build client")
        .with_token(token.map(|t| t.to_string()))
}

async fn login(State(stub): State<StubBackend>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    stub.record(&headers);
    let data = stub.data.lock().unwrap();
    let user = data
        .users
        .iter()
        .find(|u| u["email"] == body["email"] && body["password"] == PASSWORD)
        .cloned()
        .ok_or_else(|| {
            reject(StatusCode::UNAUTHORIZED, json!({"message": "Invalid email or password"}))
        })?;
    let token = format!("token-{}", id_of(&user).unwrap_or_default());
    Ok(Json(json!({ "user": user, "token": token })))
}

async fn list_users(State(stub): State<StubBackend>, headers: HeaderMap) -> Reply {
    stub.record(&headers);
    Ok(Json(Value::Array(stub.data.lock().unwrap().users.clone())))
}

async fn create_user(State(stub): State<StubBackend>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    stub.record(&headers);
    let mut data = stub.data.lock().unwrap();
    if data.users.iter().any(|u| u["email"] == body["email"]) {
        return Err(reject(StatusCode::CONFLICT, json!({"error": "Email already registered"})));
    }
    data.next_id += 1;
    let user = json!({
        "id": data.next_id,
        "userName": body["userName"],
        "email": body["email"],
        "role": body["role"],
    });
    data.users.push(user.clone());
    Ok(Json(user))
}

async fn list_tasks(State(stub): State<StubBackend>, headers: HeaderMap) -> Reply {
    stub.record(&headers);
    let data = stub.data.lock().unwrap();
    if data.fail_task_list {
        return Err(reject(StatusCode::INTERNAL_SERVER_ERROR, json!({"message": "Database unavailable"})));
    }
    Ok(Json(Value::Array(data.tasks.clone())))
}

async fn create_task(State(stub): State<StubBackend>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    stub.record(&headers);
    let mut data = stub.data.lock().unwrap();
    data.next_id += 1;
    let mut task = body;
    task["id"] = json!(data.next_id);
    task["status"] = json!("PENDING");
    data.tasks.push(task.clone());
    Ok(Json(task))
}

async fn update_task(
    State(stub): State<StubBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    stub.record(&headers);
    let mut data = stub.data.lock().unwrap();
    let task = data
        .tasks
        .iter_mut()
        .find(|t| id_of(t) == Some(id))
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, json!({"message": "Task not found"})))?;
    if let Value::Object(changes) = body {
        for (key, value) in changes {
            task[key.as_str()] = value;
        }
    }
    Ok(Json(task.clone()))
}

async fn delete_task(
    State(stub): State<StubBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    stub.record(&headers);
    let mut data = stub.data.lock().unwrap();
    let before = data.tasks.len();
    data.tasks.retain(|t| id_of(t) != Some(id));
    if data.tasks.len() == before {
        return Err(reject(StatusCode::NOT_FOUND, json!({"message": "Task not found"})));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn create_completion(
    State(stub): State<StubBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    stub.record(&headers);
    let mut data = stub.data.lock().unwrap();
    if data.fail_completions {
        return Err(reject(StatusCode::INTERNAL_SERVER_ERROR, json!({})));
    }
    data.next_id += 1;
    let mut record = body;
    record["id"] = json!(data.next_id);
    data.completions.push(record.clone());
    Ok(Json(record))
}
