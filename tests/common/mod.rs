#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};

use audit_library::api::ApiClient;
use audit_library::auth::{AuthClient, MemorySessionStore, SessionStore};

pub const EMAIL: &str = "maria@coa.gov.ph";
pub const PASSWORD: &str = "secret123";
pub const TOKEN: &str = "1|stub-session-token";

/// In-process stand-in for the reference-data backend.
#[derive(Default)]
pub struct Backend {
    pub collections: HashMap<String, Vec<Value>>,
    pub next_id: i64,
    pub logged_in: bool,
    pub request_ids: Vec<String>,
    pub requests: Vec<(String, String, Value)>,
}

type Shared = Arc<Mutex<Backend>>;

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: Shared,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let state: Shared = Arc::new(Mutex::new(seed()));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        let app = router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { port, base_url, state })
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&format!("{}/api/v1", self.base_url), Duration::from_secs(5))
            .expect("valid stub url")
    }

    pub fn auth(&self) -> (AuthClient, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::default());
        let api = ApiClient::new(&format!("{}/api/auth", self.base_url), Duration::from_secs(5))
            .expect("valid stub url");
        let shared: Arc<dyn SessionStore> = store.clone();
        (AuthClient::new(api, shared), store)
    }

    pub fn collection(&self, name: &str) -> Vec<Value> {
        self.state.lock().unwrap().collections.get(name).cloned().unwrap_or_default()
    }

    /// Method, path and body of every write the stub received.
    pub fn writes(&self) -> Vec<(String, String, Value)> {
        self.state.lock().unwrap().requests.clone()
    }
}

fn seed() -> Backend {
    let mut collections = HashMap::new();
    collections.insert(
        "audit-areas".to_string(),
        vec![
            json!({ "id": 1, "name": "Planning", "parentId": null, "active": 1 }),
            json!({ "id": 2, "name": "Budgeting", "parentId": 1, "active": 1 }),
            json!({ "id": 3, "name": "Forecasting", "parentId": 2, "active": 1 }),
            json!({ "id": 4, "name": "Procurement", "parentId": null, "active": 0 }),
        ],
    );
    collections.insert(
        "internal-controls".to_string(),
        vec![json!({
            "id": 10,
            "auditAreaId": 4,
            "auditAreaName": "Procurement",
            "category": "Control Activities",
            "description": "Purchasing controls",
            "active": 1,
            "componentsCount": 3,
            "components": [
                { "sequenceNumber": 1, "description": "Approved supplier list" },
                { "sequenceNumber": 2, "description": "Three quotations" },
                { "sequenceNumber": 3, "description": "Inspection on delivery" }
            ]
        })],
    );
    collections.insert(
        "agencies".to_string(),
        vec![json!({
            "id": 100,
            "name": "Department of Budget and Management",
            "acronym": "DBM",
            "headOfAgency": "A. Secretary",
            "position": "Secretary",
            "classificationGroup": "National Government",
            "contactDetails": "8-123-4567",
            "address": "Manila",
            "groupCode": "NGA"
        })],
    );
    for name in ["auditors", "audit-criteria", "audit-types", "document-types", "user-accounts"] {
        collections.insert(name.to_string(), Vec::new());
    }

    Backend {
        collections,
        next_id: 1000,
        ..Default::default()
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/:collection", get(list).post(create))
        .route("/api/v1/:collection/:id", get(show).put(update).delete(remove))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/user", get(current_user))
        .with_state(state)
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn not_found(collection: &str) -> Response {
    reply(
        StatusCode::NOT_FOUND,
        json!({ "success": false, "message": format!("No record in {}", collection) }),
    )
}

fn note(state: &mut Backend, headers: &HeaderMap) {
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        state.request_ids.push(id.to_string());
    }
}

async fn list(State(state): State<Shared>, Path(collection): Path<String>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    note(&mut state, &headers);
    match state.collections.get(&collection) {
        Some(rows) => reply(StatusCode::OK, json!({ "success": true, "data": rows })),
        None => not_found(&collection),
    }
}

async fn show(State(state): State<Shared>, Path((collection, id)): Path<(String, i64)>) -> Response {
    let state = state.lock().unwrap();
    let found = state
        .collections
        .get(&collection)
        .and_then(|rows| rows.iter().find(|r| r["id"] == id).cloned());
    match found {
        Some(row) => reply(StatusCode::OK, json!({ "success": true, "data": row })),
        None => not_found(&collection),
    }
}

async fn create(
    State(state): State<Shared>,
    Path(collection): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.requests.push(("POST".into(), collection.clone(), payload.clone()));
    if !state.collections.contains_key(&collection) {
        return not_found(&collection);
    }

    let id = match (collection.as_str(), payload.get("agn_id").and_then(Value::as_i64)) {
        ("agencies", Some(id)) => id,
        _ => {
            state.next_id += 1;
            state.next_id
        }
    };
    let record = match apply(&collection, json!({ "id": id }), &payload) {
        Ok(record) => record,
        Err(response) => return response,
    };

    if let Some(rows) = state.collections.get_mut(&collection) {
        rows.push(record.clone());
    }
    reply(StatusCode::CREATED, json!({ "success": true, "data": record }))
}

async fn update(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, i64)>,
    Json(payload): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.requests.push(("PUT".into(), format!("{}/{}", collection, id), payload.clone()));

    let Some(row) = state
        .collections
        .get_mut(&collection)
        .and_then(|rows| rows.iter_mut().find(|r| r["id"] == id))
    else {
        return not_found(&collection);
    };
    match apply(&collection, row.clone(), &payload) {
        Ok(updated) => {
            *row = updated.clone();
            reply(StatusCode::OK, json!({ "success": true, "data": updated }))
        }
        Err(response) => response,
    }
}

async fn remove(State(state): State<Shared>, Path((collection, id)): Path<(String, i64)>) -> Response {
    let mut state = state.lock().unwrap();
    state.requests.push(("DELETE".into(), format!("{}/{}", collection, id), Value::Null));

    let Some(rows) = state.collections.get_mut(&collection) else {
        return not_found(&collection);
    };
    let before = rows.len();
    rows.retain(|r| r["id"] != id);
    if rows.len() == before {
        return not_found(&collection);
    }
    reply(StatusCode::OK, json!({ "success": true, "message": "Deleted successfully" }))
}

fn invalid(field: &str, message: &str) -> Response {
    reply(
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "errors": { field: [message] } }),
    )
}

// Map prefixed payload keys onto the camelCase record.
fn apply(collection: &str, mut record: Value, payload: &Value) -> Result<Value, Response> {
    let fields: &[(&str, &str)] = match collection {
        "audit-areas" => &[("ara_name", "name"), ("ara_ara_id", "parentId"), ("ara_active", "active")],
        "internal-controls" => &[
            ("ic_ara_id", "auditAreaId"),
            ("ic_category", "category"),
            ("ic_desc", "description"),
            ("ic_active", "active"),
        ],
        "agencies" => &[
            ("agn_name", "name"),
            ("agn_acronym", "acronym"),
            ("agn_grp_code", "groupCode"),
            ("agn_address", "address"),
            ("agn_head_name", "headOfAgency"),
            ("agn_head_position", "position"),
            ("agn_contact_details", "contactDetails"),
        ],
        _ => &[],
    };

    let object: &mut Map<String, Value> = record.as_object_mut().expect("records are objects");
    for (wire, field) in fields {
        if let Some(value) = payload.get(*wire) {
            if field == &"name" && value.as_str().map(str::trim).unwrap_or("").is_empty() {
                return Err(invalid(wire, &format!("The {} field is required.", wire)));
            }
            object.insert(field.to_string(), value.clone());
        }
    }

    if let Some(components) = payload.get("components").and_then(Value::as_array) {
        let mapped: Vec<Value> = components
            .iter()
            .map(|c| json!({ "sequenceNumber": c["com_seqnum"], "description": c["com_desc"] }))
            .collect();
        object.insert("componentsCount".into(), json!(mapped.len()));
        object.insert("components".into(), Value::Array(mapped));
    }

    if !object.contains_key("name") && collection != "internal-controls" && !fields.is_empty() {
        return Err(invalid(fields[0].0, &format!("The {} field is required.", fields[0].0)));
    }
    Ok(record)
}

fn user() -> Value {
    json!({ "id": 1, "name": "Maria Santos", "email": EMAIL, "created_at": "2025-01-01T00:00:00Z" })
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

async fn login(State(state): State<Shared>, Json(payload): Json<Value>) -> Response {
    if payload["usr_email"] == EMAIL && payload["usr_password"] == PASSWORD {
        state.lock().unwrap().logged_in = true;
        reply(StatusCode::OK, json!({ "access_token": TOKEN, "user": user() }))
    } else {
        reply(
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Invalid credentials" }),
        )
    }
}

async fn register(Json(payload): Json<Value>) -> Response {
    if payload["usr_password"] != payload["usr_password_confirmation"] {
        return invalid("usr_password", "The password confirmation does not match.");
    }
    reply(
        StatusCode::CREATED,
        json!({ "user": { "id": 2, "name": payload["usr_name"], "email": payload["usr_email"] } }),
    )
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if !bearer_ok(&headers) || !state.logged_in {
        return reply(StatusCode::UNAUTHORIZED, json!({ "message": "Unauthenticated." }));
    }
    state.logged_in = false;
    reply(StatusCode::OK, json!({ "message": "Logged out" }))
}

async fn current_user(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !bearer_ok(&headers) || !state.lock().unwrap().logged_in {
        return reply(StatusCode::UNAUTHORIZED, json!({ "message": "Unauthenticated." }));
    }
    reply(StatusCode::OK, user())
}
