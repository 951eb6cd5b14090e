// Client-side error types for calls against the reference-data backend
use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::hierarchy::HierarchyError;
use crate::library::internal_control::ControlError;

#[derive(Error, Debug)]
pub enum ClientError {
    // Non-2xx response carrying the backend's message and per-field errors
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        field_errors: HashMap<String, String>,
    },

    // 401, session is gone or never existed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // 2xx response with `success: false` or without the expected `data`
    #[error("{0}")]
    Envelope(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    // Reading or writing the saved session
    #[error("Session storage failed: {0}")]
    Storage(#[from] std::io::Error),

    // Asked to edit a record that is not in the loaded list
    #[error("Record {0} is not loaded")]
    NotLoaded(i64),

    // Rejected locally before anything was sent
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Control(#[from] ControlError),
}

impl ClientError {
    /// Build from an error response body.
    ///
    /// The message comes from `message`, then the flattened `errors` map, then `error`,
    /// and finally falls back to the bare status.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let field_errors = field_errors(body);

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .or_else(|| {
                let mut all: Vec<&str> = Vec::new();
                if let Some(errors) = body.get("errors").and_then(Value::as_object) {
                    for value in errors.values() {
                        match value {
                            Value::Array(items) => all.extend(items.iter().filter_map(Value::as_str)),
                            Value::String(s) => all.push(s),
                            _ => {}
                        }
                    }
                }
                (!all.is_empty()).then(|| all.join(" "))
            })
            .or_else(|| body.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));

        if status == 401 {
            return ClientError::Unauthorized(message);
        }

        ClientError::Api {
            status,
            message,
            field_errors,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short machine-readable code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Api { status: 404, .. } => "NOT_FOUND",
            ClientError::Api { status: 409, .. } => "CONFLICT",
            ClientError::Api { status: 422, .. } => "VALIDATION_ERROR",
            ClientError::Api { status, .. } if *status >= 500 => "SERVER_ERROR",
            ClientError::Api { .. } => "BAD_REQUEST",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Envelope(_) => "INVALID_ENVELOPE",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Url(_) => "INVALID_URL",
            ClientError::Json(_) => "INVALID_JSON",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::NotLoaded(_) => "NOT_LOADED",
            ClientError::Hierarchy(_) => "HIERARCHY_ERROR",
            ClientError::Control(_) => "CONTROL_ERROR",
        }
    }

    pub fn field_errors(&self) -> Option<&HashMap<String, String>> {
        match self {
            ClientError::Api { field_errors, .. } if !field_errors.is_empty() => Some(field_errors),
            _ => None,
        }
    }
}

// First message per field, the way the edit forms show them
fn field_errors(body: &Value) -> HashMap<String, String> {
    let mut out = HashMap::new();
    if let Some(errors) = body.get("errors").and_then(Value::as_object) {
        for (field, value) in errors {
            let first = match value {
                Value::Array(items) => items.first().and_then(Value::as_str),
                Value::String(s) => Some(s.as_str()),
                _ => None,
            };
            if let Some(message) = first {
                out.insert(field.clone(), message.to_string());
            }
        }
    }
    out
}
