//! REST client for the reference-data backend.
//!
//! Every collection endpoint answers with a `{ success, data, message }` envelope.

pub mod client;

pub use client::ApiClient;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiEnvelope<T> {
    /// Fails on `success: false`.
    pub fn check(self) -> Result<Self, ClientError> {
        if self.success {
            Ok(self)
        } else {
            Err(ClientError::Envelope(
                self.message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            ))
        }
    }

    /// The payload, for calls where `data` is required.
    pub fn into_data(self) -> Result<T, ClientError> {
        self.check()?
            .data
            .ok_or_else(|| ClientError::Envelope("Response is missing data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_envelope_data() {
        let envelope: ApiEnvelope<Vec<i64>> =
            serde_json::from_value(json!({ "success": true, "data": [1, 2] })).unwrap();
        assert_eq!(envelope.into_data().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_envelope_failures() {
        let envelope: ApiEnvelope<Value> =
            serde_json::from_value(json!({ "success": false, "message": "Agency is in use" })).unwrap();
        assert_eq!(envelope.into_data().unwrap_err().to_string(), "Agency is in use");

        let envelope: ApiEnvelope<Value> =
            serde_json::from_value(json!({ "success": true, "message": "Deleted" })).unwrap();
        assert!(envelope.clone().check().is_ok());
        assert!(matches!(envelope.into_data(), Err(ClientError::Envelope(_))));
    }
}
