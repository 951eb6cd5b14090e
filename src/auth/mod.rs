//! Login session against the auth endpoints.
//!
//! Auth responses are plain JSON, not the `{ success, data }` envelope used by the
//! reference-data API.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::ApiClient;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "usr_name")]
    pub name: String,
    #[serde(rename = "usr_email")]
    pub email: String,
    #[serde(rename = "usr_password")]
    pub password: String,
    #[serde(rename = "usr_password_confirmation")]
    pub password_confirmation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub logged_in_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(response: AuthResponse) -> Self {
        let expires_at = token_expiry(&response.access_token);
        Self {
            token: response.access_token,
            user: response.user,
            logged_in_at: Utc::now(),
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| exp <= Utc::now())
    }
}

/// Where the current session is kept between calls.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, ClientError>;
    fn save(&self, session: &Session) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// Session held only for the life of the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    fn slot(&self) -> Result<MutexGuard<'_, Option<Session>>, ClientError> {
        self.session
            .lock()
            .map_err(|e| ClientError::Storage(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        *self.slot()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.slot()? = None;
        Ok(())
    }
}

pub struct AuthClient {
    api: ApiClient,
    store: Arc<dyn SessionStore>,
}

impl AuthClient {
    /// `api` must point at the auth base URL, e.g. `http://127.0.0.1:8000/api/auth`.
    pub fn new(api: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self { api, store }
    }

    pub fn session(&self) -> Result<Option<Session>, ClientError> {
        self.store.load()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = json!({ "usr_email": email, "usr_password": password });
        let value = self.api.send(Method::POST, "/login", Some(&body)).await?;
        let response: AuthResponse = serde_json::from_value(value)?;

        let session = Session::new(response);
        self.store.save(&session)?;
        tracing::info!("Logged in as {}", session.user.email);
        Ok(session)
    }

    /// Create an account without logging in. Returns the new user when the backend echoes it.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<User>, ClientError> {
        let value = self.api.send(Method::POST, "/register", Some(request)).await?;
        let user = match value.get("user") {
            Some(user) => Some(serde_json::from_value(user.clone())?),
            None => None,
        };
        Ok(user)
    }

    /// Ends the session on the server, then forgets it locally.
    ///
    /// A 401 means the server already dropped it, so the local copy is cleared too.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let Some(session) = self.store.load()? else {
            return Ok(());
        };

        let api = self.api.clone().with_token(session.token);
        match api.send::<()>(Method::POST, "/logout", None).await {
            Ok(_) | Err(ClientError::Unauthorized(_)) => {
                self.store.clear()?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch the logged-in user. A 401 clears the stored session.
    pub async fn current_user(&self) -> Result<User, ClientError> {
        let Some(session) = self.store.load()? else {
            return Err(ClientError::Unauthorized("Not logged in".to_string()));
        };

        let api = self.api.clone().with_token(session.token);
        match api.send::<()>(Method::GET, "/user", None).await {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(ClientError::Unauthorized(message)) => {
                tracing::warn!("Session rejected, clearing it: {}", message);
                self.store.clear()?;
                Err(ClientError::Unauthorized(message))
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Expiry of a JWT access token, read without checking the signature.
///
/// Opaque tokens and JWTs without `exp` have no known expiry.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    Utc.timestamp_opt(data.claims.exp?, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: i64,
    }

    fn user() -> User {
        User {
            id: 1,
            name: "Maria Santos".into(),
            email: "maria@coa.gov.ph".into(),
            email_verified_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_token_expiry_from_jwt() {
        let claims = TestClaims {
            sub: "1".into(),
            exp: 1_900_000_000,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret")).unwrap();

        let expiry = token_expiry(&token).unwrap();
        assert_eq!(expiry.timestamp(), 1_900_000_000);
    }

    #[test]
    fn test_opaque_token_has_no_expiry() {
        assert_eq!(token_expiry("12|p4ssAg3T0k3n"), None);
        assert_eq!(token_expiry(""), None);
    }

    #[test]
    fn test_session_expiry() {
        let mut session = Session::new(AuthResponse {
            access_token: "12|opaque".into(),
            user: user(),
        });
        assert!(!session.is_expired());

        session.expires_at = Some(Utc::now() - chrono::Duration::minutes(1));
        assert!(session.is_expired());
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::default();
        assert_eq!(store.load().unwrap(), None);

        let session = Session::new(AuthResponse {
            access_token: "t".into(),
            user: user(),
        });
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap().unwrap().user.email, "maria@coa.gov.ph");

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_memory_store_reports_poisoned_lock() {
        let store = Arc::new(MemorySessionStore::default());
        let holder = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = holder.session.lock().unwrap();
            panic!("session writer crashed");
        })
        .join();

        let session = Session::new(AuthResponse {
            access_token: "t".into(),
            user: user(),
        });
        assert!(matches!(store.save(&session), Err(ClientError::Storage(_))));
        assert!(matches!(store.clear(), Err(ClientError::Storage(_))));
        assert!(matches!(store.load(), Err(ClientError::Storage(_))));
    }

    #[test]
    fn test_register_payload_keys() {
        let request = RegisterRequest {
            name: "Maria".into(),
            email: "maria@coa.gov.ph".into(),
            password: "secret123".into(),
            password_confirmation: "secret123".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["usr_name"], "Maria");
        assert_eq!(value["usr_password_confirmation"], "secret123");
    }
}
