use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use super::ApiEnvelope;
use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::library::{RecordStore, Resource};

/// HTTP client bound to one base URL, optionally carrying a bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    log_requests: bool,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: None,
            log_requests: false,
        })
    }

    /// Client for the reference-data API described by `config`.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        let mut client = Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        client.log_requests = config.enable_request_logging;
        Ok(client)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` under the base URL, keeping the base path (`/api/v1`).
    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }

    /// Send a request and return the parsed body of a 2xx response.
    ///
    /// Non-2xx responses become `ClientError` using the body's message. An empty body
    /// parses as `null`.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, ClientError> {
        let url = self.url(path)?;
        let request_id = Uuid::new_v4().to_string();

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header("X-Request-Id", &request_id);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        if self.log_requests {
            tracing::info!("{} {} [{}]", method, url, request_id);
        } else {
            tracing::debug!("{} {} [{}]", method, url, request_id);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let parsed = parse_body(&text);

        if !status.is_success() {
            tracing::debug!("{} {} failed with {} [{}]", method, url, status, request_id);
            let body = parsed.unwrap_or(Value::Null);
            return Err(ClientError::from_response(status.as_u16(), &body));
        }

        match parsed {
            Ok(value) => Ok(value),
            Err(e) if status == StatusCode::NO_CONTENT => {
                tracing::debug!("Ignoring body of 204 response: {}", e);
                Ok(Value::Null)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Send a request whose response is a `{ success, data, message }` envelope.
    pub async fn envelope<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiEnvelope<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let value = self.send(method, path, body).await?;
        if value.is_null() {
            return Ok(ApiEnvelope {
                success: true,
                data: None,
                message: None,
            });
        }
        let envelope: ApiEnvelope<T> = serde_json::from_value(value)?;
        envelope.check()
    }

    pub async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.envelope::<T, ()>(Method::GET, path, None)
            .await?
            .into_data()
    }
}

fn parse_body(text: &str) -> Result<Value, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text)
}

#[async_trait]
impl<R: Resource> RecordStore<R> for ApiClient {
    async fn list(&self) -> Result<Vec<R::Record>, ClientError> {
        self.get_data(R::ENDPOINT).await
    }

    async fn get(&self, id: i64) -> Result<R::Record, ClientError> {
        self.get_data(&format!("{}/{}", R::ENDPOINT, id)).await
    }

    async fn create(&self, payload: &R::Create) -> Result<R::Record, ClientError> {
        self.envelope(Method::POST, R::ENDPOINT, Some(payload))
            .await?
            .into_data()
    }

    async fn update(&self, id: i64, payload: &R::Update) -> Result<R::Record, ClientError> {
        self.envelope(Method::PUT, &format!("{}/{}", R::ENDPOINT, id), Some(payload))
            .await?
            .into_data()
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.envelope::<Value, ()>(Method::DELETE, &format!("{}/{}", R::ENDPOINT, id), None)
            .await?;
        Ok(())
    }
}
