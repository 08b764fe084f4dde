//! Typed HTTP client for the API.
//!
//! Mirrors what the front end's fetch wrapper does: every call goes
//! through one place that attaches the stored bearer token, normalizes
//! responses into a uniform envelope, and drops the token the moment
//! the server answers 401 so a stale session can't keep retrying.

use serde::Serialize;
use serde_json::Value;

/// Uniform result shape for every API call.
///
/// Success responses carry the raw payload in `data`; failures carry
/// the server's error message (or a transport description) in `message`.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub success: bool,
    pub data: Value,
    pub message: Option<String>,
}

impl Envelope {
    fn ok(data: Value) -> Self {
        Self { success: true, data, message: None }
    }

    fn fail(message: String) -> Self {
        Self { success: false, data: Value::Null, message: Some(message) }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("Cannot reach server: {0}")]
    Connection(#[source] reqwest::Error),

    /// The request could not be built or serialized.
    #[error("Invalid request: {0}")]
    Request(String),
}

pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:4000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub async fn get(&mut self, path: &str) -> Result<Envelope, ClientError> {
        self.send(reqwest::Method::GET, path, None::<&()>).await
    }

    pub async fn post<B: Serialize>(&mut self, path: &str, body: &B) -> Result<Envelope, ClientError> {
        self.send(reqwest::Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize>(&mut self, path: &str, body: &B) -> Result<Envelope, ClientError> {
        self.send(reqwest::Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&mut self, path: &str) -> Result<Envelope, ClientError> {
        self.send(reqwest::Method::DELETE, path, None::<&()>).await
    }

    /// POST `/api/auth/login` and store the returned token on success.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Envelope, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let envelope = self.post("/api/auth/login", &body).await?;
        self.adopt_token(&envelope);
        Ok(envelope)
    }

    /// POST `/api/auth/register` and store the returned token on success.
    pub async fn register<B: Serialize>(&mut self, body: &B) -> Result<Envelope, ClientError> {
        let envelope = self.post("/api/auth/register", body).await?;
        self.adopt_token(&envelope);
        Ok(envelope)
    }

    fn adopt_token(&mut self, envelope: &Envelope) {
        if let Some(token) = envelope.data.get("token").and_then(Value::as_str) {
            self.token = Some(token.to_string());
        }
    }

    async fn send<B: Serialize>(
        &mut self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Envelope, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                ClientError::Request(e.to_string())
            } else {
                ClientError::Connection(e)
            }
        })?;
        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Session is dead; stop resending a token the server rejects.
            self.token = None;
        }

        if status.is_success() {
            Ok(Envelope::ok(payload))
        } else {
            Ok(Envelope::fail(extract_error_message(&payload, status)))
        }
    }
}

/// Pull the server's `{"error":{"message":..}}` out of an error body,
/// falling back to the status line when the body has no message.
fn extract_error_message(payload: &Value, status: reqwest::StatusCode) -> String {
    payload
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{start_server, ApiContext};
    use crate::config::Settings;
    use crate::db::open_memory_database;

    async fn test_server() -> crate::api::ApiServer {
        let ctx = ApiContext::new(open_memory_database().unwrap(), Settings::for_tests());
        start_server(ctx, 0).await.unwrap()
    }

    fn register_body(email: &str) -> serde_json::Value {
        serde_json::json!({
            "name": "Dr. Imani Osei",
            "email": email,
            "password": "correct-horse",
        })
    }

    #[test]
    fn error_message_prefers_server_body() {
        let payload = serde_json::json!({"error": {"code": "NOT_FOUND", "message": "patient not found"}});
        let msg = extract_error_message(&payload, reqwest::StatusCode::NOT_FOUND);
        assert_eq!(msg, "patient not found");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        let msg = extract_error_message(&Value::Null, reqwest::StatusCode::BAD_GATEWAY);
        assert!(msg.contains("502"));
    }

    #[tokio::test]
    async fn register_stores_token_and_authenticates_later_calls() {
        let mut server = test_server().await;
        let mut client = ApiClient::new(&format!("http://127.0.0.1:{}", server.addr.port()));

        let envelope = client.register(&register_body("osei@curamind.example")).await.unwrap();
        assert!(envelope.success);
        assert!(client.token().is_some());

        let envelope = client.get("/api/patients").await.unwrap();
        assert!(envelope.success);
        assert!(envelope.data.is_array());

        server.shutdown();
    }

    #[tokio::test]
    async fn unauthorized_response_clears_stored_token() {
        let mut server = test_server().await;
        let mut client = ApiClient::new(&format!("http://127.0.0.1:{}", server.addr.port()));
        client.set_token("not-a-real-token");

        let envelope = client.get("/api/patients").await.unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("Please authenticate."));
        assert!(client.token().is_none());

        server.shutdown();
    }

    #[tokio::test]
    async fn failed_login_surfaces_message_without_storing_token() {
        let mut server = test_server().await;
        let mut client = ApiClient::new(&format!("http://127.0.0.1:{}", server.addr.port()));

        let envelope = client.login("ghost@curamind.example", "whatever-pw").await.unwrap();
        assert!(!envelope.success);
        assert!(client.token().is_none());

        server.shutdown();
    }

    #[tokio::test]
    async fn unserializable_body_is_a_request_error() {
        // Non-string map keys fail during request construction, before
        // any I/O happens, and must not read as a network failure.
        let mut client = ApiClient::new("http://127.0.0.1:1");
        let body: std::collections::BTreeMap<Vec<u8>, i32> =
            [(vec![0u8, 1], 1)].into_iter().collect();
        let err = client.post("/api/patients", &body).await.unwrap_err();
        assert!(matches!(err, ClientError::Request(_)));
        assert!(err.to_string().starts_with("Invalid request"));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_connection_error() {
        let mut client = ApiClient::new("http://127.0.0.1:1");
        let err = client.get("/api/health").await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
        assert!(err.to_string().starts_with("Cannot reach server"));
    }
}
