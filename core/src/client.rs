//! The single call path for JSON HTTP interaction with the backend.
//!
//! # Design
//! Each call is split into `build_request` (target + `RequestConfig` into an
//! `HttpRequest`) and `parse_response` (an `HttpResponse` into a decoded
//! body or `ApiError`). Both are pure, so they are tested without a network.
//! `request` runs the configured `Transport` between the two and is what
//! the `get`/`post`/`put`/`delete` shorthands call.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::config::{ClientConfig, RequestConfig};
use crate::error::{ApiError, GENERIC_FAILURE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};

/// Async JSON client bound to one backend base URL.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Client over a `reqwest` transport using the configured timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Ok(Self::new(&config.base_url, Arc::new(transport)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through; anything else is joined to the base URL.
    pub fn resolve(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            return target.to_string();
        }
        if target.starts_with('/') {
            format!("{}{target}", self.base_url)
        } else {
            format!("{}/{target}", self.base_url)
        }
    }

    pub fn build_request(&self, target: &str, config: &RequestConfig) -> HttpRequest {
        HttpRequest {
            method: config.method,
            path: self.resolve(target),
            headers: config.merged_headers(),
            body: config.body.clone(),
        }
    }

    /// Decode a response body, or turn a non-2xx status into `RequestFailed`.
    ///
    /// An empty body on a success status decodes as JSON `null`.
    pub fn parse_response<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        if !response.is_success() {
            return Err(ApiError::RequestFailed(failure_message(&response.body)));
        }
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        Ok(serde_json::from_str(body)?)
    }

    pub async fn request<T: DeserializeOwned>(&self, target: &str, config: RequestConfig) -> Result<T, ApiError> {
        let request = self.build_request(target, &config);
        let method = request.method;
        let path = request.path.clone();
        debug!(%method, %path, "sending request");

        let result = match self.transport.execute(request).await {
            Ok(response) => self.parse_response(response),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            error!(%method, %path, error = %e, "API request error");
        }
        result
    }

    pub async fn get<T: DeserializeOwned>(&self, target: &str) -> Result<T, ApiError> {
        self.request(target, RequestConfig::default()).await
    }

    pub async fn post<T, P>(&self, target: &str, payload: &P) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let config = self.json_config(HttpMethod::Post, target, payload)?;
        self.request(target, config).await
    }

    pub async fn put<T, P>(&self, target: &str, payload: &P) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let config = self.json_config(HttpMethod::Put, target, payload)?;
        self.request(target, config).await
    }

    fn json_config<P>(&self, method: HttpMethod, target: &str, payload: &P) -> Result<RequestConfig, ApiError>
    where
        P: Serialize + ?Sized,
    {
        RequestConfig::json(method, payload).inspect_err(|e| {
            let path = self.resolve(target);
            error!(%method, %path, error = %e, "API request error");
        })
    }

    pub async fn delete<T: DeserializeOwned>(&self, target: &str) -> Result<T, ApiError> {
        self.request(target, RequestConfig::method(HttpMethod::Delete)).await
    }
}

/// The body's string `message` field, or the generic failure text.
fn failure_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubTransport;
    use serde_json::{json, Value};

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:5000", Arc::new(StubTransport::status(200, "null")))
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:5000/", Arc::new(StubTransport::status(200, "")));
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.resolve("/api/stats"), "http://localhost:5000/api/stats");
    }

    #[test]
    fn relative_targets_get_a_slash() {
        assert_eq!(client().resolve("api/stats"), "http://localhost:5000/api/stats");
    }

    #[test]
    fn absolute_targets_pass_through() {
        assert_eq!(
            client().resolve("https://cdn.example.org/feed.json"),
            "https://cdn.example.org/feed.json"
        );
    }

    #[test]
    fn build_request_applies_defaults() {
        let req = client().build_request("/api/students", &RequestConfig::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:5000/api/students");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_success_returns_body() {
        let body: Value = client()
            .parse_response(HttpResponse::new(200, r#"{"success": true, "data": [1,2,3]}"#))
            .unwrap();
        assert_eq!(body, json!({"success": true, "data": [1, 2, 3]}));
    }

    #[test]
    fn parse_failure_uses_message_field() {
        let err = client()
            .parse_response::<Value>(HttpResponse::new(404, r#"{"message": "not found"}"#))
            .unwrap_err();
        assert_eq!(err.message(), "not found");
    }

    #[test]
    fn parse_failure_without_message_is_generic() {
        let err = client()
            .parse_response::<Value>(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert_eq!(err.message(), GENERIC_FAILURE);

        let err = client()
            .parse_response::<Value>(HttpResponse::new(400, r#"{"message": 42}"#))
            .unwrap_err();
        assert_eq!(err.message(), GENERIC_FAILURE);
    }

    #[test]
    fn parse_success_with_bad_json_fails() {
        let err = client().parse_response::<Value>(HttpResponse::new(200, "<html>")).unwrap_err();
        assert!(err.message().starts_with("invalid JSON"));
    }

    #[test]
    fn parse_empty_success_body_is_null() {
        let body: Value = client().parse_response(HttpResponse::new(204, "")).unwrap();
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn request_resolves_to_parsed_body() {
        let transport = Arc::new(StubTransport::status(200, r#"{"success": true, "data": [1,2,3]}"#));
        let client = ApiClient::new("http://api", transport.clone());

        let body: Value = client.request("/api/things", RequestConfig::default()).await.unwrap();
        assert_eq!(body["data"], json!([1, 2, 3]));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn request_404_fails_with_server_message() {
        let client = ApiClient::new("http://api", Arc::new(StubTransport::status(404, r#"{"message": "not found"}"#)));
        let err = client.get::<Value>("/api/missing").await.unwrap_err();
        assert_eq!(err, ApiError::RequestFailed("not found".to_string()));
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let client = ApiClient::new("http://api", Arc::new(StubTransport::failing("connection refused")));
        let err = client.get::<Value>("/api/stats").await.unwrap_err();
        assert_eq!(err.message(), "connection refused");
    }

    #[tokio::test]
    async fn shorthands_fix_method_and_body() {
        let transport = Arc::new(StubTransport::status(200, "{}"));
        let client = ApiClient::new("http://api", transport.clone());

        let _: Value = client.get("/a").await.unwrap();
        let _: Value = client.post("/b", &json!({"email": "x@y.z"})).await.unwrap();
        let _: Value = client.put("/c", &json!({"name": "Li"})).await.unwrap();
        let _: Value = client.delete("/d").await.unwrap();

        let requests = transport.requests();
        let methods: Vec<HttpMethod> = requests.iter().map(|r| r.method).collect();
        assert_eq!(
            methods,
            vec![HttpMethod::Get, HttpMethod::Post, HttpMethod::Put, HttpMethod::Delete]
        );
        assert!(requests[0].body.is_none());
        assert_eq!(requests[1].body.as_deref(), Some(r#"{"email":"x@y.z"}"#));
        assert_eq!(requests[2].body.as_deref(), Some(r#"{"name":"Li"}"#));
        assert!(requests[3].body.is_none());
        assert!(requests.iter().all(|r| r.header("content-type") == Some("application/json")));
    }

    #[tokio::test]
    async fn unserializable_payload_fails_before_sending() {
        let transport = Arc::new(StubTransport::status(200, "{}"));
        let client = ApiClient::new("http://api", transport.clone());
        let payload: std::collections::BTreeMap<(u8, u8), u8> = [((1, 2), 3)].into_iter().collect();

        let err = client.post::<Value, _>("/api/join", &payload).await.unwrap_err();
        assert!(err.message().starts_with("invalid JSON"));
        let err = client.put::<Value, _>("/api/join", &payload).await.unwrap_err();
        assert!(err.message().starts_with("invalid JSON"));
        assert!(transport.requests().is_empty());
    }
}
