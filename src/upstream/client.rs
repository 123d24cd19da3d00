//! HTTP client for the upstream todo API.
//!
//! # Responsibilities
//! - Build the shared reqwest client (timeout, user agent, proxy policy)
//! - Issue GET requests for the todo list and single todos
//! - Keep every request URL under `{base_url}/todos`
//! - Forward the caller's trace headers
//! - Hand back status and body; status interpretation is left to handlers

use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::config::UpstreamConfig;
use crate::upstream::types::{UpstreamError, UpstreamResult};

/// Client for the upstream todo API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct TodoClient {
    http: reqwest::Client,
    base_url: String,
    /// Path every detail URL must sit directly under.
    todos_prefix: String,
}

/// A fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl TodoClient {
    /// Create a client from upstream configuration.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone());

        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let http = builder.build().map_err(UpstreamError::Build)?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)?;
        let todos_prefix = format!("{}/todos/", base.path().trim_end_matches('/'));

        Ok(Self {
            http,
            base_url,
            todos_prefix,
        })
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base_url}/todos`
    pub async fn list_todos(&self, trace: HeaderMap) -> UpstreamResult<UpstreamResponse> {
        let url = Url::parse(&format!("{}/todos", self.base_url))?;
        self.get(url, trace).await
    }

    /// `GET {base_url}/todos/{id}`, with `id` inserted verbatim.
    pub async fn get_todo(&self, id: &str, trace: HeaderMap) -> UpstreamResult<UpstreamResponse> {
        let url = self.todo_url(id)?;
        self.get(url, trace).await
    }

    /// URL of a single todo.
    ///
    /// `id` keeps its percent-encoding; an id that would resolve to a path
    /// other than one segment below `/todos/` is rejected.
    pub fn todo_url(&self, id: &str) -> UpstreamResult<Url> {
        let url = Url::parse(&format!("{}/todos/{}", self.base_url, id))?;

        match url.path().strip_prefix(self.todos_prefix.as_str()) {
            Some(segment) if !segment.is_empty() && !segment.contains('/') => Ok(url),
            _ => Err(UpstreamError::PathEscape(id.to_string())),
        }
    }

    async fn get(&self, url: Url, trace: HeaderMap) -> UpstreamResult<UpstreamResponse> {
        let start = Instant::now();

        let response = self.http.get(url.clone()).headers(trace).send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream response"
        );

        Ok(UpstreamResponse { status, body })
    }
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Fail with `UpstreamError::Status` unless the status is 2xx.
    pub fn error_for_status(self) -> UpstreamResult<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(UpstreamError::Status(self.status))
        }
    }

    /// Parse the body as arbitrary JSON.
    pub fn json(&self) -> UpstreamResult<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Parse the body as a JSON array.
    pub fn json_array(&self) -> UpstreamResult<Vec<Value>> {
        match self.json()? {
            Value::Array(items) => Ok(items),
            _ => Err(UpstreamError::UnexpectedShape("array")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = UpstreamConfig {
            base_url: "http://127.0.0.1:3000/".into(),
            ..UpstreamConfig::default()
        };
        let client = TodoClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:3000");
    }

    fn client_for(base_url: &str) -> TodoClient {
        let config = UpstreamConfig {
            base_url: base_url.into(),
            ..UpstreamConfig::default()
        };
        TodoClient::new(&config).unwrap()
    }

    #[test]
    fn test_todo_url_keeps_id_verbatim() {
        let client = client_for("http://127.0.0.1:3000");
        assert_eq!(
            client.todo_url("1").unwrap().as_str(),
            "http://127.0.0.1:3000/todos/1"
        );
        assert_eq!(
            client.todo_url("a%20b").unwrap().path(),
            "/todos/a%20b"
        );

        let prefixed = client_for("http://127.0.0.1:3000/api/");
        assert_eq!(prefixed.todo_url("7").unwrap().path(), "/api/todos/7");
    }

    #[test]
    fn test_todo_url_rejects_dot_segments() {
        let client = client_for("http://127.0.0.1:3000/api");
        for id in ["..", ".", "%2e%2e", "%2E.", "a/b", ""] {
            assert!(
                matches!(client.todo_url(id), Err(UpstreamError::PathEscape(_))),
                "id {:?}",
                id
            );
        }
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = UpstreamConfig {
            base_url: "not a url".into(),
            ..UpstreamConfig::default()
        };
        assert!(matches!(
            TodoClient::new(&config),
            Err(UpstreamError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_error_for_status() {
        let ok = UpstreamResponse::new(StatusCode::OK, "[]");
        assert!(ok.error_for_status().is_ok());

        let err = UpstreamResponse::new(StatusCode::BAD_GATEWAY, "")
            .error_for_status()
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Status(StatusCode::BAD_GATEWAY)));
    }

    #[test]
    fn test_json_array_shapes() {
        let list = UpstreamResponse::new(StatusCode::OK, r#"[{"id":1},{"id":2}]"#);
        assert_eq!(list.json_array().unwrap().len(), 2);

        let object = UpstreamResponse::new(StatusCode::OK, r#"{"id":1}"#);
        assert!(matches!(
            object.json_array(),
            Err(UpstreamError::UnexpectedShape("array"))
        ));

        let garbage = UpstreamResponse::new(StatusCode::OK, "<html>");
        assert!(matches!(garbage.json(), Err(UpstreamError::Decode(_))));
    }
}
