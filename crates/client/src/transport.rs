//! Dispatch seam between the API client and the wire.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;

use crate::errors::ApiError;

/// A single outbound HTTP request, fully assembled by the client.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

/// Decoded response: status plus JSON body (`Null` when the body is empty
/// or not JSON).
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// Request dispatcher. Single-attempt semantics: no retry or backoff lives
/// behind this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, req: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self
            .http
            .request(req.method, &req.url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &req.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        Ok(ApiResponse { status, body })
    }
}

/// Scripted transport for tests and doc examples.
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Records every dispatched request and replays queued outcomes in FIFO
    /// order; an empty queue answers `200` with a `Null` body.
    #[derive(Default)]
    pub struct MockTransport {
        sent: Mutex<Vec<ApiRequest>>,
        outcomes: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&self, outcome: Result<ApiResponse, ApiError>) {
            self.outcomes.lock().unwrap().push_back(outcome);
        }

        pub fn push_ok(&self, status: u16, body: Value) {
            self.push(Ok(ApiResponse { status, body }));
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, req: ApiRequest) -> Result<ApiResponse, ApiError> {
            self.sent.lock().unwrap().push(req);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(ApiResponse { status: 200, body: Value::Null }))
        }
    }
}
