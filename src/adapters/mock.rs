//! Mock HTTP client for testing.
//!
//! Provides a configurable mock that returns predefined responses or errors
//! and records every request for verification.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET, POST, PUT, DELETE)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request body (for POST/PUT requests)
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful response
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

/// Mock HTTP client for testing.
///
/// Responses are keyed by `"METHOD url"`; an optional default response covers
/// everything else. Requests are recorded in order.
///
/// # Example
///
/// ```ignore
/// let client = MockHttpClient::new();
/// client.set_response(
///     "GET http://api/students",
///     MockResponse::Success(Response::new(200, Bytes::from("[]"))),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a `"METHOD url"` key. Matched exactly.
    pub fn set_response(&self, key: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(key.to_string(), response);
    }

    /// Set a default response for requests without a specific match.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn dispatch(&self, method: &str, url: &str, body: Option<&str>) -> Result<Response, HttpError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            body: body.map(|b| b.to_string()),
        });

        let key = format!("{} {}", method, url);
        let configured = self.responses.lock().unwrap().get(&key).cloned();
        let response = match configured {
            Some(r) => r,
            None => self
                .default_response
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(MockResponse::Success(Response::new(404, Bytes::new()))),
        };

        match response {
            MockResponse::Success(r) => Ok(r),
            MockResponse::Error(e) => Err(e),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str) -> Result<Response, HttpError> {
        self.dispatch("GET", url, None)
    }

    async fn post(&self, url: &str, body: &str) -> Result<Response, HttpError> {
        self.dispatch("POST", url, Some(body))
    }

    async fn put(&self, url: &str, body: &str) -> Result<Response, HttpError> {
        self.dispatch("PUT", url, Some(body))
    }

    async fn delete(&self, url: &str) -> Result<Response, HttpError> {
        self.dispatch("DELETE", url, None)
    }
}
