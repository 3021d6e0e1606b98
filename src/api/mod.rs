//! HTTP client for the tracker backend.
//!
//! One method per backend capability, each a single request/response pair.
//! This layer holds no cache and performs no retries; staleness and refresh
//! policy live in [`crate::cache`].

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::adapters::ReqwestHttpClient;
use crate::models::{ContestEntry, NewStudent, ProblemStats, Student, StudentListResponse};
use crate::traits::{HttpClient, HttpError, Response};

/// Default base URL for the tracker backend.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Errors surfaced by the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (unreachable backend, timeout).
    #[error("request failed: {0}")]
    Http(#[from] HttpError),
    /// Response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),
    /// The requested record does not exist.
    #[error("not found")]
    NotFound,
    /// The backend rejected the payload.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Any other non-2xx status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// Body shape of backend error responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the tracker REST API.
///
/// Generic over [`HttpClient`] so tests can substitute a mock transport.
/// Cloning is cheap; the transport is shared.
#[derive(Debug)]
pub struct StudentApi<C: HttpClient = ReqwestHttpClient> {
    base_url: String,
    client: Arc<C>,
}

impl<C: HttpClient> Clone for StudentApi<C> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: Arc::clone(&self.client),
        }
    }
}

impl StudentApi<ReqwestHttpClient> {
    /// Create a client for the given base URL using the production transport.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(ReqwestHttpClient::new(), base_url)
    }
}

impl<C: HttpClient> StudentApi<C> {
    /// Create a client with a custom transport.
    pub fn with_client(client: C, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: Arc::new(client),
        }
    }

    /// The configured base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List all students in server order.
    ///
    /// GET /students
    pub async fn list_students(&self) -> Result<Vec<Student>, ApiError> {
        let url = format!("{}/students", self.base_url);
        let response = self.client.get(&url).await?;
        let body: StudentListResponse = Self::parse(response)?;
        Ok(body.into_students())
    }

    /// Fetch a single student.
    ///
    /// GET /students/{id}
    pub async fn get_student(&self, id: i64) -> Result<Student, ApiError> {
        let url = format!("{}/students/{}", self.base_url, id);
        let response = self.client.get(&url).await?;
        Self::parse(response)
    }

    /// Contest history for one student over a trailing window of days.
    /// An empty vector is a valid result, not an error.
    ///
    /// GET /students/{id}/contest-history?days={n}
    pub async fn contest_history(
        &self,
        id: i64,
        days: u32,
    ) -> Result<Vec<ContestEntry>, ApiError> {
        let url = format!(
            "{}/students/{}/contest-history?days={}",
            self.base_url, id, days
        );
        let response = self.client.get(&url).await?;
        Self::parse(response)
    }

    /// Problem-solving aggregate over a trailing window of days.
    /// `None` when the backend has no data for the window.
    ///
    /// GET /students/{id}/problem-stats?days={n}
    pub async fn problem_stats(
        &self,
        id: i64,
        days: u32,
    ) -> Result<Option<ProblemStats>, ApiError> {
        let url = format!(
            "{}/students/{}/problem-stats?days={}",
            self.base_url, id, days
        );
        let response = self.client.get(&url).await?;
        Self::parse(response)
    }

    /// Create a student. The server assigns the id.
    ///
    /// POST /students
    pub async fn add_student(&self, draft: &NewStudent) -> Result<Student, ApiError> {
        let url = format!("{}/students", self.base_url);
        let body = serde_json::to_string(draft)?;
        let response = self.client.post(&url, &body).await?;
        Self::parse(response)
    }

    /// Replace a student record in full.
    ///
    /// PUT /students/{id}
    pub async fn update_student(&self, student: &Student) -> Result<Student, ApiError> {
        let url = format!("{}/students/{}", self.base_url, student.id);
        let body = serde_json::to_string(student)?;
        let response = self.client.put(&url, &body).await?;
        Self::parse(response)
    }

    /// Delete a student.
    ///
    /// DELETE /students/{id}
    pub async fn delete_student(&self, id: i64) -> Result<(), ApiError> {
        let url = format!("{}/students/{}", self.base_url, id);
        let response = self.client.delete(&url).await?;
        Self::check(response)?;
        Ok(())
    }

    /// Trigger a backend refresh from Codeforces for one handle.
    /// The client only learns success or failure.
    ///
    /// POST /sync/{cf_handle}
    pub async fn sync_student(&self, cf_handle: &str) -> Result<(), ApiError> {
        let url = format!("{}/sync/{}", self.base_url, cf_handle);
        let response = self.client.post(&url, "{}").await?;
        Self::check(response)?;
        Ok(())
    }

    /// Map non-2xx statuses onto the error taxonomy.
    fn check(response: Response) -> Result<Response, ApiError> {
        if response.is_success() {
            return Ok(response);
        }
        let message = Self::error_message(&response);
        match response.status {
            404 => Err(ApiError::NotFound),
            400 => Err(ApiError::Validation(message)),
            status => Err(ApiError::Server { status, message }),
        }
    }

    /// Check the status then deserialize the body.
    fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::check(response)?;
        Ok(response.json()?)
    }

    /// Pull the `{"error": ...}` message out of a failure body, falling back
    /// to the raw text.
    fn error_message(response: &Response) -> String {
        if let Ok(body) = response.json::<ErrorBody>() {
            return body.error;
        }
        response
            .text()
            .ok()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}
