//! Common test utilities for integration tests.
//!
//! Provides an in-memory backend that speaks the tracker REST API over the
//! [`HttpClient`] trait, so full flows run without a network or a server
//! process. Cloning shares state, letting tests inspect the backend after
//! driving the app.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use serde_json::json;

use cftrack::models::{NewStudent, Student};
use cftrack::traits::{HttpClient, HttpError, Response};

/// Base URL the fake backend answers under.
pub const BASE: &str = "http://fake.test/api";

/// Rating the fake Codeforces sync always reports.
pub const SYNCED_RATING: i32 = 1500;

#[derive(Debug, Default)]
struct BackendState {
    students: Vec<Student>,
    next_id: i64,
}

/// In-memory stand-in for the tracker backend.
#[derive(Debug, Clone)]
pub struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// Start with existing records. Ids must already be assigned.
    pub fn seeded(students: Vec<Student>) -> Self {
        let next_id = students.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self {
            state: Arc::new(Mutex::new(BackendState { students, next_id })),
        }
    }

    /// Snapshot of the stored records.
    pub fn students(&self) -> Vec<Student> {
        self.lock().students.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackendState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn handle(&self, method: &str, url: &str, body: Option<&str>) -> Response {
        let Some(rest) = url.strip_prefix(BASE).and_then(|r| r.strip_prefix('/')) else {
            return error(404, "unknown route");
        };
        let path = rest.split('?').next().unwrap_or(rest);
        let segments: Vec<&str> = path.split('/').collect();

        match (method, segments.as_slice()) {
            ("GET", ["students"]) => self.list(),
            ("POST", ["students"]) => self.create(body.unwrap_or("")),
            ("GET", ["students", id]) => self.get(id),
            ("PUT", ["students", id]) => self.update(id, body.unwrap_or("")),
            ("DELETE", ["students", id]) => self.delete(id),
            ("GET", ["students", id, "contest-history"]) => self.contest_history(id),
            ("GET", ["students", id, "problem-stats"]) => self.problem_stats(id),
            ("POST", ["sync", handle]) => self.sync(handle),
            _ => error(404, "unknown route"),
        }
    }

    fn list(&self) -> Response {
        let students = &self.lock().students;
        ok(
            200,
            &json!({ "students": students, "total": students.len() }),
        )
    }

    fn create(&self, body: &str) -> Response {
        let draft: NewStudent = match serde_json::from_str(body) {
            Ok(draft) => draft,
            Err(_) => return error(400, "malformed body"),
        };
        if let Some(field) = missing_field(&draft) {
            return error(400, &format!("{field} is required"));
        }

        let mut state = self.lock();
        let student = Student {
            id: state.next_id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            cf_handle: draft.cf_handle,
            current_rating: None,
            max_rating: None,
            last_updated: None,
            email_opt_out: draft.email_opt_out,
        };
        state.next_id += 1;
        state.students.push(student.clone());
        ok(201, &json!(student))
    }

    fn get(&self, id: &str) -> Response {
        let Some(id) = parse_id(id) else {
            return error(404, "Student not found");
        };
        match self.lock().students.iter().find(|s| s.id == id) {
            Some(student) => ok(200, &json!(student)),
            None => error(404, "Student not found"),
        }
    }

    fn update(&self, id: &str, body: &str) -> Response {
        let Some(id) = parse_id(id) else {
            return error(404, "Student not found");
        };
        let incoming: Student = match serde_json::from_str(body) {
            Ok(student) => student,
            Err(_) => return error(400, "malformed body"),
        };

        let mut state = self.lock();
        match state.students.iter_mut().find(|s| s.id == id) {
            Some(existing) => {
                *existing = Student { id, ..incoming };
                ok(200, &json!(existing))
            }
            None => error(404, "Student not found"),
        }
    }

    fn delete(&self, id: &str) -> Response {
        let Some(id) = parse_id(id) else {
            return error(404, "Student not found");
        };
        let mut state = self.lock();
        let before = state.students.len();
        state.students.retain(|s| s.id != id);
        if state.students.len() == before {
            error(404, "Student not found")
        } else {
            Response::new(204, Bytes::new())
        }
    }

    fn contest_history(&self, id: &str) -> Response {
        match parse_id(id) {
            Some(id) if self.lock().students.iter().any(|s| s.id == id) => ok(200, &json!([])),
            _ => error(404, "Student not found"),
        }
    }

    fn problem_stats(&self, id: &str) -> Response {
        match parse_id(id) {
            Some(id) if self.lock().students.iter().any(|s| s.id == id) => {
                ok(200, &serde_json::Value::Null)
            }
            _ => error(404, "Student not found"),
        }
    }

    /// Simulated Codeforces refresh: stamps the student and reports a fixed
    /// rating, raising the max if it was exceeded.
    fn sync(&self, handle: &str) -> Response {
        let mut state = self.lock();
        match state.students.iter_mut().find(|s| s.cf_handle == handle) {
            Some(student) => {
                student.current_rating = Some(SYNCED_RATING);
                student.max_rating =
                    Some(student.max_rating.unwrap_or(0).max(SYNCED_RATING));
                student.last_updated = Some(Utc::now());
                ok(200, &json!({ "status": "ok" }))
            }
            None => error(404, "Student not found"),
        }
    }
}

#[async_trait]
impl HttpClient for FakeBackend {
    async fn get(&self, url: &str) -> Result<Response, HttpError> {
        Ok(self.handle("GET", url, None))
    }

    async fn post(&self, url: &str, body: &str) -> Result<Response, HttpError> {
        Ok(self.handle("POST", url, Some(body)))
    }

    async fn put(&self, url: &str, body: &str) -> Result<Response, HttpError> {
        Ok(self.handle("PUT", url, Some(body)))
    }

    async fn delete(&self, url: &str) -> Result<Response, HttpError> {
        Ok(self.handle("DELETE", url, None))
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

fn missing_field(draft: &NewStudent) -> Option<&'static str> {
    if draft.name.trim().is_empty() {
        Some("name")
    } else if draft.email.trim().is_empty() {
        Some("email")
    } else if draft.cf_handle.trim().is_empty() {
        Some("cf_handle")
    } else {
        None
    }
}

fn ok(status: u16, body: &serde_json::Value) -> Response {
    Response::new(status, Bytes::from(body.to_string()))
}

fn error(status: u16, message: &str) -> Response {
    ok(status, &json!({ "error": message }))
}

/// A student record with sensible defaults for seeding.
pub fn sample_student(id: i64, name: &str, handle: &str) -> Student {
    Student {
        id,
        name: name.to_string(),
        email: format!("{handle}@example.com"),
        phone: None,
        cf_handle: handle.to_string(),
        current_rating: Some(1200),
        max_rating: Some(1300),
        last_updated: None,
        email_opt_out: false,
    }
}
