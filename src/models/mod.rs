//! Domain types for the tracker backend.
//!
//! Value objects mirroring the backend's JSON payloads. Students own nothing;
//! contest history and problem stats are read-only projections scoped by
//! `Student::id` and a trailing window in days.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tracked student record.
///
/// `current_rating`, `max_rating` and `last_updated` are absent until the
/// first successful sync against Codeforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Server-assigned identifier, immutable after creation.
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Codeforces handle; the ensure key for sync operations.
    pub cf_handle: String,
    #[serde(default)]
    pub current_rating: Option<i32>,
    #[serde(default)]
    pub max_rating: Option<i32>,
    /// Timestamp of the last successful refresh from Codeforces.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    /// Opted out of inactivity reminder emails.
    #[serde(default)]
    pub email_opt_out: bool,
}

impl Student {
    /// Current rating with missing values treated as 0, as the aggregate
    /// calculators expect.
    pub fn rating_or_zero(&self) -> i32 {
        self.current_rating.unwrap_or(0)
    }

    /// Whether the current rating has overtaken the recorded max.
    ///
    /// The backend recomputes `max_rating` lazily, so current briefly
    /// exceeding max means the student just set a personal best. Rendered as
    /// an improving marker, never treated as bad data.
    pub fn is_improving(&self) -> bool {
        match (self.current_rating, self.max_rating) {
            (Some(current), Some(max)) => current > max,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Opted-in students count as active for the dashboard partition.
    pub fn is_active(&self) -> bool {
        !self.email_opt_out
    }
}

/// Payload for creating a student. The server assigns `id` and
/// `last_updated`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub cf_handle: String,
    #[serde(default)]
    pub email_opt_out: bool,
}

/// One contest a student participated in. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestEntry {
    pub contest_id: i64,
    pub contest_name: String,
    pub rank: u32,
    pub rating_change: i32,
    pub solved_count: u32,
    pub date: DateTime<Utc>,
    pub new_rating: i32,
}

/// Submission count for one calendar day, used for heatmap rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// Problem-solving aggregate computed by the backend over a trailing window.
///
/// `solved_by_rating` is an ordered bucket map (problem rating -> solved
/// count) so iteration order is defined and missing buckets are simply
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemStats {
    /// Name of the hardest problem solved in the window, if any.
    #[serde(default)]
    pub hardest_solved: Option<String>,
    #[serde(default)]
    pub hardest_solved_rating: Option<i32>,
    pub total_solved: u32,
    pub average_rating: f64,
    pub problems_per_day: f64,
    #[serde(default)]
    pub solved_by_rating: BTreeMap<u32, u32>,
    #[serde(default)]
    pub submissions: Vec<DailyCount>,
}

/// The list endpoint returns either a bare array or a `{"students": [...]}`
/// wrapper depending on backend version; both shapes are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StudentListResponse {
    Wrapped { students: Vec<Student> },
    Bare(Vec<Student>),
}

impl StudentListResponse {
    /// Unwrap to the student list, server order preserved.
    pub fn into_students(self) -> Vec<Student> {
        match self {
            StudentListResponse::Wrapped { students } => students,
            StudentListResponse::Bare(students) => students,
        }
    }
}
