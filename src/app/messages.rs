//! AppMessage enum for async communication within the application.

use crate::models::{ContestEntry, ProblemStats, Student};

/// Which mutation a finished task performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Add,
    Update,
    Delete,
    Sync,
}

impl MutationKind {
    /// Past-tense verb for the status line.
    pub fn verb(&self) -> &'static str {
        match self {
            MutationKind::Add => "added",
            MutationKind::Update => "updated",
            MutationKind::Delete => "deleted",
            MutationKind::Sync => "synced",
        }
    }
}

/// Messages received from spawned fetch and mutation tasks.
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// Student list fetch finished.
    StudentsLoaded(Result<Vec<Student>, String>),
    /// Contest history fetch finished for one (student, window) key.
    ContestHistoryLoaded {
        student_id: i64,
        days: u32,
        result: Result<Vec<ContestEntry>, String>,
    },
    /// Problem stats fetch finished for one (student, window) key.
    ProblemStatsLoaded {
        student_id: i64,
        days: u32,
        result: Result<Option<ProblemStats>, String>,
    },
    /// A mutation (add/update/delete/sync) finished.
    MutationFinished {
        kind: MutationKind,
        /// Display name for the status line (student name or handle).
        subject: String,
        /// Set for sync so the student's cached projections get invalidated.
        student_id: Option<i64>,
        result: Result<(), String>,
    },
}
