//! Read-through query cache for backend data.
//!
//! Implements the data-fetching contract between the views and the API
//! client: stale-while-revalidate reads, one in-flight request per key, and
//! invalidation after successful mutations. The cache itself is a synchronous
//! state machine with no I/O; the app layer spawns the actual requests and
//! feeds results back in.

use std::collections::HashMap;
use std::time::Instant;

use crate::models::{ContestEntry, ProblemStats, Student};

/// Cached state for one query key.
///
/// A failed fetch never touches the held value: readers keep seeing the last
/// known good result while the error is surfaced separately.
#[derive(Debug)]
pub struct QueryState<T> {
    value: Option<T>,
    stale: bool,
    in_flight: bool,
    fetched_at: Option<Instant>,
    last_error: Option<String>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            value: None,
            stale: false,
            in_flight: false,
            fetched_at: None,
            last_error: None,
        }
    }
}

impl<T> QueryState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known value, served even while a refresh is in flight.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Whether a request for this key is currently in flight.
    pub fn is_fetching(&self) -> bool {
        self.in_flight
    }

    /// Error from the most recent failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// When the held value was last refreshed.
    pub fn fetched_at(&self) -> Option<Instant> {
        self.fetched_at
    }

    /// True when a fetch should be issued: no value yet, or the value was
    /// invalidated, and nothing is already in flight.
    pub fn needs_fetch(&self) -> bool {
        !self.in_flight && (self.value.is_none() || self.stale)
    }

    /// Claim the key for a fetch. Returns `false` when another request is
    /// already in flight; the caller then attaches to that result instead of
    /// issuing a duplicate.
    pub fn begin_fetch(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Store a fresh value from a completed fetch.
    pub fn resolve(&mut self, value: T) {
        self.value = Some(value);
        self.stale = false;
        self.in_flight = false;
        self.fetched_at = Some(Instant::now());
        self.last_error = None;
    }

    /// Record a failed fetch. The cached value is left untouched.
    pub fn reject(&mut self, error: impl Into<String>) {
        self.in_flight = false;
        self.last_error = Some(error.into());
    }

    /// Mark the held value stale. It stays readable until the refetch
    /// resolves (stale-while-revalidate).
    pub fn invalidate(&mut self) {
        self.stale = true;
    }
}

/// Cache key for per-student windowed queries: (student id, window in days).
pub type WindowKey = (i64, u32);

/// All cached backend data, keyed by (operation, parameters).
#[derive(Debug, Default)]
pub struct StudentCache {
    /// The full student list (server order).
    pub students: QueryState<Vec<Student>>,
    /// Contest history per (student, days window).
    contest_history: HashMap<WindowKey, QueryState<Vec<ContestEntry>>>,
    /// Problem stats per (student, days window).
    problem_stats: HashMap<WindowKey, QueryState<Option<ProblemStats>>>,
}

impl StudentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contest-history entry for a key, created on first access.
    pub fn contest_history_mut(&mut self, key: WindowKey) -> &mut QueryState<Vec<ContestEntry>> {
        self.contest_history.entry(key).or_default()
    }

    /// Read-only view of a contest-history entry.
    pub fn contest_history(&self, key: WindowKey) -> Option<&QueryState<Vec<ContestEntry>>> {
        self.contest_history.get(&key)
    }

    /// Problem-stats entry for a key, created on first access.
    pub fn problem_stats_mut(&mut self, key: WindowKey) -> &mut QueryState<Option<ProblemStats>> {
        self.problem_stats.entry(key).or_default()
    }

    /// Read-only view of a problem-stats entry.
    pub fn problem_stats(&self, key: WindowKey) -> Option<&QueryState<Option<ProblemStats>>> {
        self.problem_stats.get(&key)
    }

    /// Invalidate the student list. Run after every successful
    /// add/update/delete/sync so the next read refetches.
    pub fn invalidate_students(&mut self) {
        self.students.invalidate();
    }

    /// Invalidate all windows of one student's history and stats. Run after a
    /// successful sync, which rewrites those projections server-side.
    pub fn invalidate_student_details(&mut self, student_id: i64) {
        for (key, state) in self.contest_history.iter_mut() {
            if key.0 == student_id {
                state.invalidate();
            }
        }
        for (key, state) in self.problem_stats.iter_mut() {
            if key.0 == student_id {
                state.invalidate();
            }
        }
    }

    /// Drop everything. Used when the backend URL changes.
    pub fn clear(&mut self) {
        self.students = QueryState::new();
        self.contest_history.clear();
        self.problem_stats.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64) -> Student {
        Student {
            id,
            name: format!("Student {id}"),
            email: format!("s{id}@example.com"),
            phone: None,
            cf_handle: format!("handle{id}"),
            current_rating: Some(1200),
            max_rating: Some(1300),
            last_updated: None,
            email_opt_out: false,
        }
    }

    #[test]
    fn test_empty_state_needs_fetch() {
        let state: QueryState<Vec<Student>> = QueryState::new();
        assert!(state.needs_fetch());
        assert!(state.value().is_none());
        assert!(!state.is_fetching());
    }

    #[test]
    fn test_begin_fetch_dedup() {
        let mut state: QueryState<Vec<Student>> = QueryState::new();
        assert!(state.begin_fetch());
        // Second requester for the same key must not issue a duplicate.
        assert!(!state.begin_fetch());
        assert!(!state.needs_fetch());
    }

    #[test]
    fn test_resolve_makes_value_fresh() {
        let mut state = QueryState::new();
        state.begin_fetch();
        state.resolve(vec![student(1)]);
        assert!(!state.needs_fetch());
        assert!(!state.is_fetching());
        assert_eq!(state.value().unwrap().len(), 1);
        assert!(state.fetched_at().is_some());
    }

    #[test]
    fn test_stale_while_revalidate() {
        let mut state = QueryState::new();
        state.begin_fetch();
        state.resolve(vec![student(1)]);

        state.invalidate();
        // Stale value stays readable while the refetch runs.
        assert!(state.needs_fetch());
        assert_eq!(state.value().unwrap()[0].id, 1);

        assert!(state.begin_fetch());
        assert_eq!(state.value().unwrap()[0].id, 1);

        state.resolve(vec![student(1), student(2)]);
        assert_eq!(state.value().unwrap().len(), 2);
        assert!(!state.needs_fetch());
    }

    #[test]
    fn test_reject_leaves_value_untouched() {
        let mut state = QueryState::new();
        state.begin_fetch();
        state.resolve(vec![student(1)]);

        state.invalidate();
        state.begin_fetch();
        state.reject("connection refused");

        assert_eq!(state.value().unwrap()[0].id, 1);
        assert_eq!(state.last_error(), Some("connection refused"));
        // Still stale, so the next pump retries.
        assert!(state.needs_fetch());
    }

    #[test]
    fn test_resolve_clears_previous_error() {
        let mut state: QueryState<Vec<Student>> = QueryState::new();
        state.begin_fetch();
        state.reject("boom");
        assert!(state.last_error().is_some());

        state.begin_fetch();
        state.resolve(vec![]);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn test_invalidate_students_after_mutation() {
        let mut cache = StudentCache::new();
        cache.students.begin_fetch();
        cache.students.resolve(vec![student(1)]);
        assert!(!cache.students.needs_fetch());

        cache.invalidate_students();
        assert!(cache.students.needs_fetch());
        assert!(cache.students.value().is_some());
    }

    #[test]
    fn test_invalidate_student_details_is_scoped() {
        let mut cache = StudentCache::new();
        for key in [(1, 30), (1, 90), (2, 30)] {
            let state = cache.contest_history_mut(key);
            state.begin_fetch();
            state.resolve(vec![]);
        }
        let stats = cache.problem_stats_mut((1, 7));
        stats.begin_fetch();
        stats.resolve(None);

        cache.invalidate_student_details(1);

        assert!(cache.contest_history((1, 30)).unwrap().needs_fetch());
        assert!(cache.contest_history((1, 90)).unwrap().needs_fetch());
        assert!(cache.problem_stats((1, 7)).unwrap().needs_fetch());
        // Unrelated student untouched.
        assert!(!cache.contest_history((2, 30)).unwrap().needs_fetch());
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut cache = StudentCache::new();
        cache.students.begin_fetch();
        cache.students.resolve(vec![student(1)]);
        cache.contest_history_mut((1, 30)).begin_fetch();

        cache.clear();
        assert!(cache.students.value().is_none());
        assert!(cache.contest_history((1, 30)).is_none());
    }
}
