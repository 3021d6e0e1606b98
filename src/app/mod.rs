//! Application state and orchestration.
//!
//! `App` owns the query cache and all view state. Spawned tasks perform the
//! HTTP I/O and feed results back through the message channel; `pump` issues
//! whatever fetches the current screen needs, respecting the cache's
//! in-flight de-duplication and stale-while-revalidate rules.

pub mod handlers;
pub mod messages;
pub mod tasks;

use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::adapters::ReqwestHttpClient;
use crate::api::StudentApi;
use crate::cache::StudentCache;
use crate::config::{Config, DEFAULT_CONTEST_DAYS, DEFAULT_PROBLEM_DAYS};
use crate::models::{NewStudent, Student};
use crate::traits::HttpClient;

pub use messages::{AppMessage, MutationKind};

/// Contest-history window choices (days), cycled in the profile view.
pub const CONTEST_WINDOWS: [u32; 3] = [30, 90, 365];
/// Problem-stats window choices (days), cycled in the profile view.
pub const PROBLEM_WINDOWS: [u32; 3] = [7, 30, 90];

/// How long a status-line notification stays visible.
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Profile { student_id: i64 },
}

/// Fields of the add/edit form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Handle,
    OptOut,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Phone,
            FormField::Phone => FormField::Handle,
            FormField::Handle => FormField::OptOut,
            FormField::OptOut => FormField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::OptOut,
            FormField::Email => FormField::Name,
            FormField::Phone => FormField::Email,
            FormField::Handle => FormField::Phone,
            FormField::OptOut => FormField::Handle,
        }
    }
}

/// State of the add/edit student form.
#[derive(Debug, Clone)]
pub struct StudentForm {
    /// `Some` when editing an existing student.
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cf_handle: String,
    pub email_opt_out: bool,
    pub focus: FormField,
    /// Submit is disabled while the mutation is in flight.
    pub submitting: bool,
    /// Inline validation or backend error.
    pub error: Option<String>,
}

impl StudentForm {
    pub fn empty() -> Self {
        Self {
            id: None,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            cf_handle: String::new(),
            email_opt_out: false,
            focus: FormField::Name,
            submitting: false,
            error: None,
        }
    }

    pub fn for_edit(student: &Student) -> Self {
        Self {
            id: Some(student.id),
            name: student.name.clone(),
            email: student.email.clone(),
            phone: student.phone.clone().unwrap_or_default(),
            cf_handle: student.cf_handle.clone(),
            email_opt_out: student.email_opt_out,
            focus: FormField::Name,
            submitting: false,
            error: None,
        }
    }

    /// The field currently being typed into, if any.
    pub fn focused_value_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Name => Some(&mut self.name),
            FormField::Email => Some(&mut self.email),
            FormField::Phone => Some(&mut self.phone),
            FormField::Handle => Some(&mut self.cf_handle),
            FormField::OptOut => None,
        }
    }

    /// Local check of the backend's required fields.
    pub fn validate(&self) -> Result<(), String> {
        for (value, label) in [
            (&self.name, "name"),
            (&self.email, "email"),
            (&self.cf_handle, "cf handle"),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{label} is required"));
            }
        }
        Ok(())
    }

    fn draft(&self) -> NewStudent {
        NewStudent {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: Some(self.phone.trim().to_string()).filter(|p| !p.is_empty()),
            cf_handle: self.cf_handle.trim().to_string(),
            email_opt_out: self.email_opt_out,
        }
    }
}

/// Active modal dialog, if any.
#[derive(Debug, Clone)]
pub enum Dialog {
    Add(StudentForm),
    Edit(StudentForm),
    Delete {
        student: Student,
        submitting: bool,
    },
    Settings {
        refresh_secs: String,
        error: Option<String>,
    },
}

/// One-shot status notification shown at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
    pub shown_at: Instant,
}

/// Incremental search over the student table.
#[derive(Debug, Clone, Default)]
pub struct SearchField {
    pub active: bool,
    pub query: String,
}

/// Top-level application state.
pub struct App<C: HttpClient = ReqwestHttpClient> {
    pub api: StudentApi<C>,
    pub cache: StudentCache,
    pub screen: Screen,
    pub dialog: Option<Dialog>,
    pub search: SearchField,
    /// Selected row in the filtered student table.
    pub selected: usize,
    pub status: Option<StatusLine>,
    /// Auto-refresh interval in seconds; 0 disables.
    pub refresh_secs: u64,
    /// Contest-history window for the profile view.
    pub contest_days: u32,
    /// Problem-stats window for the profile view.
    pub problem_days: u32,
    pub should_quit: bool,
    tx: UnboundedSender<AppMessage>,
    /// Taken by the event loop, which needs ownership for `select!`.
    pub message_rx: Option<UnboundedReceiver<AppMessage>>,
}

impl<C: HttpClient + 'static> App<C> {
    pub fn with_api(api: StudentApi<C>, config: &Config) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            cache: StudentCache::new(),
            screen: Screen::Dashboard,
            dialog: None,
            search: SearchField::default(),
            selected: 0,
            status: None,
            refresh_secs: config.refresh_secs,
            contest_days: DEFAULT_CONTEST_DAYS,
            problem_days: DEFAULT_PROBLEM_DAYS,
            should_quit: false,
            tx,
            message_rx: Some(rx),
        }
    }

    /// Sender half of the message channel, for tests and spawned tasks.
    pub fn sender(&self) -> UnboundedSender<AppMessage> {
        self.tx.clone()
    }

    /// Students matching the current search filter, in server order.
    pub fn filtered_students(&self) -> Vec<&Student> {
        let students = match self.cache.students.value() {
            Some(students) => students,
            None => return Vec::new(),
        };
        if self.search.query.is_empty() {
            return students.iter().collect();
        }
        let needle = self.search.query.to_lowercase();
        students
            .iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&needle)
                    || s.email.to_lowercase().contains(&needle)
                    || s.cf_handle.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Currently highlighted student, after filtering.
    pub fn selected_student(&self) -> Option<&Student> {
        let filtered = self.filtered_students();
        filtered.get(self.selected.min(filtered.len().saturating_sub(1))).copied()
    }

    /// Student shown in the profile screen.
    pub fn profile_student(&self) -> Option<&Student> {
        let Screen::Profile { student_id } = self.screen else {
            return None;
        };
        self.cache
            .students
            .value()?
            .iter()
            .find(|s| s.id == student_id)
    }

    /// Keep the selection inside the filtered list.
    pub fn clamp_selection(&mut self) {
        let len = self.filtered_students().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Issue fetches for whatever the current screen needs. Safe to call
    /// often: keys with a request already in flight are skipped.
    pub fn pump(&mut self) {
        if self.cache.students.needs_fetch() && self.cache.students.begin_fetch() {
            tasks::spawn_list_students(self.api.clone(), self.tx.clone());
        }

        if let Screen::Profile { student_id } = self.screen {
            let key = (student_id, self.contest_days);
            let history = self.cache.contest_history_mut(key);
            if history.needs_fetch() && history.begin_fetch() {
                tasks::spawn_contest_history(
                    self.api.clone(),
                    self.tx.clone(),
                    student_id,
                    self.contest_days,
                );
            }

            let key = (student_id, self.problem_days);
            let stats = self.cache.problem_stats_mut(key);
            if stats.needs_fetch() && stats.begin_fetch() {
                tasks::spawn_problem_stats(
                    self.api.clone(),
                    self.tx.clone(),
                    student_id,
                    self.problem_days,
                );
            }
        }
    }

    /// Apply a completed task result to the cache and view state.
    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::StudentsLoaded(result) => {
                match result {
                    Ok(students) => self.cache.students.resolve(students),
                    Err(error) => {
                        self.cache.students.reject(error.clone());
                        self.set_status(format!("Failed to load students: {error}"), true);
                    }
                }
                self.clamp_selection();
            }
            AppMessage::ContestHistoryLoaded {
                student_id,
                days,
                result,
            } => {
                let state = self.cache.contest_history_mut((student_id, days));
                match result {
                    Ok(entries) => state.resolve(entries),
                    Err(error) => state.reject(error),
                }
            }
            AppMessage::ProblemStatsLoaded {
                student_id,
                days,
                result,
            } => {
                let state = self.cache.problem_stats_mut((student_id, days));
                match result {
                    Ok(stats) => state.resolve(stats),
                    Err(error) => state.reject(error),
                }
            }
            AppMessage::MutationFinished {
                kind,
                subject,
                student_id,
                result,
            } => self.finish_mutation(kind, subject, student_id, result),
        }
        self.pump();
    }

    fn finish_mutation(
        &mut self,
        kind: MutationKind,
        subject: String,
        student_id: Option<i64>,
        result: Result<(), String>,
    ) {
        match result {
            Ok(()) => {
                // Successful mutations invalidate the list so the next read
                // refetches; sync also rewrites the student's projections.
                self.cache.invalidate_students();
                if kind == MutationKind::Sync {
                    if let Some(id) = student_id {
                        self.cache.invalidate_student_details(id);
                    }
                }
                // Sync has no dialog; the others close theirs on success.
                if kind != MutationKind::Sync {
                    self.dialog = None;
                }
                self.set_status(format!("Student {subject} {}", kind.verb()), false);
            }
            Err(error) => {
                // Failed mutations leave every cache entry untouched.
                match &mut self.dialog {
                    Some(Dialog::Add(form) | Dialog::Edit(form)) => {
                        form.submitting = false;
                        form.error = Some(error.clone());
                    }
                    Some(Dialog::Delete { submitting, .. }) => {
                        *submitting = false;
                    }
                    _ => {}
                }
                self.set_status(format!("Failed: {subject} not {}: {error}", kind.verb()), true);
            }
        }
    }

    /// Submit the add/edit form if it validates and nothing is in flight.
    pub fn submit_form(&mut self) {
        let Some(Dialog::Add(form) | Dialog::Edit(form)) = &mut self.dialog else {
            return;
        };
        if form.submitting {
            return;
        }
        if let Err(error) = form.validate() {
            form.error = Some(error);
            return;
        }
        form.submitting = true;
        form.error = None;

        match form.id {
            None => {
                tasks::spawn_add_student(self.api.clone(), self.tx.clone(), form.draft());
            }
            Some(id) => {
                let draft = form.draft();
                // Full replace: keep the server-owned fields from the cached
                // record and swap in the edited ones.
                let existing = self
                    .cache
                    .students
                    .value()
                    .and_then(|students| students.iter().find(|s| s.id == id))
                    .cloned();
                let Some(existing) = existing else {
                    form.submitting = false;
                    form.error = Some("student no longer present".to_string());
                    return;
                };
                let updated = Student {
                    id,
                    name: draft.name,
                    email: draft.email,
                    phone: draft.phone,
                    cf_handle: draft.cf_handle,
                    email_opt_out: draft.email_opt_out,
                    ..existing
                };
                tasks::spawn_update_student(self.api.clone(), self.tx.clone(), updated);
            }
        }
    }

    /// Confirm the delete dialog.
    pub fn confirm_delete(&mut self) {
        let Some(Dialog::Delete {
            student,
            submitting,
        }) = &mut self.dialog
        else {
            return;
        };
        if *submitting {
            return;
        }
        *submitting = true;
        tasks::spawn_delete_student(
            self.api.clone(),
            self.tx.clone(),
            student.id,
            student.name.clone(),
        );
    }

    /// Trigger a backend sync for the selected student's handle.
    pub fn sync_selected(&mut self) {
        let Some(student) = self.selected_student() else {
            return;
        };
        let (id, handle, name) = (student.id, student.cf_handle.clone(), student.name.clone());
        self.set_status(format!("Syncing {name}..."), false);
        tasks::spawn_sync_student(self.api.clone(), self.tx.clone(), id, handle);
    }

    /// Manual refresh: mark the list stale and refetch.
    pub fn refresh_students(&mut self) {
        self.cache.invalidate_students();
        self.pump();
    }

    /// Export the cached student list to CSV.
    pub fn export_csv(&mut self) {
        let Some(students) = self.cache.students.value() else {
            self.set_status("Nothing to export yet".to_string(), true);
            return;
        };
        let path = std::path::Path::new("students_data.csv");
        match crate::export::write_csv_file(students, path) {
            Ok(rows) => {
                self.set_status(format!("Exported {rows} students to {}", path.display()), false)
            }
            Err(error) => self.set_status(format!("Export failed: {error}"), true),
        }
    }

    pub fn set_status(&mut self, text: String, is_error: bool) {
        self.status = Some(StatusLine {
            text,
            is_error,
            shown_at: Instant::now(),
        });
    }

    /// Called on the UI tick: expire the status line.
    pub fn tick(&mut self) {
        if let Some(status) = &self.status {
            if status.shown_at.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl App<ReqwestHttpClient> {
    /// Production constructor.
    pub fn new(config: &Config) -> Self {
        Self::with_api(StudentApi::new(config.api_url.clone()), config)
    }
}
