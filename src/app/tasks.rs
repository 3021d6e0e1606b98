//! Spawned API tasks.
//!
//! Each fetch or mutation runs on the runtime with a cloned API client and
//! reports back through the message channel. Failures are logged and carried
//! to the UI as strings; nothing here touches the cache directly.

use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::api::StudentApi;
use crate::app::messages::{AppMessage, MutationKind};
use crate::models::{NewStudent, Student};
use crate::traits::HttpClient;

pub fn spawn_list_students<C: HttpClient + 'static>(
    api: StudentApi<C>,
    tx: UnboundedSender<AppMessage>,
) {
    tokio::spawn(async move {
        let result = api.list_students().await.map_err(|e| e.to_string());
        if let Err(error) = &result {
            warn!(%error, "student list fetch failed");
        }
        let _ = tx.send(AppMessage::StudentsLoaded(result));
    });
}

pub fn spawn_contest_history<C: HttpClient + 'static>(
    api: StudentApi<C>,
    tx: UnboundedSender<AppMessage>,
    student_id: i64,
    days: u32,
) {
    tokio::spawn(async move {
        let result = api
            .contest_history(student_id, days)
            .await
            .map_err(|e| e.to_string());
        if let Err(error) = &result {
            warn!(student_id, days, %error, "contest history fetch failed");
        }
        let _ = tx.send(AppMessage::ContestHistoryLoaded {
            student_id,
            days,
            result,
        });
    });
}

pub fn spawn_problem_stats<C: HttpClient + 'static>(
    api: StudentApi<C>,
    tx: UnboundedSender<AppMessage>,
    student_id: i64,
    days: u32,
) {
    tokio::spawn(async move {
        let result = api
            .problem_stats(student_id, days)
            .await
            .map_err(|e| e.to_string());
        if let Err(error) = &result {
            warn!(student_id, days, %error, "problem stats fetch failed");
        }
        let _ = tx.send(AppMessage::ProblemStatsLoaded {
            student_id,
            days,
            result,
        });
    });
}

pub fn spawn_add_student<C: HttpClient + 'static>(
    api: StudentApi<C>,
    tx: UnboundedSender<AppMessage>,
    draft: NewStudent,
) {
    let subject = draft.name.clone();
    tokio::spawn(async move {
        let result = api.add_student(&draft).await.map(|_| ());
        report(tx, MutationKind::Add, subject, None, result);
    });
}

pub fn spawn_update_student<C: HttpClient + 'static>(
    api: StudentApi<C>,
    tx: UnboundedSender<AppMessage>,
    student: Student,
) {
    let subject = student.name.clone();
    tokio::spawn(async move {
        let result = api.update_student(&student).await.map(|_| ());
        report(tx, MutationKind::Update, subject, None, result);
    });
}

pub fn spawn_delete_student<C: HttpClient + 'static>(
    api: StudentApi<C>,
    tx: UnboundedSender<AppMessage>,
    student_id: i64,
    name: String,
) {
    tokio::spawn(async move {
        let result = api.delete_student(student_id).await;
        report(tx, MutationKind::Delete, name, None, result);
    });
}

pub fn spawn_sync_student<C: HttpClient + 'static>(
    api: StudentApi<C>,
    tx: UnboundedSender<AppMessage>,
    student_id: i64,
    cf_handle: String,
) {
    tokio::spawn(async move {
        let result = api.sync_student(&cf_handle).await;
        report(tx, MutationKind::Sync, cf_handle, Some(student_id), result);
    });
}

fn report(
    tx: UnboundedSender<AppMessage>,
    kind: MutationKind,
    subject: String,
    student_id: Option<i64>,
    result: Result<(), crate::api::ApiError>,
) {
    let result = result.map_err(|e| e.to_string());
    if let Err(error) = &result {
        warn!(?kind, subject, %error, "mutation failed");
    }
    let _ = tx.send(AppMessage::MutationFinished {
        kind,
        subject,
        student_id,
        result,
    });
}
