//! Keyboard event handling.
//!
//! One entry point, `handle_key`, dispatching by dialog > search > screen.
//! Mutations are serialized per dialog by the form's `submitting` flag;
//! navigation and fetches are never blocked by an in-flight mutation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Dialog, FormField, Screen, StudentForm, CONTEST_WINDOWS, PROBLEM_WINDOWS};
use crate::traits::HttpClient;

/// Handle one key press against the full app state.
pub fn handle_key<C: HttpClient + 'static>(app: &mut App<C>, key: KeyEvent) {
    // Ctrl+C always quits.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if app.dialog.is_some() {
        handle_dialog_key(app, key);
        return;
    }

    if app.search.active {
        handle_search_key(app, key);
        return;
    }

    match app.screen {
        Screen::Dashboard => handle_dashboard_key(app, key),
        Screen::Profile { .. } => handle_profile_key(app, key),
    }
}

fn handle_dashboard_key<C: HttpClient + 'static>(app: &mut App<C>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('/') => {
            app.search.active = true;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.selected = app.selected.saturating_add(1);
            app.clamp_selection();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.selected = app.selected.saturating_sub(1);
        }
        KeyCode::Enter => {
            if let Some(student) = app.selected_student() {
                app.screen = Screen::Profile {
                    student_id: student.id,
                };
                app.pump();
            }
        }
        KeyCode::Char('a') => {
            app.dialog = Some(Dialog::Add(StudentForm::empty()));
        }
        KeyCode::Char('e') => {
            if let Some(student) = app.selected_student() {
                app.dialog = Some(Dialog::Edit(StudentForm::for_edit(student)));
            }
        }
        KeyCode::Char('d') => {
            if let Some(student) = app.selected_student() {
                app.dialog = Some(Dialog::Delete {
                    student: student.clone(),
                    submitting: false,
                });
            }
        }
        KeyCode::Char('s') => app.sync_selected(),
        KeyCode::Char('r') => app.refresh_students(),
        KeyCode::Char('x') => app.export_csv(),
        KeyCode::Char('o') => {
            app.dialog = Some(Dialog::Settings {
                refresh_secs: app.refresh_secs.to_string(),
                error: None,
            });
        }
        _ => {}
    }
}

fn handle_profile_key<C: HttpClient + 'static>(app: &mut App<C>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.screen = Screen::Dashboard;
        }
        // Cycle the contest-history window; the cache keeps each window's
        // data keyed separately, so flipping back serves the cached value.
        KeyCode::Char('c') => {
            app.contest_days = next_window(&CONTEST_WINDOWS, app.contest_days);
            app.pump();
        }
        // Cycle the problem-stats window.
        KeyCode::Char('p') => {
            app.problem_days = next_window(&PROBLEM_WINDOWS, app.problem_days);
            app.pump();
        }
        KeyCode::Char('s') => app.sync_selected(),
        _ => {}
    }
}

fn handle_search_key<C: HttpClient + 'static>(app: &mut App<C>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search.active = false;
            app.search.query.clear();
            app.clamp_selection();
        }
        KeyCode::Enter => {
            // Keep the filter, leave input mode.
            app.search.active = false;
        }
        KeyCode::Backspace => {
            app.search.query.pop();
            app.clamp_selection();
        }
        KeyCode::Down => {
            app.selected = app.selected.saturating_add(1);
            app.clamp_selection();
        }
        KeyCode::Up => {
            app.selected = app.selected.saturating_sub(1);
        }
        KeyCode::Char(c) => {
            app.search.query.push(c);
            app.clamp_selection();
        }
        _ => {}
    }
}

fn handle_dialog_key<C: HttpClient + 'static>(app: &mut App<C>, key: KeyEvent) {
    match &mut app.dialog {
        Some(Dialog::Add(form) | Dialog::Edit(form)) => match key.code {
            KeyCode::Esc => {
                app.dialog = None;
            }
            KeyCode::Tab | KeyCode::Down => {
                form.focus = form.focus.next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.focus = form.focus.prev();
            }
            KeyCode::Enter => app.submit_form(),
            KeyCode::Char(' ') if form.focus == FormField::OptOut => {
                form.email_opt_out = !form.email_opt_out;
            }
            KeyCode::Backspace => {
                if let Some(value) = form.focused_value_mut() {
                    value.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(value) = form.focused_value_mut() {
                    value.push(c);
                }
            }
            _ => {}
        },
        Some(Dialog::Delete { submitting, .. }) => match key.code {
            KeyCode::Esc | KeyCode::Char('n') => {
                if !*submitting {
                    app.dialog = None;
                }
            }
            KeyCode::Enter | KeyCode::Char('y') => app.confirm_delete(),
            _ => {}
        },
        Some(Dialog::Settings {
            refresh_secs,
            error,
        }) => match key.code {
            KeyCode::Esc => {
                app.dialog = None;
            }
            KeyCode::Enter => match refresh_secs.trim().parse::<u64>() {
                Ok(secs) => {
                    app.refresh_secs = secs;
                    app.dialog = None;
                    app.set_status(
                        if secs == 0 {
                            "Auto-refresh disabled".to_string()
                        } else {
                            format!("Auto-refresh every {secs}s")
                        },
                        false,
                    );
                }
                Err(_) => {
                    *error = Some("enter a whole number of seconds (0 disables)".to_string());
                }
            },
            KeyCode::Backspace => {
                refresh_secs.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                refresh_secs.push(c);
            }
            _ => {}
        },
        None => {}
    }
}

/// Next window size in the cycle, wrapping at the end.
fn next_window(windows: &[u32], current: u32) -> u32 {
    let position = windows.iter().position(|&w| w == current).unwrap_or(0);
    windows[(position + 1) % windows.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockHttpClient;
    use crate::api::StudentApi;
    use crate::config::Config;
    use crate::models::Student;

    fn app_with_students(students: Vec<Student>) -> App<MockHttpClient> {
        let api = StudentApi::with_client(MockHttpClient::new(), "http://api.test/api");
        let mut app = App::with_api(api, &Config::default());
        app.cache.students.begin_fetch();
        app.cache.students.resolve(students);
        app
    }

    fn student(id: i64, name: &str) -> Student {
        Student {
            id,
            name: name.to_string(),
            email: format!("{name}@example.com"),
            phone: None,
            cf_handle: name.to_lowercase(),
            current_rating: Some(1400),
            max_rating: Some(1400),
            last_updated: None,
            email_opt_out: false,
        }
    }

    fn press(app: &mut App<MockHttpClient>, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_navigation_clamps_to_list() {
        let mut app = app_with_students(vec![student(1, "A"), student(2, "B")]);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 1);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 1);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, 0);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn test_enter_opens_profile_and_esc_returns() {
        let mut app = app_with_students(vec![student(7, "Ada")]);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Profile { student_id: 7 });
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Dashboard);
    }

    #[test]
    fn test_search_mode_edits_query() {
        let mut app = app_with_students(vec![student(1, "Ada"), student(2, "Alan")]);
        press(&mut app, KeyCode::Char('/'));
        assert!(app.search.active);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.search.query, "ad");
        assert_eq!(app.filtered_students().len(), 1);

        press(&mut app, KeyCode::Esc);
        assert!(!app.search.active);
        assert!(app.search.query.is_empty());
    }

    #[test]
    fn test_add_dialog_typing_and_focus() {
        let mut app = app_with_students(vec![]);
        press(&mut app, KeyCode::Char('a'));
        assert!(matches!(app.dialog, Some(Dialog::Add(_))));

        for c in "Ada".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Tab);
        for c in "a@x".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        match &app.dialog {
            Some(Dialog::Add(form)) => {
                assert_eq!(form.name, "Ada");
                assert_eq!(form.email, "a@x");
                assert_eq!(form.focus, FormField::Email);
            }
            other => panic!("expected add dialog, got {other:?}"),
        }
    }

    #[test]
    fn test_opt_out_toggle_with_space() {
        let mut app = app_with_students(vec![]);
        press(&mut app, KeyCode::Char('a'));
        // Tab to the opt-out toggle (4 moves from Name).
        for _ in 0..4 {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Char(' '));
        match &app.dialog {
            Some(Dialog::Add(form)) => assert!(form.email_opt_out),
            other => panic!("expected add dialog, got {other:?}"),
        }
    }

    #[test]
    fn test_edit_dialog_prefills() {
        let mut app = app_with_students(vec![student(5, "Ada")]);
        press(&mut app, KeyCode::Char('e'));
        match &app.dialog {
            Some(Dialog::Edit(form)) => {
                assert_eq!(form.id, Some(5));
                assert_eq!(form.name, "Ada");
                assert_eq!(form.cf_handle, "ada");
            }
            other => panic!("expected edit dialog, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_dialog_escape_cancels() {
        let mut app = app_with_students(vec![student(5, "Ada")]);
        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.dialog, Some(Dialog::Delete { .. })));
        press(&mut app, KeyCode::Esc);
        assert!(app.dialog.is_none());
    }

    #[tokio::test]
    async fn test_profile_window_cycling() {
        let mut app = app_with_students(vec![student(1, "Ada")]);
        app.screen = Screen::Profile { student_id: 1 };

        assert_eq!(app.contest_days, 365);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.contest_days, 30);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.contest_days, 90);

        assert_eq!(app.problem_days, 30);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.problem_days, 90);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.problem_days, 7);
    }

    #[test]
    fn test_settings_dialog_applies_interval() {
        let mut app = app_with_students(vec![]);
        press(&mut app, KeyCode::Char('o'));
        assert!(matches!(app.dialog, Some(Dialog::Settings { .. })));

        // Clear the prefilled "0" then type a new interval.
        press(&mut app, KeyCode::Backspace);
        for c in "60".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.refresh_secs, 60);
        assert!(app.dialog.is_none());
    }

    #[test]
    fn test_settings_rejects_non_numeric() {
        let mut app = app_with_students(vec![]);
        press(&mut app, KeyCode::Char('o'));
        // Letters are ignored by input filtering; force an empty value.
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        match &app.dialog {
            Some(Dialog::Settings { error, .. }) => assert!(error.is_some()),
            other => panic!("expected settings dialog, got {other:?}"),
        }
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let mut app = app_with_students(vec![]);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_quit_from_dashboard() {
        let mut app = app_with_students(vec![]);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
