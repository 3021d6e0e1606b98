//! Modal dialog rendering
//!
//! Dialogs render last so they sit on top of the active screen. Each one is
//! a centered card cleared to a solid background.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{Dialog, FormField, StudentForm};
use crate::ui::theme;

// ============================================================================
// Dialog Dispatch
// ============================================================================

/// Render the open dialog, if any, centered over `area`.
pub fn render(frame: &mut Frame, area: Rect, dialog: &Dialog) {
    match dialog {
        Dialog::Add(form) => render_form(frame, area, "Add Student", form),
        Dialog::Edit(form) => render_form(frame, area, "Edit Student", form),
        Dialog::Delete { student, submitting } => {
            let card = centered(area, 50, 6);
            let block = dialog_block("Delete Student");
            let inner = block.inner(card);
            frame.render_widget(Clear, card);
            frame.render_widget(block, card);

            let body = vec![
                Line::raw(""),
                Line::from(vec![
                    Span::raw("Delete "),
                    Span::styled(
                        student.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(" ({})?", student.cf_handle)),
                ]),
                Line::raw(""),
                if *submitting {
                    Line::styled("Deleting...", Style::default().fg(theme::COLOR_DIM))
                } else {
                    Line::styled(
                        "y/enter confirm   n/esc cancel",
                        Style::default().fg(theme::COLOR_DIM),
                    )
                },
            ];
            frame.render_widget(Paragraph::new(body), inner);
        }
        Dialog::Settings { refresh_secs, error } => {
            let card = centered(area, 50, 7);
            let block = dialog_block("Settings");
            let inner = block.inner(card);
            frame.render_widget(Clear, card);
            frame.render_widget(block, card);

            let mut body = vec![
                Line::raw(""),
                Line::from(vec![
                    Span::styled("Refresh every (s)  ", Style::default().fg(theme::COLOR_DIM)),
                    Span::styled(
                        format!("{refresh_secs}_"),
                        Style::default().fg(theme::COLOR_ACCENT),
                    ),
                ]),
                Line::raw(""),
            ];
            if let Some(err) = error {
                body.push(Line::styled(
                    err.clone(),
                    Style::default().fg(theme::COLOR_ERROR),
                ));
            } else {
                body.push(Line::styled(
                    "enter apply   esc cancel   0 disables",
                    Style::default().fg(theme::COLOR_DIM),
                ));
            }
            frame.render_widget(Paragraph::new(body), inner);
        }
    }
}

// ============================================================================
// Add / Edit Form
// ============================================================================

fn render_form(frame: &mut Frame, area: Rect, title: &str, form: &StudentForm) {
    let card = centered(area, 56, 12);
    let block = dialog_block(title);
    let inner = block.inner(card);
    frame.render_widget(Clear, card);
    frame.render_widget(block, card);

    let mut body = vec![
        field_line("Name", &form.name, form.focus == FormField::Name),
        field_line("Email", &form.email, form.focus == FormField::Email),
        field_line("Phone", &form.phone, form.focus == FormField::Phone),
        field_line("CF Handle", &form.cf_handle, form.focus == FormField::Handle),
        toggle_line(
            "Reminders",
            form.email_opt_out,
            form.focus == FormField::OptOut,
        ),
        Line::raw(""),
    ];

    if let Some(err) = &form.error {
        body.push(Line::styled(
            err.clone(),
            Style::default().fg(theme::COLOR_ERROR),
        ));
    } else if form.submitting {
        body.push(Line::styled(
            "Saving...",
            Style::default().fg(theme::COLOR_DIM),
        ));
    } else {
        body.push(Line::styled(
            "tab next field   enter save   esc cancel",
            Style::default().fg(theme::COLOR_DIM),
        ));
    }

    frame.render_widget(Paragraph::new(body), inner);
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default()
            .fg(theme::COLOR_ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::COLOR_DIM)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label:<11} "), label_style),
        Span::styled(
            format!("{value}{cursor}"),
            Style::default().fg(theme::COLOR_ACCENT),
        ),
    ])
}

fn toggle_line(label: &str, opted_out: bool, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default()
            .fg(theme::COLOR_ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::COLOR_DIM)
    };
    let (mark, text) = if opted_out {
        ("[x]", "opted out")
    } else {
        ("[ ]", "enabled")
    };
    let hint = if focused { "  (space toggles)" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label:<11} "), label_style),
        Span::styled(
            format!("{mark} {text}"),
            Style::default().fg(theme::COLOR_ACCENT),
        ),
        Span::styled(hint, Style::default().fg(theme::COLOR_DIM)),
    ])
}

// ============================================================================
// Geometry
// ============================================================================

fn dialog_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::COLOR_ACCENT))
        .style(Style::default().bg(theme::COLOR_DIALOG_BG))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::COLOR_HEADER)
                .add_modifier(Modifier::BOLD),
        ))
}

/// A `width` x `height` rect centered in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
