//! Dashboard view rendering
//!
//! The main screen: summary cards, a rating histogram, and the student list.
//!
//! # Layout
//! ```text
//! +------------------------------------------+
//! | HEADER: CFTRACK          42 students     |
//! +------------------------------------------+
//! | CARDS: total | active | inactive | avg   |
//! +------------------------------------------+
//! | HISTOGRAM:  1200-1399 ██████████ 12      |
//! +------------------------------------------+
//! | LIST: Name  Handle  Rating  Max  Updated |
//! |   > Alice   tourist 2100    2150 2h ago  |
//! +------------------------------------------+
//! | FOOTER: keybind hints                    |
//! +------------------------------------------+
//! ```

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::Student;
use crate::stats;
use crate::traits::HttpClient;
use crate::ui::theme;

/// Maximum width of a histogram bar in cells.
const BAR_WIDTH: usize = 24;

// ============================================================================
// Main Dashboard Rendering
// ============================================================================

/// Render the complete dashboard view.
pub fn render<C: HttpClient + 'static>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Header
            Constraint::Length(3),  // Summary cards
            Constraint::Length(10), // Rating histogram
            Constraint::Min(5),     // Student list
            Constraint::Length(1),  // Footer hint
        ])
        .split(area);

    let all_students: &[Student] = app
        .cache
        .students
        .value()
        .map(Vec::as_slice)
        .unwrap_or_default();

    render_header(frame, chunks[0], app, all_students);
    render_cards(frame, chunks[1], all_students);
    render_histogram(frame, chunks[2], all_students);
    render_list(frame, chunks[3], app);

    let hint = if app.search.active {
        "type to filter   enter keep   esc clear"
    } else {
        "a add  e edit  d delete  s sync  / search  r refresh  x export  o settings  q quit"
    };
    let hint_line = Line::styled(hint, Style::default().fg(theme::COLOR_DIM));
    frame.render_widget(hint_line, chunks[4]);
}

fn render_header<C: HttpClient + 'static>(frame: &mut Frame, area: Rect, app: &App<C>, students: &[Student]) {
    let mut spans = vec![
        Span::styled(
            " CFTRACK ",
            Style::default()
                .fg(theme::COLOR_HEADER)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} students", students.len()),
            Style::default().fg(theme::COLOR_DIM),
        ),
    ];
    if app.cache.students.is_fetching() {
        spans.push(Span::styled(
            "  refreshing...",
            Style::default().fg(theme::COLOR_DIM),
        ));
    }
    frame.render_widget(Line::from(spans), area);
}

// ============================================================================
// Summary Cards
// ============================================================================

fn render_cards(frame: &mut Frame, area: Rect, students: &[Student]) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let (active, inactive) = stats::activity_split(students);
    let average = stats::average_rating(students);

    render_card(frame, cards[0], "Total", &students.len().to_string(), theme::COLOR_ACCENT);
    render_card(frame, cards[1], "Active", &active.to_string(), theme::COLOR_POSITIVE);
    render_card(frame, cards[2], "Inactive", &inactive.to_string(), theme::COLOR_NEGATIVE);
    render_card(frame, cards[3], "Avg Rating", &average.to_string(), theme::rating_color(Some(average)));
}

fn render_card(frame: &mut Frame, area: Rect, label: &str, value: &str, color: ratatui::style::Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::COLOR_BORDER))
        .title(Span::styled(label, Style::default().fg(theme::COLOR_DIM)));
    let body = Paragraph::new(Line::from(Span::styled(
        value.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(block);
    frame.render_widget(body, area);
}

// ============================================================================
// Rating Histogram
// ============================================================================

/// One text bar per fixed rating band, scaled to the largest count.
fn render_histogram(frame: &mut Frame, area: Rect, students: &[Student]) {
    let distribution = stats::rating_distribution(students);
    let max_count = distribution.iter().map(|(_, n)| *n).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(distribution.len());
    for (label, count) in &distribution {
        let filled = if max_count == 0 {
            0
        } else {
            ((*count as f64 / max_count as f64) * BAR_WIDTH as f64).round() as usize
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label:>9} "), Style::default().fg(theme::COLOR_DIM)),
            Span::styled("█".repeat(filled), Style::default().fg(theme::COLOR_BAR)),
            Span::styled(
                "░".repeat(BAR_WIDTH - filled),
                Style::default().fg(theme::COLOR_BORDER),
            ),
            Span::styled(format!(" {count}"), Style::default().fg(theme::COLOR_ACCENT)),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::COLOR_BORDER))
        .title(Span::styled(
            "Rating Distribution",
            Style::default().fg(theme::COLOR_DIM),
        ));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// ============================================================================
// Student List
// ============================================================================

fn render_list<C: HttpClient + 'static>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let title = if app.search.query.is_empty() {
        "Students".to_string()
    } else {
        format!("Students  /{}", app.search.query)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::COLOR_BORDER))
        .title(Span::styled(title, Style::default().fg(theme::COLOR_DIM)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Loading and error states before the first successful fetch.
    if app.cache.students.value().is_none() {
        let message = if app.cache.students.is_fetching() {
            Line::styled("Loading students...", Style::default().fg(theme::COLOR_DIM))
        } else if let Some(err) = app.cache.students.last_error() {
            Line::styled(
                format!("Failed to load students: {err}  (r retries)"),
                Style::default().fg(theme::COLOR_ERROR),
            )
        } else {
            Line::styled("No data yet", Style::default().fg(theme::COLOR_DIM))
        };
        frame.render_widget(Paragraph::new(message), inner);
        return;
    }

    let students = app.filtered_students();
    if students.is_empty() {
        let message = if app.search.query.is_empty() {
            "No students yet. Press a to add one."
        } else {
            "No students match the filter."
        };
        frame.render_widget(
            Paragraph::new(Line::styled(message, Style::default().fg(theme::COLOR_DIM))),
            inner,
        );
        return;
    }

    let now = Utc::now();
    let mut lines = vec![header_row()];

    // Keep the selected row visible in a tall list.
    let visible = inner.height.saturating_sub(1) as usize;
    let first = if visible == 0 || app.selected < visible {
        0
    } else {
        app.selected + 1 - visible
    };

    for (index, student) in students.iter().enumerate().skip(first).take(visible.max(1)) {
        lines.push(student_row(*student, index == app.selected, now));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn header_row() -> Line<'static> {
    Line::styled(
        format!(
            "  {:<22} {:<16} {:>7} {:>7}  {:<12} {:<8}",
            "Name", "Handle", "Rating", "Max", "Updated", "Status"
        ),
        Style::default()
            .fg(theme::COLOR_DIM)
            .add_modifier(Modifier::BOLD),
    )
}

fn student_row(student: &Student, selected: bool, now: chrono::DateTime<Utc>) -> Line<'static> {
    let marker = if selected { "> " } else { "  " };
    let updated = student
        .last_updated
        .map(|t| stats::format_recency(t, now))
        .unwrap_or_else(|| "never".to_string());
    let status = if student.is_active() { "active" } else { "inactive" };
    // A current rating above the stored max shows as improving until the
    // next sync writes the new max back.
    let improving = if student.is_improving() { "↑" } else { " " };

    let rating_text = student
        .current_rating
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());
    let max_text = student
        .max_rating
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());

    let base = if selected {
        Style::default()
            .bg(theme::COLOR_SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(marker, base.fg(theme::COLOR_ACCENT)),
        Span::styled(format!("{:<22} ", truncate(&student.name, 21)), base),
        Span::styled(
            format!("{:<16} ", truncate(&student.cf_handle, 15)),
            base.fg(theme::COLOR_DIM),
        ),
        Span::styled(
            format!("{rating_text:>7}"),
            base.fg(theme::rating_color(student.current_rating)),
        ),
        Span::styled(improving.to_string(), base.fg(theme::COLOR_POSITIVE)),
        Span::styled(
            format!("{max_text:>6}  "),
            base.fg(theme::rating_color(student.max_rating)),
        ),
        Span::styled(format!("{updated:<12} "), base.fg(theme::COLOR_DIM)),
        Span::styled(
            format!("{status:<8}"),
            base.fg(if student.is_active() {
                theme::COLOR_POSITIVE
            } else {
                theme::COLOR_NEGATIVE
            }),
        ),
    ])
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
