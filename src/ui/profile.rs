//! Student profile view rendering
//!
//! Two panels below a one-line header: contest history on the left,
//! problem-solving stats on the right. Each panel has its own window
//! selector (`c` for contests, `p` for problems) and loads independently.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::cache::QueryState;
use crate::models::{ContestEntry, ProblemStats, Student};
use crate::stats::RatingBand;
use crate::traits::HttpClient;
use crate::ui::theme;

/// Unicode block characters for the submission sparkline, lowest to highest.
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

// ============================================================================
// Main Profile Rendering
// ============================================================================

/// Render the profile view for the student the dashboard navigated to.
pub fn render<C: HttpClient + 'static>(frame: &mut Frame, area: Rect, app: &App<C>) {
    let Some(student) = app.profile_student() else {
        // The student vanished between navigation and render (deleted or
        // dropped from a refreshed list). Show a hint instead of a panic.
        let message = Line::styled(
            "Student no longer in the list. Press esc to go back.",
            Style::default().fg(theme::COLOR_DIM),
        );
        frame.render_widget(Paragraph::new(message), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(8),    // Panels
            Constraint::Length(1), // Footer hint
        ])
        .split(area);

    render_header(frame, chunks[0], student);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    let contest_key = (student.id, app.contest_days);
    render_contests(
        frame,
        panels[0],
        app.cache.contest_history(contest_key),
        app.contest_days,
    );

    let problem_key = (student.id, app.problem_days);
    render_problems(
        frame,
        panels[1],
        app.cache.problem_stats(problem_key),
        app.problem_days,
    );

    let hint = "c contest window  p problem window  s sync  esc back";
    frame.render_widget(
        Line::styled(hint, Style::default().fg(theme::COLOR_DIM)),
        chunks[2],
    );
}

fn render_header(frame: &mut Frame, area: Rect, student: &Student) {
    let band = student.current_rating.map(RatingBand::from_rating);
    let band_span = match band {
        Some(band) => Span::styled(
            band.label(),
            Style::default().fg(theme::band_color(band)).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("Unrated", Style::default().fg(theme::COLOR_DIM)),
    };

    let rating_text = match (student.current_rating, student.max_rating) {
        (Some(cur), Some(max)) => format!("  {cur} (max {max})"),
        (Some(cur), None) => format!("  {cur}"),
        _ => String::new(),
    };

    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", student.name),
            Style::default()
                .fg(theme::COLOR_HEADER)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("({}) ", student.cf_handle),
            Style::default().fg(theme::COLOR_DIM),
        ),
        band_span,
        Span::styled(rating_text, Style::default().fg(theme::rating_color(student.current_rating))),
    ]);

    let contact = Line::from(vec![
        Span::styled(format!(" {}", student.email), Style::default().fg(theme::COLOR_DIM)),
        Span::styled(
            student
                .phone
                .as_deref()
                .map(|p| format!("  {p}"))
                .unwrap_or_default(),
            Style::default().fg(theme::COLOR_DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(vec![title, contact]), area);
}

// ============================================================================
// Contest History Panel
// ============================================================================

fn render_contests(
    frame: &mut Frame,
    area: Rect,
    state: Option<&QueryState<Vec<ContestEntry>>>,
    days: u32,
) {
    let block = panel_block(format!("Contests  last {days}d"));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(entries) = state.and_then(|s| s.value()) else {
        render_pending(frame, inner, state);
        return;
    };

    if entries.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::styled(
                "No contests in this window.",
                Style::default().fg(theme::COLOR_DIM),
            )),
            inner,
        );
        return;
    }

    let mut lines = vec![Line::styled(
        format!(
            "{:<10} {:<24} {:>6} {:>5} {:>4} {:>6}",
            "Date", "Contest", "Rank", "Δ", "Slv", "New"
        ),
        Style::default()
            .fg(theme::COLOR_DIM)
            .add_modifier(Modifier::BOLD),
    )];

    for entry in entries.iter().take(inner.height.saturating_sub(1) as usize) {
        lines.push(contest_row(entry));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn contest_row(entry: &ContestEntry) -> Line<'static> {
    let delta_color = if entry.rating_change >= 0 {
        theme::COLOR_POSITIVE
    } else {
        theme::COLOR_NEGATIVE
    };
    let delta = if entry.rating_change >= 0 {
        format!("+{}", entry.rating_change)
    } else {
        entry.rating_change.to_string()
    };

    Line::from(vec![
        Span::styled(
            format!("{:<10} ", entry.date.format("%Y-%m-%d")),
            Style::default().fg(theme::COLOR_DIM),
        ),
        Span::raw(format!("{:<24} ", truncate(&entry.contest_name, 23))),
        Span::raw(format!("{:>6} ", entry.rank)),
        Span::styled(format!("{delta:>5} "), Style::default().fg(delta_color)),
        Span::raw(format!("{:>4} ", entry.solved_count)),
        Span::styled(
            format!("{:>6}", entry.new_rating),
            Style::default().fg(theme::rating_color(Some(entry.new_rating))),
        ),
    ])
}

// ============================================================================
// Problem Stats Panel
// ============================================================================

fn render_problems(
    frame: &mut Frame,
    area: Rect,
    state: Option<&QueryState<Option<ProblemStats>>>,
    days: u32,
) {
    let block = panel_block(format!("Problems  last {days}d"));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(stats) = state.and_then(|s| s.value()) else {
        render_pending(frame, inner, state);
        return;
    };

    // The server returns no stats for a handle it has never synced.
    let Some(stats) = stats.as_ref() else {
        frame.render_widget(
            Paragraph::new(Line::styled(
                "No submission data. Press s to sync.",
                Style::default().fg(theme::COLOR_DIM),
            )),
            inner,
        );
        return;
    };

    let mut lines = vec![
        stat_line("Solved", stats.total_solved.to_string()),
        stat_line("Per day", format!("{:.2}", stats.problems_per_day)),
        stat_line("Avg rating", format!("{:.0}", stats.average_rating)),
        stat_line(
            "Hardest",
            match (&stats.hardest_solved, stats.hardest_solved_rating) {
                (Some(name), Some(rating)) => format!("{name} ({rating})"),
                (Some(name), None) => name.clone(),
                _ => "-".to_string(),
            },
        ),
        Line::raw(""),
    ];

    // Per-bucket solved counts, one text bar per rating bucket.
    let max_bucket = stats.solved_by_rating.values().copied().max().unwrap_or(0);
    for (bucket, count) in &stats.solved_by_rating {
        let filled = if max_bucket == 0 {
            0
        } else {
            ((*count as f64 / max_bucket as f64) * 16.0).round() as usize
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{bucket:>5} "), Style::default().fg(theme::COLOR_DIM)),
            Span::styled("█".repeat(filled), Style::default().fg(theme::COLOR_BAR)),
            Span::styled(format!(" {count}"), Style::default().fg(theme::COLOR_ACCENT)),
        ]));
    }

    if !stats.submissions.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "Daily submissions",
            Style::default().fg(theme::COLOR_DIM),
        ));
        lines.push(sparkline(&stats.submissions.iter().map(|d| d.count).collect::<Vec<_>>()));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn stat_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<11} "), Style::default().fg(theme::COLOR_DIM)),
        Span::styled(value, Style::default().fg(theme::COLOR_ACCENT)),
    ])
}

/// Render a series of counts as one row of block characters.
fn sparkline(counts: &[u32]) -> Line<'static> {
    let max = counts.iter().copied().max().unwrap_or(0);
    let text: String = counts
        .iter()
        .map(|&count| {
            if max == 0 || count == 0 {
                SPARK_LEVELS[0]
            } else {
                let level = ((count as f64 / max as f64) * (SPARK_LEVELS.len() - 1) as f64)
                    .ceil() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect();
    Line::styled(text, Style::default().fg(theme::COLOR_BAR))
}

// ============================================================================
// Shared Helpers
// ============================================================================

fn panel_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::COLOR_BORDER))
        .title(Span::styled(title, Style::default().fg(theme::COLOR_DIM)))
}

/// Loading or error text for a panel with no cached value yet.
fn render_pending<T>(frame: &mut Frame, area: Rect, state: Option<&QueryState<T>>) {
    let line = match state {
        Some(state) if state.is_fetching() => {
            Line::styled("Loading...", Style::default().fg(theme::COLOR_DIM))
        }
        Some(state) => match state.last_error() {
            Some(err) => Line::styled(
                format!("Failed to load: {err}"),
                Style::default().fg(theme::COLOR_ERROR),
            ),
            None => Line::styled("No data yet", Style::default().fg(theme::COLOR_DIM)),
        },
        None => Line::styled("Loading...", Style::default().fg(theme::COLOR_DIM)),
    };
    frame.render_widget(Paragraph::new(line), area);
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
