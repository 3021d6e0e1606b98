//! Terminal UI rendering
//!
//! All rendering is a pure function of the [`App`](crate::app::App) state.
//! The active screen draws first, then the open dialog on top, then the
//! transient status line over the bottom row.

pub mod dashboard;
pub mod dialogs;
pub mod profile;
pub mod theme;

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    Frame,
};

use crate::app::{App, Screen};
use crate::traits::HttpClient;

/// Render one frame.
pub fn render<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>) {
    let area = frame.area();
    if area.width < 40 || area.height < 12 {
        frame.render_widget(
            Line::styled(
                "Terminal too small",
                Style::default().fg(theme::COLOR_DIM),
            ),
            area,
        );
        return;
    }

    match app.screen {
        Screen::Dashboard => dashboard::render(frame, area, app),
        Screen::Profile { .. } => profile::render(frame, area, app),
    }

    if let Some(dialog) = &app.dialog {
        dialogs::render(frame, area, dialog);
    }

    if let Some(status) = &app.status {
        let color = if status.is_error {
            theme::COLOR_ERROR
        } else {
            theme::COLOR_POSITIVE
        };
        let row = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        frame.render_widget(
            Line::styled(format!(" {}", status.text), Style::default().fg(color)),
            row,
        );
    }
}
