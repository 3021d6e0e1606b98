//! Color theme constants for the cftrack UI
//!
//! Defines the minimal dark color palette used throughout the UI, plus
//! the Codeforces rating band colors.

use ratatui::style::Color;

use crate::stats::RatingBand;

// ============================================================================
// Minimal Dark Color Theme
// ============================================================================

/// Primary border color - dark gray for minimal aesthetic
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Accent color - white for highlights and important elements
pub const COLOR_ACCENT: Color = Color::White;

/// Header text color - white for the title
pub const COLOR_HEADER: Color = Color::White;

/// Dim text for less important info
pub const COLOR_DIM: Color = Color::DarkGray;

/// Selected row highlight
pub const COLOR_SELECTED_BG: Color = Color::Rgb(40, 40, 60);

/// Active students and positive rating deltas - bright green
pub const COLOR_POSITIVE: Color = Color::LightGreen;

/// Inactive students and negative rating deltas - red
pub const COLOR_NEGATIVE: Color = Color::Red;

/// Histogram bar fill color - white
pub const COLOR_BAR: Color = Color::White;

/// Status line for errors - red
pub const COLOR_ERROR: Color = Color::Red;

/// Background color for dialog boxes
pub const COLOR_DIALOG_BG: Color = Color::Rgb(10, 15, 35);

// ============================================================================
// Rating Band Colors
// ============================================================================

/// Color for a Codeforces rating band, loosely following the site's palette.
pub fn band_color(band: RatingBand) -> Color {
    match band {
        RatingBand::Newbie => Color::Gray,
        RatingBand::Pupil => Color::Green,
        RatingBand::Specialist => Color::Blue,
        RatingBand::Expert => Color::Magenta,
        RatingBand::CandidateMaster => Color::Rgb(255, 140, 0), // orange
        RatingBand::Master => Color::Red,
    }
}

/// Band color for an optional rating, dim gray when unrated.
pub fn rating_color(rating: Option<i32>) -> Color {
    match rating {
        Some(r) => band_color(RatingBand::from_rating(r)),
        None => COLOR_DIM,
    }
}
