//! Derived-view calculators.
//!
//! Pure, stateless transforms from cached backend data to display-ready
//! aggregates. Nothing here performs I/O or reads the clock; callers pass
//! `now` in where elapsed time matters.

use chrono::{DateTime, Utc};

use crate::models::Student;

/// Codeforces rating bands, ordered from lowest to highest.
///
/// Boundary values belong to the higher band: a rating of exactly 1200 is
/// Pupil, not Newbie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RatingBand {
    Newbie,
    Pupil,
    Specialist,
    Expert,
    CandidateMaster,
    Master,
}

impl RatingBand {
    /// Classify a rating into its band.
    pub fn from_rating(rating: i32) -> Self {
        if rating >= 2100 {
            RatingBand::Master
        } else if rating >= 1900 {
            RatingBand::CandidateMaster
        } else if rating >= 1600 {
            RatingBand::Expert
        } else if rating >= 1400 {
            RatingBand::Specialist
        } else if rating >= 1200 {
            RatingBand::Pupil
        } else {
            RatingBand::Newbie
        }
    }

    /// Display label for the band.
    pub fn label(&self) -> &'static str {
        match self {
            RatingBand::Newbie => "Newbie",
            RatingBand::Pupil => "Pupil",
            RatingBand::Specialist => "Specialist",
            RatingBand::Expert => "Expert",
            RatingBand::CandidateMaster => "Candidate Master",
            RatingBand::Master => "Master",
        }
    }
}

/// One bar of the dashboard rating histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionBand {
    pub label: &'static str,
    pub min: i32,
    /// Inclusive upper bound; `None` means unbounded above.
    pub max: Option<i32>,
}

impl DistributionBand {
    fn contains(&self, rating: i32) -> bool {
        rating >= self.min && self.max.map_or(true, |max| rating <= max)
    }
}

/// The eight fixed histogram bands, contiguous and exhaustive over `[0, ∞)`.
pub const DISTRIBUTION_BANDS: [DistributionBand; 8] = [
    DistributionBand { label: "<800", min: 0, max: Some(799) },
    DistributionBand { label: "800-999", min: 800, max: Some(999) },
    DistributionBand { label: "1000-1199", min: 1000, max: Some(1199) },
    DistributionBand { label: "1200-1399", min: 1200, max: Some(1399) },
    DistributionBand { label: "1400-1599", min: 1400, max: Some(1599) },
    DistributionBand { label: "1600-1799", min: 1600, max: Some(1799) },
    DistributionBand { label: "1800-2099", min: 1800, max: Some(2099) },
    DistributionBand { label: "2100+", min: 2100, max: None },
];

/// Count students per histogram band. Missing ratings count as 0.
pub fn rating_distribution(students: &[Student]) -> Vec<(&'static str, u64)> {
    DISTRIBUTION_BANDS
        .iter()
        .map(|band| {
            let count = students
                .iter()
                .filter(|s| band.contains(s.rating_or_zero()))
                .count() as u64;
            (band.label, count)
        })
        .collect()
}

/// Partition the student set into (active, inactive) counts.
/// The two always sum to the total.
pub fn activity_split(students: &[Student]) -> (usize, usize) {
    let active = students.iter().filter(|s| s.is_active()).count();
    (active, students.len() - active)
}

/// Arithmetic mean of current ratings, rounded to the nearest integer.
/// Missing ratings count as 0; the empty set averages to 0.
pub fn average_rating(students: &[Student]) -> i32 {
    if students.is_empty() {
        return 0;
    }
    let sum: i64 = students.iter().map(|s| s.rating_or_zero() as i64).sum();
    (sum as f64 / students.len() as f64).round() as i32
}

/// Express elapsed time since `then` as "Just now" (<1h), "Nh ago" (<24h) or
/// "Nd ago" (>=24h), computed against the supplied `now`.
pub fn format_recency(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - then).num_hours();
    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", hours / 24)
    }
}
