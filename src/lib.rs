//! cftrack - a terminal dashboard for tracking student Codeforces progress
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod export;
pub mod logging;
pub mod models;
pub mod stats;
pub mod traits;
pub mod ui;
