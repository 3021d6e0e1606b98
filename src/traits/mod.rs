//! Trait abstractions for external effects.
//!
//! The only effect this crate performs is HTTP I/O against the tracker
//! backend; [`HttpClient`] is the seam that keeps the API client testable.

pub mod http;

pub use http::{HttpClient, HttpError, Response};
