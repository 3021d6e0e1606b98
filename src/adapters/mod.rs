//! Concrete implementations of trait abstractions.
//!
//! - [`ReqwestHttpClient`] - production HTTP client using reqwest
//! - [`MockHttpClient`] - configurable test double with request recording

pub mod mock;
pub mod reqwest_http;

pub use mock::{MockHttpClient, MockResponse, RecordedRequest};
pub use reqwest_http::ReqwestHttpClient;
