//! HTTP transport

pub mod client;
pub mod outcome;

pub use client::{HttpClient, HttpClientBuilder};
pub use outcome::{classify_response, retry_after_secs};
