//! HTTP client plumbing shared by the external service integrations.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
