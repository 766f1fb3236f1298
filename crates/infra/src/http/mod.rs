//! HTTP transport shared by the Data API client

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
