//! FileMaker Data API adapter
//!
//! Implements the `fmbridge-core` gateway ports over HTTPS.

mod auth;
pub mod client;
pub mod factory;
pub mod multipart;
mod response;
pub mod uri;

pub use client::FmDataApiClient;
pub use factory::FmDataApiGatewayFactory;
pub use multipart::sanitize_file_name;
pub use uri::Endpoints;
