//! # fmbridge Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The reqwest-based HTTP client and FileMaker Data API adapter
//! - The in-memory session token cache
//! - The settings-backed, encrypting credential store
//! - Configuration loading and tracing initialisation
//!
//! ## Architecture
//! - Implements traits defined in `fmbridge-core`
//! - Depends on `fmbridge-common` for the password cipher
//! - Contains all "impure" code (network and file I/O)

pub mod config;
pub mod credentials;
pub mod errors;
pub mod fmdapi;
pub mod http;
pub mod observability;
pub mod session;

// Re-export commonly used items
pub use credentials::{InMemorySettingsStore, SettingsCredentialStore};
pub use errors::InfraError;
pub use fmdapi::{FmDataApiClient, FmDataApiGatewayFactory};
pub use http::HttpClient;
pub use observability::init_tracing;
pub use session::InMemorySessionTokenCache;
