//! # fmbridge Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for credentials, sessions and the
//!   FileMaker Data API
//! - The form submission bridge and its value formatting rules
//! - Layout lookups used while editing forms
//!
//! ## Architecture Principles
//! - Only depends on `fmbridge-domain`
//! - No HTTP, storage or platform code
//! - All external dependencies via traits

pub mod datasource;
pub mod fmdapi;
pub mod layout;
pub mod session;
pub mod submission;

pub use datasource::ports::{CredentialStore, SettingsStore};
pub use fmdapi::ports::{CloudTokenProvider, FileMakerGateway, GatewayFactory};
pub use layout::{LayoutService, ValueListOptions};
pub use session::ports::SessionTokenCache;
pub use submission::{FormSubmissionBridge, SubmissionFeedback, SubmissionStatus};
