//! # fmbridge Domain
//!
//! Domain types and models for the FileMaker Data API bridge.
//!
//! This crate contains:
//! - Datasource, session and Data API result types
//! - Form submission types consumed by the bridge
//! - Domain error types (`FmBridgeError`, `DriverError`) and Result definitions
//! - Configuration structures and domain constants
//!
//! ## Architecture
//! - No dependencies on other fmbridge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
