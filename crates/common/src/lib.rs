//! Common utilities shared across fmbridge crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error types
//! - `crypto`: AES-256-GCM cipher for datasource passwords at rest

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

#[cfg(feature = "foundation")]
pub mod error;

#[cfg(feature = "crypto")]
pub mod crypto;

#[cfg(feature = "crypto")]
pub use crypto::{Aes256GcmCipher, Cipher};
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult};
