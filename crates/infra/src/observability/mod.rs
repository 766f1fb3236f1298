//! Observability infrastructure
//!
//! Structured logging through `tracing`. Secrets never appear in
//! recorded fields: tokens and passwords are [`fmbridge_domain::SecretString`]
//! values and signed headers are marked sensitive.

pub mod logging;

pub use logging::{build_env_filter, init_tracing};
