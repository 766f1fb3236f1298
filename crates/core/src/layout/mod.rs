//! Layout lookups for the form editor

pub mod service;

pub use service::{LayoutService, ValueListOptions};
