//! Session token storage

pub mod cache;

pub use cache::InMemorySessionTokenCache;
