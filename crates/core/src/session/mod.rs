//! Data API session token cache port

pub mod ports;

pub use ports::SessionTokenCache;
