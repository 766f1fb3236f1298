//! Datasource credential ports

pub mod ports;

pub use ports::{CredentialStore, SettingsStore};
