//! Datasource credential persistence

pub mod datasource_store;
pub mod settings_store;

pub use datasource_store::SettingsCredentialStore;
pub use settings_store::InMemorySettingsStore;
