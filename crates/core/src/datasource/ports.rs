//! Port interfaces for datasource credentials
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use fmbridge_domain::{DatasourceConfig, DatasourceId, Result};

/// Trait for reading and writing datasource connection parameters
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load a datasource with its password already decrypted.
    ///
    /// Fails with `FmBridgeError::NotFound` when nothing is stored under `id`.
    async fn get_datasource(&self, id: &DatasourceId) -> Result<DatasourceConfig>;

    /// Persist a datasource, encrypting its password.
    ///
    /// An empty password keeps the stored one.
    async fn save_datasource(&self, id: &DatasourceId, datasource: &DatasourceConfig)
        -> Result<()>;
}

/// Trait for scoped key-value settings (post meta)
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, scope: &str, key: &str) -> Result<Option<String>>;

    async fn set(&self, scope: &str, key: &str, value: &str) -> Result<()>;

    async fn delete(&self, scope: &str, key: &str) -> Result<()>;
}
