//! In-memory settings store

use std::collections::HashMap;

use async_trait::async_trait;
use fmbridge_core::SettingsStore;
use fmbridge_domain::Result;
use parking_lot::RwLock;

/// Scoped key-value settings held in memory.
///
/// Reference adapter for hosts without their own meta storage, and the
/// test double for [`super::SettingsCredentialStore`].
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    values: RwLock<HashMap<(String, String), String>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, scope: &str, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().get(&(scope.to_string(), key.to_string())).cloned())
    }

    async fn set(&self, scope: &str, key: &str, value: &str) -> Result<()> {
        self.values.write().insert((scope.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    async fn delete(&self, scope: &str, key: &str) -> Result<()> {
        self.values.write().remove(&(scope.to_string(), key.to_string()));
        Ok(())
    }
}
