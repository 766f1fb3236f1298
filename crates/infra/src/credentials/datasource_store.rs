//! Credential store over scoped settings
//!
//! Each datasource is a settings scope named after its id. The password is
//! stored as base64 AES-256-GCM ciphertext and decrypted on read.

use std::sync::Arc;

use async_trait::async_trait;
use fmbridge_common::Cipher;
use fmbridge_core::{CredentialStore, SettingsStore};
use fmbridge_domain::{
    DatasourceConfig, DatasourceId, Driver, FmBridgeError, Result, SecretString,
};
use tracing::{debug, warn};

use crate::errors::InfraError;

pub const META_SERVER: &str = "fmbridge_server";
pub const META_DATABASE: &str = "fmbridge_datasource";
pub const META_USERNAME: &str = "fmbridge_datasource_username";
pub const META_PASSWORD: &str = "fmbridge_datasource_password";
pub const META_DRIVER: &str = "fmbridge_driver";

/// [`CredentialStore`] backed by a [`SettingsStore`] and a [`Cipher`].
pub struct SettingsCredentialStore {
    settings: Arc<dyn SettingsStore>,
    cipher: Arc<dyn Cipher>,
}

impl SettingsCredentialStore {
    pub fn new(settings: Arc<dyn SettingsStore>, cipher: Arc<dyn Cipher>) -> Self {
        Self { settings, cipher }
    }

    async fn read(&self, scope: &str, key: &str) -> Result<Option<String>> {
        self.settings.get(scope, key).await
    }

    fn decrypt_password(&self, id: &DatasourceId, ciphertext: &str) -> Result<SecretString> {
        if ciphertext.is_empty() {
            return Ok(SecretString::default());
        }
        let plaintext = self.cipher.decrypt(ciphertext).map_err(|err| {
            warn!(datasource = %id, "Could not decrypt datasource password");
            FmBridgeError::from(InfraError::from(err))
        })?;
        Ok(SecretString::new(plaintext))
    }
}

#[async_trait]
impl CredentialStore for SettingsCredentialStore {
    async fn get_datasource(&self, id: &DatasourceId) -> Result<DatasourceConfig> {
        let scope = id.as_str();
        let server = self.read(scope, META_SERVER).await?;
        let database = self.read(scope, META_DATABASE).await?;
        let username = self.read(scope, META_USERNAME).await?;

        if server.is_none() && database.is_none() && username.is_none() {
            return Err(FmBridgeError::NotFound(format!("datasource {id}")));
        }

        let ciphertext = self.read(scope, META_PASSWORD).await?.unwrap_or_default();
        let password = self.decrypt_password(id, &ciphertext)?;
        let driver = self
            .read(scope, META_DRIVER)
            .await?
            .as_deref()
            .and_then(Driver::from_id)
            .unwrap_or_default();

        Ok(DatasourceConfig {
            server: server.unwrap_or_default(),
            database: database.unwrap_or_default(),
            username: username.unwrap_or_default(),
            password,
            driver,
        })
    }

    async fn save_datasource(
        &self,
        id: &DatasourceId,
        datasource: &DatasourceConfig,
    ) -> Result<()> {
        let scope = id.as_str();
        self.settings.set(scope, META_SERVER, datasource.server.trim()).await?;
        self.settings.set(scope, META_DATABASE, datasource.database.trim()).await?;
        self.settings.set(scope, META_USERNAME, datasource.username.trim()).await?;
        self.settings.set(scope, META_DRIVER, datasource.driver.as_id()).await?;

        if datasource.password.is_empty() {
            debug!(datasource = %id, "Empty password submitted, keeping stored one");
        } else {
            let ciphertext = self
                .cipher
                .encrypt(datasource.password.expose())
                .map_err(|err| FmBridgeError::from(InfraError::from(err)))?;
            self.settings.set(scope, META_PASSWORD, &ciphertext).await?;
        }

        debug!(datasource = %id, driver = datasource.driver.label(), "Saved datasource");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fmbridge_common::Aes256GcmCipher;

    use super::*;
    use crate::credentials::InMemorySettingsStore;

    const KEY: &str = "0123456789abcdef0123456789abcdef";
    const IV: &str = "000102030405060708090a0b";

    fn store() -> (SettingsCredentialStore, Arc<InMemorySettingsStore>) {
        let settings = Arc::new(InMemorySettingsStore::new());
        let cipher = Arc::new(Aes256GcmCipher::from_config(KEY, IV).unwrap());
        (SettingsCredentialStore::new(settings.clone(), cipher), settings)
    }

    #[tokio::test]
    async fn password_is_encrypted_at_rest() {
        let (store, settings) = store();
        let id = DatasourceId::new("7");
        let datasource = DatasourceConfig::new("fms.example.com", "Contacts", "web", "s3cret")
            .with_driver(Driver::FileMakerCloud);

        store.save_datasource(&id, &datasource).await.unwrap();

        let stored = settings.get("7", META_PASSWORD).await.unwrap().unwrap();
        assert_ne!(stored, "s3cret");
        assert_eq!(settings.get("7", META_DRIVER).await.unwrap().as_deref(), Some("2"));

        let loaded = store.get_datasource(&id).await.unwrap();
        assert_eq!(loaded, datasource);
    }

    #[tokio::test]
    async fn empty_password_keeps_stored_one() {
        let (store, _) = store();
        let id = DatasourceId::new("7");
        let first = DatasourceConfig::new("fms.example.com", "Contacts", "web", "pw");
        store.save_datasource(&id, &first).await.unwrap();

        let edited = DatasourceConfig::new("fms2.example.com", "Contacts", "web", "");
        store.save_datasource(&id, &edited).await.unwrap();

        let loaded = store.get_datasource(&id).await.unwrap();
        assert_eq!(loaded.server, "fms2.example.com");
        assert_eq!(loaded.password.expose(), "pw");
    }

    #[tokio::test]
    async fn unknown_datasource_is_not_found() {
        let (store, _) = store();

        let err = store.get_datasource(&DatasourceId::new("99")).await.unwrap_err();

        assert!(matches!(err, FmBridgeError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_password_reads_as_empty() {
        let (store, settings) = store();
        settings.set("3", META_SERVER, "fms.example.com").await.unwrap();
        settings.set("3", META_DATABASE, "Contacts").await.unwrap();

        let loaded = store.get_datasource(&DatasourceId::new("3")).await.unwrap();

        assert!(loaded.password.is_empty());
        assert_eq!(loaded.driver, Driver::FileMakerServer);
    }

    #[tokio::test]
    async fn tampered_ciphertext_is_a_crypto_error() {
        let (store, settings) = store();
        settings.set("3", META_SERVER, "fms.example.com").await.unwrap();
        settings.set("3", META_PASSWORD, "AAAAAAAAAAAAAAAAAAAAAAAA").await.unwrap();

        let err = store.get_datasource(&DatasourceId::new("3")).await.unwrap_err();

        assert!(matches!(err, FmBridgeError::Crypto(_)));
    }
}
