//! Datasource connection parameters and Data API sessions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::CLOUD_HOST_SUFFIX;
use crate::errors::DriverError;
use crate::types::secret::SecretString;

/// Identifier of a stored datasource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasourceId(String);

impl DatasourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DatasourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DatasourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Authentication flavour for the sessions endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Driver {
    /// On-premise FileMaker Server, HTTP Basic credentials.
    #[default]
    FileMakerServer,
    /// FileMaker Cloud, FMID token derived from a refresh token.
    FileMakerCloud,
}

impl Driver {
    /// Stable id used in stored settings.
    pub fn as_id(&self) -> &'static str {
        match self {
            Self::FileMakerServer => "1",
            Self::FileMakerCloud => "2",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            "1" => Some(Self::FileMakerServer),
            "2" => Some(Self::FileMakerCloud),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FileMakerServer => "FileMaker Server",
            Self::FileMakerCloud => "FileMaker Cloud",
        }
    }

    /// Driver actually used for `server`.
    ///
    /// Hosts under the FileMaker Cloud account domain always use the cloud
    /// driver, whatever was configured.
    pub fn resolve(server: &str, configured: Driver) -> Driver {
        if is_cloud_host(server) {
            Driver::FileMakerCloud
        } else {
            configured
        }
    }
}

fn is_cloud_host(server: &str) -> bool {
    let host = server
        .split_once("://")
        .map_or(server, |(_, rest)| rest)
        .split(['/', ':'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    host.ends_with(CLOUD_HOST_SUFFIX)
}

/// Connection parameters of one datasource
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatasourceConfig {
    pub server: String,
    pub database: String,
    pub username: String,
    pub password: SecretString,
    pub driver: Driver,
}

impl DatasourceConfig {
    pub fn new(
        server: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            server: server.into(),
            database: database.into(),
            username: username.into(),
            password: password.into(),
            driver: Driver::default(),
        }
    }

    pub fn with_driver(mut self, driver: Driver) -> Self {
        self.driver = driver;
        self
    }

    /// True when both server and database are set.
    pub fn is_complete(&self) -> bool {
        !self.server.trim().is_empty() && !self.database.trim().is_empty()
    }

    pub fn validate(&self) -> Result<(), DriverError> {
        if self.server.trim().is_empty() {
            return Err(DriverError::configuration("Server is not configured."));
        }
        if self.database.trim().is_empty() {
            return Err(DriverError::configuration("Database is not configured."));
        }
        Ok(())
    }

    pub fn resolved_driver(&self) -> Driver {
        Driver::resolve(&self.server, self.driver)
    }

    /// Session cache key: the URL-encoded database name.
    pub fn session_key(&self) -> String {
        session_key(&self.database)
    }
}

/// URL-encoded, trimmed database name, matching the database in the base URI.
pub fn session_key(database: &str) -> String {
    urlencoding::encode(database.trim()).into_owned()
}

/// Authenticated Data API session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub datasource_key: String,
    pub token: SecretString,
    pub obtained_at: DateTime<Utc>,
}

impl Session {
    pub fn new(datasource_key: impl Into<String>, token: impl Into<SecretString>) -> Self {
        Self {
            datasource_key: datasource_key.into(),
            token: token.into(),
            obtained_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_hosts_override_configured_driver() {
        assert_eq!(
            Driver::resolve("acme.account.filemaker-cloud.com", Driver::FileMakerServer),
            Driver::FileMakerCloud
        );
        assert_eq!(
            Driver::resolve("https://Acme.Account.FileMaker-Cloud.com/", Driver::FileMakerServer),
            Driver::FileMakerCloud
        );
        assert_eq!(
            Driver::resolve("fms.example.com", Driver::FileMakerServer),
            Driver::FileMakerServer
        );
        assert_eq!(
            Driver::resolve("fms.example.com", Driver::FileMakerCloud),
            Driver::FileMakerCloud
        );
    }

    #[test]
    fn driver_ids_are_stable() {
        assert_eq!(Driver::FileMakerServer.as_id(), "1");
        assert_eq!(Driver::FileMakerCloud.as_id(), "2");
        assert_eq!(Driver::from_id("2"), Some(Driver::FileMakerCloud));
        assert_eq!(Driver::from_id("9"), None);
    }

    #[test]
    fn validate_rejects_missing_server_or_database() {
        let missing_server = DatasourceConfig::new("", "Contacts", "admin", "pw");
        let missing_db = DatasourceConfig::new("fms.example.com", " ", "admin", "pw");
        let ok = DatasourceConfig::new("fms.example.com", "Contacts", "admin", "pw");

        assert!(missing_server.validate().unwrap_err().is_configuration());
        assert!(missing_db.validate().unwrap_err().is_configuration());
        assert!(!missing_db.is_complete());
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn session_key_is_url_encoded_database() {
        let ds = DatasourceConfig::new("fms.example.com", "My Contacts", "admin", "pw");
        assert_eq!(ds.session_key(), "My%20Contacts");
    }

    #[test]
    fn session_key_ignores_surrounding_whitespace() {
        let padded = DatasourceConfig::new("fms.example.com", " Contacts ", "admin", "pw");
        let plain = DatasourceConfig::new("fms.example.com", "Contacts", "admin", "pw");
        assert_eq!(padded.session_key(), plain.session_key());
    }

    #[test]
    fn password_is_redacted_in_debug() {
        let ds = DatasourceConfig::new("fms.example.com", "Contacts", "admin", "s3cret");
        let rendered = format!("{ds:?}");
        assert!(!rendered.contains("s3cret"));
    }
}
