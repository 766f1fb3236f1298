//! Configuration structures
//!
//! Every section has serde defaults so partial JSON/TOML files load.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_VERSION, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOG_LEVEL, DEFAULT_PROTOCOL,
};

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub encryption: EncryptionConfig,
    #[serde(default)]
    pub data_api: DataApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Key material for datasource passwords at rest.
///
/// `key` is used byte-for-byte and must be 32 bytes long. `iv_hex` is the
/// hex encoding of the 12-byte GCM nonce.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct EncryptionConfig {
    #[serde(skip_serializing)]
    pub key: String,
    pub iv_hex: String,
}

impl std::fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("key", &"[REDACTED]")
            .field("iv_hex", &self.iv_hex)
            .finish()
    }
}

/// Data API client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataApiConfig {
    /// Path segment after `/fmi/data/`, e.g. `vLatest` or `v2`.
    pub api_version: String,
    /// `https` in production. Ignored for `localhost`, which always uses
    /// plain HTTP on port 3000.
    pub protocol: String,
    pub timeout_secs: u64,
    /// FileMaker Server installs frequently use self-signed certificates.
    pub accept_invalid_certs: bool,
    pub user_agent: Option<String>,
}

impl Default for DataApiConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            protocol: DEFAULT_PROTOCOL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            accept_invalid_certs: false,
            user_agent: None,
        }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}
