//! Configuration loader
//!
//! The environment wins when it carries the encryption key and IV. Without
//! them the first `config.{json,toml}` or `fmbridge.{json,toml}` found near
//! the working directory or the executable is read instead. Either way the
//! encryption material is checked before a [`Config`] is handed out.
//!
//! | Variable                         | Field                           |
//! |----------------------------------|---------------------------------|
//! | `FMBRIDGE_ENCRYPT_KEY`           | `encryption.key` (required)     |
//! | `FMBRIDGE_ENCRYPT_IV`            | `encryption.iv_hex` (required)  |
//! | `FMBRIDGE_API_VERSION`           | `data_api.api_version`          |
//! | `FMBRIDGE_PROTOCOL`              | `data_api.protocol`             |
//! | `FMBRIDGE_HTTP_TIMEOUT`          | `data_api.timeout_secs`         |
//! | `FMBRIDGE_ACCEPT_INVALID_CERTS`  | `data_api.accept_invalid_certs` |
//! | `FMBRIDGE_USER_AGENT`            | `data_api.user_agent`           |
//! | `FMBRIDGE_LOG_LEVEL`             | `logging.level`                 |
//! | `FMBRIDGE_LOG_JSON`              | `logging.json`                  |

use std::path::{Path, PathBuf};

use fmbridge_common::crypto::encryption::{parse_iv_hex, validate_key};
use fmbridge_common::CommonError;
use fmbridge_domain::{
    Config, DataApiConfig, EncryptionConfig, FmBridgeError, LoggingConfig, Result,
};
use tracing::{debug, info};

use crate::errors::InfraError;

const FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "fmbridge.json", "fmbridge.toml"];
const PARENT_FILE_NAMES: [&str; 2] = ["config.json", "config.toml"];

/// Environment first, then the first config file found.
///
/// # Errors
/// `FmBridgeError::Config` when neither source yields a configuration or the
/// encryption key or IV is malformed.
pub fn load() -> Result<Config> {
    let config = load_from_env().or_else(|env_err| {
        debug!(error = %env_err, "Environment incomplete, looking for a config file");
        load_from_file(None)
    })?;

    validate(&config)?;
    Ok(config)
}

/// Build a [`Config`] from `FMBRIDGE_*` variables.
///
/// Only the key and IV are required.
///
/// # Errors
/// `FmBridgeError::Config` when a required variable is unset or the timeout
/// is not a number.
pub fn load_from_env() -> Result<Config> {
    let encryption = EncryptionConfig {
        key: required_env("FMBRIDGE_ENCRYPT_KEY")?,
        iv_hex: required_env("FMBRIDGE_ENCRYPT_IV")?,
    };

    let api = DataApiConfig::default();
    let timeout_secs = match optional_env("FMBRIDGE_HTTP_TIMEOUT") {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| FmBridgeError::Config(format!("Invalid HTTP timeout '{raw}': {e}")))?,
        None => api.timeout_secs,
    };
    let data_api = DataApiConfig {
        api_version: optional_env("FMBRIDGE_API_VERSION").unwrap_or(api.api_version),
        protocol: optional_env("FMBRIDGE_PROTOCOL").unwrap_or(api.protocol),
        timeout_secs,
        accept_invalid_certs: flag_env("FMBRIDGE_ACCEPT_INVALID_CERTS")
            .unwrap_or(api.accept_invalid_certs),
        user_agent: optional_env("FMBRIDGE_USER_AGENT"),
    };

    let log = LoggingConfig::default();
    let logging = LoggingConfig {
        level: optional_env("FMBRIDGE_LOG_LEVEL").unwrap_or(log.level),
        json: flag_env("FMBRIDGE_LOG_JSON").unwrap_or(log.json),
    };

    info!("Configuration loaded from environment variables");
    Ok(Config { encryption, data_api, logging })
}

/// Read `path`, or the first file [`probe_config_paths`] finds when `None`.
///
/// The format follows the extension, JSON when there is none.
///
/// # Errors
/// `FmBridgeError::Config` when the file is missing, unreadable or does not
/// parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let path = match path {
        Some(path) if path.exists() => path,
        Some(path) => {
            return Err(FmBridgeError::Config(format!(
                "Config file not found: {}",
                path.display()
            )))
        }
        None => probe_config_paths().ok_or_else(|| {
            FmBridgeError::Config("No config file found next to the working directory".into())
        })?,
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        FmBridgeError::Config(format!("Could not read {}: {e}", path.display()))
    })?;

    let config = parse_config(&contents, &path)?;
    info!(path = %path.display(), "Configuration loaded from file");
    Ok(config)
}

/// Check the key length and IV encoding.
///
/// # Errors
/// `FmBridgeError::Config` naming the offending field.
pub fn validate(config: &Config) -> Result<()> {
    validate_key(&config.encryption.key).map_err(into_config_error)?;
    parse_iv_hex(&config.encryption.iv_hex).map_err(into_config_error)?;
    Ok(())
}

fn into_config_error(err: CommonError) -> FmBridgeError {
    InfraError::from(err).into()
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    match path.extension().and_then(|ext| ext.to_str()).unwrap_or("json") {
        "json" => serde_json::from_str(contents)
            .map_err(|e| FmBridgeError::Config(format!("Invalid JSON in config file: {e}"))),
        "toml" => toml::from_str(contents)
            .map_err(|e| FmBridgeError::Config(format!("Invalid TOML in config file: {e}"))),
        other => Err(FmBridgeError::Config(format!("Unsupported config format: .{other}"))),
    }
}

/// First existing config file under the working directory or the directory
/// of the running executable.
///
/// Each root is tried with all four file names, then its parent and
/// grandparent with `config.{json,toml}` only.
pub fn probe_config_paths() -> Option<PathBuf> {
    let exe_dir =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf));

    std::env::current_dir()
        .ok()
        .into_iter()
        .chain(exe_dir)
        .flat_map(|root| candidates(&root))
        .find(|path| path.is_file())
}

fn candidates(root: &Path) -> Vec<PathBuf> {
    let here = FILE_NAMES.iter().map(|name| root.join(name));
    let above = ["..", "../.."]
        .iter()
        .flat_map(|up| PARENT_FILE_NAMES.iter().map(move |name| root.join(up).join(name)));
    here.chain(above).collect()
}

fn required_env(key: &str) -> Result<String> {
    optional_env(key)
        .ok_or_else(|| FmBridgeError::Config(format!("Missing environment variable {key}")))
}

/// Trimmed value, `None` when unset or blank.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// `1`, `true`, `yes` and `on` are true; any other value is false.
fn flag_env(key: &str) -> Option<bool> {
    optional_env(key)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
