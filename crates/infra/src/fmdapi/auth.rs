//! Credentials for the `sessions` endpoint

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fmbridge_core::CloudTokenProvider;
use fmbridge_domain::{DatasourceConfig, Driver, DriverError, DriverResult, SecretString};
use reqwest::header::HeaderValue;

/// `Authorization` value used to open a session.
///
/// FileMaker Server takes HTTP Basic credentials. FileMaker Cloud takes an
/// FMID token obtained from the stored refresh token, which lives in the
/// password field.
pub(crate) async fn session_authorization(
    datasource: &DatasourceConfig,
    driver: Driver,
    cloud_tokens: Option<&dyn CloudTokenProvider>,
) -> DriverResult<SecretString> {
    match driver {
        Driver::FileMakerServer => Ok(basic_authorization(datasource)),
        Driver::FileMakerCloud => {
            let provider = cloud_tokens.ok_or_else(|| {
                DriverError::Authentication("No FileMaker Cloud token provider is set.".into())
            })?;
            let token = provider.fmid_token(&datasource.password).await?;
            if token.is_empty() {
                return Err(DriverError::Authentication(
                    "FileMaker Cloud returned an empty token.".into(),
                ));
            }
            Ok(SecretString::new(format!("FMID {}", token.expose())))
        }
    }
}

fn basic_authorization(datasource: &DatasourceConfig) -> SecretString {
    let credentials = SecretString::new(format!(
        "{}:{}",
        datasource.username,
        datasource.password.expose()
    ));
    SecretString::new(format!("Basic {}", STANDARD.encode(credentials.expose())))
}

/// `Authorization: Bearer {token}` for data requests.
pub(crate) fn bearer(token: &SecretString) -> DriverResult<HeaderValue> {
    header_value(&SecretString::new(format!("Bearer {}", token.expose())))
}

/// Header value hidden from `Debug` output.
pub(crate) fn header_value(secret: &SecretString) -> DriverResult<HeaderValue> {
    let mut value = HeaderValue::from_str(secret.expose()).map_err(|_| {
        DriverError::Authentication("Credentials contain invalid header characters.".into())
    })?;
    value.set_sensitive(true);
    Ok(value)
}
