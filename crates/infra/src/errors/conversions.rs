//! Conversions from external infrastructure errors into domain errors.

use fmbridge_common::CommonError;
use fmbridge_domain::{DriverError, FmBridgeError};
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FmBridgeError);

impl From<InfraError> for FmBridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FmBridgeError> for InfraError {
    fn from(value: FmBridgeError) -> Self {
        InfraError(value)
    }
}

impl From<DriverError> for InfraError {
    fn from(value: DriverError) -> Self {
        InfraError(FmBridgeError::Driver(value))
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFmBridgeError {
    fn into_fmbridge(self) -> FmBridgeError;
}

/* -------------------------------------------------------------------------- */
/* CommonError → FmBridgeError */
/* -------------------------------------------------------------------------- */

impl IntoFmBridgeError for CommonError {
    fn into_fmbridge(self) -> FmBridgeError {
        match self {
            CommonError::Config { .. } | CommonError::Validation { .. } => {
                FmBridgeError::Config(self.to_string())
            }
            CommonError::Crypto(message) => FmBridgeError::Crypto(message),
            // Stored ciphertext that is not valid base64 or UTF-8.
            CommonError::Serialization { .. } => FmBridgeError::Crypto(self.to_string()),
        }
    }
}

impl From<CommonError> for InfraError {
    fn from(value: CommonError) -> Self {
        InfraError(value.into_fmbridge())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DriverError */
/* -------------------------------------------------------------------------- */

/// Transport-level failure of a Data API request.
///
/// Status errors never reach this path: non-200 responses are read and
/// translated from their envelope instead.
pub(crate) fn transport_error(err: &HttpError) -> DriverError {
    if err.is_timeout() {
        return DriverError::transport("HTTP request timed out");
    }

    if err.is_connect() {
        return DriverError::transport(format!("HTTP connection failure: {err}"));
    }

    if err.is_builder() {
        return DriverError::configuration(format!("Invalid request: {err}"));
    }

    if err.is_body() || err.is_decode() {
        return DriverError::transport(format!("Could not read response body: {err}"));
    }

    DriverError::transport(err.to_string())
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(FmBridgeError::Driver(transport_error(&value)))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
