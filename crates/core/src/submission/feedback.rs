//! User-facing result of a form submission

use fmbridge_domain::{DriverError, FmBridgeError};
use serde::Serialize;

pub const TIMEOUT_MESSAGE: &str = "Timeout has occurred. Please try again.";
pub const GENERIC_ERROR_MESSAGE: &str =
    "An error has occurred. Please contact the system administrator.";

/// Status reported back to the form plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Record created and all uploads sent.
    MailSent,
    /// The form is not bound to a datasource.
    Skipped,
    /// FileMaker rejected the session; the visitor may resubmit.
    Invalid,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionFeedback {
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub error_codes: Vec<String>,
    #[serde(skip)]
    suppress_mail: bool,
}

impl SubmissionFeedback {
    pub fn sent(record_id: Option<String>) -> Self {
        Self {
            status: SubmissionStatus::MailSent,
            message: None,
            record_id,
            error_codes: Vec::new(),
            suppress_mail: false,
        }
    }

    pub fn skipped() -> Self {
        Self { status: SubmissionStatus::Skipped, ..Self::sent(None) }
    }

    /// The posted form arrived empty, typically because the request body
    /// exceeded the server's size limit.
    pub fn empty_submission() -> Self {
        Self {
            status: SubmissionStatus::Aborted,
            message: Some(GENERIC_ERROR_MESSAGE.to_string()),
            ..Self::sent(None)
        }
    }

    pub fn from_error(error: &FmBridgeError) -> Self {
        match error {
            FmBridgeError::Driver(driver) => Self::from_driver_error(driver),
            other => Self::aborted(vec![other.to_string()], Vec::new()),
        }
    }

    pub fn from_driver_error(error: &DriverError) -> Self {
        if error.is_session_timeout() {
            return Self {
                status: SubmissionStatus::Invalid,
                message: Some(TIMEOUT_MESSAGE.to_string()),
                record_id: None,
                error_codes: error.codes(),
                suppress_mail: true,
            };
        }
        Self::aborted(error.messages(), error.codes())
    }

    fn aborted(messages: Vec<String>, error_codes: Vec<String>) -> Self {
        Self {
            status: SubmissionStatus::Aborted,
            message: Some(format!("{GENERIC_ERROR_MESSAGE} {}", messages.join(" "))),
            record_id: None,
            error_codes,
            suppress_mail: true,
        }
    }

    pub(crate) fn with_suppressed_mail(mut self, suppress: bool) -> Self {
        self.suppress_mail |= suppress;
        self
    }

    /// True when notification mail must not be sent.
    pub fn skip_mail(&self) -> bool {
        self.suppress_mail
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, SubmissionStatus::Invalid | SubmissionStatus::Aborted)
    }
}
