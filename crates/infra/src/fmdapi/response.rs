//! Response envelope translation
//!
//! Every Data API response carries `{"response": {...}, "messages": [...]}`.
//! A call succeeds only with HTTP 200 and a zero `messages[0].code`.

use fmbridge_domain::{
    code_to_i64, DriverError, DriverResult, HttpFailure, OperationResult, ServerFailure,
};
use reqwest::{Response, StatusCode};
use serde_json::Value;

use crate::errors::transport_error;

/// Read the body of `response` and translate it.
pub(crate) async fn read_response(response: Response) -> DriverResult<OperationResult> {
    let status = response.status();
    let body = response.text().await.map_err(|err| transport_error(&err))?;
    interpret(status, &body)
}

/// Translate a status and raw body into a result or a structured failure.
pub(crate) fn interpret(status: StatusCode, body: &str) -> DriverResult<OperationResult> {
    let envelope = serde_json::from_str::<Value>(body).ok();

    let http = (status != StatusCode::OK).then(|| {
        HttpFailure::new(status.as_u16(), status.canonical_reason().unwrap_or("Unknown Status"))
    });
    let server = envelope.as_ref().and_then(server_failure);

    if http.is_some() || server.is_some() {
        return Err(DriverError::response(http, server));
    }

    match envelope {
        Some(envelope) => Ok(OperationResult::from_envelope(status.as_u16(), &envelope)),
        None => Err(DriverError::InvalidResponse("response body is not JSON".into())),
    }
}

fn server_failure(envelope: &Value) -> Option<ServerFailure> {
    let first = envelope.pointer("/messages/0")?;
    let code = first.get("code").and_then(code_to_i64)?;
    if code <= 0 {
        return None;
    }

    let message = first.get("message").and_then(Value::as_str).unwrap_or_default();
    Some(ServerFailure::new(code, message))
}
