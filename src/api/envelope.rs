// Response envelope decoding
// Every backend endpoint wraps its payload in {success, data, message, error}.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<ErrorBody>,
}

/// Error detail the backend attaches to failed responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
}

/// Decode a response body into the envelope's `data` payload.
pub fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> ApiResult<T> {
    if !status.is_success() {
        return Err(error_from_body(status, body));
    }

    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| ApiError::UnexpectedShape(format!("invalid response body: {e}")))?;

    if !envelope.success {
        let (code, message) = envelope_failure(&envelope);
        return Err(ApiError::from_status(status.as_u16(), code, message));
    }

    envelope
        .data
        .ok_or_else(|| ApiError::UnexpectedShape("envelope missing `data`".to_string()))
}

/// Decode a response where the caller does not need the payload (deletes,
/// status patches). Tolerates an empty body on 2xx.
pub fn decode_unit(status: StatusCode, body: &str) -> ApiResult<()> {
    if !status.is_success() {
        return Err(error_from_body(status, body));
    }

    if body.trim().is_empty() {
        return Ok(());
    }

    let envelope: Envelope<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| ApiError::UnexpectedShape(format!("invalid response body: {e}")))?;

    if !envelope.success {
        let (code, message) = envelope_failure(&envelope);
        return Err(ApiError::from_status(status.as_u16(), code, message));
    }

    Ok(())
}

fn envelope_failure<T>(envelope: &Envelope<T>) -> (Option<String>, String) {
    let code = envelope.error.as_ref().and_then(|e| e.code.clone());
    let message = envelope
        .error
        .as_ref()
        .and_then(|e| e.message.clone())
        .or_else(|| envelope.message.clone())
        .unwrap_or_else(|| "request failed".to_string());
    (code, message)
}

fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    // Failed responses usually still carry the envelope; fall back to the raw
    // body when they don't.
    match serde_json::from_str::<Envelope<serde_json::Value>>(body) {
        Ok(envelope) => {
            let (code, message) = envelope_failure(&envelope);
            ApiError::from_status(status.as_u16(), code, message)
        }
        Err(_) => {
            let message = if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body.chars().take(200).collect()
            };
            ApiError::from_status(status.as_u16(), None, message)
        }
    }
}
