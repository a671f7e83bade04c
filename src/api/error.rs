// API error taxonomy

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the REST client.
///
/// Server failures carry the code/message from the backend's error envelope
/// when one was sent; `UnexpectedShape` covers 2xx responses whose body is
/// missing the fields the contract promises.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Not authenticated: no stored session token")]
    NotAuthenticated,

    #[error("Unauthorized (401): {0}")]
    Unauthorized(String),

    #[error("Not found (404): {0}")]
    NotFound(String),

    #[error("Not implemented by the backend (501): {0}")]
    NotImplemented(String),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Session storage error: {0}")]
    Session(String),
}

impl ApiError {
    /// Map an HTTP status plus the backend's error body onto the taxonomy.
    pub fn from_status(status: u16, code: Option<String>, message: String) -> Self {
        match status {
            401 => ApiError::Unauthorized(message),
            404 => ApiError::NotFound(message),
            501 => ApiError::NotImplemented(message),
            _ => ApiError::Http {
                status,
                code,
                message,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            ApiError::from_status(401, None, "bad credentials".into()),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_status(404, None, "missing".into()),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(501, None, "export".into()),
            ApiError::NotImplemented(_)
        ));
        match ApiError::from_status(422, Some("VALIDATION".into()), "bad date".into()) {
            ApiError::Http { status, code, .. } => {
                assert_eq!(status, 422);
                assert_eq!(code.as_deref(), Some("VALIDATION"));
            }
            other => panic!("expected Http, got {other:?}"),
        }
    }
}
