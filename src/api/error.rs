// API error taxonomy
// Every failure ends up as a JSON body; nothing is retried server-side

use hyper::StatusCode;
use serde_json::{json, Value};

use super::oembed::FetchError;
use super::types::timestamp;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required field is missing or empty
    #[error("{0}")]
    Validation(&'static str),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Invalid action: {0}")]
    UnknownAction(String),
    /// The oEmbed lookup failed in transport or decoding
    #[error("Failed to fetch oEmbed data")]
    Upstream(#[source] FetchError),
    /// Anything else that went wrong while processing the body
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UnknownAction(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body sent to the caller
    pub fn body(&self) -> Value {
        match self {
            Self::Internal(message) => json!({
                "error": "Internal server error",
                "message": message,
                "timestamp": timestamp(),
            }),
            other => json!({ "error": other.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UnknownAction("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_body_carries_message_and_timestamp() {
        let body = ApiError::Internal("expected value at line 1".into()).body();
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["message"], "expected value at line 1");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_upstream_body_is_generic() {
        let err = ApiError::Upstream(FetchError::Endpoint(
            url::Url::parse("not a url").unwrap_err(),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body(), json!({ "error": "Failed to fetch oEmbed data" }));
    }
}
