//! HTTP response building module
//!
//! Every response the gateway emits goes through here so the permissive
//! CORS headers and the `Server` header are always present.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Cross-origin headers attached to every response
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
];

fn base_builder(status: StatusCode, server_name: &str) -> hyper::http::response::Builder {
    CORS_HEADERS.iter().fold(
        Response::builder()
            .status(status)
            .header("Server", server_name),
        |builder, (name, value)| builder.header(*name, *value),
    )
}

/// Build a JSON response with the given status
pub fn build_json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    server_name: &str,
) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return fallback_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                br#"{"error":"Internal server error"}"#,
            );
        }
    };

    base_builder(status, server_name)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback_response(status, br#"{"error":"Internal server error"}"#)
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(server_name: &str) -> Response<Full<Bytes>> {
    base_builder(StatusCode::OK, server_name)
        .header("Access-Control-Max-Age", "86400")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            fallback_response(StatusCode::OK, b"")
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response(server_name: &str) -> Response<Full<Bytes>> {
    build_json_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        &serde_json::json!({ "error": "Payload too large" }),
        server_name,
    )
}

/// Last-resort response when the builder itself fails; still carries CORS
fn fallback_response(status: StatusCode, body: &'static [u8]) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body)));
    *response.status_mut() = status;
    for (name, value) in CORS_HEADERS {
        response
            .headers_mut()
            .insert(name, hyper::header::HeaderValue::from_static(value));
    }
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn assert_cors(response: &Response<Full<Bytes>>) {
        for (name, value) in CORS_HEADERS {
            assert_eq!(response.headers().get(name).unwrap(), value);
        }
    }

    #[tokio::test]
    async fn test_json_response() {
        let response = build_json_response(
            StatusCode::BAD_REQUEST,
            &serde_json::json!({ "error": "nope" }),
            "Test/1.0",
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers().get("Content-Type").unwrap(), "application/json");
        assert_eq!(response.headers().get("Server").unwrap(), "Test/1.0");
        assert_cors(&response);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"error":"nope"}"#);
    }

    #[test]
    fn test_options_response() {
        let response = build_options_response("Test/1.0");
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
    }

    #[test]
    fn test_fallback_keeps_cors() {
        let response = fallback_response(StatusCode::INTERNAL_SERVER_ERROR, b"{}");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
    }
}
