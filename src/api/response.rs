// API response utility functions module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::error::ApiError;
use super::types::{Reply, StatusReply};
use crate::http;

pub fn reply_response(reply: &Reply, server_name: &str) -> Response<Full<Bytes>> {
    http::build_json_response(StatusCode::OK, reply, server_name)
}

pub fn error_response(error: &ApiError, server_name: &str) -> Response<Full<Bytes>> {
    http::build_json_response(error.status(), &error.body(), server_name)
}

/// GET doubles as a liveness check for the editor
pub fn health_response(server_name: &str) -> Response<Full<Bytes>> {
    http::build_json_response(
        StatusCode::OK,
        &StatusReply::ok("Builder save API is working!"),
        server_name,
    )
}
