// API module entry
// Action dispatcher: OPTIONS/GET/POST handling and per-request access logging

pub mod action;
pub mod error;
mod handlers;
pub mod oembed;
mod payload;
mod response;
mod template;
pub mod types;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};

pub use action::Action;
pub use error::ApiError;

/// Shown when a request names no action at all
const MISSING_ACTION: &str = "(missing)";

/// Outcome of one dispatched request
pub struct Dispatched {
    pub response: Response<Full<Bytes>>,
    /// Action name as sent by the client, if any
    pub action: Option<String>,
}

/// Connection-level entry point
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.referer = header_string(&req, "referer");
    entry.user_agent = header_string(&req, "user-agent");

    let server_name = state.config.http.server_name.clone();
    let dispatched = if let Some(resp) =
        check_body_size(&req, state.config.http.max_body_size, &server_name)
    {
        Dispatched {
            response: resp,
            action: None,
        }
    } else {
        let method = req.method().clone();
        let query = req.uri().query().map(ToString::to_string);
        let content_type = header_string(&req, "content-type");

        match read_body(req.into_body(), state.config.http.max_body_size).await {
            Ok(body) => {
                dispatch(
                    &state,
                    &method,
                    query.as_deref(),
                    content_type.as_deref(),
                    &body,
                )
                .await
            }
            Err(e @ BodyError::TooLarge(_)) => {
                logger::log_error(&e.to_string());
                Dispatched {
                    response: http::build_413_response(&server_name),
                    action: None,
                }
            }
            Err(e @ BodyError::Read(_)) => {
                logger::log_error(&e.to_string());
                Dispatched {
                    response: response::error_response(
                        &ApiError::Internal(e.to_string()),
                        &server_name,
                    ),
                    action: None,
                }
            }
        }
    };

    if state.access_log_enabled() {
        entry.action = dispatched.action;
        entry.status = dispatched.response.status().as_u16();
        entry.body_bytes = dispatched
            .response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(dispatched.response)
}

/// Route an already-read request; never fails, errors become JSON bodies
pub async fn dispatch(
    state: &AppState,
    method: &Method,
    query: Option<&str>,
    content_type: Option<&str>,
    body: &[u8],
) -> Dispatched {
    let server_name = state.config.http.server_name.as_str();

    match *method {
        Method::OPTIONS => Dispatched {
            response: http::build_options_response(server_name),
            action: None,
        },
        Method::GET => Dispatched {
            response: response::health_response(server_name),
            action: None,
        },
        Method::POST => dispatch_post(state, query, content_type, body).await,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Dispatched {
                response: response::error_response(&ApiError::MethodNotAllowed, server_name),
                action: None,
            }
        }
    }
}

async fn dispatch_post(
    state: &AppState,
    query: Option<&str>,
    content_type: Option<&str>,
    body: &[u8],
) -> Dispatched {
    let server_name = state.config.http.server_name.as_str();
    let query = payload::parse_query(query);

    let request = match payload::parse_body(content_type, body) {
        Ok(request) => request,
        Err(e) => {
            logger::log_error(&format!("Server error: {e}"));
            return Dispatched {
                response: response::error_response(&e, server_name),
                action: None,
            };
        }
    };

    let action_name = request.action.clone().or_else(|| query.action.clone());
    logger::log_debug(&format!(
        "API called with action: {}",
        action_name.as_deref().unwrap_or(MISSING_ACTION)
    ));

    let result = match action_name.as_deref().unwrap_or(MISSING_ACTION).parse::<Action>() {
        Ok(action) => {
            handlers::dispatch_action(action, &request, &query, state.oembed.as_ref()).await
        }
        Err(e) => Err(e),
    };

    let response = match result {
        Ok(reply) => response::reply_response(&reply, server_name),
        Err(e) => response::error_response(&e, server_name),
    };

    Dispatched {
        response,
        action: action_name,
    }
}

#[derive(Debug, thiserror::Error)]
enum BodyError {
    #[error("Request body exceeds {0} bytes")]
    TooLarge(u64),
    #[error("Failed to read request body: {0}")]
    Read(String),
}

/// Buffer a request body, giving up once more than `max_body_size` bytes arrive
///
/// Covers bodies without a `Content-Length`, such as chunked uploads.
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, BodyError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(BodyError::TooLarge(max_body_size))
        }
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(
    req: &Request<B>,
    max_body_size: u64,
    server_name: &str,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response(server_name))
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}
