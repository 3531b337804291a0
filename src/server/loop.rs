// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::ShutdownSignal;
use crate::config::AppState;
use crate::logger;

/// How long in-flight connections get to finish after shutdown
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop on the current `LocalSet`.
///
/// Returns once `shutdown` fires and open connections have drained (or
/// the drain timeout expired).
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<ShutdownSignal>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.wait() => {
                logger::log_shutdown(shutdown.reason());
                break;
            }
        }
    }

    drop(listener);
    drain_connections(&active_connections).await;
}

async fn drain_connections(active_connections: &AtomicUsize) {
    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 {
            logger::log_info("All connections closed");
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Drain timeout reached with {remaining} connection(s) still open"
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_reusable_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Serve `request` on a fresh listener and return the raw response text
    async fn round_trip(cfg: Config, request: Vec<u8>) -> String {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let state = Arc::new(AppState::new(&cfg).unwrap());
                let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
                let addr = listener.local_addr().unwrap();
                let shutdown = Arc::new(ShutdownSignal::new());
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    state,
                    Arc::new(AtomicUsize::new(0)),
                    Arc::clone(&shutdown),
                ));

                let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
                stream.write_all(&request).await.unwrap();
                let mut raw = Vec::new();
                // The server may close as soon as it has answered
                let _ = stream.read_to_end(&mut raw).await;

                shutdown.trigger("test finished");
                server.await.unwrap();
                String::from_utf8_lossy(&raw).into_owned()
            })
            .await
    }

    /// A JSON POST sent as a single chunk, so no Content-Length header
    fn chunked_post(body: &str) -> Vec<u8> {
        format!(
            "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\n\
             Transfer-Encoding: chunked\r\nConnection: close\r\n\r\n{:x}\r\n{body}\r\n0\r\n\r\n",
            body.len()
        )
        .into_bytes()
    }

    #[tokio::test]
    async fn test_chunked_body_over_limit_rejected() {
        let mut cfg = Config::defaults().unwrap();
        cfg.http.max_body_size = 16;

        let body = format!(
            r#"{{"action":"save","file":"a.html","html":"{}"}}"#,
            "x".repeat(4000)
        );
        let text = round_trip(cfg, chunked_post(&body)).await;
        assert!(text.starts_with("HTTP/1.1 413"), "unexpected response: {text}");
        assert!(text.contains("Payload too large"));
    }

    #[tokio::test]
    async fn test_chunked_body_within_limit_served() {
        let cfg = Config::defaults().unwrap();
        let body = r#"{"action":"test"}"#;
        let text = round_trip(cfg, chunked_post(body)).await;
        assert!(text.starts_with("HTTP/1.1 200"), "unexpected response: {text}");
        assert!(text.contains("Test successful"));
    }

    #[tokio::test]
    async fn test_serves_request_then_stops_on_shutdown() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let cfg = Config::defaults().unwrap();
                let state = Arc::new(AppState::new(&cfg).unwrap());
                let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
                let addr = listener.local_addr().unwrap();
                let connections = Arc::new(AtomicUsize::new(0));
                let shutdown = Arc::new(ShutdownSignal::new());

                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    state,
                    Arc::clone(&connections),
                    Arc::clone(&shutdown),
                ));

                let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
                stream
                    .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
                    .await
                    .unwrap();
                let mut raw = Vec::new();
                stream.read_to_end(&mut raw).await.unwrap();
                let text = String::from_utf8_lossy(&raw);
                assert!(text.starts_with("HTTP/1.1 200"));
                assert!(text.contains("Builder save API is working!"));
                assert!(text.to_ascii_lowercase().contains("access-control-allow-origin: *"));

                shutdown.trigger("test finished");
                server.await.unwrap();
                assert_eq!(connections.load(Ordering::SeqCst), 0);
            })
            .await;
    }
}
