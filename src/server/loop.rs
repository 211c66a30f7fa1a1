// Server loop module
// Accepts connections until shutdown is requested

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Accept loop for the service listener
///
/// Must run inside a `LocalSet`; connections are served with `spawn_local`.
/// Once `shutdown` is notified the listener stops accepting, open
/// connections are asked to close after their in-flight request, and the
/// loop returns when they are gone or the drain timeout runs out.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let (drain_tx, drain_rx) = watch::channel(false);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            drain_rx.clone(),
                        );
                    }
                    Err(e) => {
                        state.log.error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                drop(listener);
                logger::log_shutdown(
                    state.log.as_ref(),
                    active_connections.load(Ordering::SeqCst),
                );
                drain_tx.send_replace(true);
                wait_for_drain(&state, &active_connections).await;
                return Ok(());
            }
        }
    }
}

/// Wait until every connection task has ended, bounded by the connection timeout
async fn wait_for_drain(state: &AppState, active_connections: &AtomicUsize) {
    let performance = &state.config.performance;
    let limit = Duration::from_secs(performance.read_timeout.max(performance.write_timeout));
    let deadline = tokio::time::Instant::now() + limit;

    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_drain_timeout(
                state.log.as_ref(),
                active_connections.load(Ordering::SeqCst),
            );
            return;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, EnvOverrides};
    use crate::logger::capture::CaptureLog;
    use crate::logger::Level;
    use crate::server::create_reusable_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn raw_get(addr: std::net::SocketAddr, target: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request =
            format!("GET {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_requests_over_tcp() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
                let addr = listener.local_addr().unwrap();
                let log = Arc::new(CaptureLog::default());
                let config = Config::load_with(None, &EnvOverrides::default()).unwrap();
                let state = Arc::new(AppState::new(config, log.clone()));
                let shutdown = Arc::new(Notify::new());

                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    state,
                    Arc::clone(&shutdown),
                ));

                let ok = raw_get(addr, "/add?n1=2&n2=3").await;
                assert!(ok.starts_with("HTTP/1.1 200"), "{ok}");
                assert!(ok.contains("application/json"), "{ok}");
                assert!(ok.ends_with(r#"{"statuscode":200,"data":5}"#), "{ok}");

                let bad = raw_get(addr, "/divide?n1=10&n2=0").await;
                assert!(bad.starts_with("HTTP/1.1 400"), "{bad}");
                assert!(bad.ends_with(r#"{"statuscode":400,"msg":"Division by zero"}"#));

                assert_eq!(log.count(Level::Info, "Incoming request"), 2);
                assert_eq!(log.count(Level::Info, "IP: 127.0.0.1"), 2);

                shutdown.notify_one();
                server.await.unwrap().unwrap();
                assert_eq!(log.count(Level::Info, "Shutdown requested"), 1);
            })
            .await;
    }

    #[tokio::test]
    async fn test_shutdown_closes_idle_keep_alive_connections() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
                let addr = listener.local_addr().unwrap();
                let log = Arc::new(CaptureLog::default());
                let config = Config::load_with(None, &EnvOverrides::default()).unwrap();
                let state = Arc::new(AppState::new(config, log.clone()));
                let shutdown = Arc::new(Notify::new());

                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    state,
                    Arc::clone(&shutdown),
                ));

                // Keep-alive request: the server holds the connection open afterwards
                let mut stream = TcpStream::connect(addr).await.unwrap();
                stream
                    .write_all(b"GET /add?n1=1&n2=1 HTTP/1.1\r\nHost: localhost\r\n\r\n")
                    .await
                    .unwrap();
                let expected = br#"{"statuscode":200,"data":2}"#;
                let mut received = Vec::new();
                let mut chunk = [0u8; 512];
                while !received.ends_with(expected) {
                    let n = stream.read(&mut chunk).await.unwrap();
                    assert_ne!(n, 0, "connection closed before the response");
                    received.extend_from_slice(&chunk[..n]);
                }

                shutdown.notify_one();

                // The idle connection is closed rather than abandoned
                let mut rest = Vec::new();
                stream.read_to_end(&mut rest).await.unwrap();
                assert!(rest.is_empty());

                server.await.unwrap().unwrap();
                assert_eq!(log.count(Level::Info, "1 connection(s) still finishing"), 1);
                assert_eq!(log.count(Level::Warn, "still open after"), 0);
            })
            .await;
    }
}
