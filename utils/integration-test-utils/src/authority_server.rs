//! In-process HTTP stand-in for a tenant authorization authority.
//!
//! Binds an ephemeral port, answers every GET with one fixed status code,
//! and records the query parameters of each call. Readiness is polled rather
//! than slept on, and shutdown is graceful so servers don't linger between
//! tests.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

#[derive(Clone)]
struct AuthorityState {
    status: u16,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

/// Handle to a running mock authority.
pub struct MockAuthority {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl MockAuthority {
    /// The URL a tenant config entry should point at.
    pub fn url(&self) -> String {
        format!("http://{}/check", self.addr)
    }

    /// Query parameters of every call received so far, in arrival order.
    pub async fn recorded_queries(&self) -> Vec<HashMap<String, String>> {
        let requests = self.requests.lock().await;
        requests.clone()
    }

    /// Stops the server and waits for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

impl Drop for MockAuthority {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn check(
    State(state): State<AuthorityState>,
    Query(params): Query<HashMap<String, String>>,
) -> StatusCode {
    let mut requests = state.requests.lock().await;
    requests.push(params);
    StatusCode::from_u16(state.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn wait_for_listen(addr: SocketAddr) {
    let deadline = Instant::now() + Duration::from_secs(1);
    loop {
        match TcpStream::connect(addr).await {
            Ok(_) => return,
            Err(err) => {
                assert!(
                    Instant::now() < deadline,
                    "mock authority not ready at {addr}: {err}"
                );
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    }
}

/// Starts a mock authority on an ephemeral local port that answers every
/// check with `status`. Returns once the server is accepting connections.
pub async fn spawn_authority(status: u16) -> MockAuthority {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = AuthorityState {
        status,
        requests: requests.clone(),
    };
    let app = Router::new().route("/check", get(check)).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("mock authority should bind an ephemeral port");
    let addr = listener
        .local_addr()
        .expect("bound listener should report its address");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let serve = axum::serve(listener, app.into_make_service());
        let _ = serve
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    wait_for_listen(addr).await;
    MockAuthority {
        addr,
        requests,
        shutdown_tx: Some(shutdown_tx),
        task,
    }
}
