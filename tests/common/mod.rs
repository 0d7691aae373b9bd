//! Shared utilities for integration tests.

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use command_gateway::net::Listener;
use command_gateway::settings::MemoryStore;
use command_gateway::{Gateway, GatewayConfig, Shutdown};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tower::ServiceExt;

/// A gateway serving on ephemeral local ports.
#[allow(dead_code)]
pub struct RunningGateway {
    pub http_addr: SocketAddr,
    pub message_addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), command_gateway::lifecycle::startup::StartupError>>,
}

/// Start a gateway with both transports bound to 127.0.0.1:0.
#[allow(dead_code)]
pub async fn start_gateway(config: GatewayConfig) -> RunningGateway {
    let gateway = Gateway::new(config);
    let store = gateway.store();

    let http = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let http_addr = http.local_addr().unwrap();
    let messages = Listener::bind("127.0.0.1:0", 16).await.unwrap();
    let message_addr = messages.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();
    let handle = tokio::spawn(async move {
        gateway
            .serve(http, Some(messages), &server_shutdown)
            .await
    });

    RunningGateway {
        http_addr,
        message_addr,
        store,
        shutdown,
        handle,
    }
}

/// In-process router for a gateway built from `config`.
#[allow(dead_code)]
pub fn router(config: GatewayConfig) -> Router {
    Gateway::new(config).http_server().router()
}

/// Drive one request through `router`.
#[allow(dead_code)]
pub async fn call(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

/// Send raw bytes to the message listener and read every reply until close.
#[allow(dead_code)]
pub async fn send_messages(addr: SocketAddr, input: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(input).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut out = String::new();
    stream.read_to_string(&mut out).await.unwrap();
    out
}

/// Write one raw HTTP/1.0 request and read the full response.
#[allow(dead_code)]
pub async fn raw_http(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut out = String::new();
    stream.read_to_string(&mut out).await.unwrap();
    out
}
