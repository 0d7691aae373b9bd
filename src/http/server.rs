//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all handler
//! - Wire up middleware (tracing, timeout, request ID, in-flight limit)
//! - Adapt axum requests into classifier input
//! - Render classifier directives and dispatcher output
//! - Observability (metrics, request IDs)

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, Request, State},
    http::{request::Parts, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::classifier::{classify, InboundRequest, OutcomeDirective};
use crate::http::dispatcher::Dispatcher;
use crate::lifecycle::shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    /// Lowercase header names dropped before classification.
    pub ignored_headers: Arc<HashSet<String>>,
}

/// HTTP transport for the synchronous path.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around an already built dispatcher.
    pub fn new(dispatcher: Dispatcher, config: &GatewayConfig) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            ignored_headers: Arc::new(
                config
                    .http
                    .ignored_headers
                    .iter()
                    .map(|h| h.to_ascii_lowercase())
                    .collect(),
            ),
        };

        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let in_flight = Arc::new(Semaphore::new(config.listener.max_connections));

        Router::new()
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.http.max_body_bytes))
            .layer(middleware::from_fn_with_state(in_flight, limit_in_flight))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// A clone of the fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until the shutdown broadcast fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Reject requests once `max_connections` are in flight.
async fn limit_in_flight(
    State(limit): State<Arc<Semaphore>>,
    request: Request,
    next: Next,
) -> Response {
    match limit.try_acquire() {
        Ok(_permit) => next.run(request).await,
        Err(_) => {
            tracing::warn!("In-flight request limit reached");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// Main handler: adapt, classify, answer.
async fn gateway_handler(
    State(state): State<AppState>,
    parts: Parts,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start_time = Instant::now();

    let request_id = parts
        .headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = parts.method.to_string();

    let body = match body {
        Ok(bytes) => bytes,
        Err(rejection) => {
            let status = body_rejection_status(&rejection);
            tracing::warn!(request_id = %request_id, status = %status, error = %rejection, "Failed to read request body");
            metrics::record_request(&method, status.as_u16(), "rejected", start_time);
            return status.into_response();
        }
    };

    let inbound = to_inbound(&parts, body.to_vec(), &state.ignored_headers);
    let directive = classify(&inbound);
    let label = directive.label();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %inbound.path,
        directive = label,
        "Classified request"
    );

    let response = match directive {
        OutcomeDirective::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED.into_response(),
        OutcomeDirective::NotFound => StatusCode::NOT_FOUND.into_response(),
        OutcomeDirective::BadRequest => StatusCode::BAD_REQUEST.into_response(),
        OutcomeDirective::FixedReply(reply) => {
            (reply.status, [reply.header], reply.body).into_response()
        }
        OutcomeDirective::Dispatch(body) => dispatch(&state.dispatcher, body, &request_id),
    };

    metrics::record_request(&method, response.status().as_u16(), label, start_time);
    response
}

/// 413 for bodies over the limit, 400 for any other body failure.
fn body_rejection_status(rejection: &BytesRejection) -> StatusCode {
    match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn dispatch(dispatcher: &Dispatcher, body: &[u8], request_id: &str) -> Response {
    let outcome = dispatcher.dispatch(body);

    match &outcome.verb {
        Some(verb) => {
            let known = dispatcher.executor().registry().contains(verb);
            let verb_label = if known { verb.as_str() } else { "unknown" };
            if outcome.status.is_success() {
                metrics::record_command(verb_label, "ok");
            } else {
                tracing::warn!(
                    request_id = %request_id,
                    verb = %verb,
                    error = %outcome.body.trim_end(),
                    "Command failed"
                );
                metrics::record_command(verb_label, "error");
            }
        }
        None => {
            tracing::warn!(request_id = %request_id, "Command body rejected");
            metrics::record_command("none", "rejected");
        }
    }

    if outcome.body.is_empty() {
        outcome.status.into_response()
    } else {
        (outcome.status, outcome.body).into_response()
    }
}

/// Build classifier input from request parts.
fn to_inbound(parts: &Parts, body: Vec<u8>, ignored: &HashSet<String>) -> InboundRequest {
    let mut inbound = InboundRequest::new(parts.method.as_str(), parts.uri.path()).body(body);

    for (name, value) in parts.headers.iter() {
        if ignored.contains(name.as_str()) {
            continue;
        }
        inbound = inbound.header(
            canonical_header_key(name.as_str()),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }

    inbound
}

/// `content-type` → `Content-Type`.
pub fn canonical_header_key(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
