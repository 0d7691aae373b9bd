//! Request classification.
//!
//! # Rules (first match wins)
//! ```text
//! method != POST                 → MethodNotAllowed
//! path == "/"                    → Dispatch(body)
//! path != "/foo"                 → NotFound
//! headers != exactly {Foo: bar}  → BadRequest
//! otherwise                      → FixedReply (200, lorem: ipsum, "dolor sit amet")
//! ```
//!
//! # Design Decisions
//! - Header names are compared exactly as delivered by the transport
//! - The header check is a closed allow-list: any extra header is rejected
//! - Pure function of the request, no I/O

use axum::http::StatusCode;
use std::collections::BTreeMap;

/// Path whose body is decoded and executed as a command.
pub const DISPATCH_PATH: &str = "/";
/// Path answered with the fixed reply.
pub const FIXED_REPLY_PATH: &str = "/foo";

const FIXED_REPLY_HEADER: &str = "Foo";
const FIXED_REPLY_VALUE: &str = "bar";

/// Request method as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other(String),
}

impl From<&str> for Method {
    fn from(method: &str) -> Self {
        match method {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        }
    }
}

/// A synchronous request handed over by the transport.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    /// Header name → values, in the order received.
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: Vec<u8>,
}

impl InboundRequest {
    pub fn new(method: impl Into<Method>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    /// Append a header value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// The canned answer for a well-formed `/foo` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedReply {
    pub status: StatusCode,
    pub header: (&'static str, &'static str),
    pub body: &'static str,
}

pub const FIXED_REPLY: FixedReply = FixedReply {
    status: StatusCode::OK,
    header: ("lorem", "ipsum"),
    body: "dolor sit amet",
};

/// How a request should be answered, decided before any command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeDirective<'a> {
    MethodNotAllowed,
    Dispatch(&'a [u8]),
    NotFound,
    BadRequest,
    FixedReply(FixedReply),
}

impl OutcomeDirective<'_> {
    /// Metric/log label.
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeDirective::MethodNotAllowed => "method_not_allowed",
            OutcomeDirective::Dispatch(_) => "dispatch",
            OutcomeDirective::NotFound => "not_found",
            OutcomeDirective::BadRequest => "bad_request",
            OutcomeDirective::FixedReply(_) => "fixed_reply",
        }
    }
}

pub fn classify(request: &InboundRequest) -> OutcomeDirective<'_> {
    if request.method != Method::Post {
        return OutcomeDirective::MethodNotAllowed;
    }
    if request.path == DISPATCH_PATH {
        return OutcomeDirective::Dispatch(&request.body);
    }
    if request.path != FIXED_REPLY_PATH {
        return OutcomeDirective::NotFound;
    }
    if !has_only_foo_header(&request.headers) {
        return OutcomeDirective::BadRequest;
    }
    OutcomeDirective::FixedReply(FIXED_REPLY)
}

fn has_only_foo_header(headers: &BTreeMap<String, Vec<String>>) -> bool {
    headers.len() == 1
        && matches!(headers.get(FIXED_REPLY_HEADER), Some(values) if values.len() == 1 && values[0] == FIXED_REPLY_VALUE)
}
