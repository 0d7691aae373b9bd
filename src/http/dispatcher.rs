//! Synchronous command dispatch: body → executor → status and body text.

use axum::http::StatusCode;

use crate::command::{CommandError, CommandInvocation, Executor};

/// What the dispatcher produced for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub status: StatusCode,
    pub body: String,
    /// Verb that was executed, if the body decoded to a non-empty sequence.
    pub verb: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    executor: Executor,
}

impl Dispatcher {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Decode `body` and run it.
    ///
    /// Decode failures answer 500 with an empty body. Command failures answer
    /// 500 with the error message and a trailing newline.
    pub fn dispatch(&self, body: &[u8]) -> DispatchOutcome {
        let invocation = match CommandInvocation::decode(body) {
            Ok(invocation) => invocation,
            Err(_) => {
                return DispatchOutcome {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: String::new(),
                    verb: None,
                }
            }
        };

        let verb = invocation.verb().map(str::to_string);
        match self.executor.execute(&invocation) {
            Ok(()) => DispatchOutcome {
                status: StatusCode::OK,
                body: String::new(),
                verb,
            },
            Err(e) => DispatchOutcome {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: failure_body(&e),
                verb,
            },
        }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }
}

fn failure_body(error: &CommandError) -> String {
    format!("{error}\n")
}
