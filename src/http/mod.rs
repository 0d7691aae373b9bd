//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, header adaptation)
//!     → classifier.rs (pick one of the fixed outcome shapes)
//!     → dispatcher.rs (decode body, execute command) for `POST /`
//!     → server.rs renders the directive
//!     → Send to client
//! ```

pub mod classifier;
pub mod dispatcher;
pub mod server;

pub use classifier::{classify, InboundRequest, Method, OutcomeDirective};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use server::HttpServer;
