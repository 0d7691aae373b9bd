//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Transports (HTTP server, message listener) produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The command core never logs; transports own observability
//! - Request ID flows through every HTTP log line
//! - Metric calls are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
