//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits, connection IDs)
//!     → Hand off to the message transport
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - Each connection holds a permit for its whole lifetime

pub mod listener;

pub use listener::{ConnectionId, ConnectionPermit, Listener, ListenerError};
