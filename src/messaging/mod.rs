//! Asynchronous message path.
//!
//! # Data Flow
//! ```text
//! TCP connection (line framed)
//!     → listener.rs (bounded accept, read one payload per line)
//!     → handler.rs (accept or execute payload)
//!     → "+OK" / "-ERR <message>" written back
//! ```

pub mod handler;
pub mod listener;

pub use handler::{MessageError, MessageHandler, MessageMode};
pub use listener::MessageListener;
