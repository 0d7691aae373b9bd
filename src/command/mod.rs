//! Command execution subsystem.
//!
//! # Data Flow
//! ```text
//! raw body bytes
//!     → invocation.rs (decode JSON array of strings)
//!     → executor.rs (split verb / arguments, normalize failures)
//!     → registry.rs (verb lookup, invoke handler)
//!     → Result<(), CommandError>
//! ```
//!
//! # Design Decisions
//! - Registry is built once and read-only afterwards (shared via Arc)
//! - Decode failures are a separate error type from command failures
//! - No logging here; transports own observability

pub mod executor;
pub mod invocation;
pub mod registry;

pub use executor::{CommandError, CommandResult, Executor};
pub use invocation::{CommandInvocation, DecodeError};
pub use registry::{CommandHandler, CommandRegistry, RegistryError};
