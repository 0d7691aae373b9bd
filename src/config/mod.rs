//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change, waits for writes to settle
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → settings values swapped into the store
//!     → other changed sections logged as needing a restart
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Only settings values are reloaded live; listeners need a restart

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use watcher::{restart_required, SettingsWatcher};
pub use schema::{
    GatewayConfig, HttpConfig, ListenerConfig, LogFormat, MessagingConfig, ObservabilityConfig,
    SettingsConfig, TimeoutConfig,
};
