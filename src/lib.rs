//! Command dispatch gateway library.

pub mod command;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod messaging;
pub mod net;
pub mod observability;
pub mod settings;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::{Gateway, Shutdown};
