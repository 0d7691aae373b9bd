//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::command::registry::LookupPolicy;
use crate::messaging::MessageMode;

/// Root configuration for the gateway.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener configuration.
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request adaptation settings for the HTTP transport.
    pub http: HttpConfig,

    /// Message listener settings.
    pub messaging: MessagingConfig,

    /// Values served to the `config` command.
    pub settings: SettingsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// How raw HTTP requests are turned into classifier input.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Header names (case-insensitive) dropped before classification.
    ///
    /// Defaults to the headers the HTTP stack or the gateway itself adds.
    /// Client-chosen headers such as `accept` or `user-agent` count towards
    /// the `/foo` single-header rule unless listed here.
    pub ignored_headers: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            ignored_headers: [
                "host",
                "content-length",
                "transfer-encoding",
                "x-request-id",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_body_bytes: 1024 * 1024, // 1MB
        }
    }
}

/// Message listener configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MessagingConfig {
    /// Enable the message listener.
    pub enabled: bool,

    /// Bind address for the line-framed message listener.
    pub bind_address: String,

    /// Maximum concurrent message connections.
    pub max_connections: usize,

    /// Accept payloads blindly or execute them as commands.
    pub mode: MessageMode,

    /// Longest accepted payload line in bytes.
    pub max_payload_bytes: usize,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "0.0.0.0:6380".to_string(),
            max_connections: 1_000,
            mode: MessageMode::Accept,
            max_payload_bytes: 64 * 1024,
        }
    }
}

/// Configuration-store contents.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SettingsConfig {
    /// Fail `config` commands whose key lookup fails.
    pub strict: bool,

    /// Key/value pairs.
    pub values: HashMap<String, String>,
}

impl SettingsConfig {
    pub fn lookup_policy(&self) -> LookupPolicy {
        if self.strict {
            LookupPolicy::Strict
        } else {
            LookupPolicy::Lenient
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
