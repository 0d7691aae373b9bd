//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the settings store, registry, and executor from configuration
//! - Hand explicit dispatcher / message handler values to each transport
//! - Bind listeners and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any bind error is fatal
//! - Listeners start last (traffic only when ready)

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::command::{CommandRegistry, Executor};
use crate::config::GatewayConfig;
use crate::http::{Dispatcher, HttpServer};
use crate::lifecycle::Shutdown;
use crate::messaging::{MessageHandler, MessageListener};
use crate::net::{Listener, ListenerError};
use crate::settings::MemoryStore;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind HTTP listener on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("message listener: {0}")]
    Listener(#[from] ListenerError),

    #[error("HTTP server: {0}")]
    Serve(#[from] std::io::Error),
}

/// Fully wired gateway, ready to serve.
pub struct Gateway {
    config: GatewayConfig,
    store: Arc<MemoryStore>,
    executor: Executor,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        let store = Arc::new(MemoryStore::from_map(config.settings.values.clone()));
        let registry = CommandRegistry::builtin(store.clone(), config.settings.lookup_policy());

        tracing::debug!(verbs = ?registry.verbs(), "Command registry built");

        Self {
            config,
            store,
            executor: Executor::new(registry),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Store backing the `config` command; replace its values to reload.
    pub fn store(&self) -> Arc<MemoryStore> {
        self.store.clone()
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.executor.clone())
    }

    pub fn message_handler(&self) -> MessageHandler {
        MessageHandler::new(self.executor.clone(), self.config.messaging.mode)
    }

    pub fn http_server(&self) -> HttpServer {
        HttpServer::new(self.dispatcher(), &self.config)
    }

    /// Bind the configured addresses and serve until shutdown.
    pub async fn run(self, shutdown: &Shutdown) -> Result<(), StartupError> {
        let address = &self.config.listener.bind_address;
        let http = TcpListener::bind(address)
            .await
            .map_err(|source| StartupError::Bind {
                address: address.clone(),
                source,
            })?;

        let messages = if self.config.messaging.enabled {
            Some(
                Listener::bind(
                    &self.config.messaging.bind_address,
                    self.config.messaging.max_connections,
                )
                .await?,
            )
        } else {
            None
        };

        self.serve(http, messages, shutdown).await
    }

    /// Serve on already bound listeners until shutdown.
    pub async fn serve(
        self,
        http: TcpListener,
        messages: Option<Listener>,
        shutdown: &Shutdown,
    ) -> Result<(), StartupError> {
        let message_task = messages.map(|listener| {
            let listener = MessageListener::new(
                listener,
                self.message_handler(),
                self.config.messaging.max_payload_bytes,
            );
            tokio::spawn(listener.run(shutdown.subscribe()))
        });

        self.http_server().run(http, shutdown.subscribe()).await?;

        if let Some(task) = message_task {
            match task.await {
                Ok(result) => result?,
                Err(e) => tracing::error!(error = %e, "Message listener task failed"),
            }
        }

        Ok(())
    }
}
