//! Configuration-value store consulted by command handlers.
//!
//! # Design Decisions
//! - Handlers see the store only through the [`ConfigStore`] trait
//! - The in-memory store is swapped wholesale on reload (readers never block)

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by a configuration store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("provider error: {0}")]
    Provider(String),
}

/// Key/value lookup used by the `config` command.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Result<String, StoreError>;
}

/// Store backed by an atomically replaceable map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: ArcSwap<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            values: ArcSwap::from_pointee(values),
        }
    }

    /// Replace every value at once.
    pub fn replace(&self, values: HashMap<String, String>) {
        self.values.store(Arc::new(values));
    }

    pub fn len(&self) -> usize {
        self.values.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.load().is_empty()
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Result<String, StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        self.values
            .load()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::InvalidKey(key.to_string()))
    }
}
