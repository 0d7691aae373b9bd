//! Command execution.
//!
//! Resolves the verb of a decoded invocation through the registry and runs
//! the handler. Every failure comes back as a typed [`CommandError`].

use std::sync::Arc;
use thiserror::Error;

use crate::command::invocation::CommandInvocation;
use crate::command::registry::CommandRegistry;
use crate::settings::StoreError;

/// Outcome of a single command.
pub type CommandResult = Result<(), CommandError>;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The sequence is empty or the arguments do not fit the verb.
    #[error("invalid command invocation: {0}")]
    InvalidInvocation(String),

    /// No handler is registered for the verb.
    #[error("command not yet supported: {0}")]
    UnsupportedCommand(String),

    /// Store lookup failed under the strict lookup policy.
    #[error("configuration lookup for {key:?} failed: {source}")]
    Config {
        key: String,
        #[source]
        source: StoreError,
    },
}

impl CommandError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::InvalidInvocation(_) => "invalid_invocation",
            CommandError::UnsupportedCommand(_) => "unsupported_command",
            CommandError::Config { .. } => "config",
        }
    }
}

/// Runs invocations against a read-only registry.
#[derive(Debug, Clone)]
pub struct Executor {
    registry: Arc<CommandRegistry>,
}

impl Executor {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn execute(&self, invocation: &CommandInvocation) -> CommandResult {
        let verb = invocation.verb().ok_or_else(|| {
            CommandError::InvalidInvocation("empty command sequence".to_string())
        })?;

        let handler = self
            .registry
            .lookup(verb)
            .ok_or_else(|| CommandError::UnsupportedCommand(verb.to_string()))?;

        handler(invocation.args())
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::registry::LookupPolicy;
    use crate::settings::{ConfigStore, MemoryStore};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        calls: AtomicUsize,
        fail: bool,
    }

    impl ConfigStore for CountingStore {
        fn get(&self, key: &str) -> Result<String, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(StoreError::InvalidKey(key.to_string()))
            } else {
                Ok("value".to_string())
            }
        }
    }

    fn counting(fail: bool) -> Arc<CountingStore> {
        Arc::new(CountingStore {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    fn invocation(parts: &[&str]) -> CommandInvocation {
        parts.iter().copied().collect()
    }

    #[test]
    fn test_empty_invocation_is_invalid() {
        let executor = Executor::new(CommandRegistry::new());
        let err = executor.execute(&invocation(&[])).unwrap_err();
        assert!(matches!(err, CommandError::InvalidInvocation(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_unknown_verb_message_names_verb() {
        let executor = Executor::new(CommandRegistry::new());
        let err = executor.execute(&invocation(&["unknown"])).unwrap_err();
        assert!(matches!(err, CommandError::UnsupportedCommand(ref v) if v == "unknown"));
        assert_eq!(err.to_string(), "command not yet supported: unknown");
    }

    #[test]
    fn test_config_looks_up_key_once() {
        let store = counting(false);
        let executor = Executor::new(CommandRegistry::builtin(store.clone(), LookupPolicy::Lenient));

        executor.execute(&invocation(&["config", "my.key"])).unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_config_ignores_store_failure_when_lenient() {
        let store = counting(true);
        let executor = Executor::new(CommandRegistry::builtin(store.clone(), LookupPolicy::Lenient));

        assert!(executor.execute(&invocation(&["config", "missing"])).is_ok());
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_config_propagates_store_failure_when_strict() {
        let store = counting(true);
        let executor = Executor::new(CommandRegistry::builtin(store, LookupPolicy::Strict));

        let err = executor.execute(&invocation(&["config", "missing"])).unwrap_err();
        assert!(matches!(err, CommandError::Config { ref key, .. } if key == "missing"));
    }

    #[test]
    fn test_config_requires_exactly_one_key() {
        let store = counting(false);
        let executor = Executor::new(CommandRegistry::builtin(store.clone(), LookupPolicy::Lenient));

        let err = executor.execute(&invocation(&["config"])).unwrap_err();
        assert!(matches!(err, CommandError::InvalidInvocation(_)));

        let err = executor.execute(&invocation(&["config", "a", "b"])).unwrap_err();
        assert!(matches!(err, CommandError::InvalidInvocation(_)));

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_strict_lookup_against_memory_store() {
        let store = Arc::new(MemoryStore::from_map(HashMap::from([(
            "foo".to_string(),
            "bar".to_string(),
        )])));
        let executor = Executor::new(CommandRegistry::builtin(store, LookupPolicy::Strict));

        assert!(executor.execute(&invocation(&["config", "foo"])).is_ok());
        assert!(executor.execute(&invocation(&["config", "nope"])).is_err());
    }

    #[test]
    fn test_custom_verb() {
        let mut registry = CommandRegistry::new();
        registry
            .register("echo", |args| {
                if args.is_empty() {
                    Err(CommandError::InvalidInvocation("nothing to echo".into()))
                } else {
                    Ok(())
                }
            })
            .unwrap();
        let executor = Executor::new(registry);

        assert!(executor.execute(&invocation(&["echo", "hi"])).is_ok());
        assert!(executor.execute(&invocation(&["echo"])).is_err());
    }
}
