//! Verb → handler lookup table.
//!
//! # Design Decisions
//! - Verbs are unique keys; a second registration is an error, not an overwrite
//! - Immutable after construction (thread-safe without locks)
//! - A lookup miss is reported to the caller, never a panic

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::command::executor::{CommandError, CommandResult};
use crate::settings::ConfigStore;

/// A command handler: receives the arguments after the verb.
pub type CommandHandler = Arc<dyn Fn(&[String]) -> CommandResult + Send + Sync>;

/// Verb used for configuration lookups.
pub const CONFIG_VERB: &str = "config";

/// Errors raised while building a registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command {0:?} is already registered")]
    DuplicateVerb(String),
}

/// How the `config` command treats a failed store lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupPolicy {
    /// The value is fetched and discarded; the command always succeeds.
    #[default]
    Lenient,
    /// Store errors fail the command.
    Strict,
}

/// Maps command verbs to handlers.
#[derive(Default, Clone)]
pub struct CommandRegistry {
    handlers: HashMap<String, CommandHandler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in verbs wired to the given store.
    pub fn builtin(store: Arc<dyn ConfigStore>, policy: LookupPolicy) -> Self {
        let mut registry = Self::new();
        registry
            .handlers
            .insert(CONFIG_VERB.to_string(), config_handler(store, policy));
        registry
    }

    /// Register a handler for `verb`.
    pub fn register<F>(&mut self, verb: impl Into<String>, handler: F) -> Result<(), RegistryError>
    where
        F: Fn(&[String]) -> CommandResult + Send + Sync + 'static,
    {
        let verb = verb.into();
        if self.handlers.contains_key(&verb) {
            return Err(RegistryError::DuplicateVerb(verb));
        }
        self.handlers.insert(verb, Arc::new(handler));
        Ok(())
    }

    pub fn lookup(&self, verb: &str) -> Option<&CommandHandler> {
        self.handlers.get(verb)
    }

    pub fn contains(&self, verb: &str) -> bool {
        self.handlers.contains_key(verb)
    }

    /// Registered verbs, sorted.
    pub fn verbs(&self) -> Vec<&str> {
        let mut verbs: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        verbs.sort_unstable();
        verbs
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("verbs", &self.verbs())
            .finish()
    }
}

/// `config <key>`: look the key up in the store exactly once.
fn config_handler(store: Arc<dyn ConfigStore>, policy: LookupPolicy) -> CommandHandler {
    Arc::new(move |args: &[String]| {
        let [key] = args else {
            return Err(CommandError::InvalidInvocation(format!(
                "`{CONFIG_VERB}` expects exactly one key, got {} argument(s)",
                args.len()
            )));
        };

        match store.get(key) {
            Ok(_) => Ok(()),
            Err(source) if policy == LookupPolicy::Strict => Err(CommandError::Config {
                key: key.clone(),
                source,
            }),
            Err(_) => Ok(()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemoryStore;

    #[test]
    fn test_duplicate_verb_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register("ping", |_| Ok(())).unwrap();

        let err = registry.register("ping", |_| Ok(())).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateVerb("ping".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_builtin_rejects_second_config() {
        let store = Arc::new(MemoryStore::default());
        let mut registry = CommandRegistry::builtin(store, LookupPolicy::Lenient);

        assert!(registry.contains(CONFIG_VERB));
        assert!(registry.register(CONFIG_VERB, |_| Ok(())).is_err());
    }

    #[test]
    fn test_lookup_miss() {
        let registry = CommandRegistry::new();
        assert!(registry.lookup("config").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_verbs_sorted() {
        let mut registry = CommandRegistry::new();
        registry.register("zeta", |_| Ok(())).unwrap();
        registry.register("alpha", |_| Ok(())).unwrap();
        assert_eq!(registry.verbs(), vec!["alpha", "zeta"]);
    }
}
