//! Decoded command sequences.

use serde::Deserialize;
use thiserror::Error;

/// Body could not be decoded into a command sequence.
#[derive(Debug, Error)]
#[error("request body is not a JSON array of strings: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// An ordered command sequence: verb first, positional arguments after.
///
/// The sequence may be empty after decoding; the executor rejects that case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CommandInvocation(Vec<String>);

impl CommandInvocation {
    /// Decode a JSON array of strings, e.g. `["config","my.key"]`.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// The verb, if the sequence is non-empty.
    pub fn verb(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Everything after the verb.
    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<S> for CommandInvocation {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for CommandInvocation {
    fn from(parts: Vec<String>) -> Self {
        Self(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_array_of_strings() {
        let inv = CommandInvocation::decode(br#"["config","my.key"]"#).unwrap();
        assert_eq!(inv.verb(), Some("config"));
        assert_eq!(inv.args(), ["my.key".to_string()]);
    }

    #[test]
    fn test_decode_empty_array() {
        let inv = CommandInvocation::decode(b"[]").unwrap();
        assert!(inv.is_empty());
        assert_eq!(inv.verb(), None);
        assert!(inv.args().is_empty());
    }

    #[test]
    fn test_decode_rejects_wrong_shapes() {
        assert!(CommandInvocation::decode(b"not-json").is_err());
        assert!(CommandInvocation::decode(b"").is_err());
        assert!(CommandInvocation::decode(br#"{"verb":"config"}"#).is_err());
        assert!(CommandInvocation::decode(br#"["config", 1]"#).is_err());
        assert!(CommandInvocation::decode(br#""config""#).is_err());
    }
}
