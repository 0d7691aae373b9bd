//! Inbound message handling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::{CommandError, CommandInvocation, DecodeError, Executor};

/// What the handler does with a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageMode {
    /// Accept every payload without looking at it.
    #[default]
    Accept,
    /// Decode the payload as a command sequence and execute it.
    Execute,
}

/// Failure reported back to the message transport.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

#[derive(Debug, Clone)]
pub struct MessageHandler {
    executor: Executor,
    mode: MessageMode,
}

impl MessageHandler {
    pub fn new(executor: Executor, mode: MessageMode) -> Self {
        Self { executor, mode }
    }

    pub fn on_message(&self, payload: &[u8]) -> Result<(), MessageError> {
        match self.mode {
            MessageMode::Accept => Ok(()),
            MessageMode::Execute => {
                let invocation = CommandInvocation::decode(payload)?;
                self.executor.execute(&invocation)?;
                Ok(())
            }
        }
    }

    pub fn mode(&self) -> MessageMode {
        self.mode
    }
}
