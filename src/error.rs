// Error taxonomy shared by the engine and the request layer
//
// None of these are recovered from locally. The request handler renders them
// as `ERROR: ...` response lines.

use thiserror::Error;

use crate::types::AgentId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BotError {
    /// Query for an agent id that was never registered in the snapshot
    #[error("unknown agent id: {0}")]
    UnknownAgent(AgentId),

    /// A move without its mandatory first step, or unparseable move text
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// Malformed external board/state representation
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for BotError {
    fn from(e: serde_json::Error) -> Self {
        BotError::Parse(e.to_string())
    }
}

pub type BotResult<T> = Result<T, BotError>;
