use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernorErrorKind {
    InvalidInput,
    Generation,
    Scoring,
    Embedding,
    Memory,
    Context,
    Internal,
}

/// Collaborator and input failures surfaced by the governor.
///
/// Policy rejections are never errors: they stay inside the retry loop
/// as `PolicyOutcome` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorError {
    pub kind: GovernorErrorKind,
    pub message: String,
}

impl GovernorError {
    pub fn new(kind: GovernorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for GovernorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for GovernorError {}

pub fn invalid_input(message: impl Into<String>) -> GovernorError {
    GovernorError::new(GovernorErrorKind::InvalidInput, message)
}

pub fn generation_failed(message: impl Into<String>) -> GovernorError {
    GovernorError::new(GovernorErrorKind::Generation, message)
}

pub fn scoring_failed(message: impl Into<String>) -> GovernorError {
    GovernorError::new(GovernorErrorKind::Scoring, message)
}

pub fn embedding_failed(message: impl Into<String>) -> GovernorError {
    GovernorError::new(GovernorErrorKind::Embedding, message)
}

pub fn memory_failed(message: impl Into<String>) -> GovernorError {
    GovernorError::new(GovernorErrorKind::Memory, message)
}

pub fn context_failed(message: impl Into<String>) -> GovernorError {
    GovernorError::new(GovernorErrorKind::Context, message)
}

pub fn internal_error(message: impl Into<String>) -> GovernorError {
    GovernorError::new(GovernorErrorKind::Internal, message)
}
