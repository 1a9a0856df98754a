//! Feedback sinks: where a completed survey pass is written.
//!
//! A sink is a one-shot write. It stamps the record with its own clock, reports
//! success or a human-readable failure, and never retries on its own.
//!
//! - [`DatabaseSink`]: Appends to the local SQLite `submissions` table
//! - [`RemoteSink`]: Posts to a running server's submission endpoint
//! - [`MemorySink`]: Keeps records in memory, with scriptable failures

mod database;
mod memory;
mod remote;

pub use database::DatabaseSink;
pub use memory::MemorySink;
pub use remote::{RemoteSink, RATE_LIMITED_MESSAGE};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::AnswerSet;

/// Message for structurally invalid requests.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid data provided.";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The request was rejected before anything was written.
    #[error("{0}")]
    InvalidInput(String),

    /// Storage or transport failed. Nothing is retried.
    #[error("{0}")]
    Unavailable(String),
}

impl SinkError {
    /// The reason shown to the respondent.
    pub fn reason(&self) -> &str {
        match self {
            Self::InvalidInput(reason) | Self::Unavailable(reason) => reason,
        }
    }
}

#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// Persists one completed pass. Called at most once per pass by the controller.
    async fn submit(&self, identity: &str, answers: &AnswerSet) -> Result<(), SinkError>;
}

/// Rejects requests with a blank identity or no answers.
pub(crate) fn validate(identity: &str, answers: &AnswerSet) -> Result<(), SinkError> {
    if identity.trim().is_empty() || answers.is_empty() {
        return Err(SinkError::InvalidInput(INVALID_INPUT_MESSAGE.to_string()));
    }
    Ok(())
}
