use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AnswerSet;

/// A completed survey pass as stored by a feedback sink.
///
/// Records are append-only. `submitted_at` is assigned by the sink at write time,
/// never by the caller, so respondents' clocks cannot skew it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub identity: String,
    pub answers: AnswerSet,
    pub submitted_at: DateTime<Utc>,
}

/// Request body for the submission entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitFeedbackInput {
    pub identity: String,
    #[serde(default)]
    pub answers: AnswerSet,
}

/// Result of the submission entry point.
///
/// Expected failures are reported through `error` with `success: false`; the
/// endpoint does not use HTTP status codes for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitFeedbackResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitFeedbackResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}
