use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::survey::{AdvanceOutcome, SessionView};

/// Body of `POST /sessions/{id}/identity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeginSurveyInput {
    pub identity: String,
}

/// Body of `PUT /sessions/{id}/answers/{question_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAnswerInput {
    pub value: String,
}

/// A session id with its current snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub session: SessionView,
}

/// Result of `POST /sessions/{id}/advance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub outcome: AdvanceOutcome,
    pub session: SessionView,
}
