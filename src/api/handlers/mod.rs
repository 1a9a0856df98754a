use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::types::*;
use super::AppState;
use crate::models::*;
use crate::sink::{DatabaseSink, FeedbackSink, INVALID_INPUT_MESSAGE};
use crate::survey::{SharedSession, SurveyError};

// ============================================================
// Error Handling
// ============================================================

/// Map a rejected transition to a response. Validation warnings are expected
/// traffic and only logged at debug level.
fn survey_error(e: SurveyError) -> (StatusCode, String) {
    if e.is_validation() {
        tracing::debug!("Validation warning: {}", e);
    } else {
        tracing::warn!("Rejected transition: {}", e);
    }
    (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
}

fn find_session(state: &AppState, id: Uuid) -> Result<SharedSession, (StatusCode, String)> {
    state
        .sessions
        .get(id)
        .ok_or((StatusCode::NOT_FOUND, "Session not found".to_string()))
}

fn session_response(id: Uuid, session: &SharedSession) -> SessionResponse {
    let session = session.lock().expect("session lock poisoned");
    SessionResponse {
        id,
        session: session.view(),
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Questions
// ============================================================

pub async fn list_questions(State(state): State<AppState>) -> Json<Vec<Question>> {
    Json(state.sessions.catalog().questions().to_vec())
}

// ============================================================
// Submission entry point
// ============================================================

/// Always answers 200. Expected failures, including a malformed body, are
/// reported through `success: false` and `error`.
pub async fn submit_feedback(
    State(state): State<AppState>,
    input: Result<Json<SubmitFeedbackInput>, JsonRejection>,
) -> Json<SubmitFeedbackResponse> {
    let Json(input) = match input {
        Ok(input) => input,
        Err(rejection) => {
            tracing::warn!("Malformed submission: {}", rejection.body_text());
            return Json(SubmitFeedbackResponse::failed(INVALID_INPUT_MESSAGE));
        }
    };

    let sink = DatabaseSink::new(state.db.clone());
    match sink.submit(&input.identity, &input.answers).await {
        Ok(()) => Json(SubmitFeedbackResponse::ok()),
        Err(e) => Json(SubmitFeedbackResponse::failed(e.reason())),
    }
}

// ============================================================
// Sessions
// ============================================================

pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let (id, session) = state.sessions.create();
    tracing::debug!("Created session {}", id);
    (StatusCode::CREATED, Json(session_response(id, &session)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    let session = find_session(&state, id)?;
    Ok(Json(session_response(id, &session)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Session not found".to_string()))
    }
}

pub async fn begin_survey(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<BeginSurveyInput>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    let session = find_session(&state, id)?;
    session
        .lock()
        .expect("session lock poisoned")
        .begin(&input.identity)
        .map_err(survey_error)?;
    Ok(Json(session_response(id, &session)))
}

pub async fn record_answer(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, String)>,
    Json(input): Json<RecordAnswerInput>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    let session = find_session(&state, id)?;
    session
        .lock()
        .expect("session lock poisoned")
        .record_answer(&question_id, &input.value)
        .map_err(survey_error)?;
    Ok(Json(session_response(id, &session)))
}

pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdvanceResponse>, (StatusCode, String)> {
    let session = find_session(&state, id)?;
    let outcome = state
        .controller
        .advance(&session)
        .await
        .map_err(survey_error)?;

    let view = session.lock().expect("session lock poisoned").view();
    Ok(Json(AdvanceResponse {
        outcome,
        session: view,
    }))
}

pub async fn start_over(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    let session = find_session(&state, id)?;
    session
        .lock()
        .expect("session lock poisoned")
        .start_over()
        .map_err(survey_error)?;
    Ok(Json(session_response(id, &session)))
}
