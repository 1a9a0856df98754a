use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::hook::{Celebration, Quiet};
use super::session::{Advance, PendingSubmission, SurveyError};
use super::store::SharedSession;
use crate::sink::{FeedbackSink, SinkError};

/// Default bound on how long a single submission may take.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shown when a sink fails in a way it did not report itself.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Shown when a submission outlives the timeout.
pub const TIMEOUT_FAILURE_MESSAGE: &str =
    "Submission is taking longer than expected. Please try again.";

/// What an advance request ended up doing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    /// Moved to the question at `index`.
    Moved { index: usize },
    /// Another request already has a submission in flight.
    Suppressed,
    /// The sink accepted the answers; the session is now `Submitted`.
    Submitted,
    /// The sink failed. The session is still on the last question.
    Failed { reason: String },
}

/// Drives sessions through the submission handshake against one sink.
///
/// The session lock is only held for the synchronous transitions, never while
/// the sink is working, so a concurrent advance on the same session sees the
/// in-flight flag and is suppressed.
#[derive(Clone)]
pub struct SurveyController {
    sink: Arc<dyn FeedbackSink>,
    celebration: Arc<dyn Celebration>,
    submit_timeout: Duration,
}

impl SurveyController {
    pub fn new(sink: Arc<dyn FeedbackSink>) -> Self {
        Self {
            sink,
            celebration: Arc::new(Quiet),
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    pub fn with_celebration(mut self, celebration: Arc<dyn Celebration>) -> Self {
        self.celebration = celebration;
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn submit_timeout(&self) -> Duration {
        self.submit_timeout
    }

    /// Guarded advance. On the last question this dispatches the frozen answers
    /// to the sink exactly once and waits for the result.
    ///
    /// The submission and the transition it settles run on their own task, so
    /// dropping this future mid-flight still leaves the session `Submitted` or
    /// retryable.
    pub async fn advance(&self, session: &SharedSession) -> Result<AdvanceOutcome, SurveyError> {
        let pending = {
            let mut session = session.lock().expect("session lock poisoned");
            match session.advance()? {
                Advance::Moved { index } => return Ok(AdvanceOutcome::Moved { index }),
                Advance::Suppressed => {
                    tracing::debug!("Advance ignored, submission already in flight");
                    return Ok(AdvanceOutcome::Suppressed);
                }
                Advance::Submit(pending) => pending,
            }
        };

        let controller = self.clone();
        let session = Arc::clone(session);
        let settle = tokio::spawn(async move { controller.settle(&session, pending).await });

        match settle.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Submission task failed: {}", e);
                Ok(AdvanceOutcome::Failed {
                    reason: FALLBACK_FAILURE_MESSAGE.to_string(),
                })
            }
        }
    }

    async fn settle(
        &self,
        session: &SharedSession,
        pending: PendingSubmission,
    ) -> Result<AdvanceOutcome, SurveyError> {
        let identity = pending.identity.clone();
        let result = self.dispatch(pending).await;

        session
            .lock()
            .expect("session lock poisoned")
            .complete(&result)?;

        match result {
            Ok(()) => {
                self.celebration.celebrate(&identity);
                Ok(AdvanceOutcome::Submitted)
            }
            Err(e) => {
                tracing::warn!("Submission failed: {}", e);
                Ok(AdvanceOutcome::Failed {
                    reason: e.reason().to_string(),
                })
            }
        }
    }

    /// Runs the sink on its own task so a panic can't take the session down
    /// with it. A write that outlives the timeout is aborted.
    async fn dispatch(&self, pending: PendingSubmission) -> Result<(), SinkError> {
        let sink = Arc::clone(&self.sink);
        let mut task =
            tokio::spawn(async move { sink.submit(&pending.identity, &pending.answers).await });

        match tokio::time::timeout(self.submit_timeout, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::error!("Submission task failed: {}", e);
                Err(SinkError::Unavailable(FALLBACK_FAILURE_MESSAGE.to_string()))
            }
            Err(_) => {
                task.abort();
                tracing::warn!(
                    "Submission exceeded {}s timeout, aborted",
                    self.submit_timeout.as_secs_f32()
                );
                Err(SinkError::Unavailable(TIMEOUT_FAILURE_MESSAGE.to_string()))
            }
        }
    }
}
