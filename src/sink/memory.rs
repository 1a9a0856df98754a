use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{validate, FeedbackSink, SinkError};
use crate::models::{AnswerSet, Submission};

/// In-memory sink that records every accepted submission.
///
/// Failures can be queued with [`fail_next`](Self::fail_next); each queued
/// failure is returned once, in order, before writes succeed again. An optional
/// delay holds every call open, which is how tests observe an in-flight
/// submission.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Submission>>,
    failures: Mutex<VecDeque<SinkError>>,
    calls: Mutex<usize>,
    delay: Option<Duration>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn fail_next(&self, error: SinkError) {
        self.failures
            .lock()
            .expect("sink lock poisoned")
            .push_back(error);
    }

    pub fn records(&self) -> Vec<Submission> {
        self.records.lock().expect("sink lock poisoned").clone()
    }

    /// Number of `submit` calls, including failed ones.
    pub fn calls(&self) -> usize {
        *self.calls.lock().expect("sink lock poisoned")
    }
}

#[async_trait]
impl FeedbackSink for MemorySink {
    async fn submit(&self, identity: &str, answers: &AnswerSet) -> Result<(), SinkError> {
        *self.calls.lock().expect("sink lock poisoned") += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        validate(identity, answers)?;

        if let Some(error) = self
            .failures
            .lock()
            .expect("sink lock poisoned")
            .pop_front()
        {
            return Err(error);
        }

        self.records
            .lock()
            .expect("sink lock poisoned")
            .push(Submission {
                id: Uuid::new_v4(),
                identity: identity.to_string(),
                answers: answers.clone(),
                submitted_at: Utc::now(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_failures_are_returned_once() {
        let sink = MemorySink::new();
        let answers: AnswerSet = [("q1", "chill")].into_iter().collect();
        sink.fail_next(SinkError::Unavailable("down".to_string()));

        assert!(sink.submit("fox", &answers).await.is_err());
        assert!(sink.submit("fox", &answers).await.is_ok());

        assert_eq!(sink.calls(), 2);
        assert_eq!(sink.records().len(), 1);
    }
}
