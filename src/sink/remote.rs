use async_trait::async_trait;

use super::{FeedbackSink, SinkError, INVALID_INPUT_MESSAGE};
use crate::client::{ClientError, FeedbackClient};
use crate::models::{AnswerSet, SubmitFeedbackInput};

/// Shown when the server can't be reached or answers with something unexpected.
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "Could not reach the feedback server. Please try again later.";

/// Shown when the server turns the submission away for sending too often.
pub const RATE_LIMITED_MESSAGE: &str =
    "Too many submissions from this address. Please wait a minute and try again.";

/// Sends submissions to a running server's `/feedback` endpoint.
#[derive(Debug, Clone)]
pub struct RemoteSink {
    client: FeedbackClient,
}

impl RemoteSink {
    pub fn new(client: FeedbackClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedbackSink for RemoteSink {
    async fn submit(&self, identity: &str, answers: &AnswerSet) -> Result<(), SinkError> {
        let input = SubmitFeedbackInput {
            identity: identity.to_string(),
            answers: answers.clone(),
        };

        match self.client.submit_feedback(&input).await {
            Ok(response) if response.success => Ok(()),
            Ok(response) => {
                let reason = response
                    .error
                    .unwrap_or_else(|| TRANSPORT_FAILURE_MESSAGE.to_string());
                if reason == INVALID_INPUT_MESSAGE {
                    Err(SinkError::InvalidInput(reason))
                } else {
                    Err(SinkError::Unavailable(reason))
                }
            }
            Err(ClientError::BadRequest(body)) => {
                tracing::warn!("Server rejected submission: {}", body);
                Err(SinkError::InvalidInput(INVALID_INPUT_MESSAGE.to_string()))
            }
            Err(ClientError::RateLimited) => {
                tracing::warn!("Submission to {} was rate limited", self.client.base_url());
                Err(SinkError::Unavailable(RATE_LIMITED_MESSAGE.to_string()))
            }
            Err(e) => {
                tracing::error!("Submission to {} failed: {}", self.client.base_url(), e);
                Err(SinkError::Unavailable(TRANSPORT_FAILURE_MESSAGE.to_string()))
            }
        }
    }
}
