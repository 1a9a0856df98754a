//! HTTP client for the vibe check API.
//!
//! Used by the terminal front end when it talks to a running server instead of
//! the local database.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::*;

/// Default URL for local development.
pub const DEFAULT_URL: &str = "http://localhost:3000/api/v1";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Too many requests, slow down")]
    RateLimited,

    #[error("Server error: {0}")]
    Server(String),
}

/// HTTP client for the vibe check API.
#[derive(Debug, Clone)]
pub struct FeedbackClient {
    base_url: String,
    client: Client,
}

impl FeedbackClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::BadRequest(body))
                }
                StatusCode::TOO_MANY_REQUESTS => Err(ClientError::RateLimited),
                _ => Err(ClientError::Server(format!("{}: {}", status, body))),
            }
        }
    }

    pub async fn health(&self) -> Result<serde_json::Value, ClientError> {
        let response = self.request(reqwest::Method::GET, "/health").send().await?;
        self.handle_response(response).await
    }

    /// Fetch the server's question catalog.
    pub async fn questions(&self) -> Result<Vec<Question>, ClientError> {
        let response = self
            .request(reqwest::Method::GET, "/questions")
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Post a completed pass to the submission entry point.
    pub async fn submit_feedback(
        &self,
        input: &SubmitFeedbackInput,
    ) -> Result<SubmitFeedbackResponse, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/feedback")
            .json(input)
            .send()
            .await?;
        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = FeedbackClient::new("http://example.test/api/v1/");
        assert_eq!(client.base_url(), "http://example.test/api/v1");
    }
}
