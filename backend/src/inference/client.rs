use async_trait::async_trait;
use std::time::Duration;

use crate::rating::prompt::PromptPayload;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Model API error: {0}")]
    Api(String),
    #[error("Malformed response chunk: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid model endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Inference capacity is unavailable")]
    Unavailable,
}

/// A hosted model that turns an assembled prompt into its full text reply.
#[async_trait]
pub trait RatingModel: Send + Sync {
    async fn generate(&self, prompt: &PromptPayload<'_>) -> Result<String, InferenceError>;

    fn model_name(&self) -> &str;
}
