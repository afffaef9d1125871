use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use uuid::Uuid;

use super::parser::{ParseError, RatingResult, parse_reply};
use super::prompt::build_prompt;
use super::references::ReferenceSet;
use crate::inference::client::{InferenceError, RatingModel};

#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error(
        "Server error: Not enough training images loaded ({loaded} of 10). Please check your '{dir}' directory."
    )]
    NotReady { loaded: usize, dir: String },
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Rates one uploaded image against the shared reference set.
pub struct RatingService {
    references: ReferenceSet,
    model: Arc<dyn RatingModel>,
    permits: Semaphore,
    timeout: Duration,
}

impl RatingService {
    pub fn new(
        references: ReferenceSet,
        model: Arc<dyn RatingModel>,
        timeout: Duration,
        max_concurrent: usize,
    ) -> Self {
        Self {
            references,
            model,
            permits: Semaphore::new(max_concurrent),
            timeout,
        }
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    pub async fn rate(&self, request_id: Uuid, image: &[u8]) -> Result<RatingResult, RatingError> {
        let exemplars =
            self.references
                .exemplar_images()
                .ok_or_else(|| RatingError::NotReady {
                    loaded: self.references.len(),
                    dir: self.references.source_dir().display().to_string(),
                })?;

        let prompt = build_prompt(exemplars, image);

        let reply = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| InferenceError::Unavailable)?;
            log::info!(
                "[{}] Sending {} prompt parts to {}",
                request_id,
                prompt.parts.len(),
                self.model.model_name()
            );
            tokio::time::timeout(self.timeout, self.model.generate(&prompt))
                .await
                .map_err(|_| InferenceError::Timeout(self.timeout))??
        };

        log::debug!("[{}] Model reply: {}", request_id, reply);
        Ok(parse_reply(&reply)?)
    }
}
