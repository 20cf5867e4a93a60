use async_trait::async_trait;
use snapscout_core::error::BackendError;
use snapscout_core::product::DetectionResult;
use snapscout_core::types::{Answer, ChatReply, HealthStatus, ImagePayload};

/// The backend as seen by the store.
///
/// Implementations must not retry or cache; each call maps to exactly one request.
#[async_trait]
pub trait ShopBackend: Send + Sync {
    async fn detect(&self, image: &ImagePayload) -> Result<DetectionResult, BackendError>;

    async fn chat(
        &self,
        message: &str,
        product: Option<&DetectionResult>,
    ) -> Result<ChatReply, BackendError>;

    async fn recommend(&self, question: &str) -> Result<Answer, BackendError>;

    async fn health(&self) -> Result<HealthStatus, BackendError>;
}
