use async_trait::async_trait;
use snapscout_core::config::ClientConfig;
use snapscout_core::error::BackendError;
use snapscout_core::product::DetectionResult;
use snapscout_core::types::{Answer, ChatReply, HealthStatus, ImagePayload};
use snapscout_engine::traits::ShopBackend;
use snapscout_providers::request::ShopRequest;
use snapscout_providers::{parse, runtime, shop_api};

/// `ShopBackend` over HTTP. One request per call; the client is shared across calls.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: runtime::default_client()?,
            base_url: config.api_base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, req: ShopRequest) -> Result<Vec<u8>, BackendError> {
        runtime::send(&self.client, &req).await
    }
}

#[async_trait]
impl ShopBackend for HttpBackend {
    async fn detect(&self, image: &ImagePayload) -> Result<DetectionResult, BackendError> {
        let body = self
            .send(shop_api::build_detect_request(&self.base_url, image))
            .await?;
        parse::parse_detection(&body)
    }

    async fn chat(
        &self,
        message: &str,
        product: Option<&DetectionResult>,
    ) -> Result<ChatReply, BackendError> {
        let body = self
            .send(shop_api::build_chat_request(&self.base_url, message, product))
            .await?;
        let (reply, sources) = parse::parse_chat(&body)?;
        Ok(ChatReply { reply, sources })
    }

    async fn recommend(&self, question: &str) -> Result<Answer, BackendError> {
        let body = self
            .send(shop_api::build_recommend_request(&self.base_url, question))
            .await?;
        let (answer, sources) = parse::parse_recommendation(&body)?;
        Ok(Answer {
            question: question.to_string(),
            answer,
            sources,
        })
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        let body = self
            .send(shop_api::build_health_request(&self.base_url))
            .await?;
        parse::parse_health(&body)
    }
}
