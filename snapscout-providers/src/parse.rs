use serde::Deserialize;
use snapscout_core::error::BackendError;
use snapscout_core::product::DetectionResult;
use snapscout_core::types::{HealthStatus, Source, null_as_empty};

#[derive(Debug, Deserialize)]
struct DetectProductResponse {
    name: String,
    brand: String,
    price: f64,
    confidence: f64,

    // Sent by the backend; the client does not use it.
    #[serde(default)]
    #[allow(dead_code)]
    category: Option<String>,
}

pub fn parse_detection(body: &[u8]) -> Result<DetectionResult, BackendError> {
    let resp: DetectProductResponse = serde_json::from_slice(body)
        .map_err(|e| BackendError::decode(format!("decode detection JSON: {e}")))?;

    if !resp.price.is_finite() || resp.price < 0.0 {
        return Err(BackendError::decode(format!(
            "detection price out of range: {}",
            resp.price
        )));
    }
    if !(0.0..=1.0).contains(&resp.confidence) {
        return Err(BackendError::decode(format!(
            "detection confidence out of range: {}",
            resp.confidence
        )));
    }

    Ok(DetectionResult {
        name: resp.name,
        brand: resp.brand,
        // -0.0 would otherwise render as "$-0.00".
        price: if resp.price == 0.0 { 0.0 } else { resp.price },
        confidence: resp.confidence,
    })
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    sources: Vec<Source>,
}

pub fn parse_chat(body: &[u8]) -> Result<(String, Vec<Source>), BackendError> {
    let resp: ChatResponse = serde_json::from_slice(body)
        .map_err(|e| BackendError::decode(format!("decode chat JSON: {e}")))?;
    Ok((resp.response, resp.sources))
}

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    answer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    sources: Vec<Source>,
}

pub fn parse_recommendation(body: &[u8]) -> Result<(String, Vec<Source>), BackendError> {
    let resp: RecommendResponse = serde_json::from_slice(body)
        .map_err(|e| BackendError::decode(format!("decode recommendation JSON: {e}")))?;
    Ok((resp.answer, resp.sources))
}

pub fn parse_health(body: &[u8]) -> Result<HealthStatus, BackendError> {
    let v: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| BackendError::decode(format!("decode health JSON: {e}")))?;
    Ok(HealthStatus(v))
}
