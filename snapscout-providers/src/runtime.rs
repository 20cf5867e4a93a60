use crate::request::{Body, Method, ShopRequest};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use snapscout_core::error::BackendError;

const ERROR_BODY_EXCERPT: usize = 200;

pub fn default_client() -> Result<reqwest::Client, BackendError> {
    // No explicit timeouts: calls run to completion under reqwest's defaults.
    reqwest::Client::builder()
        .build()
        .map_err(|e| BackendError::transport(format!("build http client: {e}")))
}

/// Sends one request and returns the body of a 2xx response.
///
/// Connection failures and non-2xx statuses are transport errors; the caller parses the
/// returned bytes.
pub async fn send(client: &reqwest::Client, req: &ShopRequest) -> Result<Vec<u8>, BackendError> {
    log::debug!("-> {} {} {:?}", req.method.as_str(), req.url, req.body);

    let builder = match req.method {
        Method::Get => client.get(&req.url),
        Method::Post => client.post(&req.url),
    }
    .header(ACCEPT, "application/json");

    let builder = match &req.body {
        Body::None => builder,
        Body::Json(v) => builder.json(v),
        Body::Multipart {
            content_type,
            bytes,
        } => builder
            .header(CONTENT_TYPE, content_type.as_str())
            .body(bytes.clone()),
    };

    let resp = builder.send().await.map_err(|e| {
        BackendError::transport(format!("{} {}: {e}", req.method.as_str(), req.url))
    })?;
    let status = resp.status().as_u16();
    let body = resp
        .bytes()
        .await
        .map_err(|e| BackendError::transport(format!("read response from {}: {e}", req.url)))?;

    log::debug!("<- {} {} ({} bytes)", status, req.url, body.len());
    if !(200..=299).contains(&status) {
        return Err(status_error(status, &body));
    }
    Ok(body.to_vec())
}

fn status_error(status: u16, body: &[u8]) -> BackendError {
    let text = String::from_utf8_lossy(body);
    let excerpt: String = text.chars().take(ERROR_BODY_EXCERPT).collect();
    BackendError::transport(format!("status={status} body={}", excerpt.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop_api::{build_health_request, build_recommend_request};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn status_error_carries_status_and_detail() {
        let err = status_error(500, br#"{"detail":"Error processing image"}"#);
        assert!(err.is_transport());
        assert!(err.to_string().contains("status=500"));
        assert!(err.to_string().contains("Error processing image"));
    }

    #[test]
    fn error_excerpt_is_bounded() {
        let err = status_error(502, &[b'x'; 10_000]);
        assert!(err.to_string().len() < 300);
    }

    #[tokio::test]
    async fn returns_body_of_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"status":"healthy"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = default_client().unwrap();
        let body = send(&client, &build_health_request(&server.uri()))
            .await
            .unwrap();
        assert_eq!(body, br#"{"status":"healthy"}"#);
    }

    #[tokio::test]
    async fn json_body_is_posted_and_errors_surface_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recommend"))
            .and(body_json(serde_json::json!({"question": "when?"})))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let client = default_client().unwrap();
        let err = send(&client, &build_recommend_request(&server.uri(), "when?"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("status=503 body=overloaded"));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let client = default_client().unwrap();
        // Port 9 (discard) is almost never listening on loopback.
        let err = send(&client, &build_health_request("http://127.0.0.1:9"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
