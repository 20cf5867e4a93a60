// Request builders for the shopping backend.
//
// Endpoints:
//   POST /detect-product  multipart, part `file`
//   POST /chat            {"message", "product_data"}
//   POST /recommend       {"question"}
//   GET  /health

use crate::request::{Body, Method, ShopRequest};
use serde_json::json;
use snapscout_core::product::DetectionResult;
use snapscout_core::types::ImagePayload;

pub const PATH_DETECT: &str = "/detect-product";
pub const PATH_CHAT: &str = "/chat";
pub const PATH_RECOMMEND: &str = "/recommend";
pub const PATH_HEALTH: &str = "/health";

const MULTIPART_PREFIX: &str = "multipart/form-data; boundary=";

pub fn build_detect_request(base_url: &str, image: &ImagePayload) -> ShopRequest {
    let boundary = format!("snapscout-{}", uuid::Uuid::new_v4().simple());

    let mut bytes: Vec<u8> = Vec::with_capacity(image.len() + 256);
    append_file(&mut bytes, &boundary, "file", image);
    bytes.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    ShopRequest {
        method: Method::Post,
        url: join_url(base_url, PATH_DETECT),
        body: Body::Multipart {
            content_type: format!("{MULTIPART_PREFIX}{boundary}"),
            bytes,
        },
    }
}

pub fn build_chat_request(
    base_url: &str,
    message: &str,
    product: Option<&DetectionResult>,
) -> ShopRequest {
    // `product_data` is always present; `null` tells the backend there is no product context.
    post_json(
        base_url,
        PATH_CHAT,
        json!({
            "message": message,
            "product_data": product,
        }),
    )
}

pub fn build_recommend_request(base_url: &str, question: &str) -> ShopRequest {
    post_json(base_url, PATH_RECOMMEND, json!({ "question": question }))
}

pub fn build_health_request(base_url: &str) -> ShopRequest {
    ShopRequest {
        method: Method::Get,
        url: join_url(base_url, PATH_HEALTH),
        body: Body::None,
    }
}

fn post_json(base_url: &str, path: &str, payload: serde_json::Value) -> ShopRequest {
    ShopRequest {
        method: Method::Post,
        url: join_url(base_url, path),
        body: Body::Json(payload),
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// One form-data part carrying the image under `name`.
fn append_file(out: &mut Vec<u8>, boundary: &str, name: &str, image: &ImagePayload) {
    let head = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
        escape_quoted(&image.filename),
        image.content_type
    );
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(&image.bytes);
    out.extend_from_slice(b"\r\n");
}

fn escape_quoted(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg() -> ImagePayload {
        ImagePayload::new(vec![0xFFu8, 0xD8, 0xFF, 0xE0], "image/jpeg", "captured-image.jpg")
    }

    fn json_body(req: &ShopRequest) -> &serde_json::Value {
        match &req.body {
            Body::Json(v) => v,
            other => panic!("expected json, got {other:?}"),
        }
    }

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(
            join_url("http://localhost:5000/", "/chat"),
            "http://localhost:5000/chat"
        );
        assert_eq!(
            join_url("https://api.example.com/v1", "detect-product"),
            "https://api.example.com/v1/detect-product"
        );
    }

    #[test]
    fn detect_is_multipart_with_file_part() {
        let req = build_detect_request("http://localhost:5000", &jpeg());
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.url, "http://localhost:5000/detect-product");

        let Body::Multipart {
            content_type,
            bytes,
        } = &req.body
        else {
            panic!("expected multipart, got {:?}", req.body);
        };
        let boundary = content_type
            .strip_prefix(MULTIPART_PREFIX)
            .expect("boundary in content type");

        let s = String::from_utf8_lossy(bytes);
        assert!(s.starts_with(&format!("--{boundary}\r\n")));
        assert!(s.contains("name=\"file\"; filename=\"captured-image.jpg\""));
        assert!(s.contains("Content-Type: image/jpeg"));
        assert!(s.ends_with(&format!("--{boundary}--\r\n")));
        assert!(bytes.windows(4).any(|w| w == [0xFF, 0xD8, 0xFF, 0xE0]));
    }

    #[test]
    fn boundaries_differ_per_request() {
        let a = build_detect_request("http://x", &jpeg());
        let b = build_detect_request("http://x", &jpeg());
        assert_ne!(a.body.content_type(), b.body.content_type());
    }

    #[test]
    fn filename_quotes_are_escaped() {
        let img = ImagePayload::new(vec![1u8], "image/png", "a\"b.png");
        let req = build_detect_request("http://x", &img);
        let Body::Multipart { bytes, .. } = &req.body else {
            panic!("expected multipart");
        };
        assert!(String::from_utf8_lossy(bytes).contains("filename=\"a\\\"b.png\""));
    }

    #[test]
    fn chat_without_product_sends_null() {
        let req = build_chat_request("http://localhost:5000", "hi", None);
        assert_eq!(req.url, "http://localhost:5000/chat");
        let v = json_body(&req);
        assert_eq!(v["message"], "hi");
        assert!(v.get("product_data").is_some());
        assert!(v["product_data"].is_null());
    }

    #[test]
    fn chat_with_product_sends_detection() {
        let d = DetectionResult {
            name: "Widget".into(),
            brand: "Acme".into(),
            price: 19.99,
            confidence: 0.85,
        };
        let req = build_chat_request("http://localhost:5000", "is it cheap?", Some(&d));
        let v = json_body(&req);
        assert_eq!(v["product_data"]["name"], "Widget");
        assert_eq!(v["product_data"]["brand"], "Acme");
        assert_eq!(v["product_data"]["price"], 19.99);
    }

    #[test]
    fn recommend_and_health_shapes() {
        let req = build_recommend_request("http://h/", "best running shoes?");
        assert_eq!(req.url, "http://h/recommend");
        assert_eq!(json_body(&req)["question"], "best running shoes?");

        let req = build_health_request("http://h");
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.url, "http://h/health");
        assert_eq!(req.body, Body::None);
    }
}
