//! Transport-neutral description of one backend call.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Clone, PartialEq)]
pub enum Body {
    None,
    Json(serde_json::Value),
    /// Pre-encoded multipart payload; `content_type` carries the boundary.
    Multipart { content_type: String, bytes: Vec<u8> },
}

impl Body {
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Body::None => None,
            Body::Json(_) => Some("application/json"),
            Body::Multipart { content_type, .. } => Some(content_type),
        }
    }
}

// Bodies carry user photos and chat text. Debug output names the JSON keys and the
// multipart size, never the content.
impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::None => f.write_str("None"),
            Body::Json(v) => {
                let keys: Vec<&str> = v
                    .as_object()
                    .map(|o| o.keys().map(String::as_str).collect())
                    .unwrap_or_default();
                write!(f, "Json(keys={keys:?})")
            }
            Body::Multipart { bytes, .. } => write!(f, "Multipart(bytes={})", bytes.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShopRequest {
    pub method: Method,
    pub url: String,
    pub body: Body,
}
