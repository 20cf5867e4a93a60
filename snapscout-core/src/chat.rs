use crate::types::{MessageId, now_unix_ms};
use serde::{Deserialize, Serialize};

pub const GREETING: &str = "Hey there! I'm your AI shopping assistant. Take a photo of any item you're interested in, and I'll help you make the smartest buying decision with real-time price analysis and personalized recommendations.";

pub const SUGGESTED_PROMPTS: [&str; 4] = [
    "What's the best time to buy?",
    "Show me price history",
    "Compare with similar items",
    "Any discounts available?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Delivered,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    pub text: String,
    pub created_at_unix_ms: i64,

    // Only user messages ever sit in `Pending`; the store settles them in place.
    pub status: DeliveryStatus,
}

impl ChatMessage {
    pub fn user_pending(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: ChatRole::User,
            text: text.into(),
            created_at_unix_ms: now_unix_ms(),
            status: DeliveryStatus::Pending,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: ChatRole::Assistant,
            text: text.into(),
            created_at_unix_ms: now_unix_ms(),
            status: DeliveryStatus::Delivered,
        }
    }

    pub fn greeting() -> Self {
        Self::assistant(GREETING)
    }
}

/// Trims outgoing chat text; returns `None` when nothing is left to send.
pub fn normalize_outgoing(text: &str) -> Option<String> {
    let t = text.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

pub fn suggested_prompt(index: usize) -> Option<&'static str> {
    SUGGESTED_PROMPTS.get(index).copied()
}
