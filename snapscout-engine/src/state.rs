use serde::{Deserialize, Serialize};
use snapscout_core::chat::{ChatMessage, ChatRole};
use snapscout_core::error::BackendError;
use snapscout_core::product::DetectionResult;
use snapscout_core::types::{ActiveTab, Answer, HealthStatus, ImagePayload, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    Detecting,
    Chatting,
    Recommending,
    CheckingHealth,
}

impl Stage {
    pub fn is_busy(&self) -> bool {
        !matches!(self, Stage::Idle)
    }

    // Stable label for display; not derived from `Debug`.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Detecting => "detecting",
            Stage::Chatting => "chatting",
            Stage::Recommending => "recommending",
            Stage::CheckingHealth => "checking_health",
        }
    }
}

/// The single view state of a session. Only `ViewStore` mutates it.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub active_tab: ActiveTab,
    pub stage: Stage,
    pub pending_image: Option<ImagePayload>,
    pub detection: Option<DetectionResult>,
    pub transcript: Vec<ChatMessage>,
    pub last_reply_sources: Vec<Source>,
    pub last_answer: Option<Answer>,
    pub backend_status: Option<HealthStatus>,
    pub last_error: Option<String>,
}

impl ViewState {
    pub fn busy(&self) -> bool {
        self.stage.is_busy()
    }

    pub fn assistant_replies(&self) -> impl Iterator<Item = &ChatMessage> {
        self.transcript
            .iter()
            .filter(|m| m.role == ChatRole::Assistant)
    }

    /// Chat header line, e.g. "Analyzing: Widget (Acme)".
    pub fn chat_subject(&self) -> Option<String> {
        self.detection
            .as_ref()
            .map(|d| format!("Analyzing: {} ({})", d.name, d.brand))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Busy,
    EmptyMessage,
}

/// Result of a transition request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The call was issued and succeeded; state was committed.
    Completed,
    /// The call was issued and failed; state was restored to `Idle`.
    Failed(BackendError),
    /// The intent was not accepted; nothing was issued.
    Dropped(DropReason),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, Outcome::Dropped(_))
    }
}
