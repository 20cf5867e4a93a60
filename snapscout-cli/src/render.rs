//! Plain-text rendering of the view state.

use chrono::{Local, TimeZone};
use snapscout_capture::{Facing, Preview};
use snapscout_core::chat::{ChatMessage, ChatRole, DeliveryStatus, SUGGESTED_PROMPTS};
use snapscout_core::product::{DetectionResult, ProductPanel};
use snapscout_core::types::{ActiveTab, Source};
use snapscout_engine::{DropReason, Outcome, ViewState};
use std::fmt::Write as _;

/// Which transition a report is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Detect,
    Chat,
    Ask,
    Health,
}

impl Call {
    fn label(&self) -> &'static str {
        match self {
            Call::Detect => "detect",
            Call::Chat => "chat",
            Call::Ask => "ask",
            Call::Health => "health",
        }
    }
}

pub const HELP: &str = "\
commands:
  capture            take a photo with the camera and detect the product
  upload <path>      use an image file instead of the camera
  retake             discard the current photo
  flip               switch between front and rear camera
  tab capture|chat   switch tabs
  say <text>         send a chat message (on the chat tab, plain text works too)
  suggest [n]        list suggested questions, or send number n
  ask <question>     one-shot recommendation question
  health             check the backend
  show               redraw the current tab
  help               this text
  quit               leave";

pub fn prompt(state: &ViewState) -> String {
    if state.busy() {
        format!("snapscout[{}|{}...]> ", state.active_tab.as_str(), state.stage.label())
    } else {
        format!("snapscout[{}]> ", state.active_tab.as_str())
    }
}

pub fn product_panel(d: &DetectionResult) -> String {
    let p = ProductPanel::from_detection(d);
    let mut out = String::new();
    let _ = writeln!(out, "{}", p.name);
    let _ = writeln!(out, "  {}  ({})", p.brand, p.match_label);
    let _ = writeln!(out, "  AI Recommendation [{}]", p.recommendation.as_str());
    let _ = writeln!(out, "    {}", p.recommendation.advice());
    let _ = writeln!(out, "  Current Price  {}", p.price_label);
    let _ = write!(out, "  Avg. Price     {}", p.average_price_label);
    out
}

pub fn preview(p: &Preview) -> String {
    match p {
        Preview::Live { facing } => format!("camera live ({})", facing_name(*facing)),
        Preview::Still(img) => format!(
            "photo held: {} ({}, {} bytes); `retake` to go back to the camera",
            img.filename,
            img.content_type,
            img.len()
        ),
    }
}

pub fn facing_name(f: Facing) -> &'static str {
    match f {
        Facing::Front => "front camera",
        Facing::Rear => "rear camera",
    }
}

pub fn clock(unix_ms: i64) -> String {
    match Local.timestamp_millis_opt(unix_ms).single() {
        Some(t) => t.format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

pub fn message(m: &ChatMessage) -> String {
    let who = match m.role {
        ChatRole::User => "you",
        ChatRole::Assistant => "assistant",
    };
    let marker = match m.status {
        DeliveryStatus::Pending => " (sending)",
        DeliveryStatus::Delivered => "",
        DeliveryStatus::Failed => " (not delivered)",
    };
    format!("[{}] {who}: {}{marker}", clock(m.created_at_unix_ms), m.text)
}

pub fn chat_panel(state: &ViewState) -> String {
    let mut out = String::new();
    let header = state
        .chat_subject()
        .unwrap_or_else(|| "AI Shopping Assistant".to_string());
    let _ = writeln!(out, "== {header} ==");
    for m in &state.transcript {
        let _ = writeln!(out, "{}", message(m));
    }
    if state.transcript.len() <= 1 {
        out.push_str(&suggestions());
    }
    out.trim_end().to_string()
}

pub fn suggestions() -> String {
    let mut out = String::from("suggested:\n");
    for (i, p) in SUGGESTED_PROMPTS.iter().enumerate() {
        let _ = writeln!(out, "  {}. {p}", i + 1);
    }
    out
}

pub fn capture_panel(state: &ViewState, preview_line: &str) -> String {
    let mut out = format!("== Capture ==\n{preview_line}");
    if let Some(d) = &state.detection {
        out.push('\n');
        out.push_str(&product_panel(d));
    }
    out
}

pub fn sources(sources: &[Source]) -> Option<String> {
    let ids: Vec<&str> = sources.iter().filter_map(|s| s.id.as_deref()).collect();
    if ids.is_empty() {
        None
    } else {
        Some(format!("  sources: {}", ids.join(", ")))
    }
}

/// What to print when a background call settles.
pub fn report(call: Call, outcome: &Outcome, state: &ViewState) -> String {
    match outcome {
        Outcome::Dropped(DropReason::Busy) => {
            format!("{}: another request is still running; ignored", call.label())
        }
        Outcome::Dropped(DropReason::EmptyMessage) => "nothing to send".to_string(),
        Outcome::Failed(e) => format!("{} failed: {e}", call.label()),
        Outcome::Completed => match call {
            Call::Detect => state
                .detection
                .as_ref()
                .map(product_panel)
                .unwrap_or_default(),
            Call::Chat => {
                let mut out = state
                    .transcript
                    .last()
                    .map(message)
                    .unwrap_or_default();
                if let Some(s) = sources(&state.last_reply_sources) {
                    out.push('\n');
                    out.push_str(&s);
                }
                out
            }
            Call::Ask => match &state.last_answer {
                Some(a) => {
                    let mut out = format!("Q: {}\nA: {}", a.question, a.answer);
                    if let Some(s) = sources(&a.sources) {
                        out.push('\n');
                        out.push_str(&s);
                    }
                    out
                }
                None => String::new(),
            },
            Call::Health => match &state.backend_status {
                Some(h) => format!(
                    "backend {} ({})",
                    h.status().unwrap_or("unknown"),
                    h.service().unwrap_or("unnamed service")
                ),
                None => String::new(),
            },
        },
    }
}

pub fn tab_title(tab: ActiveTab) -> &'static str {
    match tab {
        ActiveTab::Capture => "Capture",
        ActiveTab::Chat => "Assistant",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapscout_core::error::BackendError;
    use snapscout_core::types::ImagePayload;
    use snapscout_engine::Stage;

    fn widget() -> DetectionResult {
        DetectionResult {
            name: "Widget".into(),
            brand: "Acme".into(),
            price: 19.99,
            confidence: 0.85,
        }
    }

    #[test]
    fn product_panel_shows_prices_and_tier() {
        let text = product_panel(&widget());
        assert!(text.contains("Widget"));
        assert!(text.contains("85% Match"));
        assert!(text.contains("[favorable]"));
        assert!(text.contains("$19.99"));
        assert!(text.contains("$18.99"));
    }

    #[test]
    fn prompt_shows_busy_stage() {
        let mut st = ViewState::default();
        assert_eq!(prompt(&st), "snapscout[capture]> ");
        st.stage = Stage::Chatting;
        st.active_tab = ActiveTab::Chat;
        assert_eq!(prompt(&st), "snapscout[chat|chatting...]> ");
    }

    #[test]
    fn messages_carry_delivery_markers() {
        let mut m = ChatMessage::user_pending("hi");
        assert!(message(&m).ends_with("you: hi (sending)"));
        m.status = DeliveryStatus::Failed;
        assert!(message(&m).ends_with("(not delivered)"));
        assert!(message(&ChatMessage::assistant("Hello!")).ends_with("assistant: Hello!"));
    }

    #[test]
    fn clock_is_hours_and_minutes() {
        let c = clock(1_700_000_000_000);
        assert_eq!(c.len(), 5);
        assert_eq!(&c[2..3], ":");
    }

    #[test]
    fn chat_header_names_detected_product() {
        let mut st = ViewState::default();
        assert!(chat_panel(&st).starts_with("== AI Shopping Assistant =="));
        st.detection = Some(widget());
        assert!(chat_panel(&st).starts_with("== Analyzing: Widget (Acme) =="));
    }

    #[test]
    fn reports_failures_and_drops() {
        let st = ViewState::default();
        let failed = Outcome::Failed(BackendError::transport("connection refused"));
        assert_eq!(
            report(Call::Detect, &failed, &st),
            "detect failed: transport error: connection refused"
        );
        assert!(
            report(Call::Chat, &Outcome::Dropped(DropReason::Busy), &st).contains("ignored")
        );
    }

    #[test]
    fn preview_lines() {
        assert_eq!(
            preview(&Preview::Live {
                facing: Facing::Rear
            }),
            "camera live (rear camera)"
        );
        let img = ImagePayload::new(vec![1u8, 2], "image/png", "x.png");
        assert!(preview(&Preview::Still(img)).starts_with("photo held: x.png"));
    }
}
