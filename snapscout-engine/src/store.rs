use crate::state::{DropReason, Outcome, Stage, ViewState};
use crate::traits::ShopBackend;
use snapscout_core::chat::{ChatMessage, DeliveryStatus, normalize_outgoing};
use snapscout_core::types::{ActiveTab, ImagePayload, MessageId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::watch;

/// A transition whose busy stage is already reserved; awaiting it issues the call.
pub type PendingCall = Pin<Box<dyn Future<Output = Outcome> + Send + 'static>>;

/// Owner of the session's `ViewState`.
///
/// Every mutation goes through a named transition. At most one backend call is in
/// flight: intents that arrive while busy are dropped, never queued. Observers get
/// committed snapshots through `subscribe`.
#[derive(Clone)]
pub struct ViewStore {
    backend: Arc<dyn ShopBackend>,
    state: Arc<watch::Sender<ViewState>>,
}

impl ViewStore {
    pub fn new(backend: Arc<dyn ShopBackend>) -> Self {
        Self::with_state(backend, ViewState::default())
    }

    /// A store whose transcript opens with the assistant greeting.
    pub fn with_greeting(backend: Arc<dyn ShopBackend>) -> Self {
        let state = ViewState {
            transcript: vec![ChatMessage::greeting()],
            ..ViewState::default()
        };
        Self::with_state(backend, state)
    }

    fn with_state(backend: Arc<dyn ShopBackend>, state: ViewState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self {
            backend,
            state: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().busy()
    }

    pub fn set_tab(&self, tab: ActiveTab) {
        self.state.send_if_modified(|s| {
            if s.active_tab == tab {
                return false;
            }
            s.active_tab = tab;
            true
        });
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.last_error.take().is_some());
    }

    /// `Idle --capture(image)--> Detecting`.
    ///
    /// A failed detection leaves any previous `detection` in place.
    pub async fn submit_image(&self, image: ImagePayload) -> Outcome {
        match self.try_submit_image(image) {
            Some(call) => call.await,
            None => Outcome::Dropped(DropReason::Busy),
        }
    }

    /// Reserves the `Detecting` stage right away and returns the call to drive.
    ///
    /// Returns `None` when busy; nothing is recorded then. Dropping the returned call
    /// without polling it releases the reservation.
    pub fn try_submit_image(&self, image: ImagePayload) -> Option<PendingCall> {
        let pending = image.clone();
        let flight = self.begin(Stage::Detecting, move |s| {
            s.pending_image = Some(pending);
        })?;
        let backend = self.backend.clone();

        Some(Box::pin(async move {
            log::info!(
                "detecting product: {} ({} bytes)",
                image.content_type,
                image.len()
            );

            match backend.detect(&image).await {
                Ok(detection) => {
                    log::info!(
                        "detected {} / {} (confidence {:.2})",
                        detection.name,
                        detection.brand,
                        detection.confidence
                    );
                    flight.settle(|s| {
                        s.detection = Some(detection);
                        s.last_error = None;
                    });
                    Outcome::Completed
                }
                Err(e) => {
                    log::warn!("detect failed: {e}");
                    let msg = e.to_string();
                    flight.settle(|s| s.last_error = Some(msg));
                    Outcome::Failed(e)
                }
            }
        }))
    }

    /// `Idle --sendMessage(text)--> Chatting`.
    ///
    /// The user message is appended as pending before the call is issued and settled in
    /// place when the call resolves. An assistant message is appended only on success.
    pub async fn send_message(&self, text: &str) -> Outcome {
        let Some(text) = normalize_outgoing(text) else {
            log::debug!("dropped chat intent: empty message");
            return Outcome::Dropped(DropReason::EmptyMessage);
        };

        let user = ChatMessage::user_pending(text.clone());
        let user_id = user.id;
        let mut product = None;
        let Some(mut flight) = self.begin(Stage::Chatting, |s| {
            product = s.detection.clone();
            s.transcript.push(user);
        }) else {
            return Outcome::Dropped(DropReason::Busy);
        };
        flight.pending_message = Some(user_id);

        match self.backend.chat(&text, product.as_ref()).await {
            Ok(reply) => {
                flight.settle(|s| {
                    mark_delivery(s, user_id, DeliveryStatus::Delivered);
                    s.transcript.push(ChatMessage::assistant(reply.reply));
                    s.last_reply_sources = reply.sources;
                    s.last_error = None;
                });
                Outcome::Completed
            }
            Err(e) => {
                log::warn!("chat failed: {e}");
                let msg = e.to_string();
                flight.settle(|s| {
                    mark_delivery(s, user_id, DeliveryStatus::Failed);
                    s.last_error = Some(msg);
                });
                Outcome::Failed(e)
            }
        }
    }

    /// One-shot question to the recommendation endpoint. Does not touch the transcript.
    pub async fn ask(&self, question: &str) -> Outcome {
        let Some(question) = normalize_outgoing(question) else {
            return Outcome::Dropped(DropReason::EmptyMessage);
        };
        let Some(flight) = self.begin(Stage::Recommending, |_| {}) else {
            return Outcome::Dropped(DropReason::Busy);
        };

        match self.backend.recommend(&question).await {
            Ok(answer) => {
                flight.settle(|s| {
                    s.last_answer = Some(answer);
                    s.last_error = None;
                });
                Outcome::Completed
            }
            Err(e) => {
                log::warn!("recommend failed: {e}");
                let msg = e.to_string();
                flight.settle(|s| s.last_error = Some(msg));
                Outcome::Failed(e)
            }
        }
    }

    pub async fn check_health(&self) -> Outcome {
        let Some(flight) = self.begin(Stage::CheckingHealth, |_| {}) else {
            return Outcome::Dropped(DropReason::Busy);
        };

        match self.backend.health().await {
            Ok(status) => {
                log::info!("backend health: {:?}", status.status());
                flight.settle(|s| {
                    s.backend_status = Some(status);
                    s.last_error = None;
                });
                Outcome::Completed
            }
            Err(e) => {
                log::warn!("health check failed: {e}");
                let msg = e.to_string();
                flight.settle(|s| {
                    s.backend_status = None;
                    s.last_error = Some(msg);
                });
                Outcome::Failed(e)
            }
        }
    }

    fn begin<F>(&self, stage: Stage, prepare: F) -> Option<InFlight>
    where
        F: FnOnce(&mut ViewState),
    {
        let mut accepted = false;
        self.state.send_if_modified(|s| {
            if s.busy() {
                return false;
            }
            s.stage = stage;
            prepare(s);
            accepted = true;
            true
        });

        if !accepted {
            log::debug!("dropped {} intent: busy", stage.label());
            return None;
        }

        log::info!("stage: idle -> {}", stage.label());
        Some(InFlight {
            state: self.state.clone(),
            stage,
            pending_message: None,
            settled: false,
        })
    }
}

fn mark_delivery(s: &mut ViewState, id: MessageId, status: DeliveryStatus) {
    if let Some(m) = s.transcript.iter_mut().find(|m| m.id == id) {
        m.status = status;
    }
}

// Holds the busy stage for one call. Dropping it without `settle` (the caller's future
// was dropped, or unwound) still returns the store to `Idle`.
struct InFlight {
    state: Arc<watch::Sender<ViewState>>,
    stage: Stage,
    pending_message: Option<MessageId>,
    settled: bool,
}

impl InFlight {
    fn settle<F>(mut self, commit: F)
    where
        F: FnOnce(&mut ViewState),
    {
        self.settled = true;
        self.state.send_modify(|s| {
            commit(s);
            s.stage = Stage::Idle;
        });
        log::info!("stage: {} -> idle", self.stage.label());
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        log::warn!("{} call abandoned before resolution", self.stage.label());
        let pending = self.pending_message;
        self.state.send_modify(|s| {
            if let Some(id) = pending {
                mark_delivery(s, id, DeliveryStatus::Failed);
            }
            s.stage = Stage::Idle;
        });
    }
}
