//! Chat session with the advisory service.
//!
//! Holds the transcript and at most one outstanding request. The request runs
//! on a tokio task and its answer is collected by [`AdvisorSession::poll`]
//! from the frame loop, so the transcript is only mutated on the caller's
//! thread.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use shieldguard_providers::{AdvisoryService, FALLBACK_ADVICE};
use shieldguard_types::ChatMessage;

/// First message of every session.
pub const GREETING: &str = "Hello, I am ShieldGuard AI. Ask me anything about protecting your mobile privacy, securing your phone number, or mitigating proximity attacks.";

/// Shown in place of an empty answer.
pub const EMPTY_ADVICE_PLACEHOLDER: &str = "I encountered an error.";

#[derive(Debug)]
pub struct AdvisorSession<S: AdvisoryService> {
    service: Arc<S>,
    messages: Vec<ChatMessage>,
    pending: Option<oneshot::Receiver<String>>,
}

impl<S: AdvisoryService> AdvisorSession<S> {
    #[must_use]
    pub fn new(service: S) -> Self {
        Self {
            service: Arc::new(service),
            messages: vec![ChatMessage::model(GREETING)],
            pending: None,
        }
    }

    /// Send `prompt` to the advisory service.
    ///
    /// Returns `false` without touching the transcript when the prompt is
    /// blank or a previous request is still in flight.
    pub fn submit(&mut self, prompt: &str) -> bool {
        if prompt.trim().is_empty() {
            return false;
        }
        if self.is_busy() {
            tracing::debug!("Advisor request already in flight; ignoring submit");
            return false;
        }

        self.messages.push(ChatMessage::user(prompt));

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!("Cannot request advice outside a tokio runtime: {e}");
                self.messages.push(ChatMessage::model(FALLBACK_ADVICE));
                return true;
            }
        };

        let (tx, rx) = oneshot::channel();
        let service = Arc::clone(&self.service);
        let prompt = prompt.to_owned();
        handle.spawn(async move {
            let advice = service.get_advice(&prompt).await;
            // Receiver is gone only if the session was dropped.
            let _ = tx.send(advice);
        });
        self.pending = Some(rx);
        true
    }

    /// Collect a finished answer, if any. Returns `true` when the transcript
    /// changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.pending.as_mut() else {
            return false;
        };
        let advice = match rx.try_recv() {
            Ok(advice) => advice,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => {
                tracing::error!("Advisor task ended without an answer");
                String::new()
            }
        };
        self.pending = None;
        self.push_answer(advice);
        true
    }

    /// Wait for the in-flight request, then record its answer.
    pub async fn wait_pending(&mut self) {
        let Some(rx) = self.pending.take() else {
            return;
        };
        let advice = rx.await.unwrap_or_default();
        self.push_answer(advice);
    }

    fn push_answer(&mut self, advice: String) {
        let text = if advice.trim().is_empty() {
            EMPTY_ADVICE_PLACEHOLDER.to_owned()
        } else {
            advice
        };
        self.messages.push(ChatMessage::model(text));
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }
}
