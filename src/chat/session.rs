//! Drives one question/answer exchange at a time against a
//! `ChatBackend`, streaming the answer into the transcript.
//!
//! An exchange moves through `Idle -> Submitting -> Streaming ->
//! (Completed | Failed) -> Idle`. Submitting happens synchronously in
//! `ChatSession::begin` so the user message, the empty bot
//! placeholder, and the busy status all become visible together before
//! any response data arrives. Streaming happens in `Exchange::run`.
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Error, Result};
use futures_util::StreamExt;
use tokio::sync::mpsc;

use super::decoder::Utf8Decoder;
use super::models::Message;
use super::transcript::Transcript;
use crate::backend::SharedChatBackend;

/// Shown in place of the answer when an exchange fails.
pub const ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please check the console.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Busy,
}

/// Notifications for anything observing the session, e.g. a UI that
/// re-renders the latest message and scrolls to it.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Appended { index: usize, message: Message },
    Updated { index: usize, message: Message },
    StatusChanged(Status),
}

/// How an exchange ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The response had no readable body. The placeholder stays empty.
    NoBody,
    /// The placeholder text was replaced by `ERROR_MESSAGE`.
    Failed,
}

#[derive(Default)]
struct SessionState {
    transcript: Transcript,
    status: Status,
    input: String,
}

/// A single conversation with the backend.
///
/// Cloning is cheap and every clone shares the same transcript and
/// status, so a UI can hold one while an exchange runs on another.
///
/// Use `ChatSession::builder()` to construct a `ChatSession`.
#[derive(Clone)]
pub struct ChatSession {
    backend: SharedChatBackend,
    state: Arc<RwLock<SessionState>>,
    tx: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl ChatSession {
    pub fn builder(backend: SharedChatBackend) -> ChatSessionBuilder {
        ChatSessionBuilder::new(backend)
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: SessionEvent) {
        if let Some(tx) = &self.tx {
            // Nobody listening is fine, the session state is the
            // source of truth
            let _ = tx.send(event);
        }
    }

    pub fn status(&self) -> Status {
        self.read().status
    }

    pub fn is_busy(&self) -> bool {
        self.status() == Status::Busy
    }

    pub fn transcript(&self) -> Transcript {
        self.read().transcript.clone()
    }

    /// True while waiting on the first bit of an answer.
    pub fn show_pending_indicator(&self) -> bool {
        let state = self.read();
        state.status == Status::Busy
            && state
                .transcript
                .last()
                .is_some_and(|m| m.is_bot() && m.text().is_empty())
    }

    pub fn input(&self) -> String {
        self.read().input.clone()
    }

    pub fn set_input(&self, text: &str) {
        self.write().input = text.to_string();
    }

    /// Admits a new exchange for `text` and performs the submitting
    /// step. Returns `None` without touching any state when `text` is
    /// blank or another exchange is still in flight.
    #[must_use]
    pub fn begin(&self, text: &str) -> Option<Exchange> {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring blank submission");
            return None;
        }

        let events = {
            let mut state = self.write();
            if state.status == Status::Busy {
                tracing::debug!("Ignoring submission while an exchange is in flight");
                return None;
            }
            let user_msg = Message::user(text);
            let placeholder = Message::placeholder();
            let user_index = state.transcript.append(user_msg.clone());
            let bot_index = state.transcript.append(placeholder.clone());
            state.input.clear();
            state.status = Status::Busy;

            [
                SessionEvent::Appended {
                    index: user_index,
                    message: user_msg,
                },
                SessionEvent::Appended {
                    index: bot_index,
                    message: placeholder,
                },
                SessionEvent::StatusChanged(Status::Busy),
            ]
        };

        for event in events {
            self.notify(event);
        }

        Some(Exchange {
            session: self.clone(),
            message: text.to_string(),
            finished: false,
        })
    }

    /// Submits `text` and streams the answer to completion. Returns
    /// `None` if the submission was not admitted.
    pub async fn submit(&self, text: &str) -> Option<Outcome> {
        let exchange = self.begin(text)?;
        Some(exchange.run().await)
    }

    /// Submits whatever is in the input buffer. The buffer is only
    /// cleared if the submission is admitted.
    pub async fn submit_input(&self) -> Option<Outcome> {
        let text = self.input();
        self.submit(&text).await
    }

    fn update_last<F>(&self, mutator: F) -> Result<(), Error>
    where
        F: FnOnce(&Message) -> Message,
    {
        let event = {
            let mut state = self.write();
            let index = state.transcript.len().saturating_sub(1);
            let message = state.transcript.update_last(mutator)?.clone();
            SessionEvent::Updated { index, message }
        };
        self.notify(event);
        Ok(())
    }

    fn set_status(&self, status: Status) {
        self.write().status = status;
        self.notify(SessionEvent::StatusChanged(status));
    }
}

/// An admitted exchange whose request has not been issued yet.
///
/// The session stays busy until the exchange finishes or is dropped.
/// Dropping it early, including aborting a task running `run`, puts
/// the session back to idle and leaves the bot message as it was.
#[must_use = "the session stays busy until the exchange is run or dropped"]
pub struct Exchange {
    session: ChatSession,
    message: String,
    finished: bool,
}

impl Exchange {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Issues the request and streams the answer into the placeholder.
    /// Errors never escape: they are logged and the placeholder text is
    /// replaced with `ERROR_MESSAGE`. The session is always idle again
    /// when this returns.
    pub async fn run(mut self) -> Outcome {
        let outcome = match self.stream().await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    "Error fetching chat response: {}. Root cause: {}",
                    e,
                    e.root_cause()
                );
                if let Err(e) = self.session.update_last(|m| m.replaced(ERROR_MESSAGE)) {
                    tracing::error!("Failed to record chat error: {}", e);
                }
                Outcome::Failed
            }
        };

        self.finish();
        tracing::debug!("Exchange finished: {:?}", outcome);
        outcome
    }

    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            self.session.set_status(Status::Idle);
        }
    }

    async fn stream(&self) -> Result<Outcome, Error> {
        let Some(mut stream) = self.session.backend.send(&self.message).await? else {
            tracing::debug!("Response has no body");
            return Ok(Outcome::NoBody);
        };

        // One decoder for the whole body so characters split across
        // increments are reassembled
        let mut decoder = Utf8Decoder::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            let text = decoder.decode(&chunk);
            self.session.update_last(|m| m.appended(&text))?;
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            self.session.update_last(|m| m.appended(&tail))?;
        }

        Ok(Outcome::Completed)
    }
}

impl Drop for Exchange {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("Exchange dropped before it finished");
            self.finish();
        }
    }
}

pub struct ChatSessionBuilder {
    backend: SharedChatBackend,
    tx: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl ChatSessionBuilder {
    pub fn new(backend: SharedChatBackend) -> Self {
        Self { backend, tx: None }
    }

    /// Send a `SessionEvent` for every change to the session.
    pub fn events(mut self, transmitter: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.tx = Some(transmitter);
        self
    }

    pub fn build(self) -> ChatSession {
        ChatSession {
            backend: self.backend,
            state: Arc::new(RwLock::new(SessionState::default())),
            tx: self.tx,
        }
    }
}
