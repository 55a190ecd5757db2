//! Test utilities for integration tests
use std::sync::Arc;

use tokio::sync::mpsc;

use docchat::backend::HttpBackend;
use docchat::chat::{ChatSession, SessionEvent};

/// Creates a session talking to the backend at `url` along with the
/// receiving end of its event channel.
pub fn test_session(url: &str) -> (ChatSession, mpsc::UnboundedReceiver<SessionEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let backend = Arc::new(HttpBackend::new(url));
    let session = ChatSession::builder(backend).events(tx).build();
    (session, rx)
}

/// Collects every event that has been sent so far.
pub fn drain_events(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Text of every `Updated` event in order.
pub fn updated_texts(events: &[SessionEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Updated { message, .. } => Some(message.text().to_string()),
            _ => None,
        })
        .collect()
}
