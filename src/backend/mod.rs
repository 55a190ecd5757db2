//! Transport to the document Q&A backend.
use std::sync::Arc;

use anyhow::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};

mod http;
pub use http::{CHAT_PATH, HttpBackend};

/// Response body as a sequence of raw byte increments.
pub type ByteStream = BoxStream<'static, Result<Bytes, Error>>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

/// Anything that can take a question and hand back the answer as an
/// incremental byte stream.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Issues the request for `message`. Returns `Ok(None)` when the
    /// response has no readable body.
    async fn send(&self, message: &str) -> Result<Option<ByteStream>, Error>;
}

pub type SharedChatBackend = Arc<dyn ChatBackend + 'static>;
