//! Conversation state and the streaming exchange that fills it.
mod decoder;
mod models;
mod session;
mod transcript;

pub use decoder::Utf8Decoder;
pub use models::{Message, Sender};
pub use session::{
    ChatSession, ChatSessionBuilder, ERROR_MESSAGE, Exchange, Outcome, SessionEvent, Status,
};
pub use transcript::Transcript;
