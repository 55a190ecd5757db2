//! The core models for a conversation with the document Q&A backend.
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "bot")]
    Bot,
}

/// A single entry in the transcript.
///
/// The sender never changes after creation. User text is fixed at
/// creation, bot text only grows by appending while its response is
/// streaming.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Message {
    text: String,
    sender: Sender,
}

impl Message {
    pub fn new(sender: Sender, text: &str) -> Self {
        Message {
            text: text.to_string(),
            sender,
        }
    }

    pub fn user(text: &str) -> Self {
        Self::new(Sender::User, text)
    }

    /// Empty bot message that receives a streamed response.
    pub fn placeholder() -> Self {
        Self::new(Sender::Bot, "")
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }

    /// Returns a copy with `chunk` appended to the text.
    pub(crate) fn appended(&self, chunk: &str) -> Self {
        let mut text = String::with_capacity(self.text.len() + chunk.len());
        text.push_str(&self.text);
        text.push_str(chunk);
        Message {
            text,
            sender: self.sender,
        }
    }

    /// Returns a copy with the text replaced wholesale.
    pub(crate) fn replaced(&self, text: &str) -> Self {
        Message {
            text: text.to_string(),
            sender: self.sender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_serialization() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), r#""user""#);
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), r#""bot""#);
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("Hello world");
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"text":"Hello world","sender":"user"}"#
        );
    }

    #[test]
    fn test_message_deserialization() {
        let json = r#"{"text":"Hi","sender":"bot"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sender(), Sender::Bot);
        assert_eq!(msg.text(), "Hi");
    }

    #[test]
    fn test_placeholder_is_empty_bot() {
        let msg = Message::placeholder();
        assert!(msg.is_bot());
        assert_eq!(msg.text(), "");
    }

    #[test]
    fn test_appended_keeps_sender() {
        let msg = Message::placeholder().appended("This").appended(" is");
        assert_eq!(msg.text(), "This is");
        assert_eq!(msg.sender(), Sender::Bot);
    }

    #[test]
    fn test_replaced_keeps_sender() {
        let msg = Message::placeholder().appended("partial").replaced("error");
        assert_eq!(msg.text(), "error");
        assert!(msg.is_bot());
    }
}
