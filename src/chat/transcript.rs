//! Ordered record of the conversation.
use anyhow::{Error, Result, anyhow};

use super::models::Message;

/// Append-only list of messages where only the last entry may be
/// replaced. Insertion order is display order.
#[derive(Default, Clone, Debug)]
pub struct Transcript(Vec<Message>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn new_with_messages(messages: Vec<Message>) -> Self {
        Self(messages)
    }

    /// Adds a message to the end and returns its index.
    pub fn append(&mut self, msg: Message) -> usize {
        self.0.push(msg);
        self.0.len() - 1
    }

    /// Replaces the last message with `mutator(last)`. Every earlier
    /// entry is left untouched. Errors if the transcript is empty.
    pub fn update_last<F>(&mut self, mutator: F) -> Result<&Message, Error>
    where
        F: FnOnce(&Message) -> Message,
    {
        let last = self
            .0
            .last_mut()
            .ok_or(anyhow!("Can't update the last message of an empty transcript"))?;
        *last = mutator(last);
        Ok(last)
    }

    pub fn last(&self) -> Option<&Message> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.0.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::models::Sender;

    #[test]
    fn test_append_returns_index() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.append(Message::user("a")), 0);
        assert_eq!(transcript.append(Message::placeholder()), 1);
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_update_last_only_touches_tail() {
        let mut transcript = Transcript::new_with_messages(vec![
            Message::user("a"),
            Message::new(Sender::Bot, "answer a"),
            Message::user("b"),
            Message::placeholder(),
        ]);
        let before = transcript.messages();

        let updated = transcript.update_last(|m| m.appended("answer b")).unwrap();
        assert_eq!(updated.text(), "answer b");

        let after = transcript.messages();
        assert_eq!(before[..3], after[..3]);
        assert_eq!(after[3].text(), "answer b");
    }

    #[test]
    fn test_update_last_on_empty_fails() {
        let mut transcript = Transcript::new();
        let result = transcript.update_last(|m| m.appended("x"));
        assert!(result.is_err());
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_iter_in_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("first"));
        transcript.append(Message::new(Sender::Bot, "second"));
        let texts: Vec<&str> = transcript.iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }
}
