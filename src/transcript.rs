use chrono::{DateTime, Local};
use serde::Serialize;

use crate::constants;
use crate::model::{CartSummary, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "Bot",
        }
    }
}

/// What a message carries. Product and cart entries keep their structured
/// data so the renderer decides the layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MessageContent {
    /// Plain text, escaped when rendered.
    Text { text: String },
    /// Markup from the backend, rendered as-is.
    Markup { html: String },
    Product { product: Product },
    Cart { cart: CartSummary },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    sender: Sender,
    content: MessageContent,
    timestamp: DateTime<Local>,
}

impl ChatMessage {
    fn new(sender: Sender, content: MessageContent) -> Self {
        Self {
            sender,
            content,
            timestamp: Local::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, MessageContent::Text { text: text.into() })
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, MessageContent::Text { text: text.into() })
    }

    pub fn bot_markup(html: impl Into<String>) -> Self {
        Self::new(Sender::Bot, MessageContent::Markup { html: html.into() })
    }

    pub fn product(product: Product) -> Self {
        Self::new(Sender::Bot, MessageContent::Product { product })
    }

    pub fn cart(cart: CartSummary) -> Self {
        Self::new(Sender::Bot, MessageContent::Cart { cart })
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    /// The text of a `Text` or `Markup` message.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text { text } => Some(text),
            MessageContent::Markup { html } => Some(html),
            _ => None,
        }
    }
}

/// Ordered, append-only list of displayed messages.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript holding only the greeting.
    pub fn with_greeting() -> Self {
        Self {
            messages: vec![ChatMessage::bot(constants::GREETING)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Drops everything and leaves the greeting.
    pub fn clear_to_greeting(&mut self) {
        *self = Self::with_greeting();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_new_is_empty() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.len(), 0);
    }

    #[test]
    fn test_push_keeps_arrival_order() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("Hello"));
        transcript.push(ChatMessage::bot("Hi there!"));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].sender(), Sender::User);
        assert_eq!(transcript.messages()[0].text(), Some("Hello"));
        assert_eq!(transcript.messages()[1].sender(), Sender::Bot);
        assert_eq!(transcript.last().unwrap().text(), Some("Hi there!"));
    }

    #[test]
    fn test_clear_leaves_only_greeting() {
        let mut transcript = Transcript::with_greeting();
        for i in 0..10 {
            transcript.push(ChatMessage::user(format!("message {}", i)));
        }
        transcript.clear_to_greeting();

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].sender(), Sender::Bot);
        assert_eq!(transcript.messages()[0].text(), Some(constants::GREETING));
    }

    #[test]
    fn test_content_serializes_with_kind_tag() {
        let value = serde_json::to_value(ChatMessage::bot_markup("a<br>b")).unwrap();
        assert_eq!(value["sender"], "bot");
        assert_eq!(value["content"]["kind"], "markup");
        assert_eq!(value["content"]["html"], "a<br>b");
    }
}
