//! The chat widget controller: input field, transcript and the two backend
//! operations.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use tracing::{debug, info, warn};

use crate::client::BackendClient;
use crate::config::{OverlapPolicy, WidgetConfig};
use crate::constants;
use crate::model::ProductId;
use crate::render::Renderer;
use crate::transcript::{ChatMessage, Transcript};

/// Key events delivered while the input field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// Another submission was pending under `OverlapPolicy::Reject`.
    Rejected,
    /// The backend answered and its reply was appended.
    Replied,
    /// The request failed and the connection error was appended.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
    Added,
    Declined,
    Failed,
}

struct WidgetInner {
    client: BackendClient,
    renderer: Renderer,
    overlap: OverlapPolicy,
    transcript: Mutex<Transcript>,
    input: Mutex<String>,
    in_flight: AtomicUsize,
}

/// Cloneable handle to one widget. Clones share the transcript.
#[derive(Clone)]
pub struct ChatWidget {
    inner: Arc<WidgetInner>,
}

/// Counts a submission as pending for as long as it lives.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ChatWidget {
    pub fn new(config: &WidgetConfig) -> Self {
        info!(backend = %config.backend_url, layout = ?config.layout, "Initializing chat widget");
        Self {
            inner: Arc::new(WidgetInner {
                client: BackendClient::new(&config.backend_url),
                renderer: Renderer::new(config),
                overlap: config.overlap,
                transcript: Mutex::new(Transcript::with_greeting()),
                input: Mutex::new(String::new()),
                in_flight: AtomicUsize::new(0),
            }),
        }
    }

    /// Snapshot of the transcript.
    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.inner.transcript).messages().to_vec()
    }

    pub fn transcript_len(&self) -> usize {
        lock(&self.inner.transcript).len()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.inner.renderer
    }

    /// Renders the current transcript as the full widget page.
    pub fn render_page(&self, title: &str) -> Result<String, minijinja::Error> {
        let messages = self.messages();
        self.inner.renderer.render_page(title, &messages)
    }

    pub fn input(&self) -> String {
        lock(&self.inner.input).clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        *lock(&self.inner.input) = text.into();
    }

    /// True while at least one submission waits for the backend.
    pub fn is_awaiting(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst) > 0
    }

    fn append(&self, message: ChatMessage) {
        lock(&self.inner.transcript).push(message);
    }

    /// Enter submits the current input; other keys edit it.
    pub async fn handle_key(&self, key: Key) -> Option<SubmitOutcome> {
        match key {
            Key::Char(c) => {
                lock(&self.inner.input).push(c);
                None
            }
            Key::Backspace => {
                lock(&self.inner.input).pop();
                None
            }
            Key::Enter => {
                let text = self.input();
                Some(self.submit(&text).await)
            }
        }
    }

    /// Sends one chat message. The user message is appended before the
    /// request goes out; the reply is appended when it arrives.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let message = text.trim();
        if message.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let reserved = self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        let _in_flight = InFlight(&self.inner.in_flight);
        if reserved > 0 && self.inner.overlap == OverlapPolicy::Reject {
            debug!(pending = reserved, "Rejecting submission while another is pending");
            return SubmitOutcome::Rejected;
        }

        self.append(ChatMessage::user(message));
        lock(&self.inner.input).clear();

        match self.inner.client.chat(message).await {
            Ok(reply) => {
                let mut transcript = lock(&self.inner.transcript);
                transcript.push(ChatMessage::bot_markup(
                    reply.reply.unwrap_or_else(|| constants::NO_REPLY_FALLBACK.to_string()),
                ));
                for product in reply.products {
                    transcript.push(ChatMessage::product(product));
                }
                if let Some(cart) = reply.cart {
                    transcript.push(ChatMessage::cart(cart));
                }
                SubmitOutcome::Replied
            }
            Err(e) => {
                warn!("Chat request failed: {:#}", anyhow::Error::from(e));
                self.append(ChatMessage::bot(constants::CONNECTION_ERROR));
                SubmitOutcome::Failed
            }
        }
    }

    /// Asks the backend to add a product. No local cart state is kept.
    pub async fn add_to_cart(&self, id: &ProductId) -> CartOutcome {
        match self.inner.client.add_to_cart(id).await {
            Ok(ack) if ack.success => {
                self.append(ChatMessage::bot(constants::CART_ADDED));
                CartOutcome::Added
            }
            Ok(_) => {
                self.append(ChatMessage::bot(constants::CART_DECLINED));
                CartOutcome::Declined
            }
            Err(e) => {
                warn!(%id, "Add to cart failed: {:#}", anyhow::Error::from(e));
                self.append(ChatMessage::bot(constants::CART_ERROR));
                CartOutcome::Failed
            }
        }
    }

    /// Replaces the whole transcript with the greeting.
    pub fn clear_history(&self) {
        lock(&self.inner.transcript).clear_to_greeting();
        info!("Chat history cleared");
    }
}
