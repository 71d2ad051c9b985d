pub mod chat;
pub mod client;
pub mod config;
pub mod constants;
pub mod model;
pub mod render;
pub mod transcript;
pub mod web_server;
pub mod widget;

pub use config::{OverlapPolicy, ProductLayout, WidgetConfig};
pub use transcript::{ChatMessage, MessageContent, Sender, Transcript};
pub use widget::{CartOutcome, ChatWidget, Key, SubmitOutcome};
