use std::path::PathBuf;

use serde::Serialize;

use crate::constants;

/// How product entries are laid out in the transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProductLayout {
    /// `name - price (offer)` lines inside `You:`/`Bot:` paragraphs.
    Plain,
    /// Product cards with image, badges and an add-to-cart action.
    #[default]
    Rich,
}

/// What happens when a submission arrives while another is still pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OverlapPolicy {
    /// Requests overlap; replies are shown in arrival order.
    #[default]
    Allow,
    /// The new submission is dropped without touching the transcript.
    Reject,
}

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub backend_url: String,
    pub layout: ProductLayout,
    pub currency: String,
    pub overlap: OverlapPolicy,
    /// Directory holding `widget.html`/`message.html` overrides. When unset
    /// the templates compiled into the binary are used.
    pub template_dir: Option<PathBuf>,
}

impl WidgetConfig {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            ..Self::default()
        }
    }

    pub fn with_layout(mut self, layout: ProductLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            backend_url: constants::BACKEND_URL.clone(),
            layout: ProductLayout::default(),
            currency: constants::CURRENCY.clone(),
            overlap: OverlapPolicy::default(),
            template_dir: None,
        }
    }
}
