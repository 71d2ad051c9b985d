//! Maps a transcript to markup. The transcript is the data; the page is only
//! a render target.

use std::path::PathBuf;

use minijinja::{context, path_loader, Environment};
use minijinja_autoreload::AutoReloader;

use crate::config::{ProductLayout, WidgetConfig};
use crate::transcript::{ChatMessage, MessageContent};

const WIDGET_TEMPLATE: &str = include_str!("../templates/widget.html");
const MESSAGE_TEMPLATE: &str = include_str!("../templates/message.html");
const PRODUCT_CARD_TEMPLATE: &str = include_str!("../templates/product_card.html");
const CART_TEMPLATE: &str = include_str!("../templates/cart.html");

pub struct Renderer {
    templates: AutoReloader,
    layout: ProductLayout,
    currency: String,
}

// Minijinja Environment setup
fn create_minijinja_env(template_dir: Option<PathBuf>) -> AutoReloader {
    AutoReloader::new(move |notifier| {
        let mut env = Environment::new();
        match &template_dir {
            Some(dir) => {
                env.set_loader(path_loader(dir));
                // Watch the override directory for changes
                notifier.watch_path(dir, true);
            }
            None => {
                env.add_template("widget.html", WIDGET_TEMPLATE)?;
                env.add_template("message.html", MESSAGE_TEMPLATE)?;
                env.add_template("product_card.html", PRODUCT_CARD_TEMPLATE)?;
                env.add_template("cart.html", CART_TEMPLATE)?;
            }
        }
        env.add_filter("number", format_number);
        Ok(env)
    })
}

impl Renderer {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            templates: create_minijinja_env(config.template_dir.clone()),
            layout: config.layout,
            currency: config.currency.clone(),
        }
    }

    /// Full widget page for the given transcript.
    pub fn render_page(&self, title: &str, messages: &[ChatMessage]) -> Result<String, minijinja::Error> {
        let env = self.templates.acquire_env()?;
        env.get_template("widget.html")?.render(context! {
            title => title,
            messages => messages,
            layout => self.layout,
            currency => &self.currency,
        })
    }

    /// A single transcript entry.
    pub fn render_message(&self, message: &ChatMessage) -> Result<String, minijinja::Error> {
        let env = self.templates.acquire_env()?;
        env.get_template("message.html")?.render(context! {
            message => message,
            layout => self.layout,
            currency => &self.currency,
        })
    }
}

/// Whole amounts print without decimals, everything else with two.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Terminal rendering of one message body.
pub fn plain_text(message: &ChatMessage, currency: &str) -> String {
    match message.content() {
        MessageContent::Text { text } => text.clone(),
        MessageContent::Markup { html } => strip_markup(html),
        MessageContent::Product { product } => {
            let mut line = format!("{} - {}{}", product.name, currency, format_number(product.price));
            if let Some(offer) = &product.offer {
                line.push_str(&format!(" ({})", offer));
            }
            if let Some(rating) = product.rating {
                line.push_str(&format!(" ★ {}", rating));
            }
            line.push_str(&format!(" [id: {}]", product.id));
            line
        }
        MessageContent::Cart { cart } => {
            let mut lines = vec!["🛒 Your Cart:".to_string()];
            for item in &cart.items {
                lines.push(format!("{} - {}{}", item.name, currency, format_number(item.price)));
            }
            lines.push(format!("Total: {}{}", currency, format_number(cart.total)));
            lines.join("\n")
        }
    }
}

/// Drops tags, turning `<br>` into line breaks.
fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars();
    while let Some(c) = chars.next() {
        if c != '<' {
            out.push(c);
            continue;
        }
        let tag: String = chars.by_ref().take_while(|&c| c != '>').collect();
        let name = tag.trim_start_matches('/').trim().to_ascii_lowercase();
        if name.starts_with("br") {
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}
