// Fixed widget strings and environment-backed defaults.

use std::env;

pub const GREETING: &str = "Hello! I'm your AI shopping assistant. How can I help you?";
pub const NO_REPLY_FALLBACK: &str = "⚠️ No reply from server";
pub const CONNECTION_ERROR: &str = "⚠️ Error connecting to server.";
pub const CART_ADDED: &str = "✅ Item added to cart!";
pub const CART_DECLINED: &str = "❌ Failed to add item to cart.";
pub const CART_ERROR: &str = "⚠️ Error adding to cart.";

pub const PAGE_TITLE: &str = "AI Shopping Assistant";

// Use lazy_static to initialize static variables safely.
lazy_static::lazy_static! {
    pub static ref BACKEND_URL: String = env::var("SHOPCHAT_BACKEND_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    pub static ref CURRENCY: String = env::var("SHOPCHAT_CURRENCY").unwrap_or_else(|_| "₹".to_string());
}
