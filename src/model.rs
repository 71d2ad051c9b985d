//! Shapes exchanged with the shopping backend.
//!
//! The backend's JSON is loosely shaped, so responses are read as
//! `serde_json::Value` and normalized here. Missing or malformed fields fall
//! back to `None`/empty instead of failing the whole reply.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

/// Product identifier as the backend sent it. Numbers are kept as JSON
/// numbers, floats and u64 ids included, so the add-to-cart request echoes
/// them unchanged (`{"id": 1}` rather than `{"id": "1"}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(Number),
    Text(String),
}

impl ProductId {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(ProductId::Number(n.clone())),
            Value::String(s) if !s.trim().is_empty() => Some(ProductId::Text(s.trim().to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for ProductId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(s.parse::<Number>()
            .map(ProductId::Number)
            .unwrap_or_else(|_| ProductId::Text(s.to_string())))
    }
}

impl From<i64> for ProductId {
    fn from(n: i64) -> Self {
        ProductId::Number(n.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub offer: Option<String>,
    pub image: Option<String>,
    pub rating: Option<f64>,
}

impl Product {
    /// Requires `id`, `name` and `price`; the rest is optional.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            id: ProductId::from_json(obj.get("id")?)?,
            name: text_field(obj, "name")?,
            price: number_field(obj, "price")?,
            offer: text_field(obj, "offer"),
            image: text_field(obj, "image"),
            rating: number_field(obj, "rating"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    pub name: String,
    pub price: f64,
}

impl CartItem {
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            name: text_field(obj, "name")?,
            price: number_field(obj, "price")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub total: f64,
}

impl CartSummary {
    /// Accepts either `{"items": [...], "total": n}` or a bare item array.
    /// The total comes from the cart object, then `fallback_total` (the
    /// reply's top-level `total`), then the sum of the item prices.
    pub fn from_json(value: &Value, fallback_total: Option<f64>) -> Option<Self> {
        let (raw_items, own_total) = match value {
            Value::Array(items) => (items.as_slice(), None),
            Value::Object(obj) => {
                let items = obj
                    .get("items")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                (items, number_field(obj, "total"))
            }
            _ => return None,
        };

        let items: Vec<CartItem> = raw_items
            .iter()
            .filter_map(|raw| {
                let item = CartItem::from_json(raw);
                if item.is_none() {
                    warn!(?raw, "Skipping malformed cart item");
                }
                item
            })
            .collect();

        let total = own_total
            .or(fallback_total)
            .unwrap_or_else(|| items.iter().map(|item| item.price).sum());

        Some(Self { items, total })
    }
}

/// Normalized `/chat` response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatReply {
    /// `None` when the backend sent no usable reply text.
    pub reply: Option<String>,
    pub products: Vec<Product>,
    pub cart: Option<CartSummary>,
}

impl ChatReply {
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            warn!("Chat response is not a JSON object");
            return Self::default();
        };

        let reply = obj
            .get("reply")
            .and_then(Value::as_str)
            .filter(|reply| !reply.trim().is_empty())
            .map(str::to_string);

        let products = obj
            .get("products")
            .and_then(Value::as_array)
            .map(|raw_products| {
                raw_products
                    .iter()
                    .filter_map(|raw| {
                        let product = Product::from_json(raw);
                        if product.is_none() {
                            warn!(?raw, "Skipping malformed product");
                        }
                        product
                    })
                    .collect()
            })
            .unwrap_or_default();

        let cart = obj
            .get("cart")
            .and_then(|cart| CartSummary::from_json(cart, number_field(obj, "total")));

        Self { reply, products, cart }
    }
}

/// Normalized `/add_to_cart` response. Anything but `"success": true` is a
/// decline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddToCartAck {
    pub success: bool,
}

impl AddToCartAck {
    pub fn from_json(value: &Value) -> Self {
        Self {
            success: value.get("success").and_then(Value::as_bool).unwrap_or(false),
        }
    }
}

/// Non-empty string, or a number rendered as text.
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Number, or a string that parses as one.
fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let number = match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}
