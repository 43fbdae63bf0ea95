//! Analytics event payloads pushed onto the storefront data layer

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::product::Product;

/// Currency every event is reported in
pub const CURRENCY: &str = "BRL";

/// The fixed set of e-commerce event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    ViewItem,
    ViewItemList,
    AddToCart,
    RemoveFromCart,
    BeginCheckout,
    Purchase,
}

impl EventName {
    pub const ALL: [EventName; 6] = [
        EventName::ViewItem,
        EventName::ViewItemList,
        EventName::AddToCart,
        EventName::RemoveFromCart,
        EventName::BeginCheckout,
        EventName::Purchase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::ViewItem => "view_item",
            EventName::ViewItemList => "view_item_list",
            EventName::AddToCart => "add_to_cart",
            EventName::RemoveFromCart => "remove_from_cart",
            EventName::BeginCheckout => "begin_checkout",
            EventName::Purchase => "purchase",
        }
    }

    /// Whether events of this kind carry exactly one item
    pub fn is_single_item(&self) -> bool {
        matches!(
            self,
            EventName::ViewItem | EventName::AddToCart | EventName::RemoveFromCart
        )
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EventName::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| Error::FactoryInput(format!("unknown event name '{}'", s)))
    }
}

/// Per-product record embedded in an event's `items`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProjection {
    pub item_id: String,
    pub item_name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_category2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_brand: Option<String>,
}

impl From<&Product> for ItemProjection {
    fn from(product: &Product) -> Self {
        Self {
            item_id: product.item_id().to_string(),
            item_name: product.item_name().to_string(),
            price: product.price(),
            quantity: product.quantity(),
            item_category: product.item_category().map(str::to_string),
            item_category2: product.item_category2().map(str::to_string),
            item_brand: product.item_brand().map(str::to_string),
        }
    }
}

/// Commerce block of an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ecommerce {
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<f64>,
    pub items: Vec<ItemProjection>,
}

/// A data-layer entry as produced by the event factory
///
/// Serialises to `{"event": "...", "ecommerce": {...}}`, the shape the host
/// page's `dataLayer` array holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub event: EventName,
    pub ecommerce: Ecommerce,
}

impl AnalyticsEvent {
    pub fn name(&self) -> EventName {
        self.event
    }

    pub fn items(&self) -> &[ItemProjection] {
        &self.ecommerce.items
    }

    pub fn value(&self) -> Option<f64> {
        self.ecommerce.value
    }

    /// Generic tree form of this event
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
