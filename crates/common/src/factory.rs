//! Event factory
//!
//! Turns product snapshots (and purchase metadata) into [`AnalyticsEvent`]s.
//! Inputs are checked before anything is built, so a failed call never
//! yields a half-populated event.

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::{AnalyticsEvent, Ecommerce, EventName, ItemProjection, CURRENCY};
use crate::money;
use crate::product::Product;

/// Purchase metadata handed to [`EventFactory::create_purchase_event`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionData {
    pub transaction_id: String,
    pub affiliation: Option<String>,
    pub items: Vec<Product>,
    pub tax: f64,
    pub shipping: f64,
}

impl TransactionData {
    pub fn new(transaction_id: impl Into<String>, items: Vec<Product>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            affiliation: None,
            items,
            tax: 0.0,
            shipping: 0.0,
        }
    }

    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }

    pub fn with_tax(mut self, tax: f64) -> Self {
        self.tax = tax;
        self
    }

    pub fn with_shipping(mut self, shipping: f64) -> Self {
        self.shipping = shipping;
        self
    }
}

/// Stateless builder of analytics events
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFactory;

impl EventFactory {
    pub fn new() -> Self {
        Self
    }

    /// `view_item` for a single product; value is the unit price
    pub fn create_view_item_event(&self, product: &Product) -> AnalyticsEvent {
        self.finish(EventName::ViewItem, Some(product.price()), vec![product.into()])
    }

    /// `view_item_list`; carries items only, no aggregate value
    pub fn create_view_item_list_event(&self, products: &[Product]) -> Result<AnalyticsEvent> {
        require_items(EventName::ViewItemList, products)?;
        Ok(self.finish(EventName::ViewItemList, None, project(products)))
    }

    pub fn create_add_to_cart_event(&self, product: &Product) -> AnalyticsEvent {
        self.cart_event(EventName::AddToCart, product)
    }

    pub fn create_remove_from_cart_event(&self, product: &Product) -> AnalyticsEvent {
        self.cart_event(EventName::RemoveFromCart, product)
    }

    /// `begin_checkout`; value is the sum of every line total
    pub fn create_begin_checkout_event(&self, products: &[Product]) -> Result<AnalyticsEvent> {
        require_items(EventName::BeginCheckout, products)?;
        Ok(self.finish(
            EventName::BeginCheckout,
            Some(items_total(products)),
            project(products),
        ))
    }

    /// `purchase`; value is the items total plus tax and shipping
    pub fn create_purchase_event(&self, transaction: &TransactionData) -> Result<AnalyticsEvent> {
        if transaction.transaction_id.trim().is_empty() {
            return Err(Error::FactoryInput(
                "purchase requires a transaction_id".to_string(),
            ));
        }
        require_items(EventName::Purchase, &transaction.items)?;
        require_amount("tax", transaction.tax)?;
        require_amount("shipping", transaction.shipping)?;

        let tax = money::round2(transaction.tax);
        let shipping = money::round2(transaction.shipping);
        let value = money::round2(items_total(&transaction.items) + tax + shipping);

        let event = AnalyticsEvent {
            event: EventName::Purchase,
            ecommerce: Ecommerce {
                currency: CURRENCY.to_string(),
                value: Some(value),
                transaction_id: Some(transaction.transaction_id.clone()),
                affiliation: transaction.affiliation.clone(),
                tax: Some(tax),
                shipping: Some(shipping),
                items: project(&transaction.items),
            },
        };
        debug!(
            event = %event.event,
            transaction_id = %transaction.transaction_id,
            items = event.items().len(),
            value,
            "Created analytics event"
        );
        Ok(event)
    }

    /// Build any non-purchase event kind from a product list
    ///
    /// Single-item kinds require exactly one product.
    pub fn create_event(&self, name: EventName, products: &[Product]) -> Result<AnalyticsEvent> {
        match name {
            EventName::ViewItem => Ok(self.create_view_item_event(single(name, products)?)),
            EventName::AddToCart => Ok(self.create_add_to_cart_event(single(name, products)?)),
            EventName::RemoveFromCart => {
                Ok(self.create_remove_from_cart_event(single(name, products)?))
            }
            EventName::ViewItemList => self.create_view_item_list_event(products),
            EventName::BeginCheckout => self.create_begin_checkout_event(products),
            EventName::Purchase => Err(Error::FactoryInput(
                "purchase events need transaction data".to_string(),
            )),
        }
    }

    fn cart_event(&self, name: EventName, product: &Product) -> AnalyticsEvent {
        self.finish(name, Some(product.line_total()), vec![product.into()])
    }

    fn finish(
        &self,
        name: EventName,
        value: Option<f64>,
        items: Vec<ItemProjection>,
    ) -> AnalyticsEvent {
        debug!(event = %name, items = items.len(), value = ?value, "Created analytics event");
        AnalyticsEvent {
            event: name,
            ecommerce: Ecommerce {
                currency: CURRENCY.to_string(),
                value,
                transaction_id: None,
                affiliation: None,
                tax: None,
                shipping: None,
                items,
            },
        }
    }
}

/// Shorthand for `EventFactory::new()`
pub fn create_event_factory() -> EventFactory {
    EventFactory::new()
}

fn project(products: &[Product]) -> Vec<ItemProjection> {
    products.iter().map(ItemProjection::from).collect()
}

fn items_total(products: &[Product]) -> f64 {
    money::sum_lines(
        products
            .iter()
            .map(|p| (p.price(), f64::from(p.quantity()))),
    )
}

fn require_items(name: EventName, products: &[Product]) -> Result<()> {
    if products.is_empty() {
        return Err(Error::FactoryInput(format!(
            "{} requires at least one item",
            name
        )));
    }

    let mut seen = HashSet::with_capacity(products.len());
    if let Some(dup) = products.iter().find(|p| !seen.insert(p.item_id())) {
        return Err(Error::FactoryInput(format!(
            "{} lists item_id '{}' more than once",
            name,
            dup.item_id()
        )));
    }
    Ok(())
}

fn require_amount(field: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::FactoryInput(format!(
            "{} must be a finite amount >= 0, got {}",
            field, amount
        )));
    }
    Ok(())
}

fn single(name: EventName, products: &[Product]) -> Result<&Product> {
    match products {
        [product] => Ok(product),
        _ => Err(Error::FactoryInput(format!(
            "{} takes exactly one item, got {}",
            name,
            products.len()
        ))),
    }
}
