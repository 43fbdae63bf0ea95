//! Product model and fluent builder
//!
//! Products are immutable snapshots produced by [`ProductBuilder::build`].
//! A builder can start from one of the catalogue presets and override any
//! field afterwards:
//!
//! ```
//! use shopcheck_common::product::ProductBuilder;
//!
//! let product = ProductBuilder::new()
//!     .as_smartphone()
//!     .with_quantity(2)?
//!     .build()?;
//! assert_eq!(product.item_id(), "PROD-010");
//! assert_eq!(product.quantity(), 2);
//! # Ok::<(), shopcheck_common::Error>(())
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::money;

/// An immutable product snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    item_id: String,
    item_name: String,
    price: f64,
    quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_category2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_brand: Option<String>,
}

impl Product {
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn item_category(&self) -> Option<&str> {
        self.item_category.as_deref()
    }

    pub fn item_category2(&self) -> Option<&str> {
        self.item_category2.as_deref()
    }

    pub fn item_brand(&self) -> Option<&str> {
        self.item_brand.as_deref()
    }

    /// `price * quantity`, rounded to cents
    pub fn line_total(&self) -> f64 {
        money::line_total(self.price, self.quantity)
    }
}

/// Named catalogue entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductPreset {
    Smartphone,
    Notebook,
    Mouse,
    Keyboard,
    Headset,
    Webcam,
}

/// Fixed catalogue data for a preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub category: &'static str,
    pub category2: &'static str,
    pub brand: &'static str,
}

impl ProductPreset {
    pub const ALL: [ProductPreset; 6] = [
        ProductPreset::Smartphone,
        ProductPreset::Notebook,
        ProductPreset::Mouse,
        ProductPreset::Keyboard,
        ProductPreset::Headset,
        ProductPreset::Webcam,
    ];

    /// Catalogue entry backing this preset
    pub fn entry(&self) -> PresetEntry {
        match self {
            ProductPreset::Smartphone => PresetEntry {
                id: "PROD-010",
                name: "Smartphone Samsung",
                price: 499.90,
                category: "Eletrônicos",
                category2: "Celulares",
                brand: "Samsung",
            },
            ProductPreset::Notebook => PresetEntry {
                id: "PROD-001",
                name: "Notebook Dell",
                price: 299.90,
                category: "Eletrônicos",
                category2: "Computadores",
                brand: "Dell",
            },
            ProductPreset::Mouse => PresetEntry {
                id: "PROD-002",
                name: "Mouse Gamer",
                price: 150.00,
                category: "Periféricos",
                category2: "Mouses",
                brand: "Logitech",
            },
            ProductPreset::Keyboard => PresetEntry {
                id: "PROD-003",
                name: "Teclado Mecânico",
                price: 350.00,
                category: "Periféricos",
                category2: "Teclados",
                brand: "Redragon",
            },
            ProductPreset::Headset => PresetEntry {
                id: "PROD-004",
                name: "Headset Gamer",
                price: 280.00,
                category: "Áudio",
                category2: "Headsets",
                brand: "HyperX",
            },
            ProductPreset::Webcam => PresetEntry {
                id: "PROD-005",
                name: "Webcam HD",
                price: 180.00,
                category: "Periféricos",
                category2: "Webcams",
                brand: "Logitech",
            },
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ProductPreset::Smartphone => "smartphone",
            ProductPreset::Notebook => "notebook",
            ProductPreset::Mouse => "mouse",
            ProductPreset::Keyboard => "keyboard",
            ProductPreset::Headset => "headset",
            ProductPreset::Webcam => "webcam",
        }
    }
}

impl fmt::Display for ProductPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ProductPreset::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::constraint("preset", format!("unknown preset '{}'", s)))
    }
}

/// Fluent builder for [`Product`]
///
/// Setters with a value domain return `Result<Self>` and reject bad input on
/// the offending call. Builders own their state; two builders never share it.
#[derive(Debug, Clone)]
pub struct ProductBuilder {
    item_id: Option<String>,
    item_name: Option<String>,
    price: f64,
    quantity: u32,
    item_category: Option<String>,
    item_category2: Option<String>,
    item_brand: Option<String>,
}

impl Default for ProductBuilder {
    fn default() -> Self {
        Self {
            item_id: None,
            item_name: None,
            price: 0.0,
            quantity: 1,
            item_category: None,
            item_category2: None,
            item_brand: None,
        }
    }
}

impl ProductBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::constraint("item_id", "must not be empty"));
        }
        self.item_id = Some(id);
        Ok(self)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::constraint("item_name", "must not be empty"));
        }
        self.item_name = Some(name);
        Ok(self)
    }

    pub fn with_price(mut self, price: f64) -> Result<Self> {
        if !price.is_finite() || price < 0.0 {
            return Err(Error::constraint(
                "price",
                format!("must be a finite amount >= 0, got {}", price),
            ));
        }
        self.price = money::round2(price);
        Ok(self)
    }

    pub fn with_quantity(mut self, quantity: u32) -> Result<Self> {
        if quantity == 0 {
            return Err(Error::constraint("quantity", "must be at least 1"));
        }
        self.quantity = quantity;
        Ok(self)
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.item_brand = Some(brand.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.item_category = Some(category.into());
        self
    }

    pub fn with_category2(mut self, category: impl Into<String>) -> Self {
        self.item_category2 = Some(category.into());
        self
    }

    /// Replace every field with the catalogue entry for `preset`
    pub fn preset(self, preset: ProductPreset) -> Self {
        let entry = preset.entry();
        Self {
            item_id: Some(entry.id.to_string()),
            item_name: Some(entry.name.to_string()),
            price: entry.price,
            quantity: 1,
            item_category: Some(entry.category.to_string()),
            item_category2: Some(entry.category2.to_string()),
            item_brand: Some(entry.brand.to_string()),
        }
    }

    pub fn as_smartphone(self) -> Self {
        self.preset(ProductPreset::Smartphone)
    }

    pub fn as_notebook(self) -> Self {
        self.preset(ProductPreset::Notebook)
    }

    pub fn as_mouse(self) -> Self {
        self.preset(ProductPreset::Mouse)
    }

    pub fn as_keyboard(self) -> Self {
        self.preset(ProductPreset::Keyboard)
    }

    pub fn as_headset(self) -> Self {
        self.preset(ProductPreset::Headset)
    }

    pub fn as_webcam(self) -> Self {
        self.preset(ProductPreset::Webcam)
    }

    /// Snapshot the current state into a [`Product`]
    pub fn build(&self) -> Result<Product> {
        let item_id = self
            .item_id
            .clone()
            .ok_or_else(|| Error::constraint("item_id", "not set"))?;
        let item_name = self
            .item_name
            .clone()
            .ok_or_else(|| Error::constraint("item_name", "not set"))?;

        Ok(Product {
            item_id,
            item_name,
            price: self.price,
            quantity: self.quantity,
            item_category: self.item_category.clone(),
            item_category2: self.item_category2.clone(),
            item_brand: self.item_brand.clone(),
        })
    }
}

/// Shorthand for `ProductBuilder::new()`
pub fn create_product() -> ProductBuilder {
    ProductBuilder::new()
}
