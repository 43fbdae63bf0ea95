//! Chained data-layer event validation
//!
//! A [`ValidationChain`] queues [`Directive`]s through fluent calls and runs
//! them against one event with [`ValidationChain::validate`]. Directives run
//! in insertion order and the first failure is returned; nothing after it is
//! evaluated.
//!
//! ```
//! use serde_json::json;
//! use shopcheck_common::event::EventName;
//! use shopcheck_common::validator::create_validator;
//!
//! let event = json!({
//!     "event": "remove_from_cart",
//!     "ecommerce": {
//!         "currency": "BRL",
//!         "value": 150.0,
//!         "items": [{"item_id": "PROD-002", "item_name": "Mouse Gamer", "price": 150.0, "quantity": 1}]
//!     }
//! });
//!
//! create_validator()
//!     .validate_event_name(EventName::RemoveFromCart)
//!     .validate_currency("BRL")
//!     .validate_field_value("ecommerce.items[0].item_id", "PROD-002")
//!     .validate(&event)?;
//! # Ok::<(), shopcheck_common::Error>(())
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use crate::config::SuiteConfig;
use crate::error::{Error, Result};
use crate::event::{AnalyticsEvent, EventName, CURRENCY};
use crate::money;
use crate::path::{FieldPath, PathSegment};

/// Keys every item projection must carry unless a caller overrides them
pub const DEFAULT_ITEM_KEYS: [&str; 4] = ["item_id", "item_name", "price", "quantity"];

const EVENT_PATH: &str = "event";
const CURRENCY_PATH: &str = "ecommerce.currency";
const VALUE_PATH: &str = "ecommerce.value";
const ITEMS_PATH: &str = "ecommerce.items";

/// One validation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    EventName {
        name: EventName,
    },
    Currency {
        currency: String,
    },
    FieldValue {
        path: String,
        expected: Value,
    },
    ItemsCount {
        count: usize,
    },
    ItemsStructure {
        #[serde(default = "default_item_keys")]
        keys: Vec<String>,
    },
    CalculatedTotal,
    RequiredFields {
        paths: Vec<String>,
    },
}

fn default_item_keys() -> Vec<String> {
    DEFAULT_ITEM_KEYS.iter().map(|k| k.to_string()).collect()
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::EventName { name } => write!(f, "event_name({})", name),
            Directive::Currency { currency } => write!(f, "currency({})", currency),
            Directive::FieldValue { path, expected } => {
                write!(f, "field_value({} == {})", path, expected)
            }
            Directive::ItemsCount { count } => write!(f, "items_count({})", count),
            Directive::ItemsStructure { keys } => {
                write!(f, "items_structure({})", keys.join(", "))
            }
            Directive::CalculatedTotal => f.write_str("calculated_total"),
            Directive::RequiredFields { paths } => {
                write!(f, "required_fields({})", paths.join(", "))
            }
        }
    }
}

/// Pre-built directive bundles per event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPreset {
    Purchase,
    AddToCart,
    ViewItem,
}

/// Ordered list of directives plus the tolerance used for money comparisons
#[derive(Debug, Clone)]
pub struct ValidationChain {
    directives: Vec<Directive>,
    tolerance: f64,
}

impl Default for ValidationChain {
    fn default() -> Self {
        Self {
            directives: Vec::new(),
            tolerance: money::DEFAULT_TOLERANCE,
        }
    }
}

impl ValidationChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain using the suite's total tolerance
    pub fn with_config(config: &SuiteConfig) -> Self {
        Self {
            directives: Vec::new(),
            tolerance: config.total_tolerance,
        }
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn with_directives<I>(mut self, directives: I) -> Self
    where
        I: IntoIterator<Item = Directive>,
    {
        self.directives.extend(directives);
        self
    }

    pub fn validate_event_name(self, name: EventName) -> Self {
        self.with_directive(Directive::EventName { name })
    }

    pub fn validate_currency(self, currency: impl Into<String>) -> Self {
        self.with_directive(Directive::Currency {
            currency: currency.into(),
        })
    }

    pub fn validate_field_value(self, path: impl Into<String>, expected: impl Into<Value>) -> Self {
        self.with_directive(Directive::FieldValue {
            path: path.into(),
            expected: expected.into(),
        })
    }

    pub fn validate_items_count(self, count: usize) -> Self {
        self.with_directive(Directive::ItemsCount { count })
    }

    /// Every item carries `item_id`, `item_name`, `price` and `quantity`
    pub fn validate_items_structure(self) -> Self {
        self.with_directive(Directive::ItemsStructure {
            keys: default_item_keys(),
        })
    }

    pub fn validate_items_structure_with<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_directive(Directive::ItemsStructure {
            keys: keys.into_iter().map(Into::into).collect(),
        })
    }

    pub fn validate_calculated_total(self) -> Self {
        self.with_directive(Directive::CalculatedTotal)
    }

    pub fn validate_required_fields<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_directive(Directive::RequiredFields {
            paths: paths.into_iter().map(Into::into).collect(),
        })
    }

    pub fn validate_purchase_event(self) -> Self {
        self.validate_event_name(EventName::Purchase)
            .validate_currency(CURRENCY)
            .validate_required_fields([
                EVENT_PATH,
                "ecommerce.transaction_id",
                VALUE_PATH,
                CURRENCY_PATH,
                ITEMS_PATH,
                "ecommerce.tax",
                "ecommerce.shipping",
            ])
            .validate_items_structure()
            .validate_calculated_total()
    }

    pub fn validate_add_to_cart_event(self) -> Self {
        self.validate_event_name(EventName::AddToCart)
            .validate_currency(CURRENCY)
            .validate_required_fields([EVENT_PATH, VALUE_PATH, CURRENCY_PATH, ITEMS_PATH])
            .validate_items_structure()
            .validate_calculated_total()
    }

    pub fn validate_view_item_event(self) -> Self {
        self.validate_event_name(EventName::ViewItem)
            .validate_currency(CURRENCY)
            .validate_required_fields([EVENT_PATH, VALUE_PATH, CURRENCY_PATH, ITEMS_PATH])
            .validate_items_count(1)
            .validate_items_structure()
    }

    pub fn with_preset(self, preset: ValidationPreset) -> Self {
        match preset {
            ValidationPreset::Purchase => self.validate_purchase_event(),
            ValidationPreset::AddToCart => self.validate_add_to_cart_event(),
            ValidationPreset::ViewItem => self.validate_view_item_event(),
        }
    }

    /// Run every directive against `event`, stopping at the first failure
    pub fn validate(&self, event: &Value) -> Result<()> {
        for (index, directive) in self.directives.iter().enumerate() {
            debug!(index, directive = %directive, "Evaluating directive");
            if let Err(err) = evaluate(directive, event, self.tolerance) {
                warn!(index, directive = %directive, error = %err, "Directive failed");
                return Err(err);
            }
        }
        debug!(count = self.directives.len(), "All directives passed");
        Ok(())
    }

    pub fn validate_event(&self, event: &AnalyticsEvent) -> Result<()> {
        self.validate(&event.to_value()?)
    }
}

/// Shorthand for `ValidationChain::new()`
pub fn create_validator() -> ValidationChain {
    ValidationChain::new()
}

fn evaluate(directive: &Directive, event: &Value, tolerance: f64) -> Result<()> {
    match directive {
        Directive::EventName { name } => {
            let actual = resolve(event, EVENT_PATH)?;
            expect_str(directive, actual, name.as_str())
        }
        Directive::Currency { currency } => {
            let actual = resolve(event, CURRENCY_PATH)?;
            expect_str(directive, actual, currency)
        }
        Directive::FieldValue { path, expected } => {
            let actual = resolve(event, path)?;
            if values_match(actual, expected, tolerance) {
                Ok(())
            } else {
                Err(Error::assertion(
                    directive,
                    format!("expected {} at '{}', found {}", expected, path, actual),
                ))
            }
        }
        Directive::ItemsCount { count } => {
            let items = items_of(directive, event)?;
            if items.len() == *count {
                Ok(())
            } else {
                Err(Error::assertion(
                    directive,
                    format!("expected {} items, found {}", count, items.len()),
                ))
            }
        }
        Directive::ItemsStructure { keys } => {
            let items = items_of(directive, event)?;
            if items.is_empty() {
                return Err(Error::assertion(directive, "event has no items"));
            }
            for (idx, item) in items.iter().enumerate() {
                let object = item.as_object().ok_or_else(|| {
                    Error::assertion(directive, format!("item {} is not an object", idx))
                })?;
                if let Some(missing) = keys.iter().find(|k| !object.contains_key(k.as_str())) {
                    return Err(Error::assertion(
                        directive,
                        format!("item {} is missing key '{}'", idx, missing),
                    ));
                }
            }
            Ok(())
        }
        Directive::CalculatedTotal => {
            let expected = calculated_total(directive, event)?;
            let stored = number_at(directive, event, VALUE_PATH)?;
            if money::approx_eq(stored, expected, tolerance) {
                Ok(())
            } else {
                Err(Error::assertion(
                    directive,
                    format!("stored value {} differs from computed total {}", stored, expected),
                ))
            }
        }
        Directive::RequiredFields { paths } => {
            for path in paths {
                require_field(directive, event, path)?;
            }
            Ok(())
        }
    }
}

/// Absent or null last key under a resolvable parent is an assertion; a
/// parent that does not resolve, or an index out of range, is not
fn require_field(directive: &Directive, event: &Value, path: &str) -> Result<()> {
    let field_path: FieldPath = path.parse()?;
    if let Some((parent, PathSegment::Field(key))) = field_path.split_last() {
        if let Value::Object(map) = parent.resolve(event)? {
            return match map.get(key) {
                None => Err(Error::assertion(
                    directive,
                    format!("required field '{}' is missing", path),
                )),
                Some(Value::Null) => Err(Error::assertion(
                    directive,
                    format!("required field '{}' is null", path),
                )),
                Some(_) => Ok(()),
            };
        }
    }

    match field_path.resolve(event)? {
        Value::Null => Err(Error::assertion(
            directive,
            format!("required field '{}' is null", path),
        )),
        _ => Ok(()),
    }
}

fn resolve<'a>(event: &'a Value, path: &str) -> Result<&'a Value> {
    path.parse::<FieldPath>()?.resolve(event)
}

fn expect_str(directive: &Directive, actual: &Value, expected: &str) -> Result<()> {
    match actual.as_str() {
        Some(found) if found == expected => Ok(()),
        _ => Err(Error::assertion(
            directive,
            format!("expected \"{}\", found {}", expected, actual),
        )),
    }
}

fn values_match(actual: &Value, expected: &Value, tolerance: f64) -> bool {
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => money::approx_eq(a, b, tolerance),
        _ => actual == expected,
    }
}

fn items_of<'a>(directive: &Directive, event: &'a Value) -> Result<&'a Vec<Value>> {
    resolve(event, ITEMS_PATH)?
        .as_array()
        .ok_or_else(|| Error::assertion(directive, "'ecommerce.items' is not an array"))
}

fn number_at(directive: &Directive, event: &Value, path: &str) -> Result<f64> {
    let value = resolve(event, path)?;
    value
        .as_f64()
        .ok_or_else(|| Error::assertion(directive, format!("'{}' is not a number: {}", path, value)))
}

/// Σ price × quantity over items, plus tax and shipping when the event has them
fn calculated_total(directive: &Directive, event: &Value) -> Result<f64> {
    let items = items_of(directive, event)?;
    let mut lines = Vec::with_capacity(items.len());
    for idx in 0..items.len() {
        let price = number_at(directive, event, &format!("{}[{}].price", ITEMS_PATH, idx))?;
        let quantity = number_at(directive, event, &format!("{}[{}].quantity", ITEMS_PATH, idx))?;
        lines.push((price, quantity));
    }

    let mut total = money::sum_lines(lines);
    for extra in ["tax", "shipping"] {
        if event["ecommerce"].get(extra).is_some() {
            total += number_at(directive, event, &format!("ecommerce.{}", extra))?;
        }
    }
    Ok(money::round2(total))
}
