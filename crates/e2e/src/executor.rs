//! Step execution against an in-memory data layer

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

use shopcheck_common::observer::UiEventBus;
use shopcheck_common::validator::{Directive, ValidationPreset};
use shopcheck_common::{
    DataLayer, Error, EventFactory, EventName, Product, ProductBuilder, ProductPreset,
    SuiteConfig, TransactionData, ValidationChain,
};

use crate::error::{E2eError, E2eResult};
use crate::spec::{Expectation, ScenarioStep};

/// Result of executing a scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Fields of a `build_product` step
#[derive(Debug, Clone, Default)]
pub struct ProductFields<'a> {
    pub preset: Option<ProductPreset>,
    pub id: Option<&'a str>,
    pub name: Option<&'a str>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
    pub brand: Option<&'a str>,
    pub category: Option<&'a str>,
    pub category2: Option<&'a str>,
}

/// Per-scenario state: named products plus the data layer
pub struct ScenarioContext {
    config: SuiteConfig,
    factory: EventFactory,
    products: HashMap<String, Product>,
    data_layer: DataLayer,
}

impl ScenarioContext {
    pub fn new(config: SuiteConfig) -> Self {
        Self {
            config,
            factory: EventFactory::new(),
            products: HashMap::new(),
            data_layer: DataLayer::new(),
        }
    }

    /// Report data-layer pushes to `bus`
    pub fn with_observers(mut self, bus: UiEventBus) -> Self {
        self.data_layer = self.data_layer.with_observers(bus);
        self
    }

    pub fn data_layer(&self) -> &DataLayer {
        &self.data_layer
    }

    pub fn product(&self, alias: &str) -> E2eResult<&Product> {
        self.products
            .get(alias)
            .ok_or_else(|| E2eError::UnknownProduct(alias.to_string()))
    }

    /// Execute a single step, capturing failure in the result
    pub fn execute_step(&mut self, step: &ScenarioStep) -> StepResult {
        let start = Instant::now();
        let step_name = step_name(step);

        debug!("Executing step: {}", step_name);

        let result = match step {
            ScenarioStep::ResetDataLayer => {
                self.data_layer.clear();
                Ok(())
            }
            ScenarioStep::BuildProduct {
                alias,
                preset,
                id,
                name,
                price,
                quantity,
                brand,
                category,
                category2,
            } => self.execute_build_product(
                alias,
                ProductFields {
                    preset: *preset,
                    id: id.as_deref(),
                    name: name.as_deref(),
                    price: *price,
                    quantity: *quantity,
                    brand: brand.as_deref(),
                    category: category.as_deref(),
                    category2: category2.as_deref(),
                },
            ),
            ScenarioStep::PushEvent { kind, products } => self.execute_push_event(*kind, products),
            ScenarioStep::PushPurchase {
                transaction_id,
                affiliation,
                products,
                tax,
                shipping,
            } => self.execute_push_purchase(
                transaction_id,
                affiliation.as_deref(),
                products,
                *tax,
                *shipping,
            ),
            ScenarioStep::PushRaw { event } => {
                self.data_layer.push_value(event.clone());
                Ok(())
            }
            ScenarioStep::Validate {
                latest,
                preset,
                directives,
                expect,
            } => self.execute_validate(*latest, *preset, directives, *expect),
            ScenarioStep::Log { message } => {
                info!("[SCENARIO LOG] {}", message);
                Ok(())
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => StepResult {
                success: true,
                step_name,
                duration_ms,
                error: None,
            },
            Err(e) => StepResult {
                success: false,
                step_name,
                duration_ms,
                error: Some(e.to_string()),
            },
        }
    }

    fn execute_build_product(&mut self, alias: &str, fields: ProductFields<'_>) -> E2eResult<()> {
        let mut builder = ProductBuilder::new();
        if let Some(preset) = fields.preset {
            builder = builder.preset(preset);
        }
        if let Some(id) = fields.id {
            builder = builder.with_id(id)?;
        }
        if let Some(name) = fields.name {
            builder = builder.with_name(name)?;
        }
        if let Some(price) = fields.price {
            builder = builder.with_price(price)?;
        }
        if let Some(quantity) = fields.quantity {
            builder = builder.with_quantity(quantity)?;
        }
        if let Some(brand) = fields.brand {
            builder = builder.with_brand(brand);
        }
        if let Some(category) = fields.category {
            builder = builder.with_category(category);
        }
        if let Some(category2) = fields.category2 {
            builder = builder.with_category2(category2);
        }

        let product = builder.build()?;
        debug!(alias, item_id = product.item_id(), "Built product");
        self.products.insert(alias.to_string(), product);
        Ok(())
    }

    fn resolve_products(&self, aliases: &[String]) -> E2eResult<Vec<Product>> {
        aliases
            .iter()
            .map(|alias| self.product(alias).cloned())
            .collect()
    }

    fn execute_push_event(&mut self, kind: EventName, aliases: &[String]) -> E2eResult<()> {
        let products = self.resolve_products(aliases)?;
        let event = self.factory.create_event(kind, &products)?;
        self.data_layer.push(&event)?;
        Ok(())
    }

    fn execute_push_purchase(
        &mut self,
        transaction_id: &str,
        affiliation: Option<&str>,
        aliases: &[String],
        tax: f64,
        shipping: f64,
    ) -> E2eResult<()> {
        let mut transaction = TransactionData::new(transaction_id, self.resolve_products(aliases)?)
            .with_tax(tax)
            .with_shipping(shipping);
        if let Some(affiliation) = affiliation {
            transaction = transaction.with_affiliation(affiliation);
        }

        let event = self.factory.create_purchase_event(&transaction)?;
        self.data_layer.push(&event)?;
        Ok(())
    }

    fn target(&self, latest: Option<EventName>) -> E2eResult<&Value> {
        let found = match latest {
            Some(name) => self.data_layer.latest(name),
            None => self.data_layer.last(),
        };
        found.ok_or_else(|| E2eError::StepFailed {
            step: "validate".to_string(),
            reason: match latest {
                Some(name) => format!("no '{}' entry in the data layer", name),
                None => "data layer is empty".to_string(),
            },
        })
    }

    fn execute_validate(
        &self,
        latest: Option<EventName>,
        preset: Option<ValidationPreset>,
        directives: &[Directive],
        expect: Expectation,
    ) -> E2eResult<()> {
        let event = self.target(latest)?;

        let mut chain = ValidationChain::with_config(&self.config);
        if let Some(preset) = preset {
            chain = chain.with_preset(preset);
        }
        let chain = chain.with_directives(directives.iter().cloned());

        check_outcome(expect, chain.validate(event))
    }
}

fn check_outcome(expect: Expectation, outcome: shopcheck_common::Result<()>) -> E2eResult<()> {
    let matches = match (&outcome, expect) {
        (Ok(()), Expectation::Pass) => true,
        (Err(e), Expectation::Assertion) => e.is_assertion(),
        (Err(e), Expectation::PathResolution) => e.is_path_resolution(),
        (Err(Error::InvalidPath { .. }), Expectation::InvalidPath) => true,
        _ => false,
    };
    if matches {
        return Ok(());
    }

    match outcome {
        Err(e) if expect == Expectation::Pass => Err(e.into()),
        other => Err(E2eError::UnexpectedOutcome {
            expected: format!("{:?}", expect),
            actual: match other {
                Ok(()) => "pass".to_string(),
                Err(e) => e.to_string(),
            },
        }),
    }
}

/// Short label for a step
fn step_name(step: &ScenarioStep) -> String {
    match step {
        ScenarioStep::ResetDataLayer => "reset_data_layer".to_string(),
        ScenarioStep::BuildProduct { alias, .. } => format!("build_product:{}", alias),
        ScenarioStep::PushEvent { kind, .. } => format!("push_event:{}", kind),
        ScenarioStep::PushPurchase { transaction_id, .. } => {
            format!("push_purchase:{}", transaction_id)
        }
        ScenarioStep::PushRaw { .. } => "push_raw".to_string(),
        ScenarioStep::Validate { latest, .. } => match latest {
            Some(name) => format!("validate:latest:{}", name),
            None => "validate:last".to_string(),
        },
        ScenarioStep::Log { message } => {
            format!("log:{}", message.chars().take(30).collect::<String>())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> ScenarioContext {
        ScenarioContext::new(SuiteConfig::default())
    }

    fn build(ctx: &mut ScenarioContext, alias: &str, preset: ProductPreset) {
        let result = ctx.execute_step(&ScenarioStep::BuildProduct {
            alias: alias.to_string(),
            preset: Some(preset),
            id: None,
            name: None,
            price: None,
            quantity: None,
            brand: None,
            category: None,
            category2: None,
        });
        assert!(result.success, "{:?}", result.error);
    }

    #[test]
    fn test_push_and_validate() {
        let mut ctx = context();
        build(&mut ctx, "phone", ProductPreset::Smartphone);

        let push = ctx.execute_step(&ScenarioStep::PushEvent {
            kind: EventName::AddToCart,
            products: vec!["phone".into()],
        });
        assert!(push.success, "{:?}", push.error);

        let validate = ctx.execute_step(&ScenarioStep::Validate {
            latest: None,
            preset: Some(ValidationPreset::AddToCart),
            directives: vec![],
            expect: Expectation::Pass,
        });
        assert!(validate.success, "{:?}", validate.error);
        assert_eq!(ctx.data_layer().len(), 1);
    }

    #[test]
    fn test_unknown_alias_fails_step() {
        let mut ctx = context();
        let result = ctx.execute_step(&ScenarioStep::PushEvent {
            kind: EventName::ViewItem,
            products: vec!["ghost".into()],
        });
        assert!(!result.success);
        assert!(result.error.unwrap().contains("ghost"));
    }

    #[test]
    fn test_expected_failures() {
        let mut ctx = context();
        ctx.execute_step(&ScenarioStep::PushRaw {
            event: json!({"event": "view_item", "ecommerce": {"items": [{"item_id": "PROD-001"}]}}),
        });

        let expect_assertion = ScenarioStep::Validate {
            latest: Some(EventName::ViewItem),
            preset: None,
            directives: vec![Directive::FieldValue {
                path: "ecommerce.items[0].item_id".into(),
                expected: json!("PROD-002"),
            }],
            expect: Expectation::Assertion,
        };
        assert!(ctx.execute_step(&expect_assertion).success);

        let wrong_expectation = ScenarioStep::Validate {
            latest: None,
            preset: None,
            directives: vec![Directive::FieldValue {
                path: "ecommerce.items[5].item_id".into(),
                expected: json!("PROD-001"),
            }],
            expect: Expectation::Assertion,
        };
        let result = ctx.execute_step(&wrong_expectation);
        assert!(!result.success);
    }

    #[test]
    fn test_validate_empty_data_layer() {
        let mut ctx = context();
        let result = ctx.execute_step(&ScenarioStep::Validate {
            latest: None,
            preset: None,
            directives: vec![],
            expect: Expectation::Pass,
        });
        assert!(!result.success);
    }

    #[test]
    fn test_check_outcome() {
        assert!(check_outcome(Expectation::Pass, Ok(())).is_ok());
        assert!(matches!(
            check_outcome(Expectation::Assertion, Ok(())),
            Err(E2eError::UnexpectedOutcome { .. })
        ));
        assert!(matches!(
            check_outcome(
                Expectation::Pass,
                Err(Error::FactoryInput("boom".into()))
            ),
            Err(E2eError::Common(_))
        ));
    }
}
