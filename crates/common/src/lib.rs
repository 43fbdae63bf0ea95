//! ShopCheck Common Library
//!
//! Test-data and validation scaffolding for storefront data-layer tests.
//! Data flows one way:
//!
//! ```text
//! ProductBuilder ──build──▶ Product ──EventFactory──▶ AnalyticsEvent
//!                                                         │ to_value
//!                                                         ▼
//!                        DataLayer (append-only) ──last/latest──▶ ValidationChain::validate
//! ```

pub mod config;
pub mod datalayer;
pub mod error;
pub mod event;
pub mod factory;
pub mod forms;
pub mod money;
pub mod observer;
pub mod path;
pub mod product;
pub mod validator;

// Re-export commonly used types
pub use config::{Environment, SuiteConfig};
pub use datalayer::DataLayer;
pub use error::{Error, Result};
pub use event::{AnalyticsEvent, EventName, ItemProjection, CURRENCY};
pub use factory::{create_event_factory, EventFactory, TransactionData};
pub use path::FieldPath;
pub use product::{create_product, Product, ProductBuilder, ProductPreset};
pub use validator::{create_validator, Directive, ValidationChain, ValidationPreset};

/// ShopCheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
