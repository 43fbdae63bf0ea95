//! ShopCheck scenario framework
//!
//! Replays the data-layer half of the storefront scenarios without a browser:
//! - Parses declarative YAML scenario specs
//! - Builds products and pushes factory events onto an in-memory data layer
//! - Runs validation chains against the last or latest entry
//! - Records per-step results and writes them as JSON
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Scenario Runner (Rust)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioRunner                                             │
//! │    ├── run_spec(spec: ScenarioSpec) -> ScenarioResult       │
//! │    └── write_results(SuiteResult) -> PathBuf                │
//! │  ScenarioContext                                            │
//! │    ├── products: alias -> Product                           │
//! │    ├── data_layer: DataLayer                                │
//! │    └── execute_step(step) -> StepResult                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioSpec (YAML)                                        │
//! │    ├── name, description, tags                              │
//! │    └── steps: [ScenarioStep]                                │
//! │          ├── reset_data_layer                               │
//! │          ├── build_product { alias, preset?, id?, ... }     │
//! │          ├── push_event { kind, products }                  │
//! │          ├── push_purchase { transaction_id, ... }          │
//! │          ├── push_raw { event }                             │
//! │          ├── validate { latest?, preset?, directives, expect}│
//! │          └── log { message }                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod executor;
pub mod runner;
pub mod spec;

pub use error::{E2eError, E2eResult};
pub use runner::ScenarioRunner;
pub use spec::{ScenarioSpec, ScenarioStep};
