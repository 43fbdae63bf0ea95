//! Declarative YAML scenario specification

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use shopcheck_common::validator::{Directive, ValidationPreset};
use shopcheck_common::{EventName, ProductPreset};

use crate::error::{E2eError, E2eResult};

/// A complete scenario parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Unique name for this scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering scenarios
    #[serde(default)]
    pub tags: Vec<String>,

    /// Steps to execute in order
    pub steps: Vec<ScenarioStep>,
}

/// A single step in a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Empty the data layer, as a fresh page load would
    ResetDataLayer,

    /// Build a product and remember it under `alias`
    BuildProduct {
        alias: String,
        #[serde(default)]
        preset: Option<ProductPreset>,
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        price: Option<f64>,
        #[serde(default)]
        quantity: Option<u32>,
        #[serde(default)]
        brand: Option<String>,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        category2: Option<String>,
    },

    /// Create a non-purchase event from product aliases and push it
    PushEvent {
        kind: EventName,
        products: Vec<String>,
    },

    /// Create a purchase event and push it
    PushPurchase {
        transaction_id: String,
        #[serde(default)]
        affiliation: Option<String>,
        products: Vec<String>,
        #[serde(default)]
        tax: f64,
        #[serde(default)]
        shipping: f64,
    },

    /// Push an arbitrary record, bypassing the factory
    PushRaw {
        event: Value,
    },

    /// Validate the last entry, or the latest entry with a given name
    Validate {
        #[serde(default)]
        latest: Option<EventName>,
        #[serde(default)]
        preset: Option<ValidationPreset>,
        #[serde(default)]
        directives: Vec<Directive>,
        #[serde(default)]
        expect: Expectation,
    },

    /// Log a message (for debugging)
    Log {
        message: String,
    },
}

/// Outcome a validate step is expected to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    #[default]
    Pass,
    Assertion,
    PathResolution,
    InvalidPath,
}

impl ScenarioSpec {
    /// Parse a scenario from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let spec: Self = serde_yaml::from_str(yaml)?;
        if spec.steps.is_empty() {
            return Err(E2eError::SpecParse(format!(
                "scenario '{}' has no steps",
                spec.name
            )));
        }
        Ok(spec)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| E2eError::SpecParse(format!("{}: {}", path.display(), e)))
    }

    /// Load every scenario under a directory, sorted by file path
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut specs = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            let spec = Self::from_file(entry.path())?;
            specs.push(spec);
        }

        Ok(specs)
    }

    /// Filter scenarios by tag
    pub fn filter_by_tag<'a>(specs: &'a [Self], tag: &str) -> Vec<&'a Self> {
        specs.iter().filter(|s| s.tags.iter().any(|t| t == tag)).collect()
    }
}
