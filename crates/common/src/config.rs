//! Suite configuration
//!
//! One explicit value built at the top of a test run and handed to whatever
//! needs it. Loaded from TOML; every key is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::money;

/// Target environment for API calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Environment::Dev => "https://dev-api.example.com",
            Environment::Staging => "https://staging-api.example.com",
            Environment::Prod => "https://jsonplaceholder.typicode.com",
        }
    }
}

/// Browser viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Test suite configuration
///
/// Only `total_tolerance` changes how validation behaves. The browser and API
/// settings (`timeout_ms`, `response_timeout_ms`, `retries`, `browser`,
/// `viewport`, the base URLs) mirror the browser-driven suite so one file can
/// configure both; the scenario runner reports them at start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Storefront under test
    pub web_base_url: String,

    /// REST API used by API scenarios
    pub api_base_url: String,

    /// Default command timeout
    pub timeout_ms: u64,

    /// Maximum accepted API response time
    pub response_timeout_ms: u64,

    /// Retries per failing scenario
    pub retries: u32,

    pub browser: String,

    pub viewport: Viewport,

    /// Tolerance for computed-total comparisons
    pub total_tolerance: f64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            web_base_url: "https://commitquality.com".to_string(),
            api_base_url: Environment::Prod.api_base_url().to_string(),
            timeout_ms: 10_000,
            response_timeout_ms: 500,
            retries: 2,
            browser: "chrome".to_string(),
            viewport: Viewport::default(),
            total_tolerance: money::DEFAULT_TOLERANCE,
        }
    }
}

impl SuiteConfig {
    /// Point API calls at `env`
    pub fn with_environment(mut self, env: Environment) -> Self {
        self.api_base_url = env.api_base_url().to_string();
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport { width, height };
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading suite configuration");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "viewport must be non-zero, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if !(self.total_tolerance.is_finite() && self.total_tolerance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "total_tolerance must be positive, got {}",
                self.total_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();
        assert_eq!(config.web_base_url, "https://commitquality.com");
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.viewport, Viewport { width: 1280, height: 720 });
        assert_eq!(config.total_tolerance, 0.001);
    }

    #[test]
    fn test_environment_switch() {
        let config = SuiteConfig::default().with_environment(Environment::Staging);
        assert_eq!(config.api_base_url, "https://staging-api.example.com");
        let config = config.with_environment(Environment::Prod);
        assert_eq!(config.api_base_url, "https://jsonplaceholder.typicode.com");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SuiteConfig::from_toml_str(
            r#"
retries = 0
browser = "firefox"

[viewport]
width = 1920
height = 1080
"#,
        )
        .unwrap();

        assert_eq!(config.retries, 0);
        assert_eq!(config.browser, "firefox");
        assert_eq!(config.viewport.width, 1920);
        assert_eq!(config.response_timeout_ms, 500);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SuiteConfig::from_toml_str("total_tolerance = 0.0"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(SuiteConfig::default().with_viewport(0, 720).validate().is_err());
        assert!(matches!(
            SuiteConfig::from_toml_str("retries = \"many\""),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "web_base_url = \"http://localhost:3000\"").unwrap();

        let config = SuiteConfig::from_file(file.path()).unwrap();
        assert_eq!(config.web_base_url, "http://localhost:3000");
    }
}
