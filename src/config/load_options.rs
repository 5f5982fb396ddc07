//! Load options
//!
//! Options can be built in code or read from a YAML file:
//!
//! ```yaml
//! max_dense_elements: 1000000
//! lazy: true
//! infer_domains: false
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::utils::ConfigError;

/// Default cap on the Cartesian size of a single symbol
pub const DEFAULT_MAX_DENSE_ELEMENTS: u64 = 100_000_000;

/// Options recognized by [`crate::load`]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    /// Reject symbols whose dense size exceeds this many elements
    pub max_dense_elements: u64,

    /// Defer dense allocation of each array until first access
    pub lazy: bool,

    /// Narrow universe-declared dimensions to the smallest covering Set
    pub infer_domains: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_dense_elements: DEFAULT_MAX_DENSE_ELEMENTS,
            lazy: false,
            infer_domains: false,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_dense_elements(mut self, max: u64) -> Self {
        self.max_dense_elements = max;
        self
    }

    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn with_infer_domains(mut self, infer: bool) -> Self {
        self.infer_domains = infer;
        self
    }

    /// Load options from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse options from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let options: LoadOptions =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Check option invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_dense_elements == 0 {
            return Err(ConfigError::Invalid(
                "max_dense_elements must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
