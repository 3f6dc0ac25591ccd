//! provider configuration
//!
//! Layers, lowest precedence first:
//! 1. [ProviderConfig::default]
//! 2. a yaml file ([ConfigOverrides::from_yaml_file])
//! 3. the `provider "instana"` block of the loaded documents
//! 4. command line flags
//!
//! Each layer is a [ConfigOverrides] applied with [ProviderConfig::apply].
use crate::resources::ResourceNameFormatter;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_NAME_SUFFIX: &str = " (TF managed)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderConfig {
    pub default_name_prefix: String,
    pub default_name_suffix: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default_name_prefix: String::new(),
            default_name_suffix: DEFAULT_NAME_SUFFIX.to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(prefix) = overrides.default_name_prefix {
            self.default_name_prefix = prefix;
        }
        if let Some(suffix) = overrides.default_name_suffix {
            self.default_name_suffix = suffix;
        }
    }

    pub fn name_formatter(&self) -> ResourceNameFormatter {
        ResourceNameFormatter::new(
            self.default_name_prefix.clone(),
            self.default_name_suffix.clone(),
        )
    }
}

/// One configuration layer, unset values keep the value of the layer below
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub default_name_prefix: Option<String>,
    #[serde(default)]
    pub default_name_suffix: Option<String>,
}

impl ConfigOverrides {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // an empty file is an empty layer
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!(path=%path.display(), "loading config file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Reads the attributes of a `provider "instana"` block
    ///
    /// Only literal string values are accepted, other provider attributes (endpoint, api token)
    /// are ignored.
    pub fn from_provider_block(body: &hcl_edit::structure::Body) -> Result<Self, ConfigError> {
        let mut overrides = Self::default();

        for attribute in body.attributes() {
            let key = attribute.key.value().as_str();
            let target = match key {
                "default_name_prefix" => &mut overrides.default_name_prefix,
                "default_name_suffix" => &mut overrides.default_name_suffix,
                _ => {
                    tracing::debug!(attribute = key, "ignoring provider attribute");
                    continue;
                }
            };

            let expression: hcl::Expression = attribute.value.clone().into();
            let hcl::Expression::String(value) = expression else {
                return Err(ConfigError::NotAString(key.to_string()));
            };
            *target = Some(value);
        }

        Ok(overrides)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read config file")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file")]
    Yaml(#[from] serde_yaml::Error),
    #[error("provider attribute {0} must be a string literal")]
    NotAString(String),
}
