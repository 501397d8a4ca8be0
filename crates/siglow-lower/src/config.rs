//! Lowering configuration (siglow.toml)
//!
//! Every key is optional:
//!
//! ```toml
//! [lowering]
//! nullable-style = "suffix"
//! emit-native-defaults = true
//! placeholder = "__Unresolved"
//! threads = 0
//!
//! [types]
//! value-types = ["Color", "Point"]
//! ```

use serde::{Deserialize, Serialize};
use siglow_types::{NullableStyle, ValueTypeRegistry};
use std::path::Path;

use crate::error::ConfigError;

/// Config file name looked up next to the input model
pub const CONFIG_FILE_NAME: &str = "siglow.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoweringConfig {
    pub lowering: LoweringOptions,
    pub types: TypesConfig,
}

/// Knobs for overload synthesis and emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoweringOptions {
    /// Spelling of wrapped nullable value types
    pub nullable_style: NullableStyle,
    /// Keep `= literal` on the canonical overload's trailing defaulted params
    pub emit_native_defaults: bool,
    /// Marker type for declarations whose type could not be mapped
    pub placeholder: String,
    /// Worker threads for the whole-program pass; 0 means one per CPU
    pub threads: usize,
}

fn default_placeholder() -> String {
    "__Unresolved".to_string()
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            nullable_style: NullableStyle::Suffix,
            emit_native_defaults: true,
            placeholder: default_placeholder(),
            threads: 0,
        }
    }
}

/// User value types recognized by the nullable mapper
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TypesConfig {
    pub value_types: Vec<String>,
}

impl LoweringConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LoweringConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let placeholder = self.lowering.placeholder.trim();
        if placeholder.is_empty() {
            return Err(ConfigError::Invalid(
                "lowering.placeholder must not be empty".to_string(),
            ));
        }
        if placeholder.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "lowering.placeholder '{}' must be a single identifier",
                self.lowering.placeholder
            )));
        }
        if let Some(bad) = self.types.value_types.iter().find(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "types.value-types contains an empty name ({:?})",
                bad
            )));
        }
        Ok(())
    }

    /// Value-type registry for the mapper
    pub fn registry(&self) -> ValueTypeRegistry {
        ValueTypeRegistry::with_user_types(self.types.value_types.iter().cloned())
    }

    /// Number of worker threads the pass should use
    pub fn worker_count(&self) -> usize {
        match self.lowering.threads {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }
}
