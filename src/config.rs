//! Gateway configuration.
//!
//! Names the collection holding task documents and the field that scopes
//! them to their owner. Both default to the names the hosted schema uses.

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_COLLECTION: &str = "tasks";
const DEFAULT_OWNER_FIELD: &str = "userId";

/// Where task documents live in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GatewayConfig {
    /// Collection holding task documents.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Document field carrying the owner identity.
    #[serde(default = "default_owner_field")]
    pub owner_field: String,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_owned()
}

fn default_owner_field() -> String {
    DEFAULT_OWNER_FIELD.to_owned()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            owner_field: default_owner_field(),
        }
    }
}

impl GatewayConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown keys and
    /// [`ConfigError::EmptyValue`] when a name is blank.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every name is non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyValue`] naming the first blank key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.trim().is_empty() {
            return Err(ConfigError::EmptyValue("collection"));
        }
        if self.owner_field.trim().is_empty() {
            return Err(ConfigError::EmptyValue("ownerField"));
        }
        Ok(())
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid configuration JSON.
    #[error("invalid gateway configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required name is blank.
    #[error("configuration key `{0}` must not be empty")]
    EmptyValue(&'static str),
}
