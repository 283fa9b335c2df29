use crate::symbols::*;
use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Trait for configuration sections with schema support
pub trait ConfigSchema: DeserializeOwned + JsonSchema {
    /// The name of this configuration schema (for error reporting)
    fn schema_name() -> &'static str;

    /// Validate the configuration and provide detailed error messages
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Parse and validate configuration from TOML value
    fn from_toml_value(value: &toml::Value) -> Result<Self> {
        let config: Self = value.clone().try_into().with_context(|| {
            format!(
                "Failed to parse {} configuration",
                <Self as ConfigSchema>::schema_name()
            )
        })?;

        config.validate().with_context(|| {
            format!(
                "Invalid {} configuration",
                <Self as ConfigSchema>::schema_name()
            )
        })?;

        Ok(config)
    }

    /// JSON schema of this section, pretty printed
    fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(Self);
        serde_json::to_string_pretty(&schema).context("Failed to render JSON schema")
    }
}

/// Helper functions for common validation patterns
pub struct ValidationHelpers;

impl ValidationHelpers {
    /// Validate that a value is one of the allowed choices
    pub fn validate_choice(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
        if !allowed.contains(&value) {
            return Err(anyhow::anyhow!(
                "Invalid {field} '{value}'. Allowed values: {allowed:?}"
            ));
        }
        Ok(())
    }

    /// Format a validation error message for a configuration section
    pub fn format_validation_error(section: &str, error: &anyhow::Error) -> String {
        // Extract the most specific error from the chain
        let root_error = error
            .chain()
            .last()
            .map(|e| e.to_string())
            .unwrap_or_else(|| error.to_string());

        format!(
            "{SYMBOL_INDICATOR_WARNING} Configuration validation failed\n\
             Error: {root_error}\n\
             Check: [{section}] in mixin.toml\n\
             Note: Continuing with default configuration"
        )
    }
}
