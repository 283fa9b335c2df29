use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::core::config_schema::{ConfigSchema, ValidationHelpers};
use crate::core::options::MixinOptions;

/// Timestamp layouts the log timer understands (time crate format syntax)
pub const SUPPORTED_TIME_FORMATS: &[&str] = &[
    "[year]-[month]-[day] [hour]:[minute]:[second]",
    "[hour]:[minute]:[second]",
    "[month]-[day] [hour]:[minute]",
    "[year]/[month]/[day] [hour]:[minute]:[second]",
];

pub const DEFAULT_TIME_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]:[second]";

/// Configuration for the mixin inspector
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    /// Logging configuration
    pub logging: Option<LoggingConfig>,

    /// Options applied to every mixin the inspector builds
    #[schemars(with = "Option<MixinOptions>")]
    pub mixin: Option<toml::Value>,

    /// Output configuration
    pub output: Option<OutputConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct LoggingConfig {
    /// Enable verbose logging by default
    pub verbose: Option<bool>,

    /// Time format for log timestamps (uses time crate format syntax)
    pub time_format: Option<String>,
}

/// Export output configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct OutputConfig {
    /// Default export format when `--format` is not given
    pub format: Option<OutputFormat>,
}

/// Structured export format
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
}

impl ConfigSchema for LoggingConfig {
    fn schema_name() -> &'static str {
        "logging"
    }

    fn validate(&self) -> Result<()> {
        if let Some(time_format) = &self.time_format {
            ValidationHelpers::validate_choice("time_format", time_format, SUPPORTED_TIME_FORMATS)?;
        }
        Ok(())
    }
}

impl ConfigSchema for Config {
    fn schema_name() -> &'static str {
        "mixin inspector"
    }

    fn validate(&self) -> Result<()> {
        if let Some(logging) = &self.logging {
            logging.validate().with_context(|| {
                format!(
                    "Invalid [{}] section",
                    <LoggingConfig as ConfigSchema>::schema_name()
                )
            })?;
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        let config: Config =
            toml::from_str(&content).context("Failed to parse config file as TOML")?;
        config.validate()?;

        Ok(config)
    }

    /// Try to load configuration from standard locations
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Get potential configuration file paths in order of preference
    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("mixin.toml"), PathBuf::from(".mixin.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("mixin").join("config.toml"));
        }

        paths
    }

    /// Check if verbose logging is enabled by default
    pub fn is_verbose_default(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    /// Get the time format for log timestamps
    pub fn get_time_format(&self) -> String {
        self.logging
            .as_ref()
            .and_then(|l| l.time_format.clone())
            .unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string())
    }

    pub fn get_output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|o| o.format)
            .unwrap_or_default()
    }

    /// Options for new mixins; an invalid `[mixin]` section falls back to defaults
    pub fn get_mixin_options(&self) -> MixinOptions {
        let Some(section) = &self.mixin else {
            return MixinOptions::default();
        };

        match MixinOptions::from_toml_value(section) {
            Ok(options) => options,
            Err(e) => {
                let error_msg = ValidationHelpers::format_validation_error("mixin", &e);
                warn!("{error_msg}");
                MixinOptions::default()
            }
        }
    }
}
