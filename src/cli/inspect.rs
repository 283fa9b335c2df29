use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use crate::cli::document::MemberDocument;
use crate::config::{Config, OutputFormat};
use crate::core::config_schema::ConfigSchema;
use crate::core::properties::Access;
use crate::core::registry::registered_types;

/// Loads a member document and renders the mixin's structured export
pub fn render_export(
    document: &Path,
    format: Option<OutputFormat>,
    reify: &[String],
    config: &Config,
) -> Result<String> {
    let mixin = MemberDocument::load(document)?.build(config.get_mixin_options(), reify)?;

    match format.unwrap_or_else(|| config.get_output_format()) {
        OutputFormat::Json => {
            let json = mixin.to_json().context("Failed to export mixin as JSON")?;
            serde_json::to_string_pretty(&json).context("Failed to render JSON")
        }
        OutputFormat::Xml => mixin.to_xml().context("Failed to export mixin as XML"),
    }
}

/// One member name per line, sorted
pub fn render_names(document: &Path, config: &Config) -> Result<String> {
    let mixin = MemberDocument::load(document)?.build(config.get_mixin_options(), &[])?;

    let mut output = String::new();
    for name in mixin.member_names() {
        writeln!(output, "{name}")?;
    }
    Ok(output)
}

/// Registered backing types and the properties each declares
pub fn render_types() -> Result<String> {
    let mut output = String::new();
    for descriptor in registered_types() {
        writeln!(output, "{:<12} {}", descriptor.name, descriptor.summary)?;
        for property in (descriptor.properties)() {
            let kind = if property.nullable {
                format!("{}?", property.kind)
            } else {
                property.kind.to_string()
            };
            let access = match property.access {
                Access::Read => "read-only",
                Access::Write => "write-only",
                Access::ReadWrite => "read-write",
            };
            writeln!(output, "  {:<14} {kind:<10} {access}", property.name)?;
        }
    }
    Ok(output)
}

pub fn render_schema() -> Result<String> {
    <Config as ConfigSchema>::json_schema()
}
