use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::core::mixin::Mixin;
use crate::core::options::MixinOptions;
use crate::core::value::Value;
use crate::symbols::*;

/// A TOML member document: ad-hoc members plus the types to reify from them
///
/// ```toml
/// reify = ["Contact"]
///
/// [members]
/// Name = "me"
/// MailTo = "me@somewhere.org"
/// Phone = "+64 4 ..."
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberDocument {
    /// Registered type names to reify, in order
    #[serde(default)]
    pub reify: Vec<String>,

    /// Ad-hoc members in document order
    #[serde(default)]
    pub members: toml::Table,
}

impl MemberDocument {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read member document {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse member document {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Builds the mixin: every member first, then each requested type is
    /// reified, document types before `extra_reify`.
    pub fn build(&self, options: MixinOptions, extra_reify: &[String]) -> Result<Mixin> {
        let mut mixin = Mixin::with_options(options);
        for (name, value) in &self.members {
            mixin.set_member(name.as_str(), Value::from(value.clone()));
        }
        debug!("Loaded {} ad-hoc members", self.members.len());

        for type_name in self.reify.iter().chain(extra_reify) {
            mixin
                .reify_named(type_name)
                .with_context(|| format!("Failed to reify {type_name}"))?;
            info!("{SYMBOL_ACTION_REIFY} Reified {type_name}");
        }

        Ok(mixin)
    }
}
