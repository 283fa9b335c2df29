use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::config_schema::ConfigSchema;

/// What reification does with a member that cannot be coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ReifyPolicy {
    /// Validate every pending member first and fail without changing anything
    #[default]
    Atomic,
    /// Leave non-coercible members ad-hoc and populate the rest
    SkipInvalid,
}

impl std::fmt::Display for ReifyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReifyPolicy::Atomic => write!(f, "atomic"),
            ReifyPolicy::SkipInvalid => write!(f, "skip-invalid"),
        }
    }
}

/// Behaviour switches fixed when a mixin is created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MixinOptions {
    #[schemars(description = "How reification treats members that cannot be converted")]
    pub reify_policy: ReifyPolicy,

    #[schemars(description = "Emit null ad-hoc members as empty elements during export")]
    pub export_nulls: bool,
}

impl ConfigSchema for MixinOptions {
    fn schema_name() -> &'static str {
        "MixinOptions"
    }
}
