// Library interface for mixin
pub mod backings;
pub mod cli;
pub mod config;
pub mod core;
pub mod symbols;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::core::error::{CoercionError, ExportError, MixinError, MixinResult};
pub use crate::core::flatten::{flatten, Expando, ExpandoExt};
pub use crate::core::mixin::{shared, Mixin, Shared};
pub use crate::core::options::{MixinOptions, ReifyPolicy};
pub use crate::core::properties::{Access, Properties, PropertyDescriptor, Reify};
pub use crate::core::value::{Decimal, PropertyValue, Value, ValueKind};
