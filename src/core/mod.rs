pub mod coerce;
pub mod config_schema;
pub mod error;
pub mod export;
pub mod flatten;
pub mod mixin;
pub mod options;
pub mod properties;
pub mod registry;
pub mod value;
