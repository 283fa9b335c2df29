use thiserror::Error;

use crate::core::value::ValueKind;

/// A value that could not be converted to the declared type of a property
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot convert {from} to {to}: {reason}")]
pub struct CoercionError {
    /// Kind name of the source value
    pub from: &'static str,
    /// Kind name of the target property
    pub to: String,
    pub reason: String,
}

impl CoercionError {
    pub fn new(from: &'static str, to: &ValueKind, reason: impl Into<String>) -> Self {
        Self {
            from,
            to: to.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failures raised by a structured writer
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("XML write failed: {0}")]
    Xml(String),

    #[error("JSON conversion failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unbalanced element nesting: {0}")]
    Nesting(String),

    #[error("element name must not be empty")]
    EmptyName,

    #[error("'{0}' is not a valid XML element name")]
    InvalidName(String),
}

/// Errors raised by mixin operations
#[derive(Debug, Error)]
pub enum MixinError {
    /// An absent instance was passed to a composition call
    #[error("cannot compose an absent instance")]
    NullReference,

    /// The same object reference is already part of the mixin
    #[error("the {type_name} instance is already mixed in")]
    DuplicateComposition { type_name: &'static str },

    /// No ad-hoc member or backing property carries the name
    #[error("member '{0}' not found")]
    MemberNotFound(String),

    /// A value could not be converted to the target property type
    #[error("member '{member}' could not be coerced")]
    TypeCoercion {
        member: String,
        #[source]
        source: CoercionError,
    },

    /// The target type of a reification could not be constructed
    #[error("cannot construct {type_name}: {reason}")]
    Construction { type_name: String, reason: String },

    /// A backing object is already borrowed through another handle
    #[error("the {type_name} instance is borrowed elsewhere")]
    Busy { type_name: &'static str },

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl MixinError {
    pub fn coercion(member: impl Into<String>, source: CoercionError) -> Self {
        MixinError::TypeCoercion {
            member: member.into(),
            source,
        }
    }
}

/// Result type for mixin operations
pub type MixinResult<T> = Result<T, MixinError>;
