//! Tests for mixin member resolution, composition, reification and export

use crate::core::error::{CoercionError, MixinError};
use crate::core::mixin::{shared, Mixin, Shared};
use crate::core::options::{MixinOptions, ReifyPolicy};
use crate::core::properties::{Access, Properties, PropertyDescriptor, Reify};
use crate::core::value::{PropertyValue, Value, ValueKind};
use std::rc::Rc;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Contact {
    pub name: String,
    pub mail_to: String,
}

crate::properties!(Contact {
    "Name" => name: String,
    "MailTo" => mail_to: String,
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub country: String,
}

crate::properties!(Address {
    "Street" => street: String,
    "Country" => country: String,
});

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl PropertyValue for Priority {
    const KIND: ValueKind = ValueKind::Enum(&["Low", "Normal", "High"]);

    fn into_value(self) -> Value {
        let variant = match self {
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
        };
        Value::Enum(variant.to_string())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match crate::core::coerce::coerce(value, &Self::KIND)? {
            Value::Enum(variant) => match variant.as_str() {
                "Low" => Ok(Priority::Low),
                "Normal" => Ok(Priority::Normal),
                _ => Ok(Priority::High),
            },
            other => Err(CoercionError::new(other.kind_name(), &Self::KIND, "not a variant")),
        }
    }
}

/// Typed record used to exercise coercion on write-through
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub age: i32,
    pub score: f64,
    pub level: u8,
    pub priority: Priority,
    pub nickname: Option<String>,
}

crate::properties!(Profile {
    "Name" => name: String,
    "Age" => age: i32,
    "Score" => score: f64,
    "Level" => level: u8,
    "Priority" => priority: Priority,
    "Nickname" => nickname: Option<String>,
});

/// Hand-written accessor with a read-only and a write-only property
#[derive(Debug, Default)]
pub struct Badge {
    pub id: String,
    pub secret: String,
}

const BADGE_PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::new("Id", ValueKind::Text, false, Access::Read),
    PropertyDescriptor::new("Secret", ValueKind::Text, false, Access::Write),
];

impl Properties for Badge {
    fn type_name(&self) -> &'static str {
        "Badge"
    }

    fn descriptors(&self) -> &'static [PropertyDescriptor] {
        BADGE_PROPERTIES
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        match name {
            "Id" => Some(Value::Text(self.id.clone())),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<bool, CoercionError> {
        match name {
            "Secret" => {
                self.secret = String::from_value(value)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl Reify for Badge {
    const TYPE_NAME: &'static str = "Badge";

    fn property_descriptors() -> &'static [PropertyDescriptor] {
        BADGE_PROPERTIES
    }

    fn construct() -> Result<Self, MixinError> {
        Ok(Badge::default())
    }
}

/// Type whose construction is refused
#[derive(Debug)]
pub struct Probe;

impl Properties for Probe {
    fn type_name(&self) -> &'static str {
        "Probe"
    }

    fn descriptors(&self) -> &'static [PropertyDescriptor] {
        &[]
    }

    fn get_property(&self, _name: &str) -> Option<Value> {
        None
    }

    fn set_property(&mut self, _name: &str, _value: Value) -> Result<bool, CoercionError> {
        Ok(false)
    }
}

impl Reify for Probe {
    const TYPE_NAME: &'static str = "Probe";

    fn property_descriptors() -> &'static [PropertyDescriptor] {
        &[]
    }

    fn construct() -> Result<Self, MixinError> {
        Err(MixinError::Construction {
            type_name: Self::TYPE_NAME.to_string(),
            reason: "a probe needs a device handle".to_string(),
        })
    }
}

pub fn me() -> Shared<Contact> {
    shared(Contact {
        name: "me".to_string(),
        mail_to: "me@somewhere.org".to_string(),
    })
}

pub fn home() -> Shared<Address> {
    shared(Address {
        street: "1 Main St".to_string(),
        country: "NZL".to_string(),
    })
}

mod composition;
