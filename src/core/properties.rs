//! The capability a type needs in order to back a mixin.
//!
//! Instead of runtime reflection, each backing type describes its named
//! properties explicitly through [`Properties`]. The [`properties!`] macro
//! writes the implementation for plain structs whose properties are fields.

use crate::core::coerce::coerce;
use crate::core::error::{CoercionError, ExportError, MixinError};
use crate::core::export::{write_value, StructuredWriter};
use crate::core::value::{PropertyValue, Value, ValueKind};

/// Whether a property has a getter, a setter or both
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub const fn can_read(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    pub const fn can_write(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}

/// Static description of one named property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub kind: ValueKind,
    pub nullable: bool,
    pub access: Access,
}

impl PropertyDescriptor {
    pub const fn new(name: &'static str, kind: ValueKind, nullable: bool, access: Access) -> Self {
        Self {
            name,
            kind,
            nullable,
            access,
        }
    }

    /// Descriptor for a property stored as the Rust type `T`
    pub const fn of<T: PropertyValue>(name: &'static str, access: Access) -> Self {
        Self::new(name, T::KIND, T::NULLABLE, access)
    }

    /// Converts `value` to this property's declared type
    pub fn coerce(&self, value: Value) -> Result<Value, CoercionError> {
        if value.is_null() && self.nullable {
            return Ok(Value::Null);
        }
        coerce(value, &self.kind)
    }
}

/// Named-property accessor implemented by every backing-object type
pub trait Properties: 'static {
    /// Type name used by export and error messages.
    ///
    /// A mixin reads this once, when the object is composed.
    fn type_name(&self) -> &'static str;

    /// Every data-bearing property the type exposes, read once at composition
    fn descriptors(&self) -> &'static [PropertyDescriptor];

    /// Current value of a readable property, `None` if there is no such getter
    fn get_property(&self, name: &str) -> Option<Value>;

    /// Stores a value already coerced to the declared kind.
    ///
    /// Returns `Ok(false)` when the type has no writable property `name`.
    fn set_property(&mut self, name: &str, value: Value) -> Result<bool, CoercionError>;

    fn descriptor(&self, name: &str) -> Option<&'static PropertyDescriptor> {
        self.descriptors().iter().find(|d| d.name == name)
    }

    fn readable(&self, name: &str) -> bool {
        self.descriptor(name).is_some_and(|d| d.access.can_read())
    }

    /// Writes the object as one element named after its type.
    ///
    /// Null properties are omitted.
    fn export(&self, writer: &mut dyn StructuredWriter) -> Result<(), ExportError> {
        writer.begin_element(self.type_name())?;
        for descriptor in self.descriptors().iter().filter(|d| d.access.can_read()) {
            if let Some(value) = self.get_property(descriptor.name) {
                write_value(writer, descriptor.name, &value)?;
            }
        }
        writer.end_element()
    }
}

/// Types a mixin can construct and populate on demand
pub trait Reify: Properties + Sized {
    const TYPE_NAME: &'static str;

    /// Descriptors available before an instance exists
    fn property_descriptors() -> &'static [PropertyDescriptor];

    /// Builds the default instance used for reification
    fn construct() -> Result<Self, MixinError>;
}

/// Implements [`Properties`] and [`Reify`] for a struct with read/write fields
///
/// The struct must implement `Default` and every field type must implement
/// [`PropertyValue`].
///
/// Usage:
/// ```rust,ignore
/// #[derive(Default)]
/// struct Contact { name: String, mail_to: String }
///
/// properties!(Contact { "Name" => name: String, "MailTo" => mail_to: String });
/// ```
#[macro_export]
macro_rules! properties {
    ($ty:ident { $($prop:literal => $field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::core::properties::Properties for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn descriptors(&self) -> &'static [$crate::core::properties::PropertyDescriptor] {
                <Self as $crate::core::properties::Reify>::property_descriptors()
            }

            fn get_property(&self, name: &str) -> Option<$crate::core::value::Value> {
                match name {
                    $($prop => Some($crate::core::value::PropertyValue::into_value(
                        ::std::clone::Clone::clone(&self.$field),
                    )),)*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn set_property(
                &mut self,
                name: &str,
                value: $crate::core::value::Value,
            ) -> Result<bool, $crate::core::error::CoercionError> {
                match name {
                    $($prop => {
                        self.$field =
                            <$fty as $crate::core::value::PropertyValue>::from_value(value)?;
                        Ok(true)
                    })*
                    _ => Ok(false),
                }
            }
        }

        impl $crate::core::properties::Reify for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn property_descriptors() -> &'static [$crate::core::properties::PropertyDescriptor] {
                const DESCRIPTORS: &[$crate::core::properties::PropertyDescriptor] = &[
                    $($crate::core::properties::PropertyDescriptor::of::<$fty>(
                        $prop,
                        $crate::core::properties::Access::ReadWrite,
                    ),)*
                ];
                DESCRIPTORS
            }

            fn construct() -> Result<Self, $crate::core::error::MixinError> {
                Ok(<Self as ::std::default::Default>::default())
            }
        }
    };
}
