//! Backing types that can be reified by name.
//!
//! Types register themselves with [`register_backing!`](crate::register_backing)
//! and are collected at link time through `inventory`.

use std::fmt;

use crate::core::error::{MixinError, MixinResult};
use crate::core::mixin::{Mixin, Shared};
use crate::core::properties::{Properties, PropertyDescriptor};

/// Backing type descriptor for auto-registration
#[derive(Clone)]
pub struct BackingDescriptor {
    pub name: &'static str,
    pub summary: &'static str,
    pub properties: fn() -> &'static [PropertyDescriptor],
    pub reify: fn(&mut Mixin) -> MixinResult<Shared<dyn Properties>>,
}

impl fmt::Debug for BackingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackingDescriptor")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .field("properties", &(self.properties)())
            .finish_non_exhaustive()
    }
}

inventory::collect!(BackingDescriptor);

/// Registers a [`Reify`](crate::core::properties::Reify) type under its type name
///
/// Usage:
/// ```rust,ignore
/// register_backing!(Contact, "Person name and mailbox");
/// ```
#[macro_export]
macro_rules! register_backing {
    ($backing_type:ty, $summary:literal) => {
        inventory::submit! {
            $crate::core::registry::BackingDescriptor {
                name: <$backing_type as $crate::core::properties::Reify>::TYPE_NAME,
                summary: $summary,
                properties: <$backing_type as $crate::core::properties::Reify>::property_descriptors,
                reify: |mixin| {
                    let instance: $crate::core::mixin::Shared<
                        dyn $crate::core::properties::Properties,
                    > = mixin.reify_as::<$backing_type>()?;
                    Ok(instance)
                },
            }
        }
    };
}

/// Every registered backing type, sorted by name
pub fn registered_types() -> Vec<&'static BackingDescriptor> {
    let mut types: Vec<_> = inventory::iter::<BackingDescriptor>.into_iter().collect();
    types.sort_by_key(|descriptor| descriptor.name);
    types
}

pub fn find_type(name: &str) -> Option<&'static BackingDescriptor> {
    inventory::iter::<BackingDescriptor>
        .into_iter()
        .find(|descriptor| descriptor.name == name)
}

impl Mixin {
    /// [`Mixin::reify_as`] for the backing type registered under `type_name`
    pub fn reify_named(&mut self, type_name: &str) -> MixinResult<Shared<dyn Properties>> {
        let descriptor = find_type(type_name).ok_or_else(|| MixinError::Construction {
            type_name: type_name.to_string(),
            reason: "no backing type is registered under this name".to_string(),
        })?;
        (descriptor.reify)(self)
    }
}
