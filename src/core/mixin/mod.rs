//! The composite object.
//!
//! A [`Mixin`] resolves member names against its ad-hoc members first and
//! then against its composed backing objects, most recently composed first.
//! Backing objects are shared, not copied: writes go through to the real
//! object and reads always see its current state.

use indexmap::IndexMap;
use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

use crate::core::error::{CoercionError, MixinError, MixinResult};
use crate::core::options::{MixinOptions, ReifyPolicy};
use crate::core::properties::{Properties, PropertyDescriptor, Reify};
use crate::core::value::{PropertyValue, Value};

mod export;

#[cfg(test)]
mod tests;

/// Shared, interior-mutable handle to a backing object
pub type Shared<T> = Rc<RefCell<T>>;

/// Wraps a value so it can be composed into a mixin and still used directly
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// One entry of the delegation chain
#[derive(Clone)]
struct Backing {
    object: Shared<dyn Properties>,
    // Same allocation as `object`, kept for downcasting back to the concrete type
    any: Rc<dyn Any>,
    // Captured at composition so name lookups never borrow the object
    type_name: &'static str,
    descriptors: &'static [PropertyDescriptor],
}

impl Backing {
    fn new<T: Properties>(instance: Shared<T>) -> MixinResult<Self> {
        let (type_name, descriptors) = {
            let object = instance.try_borrow().map_err(|_| MixinError::Busy {
                type_name: std::any::type_name::<T>(),
            })?;
            (object.type_name(), object.descriptors())
        };
        let object: Shared<dyn Properties> = instance.clone();
        Ok(Self {
            object,
            any: instance,
            type_name,
            descriptors,
        })
    }

    fn is_same(&self, other: &Backing) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.object), Rc::as_ptr(&other.object))
    }

    fn descriptor(&self, name: &str) -> Option<&'static PropertyDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    fn readable(&self, name: &str) -> bool {
        self.descriptor(name).is_some_and(|d| d.access.can_read())
    }

    fn read(&self) -> MixinResult<Ref<'_, dyn Properties>> {
        self.object.try_borrow().map_err(|_| MixinError::Busy {
            type_name: self.type_name,
        })
    }

    fn write(&self) -> MixinResult<RefMut<'_, dyn Properties>> {
        self.object.try_borrow_mut().map_err(|_| MixinError::Busy {
            type_name: self.type_name,
        })
    }

    fn downcast<T: 'static>(&self) -> Option<Shared<T>> {
        Rc::clone(&self.any).downcast::<RefCell<T>>().ok()
    }
}

/// Ad-hoc members plus an ordered chain of backing objects
#[derive(Default)]
pub struct Mixin {
    members: IndexMap<String, Value>,
    composed: Vec<Backing>,
    options: MixinOptions,
}

impl fmt::Debug for Mixin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mixin")
            .field("members", &self.members)
            .field("composed", &self.composed_type_names())
            .field("options", &self.options)
            .finish()
    }
}

impl Mixin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MixinOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &MixinOptions {
        &self.options
    }

    /// Upserts an ad-hoc member without consulting backing objects
    pub fn set_member(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.members.insert(name.into(), value.into());
        self
    }

    /// Builder form of [`Mixin::set_member`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_member(name, value);
        self
    }

    /// Upserts every pair as an ad-hoc member
    pub fn with_members<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in pairs {
            self.set_member(name, value);
        }
        self
    }

    /// Prepends a backing object to the delegation chain.
    ///
    /// Fails with [`MixinError::NullReference`] for `None` and with
    /// [`MixinError::DuplicateComposition`] if the same reference is already
    /// composed, and with [`MixinError::Busy`] if the caller holds a mutable
    /// borrow of it. Nothing changes on failure.
    pub fn compose_with<T: Properties>(
        &mut self,
        instance: impl Into<Option<Shared<T>>>,
    ) -> MixinResult<&mut Self> {
        let instance = instance.into().ok_or(MixinError::NullReference)?;
        self.link(Backing::new(instance)?)?;
        Ok(self)
    }

    /// Merges another mixin: its members win on collision, then each of its
    /// backing objects is composed in its order.
    ///
    /// Duplicates are checked for every object before anything is merged.
    pub fn compose_mixin(&mut self, other: &Mixin) -> MixinResult<&mut Self> {
        if let Some(duplicate) = other
            .composed
            .iter()
            .find(|candidate| self.composed.iter().any(|b| b.is_same(candidate)))
        {
            return Err(MixinError::DuplicateComposition {
                type_name: duplicate.type_name,
            });
        }

        for (name, value) in &other.members {
            self.members.insert(name.clone(), value.clone());
        }
        for backing in &other.composed {
            self.link(backing.clone())?;
        }
        Ok(self)
    }

    fn link(&mut self, backing: Backing) -> MixinResult<()> {
        if self.composed.iter().any(|b| b.is_same(&backing)) {
            return Err(MixinError::DuplicateComposition {
                type_name: backing.type_name,
            });
        }
        debug!(
            "Composing {} at the front of {} backing objects",
            backing.type_name,
            self.composed.len()
        );
        self.composed.insert(0, backing);
        Ok(())
    }

    /// Resolves a member: ad-hoc members first, then the first backing object
    /// with a readable property of that name.
    ///
    /// Fails with [`MixinError::Busy`] if that object is mutably borrowed
    /// elsewhere.
    pub fn get(&self, name: &str) -> MixinResult<Value> {
        if let Some(value) = self.members.get(name) {
            trace!("Resolved '{name}' from ad-hoc members");
            return Ok(value.clone());
        }

        for backing in self.composed.iter().filter(|b| b.readable(name)) {
            if let Some(value) = backing.read()?.get_property(name) {
                trace!("Resolved '{name}' from {}", backing.type_name);
                return Ok(value);
            }
        }

        Err(MixinError::MemberNotFound(name.to_string()))
    }

    /// Resolves a member and converts it to `T`
    pub fn get_as<T: PropertyValue>(&self, name: &str) -> MixinResult<T> {
        let value = self.get(name)?;
        T::from_value(value).map_err(|source| MixinError::coercion(name, source))
    }

    /// Whether [`Mixin::get`] would resolve `name`
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
            || self.composed.iter().any(|backing| backing.readable(name))
    }

    /// Assigns a member.
    ///
    /// Existing ad-hoc members are overwritten in place. Otherwise the first
    /// backing object with a writable property of that name receives the
    /// value, coerced to the property's type. Unresolved names become new
    /// ad-hoc members holding the value as given. A target object that is
    /// borrowed elsewhere fails the call with [`MixinError::Busy`].
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> MixinResult<()> {
        let value = value.into();

        if let Some(slot) = self.members.get_mut(name) {
            *slot = value;
            return Ok(());
        }

        let target = self.composed.iter().find_map(|backing| {
            let descriptor = backing.descriptor(name)?;
            descriptor
                .access
                .can_write()
                .then_some((backing, descriptor))
        });

        if let Some((backing, descriptor)) = target {
            let coerced = descriptor
                .coerce(value)
                .map_err(|source| MixinError::coercion(name, source))?;
            let written = backing
                .write()?
                .set_property(name, coerced)
                .map_err(|source| MixinError::coercion(name, source))?;
            if !written {
                warn!(
                    "{} declares '{name}' writable but did not accept the value",
                    backing.type_name
                );
            }
            return Ok(());
        }

        debug!("Adding ad-hoc member '{name}'");
        self.members.insert(name.to_string(), value);
        Ok(())
    }

    /// Returns the composed instance of `T`, or builds one from the ad-hoc
    /// members and composes it.
    ///
    /// Members that match a writable property of `T` move into the new
    /// instance and stop being ad-hoc. Under [`ReifyPolicy::Atomic`] a single
    /// non-coercible member fails the call before anything changes; under
    /// [`ReifyPolicy::SkipInvalid`] such members stay ad-hoc.
    pub fn reify_as<T: Reify>(&mut self) -> MixinResult<Shared<T>> {
        if let Some(existing) = self.composed.iter().find_map(Backing::downcast::<T>) {
            trace!("Reusing composed {}", T::TYPE_NAME);
            return Ok(existing);
        }

        let mut pending = Vec::new();
        for descriptor in T::property_descriptors()
            .iter()
            .filter(|d| d.access.can_write())
        {
            let Some(value) = self.members.get(descriptor.name) else {
                continue;
            };
            match descriptor.coerce(value.clone()) {
                Ok(coerced) => pending.push((descriptor.name, coerced)),
                Err(source) => self.reject(descriptor.name, T::TYPE_NAME, source)?,
            }
        }

        let mut instance = T::construct()?;
        let mut moved = Vec::with_capacity(pending.len());
        for (name, value) in pending {
            match instance.set_property(name, value) {
                Ok(true) => moved.push(name),
                Ok(false) => {}
                Err(source) => self.reject(name, T::TYPE_NAME, source)?,
            }
        }

        for name in &moved {
            self.members.shift_remove(*name);
        }
        debug!(
            "Reified {} from {} ad-hoc members",
            T::TYPE_NAME,
            moved.len()
        );

        let instance = shared(instance);
        self.link(Backing::new(Rc::clone(&instance))?)?;
        Ok(instance)
    }

    fn reject(
        &self,
        name: &str,
        type_name: &str,
        source: CoercionError,
    ) -> MixinResult<()> {
        match self.options.reify_policy {
            ReifyPolicy::Atomic => Err(MixinError::coercion(name, source)),
            ReifyPolicy::SkipInvalid => {
                warn!("Keeping '{name}' ad-hoc, it does not fit {type_name}: {source}");
                Ok(())
            }
        }
    }

    /// Every property name declared by a backing object plus every ad-hoc
    /// member name. Recomputed on each call.
    pub fn member_names(&self) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self.members.keys().cloned().collect();
        for backing in &self.composed {
            names.extend(backing.descriptors.iter().map(|d| d.name.to_string()));
        }
        names
    }

    /// Names of the ad-hoc members in insertion order
    pub fn ad_hoc_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// The ad-hoc member `name`, ignoring backing objects
    pub fn member(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    /// Type names of the backing objects in resolution order
    pub fn composed_type_names(&self) -> Vec<&'static str> {
        self.composed.iter().map(|b| b.type_name).collect()
    }

    pub fn composed_len(&self) -> usize {
        self.composed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.composed.is_empty()
    }
}
