// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unit type registry.
//!
//! Persisted stacks only record a [`UnitType`] tag. Turning a tag back into a
//! live [`Unit`] goes through a [`UnitRegistry`] that the application
//! populates at startup and shares (via `Rc`) with every stack.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::fmt;

use crate::error::Error;
use crate::unit::{Unit, UnitType};

type Factory = Box<dyn Fn() -> Box<dyn Unit>>;

/// Maps stable unit type tags to factories.
#[derive(Default)]
pub struct UnitRegistry {
    factories: BTreeMap<UnitType, Factory>,
}

impl fmt::Debug for UnitRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitRegistry")
            .field("types", &self.factories.keys().collect::<alloc::vec::Vec<_>>())
            .finish()
    }
}

impl UnitRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for `ty`.
    ///
    /// # Panics
    ///
    /// Panics if `ty` is already registered.
    pub fn register(
        &mut self,
        ty: impl Into<UnitType>,
        factory: impl Fn() -> Box<dyn Unit> + 'static,
    ) -> &mut Self {
        let ty = ty.into();
        assert!(
            !self.factories.contains_key(&ty),
            "unit type `{ty}` is already registered"
        );
        self.factories.insert(ty, Box::new(factory));
        self
    }

    /// Registers `T::default()` as the factory for `ty`.
    ///
    /// # Panics
    ///
    /// Panics if `ty` is already registered.
    pub fn register_default<T: Unit + Default>(&mut self, ty: impl Into<UnitType>) -> &mut Self {
        self.register(ty, || Box::new(T::default()))
    }

    /// Returns `true` if a factory exists for `ty`.
    #[must_use]
    pub fn contains(&self, ty: &UnitType) -> bool {
        self.factories.contains_key(ty)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Instantiates a fresh unit of type `ty`.
    pub fn instantiate(&self, ty: &UnitType) -> Result<Box<dyn Unit>, Error> {
        self.factories
            .get(ty)
            .map(|factory| factory())
            .ok_or_else(|| Error::UnknownUnitType(ty.clone()))
    }
}
