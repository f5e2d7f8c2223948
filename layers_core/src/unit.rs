// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The unit contract: what a stack drives through its lifecycle.
//!
//! A [`Unit`] is one screen-like panel. Every hook has a default, so a unit
//! only overrides what it needs. Hooks receive the [`Host`] but never the
//! stack that owns them; mutating the stack from inside a hook is not
//! expressible.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::animation::{Animation, AnimationRole};
use crate::entry::Blob;
use crate::error::Error;
use crate::host::{Host, ViewId};

/// Stable tag identifying a kind of unit.
///
/// Tags are what persisted stacks store; the
/// [`UnitRegistry`](crate::registry::UnitRegistry) maps them back to
/// factories on restore.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitType(Cow<'static, str>);

impl UnitType {
    /// Creates a tag from any string.
    #[must_use]
    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        Self(tag.into())
    }

    /// Creates a tag from a static string without allocating.
    #[must_use]
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    /// The tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitType({})", self.0)
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for UnitType {
    fn from(tag: &'static str) -> Self {
        Self::from_static(tag)
    }
}

/// Everything a unit receives when it is created.
pub struct CreateContext<'a> {
    /// The host the owning stack is attached to.
    pub host: &'a mut dyn Host,
    /// The entry's name, if it was given one.
    pub name: Option<&'a str>,
    /// Arguments supplied when the entry was added.
    pub arguments: Option<&'a [u8]>,
    /// State from a previous [`Unit::on_save_state`], if this unit is being
    /// recreated.
    pub saved_state: Option<&'a [u8]>,
}

impl fmt::Debug for CreateContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateContext")
            .field("name", &self.name)
            .field("arguments", &self.arguments.map(<[u8]>::len))
            .field("saved_state", &self.saved_state.map(<[u8]>::len))
            .finish_non_exhaustive()
    }
}

/// A screen-like panel managed by a stack.
///
/// Hooks are called in this order when an entry comes to life:
/// `on_create`, `on_create_view`, `on_attach`, `on_bind_view`; and in this
/// order when it goes away: `on_detach`, `on_destroy_view`, `on_destroy`.
/// `on_save_state` runs before `on_destroy` when state is being persisted.
pub trait Unit: Any {
    /// The unit was instantiated.
    fn on_create(&mut self, cx: CreateContext<'_>) {
        _ = cx;
    }

    /// Builds this unit's view.
    ///
    /// `parent` is the physical container when the unit's view lives in the
    /// stack's layout, `None` otherwise. Not called when the entry was given
    /// a layout id; the host inflates that instead.
    fn on_create_view(&mut self, host: &mut dyn Host, parent: Option<ViewId>) -> Option<ViewId> {
        _ = (host, parent);
        None
    }

    /// The view exists and is attached; bind to it.
    fn on_bind_view(&mut self, host: &mut dyn Host, view: ViewId) -> Result<(), Error> {
        _ = (host, view);
        Ok(())
    }

    /// The unit became attached to its stack.
    fn on_attach(&mut self) {}

    /// The unit is about to lose its view.
    fn on_detach(&mut self) {}

    /// The view was removed from its container.
    fn on_destroy_view(&mut self) {}

    /// The unit is being dropped.
    fn on_destroy(&mut self) {}

    /// Custom state to hand back through [`CreateContext::saved_state`]
    /// when the unit is recreated.
    fn on_save_state(&mut self) -> Option<Blob> {
        None
    }

    /// An animation this unit wants to play in `role`. Takes precedence over
    /// any resource configured on the transition.
    fn animation(&mut self, role: AnimationRole) -> Option<Box<dyn Animation>> {
        _ = role;
        None
    }

    /// An animation started playing on this unit's view.
    fn on_animation_start(&mut self, role: AnimationRole) {
        _ = role;
    }

    /// An animation on this unit's view ended or was cancelled.
    fn on_animation_end(&mut self, role: AnimationRole) {
        _ = role;
    }

    /// Whether the view is inserted into the stack's container.
    ///
    /// Units that present themselves elsewhere (a dialog window) return
    /// `false`; their views are never added to the container and never
    /// animated.
    fn is_view_in_layout(&self) -> bool {
        true
    }

    /// Back navigation reached this unit. Return `true` if it was consumed.
    fn on_back_pressed(&mut self) -> bool {
        false
    }
}

impl dyn Unit {
    /// Returns the unit as `T` if that is its concrete type.
    #[must_use]
    pub fn downcast_ref<T: Unit>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref()
    }

    /// Returns the unit as `&mut T` if that is its concrete type.
    #[must_use]
    pub fn downcast_mut<T: Unit>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut()
    }
}

impl fmt::Debug for dyn Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit").finish_non_exhaustive()
    }
}
