// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack entries: one descriptor per unit in a stack.
//!
//! A [`StackEntry`] outlives the unit it describes. It carries everything
//! needed to recreate the unit (type tag, name, arguments, saved state) and,
//! while the unit is alive, owns the instance and the handle to its view.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::animation::AnimationSet;
use crate::host::{LayoutId, ViewId};
use crate::state::SavedEntry;
use crate::unit::{Unit, UnitType};

/// An opaque byte payload: arguments, unit state, or view state.
pub type Blob = Vec<u8>;

/// Identifies an entry within its stack for as long as it is in the stack.
///
/// Ids are never reused by the same stack.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub(crate) u64);

impl EntryId {
    /// Rebuilds an id from [`to_raw`](Self::to_raw), e.g. when decoding a
    /// trace recording.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    #[inline]
    #[must_use]
    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.0)
    }
}

/// Whether an entry hides the entries beneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Entries below this one are not visible and lose their views.
    #[default]
    Opaque,
    /// Entries below this one keep their views.
    Transparent,
}

/// How far an entry has been brought to life.
///
/// `ViewDestroyed` and `Destroyed` are only meaningful as targets for
/// [`Layers::move_to_state`](crate::stack::Layers); an entry never rests in
/// them. They name the direction of travel and normalize to `Created` and
/// `Empty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    /// No unit instance.
    Empty,
    /// The unit exists but has no view.
    Created,
    /// The unit has a view.
    ViewCreated,
    /// Target only: tear the view down, keep the unit.
    ViewDestroyed,
    /// Target only: tear everything down.
    Destroyed,
}

impl LifecycleState {
    /// The resting state this target settles in.
    #[inline]
    #[must_use]
    pub const fn resting(self) -> Self {
        match self {
            Self::ViewDestroyed => Self::Created,
            Self::Destroyed => Self::Empty,
            other => other,
        }
    }
}

/// One unit's slot in a stack.
pub struct StackEntry {
    pub(crate) id: EntryId,
    pub(crate) unit_type: UnitType,
    pub(crate) name: Option<String>,
    pub(crate) arguments: Option<Blob>,
    pub(crate) layout: Option<LayoutId>,
    pub(crate) visibility: Visibility,
    pub(crate) animations: AnimationSet,
    pub(crate) layer_state: Option<Blob>,
    pub(crate) view_state: Option<Blob>,
    pub(crate) instance: Option<Box<dyn Unit>>,
    pub(crate) view: Option<ViewId>,
    pub(crate) in_layout: bool,
    pub(crate) attached: bool,
    pub(crate) state: LifecycleState,
    pub(crate) valid: bool,
    pub(crate) in_transition: bool,
}

impl fmt::Debug for StackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackEntry")
            .field("id", &self.id)
            .field("unit_type", &self.unit_type)
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("state", &self.state)
            .field("view", &self.view)
            .field("valid", &self.valid)
            .field("in_transition", &self.in_transition)
            .finish_non_exhaustive()
    }
}

impl StackEntry {
    pub(crate) fn new(id: EntryId, unit_type: UnitType, visibility: Visibility) -> Self {
        Self {
            id,
            unit_type,
            name: None,
            arguments: None,
            layout: None,
            visibility,
            animations: AnimationSet::EMPTY,
            layer_state: None,
            view_state: None,
            instance: None,
            view: None,
            in_layout: false,
            attached: false,
            state: LifecycleState::Empty,
            valid: true,
            in_transition: false,
        }
    }

    pub(crate) fn from_saved(id: EntryId, saved: SavedEntry) -> Self {
        let mut entry = Self::new(id, saved.unit_type, saved.visibility);
        entry.name = saved.name;
        entry.arguments = saved.arguments;
        entry.layout = saved.layout;
        entry.animations = saved.animations;
        entry.layer_state = saved.layer_state;
        entry.view_state = saved.view_state;
        entry
    }

    /// A persistable snapshot with the given state blobs.
    pub(crate) fn to_saved(
        &self,
        layer_state: Option<Blob>,
        view_state: Option<Blob>,
    ) -> SavedEntry {
        SavedEntry {
            unit_type: self.unit_type.clone(),
            name: self.name.clone(),
            arguments: self.arguments.clone(),
            layout: self.layout,
            visibility: self.visibility,
            animations: self.animations,
            layer_state,
            view_state,
        }
    }

    /// This entry's id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// The unit type tag.
    #[inline]
    #[must_use]
    pub fn unit_type(&self) -> &UnitType {
        &self.unit_type
    }

    /// The entry's name, if any.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Arguments supplied at creation.
    #[inline]
    #[must_use]
    pub fn arguments(&self) -> Option<&[u8]> {
        self.arguments.as_deref()
    }

    /// Layout the host inflates for this entry, if set.
    #[inline]
    #[must_use]
    pub fn layout(&self) -> Option<LayoutId> {
        self.layout
    }

    /// Opaque or transparent.
    #[inline]
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Animation resources configured on this entry.
    #[inline]
    #[must_use]
    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    /// Unit state waiting to be handed to the next `on_create`.
    #[inline]
    #[must_use]
    pub fn layer_state(&self) -> Option<&[u8]> {
        self.layer_state.as_deref()
    }

    /// View state waiting to be restored into the next view.
    #[inline]
    #[must_use]
    pub fn view_state(&self) -> Option<&[u8]> {
        self.view_state.as_deref()
    }

    /// The current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The live view, if the entry is in [`LifecycleState::ViewCreated`] and
    /// its unit produced one.
    #[inline]
    #[must_use]
    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    /// The live unit, if created.
    #[inline]
    #[must_use]
    pub fn unit(&self) -> Option<&(dyn Unit + 'static)> {
        self.instance.as_deref()
    }

    /// The live unit, if created.
    #[inline]
    #[must_use]
    pub fn unit_mut(&mut self) -> Option<&mut (dyn Unit + 'static)> {
        self.instance.as_deref_mut()
    }

    /// `false` once the entry is scheduled for removal.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the unit is currently attached to its stack.
    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether a running transition involves this entry.
    #[inline]
    #[must_use]
    pub fn is_in_transition(&self) -> bool {
        self.in_transition
    }

    /// Whether this entry hides what is beneath it right now.
    ///
    /// Entries taking part in a transition are treated as transparent so
    /// the entries they are animating over stay materialized.
    #[inline]
    #[must_use]
    pub fn occludes(&self) -> bool {
        self.visibility == Visibility::Opaque && !self.in_transition
    }

    /// Whether the entry has a view inside its stack's container.
    #[inline]
    pub(crate) fn has_layout_view(&self) -> bool {
        self.view.is_some() && self.in_layout
    }
}
