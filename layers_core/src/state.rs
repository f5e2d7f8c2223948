// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Saving a stack and bringing it back.
//!
//! [`Layers::save_state`] snapshots every valid entry (type, name,
//! arguments, visibility and the unit's and view's state blobs) plus every
//! nested stack, keyed by slot. [`Layers::restore`] rebuilds a paused stack
//! from a snapshot without creating any unit; [`Layers::resume_view`] then
//! brings the visible part back to life. Nested stacks stay in saved form
//! until they are first asked for or resumed.
//!
//! [`SavedStack::encode`] and [`SavedStack::decode`] turn a snapshot into
//! bytes and back.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::animation::AnimationSet;
use crate::entry::{Blob, StackEntry, Visibility};
use crate::error::Error;
use crate::host::{Host, LayoutId, SlotId};
use crate::registry::UnitRegistry;
use crate::stack::{Layers, StackConfig};
use crate::trace::{StateEvent, Tracer};
use crate::unit::UnitType;

/// A persisted stack, bottom entry first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SavedStack {
    /// Entries from bottom to top.
    pub entries: Vec<SavedEntry>,
    /// Nested stacks by the slot they attach to.
    pub children: BTreeMap<SlotId, SavedStack>,
}

impl SavedStack {
    /// Returns `true` if there are no entries and no nested stacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.children.is_empty()
    }
}

/// One persisted entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedEntry {
    /// Tag the registry resolves on restore.
    pub unit_type: UnitType,
    /// The entry's name.
    pub name: Option<String>,
    /// Creation arguments.
    pub arguments: Option<Blob>,
    /// Layout inflated in place of `on_create_view`.
    pub layout: Option<LayoutId>,
    /// Opaque or transparent.
    pub visibility: Visibility,
    /// What the unit returned from `on_save_state`.
    pub layer_state: Option<Blob>,
    /// What the host captured from the entry's view.
    pub view_state: Option<Blob>,
    /// Animation resources by role.
    pub animations: AnimationSet,
}

impl Layers {
    /// Snapshots this stack and its nested stacks.
    ///
    /// Entries on their way out (a pop or replace still animating) are left
    /// out. Returns `None` when there is nothing to keep.
    pub fn save_state(&mut self, host: &mut dyn Host) -> Option<SavedStack> {
        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in self.entries.iter_mut().rev().filter(|e| e.valid) {
            let view_state = match entry.view {
                Some(view) => host.save_view_state(view),
                None => entry.view_state.clone(),
            };
            let layer_state = match entry.instance.as_deref_mut() {
                Some(unit) => unit.on_save_state(),
                None => entry.layer_state.clone(),
            };
            entries.push(entry.to_saved(layer_state, view_state));
        }
        entries.reverse();

        let mut children = self.pending_children.clone();
        for (&slot, child) in &mut self.children {
            if let Some(saved) = child.save_state(host) {
                children.insert(slot, saved);
            }
        }

        self.state_saved = true;
        Tracer::for_host(host).state_saved(&StateEvent {
            slot: self.slot,
            entries: entries.len(),
            children: children.len(),
        });
        let saved = SavedStack { entries, children };
        (!saved.is_empty()).then_some(saved)
    }

    /// Rebuilds a stack from a snapshot with the default configuration.
    ///
    /// The stack comes back paused: entries are `Empty` until
    /// [`resume_view`](Self::resume_view).
    #[must_use]
    pub fn restore(registry: Rc<UnitRegistry>, saved: SavedStack) -> Self {
        Self::restore_with_config(registry, StackConfig::new(), saved)
    }

    /// Rebuilds a stack from a snapshot with explicit configuration.
    #[must_use]
    pub fn restore_with_config(
        registry: Rc<UnitRegistry>,
        config: StackConfig,
        saved: SavedStack,
    ) -> Self {
        Self::restored(registry, config, None, saved)
    }

    /// Decodes `bytes` and rebuilds a stack from them.
    pub fn restore_bytes(registry: Rc<UnitRegistry>, bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self::restore(registry, SavedStack::decode(bytes)?))
    }

    pub(crate) fn restored(
        registry: Rc<UnitRegistry>,
        config: StackConfig,
        slot: Option<SlotId>,
        saved: SavedStack,
    ) -> Self {
        let mut layers = Self::nested(registry, config, slot);
        layers.view_paused = true;
        layers.restore_event = Some(StateEvent {
            slot,
            entries: saved.entries.len(),
            children: saved.children.len(),
        });
        for entry in saved.entries {
            let id = layers.next_entry_id();
            layers.entries.push(StackEntry::from_saved(id, entry));
        }
        layers.pending_children = saved.children;
        layers
    }
}
