// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stack container.
//!
//! [`Layers`] owns an ordered list of [`StackEntry`] values (index 0 is the
//! bottom) bound to one physical container, plus any nested stacks anchored
//! in container slots inside its units' views. Mutations go through
//! [`Transition`] builders; reads are plain accessors.
//!
//! Behaviour is split across a few files, each adding an `impl Layers` block:
//! lifecycle stepping in `lifecycle`, view materialization in
//! [`visibility`](crate::visibility), the transition protocol in
//! [`transition`](crate::transition), and save/restore in
//! [`state`](crate::state).

use alloc::collections::BTreeMap;
use alloc::collections::btree_map::Entry;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use crate::entry::{EntryId, LifecycleState, StackEntry, Visibility};
use crate::error::Error;
use crate::host::{Host, SlotId};
use crate::registry::UnitRegistry;
use crate::state::SavedStack;
use crate::trace::{StateEvent, Tracer};
use crate::transition::{ActiveTransition, Transition};
use crate::unit::{Unit, UnitType};

/// Tunables for a [`Layers`] stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackConfig {
    /// Whether transitions collect animation handles at all.
    pub animations_enabled: bool,
    /// Visibility given to entries whose transition does not set one.
    pub default_visibility: Visibility,
}

impl StackConfig {
    /// Animations on, opaque entries.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            animations_enabled: true,
            default_visibility: Visibility::Opaque,
        }
    }

    /// Every transition finishes synchronously.
    #[must_use]
    pub const fn without_animations() -> Self {
        Self {
            animations_enabled: false,
            default_visibility: Visibility::Opaque,
        }
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered stack of units sharing one physical container.
pub struct Layers {
    pub(crate) registry: Rc<UnitRegistry>,
    pub(crate) config: StackConfig,
    pub(crate) slot: Option<SlotId>,
    pub(crate) entries: Vec<StackEntry>,
    pub(crate) children: BTreeMap<SlotId, Self>,
    pub(crate) pending_children: BTreeMap<SlotId, SavedStack>,
    pub(crate) view_paused: bool,
    pub(crate) transparent_tail: usize,
    pub(crate) active: Option<ActiveTransition>,
    pub(crate) state_saved: bool,
    /// Reported on the first resume after a restore.
    pub(crate) restore_event: Option<StateEvent>,
    next_id: u64,
}

impl fmt::Debug for Layers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layers")
            .field("slot", &self.slot)
            .field("config", &self.config)
            .field("entries", &self.entries)
            .field("children", &self.children)
            .field("pending_children", &self.pending_children.keys())
            .field("view_paused", &self.view_paused)
            .field("transparent_tail", &self.transparent_tail)
            .field("active", &self.active)
            .field("state_saved", &self.state_saved)
            .finish_non_exhaustive()
    }
}

impl Layers {
    /// Creates an empty stack on the host's default container.
    #[must_use]
    pub fn new(registry: Rc<UnitRegistry>) -> Self {
        Self::with_config(registry, StackConfig::new())
    }

    /// Creates an empty stack with explicit configuration.
    #[must_use]
    pub fn with_config(registry: Rc<UnitRegistry>, config: StackConfig) -> Self {
        Self::nested(registry, config, None)
    }

    pub(crate) fn nested(
        registry: Rc<UnitRegistry>,
        config: StackConfig,
        slot: Option<SlotId>,
    ) -> Self {
        Self {
            registry,
            config,
            slot,
            entries: Vec::new(),
            children: BTreeMap::new(),
            pending_children: BTreeMap::new(),
            view_paused: false,
            transparent_tail: 0,
            active: None,
            state_saved: false,
            restore_event: None,
            next_id: 0,
        }
    }

    pub(crate) fn next_entry_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    // -- Accessors ----------------------------------------------------------

    /// The container slot this stack attaches to (`None` for the host's
    /// default container).
    #[inline]
    #[must_use]
    pub fn slot(&self) -> Option<SlotId> {
        self.slot
    }

    /// The stack's configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// The registry used to instantiate units.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Rc<UnitRegistry> {
        &self.registry
    }

    /// Number of entries, including any scheduled for removal by a running
    /// transition.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the stack has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether view materialization is suspended.
    #[inline]
    #[must_use]
    pub fn is_view_paused(&self) -> bool {
        self.view_paused
    }

    /// Whether [`save_state`](Self::save_state) has run since the stack was
    /// created.
    #[inline]
    #[must_use]
    pub fn is_state_saved(&self) -> bool {
        self.state_saved
    }

    /// Whether a transition is waiting on animations.
    #[inline]
    #[must_use]
    pub fn has_running_transition(&self) -> bool {
        self.active.is_some()
    }

    /// Entries from bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &StackEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The entry at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> &StackEntry {
        assert!(
            index < self.entries.len(),
            "index {index} out of range for stack of {}",
            self.entries.len()
        );
        &self.entries[index]
    }

    /// The top entry, if any.
    #[must_use]
    pub fn peek(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    /// The top-most valid entry named `name`. `None` matches unnamed
    /// entries.
    #[must_use]
    pub fn find(&self, name: Option<&str>) -> Option<&StackEntry> {
        self.index_of(name).map(|index| &self.entries[index])
    }

    /// Index of the top-most valid entry named `name`. `None` matches
    /// unnamed entries.
    #[must_use]
    pub fn index_of(&self, name: Option<&str>) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|e| e.valid && e.name.as_deref() == name)
    }

    /// Current index of the entry with id `id`.
    #[must_use]
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// The live unit at `index` as `T`, if it is created and of that type.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn unit<T: Unit>(&self, index: usize) -> Option<&T> {
        self.get(index).unit()?.downcast_ref()
    }

    /// The live unit at `index` as `&mut T`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn unit_mut<T: Unit>(&mut self, index: usize) -> Option<&mut T> {
        let len = self.entries.len();
        assert!(index < len, "index {index} out of range for stack of {len}");
        self.entries[index].unit_mut()?.downcast_mut()
    }

    // -- Nested stacks ------------------------------------------------------

    /// The stack anchored at `slot`, created on first use.
    ///
    /// Asking for this stack's own slot returns `self`. A nested stack that
    /// was saved along with this one is rebuilt (paused) from its saved state
    /// the first time it is asked for.
    pub fn at(&mut self, slot: SlotId) -> &mut Self {
        if self.slot == Some(slot) {
            return self;
        }
        match self.children.entry(slot) {
            Entry::Occupied(child) => child.into_mut(),
            Entry::Vacant(vacant) => {
                let registry = Rc::clone(&self.registry);
                let child = match self.pending_children.remove(&slot) {
                    Some(saved) => Self::restored(registry, self.config, Some(slot), saved),
                    None => Self::nested(registry, self.config, Some(slot)),
                };
                vacant.insert(child)
            }
        }
    }

    /// Slots with a nested stack, materialized or still saved.
    pub fn slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        let mut slots: Vec<SlotId> = self
            .children
            .keys()
            .chain(self.pending_children.keys())
            .copied()
            .collect();
        slots.sort_unstable();
        slots.dedup();
        slots.into_iter()
    }

    pub(crate) fn materialize_pending_children(&mut self) {
        let pending = core::mem::take(&mut self.pending_children);
        for (slot, saved) in pending {
            let child = Self::restored(Rc::clone(&self.registry), self.config, Some(slot), saved);
            self.children.insert(slot, child);
        }
    }

    // -- View pause / resume ------------------------------------------------

    /// Suspends view materialization. Entries keep whatever they have.
    pub fn pause_view(&mut self) {
        self.view_paused = true;
    }

    /// Resumes view materialization here and in every nested stack,
    /// bringing visible entries up to [`LifecycleState::ViewCreated`].
    ///
    /// Nested stacks still waiting in saved form are rebuilt first.
    pub fn resume_view(&mut self, host: &mut dyn Host) -> Result<(), Error> {
        if let Some(event) = self.restore_event.take() {
            Tracer::for_host(host).state_restored(&event);
        }
        if self.view_paused {
            self.view_paused = false;
            self.ensure_views(host)?;
        }
        self.materialize_pending_children();
        for child in self.children.values_mut() {
            child.resume_view(host)?;
        }
        Ok(())
    }

    // -- Mutations ----------------------------------------------------------

    /// Starts an add transition for a new entry of type `unit_type`.
    pub fn add(&mut self, unit_type: impl Into<UnitType>) -> Transition<'_> {
        Transition::add(self, unit_type.into())
    }

    /// Starts a replace transition: a new entry of type `unit_type` takes the
    /// place of the current top.
    pub fn replace(&mut self, unit_type: impl Into<UnitType>) -> Transition<'_> {
        Transition::replace(self, unit_type.into())
    }

    /// Starts a remove transition for the entry at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Transition<'_> {
        let id = self.get(index).id;
        Transition::remove(self, id)
    }

    /// Starts a remove transition for the entry with id `id`.
    ///
    /// # Panics
    ///
    /// Panics if no entry has that id.
    pub fn remove_entry(&mut self, id: EntryId) -> Transition<'_> {
        assert!(self.position(id).is_some(), "entry {id:?} is not in this stack");
        Transition::remove(self, id)
    }

    /// Starts a transition that removes the top-most valid entry.
    ///
    /// # Panics
    ///
    /// Panics if there is no valid entry.
    pub fn pop(&mut self) -> Transition<'_> {
        let id = self.entries.iter().rev().find(|e| e.valid).map(|e| e.id);
        let Some(id) = id else {
            panic!("cannot pop an empty stack");
        };
        Transition::remove(self, id)
    }

    /// Removes entries from the top down to the top-most entry named `name`.
    ///
    /// With `inclusive` the named entry goes too. With no name, everything
    /// above the bottom entry is removed (and the bottom too when
    /// `inclusive`). Nothing is touched if `name` is not in the stack.
    /// Returns the last entry removed, with its unit already destroyed.
    ///
    /// Runs immediately, without animations; any running transition is
    /// finished first.
    pub fn pop_to(
        &mut self,
        host: &mut dyn Host,
        name: Option<&str>,
        inclusive: bool,
    ) -> Result<Option<StackEntry>, Error> {
        self.finish_transition(host)?;
        if self.entries.is_empty() {
            return Ok(None);
        }
        if let Some(name) = name {
            if self.index_of(Some(name)).is_none() {
                return Ok(None);
            }
        }

        let was_paused = self.view_paused;
        self.view_paused = true;
        let mut last = None;
        for index in (0..self.entries.len()).rev() {
            let matched = name.is_some() && self.entries[index].name.as_deref() == name;
            let remove = match name {
                None => inclusive || index > 0,
                Some(_) => !matched || inclusive,
            };
            if !remove {
                break;
            }
            last = Some(self.remove_entry_at(host, index)?);
            if matched {
                break;
            }
        }
        self.view_paused = was_paused;
        self.ensure_views(host)?;
        Ok(last)
    }

    /// Destroys and removes every entry, top to bottom, without animations.
    /// Returns how many entries were removed.
    pub fn clear(&mut self, host: &mut dyn Host) -> Result<usize, Error> {
        self.finish_transition(host)?;
        let count = self.entries.len();
        if count == 0 {
            return Ok(0);
        }
        let was_paused = self.view_paused;
        self.view_paused = true;
        for index in (0..count).rev() {
            self.move_to_state(host, index, LifecycleState::Destroyed, false)?;
        }
        self.entries.clear();
        self.view_paused = was_paused;
        Ok(count)
    }

    /// Destroys every entry top to bottom and every nested stack, without
    /// persisting state. Save first if the stack should come back.
    ///
    /// Nested stacks still in saved form are dropped. The stack is left
    /// empty with its pause flag as it was, so it can be used again.
    pub fn destroy(&mut self, host: &mut dyn Host) -> Result<(), Error> {
        self.finish_transition(host)?;
        for child in self.children.values_mut() {
            child.destroy(host)?;
        }
        self.children.clear();
        self.pending_children.clear();
        self.restore_event = None;
        let was_paused = self.view_paused;
        self.view_paused = true;
        for index in (0..self.entries.len()).rev() {
            self.move_to_state(host, index, LifecycleState::Destroyed, false)?;
        }
        self.entries.clear();
        self.view_paused = was_paused;
        Ok(())
    }

    /// Offers back navigation to units from the top down. Returns `true` as
    /// soon as one consumes it.
    pub fn on_back_pressed(&mut self) -> bool {
        self.entries.iter_mut().rev().any(|e| {
            e.valid
                && e.instance
                    .as_deref_mut()
                    .is_some_and(|unit| unit.on_back_pressed())
        })
    }

    // -- Internal helpers ---------------------------------------------------

    /// Pushes `entry` on top and materializes whatever is now visible.
    /// Returns the new entry's index.
    pub(crate) fn push_entry(
        &mut self,
        host: &mut dyn Host,
        entry: StackEntry,
    ) -> Result<usize, Error> {
        self.entries.push(entry);
        let index = self.entries.len() - 1;
        self.ensure_views(host)?;
        Ok(index)
    }

    /// Tears down and removes the entry at `index`, then re-runs
    /// materialization.
    pub(crate) fn remove_entry_at(
        &mut self,
        host: &mut dyn Host,
        index: usize,
    ) -> Result<StackEntry, Error> {
        self.move_to_state(host, index, LifecycleState::Destroyed, false)?;
        let entry = self.entries.remove(index);
        self.ensure_views(host)?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::host::ViewId;
    use crate::testing::{Hook, MockHost, MockUnit, fixture};

    fn names(layers: &Layers) -> Vec<&str> {
        layers.iter().map(|e| e.name().unwrap_or("")).collect()
    }

    #[test]
    fn add_transparent_inserts_views_in_order() {
        let (mut layers, mut host, _journal) = fixture();
        for i in 1..=3 {
            layers
                .add("mock")
                .name(alloc::format!("Test Layer {i}"))
                .opaque(false)
                .commit(&mut host)
                .unwrap();
        }
        assert_eq!(layers.len(), 3);
        let root = host.root();
        let adds: Vec<usize> = host.container_ref(root).add_calls.iter().map(|c| c.1).collect();
        assert_eq!(adds, [0, 1, 2]);
        assert!(host.container_ref(root).remove_calls.is_empty());
    }

    #[test]
    fn add_opaque_culls_views_below() {
        let (mut layers, mut host, _journal) = fixture();
        for (i, opaque) in [true, false, true, false].into_iter().enumerate() {
            layers
                .add("mock")
                .name(alloc::format!("Test Layer {}", i + 1))
                .opaque(opaque)
                .commit(&mut host)
                .unwrap();
        }
        let root = host.root();
        assert_eq!(host.container_ref(root).add_calls.len(), 4);
        assert_eq!(host.container_ref(root).remove_calls.len(), 2);
        assert!(layers.get(0).view().is_none());
        assert!(layers.get(1).view().is_none());
        assert!(layers.get(2).view().is_some());
        assert!(layers.get(3).view().is_some());
        assert_eq!(layers.get(0).state(), LifecycleState::Created);
        assert_eq!(host.container_ref(root).children.len(), 2);
    }

    #[test]
    fn replace_with_transparent_keeps_views() {
        let (mut layers, mut host, _journal) = fixture();
        for i in 1..=4 {
            layers
                .add("mock")
                .name(alloc::format!("Test Layer {i}"))
                .opaque(false)
                .commit(&mut host)
                .unwrap();
        }
        let old_top = layers.get(3).id();
        layers
            .replace("mock")
            .name("Replacement Layer")
            .opaque(false)
            .commit(&mut host)
            .unwrap();
        assert_eq!(layers.len(), 4);
        assert_eq!(layers.peek().and_then(StackEntry::name), Some("Replacement Layer"));
        assert!(layers.position(old_top).is_none());
        assert!(layers.iter().all(|e| e.view().is_some()));
    }

    #[test]
    fn replace_with_opaque_hides_everything_else() {
        let (mut layers, mut host, _journal) = fixture();
        for (i, opaque) in [false, true, false, false].into_iter().enumerate() {
            layers
                .add("mock")
                .name(alloc::format!("Test Layer {}", i + 1))
                .opaque(opaque)
                .commit(&mut host)
                .unwrap();
        }
        layers
            .replace("mock")
            .name("Replacement Layer")
            .commit(&mut host)
            .unwrap();
        assert_eq!(names(&layers), ["Test Layer 1", "Test Layer 2", "Test Layer 3", "Replacement Layer"]);
        let with_views: Vec<_> = layers.iter().filter_map(StackEntry::view).collect();
        assert_eq!(with_views.len(), 1);
        assert!(layers.get(3).view().is_some());
    }

    #[test]
    fn remove_by_index_below_top() {
        let (mut layers, mut host, _journal) = fixture();
        for i in 1..=4 {
            layers
                .add("mock")
                .name(alloc::format!("Test Layer {i}"))
                .commit(&mut host)
                .unwrap();
        }
        layers.remove(2).commit(&mut host).unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers.peek().and_then(StackEntry::name), Some("Test Layer 4"));
        assert_eq!(names(&layers), ["Test Layer 1", "Test Layer 2", "Test Layer 4"]);
    }

    #[test]
    fn remove_by_entry_id() {
        let (mut layers, mut host, _journal) = fixture();
        let first = layers.add("mock").name("L1").opaque(false).commit(&mut host).unwrap();
        layers.remove_entry(first).commit(&mut host).unwrap();
        assert!(layers.is_empty());

        let l2 = layers.add("mock").name("L2").opaque(false).commit(&mut host).unwrap();
        layers.add("mock").name("L3").commit(&mut host).unwrap();
        let l4 = layers.add("mock").name("L4").opaque(false).commit(&mut host).unwrap();
        layers.add("mock").name("L5").opaque(false).commit(&mut host).unwrap();

        layers.remove_entry(l2).commit(&mut host).unwrap();
        layers.remove_entry(l4).commit(&mut host).unwrap();
        assert_eq!(names(&layers), ["L3", "L5"]);
        // L1 removed, L2 culled under L3, L4 removed.
        assert_eq!(host.container_ref(host.root()).remove_calls.len(), 3);
    }

    #[test]
    fn pop_transparent_keeps_lower_views() {
        let (mut layers, mut host, _journal) = fixture();
        for i in 1..=4 {
            layers
                .add("mock")
                .name(alloc::format!("Test Layer {i}"))
                .opaque(false)
                .commit(&mut host)
                .unwrap();
        }
        let pop = layers.pop();
        assert_eq!(pop.target_name(), Some("Test Layer 4"));
        pop.commit(&mut host).unwrap();
        let root = host.root();
        assert_eq!(layers.len(), 3);
        assert_eq!(host.container_ref(root).add_calls.len(), 4);
        assert_eq!(host.container_ref(root).remove_calls.len(), 1);
        let pop = layers.pop();
        assert_eq!(pop.target_name(), Some("Test Layer 3"));
        pop.commit(&mut host).unwrap();
        assert_eq!(layers.len(), 2);
        assert!(layers.get(0).view().is_some());
        assert!(layers.get(1).view().is_some());
    }

    #[test]
    fn pop_opaque_reveals_one_below() {
        let (mut layers, mut host, _journal) = fixture();
        for i in 1..=4 {
            layers
                .add("mock")
                .name(alloc::format!("Test Layer {i}"))
                .commit(&mut host)
                .unwrap();
        }
        layers.pop().commit(&mut host).unwrap();
        layers.pop().commit(&mut host).unwrap();
        assert_eq!(layers.len(), 2);
        assert!(layers.get(0).view().is_none());
        assert!(layers.get(1).view().is_some());
    }

    #[test]
    #[should_panic(expected = "cannot pop an empty stack")]
    fn pop_empty_panics() {
        let (mut layers, _host, _journal) = fixture();
        let _ = layers.pop();
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn remove_out_of_range_panics() {
        let (mut layers, mut host, _journal) = fixture();
        layers.add("mock").commit(&mut host).unwrap();
        let _ = layers.remove(1);
    }

    #[test]
    fn pop_to_sequences() {
        let (mut layers, mut host, _journal) = fixture();
        let add = |layers: &mut Layers, host: &mut MockHost, n: u32| {
            layers
                .add("mock")
                .name(alloc::format!("Test Layer {n}"))
                .opaque(false)
                .commit(host)
                .unwrap();
        };
        for n in 1..=4 {
            add(&mut layers, &mut host, n);
        }

        let popped = layers.pop_to(&mut host, Some("Test Layer 2"), true).unwrap();
        assert_eq!(popped.as_ref().and_then(StackEntry::name), Some("Test Layer 2"));
        assert_eq!(layers.len(), 1);
        assert_eq!(layers.peek().and_then(StackEntry::name), Some("Test Layer 1"));

        for n in 5..=7 {
            add(&mut layers, &mut host, n);
        }
        let popped = layers.pop_to(&mut host, Some("Test Layer 6"), false).unwrap();
        assert_eq!(popped.as_ref().and_then(StackEntry::name), Some("Test Layer 7"));
        assert_eq!(layers.len(), 3);
        assert_eq!(layers.peek().and_then(StackEntry::name), Some("Test Layer 6"));

        for n in 8..=9 {
            add(&mut layers, &mut host, n);
        }
        let popped = layers.pop_to(&mut host, None, false).unwrap();
        assert_eq!(popped.as_ref().and_then(StackEntry::name), Some("Test Layer 5"));
        assert_eq!(layers.len(), 1);
        assert_eq!(layers.peek().and_then(StackEntry::name), Some("Test Layer 1"));

        for n in 10..=11 {
            add(&mut layers, &mut host, n);
        }
        let popped = layers.pop_to(&mut host, None, true).unwrap();
        assert_eq!(popped.as_ref().and_then(StackEntry::name), Some("Test Layer 1"));
        assert!(layers.is_empty());
        assert!(popped.is_some_and(|e| e.unit().is_none()));
    }

    #[test]
    fn pop_to_unknown_name_is_noop() {
        let (mut layers, mut host, _journal) = fixture();
        layers.add("mock").name("A").commit(&mut host).unwrap();
        layers.add("mock").name("B").commit(&mut host).unwrap();
        assert!(layers.pop_to(&mut host, Some("Z"), true).unwrap().is_none());
        assert_eq!(layers.len(), 2);
    }

    #[test]
    fn pop_to_opaque_rematerializes_new_top() {
        let (mut layers, mut host, _journal) = fixture();
        for name in ["A", "B", "C"] {
            layers.add("mock").name(name).commit(&mut host).unwrap();
        }
        assert!(layers.get(0).view().is_none());
        layers.pop_to(&mut host, Some("A"), false).unwrap();
        assert_eq!(layers.len(), 1);
        assert!(layers.get(0).view().is_some());
        assert!(!layers.is_view_paused());
    }

    #[test]
    fn clear_removes_every_view() {
        let (mut layers, mut host, _journal) = fixture();
        for opaque in [false, false, true, true] {
            layers.add("mock").opaque(opaque).commit(&mut host).unwrap();
        }
        let root = host.root();
        // Each opaque entry culls what is below it once it lands.
        assert_eq!(host.container_ref(root).add_calls.len(), 4);
        assert_eq!(layers.clear(&mut host).unwrap(), 4);
        assert!(layers.is_empty());
        assert_eq!(host.container_ref(root).remove_calls.len(), 4);
        assert!(host.container_ref(root).children.is_empty());
    }

    #[test]
    fn peek_and_find() {
        let (mut layers, mut host, _journal) = fixture();
        assert!(layers.peek().is_none());
        layers.add("mock").name("Test Layer 1").commit(&mut host).unwrap();
        layers.add("mock").name("Test Layer 2").commit(&mut host).unwrap();
        layers.add("mock").name("Test Layer 1").commit(&mut host).unwrap();
        assert_eq!(layers.peek().and_then(StackEntry::name), Some("Test Layer 1"));
        assert_eq!(layers.index_of(Some("Test Layer 1")), Some(2));
        assert_eq!(layers.index_of(Some("Test Layer 2")), Some(1));
        assert!(layers.find(Some("Test Layer 2")).is_some());
        assert!(layers.find(Some("Test Layer 3")).is_none());
        assert!(layers.find(None).is_none());
        assert!(layers.unit::<MockUnit>(2).is_some());

        layers.add("mock").opaque(false).commit(&mut host).unwrap();
        layers.add("mock").name("Test Layer 4").commit(&mut host).unwrap();
        assert_eq!(layers.index_of(None), Some(3));
        assert_eq!(layers.find(None).and_then(StackEntry::name), None);
    }

    #[test]
    fn back_press_goes_top_down() {
        let (mut layers, mut host, journal) = fixture();
        layers.add("mock").name("A").commit(&mut host).unwrap();
        layers.add("mock").name("B").opaque(false).commit(&mut host).unwrap();
        assert!(!layers.on_back_pressed());
        assert_eq!(journal.borrow().names_with(Hook::BackPressed), ["B", "A"]);

        layers.unit_mut::<MockUnit>(0).unwrap().consume_back = true;
        assert!(layers.on_back_pressed());
    }

    #[test]
    fn nested_stack_uses_its_slot_container() {
        let (mut layers, mut host, _journal) = fixture();
        let slot_view = host.add_slot(SlotId(7));
        layers.add("mock").name("parent").commit(&mut host).unwrap();
        let child = layers.at(SlotId(7));
        assert_eq!(child.slot(), Some(SlotId(7)));
        child.add("mock").name("child").commit(&mut host).unwrap();
        assert_eq!(host.container_ref(slot_view).children.len(), 1);
        assert_eq!(host.container_ref(host.root()).children.len(), 1);
        assert_eq!(layers.slots().collect::<Vec<_>>(), vec![SlotId(7)]);
    }

    #[test]
    fn missing_slot_is_lookup_failure() {
        let (mut layers, mut host, _journal) = fixture();
        host.name_view(5, "missing_slot");
        let err = layers.at(SlotId(5)).add("mock").commit(&mut host).unwrap_err();
        assert_eq!(
            err,
            Error::ViewNotFound {
                id: 5,
                name: Some("missing_slot".into()),
            }
        );
    }

    #[test]
    fn unknown_unit_type_fails_commit() {
        let (mut layers, mut host, _journal) = fixture();
        let err = layers.add("nope").commit(&mut host).unwrap_err();
        assert_eq!(err, Error::UnknownUnitType(UnitType::from("nope")));
    }

    #[test]
    fn destroy_tears_down_children_first() {
        let (mut layers, mut host, journal) = fixture();
        host.add_slot(SlotId(1));
        layers.add("mock").name("parent").commit(&mut host).unwrap();
        layers.at(SlotId(1)).add("mock").name("child").commit(&mut host).unwrap();
        journal.borrow_mut().clear();
        layers.destroy(&mut host).unwrap();
        assert_eq!(journal.borrow().names_with(Hook::Destroy), ["child", "parent"]);
        assert!(layers.is_empty());
    }

    #[test]
    fn destroy_drops_saved_children_and_stays_usable() {
        let (mut layers, mut host, _journal) = fixture();
        host.add_slot(SlotId(4));
        layers.add("mock").name("P").commit(&mut host).unwrap();
        layers.at(SlotId(4)).add("mock").name("C").commit(&mut host).unwrap();
        let saved = layers.save_state(&mut host).unwrap();

        let mut restored = Layers::restore(Rc::clone(layers.registry()), saved);
        restored.destroy(&mut host).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.slots().count(), 0);
        assert!(restored.save_state(&mut host).is_none());

        layers.destroy(&mut host).unwrap();
        assert!(!layers.is_view_paused());
        layers.add("mock").name("again").commit(&mut host).unwrap();
        assert!(layers.get(0).view().is_some());
    }

    /// Size, materialized range and container order after every settled
    /// step of a mixed add, pop and replace sequence.
    #[test]
    fn mixed_sequence_keeps_stack_and_views_consistent() {
        let (mut layers, mut host, _journal) = fixture();
        let root = host.root();
        let mut expected = 0_usize;
        let mut seed = 0x2545_f491_u32;
        for step in 0..300 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let opaque = seed & 0x10 != 0;
            match seed % 4 {
                0 | 1 => {
                    layers
                        .add("mock")
                        .name(alloc::format!("L{step}"))
                        .opaque(opaque)
                        .commit(&mut host)
                        .unwrap();
                    expected += 1;
                }
                2 if expected > 0 => {
                    layers.pop().commit(&mut host).unwrap();
                    expected -= 1;
                }
                3 if expected > 0 => {
                    layers
                        .replace("mock")
                        .name(alloc::format!("R{step}"))
                        .opaque(opaque)
                        .commit(&mut host)
                        .unwrap();
                }
                _ => {}
            }

            assert_eq!(layers.len(), expected, "step {step}");
            let Some(lowest) = layers.lowest_visible() else {
                assert!(host.container_ref(root).children.is_empty());
                continue;
            };
            for (index, entry) in layers.iter().enumerate() {
                assert_eq!(entry.view().is_some(), index >= lowest, "step {step} index {index}");
            }
            let views: Vec<ViewId> = layers.iter().filter_map(StackEntry::view).collect();
            assert_eq!(host.container_ref(root).children, views, "step {step}");
        }
    }
}
