// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording test doubles shared by the unit tests.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::animation::{Animation, AnimationRes, AnimationRole, Presentation, SlideFade};
use crate::entry::Blob;
#[cfg(feature = "trace")]
use crate::entry::{EntryId, LifecycleState};
use crate::error::Error;
use crate::host::{Host, LayoutId, SlotId, ViewContainer, ViewId};
use crate::registry::UnitRegistry;
use crate::stack::Layers;
use crate::time::Duration;
#[cfg(feature = "trace")]
use crate::trace::{
    LifecycleEvent, StateEvent, TraceSink, TransitionEvent, TransitionKind, TransitionPhase,
    ViewEvent,
};
use crate::unit::{CreateContext, Unit};

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub(crate) struct MockContainer {
    pub(crate) children: Vec<ViewId>,
    pub(crate) add_calls: Vec<(ViewId, usize)>,
    pub(crate) remove_calls: Vec<ViewId>,
}

impl ViewContainer for MockContainer {
    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn add_view(&mut self, view: ViewId, index: usize) {
        self.add_calls.push((view, index));
        let index = index.min(self.children.len());
        self.children.insert(index, view);
    }

    fn remove_view(&mut self, view: ViewId) {
        self.remove_calls.push(view);
        self.children.retain(|&v| v != view);
    }
}

#[cfg(feature = "trace")]
#[derive(Debug, Default)]
pub(crate) struct TraceLog {
    pub(crate) transitions: Vec<(TransitionKind, TransitionPhase)>,
    pub(crate) lifecycle: Vec<(EntryId, LifecycleState)>,
    pub(crate) views_added: usize,
    pub(crate) views_removed: usize,
    pub(crate) saved: usize,
    pub(crate) restored: usize,
}

#[cfg(feature = "trace")]
impl TraceSink for TraceLog {
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.lifecycle.push((e.entry, e.to));
    }

    fn on_view_added(&mut self, _e: &ViewEvent) {
        self.views_added += 1;
    }

    fn on_view_removed(&mut self, _e: &ViewEvent) {
        self.views_removed += 1;
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.transitions.push((e.kind, e.phase));
    }

    fn on_state_saved(&mut self, _e: &StateEvent) {
        self.saved += 1;
    }

    fn on_state_restored(&mut self, _e: &StateEvent) {
        self.restored += 1;
    }
}

/// A host with an in-memory view tree. The default container is created
/// up front; slots are extra container views parented to it.
#[derive(Debug)]
pub(crate) struct MockHost {
    containers: BTreeMap<ViewId, MockContainer>,
    root: ViewId,
    slots: BTreeMap<u32, ViewId>,
    parents: BTreeMap<ViewId, ViewId>,
    names: BTreeMap<u32, String>,
    next_view: u32,
    pub(crate) presentations: Vec<(ViewId, Presentation)>,
    pub(crate) saved_view_calls: usize,
    pub(crate) view_state_to_save: Option<Blob>,
    pub(crate) restored: Vec<(ViewId, Blob)>,
    pub(crate) inflated: Vec<LayoutId>,
    /// Resolve every animation resource to a [`SlideFade`] of this length.
    pub(crate) slide: Option<Duration>,
    #[cfg(feature = "trace")]
    pub(crate) sink: Option<TraceLog>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    pub(crate) fn new() -> Self {
        let mut host = Self {
            containers: BTreeMap::new(),
            root: ViewId(0),
            slots: BTreeMap::new(),
            parents: BTreeMap::new(),
            names: BTreeMap::new(),
            next_view: 1,
            presentations: Vec::new(),
            saved_view_calls: 0,
            view_state_to_save: None,
            restored: Vec::new(),
            inflated: Vec::new(),
            slide: None,
            #[cfg(feature = "trace")]
            sink: None,
        };
        host.root = host.add_container_view();
        host
    }

    pub(crate) fn root(&self) -> ViewId {
        self.root
    }

    fn mint_view(&mut self) -> ViewId {
        let view = ViewId(self.next_view);
        self.next_view += 1;
        view
    }

    pub(crate) fn add_container_view(&mut self) -> ViewId {
        let view = self.mint_view();
        self.containers.insert(view, MockContainer::default());
        view
    }

    /// Adds a container view for `slot`, parented to the root.
    pub(crate) fn add_slot(&mut self, slot: SlotId) -> ViewId {
        let view = self.add_container_view();
        self.slots.insert(slot.0, view);
        self.parents.insert(view, self.root);
        view
    }

    pub(crate) fn set_parent(&mut self, child: ViewId, parent: ViewId) {
        self.parents.insert(child, parent);
    }

    pub(crate) fn name_view(&mut self, id: u32, name: &str) {
        self.names.insert(id, name.into());
    }

    pub(crate) fn container_ref(&self, view: ViewId) -> &MockContainer {
        &self.containers[&view]
    }
}

impl Host for MockHost {
    fn resolve_slot(&self, slot: Option<SlotId>) -> Result<ViewId, Error> {
        let Some(slot) = slot else {
            return Ok(self.root);
        };
        self.slots.get(&slot.0).copied().ok_or_else(|| Error::ViewNotFound {
            id: slot.0,
            name: self.view_name(slot.0),
        })
    }

    fn container(&mut self, view: ViewId) -> Option<&mut dyn ViewContainer> {
        self.containers
            .get_mut(&view)
            .map(|c| c as &mut dyn ViewContainer)
    }

    fn find_view(&self, root: ViewId, id: u32) -> Option<ViewId> {
        let found = *self.slots.get(&id)?;
        let mut cursor = found;
        while let Some(&parent) = self.parents.get(&cursor) {
            if parent == root {
                return Some(found);
            }
            cursor = parent;
        }
        None
    }

    fn view_name(&self, id: u32) -> Option<String> {
        self.names.get(&id).cloned()
    }

    fn inflate(&mut self, layout: LayoutId, _parent: Option<ViewId>) -> Option<ViewId> {
        self.inflated.push(layout);
        Some(self.mint_view())
    }

    fn save_view_state(&mut self, _view: ViewId) -> Option<Blob> {
        self.saved_view_calls += 1;
        self.view_state_to_save.clone()
    }

    fn restore_view_state(&mut self, view: ViewId, state: &[u8]) {
        self.restored.push((view, state.to_vec()));
    }

    fn animation(&mut self, view: ViewId, _res: AnimationRes) -> Option<Box<dyn Animation>> {
        let duration = self.slide?;
        Some(Box::new(SlideFade::new(view, duration)))
    }

    fn apply_presentation(&mut self, view: ViewId, presentation: &Presentation) {
        self.presentations.push((view, *presentation));
    }

    #[cfg(feature = "trace")]
    fn trace_sink(&mut self) -> Option<&mut dyn TraceSink> {
        self.sink.as_mut().map(|s| s as &mut dyn TraceSink)
    }
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Hook {
    Create,
    Restored,
    CreateView,
    Attach,
    BindView,
    Detach,
    DestroyView,
    Destroy,
    BackPressed,
    AnimationStart(AnimationRole),
    AnimationEnd(AnimationRole),
}

/// Shared record of every hook call, plus knobs the units read.
#[derive(Debug)]
pub(crate) struct Probe {
    calls: Vec<(String, Hook)>,
    next_view: u32,
    /// Units hand out their own [`SlideFade`] of this length for every role.
    pub(crate) unit_animation: Option<Duration>,
}

impl Probe {
    fn record(&mut self, name: &str, hook: Hook) {
        self.calls.push((name.into(), hook));
    }

    /// Hooks called on the unit named `name`, in order.
    pub(crate) fn hooks(&self, name: &str) -> Vec<Hook> {
        self.calls
            .iter()
            .filter(|(n, _)| n == name)
            .map(|&(_, hook)| hook)
            .collect()
    }

    /// Names of the units that saw `hook`, in call order.
    pub(crate) fn names_with(&self, hook: Hook) -> Vec<&str> {
        self.calls
            .iter()
            .filter(|&&(_, h)| h == hook)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.calls.clear();
    }
}

pub(crate) type Journal = Rc<RefCell<Probe>>;

#[derive(Debug)]
pub(crate) struct MockUnit {
    name: String,
    journal: Journal,
    in_layout: bool,
    view: Option<ViewId>,
    pub(crate) consume_back: bool,
}

impl MockUnit {
    fn new(journal: Journal, in_layout: bool) -> Self {
        Self {
            name: String::new(),
            journal,
            in_layout,
            view: None,
            consume_back: false,
        }
    }

    fn record(&self, hook: Hook) {
        self.journal.borrow_mut().record(&self.name, hook);
    }
}

impl Unit for MockUnit {
    fn on_create(&mut self, cx: CreateContext<'_>) {
        self.name = cx.name.unwrap_or_default().into();
        self.record(Hook::Create);
        if cx.saved_state.is_some() {
            self.record(Hook::Restored);
        }
    }

    fn on_create_view(&mut self, _host: &mut dyn Host, _parent: Option<ViewId>) -> Option<ViewId> {
        self.record(Hook::CreateView);
        let mut probe = self.journal.borrow_mut();
        let view = ViewId(probe.next_view);
        probe.next_view += 1;
        self.view = Some(view);
        Some(view)
    }

    fn on_bind_view(&mut self, _host: &mut dyn Host, _view: ViewId) -> Result<(), Error> {
        self.record(Hook::BindView);
        Ok(())
    }

    fn on_attach(&mut self) {
        self.record(Hook::Attach);
    }

    fn on_detach(&mut self) {
        self.record(Hook::Detach);
    }

    fn on_destroy_view(&mut self) {
        self.record(Hook::DestroyView);
        self.view = None;
    }

    fn on_destroy(&mut self) {
        self.record(Hook::Destroy);
    }

    fn on_save_state(&mut self) -> Option<Blob> {
        Some(format!("mock:{}", self.name).into_bytes())
    }

    fn animation(&mut self, _role: AnimationRole) -> Option<Box<dyn Animation>> {
        let duration = self.journal.borrow().unit_animation?;
        let view = self.view?;
        Some(Box::new(SlideFade::new(view, duration)))
    }

    fn on_animation_start(&mut self, role: AnimationRole) {
        self.record(Hook::AnimationStart(role));
    }

    fn on_animation_end(&mut self, role: AnimationRole) {
        self.record(Hook::AnimationEnd(role));
    }

    fn is_view_in_layout(&self) -> bool {
        self.in_layout
    }

    fn on_back_pressed(&mut self) -> bool {
        self.record(Hook::BackPressed);
        self.consume_back
    }
}

/// A root stack with `"mock"` and `"dialog"` (out of layout) registered,
/// a fresh host, and the journal both unit types record into.
pub(crate) fn fixture() -> (Layers, MockHost, Journal) {
    let journal = Rc::new(RefCell::new(Probe {
        calls: Vec::new(),
        next_view: 1000,
        unit_animation: None,
    }));
    let mut registry = UnitRegistry::new();
    let j = Rc::clone(&journal);
    registry.register("mock", move || Box::new(MockUnit::new(Rc::clone(&j), true)));
    let j = Rc::clone(&journal);
    registry.register("dialog", move || Box::new(MockUnit::new(Rc::clone(&j), false)));
    (Layers::new(Rc::new(registry)), MockHost::new(), journal)
}
