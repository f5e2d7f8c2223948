// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transition protocol.
//!
//! Every structural mutation is a [`Transition`]: a builder returned by
//! [`Layers::add`], [`Layers::replace`], [`Layers::remove`],
//! [`Layers::remove_entry`] or [`Layers::pop`], finalized by
//! [`Transition::commit`]. Committing consumes the builder.
//!
//! ```text
//!   commit ──► Started ──► Animating ──advance…──► Finished
//!                 │                                   ▲
//!                 └──────── no handles ───────────────┘
//! ```
//!
//! The structural change is applied at commit; animations only overlay it.
//! Entries leaving the stack through a pop or a replace stay in place, marked
//! invalid, until the finish step removes them. A new commit while a
//! transition is still animating cancels it and runs its finish step first.
//!
//! Animation roles:
//!
//! | Kind            | Visible entries below | New top   | Removed top |
//! |-----------------|-----------------------|-----------|-------------|
//! | Add, Replace    | `LowerOut`            | `UpperIn` |             |
//! | Remove, Pop     | `LowerIn`             |           | `UpperOut`  |

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::animation::{Animation, AnimationRes, AnimationRole, AnimationSet, AnimationStatus};
use crate::entry::{Blob, EntryId, StackEntry, Visibility};
use crate::error::Error;
use crate::host::{Host, LayoutId};
use crate::stack::Layers;
use crate::time::HostTime;
use crate::trace::{Tracer, TransitionEvent, TransitionKind, TransitionPhase};
use crate::unit::UnitType;

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

enum Op {
    Add { entry: StackEntry, replace: bool },
    Remove { target: EntryId },
}

/// A pending structural mutation of a [`Layers`] stack.
///
/// Nothing happens until [`commit`](Self::commit).
#[must_use = "a transition does nothing until it is committed"]
pub struct Transition<'a> {
    layers: &'a mut Layers,
    op: Op,
    animate: bool,
}

impl fmt::Debug for Transition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Transition");
        match &self.op {
            Op::Add { entry, replace } => s.field("entry", entry).field("replace", replace),
            Op::Remove { target } => s.field("remove", target),
        };
        s.field("animate", &self.animate).finish_non_exhaustive()
    }
}

impl<'a> Transition<'a> {
    pub(crate) fn add(layers: &'a mut Layers, unit_type: UnitType) -> Self {
        Self::insert(layers, unit_type, false)
    }

    pub(crate) fn replace(layers: &'a mut Layers, unit_type: UnitType) -> Self {
        Self::insert(layers, unit_type, true)
    }

    pub(crate) fn remove(layers: &'a mut Layers, target: EntryId) -> Self {
        let animate = layers.config.animations_enabled;
        Self {
            layers,
            op: Op::Remove { target },
            animate,
        }
    }

    fn insert(layers: &'a mut Layers, unit_type: UnitType, replace: bool) -> Self {
        let id = layers.next_entry_id();
        let entry = StackEntry::new(id, unit_type, layers.config.default_visibility);
        let animate = layers.config.animations_enabled;
        Self {
            layers,
            op: Op::Add { entry, replace },
            animate,
        }
    }

    fn new_entry(&mut self, what: &str) -> &mut StackEntry {
        match &mut self.op {
            Op::Add { entry, .. } => entry,
            Op::Remove { .. } => panic!("cannot set {what} on a remove transition"),
        }
    }

    // -- Builder methods ----------------------------------------------------

    /// Names the new entry, for [`Layers::find`] and [`Layers::pop_to`].
    ///
    /// # Panics
    ///
    /// Panics on a remove transition.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.new_entry("a name").name = Some(name.into());
        self
    }

    /// Arguments handed to the unit on every creation.
    ///
    /// # Panics
    ///
    /// Panics on a remove transition.
    pub fn arguments(mut self, arguments: impl Into<Blob>) -> Self {
        self.new_entry("arguments").arguments = Some(arguments.into());
        self
    }

    /// Sets the new entry's visibility.
    ///
    /// # Panics
    ///
    /// Panics on a remove transition.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.new_entry("visibility").visibility = visibility;
        self
    }

    /// Shorthand for [`visibility`](Self::visibility).
    ///
    /// # Panics
    ///
    /// Panics on a remove transition.
    pub fn opaque(self, opaque: bool) -> Self {
        self.visibility(if opaque {
            Visibility::Opaque
        } else {
            Visibility::Transparent
        })
    }

    /// Has the host inflate `layout` instead of calling
    /// [`Unit::on_create_view`](crate::unit::Unit::on_create_view).
    ///
    /// # Panics
    ///
    /// Panics on a remove transition.
    pub fn layout(mut self, layout: LayoutId) -> Self {
        self.new_entry("a layout").layout = Some(layout);
        self
    }

    /// Sets the resource played in `role` when this entry is involved in a
    /// transition, now or when it is later popped.
    ///
    /// # Panics
    ///
    /// Panics on a remove transition.
    pub fn animation(mut self, role: AnimationRole, res: AnimationRes) -> Self {
        self.new_entry("an animation").animations.set(role, Some(res));
        self
    }

    /// Resources played while this entry comes in.
    ///
    /// # Panics
    ///
    /// Panics on a remove transition.
    pub fn in_animations(self, lower_out: AnimationRes, upper_in: AnimationRes) -> Self {
        self.animation(AnimationRole::LowerOut, lower_out)
            .animation(AnimationRole::UpperIn, upper_in)
    }

    /// Resources played when this entry is later popped.
    ///
    /// # Panics
    ///
    /// Panics on a remove transition.
    pub fn out_animations(self, upper_out: AnimationRes, lower_in: AnimationRes) -> Self {
        self.animation(AnimationRole::UpperOut, upper_out)
            .animation(AnimationRole::LowerIn, lower_in)
    }

    /// Turns animations off for this transition. Cannot turn them on when
    /// the stack's configuration disables them.
    pub fn animations(mut self, enabled: bool) -> Self {
        self.animate = enabled && self.layers.config.animations_enabled;
        self
    }

    // -- Inspection ---------------------------------------------------------

    /// The entry this transition adds or removes.
    #[must_use]
    pub fn entry_id(&self) -> EntryId {
        match &self.op {
            Op::Add { entry, .. } => entry.id,
            Op::Remove { target } => *target,
        }
    }

    /// Name of the entry being added or removed.
    #[must_use]
    pub fn target_name(&self) -> Option<&str> {
        match &self.op {
            Op::Add { entry, .. } => entry.name(),
            Op::Remove { target } => self
                .layers
                .position(*target)
                .and_then(|index| self.layers.entries[index].name()),
        }
    }

    // -- Commit -------------------------------------------------------------

    /// Applies the mutation and starts its animations.
    ///
    /// Any transition still animating on this stack is cancelled and
    /// finished first. Returns the id of the entry added or removed.
    /// Removing an entry that has already left the stack does nothing.
    pub fn commit(self, host: &mut dyn Host) -> Result<EntryId, Error> {
        let Self { layers, op, animate } = self;
        if let Op::Add { entry, .. } = &op {
            if !layers.registry.contains(&entry.unit_type) {
                return Err(Error::UnknownUnitType(entry.unit_type.clone()));
            }
        }
        layers.finish_transition(host)?;
        let plan = match op {
            Op::Add { entry, replace } => layers.apply_insert(host, entry, replace),
            Op::Remove { target } => match layers.position(target) {
                Some(index) => layers.apply_remove(host, index),
                None => return Ok(target),
            },
        };
        let plan = match plan {
            Ok(plan) => plan,
            Err(err) => {
                layers.reset_transition_flags();
                return Err(err);
            }
        };
        let id = plan.entry;
        layers.start(host, plan, animate)?;
        Ok(id)
    }
}

// ---------------------------------------------------------------------------
// Running transitions
// ---------------------------------------------------------------------------

/// What a commit changed, before animations are collected.
struct Plan {
    kind: TransitionKind,
    entry: EntryId,
    deferred: Option<EntryId>,
    set: AnimationSet,
    roles: Vec<(usize, AnimationRole)>,
}

#[derive(Debug)]
struct Running {
    entry: EntryId,
    role: AnimationRole,
    handle: Box<dyn Animation>,
    done: bool,
}

/// A committed transition waiting on its animations.
#[derive(Debug)]
pub(crate) struct ActiveTransition {
    kind: TransitionKind,
    entry: EntryId,
    /// Entry to remove once the animations end.
    deferred: Option<EntryId>,
    running: Vec<Running>,
}

impl Layers {
    /// Ticks the running transition's animations, here and in every nested
    /// stack, finishing any transition whose animations have all ended.
    ///
    /// Returns `true` while anything is still animating.
    pub fn advance(&mut self, host: &mut dyn Host, now: HostTime) -> Result<bool, Error> {
        let mut animating = false;
        if let Some(mut active) = self.active.take() {
            for anim in active.running.iter_mut().filter(|a| !a.done) {
                if anim.handle.advance(host, now) == AnimationStatus::Finished {
                    anim.done = true;
                    self.notify_animation_end(anim.entry, anim.role);
                }
            }
            if active.running.iter().all(|a| a.done) {
                self.complete(host, &active, TransitionPhase::Finished)?;
            } else {
                self.active = Some(active);
                animating = true;
            }
        }
        for child in self.children.values_mut() {
            animating |= child.advance(host, now)?;
        }
        Ok(animating)
    }

    /// Cancels whatever is still animating and runs the finish step now.
    ///
    /// Does nothing when no transition is running.
    pub fn finish_transition(&mut self, host: &mut dyn Host) -> Result<(), Error> {
        let Some(mut active) = self.active.take() else {
            return Ok(());
        };
        for anim in active.running.iter_mut().filter(|a| !a.done) {
            anim.handle.cancel(host);
            anim.done = true;
            self.notify_animation_end(anim.entry, anim.role);
        }
        self.complete(host, &active, TransitionPhase::Cancelled)
    }

    // -- Commit steps -------------------------------------------------------

    fn apply_insert(
        &mut self,
        host: &mut dyn Host,
        mut entry: StackEntry,
        replace: bool,
    ) -> Result<Plan, Error> {
        let id = entry.id;
        let set = entry.animations;
        let deferred = if replace {
            self.entries.last().map(|top| top.id)
        } else {
            None
        };
        entry.in_transition = true;
        let top = self.push_entry(host, entry)?;
        if deferred.is_some() {
            self.entries[top - 1].valid = false;
        }

        let lowest = self.lowest_visible().unwrap_or(top);
        self.mark_in_transition(lowest);
        let mut roles: Vec<_> = (lowest..top).map(|i| (i, AnimationRole::LowerOut)).collect();
        roles.push((top, AnimationRole::UpperIn));
        Ok(Plan {
            kind: if replace {
                TransitionKind::Replace
            } else {
                TransitionKind::Add
            },
            entry: id,
            deferred,
            set,
            roles,
        })
    }

    fn apply_remove(&mut self, host: &mut dyn Host, index: usize) -> Result<Plan, Error> {
        let is_top = index + 1 == self.entries.len();
        let target = &mut self.entries[index];
        target.valid = false;
        let id = target.id;
        let set = target.animations;

        if is_top {
            // The outgoing top stays put until its animation ends; treat it
            // as transparent so whatever it uncovers comes up now.
            target.in_transition = true;
            self.transparent_tail = 1;
            self.ensure_views(host)?;
            let lowest = self.lowest_visible().unwrap_or(index);
            self.mark_in_transition(lowest);
            let mut roles = Vec::with_capacity(index - lowest + 1);
            roles.push((index, AnimationRole::UpperOut));
            roles.extend((lowest..index).map(|i| (i, AnimationRole::LowerIn)));
            Ok(Plan {
                kind: TransitionKind::Pop,
                entry: id,
                deferred: Some(id),
                set,
                roles,
            })
        } else {
            self.remove_entry_at(host, index)?;
            let lowest = self.lowest_visible().unwrap_or(0);
            Ok(Plan {
                kind: TransitionKind::Remove,
                entry: id,
                deferred: None,
                set,
                roles: (lowest..index).map(|i| (i, AnimationRole::LowerIn)).collect(),
            })
        }
    }

    fn start(&mut self, host: &mut dyn Host, plan: Plan, animate: bool) -> Result<(), Error> {
        let Plan {
            kind,
            entry,
            deferred,
            set,
            roles,
        } = plan;
        let running = if animate && !self.view_paused {
            self.start_animations(host, &roles, set)
        } else {
            Vec::new()
        };
        let active = ActiveTransition {
            kind,
            entry,
            deferred,
            running,
        };
        self.trace_transition(host, &active, TransitionPhase::Started);
        if active.running.is_empty() {
            return self.complete(host, &active, TransitionPhase::Finished);
        }
        self.trace_transition(host, &active, TransitionPhase::Animating);
        self.active = Some(active);
        Ok(())
    }

    /// Asks each role's unit, then the host, for a handle and starts it.
    /// Entries without a live in-layout view are skipped.
    fn start_animations(
        &mut self,
        host: &mut dyn Host,
        roles: &[(usize, AnimationRole)],
        set: AnimationSet,
    ) -> Vec<Running> {
        let mut running = Vec::new();
        for &(index, role) in roles {
            let entry = &mut self.entries[index];
            let id = entry.id;
            let Some(view) = entry.view.filter(|_| entry.in_layout) else {
                continue;
            };
            let Some(unit) = entry.instance.as_deref_mut() else {
                continue;
            };
            let handle = unit
                .animation(role)
                .or_else(|| set.get(role).and_then(|res| host.animation(view, res)));
            if let Some(mut handle) = handle {
                handle.start(host, None);
                unit.on_animation_start(role);
                running.push(Running {
                    entry: id,
                    role,
                    handle,
                    done: false,
                });
            }
        }
        running
    }

    /// The finish step: clear transition flags, run the deferred removal,
    /// rematerialize.
    fn complete(
        &mut self,
        host: &mut dyn Host,
        active: &ActiveTransition,
        phase: TransitionPhase,
    ) -> Result<(), Error> {
        self.reset_transition_flags();
        match active.deferred.and_then(|id| self.position(id)) {
            Some(index) => {
                self.remove_entry_at(host, index)?;
            }
            None => self.ensure_views(host)?,
        }
        self.trace_transition(host, active, phase);
        Ok(())
    }

    // -- Helpers ------------------------------------------------------------

    fn mark_in_transition(&mut self, lowest: usize) {
        for entry in self.entries.iter_mut().skip(lowest + 1) {
            entry.in_transition = true;
        }
    }

    fn reset_transition_flags(&mut self) {
        for entry in &mut self.entries {
            entry.in_transition = false;
        }
        self.transparent_tail = 0;
    }

    fn notify_animation_end(&mut self, entry: EntryId, role: AnimationRole) {
        let unit = self
            .position(entry)
            .and_then(|index| self.entries[index].instance.as_deref_mut());
        if let Some(unit) = unit {
            unit.on_animation_end(role);
        }
    }

    fn trace_transition(
        &self,
        host: &mut dyn Host,
        active: &ActiveTransition,
        phase: TransitionPhase,
    ) {
        Tracer::for_host(host).transition(&TransitionEvent {
            slot: self.slot,
            kind: active.kind,
            phase,
            entry: active.entry,
            animations: active.running.len(),
        });
    }
}
