// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-step lifecycle driver.
//!
//! [`Layers::move_to_state`] walks one entry toward a target state one step
//! at a time, calling the unit's hooks in order:
//!
//! ```text
//!   Empty ──create──► Created ──create view──► ViewCreated
//!   Empty ◄─destroy── Created ◄─destroy view── ViewCreated
//! ```
//!
//! Forward view creation is skipped while the stack is paused, so a paused
//! stack parks entries in `Created`. Tear-down with `persist` captures view
//! state and unit state into the entry for the next time it comes up.

use alloc::boxed::Box;

use crate::entry::LifecycleState;
use crate::error::Error;
use crate::host::Host;
use crate::stack::Layers;
use crate::trace::{LifecycleEvent, Tracer, ViewEvent};
use crate::unit::{CreateContext, Unit};

impl Layers {
    /// Moves the entry at `index` toward `target`, one state at a time.
    ///
    /// Targets [`LifecycleState::ViewDestroyed`] and
    /// [`LifecycleState::Destroyed`] settle in `Created` and `Empty`.
    pub(crate) fn move_to_state(
        &mut self,
        host: &mut dyn Host,
        index: usize,
        target: LifecycleState,
        persist: bool,
    ) -> Result<(), Error> {
        let target = target.resting();
        loop {
            let from = self.entries[index].state;
            if from == target {
                return Ok(());
            }
            match (from, target > from) {
                (LifecycleState::Empty, _) => self.create_unit(host, index)?,
                (LifecycleState::Created, true) => {
                    if self.view_paused {
                        return Ok(());
                    }
                    self.create_view(host, index)?;
                }
                (LifecycleState::Created, false) => self.destroy_unit(index, persist),
                _ => self.destroy_view(host, index, persist)?,
            }
            Tracer::for_host(host).lifecycle(&LifecycleEvent {
                slot: self.slot,
                entry: self.entries[index].id,
                index,
                from,
                to: self.entries[index].state,
            });
        }
    }

    fn create_unit(&mut self, host: &mut dyn Host, index: usize) -> Result<(), Error> {
        let entry = &mut self.entries[index];
        let mut unit = self.registry.instantiate(&entry.unit_type)?;
        let saved = entry.layer_state.take();
        unit.on_create(CreateContext {
            host,
            name: entry.name.as_deref(),
            arguments: entry.arguments.as_deref(),
            saved_state: saved.as_deref(),
        });
        entry.instance = Some(unit);
        entry.state = LifecycleState::Created;
        Ok(())
    }

    fn create_view(&mut self, host: &mut dyn Host, index: usize) -> Result<(), Error> {
        // Live views above this entry sit at the end of the container.
        let from_end = self.entries[index + 1..]
            .iter()
            .filter(|e| e.has_layout_view())
            .count();
        let slot = self.slot;
        let entry = &mut self.entries[index];
        let unit = live_unit(&mut entry.instance);

        let in_layout = unit.is_view_in_layout();
        let parent = if in_layout {
            Some(host.resolve_slot(slot)?)
        } else {
            None
        };
        let view = match entry.layout {
            Some(layout) => host.inflate(layout, parent),
            None => unit.on_create_view(host, parent),
        };
        if let (Some(view), Some(parent)) = (view, parent) {
            let container = host.container(parent).ok_or(Error::NotAContainer(parent))?;
            let position = container.child_count().saturating_sub(from_end);
            container.add_view(view, position);
            Tracer::for_host(host).view_added(&ViewEvent {
                slot,
                entry: entry.id,
                view,
                position: Some(position),
            });
        }

        entry.view = view;
        entry.in_layout = in_layout;
        entry.attached = true;
        entry.state = LifecycleState::ViewCreated;
        unit.on_attach();
        if let Some(view) = view {
            unit.on_bind_view(host, view)?;
            if let Some(state) = entry.view_state.take() {
                host.restore_view_state(view, &state);
            }
        }
        Ok(())
    }

    fn destroy_view(&mut self, host: &mut dyn Host, index: usize, persist: bool) -> Result<(), Error> {
        let slot = self.slot;
        let entry = &mut self.entries[index];
        let parent = match entry.view {
            Some(_) if entry.in_layout => Some(host.resolve_slot(slot)?),
            _ => None,
        };
        let view = entry.view.take();
        if persist {
            if let Some(view) = view {
                entry.view_state = host.save_view_state(view);
            }
        }

        let unit = live_unit(&mut entry.instance);
        unit.on_detach();
        entry.attached = false;
        if let (Some(view), Some(parent)) = (view, parent) {
            let container = host.container(parent).ok_or(Error::NotAContainer(parent))?;
            container.remove_view(view);
            Tracer::for_host(host).view_removed(&ViewEvent {
                slot,
                entry: entry.id,
                view,
                position: None,
            });
        }
        unit.on_destroy_view();
        entry.in_layout = false;
        entry.state = LifecycleState::Created;
        Ok(())
    }

    fn destroy_unit(&mut self, index: usize, persist: bool) {
        let entry = &mut self.entries[index];
        if let Some(mut unit) = entry.instance.take() {
            if persist {
                entry.layer_state = unit.on_save_state();
            }
            unit.on_destroy();
        }
        entry.state = LifecycleState::Empty;
    }
}

/// The unit behind an entry that is at least `Created`.
fn live_unit(instance: &mut Option<Box<dyn Unit>>) -> &mut (dyn Unit + 'static) {
    match instance.as_deref_mut() {
        Some(unit) => unit,
        None => panic!("entry past Empty has no unit instance"),
    }
}
