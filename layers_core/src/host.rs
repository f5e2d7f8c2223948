// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host capability interface.
//!
//! A [`Host`] is whatever owns the real view tree: a platform activity, a
//! fragment, or another unit's view (see [`NestedHost`]). The stack only ever
//! talks to views through this trait, and only through opaque [`ViewId`]
//! handles.
//!
//! Every method except [`resolve_slot`](Host::resolve_slot) and
//! [`container`](Host::container) has a default, so a minimal host only has
//! to say where stacks attach their views.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::animation::{Animation, AnimationRes, Presentation};
use crate::entry::Blob;
use crate::error::Error;
use crate::trace::TraceSink;
use crate::unit::UnitType;

/// Identifies a nested container slot inside a unit's view.
///
/// The numeric value is the id the host resolves with
/// [`Host::find_view`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(pub u32);

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({})", self.0)
    }
}

/// Opaque handle to a host view.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(pub u32);

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewId({})", self.0)
    }
}

/// Identifies a layout the host knows how to inflate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutId(pub u32);

impl fmt::Debug for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayoutId({})", self.0)
    }
}

/// A view that holds an ordered list of child views.
pub trait ViewContainer {
    /// Number of children currently attached.
    fn child_count(&self) -> usize;

    /// Inserts `view` so that it ends up at `index` among the children.
    fn add_view(&mut self, view: ViewId, index: usize);

    /// Detaches `view` from this container.
    fn remove_view(&mut self, view: ViewId);
}

/// Capabilities a stack needs from whatever owns the view tree.
pub trait Host {
    /// Returns the view that acts as the physical container for `slot`.
    ///
    /// `None` is the host's default container. An unknown slot is a lookup
    /// failure and should return [`Error::ViewNotFound`].
    fn resolve_slot(&self, slot: Option<SlotId>) -> Result<ViewId, Error>;

    /// Returns the container behind `view`, or `None` if it cannot hold
    /// children.
    fn container(&mut self, view: ViewId) -> Option<&mut dyn ViewContainer>;

    /// The unit type whose view encloses this host, if any.
    fn enclosing_unit(&self) -> Option<&UnitType> {
        None
    }

    /// Finds a descendant of `root` by numeric id.
    fn find_view(&self, root: ViewId, id: u32) -> Option<ViewId> {
        _ = (root, id);
        None
    }

    /// Symbolic name for a numeric view id, used in lookup errors.
    fn view_name(&self, id: u32) -> Option<String> {
        _ = id;
        None
    }

    /// Builds a view from a layout, optionally in the context of `parent`.
    ///
    /// The result is not attached; the stack inserts it itself.
    fn inflate(&mut self, layout: LayoutId, parent: Option<ViewId>) -> Option<ViewId> {
        _ = (layout, parent);
        None
    }

    /// Captures the hierarchy state of `view`, or `None` if there is nothing
    /// worth keeping.
    fn save_view_state(&mut self, view: ViewId) -> Option<Blob> {
        _ = view;
        None
    }

    /// Restores state previously captured by
    /// [`save_view_state`](Self::save_view_state).
    fn restore_view_state(&mut self, view: ViewId, state: &[u8]) {
        _ = (view, state);
    }

    /// Resolves an animation resource against `view`.
    fn animation(&mut self, view: ViewId, res: AnimationRes) -> Option<Box<dyn Animation>> {
        _ = (view, res);
        None
    }

    /// Applies an animated transform and opacity to `view`.
    fn apply_presentation(&mut self, view: ViewId, presentation: &Presentation) {
        _ = (view, presentation);
    }

    /// The sink stack diagnostics are written to, if any.
    fn trace_sink(&mut self) -> Option<&mut dyn TraceSink> {
        None
    }
}

/// Resolves `id` under `root`, producing a lookup error that carries the
/// symbolic name when the view is missing.
pub fn require_view(host: &dyn Host, root: ViewId, id: u32) -> Result<ViewId, Error> {
    host.find_view(root, id).ok_or_else(|| Error::ViewNotFound {
        id,
        name: host.view_name(id),
    })
}

// ---------------------------------------------------------------------------
// NestedHost
// ---------------------------------------------------------------------------

/// A host for stacks anchored inside a unit's own view.
///
/// The default container is the unit's root view; slots are resolved as
/// descendants of it. Everything else is forwarded to the outer host.
pub struct NestedHost<'a> {
    outer: &'a mut dyn Host,
    unit: UnitType,
    root: ViewId,
}

impl fmt::Debug for NestedHost<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedHost")
            .field("unit", &self.unit)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<'a> NestedHost<'a> {
    /// Wraps `outer` for stacks living under `root`, the view of a unit of
    /// type `unit`.
    #[must_use]
    pub fn new(outer: &'a mut dyn Host, unit: UnitType, root: ViewId) -> Self {
        Self { outer, unit, root }
    }

    /// The enclosing unit's root view.
    #[must_use]
    pub fn root(&self) -> ViewId {
        self.root
    }
}

impl Host for NestedHost<'_> {
    fn resolve_slot(&self, slot: Option<SlotId>) -> Result<ViewId, Error> {
        match slot {
            None => Ok(self.root),
            Some(slot) => require_view(&*self.outer, self.root, slot.0),
        }
    }

    fn container(&mut self, view: ViewId) -> Option<&mut dyn ViewContainer> {
        self.outer.container(view)
    }

    fn enclosing_unit(&self) -> Option<&UnitType> {
        Some(&self.unit)
    }

    fn find_view(&self, root: ViewId, id: u32) -> Option<ViewId> {
        self.outer.find_view(root, id)
    }

    fn view_name(&self, id: u32) -> Option<String> {
        self.outer.view_name(id)
    }

    fn inflate(&mut self, layout: LayoutId, parent: Option<ViewId>) -> Option<ViewId> {
        self.outer.inflate(layout, parent)
    }

    fn save_view_state(&mut self, view: ViewId) -> Option<Blob> {
        self.outer.save_view_state(view)
    }

    fn restore_view_state(&mut self, view: ViewId, state: &[u8]) {
        self.outer.restore_view_state(view, state);
    }

    fn animation(&mut self, view: ViewId, res: AnimationRes) -> Option<Box<dyn Animation>> {
        self.outer.animation(view, res)
    }

    fn apply_presentation(&mut self, view: ViewId, presentation: &Presentation) {
        self.outer.apply_presentation(view, presentation);
    }

    fn trace_sink(&mut self) -> Option<&mut dyn TraceSink> {
        self.outer.trace_sink()
    }
}
