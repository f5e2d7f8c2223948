// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for stack operations.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! stack calls as entries move through their lifecycle, views are inserted
//! and removed, and transitions progress. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! The sink is reached through [`Host::trace_sink`]. [`Tracer`] wraps the
//! optional `&mut dyn TraceSink`. When the `trace` feature is **off**, every
//! `Tracer` method compiles to nothing and the host is never asked for a
//! sink. When **on**, each method performs a single `Option` branch before
//! dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::entry::{EntryId, LifecycleState};
use crate::host::{Host, SlotId, ViewId};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which structural mutation a transition performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// A new entry on top.
    Add,
    /// A new entry replacing the top.
    Replace,
    /// Removal of an entry below the top.
    Remove,
    /// Removal of the top entry.
    Pop,
}

/// Where a transition is in its protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// The structural change was applied.
    Started,
    /// Animation handles were collected and are running.
    Animating,
    /// All handles completed and deferred work ran.
    Finished,
    /// Running handles were cut short by a new mutation.
    Cancelled,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for each single-step lifecycle move.
#[derive(Clone, Copy, Debug)]
pub struct LifecycleEvent {
    /// Container slot of the stack (`None` for a root stack).
    pub slot: Option<SlotId>,
    /// The entry that moved.
    pub entry: EntryId,
    /// Its index at the time.
    pub index: usize,
    /// State before the step.
    pub from: LifecycleState,
    /// State after the step.
    pub to: LifecycleState,
}

/// Emitted when a view is added to or removed from the container.
#[derive(Clone, Copy, Debug)]
pub struct ViewEvent {
    /// Container slot of the stack.
    pub slot: Option<SlotId>,
    /// The owning entry.
    pub entry: EntryId,
    /// The view.
    pub view: ViewId,
    /// Insertion position; `None` for removals.
    pub position: Option<usize>,
}

/// Emitted as a transition moves through its phases.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// Container slot of the stack.
    pub slot: Option<SlotId>,
    /// The transition's kind.
    pub kind: TransitionKind,
    /// The phase just entered.
    pub phase: TransitionPhase,
    /// The entry the transition is about.
    pub entry: EntryId,
    /// Number of animation handles collected.
    pub animations: usize,
}

/// Emitted when a stack's state is saved or restored.
#[derive(Clone, Copy, Debug)]
pub struct StateEvent {
    /// Container slot of the stack.
    pub slot: Option<SlotId>,
    /// Number of entries saved or restored.
    pub entries: usize,
    /// Number of nested stacks carried along.
    pub children: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from stacks.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after each lifecycle step.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called after a view is inserted into the container.
    fn on_view_added(&mut self, e: &ViewEvent) {
        _ = e;
    }

    /// Called after a view is removed from the container.
    fn on_view_removed(&mut self, e: &ViewEvent) {
        _ = e;
    }

    /// Called as a transition changes phase.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called after a stack's state was saved.
    fn on_state_saved(&mut self, e: &StateEvent) {
        _ = e;
    }

    /// Called after a stack was rebuilt from saved state.
    fn on_state_restored(&mut self, e: &StateEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer over whatever sink `host` exposes.
    #[inline]
    #[must_use]
    pub fn for_host(host: &'a mut dyn Host) -> Self {
        #[cfg(feature = "trace")]
        {
            Self {
                sink: host.trace_sink(),
            }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = host;
            Self::none()
        }
    }

    /// Records a lifecycle step.
    #[inline]
    pub fn lifecycle(&mut self, e: &LifecycleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_lifecycle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Records a view insertion.
    #[inline]
    pub fn view_added(&mut self, e: &ViewEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_view_added(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Records a view removal.
    #[inline]
    pub fn view_removed(&mut self, e: &ViewEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_view_removed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Records a transition phase change.
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Records a state save.
    #[inline]
    pub fn state_saved(&mut self, e: &StateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_state_saved(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Records a state restore.
    #[inline]
    pub fn state_restored(&mut self, e: &StateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_state_restored(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
