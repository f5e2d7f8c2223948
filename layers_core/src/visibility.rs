// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Which entries need views.
//!
//! An entry is visible when nothing opaque sits above it. The scan starts at
//! the top and stops at the first opaque entry; everything from there up is
//! materialized, everything below is torn back to `Created` with its state
//! persisted.

use crate::entry::LifecycleState;
use crate::error::Error;
use crate::host::Host;
use crate::stack::Layers;

/// Index of the lowest visible item, or `None` for an empty slice.
///
/// The scan starts `extra_transparent_tail` items below the top (the items
/// skipped are treated as transparent) and walks down until `is_opaque`
/// holds; if nothing is opaque the answer is `0`.
#[must_use]
pub fn lowest_visible_index<T>(
    items: &[T],
    extra_transparent_tail: usize,
    is_opaque: impl Fn(&T) -> bool,
) -> Option<usize> {
    let top = items.len().checked_sub(1)?;
    let start = top.saturating_sub(extra_transparent_tail);
    Some((0..=start).rev().find(|&i| is_opaque(&items[i])).unwrap_or(0))
}

impl Layers {
    /// Index of the lowest entry that currently needs a view.
    pub(crate) fn lowest_visible(&self) -> Option<usize> {
        lowest_visible_index(&self.entries, self.transparent_tail, |e| e.occludes())
    }

    /// Brings every visible entry to `ViewCreated` and tears every hidden
    /// one back to `Created`, persisting its state. Works from the top down
    /// so new views are inserted beneath the ones already above them.
    ///
    /// Does nothing while paused.
    pub(crate) fn ensure_views(&mut self, host: &mut dyn Host) -> Result<(), Error> {
        if self.view_paused {
            return Ok(());
        }
        let Some(lowest) = self.lowest_visible() else {
            return Ok(());
        };
        for index in (0..self.entries.len()).rev() {
            if index < lowest {
                self.move_to_state(host, index, LifecycleState::ViewDestroyed, true)?;
            } else {
                self.move_to_state(host, index, LifecycleState::ViewCreated, false)?;
            }
        }
        Ok(())
    }
}
