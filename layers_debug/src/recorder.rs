// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`], in the order they were recorded.
//!
//! Counts and indices are stored as `u32` and saturate.

use layers_core::entry::{EntryId, LifecycleState};
use layers_core::host::{SlotId, ViewId};
use layers_core::trace::{
    LifecycleEvent, StateEvent, TraceSink, TransitionEvent, TransitionKind, TransitionPhase,
    ViewEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_LIFECYCLE: u8 = 1;
const TAG_VIEW_ADDED: u8 = 2;
const TAG_VIEW_REMOVED: u8 = 3;
const TAG_TRANSITION: u8 = 4;
const TAG_STATE_SAVED: u8 = 5;
const TAG_STATE_RESTORED: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&mut self, v: usize) {
        self.write_u32(u32::try_from(v).unwrap_or(u32::MAX));
    }

    fn write_option_u32(&mut self, v: Option<u32>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_u32(val);
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
            }
        }
    }

    fn write_header(&mut self, tag: u8, slot: Option<SlotId>, entry: Option<EntryId>) {
        self.write_u8(tag);
        self.write_option_u32(slot.map(|s| s.0));
        if let Some(entry) = entry {
            self.write_u64(entry.to_raw());
        }
    }

    fn write_state(&mut self, s: LifecycleState) {
        self.write_u8(match s {
            LifecycleState::Empty => 0,
            LifecycleState::Created => 1,
            LifecycleState::ViewCreated => 2,
            LifecycleState::ViewDestroyed => 3,
            LifecycleState::Destroyed => 4,
        });
    }

    fn write_view(&mut self, tag: u8, e: &ViewEvent) {
        self.write_header(tag, e.slot, Some(e.entry));
        self.write_u32(e.view.0);
        self.write_option_u32(e.position.map(|p| u32::try_from(p).unwrap_or(u32::MAX)));
    }

    fn write_stack_state(&mut self, tag: u8, e: &StateEvent) {
        self.write_header(tag, e.slot, None);
        self.write_count(e.entries);
        self.write_count(e.children);
    }
}

impl TraceSink for RecorderSink {
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.write_header(TAG_LIFECYCLE, e.slot, Some(e.entry));
        self.write_count(e.index);
        self.write_state(e.from);
        self.write_state(e.to);
    }

    fn on_view_added(&mut self, e: &ViewEvent) {
        self.write_view(TAG_VIEW_ADDED, e);
    }

    fn on_view_removed(&mut self, e: &ViewEvent) {
        self.write_view(TAG_VIEW_REMOVED, e);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.write_header(TAG_TRANSITION, e.slot, Some(e.entry));
        self.write_u8(match e.kind {
            TransitionKind::Add => 0,
            TransitionKind::Replace => 1,
            TransitionKind::Remove => 2,
            TransitionKind::Pop => 3,
        });
        self.write_u8(match e.phase {
            TransitionPhase::Started => 0,
            TransitionPhase::Animating => 1,
            TransitionPhase::Finished => 2,
            TransitionPhase::Cancelled => 3,
        });
        self.write_count(e.animations);
    }

    fn on_state_saved(&mut self, e: &StateEvent) {
        self.write_stack_state(TAG_STATE_SAVED, e);
    }

    fn on_state_restored(&mut self, e: &StateEvent) {
        self.write_stack_state(TAG_STATE_RESTORED, e);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`LifecycleEvent`].
    Lifecycle(LifecycleEvent),
    /// A view insertion.
    ViewAdded(ViewEvent),
    /// A view removal.
    ViewRemoved(ViewEvent),
    /// A [`TransitionEvent`].
    Transition(TransitionEvent),
    /// A state save.
    StateSaved(StateEvent),
    /// A state restore.
    StateRestored(StateEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_count(&mut self) -> Option<usize> {
        usize::try_from(self.read_u32()?).ok()
    }

    fn read_option_u32(&mut self) -> Option<Option<u32>> {
        let present = self.read_u8()?;
        let val = self.read_u32()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn read_slot(&mut self) -> Option<Option<SlotId>> {
        Some(self.read_option_u32()?.map(SlotId))
    }

    fn read_entry(&mut self) -> Option<EntryId> {
        self.read_u64().map(EntryId::from_raw)
    }

    fn read_state(&mut self) -> Option<LifecycleState> {
        Some(match self.read_u8()? {
            0 => LifecycleState::Empty,
            1 => LifecycleState::Created,
            2 => LifecycleState::ViewCreated,
            3 => LifecycleState::ViewDestroyed,
            _ => LifecycleState::Destroyed,
        })
    }

    fn read_kind(&mut self) -> Option<TransitionKind> {
        Some(match self.read_u8()? {
            0 => TransitionKind::Add,
            1 => TransitionKind::Replace,
            2 => TransitionKind::Remove,
            _ => TransitionKind::Pop,
        })
    }

    fn read_phase(&mut self) -> Option<TransitionPhase> {
        Some(match self.read_u8()? {
            0 => TransitionPhase::Started,
            1 => TransitionPhase::Animating,
            2 => TransitionPhase::Finished,
            _ => TransitionPhase::Cancelled,
        })
    }

    fn decode_lifecycle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Lifecycle(LifecycleEvent {
            slot: self.read_slot()?,
            entry: self.read_entry()?,
            index: self.read_count()?,
            from: self.read_state()?,
            to: self.read_state()?,
        }))
    }

    fn decode_view(&mut self) -> Option<ViewEvent> {
        Some(ViewEvent {
            slot: self.read_slot()?,
            entry: self.read_entry()?,
            view: ViewId(self.read_u32()?),
            position: self
                .read_option_u32()?
                .and_then(|p| usize::try_from(p).ok()),
        })
    }

    fn decode_transition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transition(TransitionEvent {
            slot: self.read_slot()?,
            entry: self.read_entry()?,
            kind: self.read_kind()?,
            phase: self.read_phase()?,
            animations: self.read_count()?,
        }))
    }

    fn decode_stack_state(&mut self) -> Option<StateEvent> {
        Some(StateEvent {
            slot: self.read_slot()?,
            entries: self.read_count()?,
            children: self.read_count()?,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_LIFECYCLE => self.decode_lifecycle(),
            TAG_VIEW_ADDED => self.decode_view().map(RecordedEvent::ViewAdded),
            TAG_VIEW_REMOVED => self.decode_view().map(RecordedEvent::ViewRemoved),
            TAG_TRANSITION => self.decode_transition(),
            TAG_STATE_SAVED => self.decode_stack_state().map(RecordedEvent::StateSaved),
            TAG_STATE_RESTORED => self.decode_stack_state().map(RecordedEvent::StateRestored),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
