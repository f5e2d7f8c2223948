// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Each line
//! names the stack it came from: `root` or `slot=N` for nested stacks.

use std::fmt;
use std::io::Write;

use layers_core::host::SlotId;
use layers_core::trace::{
    LifecycleEvent, StateEvent, TraceSink, TransitionEvent, TransitionPhase, ViewEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Formats the stack an event came from.
struct Stack(Option<SlotId>);

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => f.write_str("root"),
            Some(slot) => write!(f, "slot={}", slot.0),
        }
    }
}

fn phase_name(phase: TransitionPhase) -> &'static str {
    match phase {
        TransitionPhase::Started => "start",
        TransitionPhase::Animating => "animate",
        TransitionPhase::Finished => "finish",
        TransitionPhase::Cancelled => "cancel",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        let _ = writeln!(
            self.writer,
            "[lifecycle] {} entry={} index={} {:?} -> {:?}",
            Stack(e.slot),
            e.entry.to_raw(),
            e.index,
            e.from,
            e.to,
        );
    }

    fn on_view_added(&mut self, e: &ViewEvent) {
        let position = e.position.map_or(String::from("?"), |p| p.to_string());
        let _ = writeln!(
            self.writer,
            "[view:add] {} entry={} view={} at={position}",
            Stack(e.slot),
            e.entry.to_raw(),
            e.view.0,
        );
    }

    fn on_view_removed(&mut self, e: &ViewEvent) {
        let _ = writeln!(
            self.writer,
            "[view:remove] {} entry={} view={}",
            Stack(e.slot),
            e.entry.to_raw(),
            e.view.0,
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[transition:{}] {} {:?} entry={} animations={}",
            phase_name(e.phase),
            Stack(e.slot),
            e.kind,
            e.entry.to_raw(),
            e.animations,
        );
    }

    fn on_state_saved(&mut self, e: &StateEvent) {
        let _ = writeln!(
            self.writer,
            "[state:save] {} entries={} children={}",
            Stack(e.slot),
            e.entries,
            e.children,
        );
    }

    fn on_state_restored(&mut self, e: &StateEvent) {
        let _ = writeln!(
            self.writer,
            "[state:restore] {} entries={} children={}",
            Stack(e.slot),
            e.entries,
            e.children,
        );
    }
}
