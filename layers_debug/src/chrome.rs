// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Recordings carry no clock, so each event's timestamp is its position in
//! the recording. Transitions become `B`/`E` spans on a thread per entry;
//! everything else is an instant. The root stack is process 0 and a nested
//! stack in slot `N` is process `N + 1`.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use layers_core::host::SlotId;
use layers_core::trace::{StateEvent, TransitionPhase, ViewEvent};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for (ts, recorded) in decode(bytes).enumerate() {
        match recorded {
            RecordedEvent::Lifecycle(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.to),
                    "cat": "Lifecycle",
                    "ts": ts,
                    "pid": pid(e.slot),
                    "tid": e.entry.to_raw(),
                    "s": "t",
                    "args": {
                        "index": e.index,
                        "from": format!("{:?}", e.from),
                    }
                }));
            }
            RecordedEvent::ViewAdded(e) => events.push(view_event("ViewAdded", ts, &e)),
            RecordedEvent::ViewRemoved(e) => events.push(view_event("ViewRemoved", ts, &e)),
            RecordedEvent::Transition(e) => {
                let ph = match e.phase {
                    TransitionPhase::Started => "B",
                    TransitionPhase::Animating => "i",
                    TransitionPhase::Finished | TransitionPhase::Cancelled => "E",
                };
                events.push(json!({
                    "ph": ph,
                    "name": format!("{:?}", e.kind),
                    "cat": "Transition",
                    "ts": ts,
                    "pid": pid(e.slot),
                    "tid": e.entry.to_raw(),
                    "s": "t",
                    "args": {
                        "phase": format!("{:?}", e.phase),
                        "animations": e.animations,
                    }
                }));
            }
            RecordedEvent::StateSaved(e) => events.push(state_event("StateSaved", ts, &e)),
            RecordedEvent::StateRestored(e) => {
                events.push(state_event("StateRestored", ts, &e));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn view_event(name: &str, ts: usize, e: &ViewEvent) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": "View",
        "ts": ts,
        "pid": pid(e.slot),
        "tid": e.entry.to_raw(),
        "s": "t",
        "args": {
            "view": e.view.0,
            "position": e.position,
        }
    })
}

fn state_event(name: &str, ts: usize, e: &StateEvent) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": "State",
        "ts": ts,
        "pid": pid(e.slot),
        "tid": 0,
        "s": "p",
        "args": {
            "entries": e.entries,
            "children": e.children,
        }
    })
}

fn pid(slot: Option<SlotId>) -> u64 {
    slot.map_or(0, |s| u64::from(s.0) + 1)
}
