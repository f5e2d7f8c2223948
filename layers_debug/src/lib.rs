// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for layers
//! diagnostics.
//!
//! This crate provides [`TraceSink`](layers_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//!
//! Hand any of them to a stack by returning it from
//! [`Host::trace_sink`](layers_core::host::Host::trace_sink).

pub mod chrome;
pub mod pretty;
pub mod recorder;
