// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A stack controller for screen-like UI panels.
//!
//! `layers_core` keeps an ordered stack of units ("layers") bound to one
//! physical view container, drives each unit through its lifecycle, keeps
//! views alive only for the entries that can actually be seen, animates
//! transitions between stack mutations, and saves and restores the whole
//! stack (nested stacks included). It is `no_std` compatible (with `alloc`)
//! and never touches a real view: everything goes through the
//! [`Host`](host::Host) capability trait.
//!
//! # Architecture
//!
//! ```text
//!   caller ──► Layers::add / replace / remove / pop ──► Transition
//!                                                          │ commit(host)
//!                 ┌────────────────────────────────────────┘
//!                 ▼
//!   structural change ──► ensure_views ──► move_to_state ──► Unit hooks
//!                 │                                           Host views
//!                 ▼
//!   animation handles ──► Layers::advance(now) ──► finish step
//! ```
//!
//! **[`stack`]**: [`Layers`](stack::Layers), the stack container: reads,
//! mutation builders, `pop_to`, pause/resume, nested stacks by slot.
//!
//! **[`transition`]**: The two-phase mutation protocol with animation
//! roles and deferred removal.
//!
//! **[`visibility`]**: Which entries need views; opaque entries cull what
//! is beneath them.
//!
//! **[`entry`]**: [`StackEntry`](entry::StackEntry) descriptors and their
//! lifecycle states.
//!
//! **[`state`]** and **[`codec`]**: Save/restore snapshots and their byte
//! encoding.
//!
//! **[`host`]**, **[`unit`]**, **[`registry`]**: The contracts the stack
//! is driven through and the type-tag registry used on restore.
//!
//! **[`animation`]**: Animation roles, handles, and the stock
//! [`SlideFade`](animation::SlideFade).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with the zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
pub mod codec;
pub mod entry;
pub mod error;
pub mod host;
mod lifecycle;
pub mod registry;
pub mod stack;
pub mod state;
pub mod time;
pub mod trace;
pub mod transition;
pub mod unit;
pub mod visibility;

#[cfg(test)]
mod testing;
