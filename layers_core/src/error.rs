// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable failures surfaced by stack operations.
//!
//! Misuse of the API (popping an empty stack, indexing past the end, setting
//! a name on a remove transition) panics at the call site instead; see the
//! `# Panics` sections on the individual methods.

use alloc::string::String;

use crate::codec::DecodeError;
use crate::host::ViewId;
use crate::unit::UnitType;

/// Errors returned by [`Layers`](crate::stack::Layers) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No factory is registered for a unit type tag.
    #[error("no unit registered for type `{0}`")]
    UnknownUnitType(UnitType),
    /// A view lookup by id failed.
    #[error("unable to find view {id} ({})", .name.as_deref().unwrap_or("unnamed"))]
    ViewNotFound {
        /// The numeric id that was looked up.
        id: u32,
        /// The host's symbolic name for `id`, if it has one.
        name: Option<String>,
    },
    /// A resolved container view cannot hold child views.
    #[error("view {0:?} is not a view container")]
    NotAContainer(ViewId),
    /// A persisted stack could not be decoded.
    #[error("failed to decode saved stack: {0}")]
    Decode(#[from] DecodeError),
}
