// Copyright 2026 the Layers Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary encoding of [`SavedStack`].
//!
//! Layout (all integers little-endian):
//!
//! ```text
//!   header   "LYRS" version:u8
//!   stack    entry_count:u32 entry* child_count:u32 (slot:u32 stack)*
//!   entry    unit_type:str name:opt<str> arguments:opt<bytes>
//!            visibility:u8 layout:opt<u32> layer_state:opt<bytes>
//!            view_state:opt<bytes> animation_mask:u8 res:u32*
//!   str      len:u32 utf8
//!   bytes    len:u32 raw
//!   opt<T>   0 | 1 T
//! ```
//!
//! `animation_mask` has bit `n` set when the role with slot index `n` has a
//! resource; one `u32` follows per set bit, in slot order.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::animation::{AnimationRes, AnimationRole, AnimationSet};
use crate::entry::{Blob, Visibility};
use crate::host::{LayoutId, SlotId};
use crate::state::{SavedEntry, SavedStack};
use crate::unit::UnitType;

// ---------------------------------------------------------------------------
// Format constants
// ---------------------------------------------------------------------------

const MAGIC: [u8; 4] = *b"LYRS";
const VERSION: u8 = 1;

const VISIBILITY_OPAQUE: u8 = 0;
const VISIBILITY_TRANSPARENT: u8 = 1;

/// Deepest nesting of child stacks accepted by [`SavedStack::decode`].
pub const MAX_DEPTH: usize = 32;

/// Why a byte buffer could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer does not start with the expected magic bytes.
    #[error("missing header magic")]
    BadMagic,
    /// The buffer was written by an unknown format version.
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),
    /// The buffer ended in the middle of a record.
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEnd {
        /// Where reading stopped.
        offset: usize,
    },
    /// A tag byte had a value with no meaning.
    #[error("invalid tag {tag} at byte {offset}")]
    InvalidTag {
        /// Position of the tag.
        offset: usize,
        /// The value found.
        tag: u8,
    },
    /// A string was not valid UTF-8.
    #[error("invalid utf-8 string at byte {offset}")]
    InvalidUtf8 {
        /// Position of the string payload.
        offset: usize,
    },
    /// Child stacks were nested deeper than [`MAX_DEPTH`].
    #[error("child stacks nested too deeply")]
    TooDeep,
    /// Bytes were left over after the root stack.
    #[error("{0} trailing bytes after saved stack")]
    TrailingBytes(usize),
}

impl SavedStack {
    /// Encodes this stack into a self-describing byte buffer.
    ///
    /// # Panics
    ///
    /// Panics if a count or blob length exceeds `u32::MAX`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::default();
        w.buf.extend_from_slice(&MAGIC);
        w.write_u8(VERSION);
        w.write_stack(self);
        w.buf
    }

    /// Decodes a buffer produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader { data: bytes, pos: 0 };
        if r.take(MAGIC.len())? != MAGIC.as_slice() {
            return Err(DecodeError::BadMagic);
        }
        let version = r.read_u8()?;
        if version != VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        let stack = r.read_stack(0)?;
        match r.remaining() {
            0 => Ok(stack),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_len(&mut self, len: usize) {
        let Ok(len32) = u32::try_from(len) else {
            panic!("length {len} does not fit a saved-state length field");
        };
        self.write_u32(len32);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_len(bytes.len());
        self.buf.extend_from_slice(bytes);
    }

    fn write_opt_bytes(&mut self, bytes: Option<&[u8]>) {
        match bytes {
            Some(bytes) => {
                self.write_u8(1);
                self.write_bytes(bytes);
            }
            None => self.write_u8(0),
        }
    }

    fn write_opt_u32(&mut self, v: Option<u32>) {
        match v {
            Some(v) => {
                self.write_u8(1);
                self.write_u32(v);
            }
            None => self.write_u8(0),
        }
    }

    fn write_animations(&mut self, set: &AnimationSet) {
        let mut mask = 0_u8;
        for role in AnimationRole::ALL {
            if set.get(role).is_some() {
                mask |= 1 << role.index();
            }
        }
        self.write_u8(mask);
        for role in AnimationRole::ALL {
            if let Some(res) = set.get(role) {
                self.write_u32(res.0);
            }
        }
    }

    fn write_entry(&mut self, e: &SavedEntry) {
        self.write_bytes(e.unit_type.as_str().as_bytes());
        self.write_opt_bytes(e.name.as_deref().map(str::as_bytes));
        self.write_opt_bytes(e.arguments.as_deref());
        self.write_u8(match e.visibility {
            Visibility::Opaque => VISIBILITY_OPAQUE,
            Visibility::Transparent => VISIBILITY_TRANSPARENT,
        });
        self.write_opt_u32(e.layout.map(|l| l.0));
        self.write_opt_bytes(e.layer_state.as_deref());
        self.write_opt_bytes(e.view_state.as_deref());
        self.write_animations(&e.animations);
    }

    fn write_stack(&mut self, stack: &SavedStack) {
        self.write_len(stack.entries.len());
        for entry in &stack.entries {
            self.write_entry(entry);
        }
        self.write_len(stack.children.len());
        for (slot, child) in &stack.children {
            self.write_u32(slot.0);
            self.write_stack(child);
        }
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::UnexpectedEnd {
                offset: self.data.len(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_len(&mut self) -> Result<usize, DecodeError> {
        Ok(self.read_u32()? as usize)
    }

    fn read_flag(&mut self) -> Result<bool, DecodeError> {
        let offset = self.pos;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            tag => Err(DecodeError::InvalidTag { offset, tag }),
        }
    }

    fn read_bytes(&mut self) -> Result<Blob, DecodeError> {
        let len = self.read_len()?;
        Ok(self.take(len)?.to_vec())
    }

    fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_len()?;
        let offset = self.pos;
        let bytes = self.take(len)?;
        core::str::from_utf8(bytes)
            .map(String::from)
            .map_err(|_| DecodeError::InvalidUtf8 { offset })
    }

    fn read_opt_bytes(&mut self) -> Result<Option<Blob>, DecodeError> {
        if self.read_flag()? {
            self.read_bytes().map(Some)
        } else {
            Ok(None)
        }
    }

    fn read_opt_string(&mut self) -> Result<Option<String>, DecodeError> {
        if self.read_flag()? {
            self.read_string().map(Some)
        } else {
            Ok(None)
        }
    }

    fn read_opt_u32(&mut self) -> Result<Option<u32>, DecodeError> {
        if self.read_flag()? {
            self.read_u32().map(Some)
        } else {
            Ok(None)
        }
    }

    fn read_visibility(&mut self) -> Result<Visibility, DecodeError> {
        let offset = self.pos;
        match self.read_u8()? {
            VISIBILITY_OPAQUE => Ok(Visibility::Opaque),
            VISIBILITY_TRANSPARENT => Ok(Visibility::Transparent),
            tag => Err(DecodeError::InvalidTag { offset, tag }),
        }
    }

    fn read_animations(&mut self) -> Result<AnimationSet, DecodeError> {
        let offset = self.pos;
        let mask = self.read_u8()?;
        if mask >> AnimationRole::ALL.len() != 0 {
            return Err(DecodeError::InvalidTag { offset, tag: mask });
        }
        let mut set = AnimationSet::EMPTY;
        for role in AnimationRole::ALL {
            if mask & (1 << role.index()) != 0 {
                set.set(role, Some(AnimationRes(self.read_u32()?)));
            }
        }
        Ok(set)
    }

    fn read_entry(&mut self) -> Result<SavedEntry, DecodeError> {
        Ok(SavedEntry {
            unit_type: UnitType::new(self.read_string()?),
            name: self.read_opt_string()?,
            arguments: self.read_opt_bytes()?,
            visibility: self.read_visibility()?,
            layout: self.read_opt_u32()?.map(LayoutId),
            layer_state: self.read_opt_bytes()?,
            view_state: self.read_opt_bytes()?,
            animations: self.read_animations()?,
        })
    }

    fn read_stack(&mut self, depth: usize) -> Result<SavedStack, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::TooDeep);
        }
        let count = self.read_len()?;
        // Every entry takes at least 11 bytes; don't trust `count` for the
        // allocation.
        let mut entries = Vec::with_capacity(count.min(self.remaining() / 11));
        for _ in 0..count {
            entries.push(self.read_entry()?);
        }
        let child_count = self.read_len()?;
        let mut children = BTreeMap::new();
        for _ in 0..child_count {
            let slot = SlotId(self.read_u32()?);
            children.insert(slot, self.read_stack(depth + 1)?);
        }
        Ok(SavedStack { entries, children })
    }
}
