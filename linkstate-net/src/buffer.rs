//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! Reference-counted packet buffers. `bytes::Bytes` already implements the
//! shared-ownership, clone-is-cheap, refcount-to-zero-frees contract
//! spec.md §5 asks for, so `PktBuf` is a thin, named wrapper around it
//! rather than a hand-rolled allocator.

use bytes::{Bytes, BytesMut};

/// A ref-counted, immutable view of packet bytes. Cloning bumps the
/// refcount; the backing allocation is released when the last clone drops.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PktBuf(Bytes);

impl PktBuf {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// Allocates a zero-filled packet buffer of the given size.
pub fn alloc_pkt_buffer(size: usize) -> BytesMut {
    BytesMut::zeroed(size)
}

/// Freezes a mutable staging buffer into a shareable [`PktBuf`]. There is
/// no explicit `free_pkt_buffer`: dropping the last `PktBuf` clone releases
/// the allocation, which is the refcounting contract spec.md §5 describes.
pub fn freeze(buf: BytesMut) -> PktBuf {
    PktBuf(buf.freeze())
}

impl From<Bytes> for PktBuf {
    fn from(b: Bytes) -> PktBuf {
        PktBuf(b)
    }
}

impl From<Vec<u8>> for PktBuf {
    fn from(v: Vec<u8>) -> PktBuf {
        PktBuf(Bytes::from(v))
    }
}

impl std::ops::Deref for PktBuf {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}
