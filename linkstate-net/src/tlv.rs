//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! Generic TLV codec: `{type: 1 byte, len: 1 byte, value: len bytes}`,
//! as specified in spec.md §6. No sub-TLVs — those are an `holo-isis`
//! extension this simulator's wire format doesn't need.

use bytes::{BufMut, BytesMut};

/// Appends a single TLV to `buf`. Panics if `value.len()` overflows a u8,
/// which cannot happen for any TLV this crate emits (callers size their
/// payloads well under 256 bytes).
pub fn insert_tlv(buf: &mut BytesMut, tlv_type: u8, value: &[u8]) {
    assert!(value.len() <= u8::MAX as usize, "TLV value too large");
    buf.put_u8(tlv_type);
    buf.put_u8(value.len() as u8);
    buf.put_slice(value);
}

/// Returns the value of the first TLV of the given type found in `buf`, if
/// any.
pub fn get_particular_tlv(buf: &[u8], tlv_type: u8) -> Option<&[u8]> {
    iter_tlvs(buf).find(|(t, _)| *t == tlv_type).map(|(_, v)| v)
}

/// Iterates over every well-formed `(type, value)` TLV in `buf`. Stops at
/// the first truncated/malformed entry rather than erroring, matching
/// spec.md §7's "no error propagates across the trap boundary" policy —
/// callers that care about malformed input increment a counter themselves.
pub fn iter_tlvs(buf: &[u8]) -> impl Iterator<Item = (u8, &[u8])> {
    TlvIter { buf }
}

struct TlvIter<'a> {
    buf: &'a [u8],
}

impl<'a> Iterator for TlvIter<'a> {
    type Item = (u8, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let [tlv_type, len, rest @ ..] = self.buf else {
            return None;
        };
        let len = *len as usize;
        if rest.len() < len {
            self.buf = &[];
            return None;
        }
        let (value, rest) = rest.split_at(len);
        self.buf = rest;
        Some((*tlv_type, value))
    }
}
