//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! Wire-format constants: the PDU header layout and TLV type codes from
//! spec.md §6's wire table. This simulator makes no claim to bit-exact
//! compatibility with real IS-IS (spec.md §1 Non-goals) — the layout below
//! is local to this crate.

use bitflags::bitflags;

/// Ethertype this instance's L2 trap predicate matches on. Real IS-IS runs
/// directly over 802.3 with an LLC/SNAP header; this simulator has no LLC
/// layer, so the ethertype alone identifies the protocol.
pub const ETHERTYPE_ISIS: u16 = 0x8033;

/// First field of every PDU.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u16)]
pub enum PduType {
    Hello = 1,
    Lsp = 2,
}

impl PduType {
    pub fn from_u16(v: u16) -> Option<PduType> {
        match v {
            1 => Some(PduType::Hello),
            2 => Some(PduType::Lsp),
            _ => None,
        }
    }
}

bitflags! {
    /// LSP header flag bits.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct LspFlags: u8 {
        const OVERLOAD = 0b01;
        const PURGE    = 0b10;
    }
}

/// TLV type codes carried in the PDU payload.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum TlvType {
    Hostname = 1,
    RouterIdText = 2,
    IfIpText = 3,
    IfIndex = 4,
    HoldTime = 5,
    Metric = 6,
    IsReach = 7,
    OnDemand = 8,
    /// Carried in hellos: one per router-id the sender has heard a valid
    /// hello from on this interface, used for the two-way check that
    /// promotes an adjacency from `Init` to `Up` (spec.md §4.2).
    NeighborSeen = 9,
}

/// Upper bound on an encoded PDU, matching spec.md §4.3's "abort if above
/// the maximum buffer size" rule. Generous for this simulator's small
/// scenarios; chosen to comfortably fit a full-mesh neighbour TLV list
/// without ever being reached in the shipped test scenarios.
pub const MAX_PDU_SIZE: usize = 1492;
