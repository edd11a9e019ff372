//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! Hello and LSP PDU encode/decode, built directly on
//! `linkstate_net::tlv`'s generic `{type, len, value}` codec (spec.md §6).

use std::net::Ipv4Addr;

use bytes::{Buf, BufMut, BytesMut};
use linkstate_net::buffer::{freeze, PktBuf};
use linkstate_net::tlv::{get_particular_tlv, insert_tlv, iter_tlvs};

use crate::packet::consts::{LspFlags, PduType, TlvType};

fn ipv4_from_be(bytes: &[u8]) -> Option<Ipv4Addr> {
    let arr: [u8; 4] = bytes.try_into().ok()?;
    Some(Ipv4Addr::from(arr))
}

fn u32_from_be(bytes: &[u8]) -> Option<u32> {
    let arr: [u8; 4] = bytes.try_into().ok()?;
    Some(u32::from_be_bytes(arr))
}

/// A hello, as received on or emitted out of an interface.
#[derive(Clone, Debug)]
pub struct Hello {
    pub hostname: String,
    pub router_id: Ipv4Addr,
    pub if_ip: Ipv4Addr,
    pub if_index: u32,
    pub hold_time: u32,
    pub metric: u32,
    /// Router-ids the sender has itself heard a valid hello from on this
    /// interface, carried so the receiver can perform the two-way check
    /// (spec.md §4.2).
    pub neighbors_seen: Vec<Ipv4Addr>,
}

impl Hello {
    pub fn encode(&self) -> PktBuf {
        let mut buf = BytesMut::new();
        buf.put_u16(PduType::Hello as u16);
        insert_tlv(&mut buf, TlvType::Hostname as u8, self.hostname.as_bytes());
        insert_tlv(
            &mut buf,
            TlvType::RouterIdText as u8,
            self.router_id.to_string().as_bytes(),
        );
        insert_tlv(
            &mut buf,
            TlvType::IfIpText as u8,
            self.if_ip.to_string().as_bytes(),
        );
        insert_tlv(&mut buf, TlvType::IfIndex as u8, &self.if_index.to_be_bytes());
        insert_tlv(&mut buf, TlvType::HoldTime as u8, &self.hold_time.to_be_bytes());
        insert_tlv(&mut buf, TlvType::Metric as u8, &self.metric.to_be_bytes());
        for seen in &self.neighbors_seen {
            insert_tlv(&mut buf, TlvType::NeighborSeen as u8, &seen.octets());
        }
        freeze(buf)
    }

    /// Decodes a hello PDU. Returns `None` on any missing or malformed
    /// field — the caller counts that as a `bad_hello` (spec.md §4.2).
    pub fn decode(mut buf: &[u8]) -> Option<Hello> {
        if buf.len() < 2 {
            return None;
        }
        let pkt_type = buf.get_u16();
        if PduType::from_u16(pkt_type) != Some(PduType::Hello) {
            return None;
        }

        let hostname = std::str::from_utf8(get_particular_tlv(buf, TlvType::Hostname as u8)?)
            .ok()?
            .to_owned();
        let router_id: Ipv4Addr = std::str::from_utf8(get_particular_tlv(buf, TlvType::RouterIdText as u8)?)
            .ok()?
            .parse()
            .ok()?;
        let if_ip: Ipv4Addr = std::str::from_utf8(get_particular_tlv(buf, TlvType::IfIpText as u8)?)
            .ok()?
            .parse()
            .ok()?;
        let if_index = u32_from_be(get_particular_tlv(buf, TlvType::IfIndex as u8)?)?;
        let hold_time = u32_from_be(get_particular_tlv(buf, TlvType::HoldTime as u8)?)?;
        let metric = u32_from_be(get_particular_tlv(buf, TlvType::Metric as u8)?)?;
        let neighbors_seen = iter_tlvs(buf)
            .filter(|(t, _)| *t == TlvType::NeighborSeen as u8)
            .filter_map(|(_, v)| ipv4_from_be(v))
            .collect();

        Some(Hello {
            hostname,
            router_id,
            if_ip,
            if_index,
            hold_time,
            metric,
            neighbors_seen,
        })
    }
}

/// One neighbour (IS-reach) TLV inside an LSP: the peer this node has an Up
/// adjacency with, as seen from this node's side of the link.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NeighborTlv {
    pub peer_router_id: Ipv4Addr,
    pub local_ip: Ipv4Addr,
    pub peer_ip: Ipv4Addr,
    pub metric: u32,
}

impl NeighborTlv {
    fn encode_value(&self) -> [u8; 16] {
        let mut v = [0u8; 16];
        v[0..4].copy_from_slice(&self.peer_router_id.octets());
        v[4..8].copy_from_slice(&self.local_ip.octets());
        v[8..12].copy_from_slice(&self.peer_ip.octets());
        v[12..16].copy_from_slice(&self.metric.to_be_bytes());
        v
    }

    fn decode_value(v: &[u8]) -> Option<NeighborTlv> {
        if v.len() != 16 {
            return None;
        }
        Some(NeighborTlv {
            peer_router_id: ipv4_from_be(&v[0..4])?,
            local_ip: ipv4_from_be(&v[4..8])?,
            peer_ip: ipv4_from_be(&v[8..12])?,
            metric: u32_from_be(&v[12..16])?,
        })
    }
}

/// The common part of an LSP's wire header (spec.md §6 wire table).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LspHeader {
    pub flags: LspFlags,
    pub router_id: Ipv4Addr,
    pub seq_no: u32,
}

impl Default for LspHeader {
    fn default() -> Self {
        LspHeader {
            flags: LspFlags::default(),
            router_id: Ipv4Addr::UNSPECIFIED,
            seq_no: 0,
        }
    }
}

/// A Link-State Packet: self-originated or received from a peer.
/// Ref-counting is expressed by wrapping this in `Arc` wherever it is
/// shared (self-LSP slot, LSDB entry, in-flight flood jobs) — see
/// [`crate::lsdb`].
#[derive(Clone, Debug)]
pub struct Lsp {
    pub header: LspHeader,
    pub hostname: String,
    pub neighbors: Vec<NeighborTlv>,
    pub on_demand: bool,
}

impl Lsp {
    /// Upper-bound encoded size, used by `generate_lsp` to honor spec.md
    /// §4.3's "abort if above the maximum buffer size" rule before doing
    /// any real work.
    pub fn estimated_size(&self) -> usize {
        let mut size = 2 + 1 + 4 + 4; // pkt_type + flags + router_id + seq_no
        if !self.header.flags.contains(LspFlags::PURGE) {
            size += 2 + self.hostname.len();
            size += self.neighbors.len() * (2 + 16);
            if self.on_demand {
                size += 2;
            }
        }
        size
    }

    pub fn encode(&self) -> PktBuf {
        let mut buf = BytesMut::new();
        buf.put_u16(PduType::Lsp as u16);
        buf.put_u8(self.header.flags.bits());
        buf.put_slice(&self.header.router_id.octets());
        buf.put_u32(self.header.seq_no);

        if !self.header.flags.contains(LspFlags::PURGE) {
            insert_tlv(&mut buf, TlvType::Hostname as u8, self.hostname.as_bytes());
            for nbr in &self.neighbors {
                insert_tlv(&mut buf, TlvType::IsReach as u8, &nbr.encode_value());
            }
            if self.on_demand {
                insert_tlv(&mut buf, TlvType::OnDemand as u8, &[]);
            }
        }
        freeze(buf)
    }

    pub fn decode(mut buf: &[u8]) -> Option<Lsp> {
        if buf.len() < 11 {
            return None;
        }
        let pkt_type = buf.get_u16();
        if PduType::from_u16(pkt_type) != Some(PduType::Lsp) {
            return None;
        }
        let flags = LspFlags::from_bits_truncate(buf.get_u8());
        let router_id = ipv4_from_be(&buf.copy_to_bytes(4))?;
        let seq_no = buf.get_u32();

        let header = LspHeader {
            flags,
            router_id,
            seq_no,
        };

        if flags.contains(LspFlags::PURGE) {
            return Some(Lsp {
                header,
                hostname: String::new(),
                neighbors: Vec::new(),
                on_demand: false,
            });
        }

        let hostname = get_particular_tlv(buf, TlvType::Hostname as u8)
            .and_then(|v| std::str::from_utf8(v).ok())
            .unwrap_or("")
            .to_owned();
        let neighbors = iter_tlvs(buf)
            .filter(|(t, _)| *t == TlvType::IsReach as u8)
            .filter_map(|(_, v)| NeighborTlv::decode_value(v))
            .collect();
        let on_demand = get_particular_tlv(buf, TlvType::OnDemand as u8).is_some();

        Some(Lsp {
            header,
            hostname,
            neighbors,
            on_demand,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_round_trips() {
        let hello = Hello {
            hostname: "routerA".into(),
            router_id: Ipv4Addr::new(1, 1, 1, 1),
            if_ip: Ipv4Addr::new(10, 0, 0, 1),
            if_index: 3,
            hold_time: 30,
            metric: 10,
            neighbors_seen: vec![Ipv4Addr::new(2, 2, 2, 2)],
        };
        let decoded = Hello::decode(&hello.encode()).unwrap();
        assert_eq!(decoded.hostname, "routerA");
        assert_eq!(decoded.router_id, Ipv4Addr::new(1, 1, 1, 1));
        assert_eq!(decoded.hold_time, 30);
        assert_eq!(decoded.neighbors_seen, vec![Ipv4Addr::new(2, 2, 2, 2)]);
    }

    #[test]
    fn lsp_round_trips_with_neighbors() {
        let lsp = Lsp {
            header: LspHeader {
                flags: LspFlags::OVERLOAD,
                router_id: Ipv4Addr::new(1, 1, 1, 1),
                seq_no: 7,
            },
            hostname: "routerA".into(),
            neighbors: vec![NeighborTlv {
                peer_router_id: Ipv4Addr::new(2, 2, 2, 2),
                local_ip: Ipv4Addr::new(10, 0, 0, 1),
                peer_ip: Ipv4Addr::new(10, 0, 0, 2),
                metric: 10,
            }],
            on_demand: true,
        };
        let decoded = Lsp::decode(&lsp.encode()).unwrap();
        assert_eq!(decoded.header.seq_no, 7);
        assert!(decoded.header.flags.contains(LspFlags::OVERLOAD));
        assert_eq!(decoded.neighbors.len(), 1);
        assert!(decoded.on_demand);
    }

    #[test]
    fn purge_lsp_carries_no_tlvs() {
        let lsp = Lsp {
            header: LspHeader {
                flags: LspFlags::PURGE,
                router_id: Ipv4Addr::new(1, 1, 1, 1),
                seq_no: 9,
            },
            hostname: "routerA".into(),
            neighbors: vec![],
            on_demand: false,
        };
        let encoded = lsp.encode();
        let decoded = Lsp::decode(&encoded).unwrap();
        assert!(decoded.header.flags.contains(LspFlags::PURGE));
        assert!(decoded.hostname.is_empty());
        assert!(decoded.neighbors.is_empty());
    }
}
