//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! PDU types and wire codec (spec.md §6).

pub mod consts;
pub mod pdu;

use linkstate_net::trap::EthFrame;

use crate::packet::consts::ETHERTYPE_ISIS;

/// The L2 trap predicate this protocol registers on enable (spec.md §4.1):
/// Ethernet type = ISIS.
pub fn is_isis_frame(frame: &EthFrame) -> bool {
    frame.ethertype == ETHERTYPE_ISIS
}

/// A decoded PDU, dispatched by `pkt_type`.
#[derive(Clone, Debug)]
pub enum Pdu {
    Hello(pdu::Hello),
    Lsp(pdu::Lsp),
}

impl Pdu {
    pub fn decode(buf: &[u8]) -> Option<Pdu> {
        if buf.len() < 2 {
            return None;
        }
        match consts::PduType::from_u16(u16::from_be_bytes([buf[0], buf[1]])) {
            Some(consts::PduType::Hello) => pdu::Hello::decode(buf).map(Pdu::Hello),
            Some(consts::PduType::Lsp) => pdu::Lsp::decode(buf).map(Pdu::Lsp),
            None => None,
        }
    }
}
