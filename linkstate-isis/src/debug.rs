//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use tracing::{debug, debug_span};

use crate::adjacency::{Adjacency, AdjacencyEvent, AdjacencyState};
use crate::events::EventKind;
use crate::packet::pdu::Lsp;

/// Debug/trace messages, rendered through `tracing` at debug level. Kept as
/// a closed enum (rather than ad-hoc `debug!()` calls scattered through the
/// modules) so each call site states its payload once and the formatting
/// lives in one place, matching the teacher's `debug.rs` convention.
#[derive(Debug)]
pub enum Debug<'a> {
    InstanceStart,
    InstanceStop,
    InterfaceEnable(&'a str),
    InterfaceDisable(&'a str),
    AdjacencyCreate(Ipv4Addr),
    AdjacencyStateChange(&'a Adjacency, AdjacencyState, AdjacencyEvent),
    LspGenerationScheduled(EventKind),
    LspOriginate(&'a Lsp),
    LspInstall(Ipv4Addr, u32),
    LspPurge(Ipv4Addr),
    LspExpire(Ipv4Addr),
    LspStaleDrop(Ipv4Addr, u32, u32),
    ShutdownBegin,
    ShutdownComplete,
}

impl Debug<'_> {
    pub fn log(&self) {
        match self {
            Debug::InstanceStart => debug!("IS-IS instance starting"),
            Debug::InstanceStop => debug!("IS-IS instance stopping"),
            Debug::InterfaceEnable(name) => {
                debug_span!("interface", %name).in_scope(|| {
                    debug!("IS-IS enabled on interface");
                })
            }
            Debug::InterfaceDisable(name) => {
                debug_span!("interface", %name).in_scope(|| {
                    debug!("IS-IS disabled on interface");
                })
            }
            Debug::AdjacencyCreate(router_id) => {
                debug!(%router_id, "adjacency created");
            }
            Debug::AdjacencyStateChange(adj, new_state, event) => {
                debug_span!("adjacency", router_id = %adj.peer_router_id)
                    .in_scope(|| {
                        debug!(
                            from = ?adj.state,
                            to = ?new_state,
                            ?event,
                            "adjacency state change"
                        );
                    })
            }
            Debug::LspGenerationScheduled(reason) => {
                debug!(?reason, "LSP generation scheduled");
            }
            Debug::LspOriginate(lsp) => {
                debug!(
                    router_id = %lsp.header.router_id,
                    seq_no = lsp.header.seq_no,
                    purge = lsp.header.flags.contains(crate::packet::consts::LspFlags::PURGE),
                    "LSP originated"
                );
            }
            Debug::LspInstall(router_id, seq_no) => {
                debug!(%router_id, seq_no, "LSP installed");
            }
            Debug::LspPurge(router_id) => {
                debug!(%router_id, "LSP purged from database");
            }
            Debug::LspExpire(router_id) => {
                debug!(%router_id, "LSP expired out of database");
            }
            Debug::LspStaleDrop(router_id, incoming, stored) => {
                debug!(%router_id, incoming, stored, "stale LSP dropped");
            }
            Debug::ShutdownBegin => debug!("shutdown sequence started"),
            Debug::ShutdownComplete => debug!("shutdown complete, instance freed"),
        }
    }
}
