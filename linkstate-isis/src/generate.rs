//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! The edge-coalesced, one-shot LSP generator (spec.md §4.3).

use std::sync::Arc;
use std::time::Duration;

use linkstate_net::job::{self, JobHandle};
use linkstate_net::task::TimeoutTask;
use tokio::time::Instant;

use crate::events::{EventControlFlags, EventKind, MiscFlags};
use crate::instance::{Instance, IsisEvent};
use crate::packet::consts::{LspFlags, MAX_PDU_SIZE};
use crate::packet::pdu::{Lsp, LspHeader, NeighborTlv};

/// Anti-churn backoff between two LSP builds for the same node (present in
/// real IS-IS, carried here per `SPEC_FULL.md`'s ambient-stack rule). This
/// governs *how soon* the single coalesced build from a burst of triggers
/// is allowed to run; coalescing itself (governing *how many* builds run)
/// is the pending-handle check below.
pub const LSP_MIN_GEN_INTERVAL: Duration = Duration::from_secs(5);

/// The pending one-shot LSP-generation task, in whichever form it was
/// scheduled as.
pub enum PendingLspGen {
    Job(JobHandle),
    Backoff(TimeoutTask),
}

/// `schedule_lsp_generation(node, reason)` (spec.md §4.3).
pub fn schedule_lsp_generation(instance: &mut Instance, reason: EventKind) {
    if instance.state.misc_flags.contains(MiscFlags::LSP_GEN_DISABLED) {
        return;
    }
    if instance.state.shutdown_in_progress {
        instance.state.misc_flags.insert(MiscFlags::LSP_GEN_DISABLED);
    }

    instance.state.event_control_flags.insert_kind(reason);
    crate::debug::Debug::LspGenerationScheduled(reason).log();

    if instance.state.lsp_gen_pending.is_some() {
        return;
    }

    let elapsed = instance
        .state
        .last_lsp_gen
        .map(|t| t.elapsed())
        .unwrap_or(LSP_MIN_GEN_INTERVAL);

    let tx = instance.tx.clone();
    if elapsed >= LSP_MIN_GEN_INTERVAL {
        let handle = job::create_job(move || async move {
            let _ = tx.send(IsisEvent::LspGenJobFired);
        });
        instance.state.lsp_gen_pending = Some(PendingLspGen::Job(handle));
    } else {
        let remaining = LSP_MIN_GEN_INTERVAL - elapsed;
        let timer = TimeoutTask::new(remaining, move || async move {
            let _ = tx.send(IsisEvent::LspGenJobFired);
        });
        instance.state.lsp_gen_pending = Some(PendingLspGen::Backoff(timer));
    }
}

/// `generate_lsp(node)` (spec.md §4.3).
pub fn generate_lsp(instance: &mut Instance) {
    instance.state.lsp_gen_pending = None;

    let purge = instance.state.shutdown_in_progress;

    let hostname = if purge {
        String::new()
    } else {
        instance.hostname.clone()
    };

    let neighbors: Vec<NeighborTlv> = if purge {
        Vec::new()
    } else {
        instance
            .interfaces
            .values()
            .filter_map(|iface| {
                let adj = iface.adjacency.as_ref()?;
                if !adj.is_up() {
                    return None;
                }
                let g = instance.graph.lock().unwrap();
                let local_ip = g.interface(instance.node_id, iface.if_id).ok()?.ipv4.ip();
                Some(NeighborTlv {
                    peer_router_id: adj.peer_router_id,
                    local_ip,
                    peer_ip: adj.peer_if_ip,
                    metric: iface.cost,
                })
            })
            .collect()
    };

    let on_demand = !purge
        && (instance.state.reconciliation_active
            || instance
                .state
                .event_control_flags
                .contains(EventControlFlags::ADMIN_ACTION_DB_CLEAR));

    let flags = if purge {
        LspFlags::PURGE
    } else if instance.state.overload.active {
        LspFlags::OVERLOAD
    } else {
        LspFlags::empty()
    };

    let estimate = Lsp {
        header: LspHeader {
            flags,
            router_id: instance.router_id,
            seq_no: instance.state.seq_no,
        },
        hostname: hostname.clone(),
        neighbors: neighbors.clone(),
        on_demand,
    };
    if estimate.estimated_size() > MAX_PDU_SIZE {
        crate::error::Error::BufferTooLarge.log();
        return;
    }

    instance.state.seq_no += 1;
    let lsp = Lsp {
        header: LspHeader {
            flags,
            router_id: instance.router_id,
            seq_no: instance.state.seq_no,
        },
        hostname,
        neighbors,
        on_demand,
    };

    if let Some(prev) = instance.state.self_lsp.take() {
        instance.state.lsdb.mark_flood_ineligible(&prev.header.router_id);
    }

    let pkt = Arc::new(lsp);
    instance.state.self_lsp = Some(pkt.clone());
    instance
        .state
        .event_control_flags
        .remove(EventControlFlags::ADMIN_ACTION_DB_CLEAR);
    instance.state.last_lsp_gen = Some(Instant::now());

    crate::debug::Debug::LspOriginate(&pkt).log();

    let outcome = instance.state.lsdb.install(None, pkt.clone(), instance.router_id);
    instance.handle_install_outcome(outcome, pkt);
}
