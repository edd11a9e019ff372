//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! Turns an [`crate::lsdb::InstallOutcome`] into wire traffic, and the
//! periodic re-flood timer (spec.md §4.5).

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use linkstate_net::graph::{Graph, InterfaceId, NodeId};
use linkstate_net::task::IntervalTask;
use linkstate_net::trap::EthFrame;
use tokio::sync::mpsc::UnboundedSender;

use crate::interface::InterfaceState;
use crate::packet::consts::ETHERTYPE_ISIS;
use crate::packet::pdu::Lsp;

/// Floods `pkt` out of every enabled interface with an Up adjacency, except
/// `except_if` (the ingress interface, when there is one). Returns the
/// interfaces it actually sent out of.
pub fn flood_pkt(
    graph: &Mutex<Graph>,
    node_id: NodeId,
    interfaces: &BTreeMap<InterfaceId, InterfaceState>,
    except_if: Option<InterfaceId>,
    pkt: &Arc<Lsp>,
) -> Vec<InterfaceId> {
    let g = graph.lock().unwrap();
    let mut sent = Vec::new();
    for (if_id, iface) in interfaces {
        if Some(*if_id) == except_if || !iface.enabled {
            continue;
        }
        if !iface.adjacency.as_ref().is_some_and(|a| a.is_up()) {
            continue;
        }
        let Ok(gi) = g.interface(node_id, *if_id) else {
            continue;
        };
        g.send_frame(
            node_id,
            *if_id,
            EthFrame {
                src: gi.mac,
                dst: linkstate_net::graph::MacAddr::BROADCAST,
                ethertype: ETHERTYPE_ISIS,
                payload: pkt.encode(),
            },
        );
        sent.push(*if_id);
    }
    sent
}

/// Replies with the stored copy of an LSP back out of a single interface,
/// used for the "reply with the newer copy" branch of the install rule
/// (spec.md §4.4). Unlike [`flood_pkt`] this doesn't require an Up
/// adjacency: it is a direct reply to whoever just sent the stale packet.
pub fn send_to_interface(
    graph: &Mutex<Graph>,
    node_id: NodeId,
    interfaces: &BTreeMap<InterfaceId, InterfaceState>,
    if_id: InterfaceId,
    pkt: &Arc<Lsp>,
) {
    let Some(iface) = interfaces.get(&if_id) else {
        return;
    };
    if !iface.enabled {
        return;
    }
    let g = graph.lock().unwrap();
    let Ok(gi) = g.interface(node_id, if_id) else {
        return;
    };
    g.send_frame(
        node_id,
        if_id,
        EthFrame {
            src: gi.mac,
            dst: linkstate_net::graph::MacAddr::BROADCAST,
            ethertype: ETHERTYPE_ISIS,
            payload: pkt.encode(),
        },
    );
}

/// Starts the periodic full-database re-flood timer (spec.md §4.5). Not
/// armed at all while on-demand flooding is enabled.
pub fn start_periodic_flood_timer(interval: Duration, tx: UnboundedSender<crate::instance::IsisEvent>) -> IntervalTask {
    IntervalTask::new(interval, false, move || {
        let tx = tx.clone();
        async move {
            let _ = tx.send(crate::instance::IsisEvent::FloodTimerFired);
        }
    })
}
