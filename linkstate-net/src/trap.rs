//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! Layer-2 trap/dispatch facility: lets a protocol filter and receive
//! Ethernet frames delivered into a node, without the node needing to know
//! anything about the protocols it carries.

use crate::buffer::PktBuf;
use crate::graph::{InterfaceId, MacAddr, NodeId};

/// A simulated Ethernet frame.
#[derive(Clone, Debug)]
pub struct EthFrame {
    pub src: MacAddr,
    pub dst: MacAddr,
    pub ethertype: u16,
    pub payload: PktBuf,
}

/// Delivered to a trap's handler when its predicate accepts a frame.
pub struct TrapNotification {
    pub node: NodeId,
    pub iif: InterfaceId,
    pub pkt: PktBuf,
    pub size: usize,
    pub hdr_code: u16,
}

/// Opaque handle returned by [`crate::graph::Graph::register_l2_trap`],
/// used to deregister the trap later. Deregistering with a stale or
/// already-removed handle is a no-op.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TrapHandle(u64);

struct TrapEntry {
    handle: TrapHandle,
    predicate: fn(&EthFrame) -> bool,
    handler: Box<dyn Fn(TrapNotification) + Send + Sync>,
}

impl std::fmt::Debug for TrapEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrapEntry").field("handle", &self.handle).finish()
    }
}

/// Per-node table of registered traps.
#[derive(Debug, Default)]
pub(crate) struct TrapRegistry {
    entries: std::sync::Mutex<Vec<TrapEntry>>,
    next_handle: std::sync::atomic::AtomicU64,
}

impl TrapRegistry {
    pub(crate) fn register(
        &mut self,
        predicate: fn(&EthFrame) -> bool,
        handler: Box<dyn Fn(TrapNotification) + Send + Sync>,
    ) -> TrapHandle {
        let handle = TrapHandle(
            self.next_handle
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed),
        );
        self.entries.lock().unwrap().push(TrapEntry {
            handle,
            predicate,
            handler,
        });
        handle
    }

    pub(crate) fn deregister(&mut self, handle: TrapHandle) {
        self.entries.lock().unwrap().retain(|e| e.handle != handle);
    }

    /// Runs every registered predicate against `frame` and invokes the
    /// handlers of those that accept it.
    pub(crate) fn dispatch(&self, node: NodeId, iif: InterfaceId, frame: EthFrame) {
        let entries = self.entries.lock().unwrap();
        for entry in entries.iter() {
            if (entry.predicate)(&frame) {
                let notif = TrapNotification {
                    node,
                    iif,
                    pkt: frame.payload.clone(),
                    size: frame.payload.len(),
                    hdr_code: frame.ethertype,
                };
                (entry.handler)(notif);
            }
        }
    }
}
