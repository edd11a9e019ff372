//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! The LSP database and the install rule (spec.md §3, §4.4). Ordered by
//! router-id, which `Ipv4Addr`'s own `Ord` impl already gives us (octet
//! comparison is numeric comparison for an address in network order).
//!
//! This module owns the map and decides what should happen to an
//! incoming packet; it does not touch the wire or the timer wheel itself
//! — [`crate::instance`] owns the graph and the task machinery, so it
//! turns an [`InstallOutcome`] into actual flooding and timer (re)arming.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

use linkstate_net::graph::InterfaceId;
use linkstate_net::task::TimeoutTask;

use crate::packet::consts::LspFlags;
use crate::packet::pdu::Lsp;

/// One database entry: the shared packet plus its install-level
/// bookkeeping (spec.md §3 "LSP packet" attributes `installed_in_db`/
/// `flood_eligible`/expiry timer handle). These live on the entry rather
/// than on `Lsp` itself, matching the teacher's own `LspEntry` split
/// between immutable wire data and per-install mutable state.
pub struct LspDbEntry {
    pub data: Arc<Lsp>,
    pub installed_in_db: bool,
    pub flood_eligible: bool,
    pub expiry_timer: Option<TimeoutTask>,
}

/// What [`Lsdb::install`] decided, left for the caller to act on.
#[derive(Debug)]
pub enum InstallOutcome {
    /// New or strictly newer, non-purge: now in the DB, eligible for
    /// flooding and (unless on-demand-flooding is on) an expiry timer.
    Installed { except_if: Option<InterfaceId> },
    /// Equal sequence number: DB keeps its incumbent, nothing to do.
    NoOp,
    /// Strictly older than the stored copy: dropped. If `reply_out` is
    /// `Some`, the caller should re-flood the still-current stored copy
    /// back out of that interface (spec.md §4.4 third bullet).
    StaleDropped { reply_out: Option<InterfaceId> },
    /// A purge for another router's LSP: flood once, then remove.
    Purged { except_if: Option<InterfaceId> },
    /// A purge for this node's own router-id (reached via `generate_lsp`
    /// submitting its own purge to `install_lsp` during shutdown): flood
    /// once, then remove, and signal route withdrawal / shutdown
    /// progress (spec.md §4.4, §4.7).
    SelfPurged { except_if: Option<InterfaceId> },
}

#[derive(Default)]
pub struct Lsdb {
    entries: BTreeMap<Ipv4Addr, LspDbEntry>,
}

impl Lsdb {
    pub fn get(&self, router_id: &Ipv4Addr) -> Option<&LspDbEntry> {
        self.entries.get(router_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ipv4Addr, &LspDbEntry)> {
        self.entries.iter()
    }

    /// Router-ids currently eligible for periodic re-flood (spec.md §4.5).
    pub fn flood_eligible_router_ids(&self) -> Vec<Ipv4Addr> {
        self.entries
            .iter()
            .filter(|(_, e)| e.flood_eligible)
            .map(|(k, _)| *k)
            .collect()
    }

    /// Marks an entry ineligible for further periodic re-flood, used by
    /// `generate_lsp` when superseding this node's own previous self-LSP
    /// (spec.md §4.3).
    pub fn mark_flood_ineligible(&mut self, router_id: &Ipv4Addr) {
        if let Some(entry) = self.entries.get_mut(router_id) {
            entry.flood_eligible = false;
        }
    }

    pub fn set_expiry_timer(&mut self, router_id: Ipv4Addr, timer: Option<TimeoutTask>) {
        if let Some(entry) = self.entries.get_mut(&router_id) {
            entry.expiry_timer = timer;
        }
    }

    /// Stops every per-entry expiry timer at once, for the atomic mode
    /// switch into on-demand flooding (spec.md §4.5).
    pub fn stop_all_expiry_timers(&mut self) {
        for entry in self.entries.values_mut() {
            entry.expiry_timer = None;
        }
    }

    pub fn remove(&mut self, router_id: &Ipv4Addr) -> Option<LspDbEntry> {
        let entry = self.entries.remove(router_id);
        if entry.is_some() {
            crate::debug::Debug::LspExpire(*router_id).log();
        }
        entry
    }

    /// Removes an entry after it has been flooded for its single purge
    /// propagation round, without the "expired" debug trace `remove`
    /// emits (spec.md §4.4: purge removal is a distinct event from aging
    /// out).
    pub fn remove_purged(&mut self, router_id: &Ipv4Addr) -> Option<LspDbEntry> {
        let entry = self.entries.remove(router_id);
        if entry.is_some() {
            crate::debug::Debug::LspPurge(*router_id).log();
        }
        entry
    }

    /// Applies the install rule (spec.md §4.4). `iif` is the ingress
    /// interface, or `None` for a locally-generated or locally-injected
    /// packet.
    pub fn install(
        &mut self,
        iif: Option<InterfaceId>,
        pkt: Arc<Lsp>,
        own_router_id: Ipv4Addr,
    ) -> InstallOutcome {
        let router_id = pkt.header.router_id;
        let incoming_seq = pkt.header.seq_no;

        if let Some(existing) = self.entries.get(&router_id) {
            if incoming_seq == existing.data.header.seq_no {
                return InstallOutcome::NoOp;
            }
            if incoming_seq < existing.data.header.seq_no {
                crate::debug::Debug::LspStaleDrop(router_id, incoming_seq, existing.data.header.seq_no)
                    .log();
                return InstallOutcome::StaleDropped { reply_out: iif };
            }
        }

        let is_purge = pkt.header.flags.contains(LspFlags::PURGE);
        let is_self_purge = is_purge && router_id == own_router_id;

        self.entries.insert(
            router_id,
            LspDbEntry {
                data: pkt,
                installed_in_db: true,
                flood_eligible: true,
                expiry_timer: None,
            },
        );
        crate::debug::Debug::LspInstall(router_id, incoming_seq).log();

        if is_self_purge {
            InstallOutcome::SelfPurged { except_if: iif }
        } else if is_purge {
            InstallOutcome::Purged { except_if: iif }
        } else {
            InstallOutcome::Installed { except_if: iif }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::pdu::LspHeader;

    fn lsp(router_id: Ipv4Addr, seq_no: u32, flags: LspFlags) -> Arc<Lsp> {
        Arc::new(Lsp {
            header: LspHeader {
                flags,
                router_id,
                seq_no,
            },
            hostname: "r".into(),
            neighbors: vec![],
            on_demand: false,
        })
    }

    #[test]
    fn strictly_greater_installs() {
        let mut db = Lsdb::default();
        let outcome = db.install(None, lsp(Ipv4Addr::new(1, 1, 1, 1), 1, LspFlags::empty()), Ipv4Addr::new(9, 9, 9, 9));
        assert!(matches!(outcome, InstallOutcome::Installed { .. }));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn equal_sequence_is_noop() {
        let mut db = Lsdb::default();
        let router_id = Ipv4Addr::new(1, 1, 1, 1);
        db.install(None, lsp(router_id, 5, LspFlags::empty()), Ipv4Addr::new(9, 9, 9, 9));
        let outcome = db.install(None, lsp(router_id, 5, LspFlags::empty()), Ipv4Addr::new(9, 9, 9, 9));
        assert!(matches!(outcome, InstallOutcome::NoOp));
    }

    #[test]
    fn strictly_less_is_dropped_with_reply_when_iif_present() {
        let mut db = Lsdb::default();
        let router_id = Ipv4Addr::new(1, 1, 1, 1);
        db.install(None, lsp(router_id, 5, LspFlags::empty()), Ipv4Addr::new(9, 9, 9, 9));
        let outcome = db.install(Some(3), lsp(router_id, 2, LspFlags::empty()), Ipv4Addr::new(9, 9, 9, 9));
        assert!(matches!(
            outcome,
            InstallOutcome::StaleDropped { reply_out: Some(3) }
        ));
        assert_eq!(db.get(&router_id).unwrap().data.header.seq_no, 5);
    }

    #[test]
    fn non_self_purge_reports_purged() {
        let mut db = Lsdb::default();
        let router_id = Ipv4Addr::new(1, 1, 1, 1);
        db.install(None, lsp(router_id, 5, LspFlags::empty()), Ipv4Addr::new(9, 9, 9, 9));
        let outcome = db.install(None, lsp(router_id, 6, LspFlags::PURGE), Ipv4Addr::new(9, 9, 9, 9));
        assert!(matches!(outcome, InstallOutcome::Purged { .. }));
    }

    #[test]
    fn self_purge_is_distinguished() {
        let mut db = Lsdb::default();
        let own = Ipv4Addr::new(9, 9, 9, 9);
        db.install(None, lsp(own, 5, LspFlags::empty()), own);
        let outcome = db.install(None, lsp(own, 6, LspFlags::PURGE), own);
        assert!(matches!(outcome, InstallOutcome::SelfPurged { .. }));
    }
}
