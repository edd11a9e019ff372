//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! The SPF trigger interface (spec.md §4.6, Non-goals): scheduling and
//! coalescing are in scope; the shortest-path computation itself is not —
//! callers plug in their own [`SpfTrigger`].

use crate::instance::{Instance, IsisEvent};
use crate::lsdb::Lsdb;
use linkstate_net::job;
use std::net::Ipv4Addr;

/// Runs against the current link-state database whenever SPF fires. The
/// computation itself — building a shortest-path tree and a forwarding
/// table from the database's contents — is out of scope here; this trait
/// only exists so a caller can plug one in without this crate depending on
/// it.
pub trait SpfTrigger: Send + Sync {
    fn run_spf(&self, lsdb: &Lsdb, own_router_id: Ipv4Addr);
}

/// The default trigger: does nothing. Used until a caller installs a real
/// one via [`Instance::set_spf_trigger`](crate::instance::Instance::set_spf_trigger).
pub struct NoopSpfTrigger;

impl SpfTrigger for NoopSpfTrigger {
    fn run_spf(&self, _lsdb: &Lsdb, _own_router_id: Ipv4Addr) {}
}

/// Schedules an SPF run, coalescing with any already-pending one.
pub fn schedule_spf(instance: &mut Instance) {
    if instance.state.spf_job.is_some() {
        return;
    }
    let tx = instance.tx.clone();
    instance.state.spf_job = Some(job::create_job(move || async move {
        let _ = tx.send(IsisEvent::SpfJobFired);
    }));
}

/// Cancels a pending SPF run, if any.
pub fn cancel_spf_job(instance: &mut Instance) {
    if let Some(handle) = instance.state.spf_job.take() {
        job::cancel_job(&handle);
    }
}

/// The SPF job firing: runs the installed trigger and counts the run.
pub fn run_spf(instance: &mut Instance) {
    instance.state.spf_job = None;
    instance.state.spf_run_count += 1;
    instance
        .spf_trigger
        .run_spf(&instance.state.lsdb, instance.router_id);
}
