//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! The reconciliation window (spec.md §4.6): a bounded interval during
//! which self-originated LSPs carry the on-demand marker so peers treat
//! this node's advertisements as provisional.

use std::time::Duration;

use linkstate_net::task::TimeoutTask;

use crate::events::EventKind;
use crate::generate;
use crate::instance::{Instance, IsisEvent};

/// Enters the reconciliation window for `duration`, (re)arming the timer if
/// one is already running.
pub fn enter(instance: &mut Instance, duration: Duration) {
    instance.state.reconciliation_active = true;

    match instance.state.reconciliation_timer.as_mut() {
        Some(timer) => timer.reset(Some(duration)),
        None => {
            let tx = instance.tx.clone();
            instance.state.reconciliation_timer = Some(TimeoutTask::new(duration, move || async move {
                let _ = tx.send(IsisEvent::ReconciliationTimerExpired);
            }));
        }
    }

    generate::schedule_lsp_generation(instance, EventKind::ReconciliationTriggered);
}

/// The reconciliation timer firing: leaves the window and regenerates
/// without the on-demand marker.
pub fn on_timer_expired(instance: &mut Instance) {
    instance.state.reconciliation_active = false;
    instance.state.reconciliation_timer = None;
    generate::schedule_lsp_generation(instance, EventKind::ReconciliationExpired);
}
