//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! Overload-bit administration (spec.md §4.6): the sticky `OVERLOAD` flag
//! and the separate `OVERLOAD_TIMEOUT` countdown that clears it on its own.

use std::time::Duration;

use linkstate_net::task::TimeoutTask;

use crate::events::EventKind;
use crate::generate;
use crate::instance::{Instance, IsisEvent};

/// Whether this node's self-originated LSPs currently carry `OVERLOAD`, and
/// the optional auto-clear timer layered on top of it.
#[derive(Default)]
pub struct OverloadState {
    pub active: bool,
    pub timer: Option<TimeoutTask>,
    pub timeout_secs: Option<u32>,
}

/// `OVERLOAD` (sticky): sets the flag. A no-op if it was already set.
pub fn set_sticky(instance: &mut Instance) {
    if instance.state.overload.active {
        return;
    }
    instance.state.overload.active = true;
    generate::schedule_lsp_generation(instance, EventKind::DeviceOverloadConfigChanged);
}

/// `OVERLOAD` (sticky): clears the flag. A no-op if it was already clear.
/// Does not touch the `OVERLOAD_TIMEOUT` timer — the two are independent
/// knobs on the same bit.
pub fn unset_sticky(instance: &mut Instance) {
    if !instance.state.overload.active {
        return;
    }
    instance.state.overload.active = false;
    generate::schedule_lsp_generation(instance, EventKind::DeviceOverloadConfigChanged);
}

/// `OVERLOAD_TIMEOUT <value>` (spec.md §4.6 case table): `value_secs == 0`
/// stops a running timer (a no-op if none is running); a nonzero value
/// starts a fresh timer if none is running, or reschedules the running one
/// to the new value. Re-issuing the value already in effect is a no-op —
/// it must not push a running timer's deadline back. The timer never
/// itself sets the overload flag — that is `set_sticky`'s job — it only
/// ever clears it, on expiry.
pub fn configure_timeout(instance: &mut Instance, value_secs: u32) {
    if value_secs == 0 {
        instance.state.overload.timer = None;
        instance.state.overload.timeout_secs = None;
        return;
    }

    if instance.state.overload.timer.is_some()
        && instance.state.overload.timeout_secs == Some(value_secs)
    {
        return;
    }

    instance.state.overload.timeout_secs = Some(value_secs);
    let duration = Duration::from_secs(value_secs as u64);

    if let Some(timer) = instance.state.overload.timer.as_mut() {
        timer.reset(Some(duration));
        return;
    }

    let tx = instance.tx.clone();
    instance.state.overload.timer = Some(TimeoutTask::new(duration, move || async move {
        let _ = tx.send(IsisEvent::OverloadTimerExpired);
    }));
}

/// The `OVERLOAD_TIMEOUT` timer firing: clears the flag and drops the
/// timer handle, regardless of how the flag got set.
pub fn on_overload_timer_expired(instance: &mut Instance) {
    instance.state.overload.timer = None;
    instance.state.overload.timeout_secs = None;
    instance.state.counters.increment(EventKind::OverloadTimeout);
    if instance.state.overload.active {
        instance.state.overload.active = false;
        generate::schedule_lsp_generation(instance, EventKind::OverloadTimeout);
    }
}
