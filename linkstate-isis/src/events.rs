//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! The closed event-kind enumeration (spec.md §3), used both as the
//! argument to [`crate::generate::schedule_lsp_generation`] and as the
//! index into [`EventCounters`], plus the three bitsets that drive the
//! edge-triggered scheduling and shutdown gating described in spec.md §5
//! and §9.

use bitflags::bitflags;

/// An event that can trigger LSP (re)generation, and that is separately
/// counted for `show isis event-counters`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EventKind {
    AdjStateChanged,
    NbrMetricChanged,
    AdminConfigChanged,
    AdminActionDbClear,
    AdminActionShutdownPending,
    DeviceOverloadConfigChanged,
    OverloadTimeout,
    ReconciliationTriggered,
    ReconciliationExpired,
    PeriodicFlood,
    /// Sentinel: never scheduled, never counted.
    None,
    /// Sentinel marking the end of the enumeration.
    Max,
}

impl EventKind {
    /// Number of real (non-sentinel) event kinds.
    pub const COUNT: usize = 10;

    const ALL: [EventKind; Self::COUNT] = [
        EventKind::AdjStateChanged,
        EventKind::NbrMetricChanged,
        EventKind::AdminConfigChanged,
        EventKind::AdminActionDbClear,
        EventKind::AdminActionShutdownPending,
        EventKind::DeviceOverloadConfigChanged,
        EventKind::OverloadTimeout,
        EventKind::ReconciliationTriggered,
        EventKind::ReconciliationExpired,
        EventKind::PeriodicFlood,
    ];

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|k| *k == self)
            .expect("index() called on a sentinel EventKind")
    }

    pub fn name(self) -> &'static str {
        match self {
            EventKind::AdjStateChanged => "adj_state_changed",
            EventKind::NbrMetricChanged => "nbr_metric_changed",
            EventKind::AdminConfigChanged => "admin_config_changed",
            EventKind::AdminActionDbClear => "admin_action_db_clear",
            EventKind::AdminActionShutdownPending => "admin_action_shutdown_pending",
            EventKind::DeviceOverloadConfigChanged => "device_overload_config_changed",
            EventKind::OverloadTimeout => "overload_timeout",
            EventKind::ReconciliationTriggered => "reconciliation_triggered",
            EventKind::ReconciliationExpired => "reconciliation_expired",
            EventKind::PeriodicFlood => "periodic_flood",
            EventKind::None => "none",
            EventKind::Max => "max",
        }
    }

    /// The [`EventControlFlags`] bit this event kind sets when used as an
    /// LSP-generation trigger reason.
    fn flag(self) -> EventControlFlags {
        match self {
            EventKind::AdjStateChanged => EventControlFlags::ADJ_STATE_CHANGED,
            EventKind::NbrMetricChanged => EventControlFlags::NBR_METRIC_CHANGED,
            EventKind::AdminConfigChanged => EventControlFlags::ADMIN_CONFIG_CHANGED,
            EventKind::AdminActionDbClear => EventControlFlags::ADMIN_ACTION_DB_CLEAR,
            EventKind::AdminActionShutdownPending => {
                EventControlFlags::ADMIN_ACTION_SHUTDOWN_PENDING
            }
            EventKind::DeviceOverloadConfigChanged => {
                EventControlFlags::DEVICE_OVERLOAD_CONFIG_CHANGED
            }
            EventKind::OverloadTimeout => EventControlFlags::OVERLOAD_TIMEOUT,
            EventKind::ReconciliationTriggered => EventControlFlags::RECONCILIATION_TRIGGERED,
            EventKind::ReconciliationExpired => EventControlFlags::RECONCILIATION_EXPIRED,
            EventKind::PeriodicFlood => EventControlFlags::PERIODIC_FLOOD,
            EventKind::None | EventKind::Max => EventControlFlags::empty(),
        }
    }
}

bitflags! {
    /// Edge-triggers accumulated since the last LSP build (spec.md §3, §9).
    /// Consumed in full and cleared whenever `generate_lsp` runs, except for
    /// `ADMIN_ACTION_DB_CLEAR`, which `generate_lsp` clears explicitly after
    /// it decides whether to set the on-demand TLV (spec.md §4.3).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct EventControlFlags: u16 {
        const ADJ_STATE_CHANGED              = 1 << 0;
        const NBR_METRIC_CHANGED             = 1 << 1;
        const ADMIN_CONFIG_CHANGED           = 1 << 2;
        const ADMIN_ACTION_DB_CLEAR          = 1 << 3;
        const ADMIN_ACTION_SHUTDOWN_PENDING  = 1 << 4;
        const DEVICE_OVERLOAD_CONFIG_CHANGED = 1 << 5;
        const OVERLOAD_TIMEOUT               = 1 << 6;
        const RECONCILIATION_TRIGGERED       = 1 << 7;
        const RECONCILIATION_EXPIRED         = 1 << 8;
        const PERIODIC_FLOOD                 = 1 << 9;
    }
}

impl EventControlFlags {
    pub fn insert_kind(&mut self, kind: EventKind) {
        self.insert(kind.flag());
    }
}

bitflags! {
    /// Miscellaneous sticky flags, orthogonal to the per-build trigger set.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct MiscFlags: u8 {
        /// Set once the final purge LSP has been scheduled during
        /// shutdown, so no further generation can be scheduled.
        const LSP_GEN_DISABLED = 1 << 0;
    }
}

bitflags! {
    /// Outstanding subtasks that must finish before shutdown's final
    /// teardown (spec.md §3, §4.7).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct ShutdownWork: u8 {
        const LSP_PURGE_PENDING = 1 << 0;
        const DEL_ROUTES_PENDING = 1 << 1;
    }
}

impl ShutdownWork {
    pub const ALL_PENDING: ShutdownWork =
        ShutdownWork::LSP_PURGE_PENDING.union(ShutdownWork::DEL_ROUTES_PENDING);
}

/// Per-node counters, one slot per non-sentinel [`EventKind`].
#[derive(Clone, Debug, Default)]
pub struct EventCounters {
    counts: [u64; EventKind::COUNT],
}

impl EventCounters {
    pub fn increment(&mut self, kind: EventKind) {
        self.counts[kind.index()] += 1;
    }

    pub fn get(&self, kind: EventKind) -> u64 {
        self.counts[kind.index()]
    }

    /// Iterates over every counted event kind together with its current
    /// value, in declaration order, for `show isis event-counters`.
    pub fn iter(&self) -> impl Iterator<Item = (EventKind, u64)> + '_ {
        EventKind::ALL.iter().map(|k| (*k, self.get(*k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_independent_per_kind() {
        let mut counters = EventCounters::default();
        counters.increment(EventKind::AdjStateChanged);
        counters.increment(EventKind::AdjStateChanged);
        counters.increment(EventKind::OverloadTimeout);

        assert_eq!(counters.get(EventKind::AdjStateChanged), 2);
        assert_eq!(counters.get(EventKind::OverloadTimeout), 1);
        assert_eq!(counters.get(EventKind::PeriodicFlood), 0);
    }

    #[test]
    fn insert_kind_sets_matching_bit() {
        let mut flags = EventControlFlags::empty();
        flags.insert_kind(EventKind::ReconciliationTriggered);
        assert!(flags.contains(EventControlFlags::RECONCILIATION_TRIGGERED));
        assert!(!flags.contains(EventControlFlags::ADJ_STATE_CHANGED));
    }
}
