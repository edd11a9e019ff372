//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! Per-interface protocol state (spec.md §3, §4.1, §4.2): enablement,
//! hello timing, traffic counters, and the single point-to-point
//! adjacency an interface can carry.

use std::net::Ipv4Addr;

use linkstate_net::graph::InterfaceId;
use linkstate_net::task::IntervalTask;

use crate::adjacency::{Adjacency, AdjacencyEvent, AdjacencyState, AdjacencyTransition};
use crate::packet::pdu::Hello;

/// How many hold intervals an advertised hold time spans. The hello
/// carries the product (`hello_interval * hold_factor`) so a peer can
/// arm its hold timer without separately configuring the factor.
pub const DEFAULT_HOLD_FACTOR: u32 = 3;

#[derive(Clone, Copy, Debug, Default)]
pub struct InterfaceStats {
    pub good_hellos: u64,
    pub bad_hellos: u64,
    pub good_lsps: u64,
}

/// Outcome of feeding a received hello through [`InterfaceState::accept_hello`].
#[derive(Debug)]
pub enum HelloOutcome {
    DroppedProtocolDisabled,
    DroppedNotSendQualified,
    DroppedBadDestination,
    DroppedSubnetMismatch {
        forced_down: Option<AdjacencyTransition>,
    },
    Accepted {
        transition: Option<AdjacencyTransition>,
    },
}

/// Protocol state attached to a graph interface while IS-IS is enabled on
/// it. Created on `enable_interface`, destroyed on `disable_interface`
/// (spec.md §3).
pub struct InterfaceState {
    pub if_id: InterfaceId,
    pub enabled: bool,
    pub hello_interval: u16,
    pub hold_factor: u32,
    pub cost: u32,
    pub stats: InterfaceStats,
    pub adjacency: Option<Adjacency>,
    pub hello_timer: Option<IntervalTask>,
}

impl InterfaceState {
    pub fn new(if_id: InterfaceId, hello_interval: u16, cost: u32) -> InterfaceState {
        InterfaceState {
            if_id,
            enabled: true,
            hello_interval,
            hold_factor: DEFAULT_HOLD_FACTOR,
            cost,
            stats: InterfaceStats::default(),
            adjacency: None,
            hello_timer: None,
        }
    }

    /// Hold time to advertise in this interface's outgoing hellos.
    pub fn hold_time_secs(&self) -> u32 {
        self.hello_interval as u32 * self.hold_factor
    }

    /// "Qualification to send/receive hellos" (spec.md §2): for a
    /// point-to-point-only simulator this reduces to simple enablement —
    /// there is no DIS/LAN eligibility to check (spec.md Non-goals).
    pub fn is_send_qualified(&self) -> bool {
        self.enabled
    }

    /// Feeds a received hello through the accept/drop rules and the
    /// adjacency state machine (spec.md §4.2).
    pub fn accept_hello(
        &mut self,
        hello: &Hello,
        dst_is_broadcast: bool,
        subnet_ok: bool,
        our_router_id: Ipv4Addr,
    ) -> HelloOutcome {
        if !self.enabled {
            self.stats.bad_hellos += 1;
            return HelloOutcome::DroppedProtocolDisabled;
        }
        if !self.is_send_qualified() {
            self.stats.bad_hellos += 1;
            return HelloOutcome::DroppedNotSendQualified;
        }
        if !dst_is_broadcast {
            self.stats.bad_hellos += 1;
            return HelloOutcome::DroppedBadDestination;
        }
        if !subnet_ok {
            self.stats.bad_hellos += 1;
            let forced_down = self.force_adjacency_down(AdjacencyEvent::SubnetMismatch);
            return HelloOutcome::DroppedSubnetMismatch { forced_down };
        }

        self.stats.good_hellos += 1;
        let two_way = hello.neighbors_seen.contains(&our_router_id);

        let transition = match self.adjacency.as_mut() {
            Some(adj) if adj.peer_router_id == hello.router_id => {
                adj.refresh_from_hello(hello);
                if two_way && adj.state == AdjacencyState::Init {
                    adj.state_change(AdjacencyState::Up, AdjacencyEvent::HelloTwoWayRcvd)
                } else {
                    None
                }
            }
            Some(adj) => {
                // A different peer now shows up on this point-to-point
                // link: the old adjacency no longer applies.
                *adj = Adjacency::new(hello);
                adj.state_change(AdjacencyState::Init, AdjacencyEvent::HelloOneWayRcvd)
            }
            None => {
                let mut adj = Adjacency::new(hello);
                let transition =
                    adj.state_change(AdjacencyState::Init, AdjacencyEvent::HelloOneWayRcvd);
                self.adjacency = Some(adj);
                transition
            }
        };

        HelloOutcome::Accepted { transition }
    }

    /// Called when this interface's hold timer fires.
    pub fn on_hold_timer_expired(&mut self) -> Option<AdjacencyTransition> {
        self.force_adjacency_down(AdjacencyEvent::HoldTimeExpired)
    }

    /// Tears the adjacency down and drops it, per spec.md §4.1's
    /// "transition each adjacency through Down and cancel its timers,
    /// then schedule LSP generation" on interface disable.
    pub fn disable(&mut self) -> Option<AdjacencyTransition> {
        self.enabled = false;
        self.hello_timer = None;
        self.force_adjacency_down(AdjacencyEvent::InterfaceDisabled)
    }

    fn force_adjacency_down(&mut self, event: AdjacencyEvent) -> Option<AdjacencyTransition> {
        let transition = self
            .adjacency
            .as_mut()
            .and_then(|adj| adj.state_change(AdjacencyState::Down, event));
        if transition.is_some() {
            self.adjacency = None;
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello(router_id: Ipv4Addr, neighbors_seen: Vec<Ipv4Addr>) -> Hello {
        Hello {
            hostname: "peer".into(),
            router_id,
            if_ip: Ipv4Addr::new(10, 0, 0, 2),
            if_index: 1,
            hold_time: 30,
            metric: 10,
            neighbors_seen,
        }
    }

    #[test]
    fn first_hello_creates_adjacency_in_init() {
        let mut iface = InterfaceState::new(1, 10, 10);
        let outcome = iface.accept_hello(
            &hello(Ipv4Addr::new(2, 2, 2, 2), vec![]),
            true,
            true,
            Ipv4Addr::new(1, 1, 1, 1),
        );
        assert!(matches!(outcome, HelloOutcome::Accepted { transition: None }));
        assert_eq!(iface.adjacency.unwrap().state, AdjacencyState::Init);
    }

    #[test]
    fn two_way_hello_promotes_to_up() {
        let mut iface = InterfaceState::new(1, 10, 10);
        iface.accept_hello(
            &hello(Ipv4Addr::new(2, 2, 2, 2), vec![]),
            true,
            true,
            Ipv4Addr::new(1, 1, 1, 1),
        );
        let outcome = iface.accept_hello(
            &hello(Ipv4Addr::new(2, 2, 2, 2), vec![Ipv4Addr::new(1, 1, 1, 1)]),
            true,
            true,
            Ipv4Addr::new(1, 1, 1, 1),
        );
        assert!(matches!(
            outcome,
            HelloOutcome::Accepted {
                transition: Some(AdjacencyTransition::ToUp)
            }
        ));
    }

    #[test]
    fn subnet_mismatch_is_dropped_and_forces_existing_adjacency_down() {
        let mut iface = InterfaceState::new(1, 10, 10);
        iface.accept_hello(
            &hello(Ipv4Addr::new(2, 2, 2, 2), vec![Ipv4Addr::new(1, 1, 1, 1)]),
            true,
            true,
            Ipv4Addr::new(1, 1, 1, 1),
        );
        iface.accept_hello(
            &hello(Ipv4Addr::new(2, 2, 2, 2), vec![Ipv4Addr::new(1, 1, 1, 1)]),
            true,
            true,
            Ipv4Addr::new(1, 1, 1, 1),
        );
        assert!(iface.adjacency.as_ref().unwrap().is_up());

        let outcome = iface.accept_hello(
            &hello(Ipv4Addr::new(2, 2, 2, 2), vec![]),
            true,
            false,
            Ipv4Addr::new(1, 1, 1, 1),
        );
        assert!(matches!(
            outcome,
            HelloOutcome::DroppedSubnetMismatch {
                forced_down: Some(AdjacencyTransition::ToDown)
            }
        ));
        assert!(iface.adjacency.is_none());
        assert_eq!(iface.stats.bad_hellos, 1);
    }

    #[test]
    fn disable_tears_adjacency_down() {
        let mut iface = InterfaceState::new(1, 10, 10);
        iface.accept_hello(
            &hello(Ipv4Addr::new(2, 2, 2, 2), vec![Ipv4Addr::new(1, 1, 1, 1)]),
            true,
            true,
            Ipv4Addr::new(1, 1, 1, 1),
        );
        let transition = iface.disable();
        assert_eq!(transition, Some(AdjacencyTransition::ToDown));
        assert!(iface.adjacency.is_none());
        assert!(!iface.enabled);
    }
}
