//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! The adjacency state machine (spec.md §3, §4.2): Down → Init → Up,
//! driven by hello arrival, the hold timer, and peer-reported state.

use std::net::Ipv4Addr;
use std::time::Duration;

use linkstate_net::task::TimeoutTask;

use crate::packet::pdu::Hello;

/// Where an adjacency sits in the state machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdjacencyState {
    Down,
    Init,
    Up,
}

/// What drove a state transition, kept only for the debug trace.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdjacencyEvent {
    HelloOneWayRcvd,
    HelloTwoWayRcvd,
    HoldTimeExpired,
    InterfaceDisabled,
    SubnetMismatch,
}

/// Which counter/LSP-generation side effect a completed transition implies.
/// `Adjacency::state_change` reports this back to the interface controller
/// rather than applying it directly, since the adjacency-up counter and the
/// LSP generator both live above the per-adjacency level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdjacencyTransition {
    ToUp,
    ToDown,
}

/// An adjacency to one remote peer, owned by exactly one interface
/// (spec.md §3). Point-to-point links carry at most one.
#[derive(Debug)]
pub struct Adjacency {
    pub peer_router_id: Ipv4Addr,
    pub peer_if_ip: Ipv4Addr,
    pub peer_if_index: u32,
    pub peer_hostname: String,
    pub hold_time: Duration,
    pub state: AdjacencyState,
    pub hold_timer: Option<TimeoutTask>,
}

impl Adjacency {
    /// Creates a new adjacency in `Down`, populated from the hello that
    /// caused it to be created (spec.md §4.2: "if absent, one is created in
    /// Down and populated from the TLVs").
    pub fn new(hello: &Hello) -> Adjacency {
        Adjacency {
            peer_router_id: hello.router_id,
            peer_if_ip: hello.if_ip,
            peer_if_index: hello.if_index,
            peer_hostname: hello.hostname.clone(),
            hold_time: Duration::from_secs(hello.hold_time as u64),
            state: AdjacencyState::Down,
            hold_timer: None,
        }
    }

    /// Refreshes attributes from a subsequent hello without touching state
    /// or the hold timer (spec.md §4.2: "if present, attributes are
    /// refreshed and the hold timer restarted" — the restart is the
    /// caller's job, since it owns the timer's callback).
    pub fn refresh_from_hello(&mut self, hello: &Hello) {
        self.peer_hostname = hello.hostname.clone();
        self.peer_if_ip = hello.if_ip;
        self.hold_time = Duration::from_secs(hello.hold_time as u64);
    }

    pub fn is_up(&self) -> bool {
        self.state == AdjacencyState::Up
    }

    /// Applies a state transition, logging it, and reports whether the
    /// adjacency-up counter and LSP generation need to react. A transition
    /// to the adjacency's current state is a no-op (returns `None`).
    pub fn state_change(
        &mut self,
        new_state: AdjacencyState,
        event: AdjacencyEvent,
    ) -> Option<AdjacencyTransition> {
        if self.state == new_state {
            return None;
        }

        crate::debug::Debug::AdjacencyStateChange(self, new_state, event).log();

        let transition = match (self.state, new_state) {
            (_, AdjacencyState::Up) => Some(AdjacencyTransition::ToUp),
            (AdjacencyState::Up, _) => Some(AdjacencyTransition::ToDown),
            _ => None,
        };
        self.state = new_state;
        transition
    }

    pub fn cancel_hold_timer(&mut self) {
        self.hold_timer = None;
    }
}

impl Drop for Adjacency {
    fn drop(&mut self) {
        tracing::debug!(router_id = %self.peer_router_id, "adjacency deleted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello() -> Hello {
        Hello {
            hostname: "routerB".into(),
            router_id: Ipv4Addr::new(2, 2, 2, 2),
            if_ip: Ipv4Addr::new(10, 0, 0, 2),
            if_index: 1,
            hold_time: 30,
            metric: 10,
            neighbors_seen: vec![],
        }
    }

    #[test]
    fn new_adjacency_starts_down() {
        let adj = Adjacency::new(&hello());
        assert_eq!(adj.state, AdjacencyState::Down);
        assert_eq!(adj.peer_router_id, Ipv4Addr::new(2, 2, 2, 2));
    }

    #[test]
    fn down_to_up_reports_to_up_transition() {
        let mut adj = Adjacency::new(&hello());
        let t = adj.state_change(AdjacencyState::Init, AdjacencyEvent::HelloOneWayRcvd);
        assert_eq!(t, None);
        let t = adj.state_change(AdjacencyState::Up, AdjacencyEvent::HelloTwoWayRcvd);
        assert_eq!(t, Some(AdjacencyTransition::ToUp));
        assert!(adj.is_up());
    }

    #[test]
    fn up_to_down_reports_to_down_transition() {
        let mut adj = Adjacency::new(&hello());
        adj.state_change(AdjacencyState::Up, AdjacencyEvent::HelloTwoWayRcvd);
        let t = adj.state_change(AdjacencyState::Down, AdjacencyEvent::HoldTimeExpired);
        assert_eq!(t, Some(AdjacencyTransition::ToDown));
    }

    #[test]
    fn same_state_transition_is_a_no_op() {
        let mut adj = Adjacency::new(&hello());
        assert_eq!(
            adj.state_change(AdjacencyState::Down, AdjacencyEvent::SubnetMismatch),
            None
        );
    }
}
