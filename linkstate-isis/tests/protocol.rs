//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! End-to-end protocol scenarios, driven by hand rather than through a live
//! tokio runtime: frames and timer expiries are injected directly as
//! `IsisEvent`s, since `Instance::handle_event` is exposed exactly for this
//! (see its doc comment). `Instance::init` and `enable_interface` still
//! spawn background tasks (the flood timer, the initial LSP-gen job), but
//! nothing here ever awaits, so those tasks never get a chance to run —
//! every assertion below is driven purely by the synchronous calls made.

use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

use ipnetwork::Ipv4Network;
use linkstate_isis::events::{EventControlFlags, EventKind};
use linkstate_isis::generate;
use linkstate_isis::instance::{Instance, IsisEvent};
use linkstate_isis::overload;
use linkstate_isis::packet::consts::LspFlags;
use linkstate_isis::packet::pdu::{Hello, Lsp, LspHeader};
use linkstate_isis::Error;
use linkstate_net::graph::{Graph, MacAddr, NodeId};

fn single_node() -> Instance {
    let mut graph = Graph::new();
    let node = graph.add_node("routerA", Ipv4Addr::new(1, 1, 1, 1));
    Instance::init(Arc::new(Mutex::new(graph)), node, "routerA").unwrap()
}

/// Two nodes, A (1.1.1.1) and B (2.2.2.2), joined by one point-to-point
/// link on 10.0.0.0/24, with the protocol enabled on both interfaces.
fn two_node_graph() -> (Arc<Mutex<Graph>>, NodeId, NodeId) {
    let mut graph = Graph::new();
    let node_a = graph.add_node("routerA", Ipv4Addr::new(1, 1, 1, 1));
    let node_b = graph.add_node("routerB", Ipv4Addr::new(2, 2, 2, 2));
    graph
        .add_interface(
            node_a,
            1,
            "eth0",
            MacAddr([0, 0, 0, 0, 0, 1]),
            Ipv4Network::new(Ipv4Addr::new(10, 0, 0, 1), 24).unwrap(),
            10,
            5,
        )
        .unwrap();
    graph
        .add_interface(
            node_b,
            1,
            "eth0",
            MacAddr([0, 0, 0, 0, 0, 2]),
            Ipv4Network::new(Ipv4Addr::new(10, 0, 0, 2), 24).unwrap(),
            10,
            5,
        )
        .unwrap();
    graph.add_link((node_a, 1), (node_b, 1)).unwrap();
    (Arc::new(Mutex::new(graph)), node_a, node_b)
}

fn hello_from(instance: &Instance, if_ip: Ipv4Addr, neighbors_seen: Vec<Ipv4Addr>) -> Hello {
    Hello {
        hostname: instance.hostname.clone(),
        router_id: instance.router_id,
        if_ip,
        if_index: 1,
        hold_time: 15,
        metric: 10,
        neighbors_seen,
    }
}

/// Drives A and B through the one-way-then-two-way hello exchange that
/// brings their single adjacency Up (spec.md §4.2, scenario S1).
fn exchange_to_up(a: &mut Instance, b: &mut Instance) {
    let one_way_from_b = hello_from(b, Ipv4Addr::new(10, 0, 0, 2), vec![]);
    a.handle_event(IsisEvent::NetRxPdu {
        iif: 1,
        pkt: one_way_from_b.encode(),
    });
    let one_way_from_a = hello_from(a, Ipv4Addr::new(10, 0, 0, 1), vec![]);
    b.handle_event(IsisEvent::NetRxPdu {
        iif: 1,
        pkt: one_way_from_a.encode(),
    });

    let two_way_from_b = hello_from(b, Ipv4Addr::new(10, 0, 0, 2), vec![a.router_id]);
    a.handle_event(IsisEvent::NetRxPdu {
        iif: 1,
        pkt: two_way_from_b.encode(),
    });
    let two_way_from_a = hello_from(a, Ipv4Addr::new(10, 0, 0, 1), vec![b.router_id]);
    b.handle_event(IsisEvent::NetRxPdu {
        iif: 1,
        pkt: two_way_from_a.encode(),
    });
}

#[tokio::test]
async fn s1_two_node_adjacency_and_lsdb_sync() {
    let (graph, node_a, node_b) = two_node_graph();
    let mut a = Instance::init(graph.clone(), node_a, "routerA").unwrap();
    let mut b = Instance::init(graph.clone(), node_b, "routerB").unwrap();
    a.enable_interface(1, 5, 10).unwrap();
    b.enable_interface(1, 5, 10).unwrap();

    exchange_to_up(&mut a, &mut b);
    assert_eq!(a.state.adjacency_up_count, 1);
    assert_eq!(b.state.adjacency_up_count, 1);

    // Force the coalesced LSP build through instead of waiting on its
    // backoff timer, then let each node's own flood reach the other.
    generate::generate_lsp(&mut a);
    b.drain_pending();
    generate::generate_lsp(&mut b);
    a.drain_pending();

    assert_eq!(a.state.lsdb.len(), 2);
    assert_eq!(b.state.lsdb.len(), 2);
    assert!(a.state.lsdb.get(&Ipv4Addr::new(1, 1, 1, 1)).is_some());
    assert!(a.state.lsdb.get(&Ipv4Addr::new(2, 2, 2, 2)).is_some());
    assert!(b.state.lsdb.get(&Ipv4Addr::new(1, 1, 1, 1)).is_some());
    assert!(b.state.lsdb.get(&Ipv4Addr::new(2, 2, 2, 2)).is_some());

    let a_self = a.state.self_lsp.as_ref().unwrap();
    assert_eq!(a_self.neighbors.len(), 1);
    assert_eq!(a_self.neighbors[0].peer_router_id, Ipv4Addr::new(2, 2, 2, 2));
}

#[tokio::test]
async fn s2_link_break_clears_adjacency_and_neighbor_tlv() {
    let (graph, node_a, node_b) = two_node_graph();
    let mut a = Instance::init(graph.clone(), node_a, "routerA").unwrap();
    let mut b = Instance::init(graph.clone(), node_b, "routerB").unwrap();
    a.enable_interface(1, 5, 10).unwrap();
    b.enable_interface(1, 5, 10).unwrap();
    exchange_to_up(&mut a, &mut b);
    generate::generate_lsp(&mut a);
    generate::generate_lsp(&mut b);
    let seq_before_a = a.state.seq_no;
    let seq_before_b = b.state.seq_no;

    // The link goes silent; each side's hold timer fires independently.
    a.handle_event(IsisEvent::HoldTimerExpired { if_id: 1 });
    b.handle_event(IsisEvent::HoldTimerExpired { if_id: 1 });
    assert_eq!(a.state.adjacency_up_count, 0);
    assert_eq!(b.state.adjacency_up_count, 0);

    generate::generate_lsp(&mut a);
    generate::generate_lsp(&mut b);

    let a_self = a.state.self_lsp.as_ref().unwrap();
    let b_self = b.state.self_lsp.as_ref().unwrap();
    assert!(a_self.neighbors.is_empty());
    assert!(b_self.neighbors.is_empty());
    assert!(a.state.seq_no > seq_before_a);
    assert!(b.state.seq_no > seq_before_b);
}

#[tokio::test]
async fn s3_overload_sticky_toggles_flag_and_lsp_bit() {
    let mut a = single_node();

    a.set_overload();
    assert!(a.state.overload.active);
    assert!(a.state.overload.timer.is_none());
    generate::generate_lsp(&mut a);
    assert!(a.state.self_lsp.as_ref().unwrap().header.flags.contains(LspFlags::OVERLOAD));

    a.unset_overload();
    assert!(!a.state.overload.active);
    generate::generate_lsp(&mut a);
    assert!(!a.state.self_lsp.as_ref().unwrap().header.flags.contains(LspFlags::OVERLOAD));
}

#[tokio::test(start_paused = true)]
async fn s4_overload_timeout_case_table() {
    let mut a = single_node();
    a.set_overload();

    a.configure_overload_timeout(10);
    assert_eq!(a.state.overload.timeout_secs, Some(10));
    assert!(a.state.overload.timer.is_some());

    // Same value while running: a true no-op, not just an unchanged
    // `timeout_secs` — the deadline must not be pushed back either.
    tokio::time::advance(std::time::Duration::from_secs(3)).await;
    let remaining_before = a.state.overload.timer.as_ref().unwrap().remaining();
    a.configure_overload_timeout(10);
    assert_eq!(a.state.overload.timeout_secs, Some(10));
    // Give the timer's background task a chance to process a reschedule
    // message, if the (buggy) code sent one.
    tokio::task::yield_now().await;
    let remaining_after = a.state.overload.timer.as_ref().unwrap().remaining();
    assert_eq!(remaining_before, remaining_after);

    // Different value while running: reschedule.
    a.configure_overload_timeout(20);
    assert_eq!(a.state.overload.timeout_secs, Some(20));

    overload::on_overload_timer_expired(&mut a);
    assert!(!a.state.overload.active);
    assert!(a.state.overload.timer.is_none());
    assert_eq!(a.state.counters.get(EventKind::OverloadTimeout), 1);

    generate::generate_lsp(&mut a);
    assert!(!a.state.self_lsp.as_ref().unwrap().header.flags.contains(LspFlags::OVERLOAD));
}

#[tokio::test]
async fn s5_shutdown_purges_and_frees_state() {
    let mut a = single_node();

    let other = Lsp {
        header: LspHeader {
            flags: LspFlags::empty(),
            router_id: Ipv4Addr::new(9, 9, 9, 9),
            seq_no: 1,
        },
        hostname: "routerZ".into(),
        neighbors: vec![],
        on_demand: false,
    };
    a.handle_event(IsisEvent::NetRxPdu {
        iif: 1,
        pkt: other.encode(),
    });
    generate::generate_lsp(&mut a);
    assert_eq!(a.state.lsdb.len(), 2);

    a.shutdown().unwrap();
    assert!(a.state.shutdown_in_progress);
    assert!(matches!(a.shutdown(), Err(Error::ShutdownInProgress)));

    // Drive the final purge build by hand instead of its backoff timer.
    generate::generate_lsp(&mut a);
    assert!(!a.state.is_freed());

    // Route withdrawal normally completes through its own one-shot job.
    a.handle_event(IsisEvent::RouteWithdrawalDone);

    assert!(a.state.is_freed());
    assert!(a.state.self_lsp.is_none());
    assert!(a.state.lsdb.is_empty());
}

#[tokio::test]
async fn s6_stale_lsp_dropped_without_install() {
    let mut a = single_node();
    let router_b = Ipv4Addr::new(2, 2, 2, 2);

    let fresh = Lsp {
        header: LspHeader {
            flags: LspFlags::empty(),
            router_id: router_b,
            seq_no: 5,
        },
        hostname: "routerB".into(),
        neighbors: vec![],
        on_demand: false,
    };
    a.handle_event(IsisEvent::NetRxPdu {
        iif: 1,
        pkt: fresh.encode(),
    });

    let stale = Lsp {
        header: LspHeader {
            flags: LspFlags::empty(),
            router_id: router_b,
            seq_no: 2,
        },
        hostname: "routerB".into(),
        neighbors: vec![],
        on_demand: false,
    };
    a.handle_event(IsisEvent::NetRxPdu {
        iif: 1,
        pkt: stale.encode(),
    });

    assert_eq!(a.state.lsdb.len(), 1);
    assert_eq!(a.state.lsdb.get(&router_b).unwrap().data.header.seq_no, 5);
}

#[tokio::test]
async fn invariant_lsp_generation_coalesces_multiple_reasons() {
    let mut a = single_node();
    generate::generate_lsp(&mut a); // clear init()'s own pending build first

    generate::schedule_lsp_generation(&mut a, EventKind::AdjStateChanged);
    assert!(a.state.lsp_gen_pending.is_some());
    generate::schedule_lsp_generation(&mut a, EventKind::NbrMetricChanged);
    generate::schedule_lsp_generation(&mut a, EventKind::DeviceOverloadConfigChanged);

    assert!(a.state.event_control_flags.contains(EventControlFlags::ADJ_STATE_CHANGED));
    assert!(a.state.event_control_flags.contains(EventControlFlags::NBR_METRIC_CHANGED));
    assert!(a
        .state
        .event_control_flags
        .contains(EventControlFlags::DEVICE_OVERLOAD_CONFIG_CHANGED));
}

#[tokio::test(start_paused = true)]
async fn invariant_hold_timer_uses_the_peers_advertised_hold_time() {
    let (graph, node_a, node_b) = two_node_graph();
    let mut a = Instance::init(graph.clone(), node_a, "routerA").unwrap();
    let b = Instance::init(graph.clone(), node_b, "routerB").unwrap();
    a.enable_interface(1, 5, 10).unwrap();
    // A's own interface would advertise hold_time_secs() == 5*3 == 15; B
    // advertises a much longer value, which is what A's hold timer must
    // actually be armed for.
    let hello = hello_from(&b, Ipv4Addr::new(10, 0, 0, 2), vec![]);
    assert_eq!(hello.hold_time, 15);
    let mut long_hold_hello = hello;
    long_hold_hello.hold_time = 40;
    a.handle_event(IsisEvent::NetRxPdu {
        iif: 1,
        pkt: long_hold_hello.encode(),
    });

    let remaining = a
        .interfaces
        .get(&1)
        .unwrap()
        .adjacency
        .as_ref()
        .unwrap()
        .hold_timer
        .as_ref()
        .unwrap()
        .remaining();
    assert!(remaining > std::time::Duration::from_secs(20));
}

#[tokio::test]
async fn upward_interface_show_lsp_and_interface_lookup_by_name() {
    let mut a = single_node();
    let router_b = Ipv4Addr::new(2, 2, 2, 2);
    let lsp = Lsp {
        header: LspHeader {
            flags: LspFlags::empty(),
            router_id: router_b,
            seq_no: 7,
        },
        hostname: "routerB".into(),
        neighbors: vec![],
        on_demand: false,
    };
    a.handle_event(IsisEvent::NetRxPdu {
        iif: 1,
        pkt: lsp.encode(),
    });

    let rendered = a.show_lsp(router_b).unwrap();
    assert!(rendered.contains("seq=7"));
    assert!(matches!(
        a.show_lsp(Ipv4Addr::new(9, 9, 9, 9)),
        Err(Error::LspNotFound(_))
    ));

    assert!(matches!(
        a.interface_id_named("does-not-exist"),
        Err(Error::UnknownInterface(_))
    ));
}

#[tokio::test]
async fn link_break_disconnects_the_interface_then_errors_on_retry() {
    let (graph, node_a, node_b) = two_node_graph();
    let mut a = Instance::init(graph.clone(), node_a, "routerA").unwrap();
    let mut b = Instance::init(graph.clone(), node_b, "routerB").unwrap();
    a.enable_interface(1, 5, 10).unwrap();
    b.enable_interface(1, 5, 10).unwrap();
    exchange_to_up(&mut a, &mut b);
    assert_eq!(a.state.adjacency_up_count, 1);

    let if_id = a.interface_id_named("eth0").unwrap();
    graph.lock().unwrap().remove_link(node_a, if_id).unwrap();
    assert!(graph.lock().unwrap().interface(node_a, if_id).unwrap().peer.is_none());
    assert!(matches!(
        graph.lock().unwrap().remove_link(node_a, if_id),
        Err(linkstate_net::Error::InterfaceNotLinked(_, _))
    ));
}

#[tokio::test]
async fn invariant_on_demand_flooding_stops_periodic_and_expiry_timers() {
    let mut a = single_node();
    let router_b = Ipv4Addr::new(2, 2, 2, 2);
    let lsp = Lsp {
        header: LspHeader {
            flags: LspFlags::empty(),
            router_id: router_b,
            seq_no: 1,
        },
        hostname: "routerB".into(),
        neighbors: vec![],
        on_demand: false,
    };
    a.handle_event(IsisEvent::NetRxPdu {
        iif: 1,
        pkt: lsp.encode(),
    });
    assert!(a.state.lsdb.get(&router_b).unwrap().expiry_timer.is_some());
    assert!(a.state.flood_timer.is_some());

    a.enable_on_demand_flooding(true);
    assert!(a.state.flood_timer.is_none());
    assert!(a.state.lsdb.get(&router_b).unwrap().expiry_timer.is_none());
}
