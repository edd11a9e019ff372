//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! The simulated network graph: nodes, point-to-point interfaces and the
//! links that join them. Stands in for the real operating system's
//! interface table and neighbour-discovery layer.

use std::collections::HashMap;
use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::trap::{TrapNotification, TrapRegistry};

/// A 6-byte Ethernet hardware address.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub const BROADCAST: MacAddr = MacAddr([0xff; 6]);

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl std::fmt::Display for MacAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

pub type NodeId = u32;
pub type InterfaceId = u32;

/// A simulated router.
#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// Router-id / loopback address, the identity the IS-IS-like protocol
    /// advertises itself under.
    pub loopback: Ipv4Addr,
    pub interfaces: HashMap<InterfaceId, Interface>,
    pub(crate) traps: TrapRegistry,
}

/// A point-to-point interface on a node.
#[derive(Debug)]
pub struct Interface {
    pub id: InterfaceId,
    pub name: String,
    pub mac: MacAddr,
    pub ipv4: Ipv4Network,
    pub cost: u32,
    pub hello_interval: u16,
    /// The node and interface on the other end of the link, if connected.
    pub peer: Option<(NodeId, InterfaceId)>,
}

/// A point-to-point link between two interfaces on two (usually distinct)
/// nodes.
#[derive(Clone, Copy, Debug)]
pub struct Link {
    pub a: (NodeId, InterfaceId),
    pub b: (NodeId, InterfaceId),
}

/// The simulated fabric: a set of nodes wired together by point-to-point
/// links. Broadcast/LAN links are out of scope (spec.md Non-goals).
#[derive(Debug, Default)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    links: Vec<Link>,
    next_node_id: NodeId,
}

impl Graph {
    pub fn new() -> Graph {
        Graph::default()
    }

    pub fn add_node(&mut self, name: impl Into<String>, loopback: Ipv4Addr) -> NodeId {
        self.next_node_id += 1;
        let id = self.next_node_id;
        self.nodes.insert(
            id,
            Node {
                id,
                name: name.into(),
                loopback,
                interfaces: HashMap::new(),
                traps: TrapRegistry::default(),
            },
        );
        id
    }

    pub fn add_interface(
        &mut self,
        node_id: NodeId,
        if_id: InterfaceId,
        name: impl Into<String>,
        mac: MacAddr,
        ipv4: Ipv4Network,
        cost: u32,
        hello_interval: u16,
    ) -> Result<(), Error> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        node.interfaces.insert(
            if_id,
            Interface {
                id: if_id,
                name: name.into(),
                mac,
                ipv4,
                cost,
                hello_interval,
                peer: None,
            },
        );
        Ok(())
    }

    /// Connects two interfaces with a point-to-point link.
    pub fn add_link(
        &mut self,
        a: (NodeId, InterfaceId),
        b: (NodeId, InterfaceId),
    ) -> Result<(), Error> {
        self.interface_mut(a.0, a.1)?.peer = Some(b);
        self.interface_mut(b.0, b.1)?.peer = Some(a);
        self.links.push(Link { a, b });
        Ok(())
    }

    /// Breaks the link attached to the given interface. Errors if the
    /// interface has no link to break.
    pub fn remove_link(&mut self, node_id: NodeId, if_id: InterfaceId) -> Result<(), Error> {
        let (peer_node, peer_if) = self
            .interface_mut(node_id, if_id)?
            .peer
            .take()
            .ok_or(Error::InterfaceNotLinked(node_id, if_id))?;
        if let Ok(iface) = self.interface_mut(peer_node, peer_if) {
            iface.peer = None;
        }
        self.links
            .retain(|l| !(l.a == (node_id, if_id) || l.b == (node_id, if_id)));
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, Error> {
        self.nodes.get(&id).ok_or(Error::NodeNotFound(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, Error> {
        self.nodes.get_mut(&id).ok_or(Error::NodeNotFound(id))
    }

    pub fn interface(&self, node_id: NodeId, if_id: InterfaceId) -> Result<&Interface, Error> {
        self.node(node_id)?
            .interfaces
            .get(&if_id)
            .ok_or(Error::InterfaceNotFound(node_id, if_id))
    }

    pub fn interface_mut(
        &mut self,
        node_id: NodeId,
        if_id: InterfaceId,
    ) -> Result<&mut Interface, Error> {
        self.node_mut(node_id)?
            .interfaces
            .get_mut(&if_id)
            .ok_or(Error::InterfaceNotFound(node_id, if_id))
    }

    pub fn node_name(&self, node_id: NodeId) -> &str {
        self.nodes
            .get(&node_id)
            .map(|n| n.name.as_str())
            .unwrap_or("?")
    }

    pub fn node_loopback_address(&self, node_id: NodeId) -> Option<Ipv4Addr> {
        self.nodes.get(&node_id).map(|n| n.loopback)
    }

    pub fn iterate_node_interfaces(
        &self,
        node_id: NodeId,
    ) -> impl Iterator<Item = &Interface> {
        self.nodes
            .get(&node_id)
            .into_iter()
            .flat_map(|n| n.interfaces.values())
    }

    /// Registers an L2 trap on the given node.
    pub fn register_l2_trap(
        &mut self,
        node_id: NodeId,
        predicate: fn(&crate::trap::EthFrame) -> bool,
        handler: Box<dyn Fn(TrapNotification) + Send + Sync>,
    ) -> Result<crate::trap::TrapHandle, Error> {
        Ok(self.node_mut(node_id)?.traps.register(predicate, handler))
    }

    pub fn deregister_l2_trap(
        &mut self,
        node_id: NodeId,
        handle: crate::trap::TrapHandle,
    ) -> Result<(), Error> {
        self.node_mut(node_id)?.traps.deregister(handle);
        Ok(())
    }

    /// Delivers a frame sent out of `(src_node, src_if)` to whatever sits on
    /// the other end of the link, dispatching it through the receiving
    /// node's registered L2 traps. Frames sent on a disconnected interface
    /// are silently dropped, mirroring a dangling cable.
    pub fn send_frame(
        &self,
        src_node: NodeId,
        src_if: InterfaceId,
        frame: crate::trap::EthFrame,
    ) {
        let Ok(iface) = self.interface(src_node, src_if) else {
            return;
        };
        let Some((dst_node, dst_if)) = iface.peer else {
            return;
        };
        let Some(node) = self.nodes.get(&dst_node) else {
            return;
        };
        node.traps.dispatch(dst_node, dst_if, frame);
    }
}
