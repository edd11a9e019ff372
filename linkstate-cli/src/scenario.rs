//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! Loads a small JSON topology description and wires it into a
//! [`Graph`] plus one [`Instance`] per node, the way a real router's
//! startup config turns into in-memory interface and protocol state.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use ipnetwork::Ipv4Network;
use linkstate_isis::Instance;
use linkstate_net::graph::{Graph, InterfaceId, MacAddr, NodeId};
use serde::Deserialize;

use crate::error::CliError;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

#[derive(Debug, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub router_id: Ipv4Addr,
    #[serde(default)]
    pub interfaces: Vec<InterfaceSpec>,
}

#[derive(Debug, Deserialize)]
pub struct InterfaceSpec {
    pub id: InterfaceId,
    pub name: String,
    pub mac: MacAddr,
    /// An IPv4 network in CIDR notation, e.g. `"10.0.0.1/24"`.
    pub ipv4: String,
    #[serde(default = "default_cost")]
    pub cost: u32,
    #[serde(default = "default_hello_interval")]
    pub hello_interval: u16,
}

fn default_cost() -> u32 {
    10
}

fn default_hello_interval() -> u16 {
    5
}

#[derive(Debug, Deserialize)]
pub struct LinkSpec {
    pub a: (String, InterfaceId),
    pub b: (String, InterfaceId),
}

pub fn load(path: &Path) -> Result<Scenario, CliError> {
    let text =
        std::fs::read_to_string(path).map_err(|e| CliError::Io(path.display().to_string(), e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Builds the simulated fabric and one protocol instance per node, enabling
/// every interface the scenario lists for it. Instances come back keyed by
/// the name the scenario gave the node, so subcommands can look one up by
/// that name.
pub fn build(
    scenario: &Scenario,
) -> Result<(Arc<Mutex<Graph>>, HashMap<String, Instance>), CliError> {
    let mut graph = Graph::new();
    let mut ids: HashMap<String, NodeId> = HashMap::new();

    for node in &scenario.nodes {
        let node_id = graph.add_node(&node.name, node.router_id);
        for iface in &node.interfaces {
            let ipv4: Ipv4Network = iface
                .ipv4
                .parse()
                .map_err(|_| CliError::BadAddress(iface.ipv4.clone()))?;
            graph.add_interface(
                node_id,
                iface.id,
                &iface.name,
                iface.mac,
                ipv4,
                iface.cost,
                iface.hello_interval,
            )?;
        }
        ids.insert(node.name.clone(), node_id);
    }

    for link in &scenario.links {
        let a_id = *ids
            .get(&link.a.0)
            .ok_or_else(|| CliError::UnknownNode(link.a.0.clone()))?;
        let b_id = *ids
            .get(&link.b.0)
            .ok_or_else(|| CliError::UnknownNode(link.b.0.clone()))?;
        graph.add_link((a_id, link.a.1), (b_id, link.b.1))?;
    }

    let graph = Arc::new(Mutex::new(graph));

    let mut instances = HashMap::new();
    for node in &scenario.nodes {
        let node_id = ids[&node.name];
        let mut instance = Instance::init(graph.clone(), node_id, node.name.clone())?;
        for iface in &node.interfaces {
            instance.enable_interface(iface.id, iface.hello_interval, iface.cost)?;
        }
        instances.insert(node.name.clone(), instance);
    }

    Ok((graph, instances))
}
