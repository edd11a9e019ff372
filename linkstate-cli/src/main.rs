//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

#![warn(rust_2018_idioms)]

//! Command-line driver for a `linkstate-isis` simulation: loads a small
//! topology, lets it run for a while, then prints or pokes at one node's
//! protocol state. Stands in for the production northbound/CLI surface
//! around the upward interface (`show_protocol_state`, `show_event_counters`,
//! overload and on-demand-flooding administration) without reimplementing a
//! full daemon around it.

mod error;
mod scenario;

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use linkstate_isis::Instance;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::CliError;

#[derive(Parser)]
#[command(
    name = "linkstate",
    version,
    about = "Drives a simulated link-state IS-IS network"
)]
struct Cli {
    /// Topology description to load (JSON).
    #[arg(long, global = true, default_value = "linkstate-cli/demos/two-node.json")]
    scenario: PathBuf,

    /// Seconds to let the simulated network run before inspecting it.
    #[arg(long, global = true, default_value_t = 3)]
    settle_secs: u64,

    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// `show protocol isis [<node>]`: every node's protocol state, or just
    /// the named one.
    ShowProtocol { node: Option<String> },
    /// `show isis event-counters <node>`.
    ShowEventCounters { node: String },
    /// `isis overload` / `isis no overload` on one node.
    Overload {
        node: String,
        #[command(subcommand)]
        action: OverloadAction,
    },
    /// `isis on-demand-flooding <node> <on|off>`.
    OnDemandFlooding { node: String, on: bool },
    /// `show isis database <node> <router-id>`: one LSDB entry.
    ShowLsp { node: String, router_id: String },
    /// Simulates a cable pull: breaks the link on one named interface.
    LinkBreak { node: String, interface: String },
}

#[derive(Subcommand)]
enum OverloadAction {
    /// Sets the sticky overload flag, optionally arming the auto-clear timer.
    Set {
        #[arg(long)]
        timeout_secs: Option<u32>,
    },
    /// Clears the sticky overload flag.
    Unset,
}

fn init_tracing(log_level: &str) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(format!("linkstate={log_level}").parse().unwrap())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

fn lookup<'a>(
    instances: &'a HashMap<String, Instance>,
    name: &str,
) -> Result<&'a Instance, CliError> {
    instances
        .get(name)
        .ok_or_else(|| CliError::NodeNotInScenario(name.to_string()))
}

fn lookup_mut<'a>(
    instances: &'a mut HashMap<String, Instance>,
    name: &str,
) -> Result<&'a mut Instance, CliError> {
    instances
        .get_mut(name)
        .ok_or_else(|| CliError::NodeNotInScenario(name.to_string()))
}

/// Sleeps for `secs` in short slices, draining each instance's queued events
/// between naps. Once a scenario is built, hello/flood/job timers are real
/// tokio tasks feeding each instance's channel in the background;
/// `Instance::drain_pending` is how this single-threaded driver observes
/// their effects without running a separate task per node.
async fn settle(instances: &mut HashMap<String, Instance>, secs: u64) {
    let ticks = (secs * 10).max(1);
    for _ in 0..ticks {
        tokio::time::sleep(Duration::from_millis(100)).await;
        for instance in instances.values_mut() {
            instance.drain_pending();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let scenario = scenario::load(&cli.scenario)?;
    let (_graph, mut instances) = scenario::build(&scenario)?;

    info!(nodes = instances.len(), "scenario loaded, letting the network settle");
    settle(&mut instances, cli.settle_secs).await;

    match cli.command {
        Command::ShowProtocol { node } => match node {
            Some(name) => println!("{}", lookup(&instances, &name)?.show_protocol_state()),
            None => {
                for (name, instance) in &instances {
                    println!("--- {name} ---\n{}", instance.show_protocol_state());
                }
            }
        },
        Command::ShowEventCounters { node } => {
            for (name, count) in lookup(&instances, &node)?.show_event_counters() {
                println!("{name}: {count}");
            }
        }
        Command::Overload { node, action } => {
            {
                let instance = lookup_mut(&mut instances, &node)?;
                match action {
                    OverloadAction::Set {
                        timeout_secs: Some(secs),
                    } => {
                        instance.set_overload();
                        instance.configure_overload_timeout(secs);
                    }
                    OverloadAction::Set { timeout_secs: None } => instance.set_overload(),
                    OverloadAction::Unset => instance.unset_overload(),
                }
            }
            settle(&mut instances, 1).await;
            println!("{}", lookup(&instances, &node)?.show_protocol_state());
        }
        Command::OnDemandFlooding { node, on } => {
            lookup_mut(&mut instances, &node)?.enable_on_demand_flooding(on);
            settle(&mut instances, 1).await;
            println!("{}", lookup(&instances, &node)?.show_protocol_state());
        }
        Command::ShowLsp { node, router_id } => {
            let router_id: Ipv4Addr = router_id
                .parse()
                .map_err(|_| CliError::BadAddress(router_id.clone()))?;
            println!("{}", lookup(&instances, &node)?.show_lsp(router_id)?);
        }
        Command::LinkBreak { node, interface } => {
            let instance = lookup(&instances, &node)?;
            let if_id = instance.interface_id_named(&interface)?;
            instance
                .graph
                .lock()
                .unwrap()
                .remove_link(instance.node_id, if_id)?;
            settle(&mut instances, 1).await;
            println!("{}", lookup(&instances, &node)?.show_protocol_state());
        }
    }

    Ok(())
}
