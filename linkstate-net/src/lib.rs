//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! Simulated network fabric and the ambient facilities ([`task`], [`job`],
//! [`tlv`], [`buffer`]) a protocol instance needs to run without a real
//! operating system underneath it: a graph of nodes and point-to-point
//! links, a layer-2 trap/dispatch facility, a timer wheel, a one-shot job
//! scheduler, and a generic TLV codec.

pub mod buffer;
pub mod error;
pub mod graph;
pub mod job;
pub mod task;
pub mod tlv;
pub mod trap;

pub use buffer::PktBuf;
pub use error::Error;
pub use graph::{Graph, Interface, InterfaceId, Link, MacAddr, Node, NodeId};
pub use trap::{TrapHandle, TrapNotification};
