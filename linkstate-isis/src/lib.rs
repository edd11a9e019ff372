//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

//! A link-state routing protocol simulator in the style of IS-IS, running
//! over the simulated point-to-point fabric provided by `linkstate-net`.
//! See each module for the piece of the protocol it owns.

pub mod adjacency;
pub mod debug;
pub mod error;
pub mod events;
pub mod flooding;
pub mod generate;
pub mod instance;
pub mod interface;
pub mod lsdb;
pub mod overload;
pub mod packet;
pub mod reconciliation;
pub mod spf;

pub use error::Error;
pub use instance::{Instance, IsisEvent};
