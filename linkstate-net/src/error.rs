//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

use thiserror::Error;

use crate::graph::{InterfaceId, NodeId};

/// Errors produced by the simulated fabric.
#[derive(Debug, Error)]
pub enum Error {
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),
    #[error("interface {1:?} not found on node {0:?}")]
    InterfaceNotFound(NodeId, InterfaceId),
    #[error("interface {1:?} on node {0:?} is not attached to a link")]
    InterfaceNotLinked(NodeId, InterfaceId),
}
