//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("malformed scenario file: {0}")]
    Scenario(#[from] serde_json::Error),
    #[error("unknown node {0:?} referenced by a link")]
    UnknownNode(String),
    #[error("invalid IPv4 address {0:?}")]
    BadAddress(String),
    #[error("node {0:?} is not in this scenario")]
    NodeNotInScenario(String),
    #[error(transparent)]
    Net(#[from] linkstate_net::Error),
    #[error(transparent)]
    Isis(#[from] linkstate_isis::Error),
}
