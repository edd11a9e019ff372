//
// Copyright (c) The Linkstate Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use tracing::warn;

/// Errors surfaced to callers of the upward (CLI/observability) interface.
/// Nothing from the data path ever produces one of these: malformed or
/// rejected packets are swallowed and counted (spec.md §7), never
/// propagated as an `Error`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IS-IS is not enabled on this node")]
    ProtocolNotEnabled,
    #[error("interface {0} is unknown to this instance")]
    UnknownInterface(String),
    #[error("LSP buffer would exceed the maximum PDU size")]
    BufferTooLarge,
    #[error("shutdown already in progress")]
    ShutdownInProgress,
    #[error("IS-IS is already shut down")]
    AlreadyShut,
    #[error("router-id {0} not found in the link-state database")]
    LspNotFound(Ipv4Addr),
    #[error(transparent)]
    Net(#[from] linkstate_net::Error),
}

impl Error {
    /// Logs a concise, user-facing diagnostic. CLI commands print `self`
    /// directly (spec.md §7); this is for the internal trace.
    pub fn log(&self) {
        warn!("{}", self);
    }
}
