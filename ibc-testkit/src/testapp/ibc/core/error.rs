//! Defines the error type raised by the mock IBC store and its handlers

use core::time::Duration;

use displaydoc::Display;
use ibc_app_interchain_accounts_types::InterchainAccountError;
use ibc_core_channel_types::channel::{Order, State as ChannelState};
use ibc_core_channel_types::Version as ChannelVersion;
use ibc_core_client_types::Height;
use ibc_core_host_types::error::IdentifierError;
use ibc_core_host_types::identifiers::{ChannelId, ClientId, ConnectionId, PortId};

use crate::testapp::ibc::core::types::ConnectionState;

#[derive(Debug, Display)]
pub enum HostError {
    /// client `{client_id}` not found
    ClientNotFound { client_id: ClientId },
    /// connection `{connection_id}` not found
    ConnectionNotFound { connection_id: ConnectionId },
    /// channel `{channel_id}` on port `{port_id}` not found
    ChannelNotFound {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// no block at height `{height}`
    MissingBlock { height: Height },
    /// invalid client configuration: `{description}`
    InvalidClientConfig { description: String },
    /// client `{client_id}` is already at height `{client_height}`, header height `{header_height}`
    StaleHeader {
        client_id: ClientId,
        client_height: Height,
        header_height: Height,
    },
    /// header for client `{client_id}` is `{drift:?}` ahead of the host clock
    HeaderInFuture { client_id: ClientId, drift: Duration },
    /// client `{client_id}` expired: no update for `{elapsed:?}`
    ClientExpired {
        client_id: ClientId,
        elapsed: Duration,
    },
    /// client `{client_id}` at height `{client_height}` cannot verify proofs at height `{proof_height}`
    InsufficientClientHeight {
        client_id: ClientId,
        client_height: Height,
        proof_height: Height,
    },
    /// client `{client_id}` tracks chain `{expected}`, proof comes from `{actual}`
    MismatchedCounterpartyChain {
        client_id: ClientId,
        expected: String,
        actual: String,
    },
    /// proof verification failed: `{description}`
    ProofVerification { description: String },
    /// connection `{connection_id}` is in state `{actual}`, expected `{expected}`
    InvalidConnectionState {
        connection_id: ConnectionId,
        expected: ConnectionState,
        actual: ConnectionState,
    },
    /// no connection version in common with the counterparty
    NoCommonVersion,
    /// connection version `{version}` was not proposed
    UnproposedVersion { version: String },
    /// connection `{connection_id}` does not support `{feature}` channels
    FeatureNotSupported {
        connection_id: ConnectionId,
        feature: &'static str,
    },
    /// expected exactly one connection hop, got `{actual}`
    InvalidConnectionHops { actual: usize },
    /// channel `{channel_id}` on port `{port_id}` is in state `{actual}`, expected `{expected}`
    InvalidChannelState {
        port_id: PortId,
        channel_id: ChannelId,
        expected: ChannelState,
        actual: ChannelState,
    },
    /// invalid channel ordering: expected `{expected}`, actual `{actual}`
    InvalidOrdering { expected: Order, actual: Order },
    /// invalid channel version: expected `{expected}`, actual `{actual}`
    InvalidVersion {
        expected: ChannelVersion,
        actual: ChannelVersion,
    },
    /// no module bound to port `{port_id}`
    RouteNotFound { port_id: PortId },
    /// module `{module}` does not handle `{callback}`
    UnsupportedCallback {
        module: &'static str,
        callback: &'static str,
    },
    /// channel `{channel_id}` is already active for connection `{connection_id}` and port `{port_id}`
    ActiveChannelAlreadySet {
        connection_id: ConnectionId,
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// interchain account error: `{0}`
    InterchainAccount(InterchainAccountError),
    /// identifier error: `{0}`
    Identifier(IdentifierError),
}

impl From<InterchainAccountError> for HostError {
    fn from(e: InterchainAccountError) -> Self {
        Self::InterchainAccount(e)
    }
}

impl From<IdentifierError> for HostError {
    fn from(e: IdentifierError) -> Self {
        Self::Identifier(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InterchainAccount(e) => Some(e),
            Self::Identifier(e) => Some(e),
            _ => None,
        }
    }
}
