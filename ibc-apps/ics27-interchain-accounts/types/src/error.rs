//! Defines the interchain account error type

use displaydoc::Display;
use ibc_core_host_types::error::IdentifierError;
use ibc_core_host_types::identifiers::{ConnectionId, PortId};

#[derive(Debug, Display)]
pub enum InterchainAccountError {
    /// owner cannot be empty
    EmptyOwner,
    /// owner `{owner}` must be of the form `host_chain_id.account_name`
    MalformedOwner { owner: String },
    /// invalid port identifier: `{0}`
    InvalidPortId(IdentifierError),
    /// port `{port_id}` is not prefixed with `{expected_prefix}`
    InvalidControllerPortPrefix {
        port_id: PortId,
        expected_prefix: &'static str,
    },
    /// expected host port `{expected}`, got `{actual}`
    InvalidHostPort { expected: PortId, actual: PortId },
    /// malformed channel version metadata: `{description}`
    MalformedMetadata { description: String },
    /// mismatched ICS27 version: expected `{expected}`, actual `{actual}`
    MismatchedVersion { expected: String, actual: String },
    /// unsupported encoding `{encoding}`
    UnsupportedEncoding { encoding: String },
    /// unsupported transaction type `{tx_type}`
    UnsupportedTxType { tx_type: String },
    /// mismatched {side} connection id: expected `{expected}`, actual `{actual}`
    MismatchedConnectionId {
        side: &'static str,
        expected: ConnectionId,
        actual: ConnectionId,
    },
    /// interchain account address cannot be empty
    EmptyAddress,
    /// interchain account address changed from `{previous}` to `{actual}`
    MismatchedAddress { previous: String, actual: String },
}

impl From<IdentifierError> for InterchainAccountError {
    fn from(e: IdentifierError) -> Self {
        Self::InvalidPortId(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InterchainAccountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InvalidPortId(e) => Some(e),
            _ => None,
        }
    }
}
