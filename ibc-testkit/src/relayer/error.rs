use displaydoc::Display;
use ibc_app_interchain_accounts_types::InterchainAccountError;
use ibc_core_host_types::error::IdentifierError;
use ibc_core_host_types::identifiers::ChainId;

use crate::testapp::ibc::core::error::HostError;

/// The handshake steps a relayer drives.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum HandshakeStep {
    /// CreateClient
    CreateClient,
    /// UpdateClient
    UpdateClient,
    /// ConnOpenInit
    ConnOpenInit,
    /// ConnOpenTry
    ConnOpenTry,
    /// ConnOpenAck
    ConnOpenAck,
    /// ConnOpenConfirm
    ConnOpenConfirm,
    /// ChanOpenInit
    ChanOpenInit,
    /// ChanOpenTry
    ChanOpenTry,
    /// ChanOpenAck
    ChanOpenAck,
    /// ChanOpenConfirm
    ChanOpenConfirm,
    /// RegisterInterchainAccount
    RegisterInterchainAccount,
}

#[derive(Debug, Display)]
pub enum RelayerError {
    /// invalid configuration: `{description}`
    Configuration { description: String },
    /// `{step}` failed on chain `{chain_id}`: `{source}`
    HandshakeStep {
        step: HandshakeStep,
        chain_id: ChainId,
        source: HostError,
    },
    /// precondition not met: `{description}`
    Precondition { description: String },
    /// not found: `{description}`
    NotFound { description: String },
    /// interchain account error: `{0}`
    InterchainAccount(InterchainAccountError),
    /// identifier error: `{0}`
    Identifier(IdentifierError),
}

impl RelayerError {
    pub fn handshake_step(step: HandshakeStep, chain_id: &ChainId, source: HostError) -> Self {
        Self::HandshakeStep {
            step,
            chain_id: chain_id.clone(),
            source,
        }
    }

    pub fn precondition(description: impl Into<String>) -> Self {
        Self::Precondition {
            description: description.into(),
        }
    }

    pub fn not_found(description: impl Into<String>) -> Self {
        Self::NotFound {
            description: description.into(),
        }
    }

    pub fn configuration(description: impl Into<String>) -> Self {
        Self::Configuration {
            description: description.into(),
        }
    }
}

impl From<InterchainAccountError> for RelayerError {
    fn from(e: InterchainAccountError) -> Self {
        Self::InterchainAccount(e)
    }
}

impl From<IdentifierError> for RelayerError {
    fn from(e: IdentifierError) -> Self {
        Self::Identifier(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RelayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::HandshakeStep { source, .. } => Some(source),
            Self::InterchainAccount(e) => Some(e),
            Self::Identifier(e) => Some(e),
            _ => None,
        }
    }
}
