//! A path: the pair of endpoints a relayer establishes an IBC channel between.

use std::sync::Arc;

use ibc_core_host_types::identifiers::{ChainId, ChannelId, ClientId, ConnectionId};
use parking_lot::Mutex;

use crate::config::{ChannelConfig, ClientConfig, ConnectionConfig};
use crate::hosts::TestHost;
use crate::relayer::error::RelayerError;

/// A chain shared between the paths that connect to it.
pub type SharedHost<H> = Arc<Mutex<H>>;

/// One side of a [`Path`]. The identifiers are unset until the matching
/// handshake step runs on this side, or until they are copied from another
/// path.
#[derive(Debug)]
pub struct Endpoint<H: TestHost> {
    pub chain: SharedHost<H>,
    pub chain_id: ChainId,
    pub client_id: Option<ClientId>,
    pub connection_id: Option<ConnectionId>,
    pub channel_id: Option<ChannelId>,
    pub client_config: ClientConfig,
    pub connection_config: ConnectionConfig,
    pub channel_config: ChannelConfig,
}

impl<H: TestHost> Endpoint<H> {
    pub fn new(chain: SharedHost<H>, channel_config: ChannelConfig) -> Self {
        let chain_id = chain.lock().chain_id().clone();

        Self {
            chain,
            chain_id,
            client_id: None,
            connection_id: None,
            channel_id: None,
            client_config: ClientConfig::default(),
            connection_config: ConnectionConfig::default(),
            channel_config,
        }
    }

    pub fn client_id(&self) -> Result<&ClientId, RelayerError> {
        self.client_id.as_ref().ok_or_else(|| {
            RelayerError::precondition(format!("no client on chain `{}`", self.chain_id))
        })
    }

    pub fn connection_id(&self) -> Result<&ConnectionId, RelayerError> {
        self.connection_id.as_ref().ok_or_else(|| {
            RelayerError::precondition(format!("no connection on chain `{}`", self.chain_id))
        })
    }

    pub fn channel_id(&self) -> Result<&ChannelId, RelayerError> {
        self.channel_id.as_ref().ok_or_else(|| {
            RelayerError::precondition(format!("no channel on chain `{}`", self.chain_id))
        })
    }
}

/// Two endpoints on distinct chains. Endpoint A initiates every handshake.
#[derive(Debug)]
pub struct Path<A: TestHost, B: TestHost> {
    pub endpoint_a: Endpoint<A>,
    pub endpoint_b: Endpoint<B>,
}

impl<A: TestHost, B: TestHost> Path<A, B> {
    pub fn new(endpoint_a: Endpoint<A>, endpoint_b: Endpoint<B>) -> Self {
        Self {
            endpoint_a,
            endpoint_b,
        }
    }

    pub fn validate(&self) -> Result<(), RelayerError> {
        if self.endpoint_a.chain_id == self.endpoint_b.chain_id {
            return Err(RelayerError::configuration(format!(
                "both endpoints are on chain `{}`",
                self.endpoint_a.chain_id
            )));
        }

        let ordering_a = self.endpoint_a.channel_config.ordering;
        let ordering_b = self.endpoint_b.channel_config.ordering;

        if ordering_a != ordering_b {
            return Err(RelayerError::configuration(format!(
                "endpoints disagree on channel ordering: `{ordering_a}` and `{ordering_b}`"
            )));
        }

        let block_time_a = self.endpoint_a.chain.lock().block_time();
        let block_time_b = self.endpoint_b.chain.lock().block_time();

        // a chain whose clock never moves cannot sync with one whose clock does
        if block_time_a.is_zero() != block_time_b.is_zero() {
            return Err(RelayerError::configuration(format!(
                "chains `{}` and `{}` must both have a zero or a nonzero block time, got `{block_time_a:?}` and `{block_time_b:?}`",
                self.endpoint_a.chain_id, self.endpoint_b.chain_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use ibc_core_channel_types::channel::Order;

    use super::*;
    use crate::hosts::{ControllerHost, CounterpartyHost, HostParams};

    fn shared<H: TestHost>(chain_id: &str) -> SharedHost<H> {
        Arc::new(Mutex::new(H::build(HostParams::with_chain_id(
            ChainId::new(chain_id).unwrap(),
        ))))
    }

    #[test]
    fn endpoint_ids_start_unset() {
        let endpoint = Endpoint::new(shared::<ControllerHost>("STRIDE"), ChannelConfig::default());

        assert_eq!(endpoint.chain_id.as_str(), "STRIDE");
        assert!(matches!(
            endpoint.client_id(),
            Err(RelayerError::Precondition { .. })
        ));
        assert!(endpoint.connection_id().is_err());
        assert!(endpoint.channel_id().is_err());
    }

    #[test]
    fn path_rejects_same_chain_id() {
        let path = Path::new(
            Endpoint::new(shared::<ControllerHost>("STRIDE"), ChannelConfig::default()),
            Endpoint::new(shared::<CounterpartyHost>("STRIDE"), ChannelConfig::default()),
        );

        assert!(matches!(
            path.validate(),
            Err(RelayerError::Configuration { .. })
        ));
    }

    #[test]
    fn path_rejects_mismatched_ordering() {
        let ordered = ChannelConfig::builder().ordering(Order::Ordered).build();

        let path = Path::new(
            Endpoint::new(shared::<ControllerHost>("STRIDE"), ordered),
            Endpoint::new(shared::<CounterpartyHost>("HOST"), ChannelConfig::default()),
        );

        assert!(matches!(
            path.validate(),
            Err(RelayerError::Configuration { .. })
        ));
    }

    fn frozen<H: TestHost>(chain_id: &str) -> SharedHost<H> {
        Arc::new(Mutex::new(H::build(
            HostParams::builder()
                .chain_id(ChainId::new(chain_id).unwrap())
                .block_time(Duration::ZERO)
                .build(),
        )))
    }

    #[test]
    fn path_rejects_a_single_frozen_clock() {
        let path = Path::new(
            Endpoint::new(frozen::<ControllerHost>("STRIDE"), ChannelConfig::default()),
            Endpoint::new(shared::<CounterpartyHost>("HOST"), ChannelConfig::default()),
        );

        assert!(matches!(
            path.validate(),
            Err(RelayerError::Configuration { .. })
        ));
    }

    #[test]
    fn path_accepts_two_frozen_clocks() {
        let path = Path::new(
            Endpoint::new(frozen::<ControllerHost>("STRIDE"), ChannelConfig::default()),
            Endpoint::new(frozen::<CounterpartyHost>("HOST"), ChannelConfig::default()),
        );

        assert!(path.validate().is_ok());
    }
}
