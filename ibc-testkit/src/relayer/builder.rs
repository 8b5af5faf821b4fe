use ibc_app_interchain_accounts_types::port::{default_host_port_id, new_controller_port_id};
use ibc_app_interchain_accounts_types::{AccountOwner, Metadata};
use ibc_core_channel_types::channel::Order;
use ibc_core_host_types::identifiers::ConnectionId;

use crate::config::ChannelConfig;
use crate::hosts::TestHost;
use crate::relayer::error::RelayerError;
use crate::relayer::path::{Endpoint, Path, SharedHost};

/// The application a path carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    /// ICS-20 transfer: `transfer` ports on both sides, unordered.
    Transfer,
    /// ICS-27 interchain account of `owner`: the owner's controller port on
    /// side A, `icahost` on side B, ordered.
    InterchainAccount {
        owner: AccountOwner,
        conn_id_on_a: ConnectionId,
        conn_id_on_b: ConnectionId,
    },
}

impl ChannelKind {
    /// An interchain account path over the first connection of each chain.
    pub fn interchain_account(owner: AccountOwner) -> Self {
        Self::InterchainAccount {
            owner,
            conn_id_on_a: ConnectionId::new(0),
            conn_id_on_b: ConnectionId::new(0),
        }
    }

    fn channel_configs(&self) -> Result<(ChannelConfig, ChannelConfig), RelayerError> {
        match self {
            Self::Transfer => Ok((ChannelConfig::default(), ChannelConfig::default())),
            Self::InterchainAccount {
                owner,
                conn_id_on_a,
                conn_id_on_b,
            } => {
                let version =
                    Metadata::new_default(conn_id_on_a.clone(), conn_id_on_b.clone()).to_version();

                let config_a = ChannelConfig::builder()
                    .port_id(new_controller_port_id(&owner.to_string())?)
                    .ordering(Order::Ordered)
                    .version(version.clone())
                    .build();

                let config_b = ChannelConfig::builder()
                    .port_id(default_host_port_id())
                    .ordering(Order::Ordered)
                    .version(version)
                    .build();

                Ok((config_a, config_b))
            }
        }
    }
}

/// Builds a [`Path`] between two chains for a [`ChannelKind`], without
/// running any handshake.
#[derive(Debug)]
pub struct PathBuilder<A: TestHost, B: TestHost> {
    chain_a: SharedHost<A>,
    chain_b: SharedHost<B>,
}

impl<A: TestHost, B: TestHost> PathBuilder<A, B> {
    pub fn new(chain_a: SharedHost<A>, chain_b: SharedHost<B>) -> Self {
        Self { chain_a, chain_b }
    }

    pub fn build(self, kind: &ChannelKind) -> Result<Path<A, B>, RelayerError> {
        let (config_a, config_b) = kind.channel_configs()?;

        let path = Path::new(
            Endpoint::new(self.chain_a, config_a),
            Endpoint::new(self.chain_b, config_b),
        );

        path.validate()?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ibc_core_host_types::identifiers::{ChainId, PortId};
    use parking_lot::Mutex;

    use super::*;
    use crate::hosts::{ControllerHost, CounterpartyHost, HostParams};

    fn builder() -> PathBuilder<ControllerHost, CounterpartyHost> {
        PathBuilder::new(
            Arc::new(Mutex::new(ControllerHost::build(HostParams::with_chain_id(
                ChainId::new("STRIDE").unwrap(),
            )))),
            Arc::new(Mutex::new(CounterpartyHost::build(HostParams::with_chain_id(
                ChainId::new("HOST").unwrap(),
            )))),
        )
    }

    #[test]
    fn transfer_path_uses_transfer_ports() {
        let path = builder().build(&ChannelKind::Transfer).unwrap();

        for config in [&path.endpoint_a.channel_config, &path.endpoint_b.channel_config] {
            assert_eq!(config.port_id, PortId::transfer());
            assert_eq!(config.ordering, Order::Unordered);
            assert_eq!(config.version.as_str(), "ics20-1");
        }

        assert!(path.endpoint_a.client_id.is_none());
        assert!(path.endpoint_b.channel_id.is_none());
    }

    #[test]
    fn interchain_account_path_carries_metadata() {
        let owner: AccountOwner = "HOST.delegate".parse().unwrap();

        let path = builder()
            .build(&ChannelKind::interchain_account(owner))
            .unwrap();

        let config_a = &path.endpoint_a.channel_config;
        let config_b = &path.endpoint_b.channel_config;

        assert_eq!(config_a.port_id.as_str(), "icacontroller-HOST.delegate");
        assert_eq!(config_b.port_id.as_str(), "icahost");
        assert_eq!(config_a.ordering, Order::Ordered);
        assert_eq!(config_b.ordering, Order::Ordered);

        let metadata = Metadata::from_version(&config_a.version).unwrap();

        assert_eq!(metadata.version, "ics27-1");
        assert_eq!(metadata.conn_id_on_a, ConnectionId::new(0));
        assert_eq!(metadata.conn_id_on_b, ConnectionId::new(0));
        assert!(metadata.address.is_empty());
    }
}
