//! The host side of the interchain accounts application.

use std::collections::BTreeMap;

use ibc_app_interchain_accounts_types::port::{verify_controller_port_id_prefix, verify_host_port_id};
use ibc_app_interchain_accounts_types::Metadata;
use ibc_core_channel_types::channel::{Counterparty, Order, State as ChannelState};
use ibc_core_channel_types::Version as ChannelVersion;
use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};
use sha2::{Digest, Sha256};
use subtle_encoding::bech32;
use tracing::info;

use crate::testapp::ibc::core::error::HostError;
use crate::testapp::ibc::core::router::Module;
use crate::testapp::ibc::core::types::MockIbcStore;

const MODULE_NAME: &str = "icahost";

/// Bech32 prefix of the accounts created by the host chain.
pub const ACCOUNT_ADDRESS_PREFIX: &str = "cosmos";

/// Derives the address of the interchain account owned by `port_id_on_a`
/// over `conn_id_on_b`: the first 20 bytes of the SHA-256 of both
/// identifiers, bech32 encoded.
pub fn generate_interchain_account_address(
    conn_id_on_b: &ConnectionId,
    port_id_on_a: &PortId,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(conn_id_on_b.as_str().as_bytes());
    hasher.update(port_id_on_a.as_str().as_bytes());

    let mut hash = hasher.finalize().to_vec();
    hash.truncate(20);

    bech32::encode(ACCOUNT_ADDRESS_PREFIX, hash)
}

/// Keeps the interchain accounts created on the host chain, keyed by the host
/// connection and the controller port of their owner.
#[derive(Debug, Default)]
pub struct IcaHostModule {
    accounts: BTreeMap<(ConnectionId, PortId), String>,
    active_channels: BTreeMap<(ConnectionId, PortId), ChannelId>,
}

impl IcaHostModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interchain_account_address(
        &self,
        conn_id_on_b: &ConnectionId,
        port_id_on_a: &PortId,
    ) -> Option<&str> {
        self.accounts
            .get(&(conn_id_on_b.clone(), port_id_on_a.clone()))
            .map(String::as_str)
    }

    pub fn active_channel_id(
        &self,
        conn_id_on_b: &ConnectionId,
        port_id_on_a: &PortId,
    ) -> Option<&ChannelId> {
        self.active_channels
            .get(&(conn_id_on_b.clone(), port_id_on_a.clone()))
    }

    /// Returns the account of the owner of `port_id_on_a`, creating it on the
    /// first handshake over `conn_id_on_b`.
    fn create_interchain_account(
        &mut self,
        conn_id_on_b: &ConnectionId,
        port_id_on_a: &PortId,
    ) -> String {
        self.accounts
            .entry((conn_id_on_b.clone(), port_id_on_a.clone()))
            .or_insert_with(|| {
                let address = generate_interchain_account_address(conn_id_on_b, port_id_on_a);

                info!(%conn_id_on_b, %port_id_on_a, %address, "created interchain account");

                address
            })
            .clone()
    }
}

impl Module for IcaHostModule {
    fn on_chan_open_init(
        &mut self,
        _store: &MockIbcStore,
        _order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        _version: &ChannelVersion,
    ) -> Result<ChannelVersion, HostError> {
        Err(HostError::UnsupportedCallback {
            module: MODULE_NAME,
            callback: "on_chan_open_init",
        })
    }

    fn on_chan_open_try(
        &mut self,
        store: &MockIbcStore,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        _channel_id: &ChannelId,
        counterparty: &Counterparty,
        counterparty_version: &ChannelVersion,
    ) -> Result<ChannelVersion, HostError> {
        if order != Order::Ordered {
            return Err(HostError::InvalidOrdering {
                expected: Order::Ordered,
                actual: order,
            });
        }

        verify_host_port_id(port_id)?;
        verify_controller_port_id_prefix(&counterparty.port_id)?;

        let conn_id_on_b = &connection_hops[0];
        let conn_id_on_a = store
            .connection_end(conn_id_on_b)?
            .counterparty_connection_id()?;

        let metadata = Metadata::from_version(counterparty_version)?;

        metadata.validate(conn_id_on_a, conn_id_on_b)?;

        if let Some(active_chan_id_on_b) = self.active_channel_id(conn_id_on_b, &counterparty.port_id)
        {
            let chan_end_on_b = store.channel_end(port_id, active_chan_id_on_b)?;

            if chan_end_on_b.state == ChannelState::Open {
                return Err(HostError::ActiveChannelAlreadySet {
                    connection_id: conn_id_on_b.clone(),
                    port_id: counterparty.port_id.clone(),
                    channel_id: active_chan_id_on_b.clone(),
                });
            }

            metadata.verify_prev_metadata_matches(&Metadata::from_version(&chan_end_on_b.version)?)?;
        }

        let address = self.create_interchain_account(conn_id_on_b, &counterparty.port_id);

        Ok(metadata.with_address(address).to_version())
    }

    fn on_chan_open_ack(
        &mut self,
        _store: &MockIbcStore,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty_version: &ChannelVersion,
    ) -> Result<(), HostError> {
        Err(HostError::UnsupportedCallback {
            module: MODULE_NAME,
            callback: "on_chan_open_ack",
        })
    }

    fn on_chan_open_confirm(
        &mut self,
        store: &MockIbcStore,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), HostError> {
        let chan_end_on_b = store.channel_end(port_id, channel_id)?;

        self.active_channels.insert(
            (
                chan_end_on_b.connection_hops[0].clone(),
                chan_end_on_b.remote.port_id.clone(),
            ),
            channel_id.clone(),
        );

        Ok(())
    }
}
