//! The controller side of the interchain accounts application.

use std::collections::BTreeMap;

use ibc_app_interchain_accounts_types::port::{
    default_host_port_id, verify_controller_port_id_prefix,
};
use ibc_app_interchain_accounts_types::{InterchainAccountError, Metadata};
use ibc_core_channel_types::channel::{Counterparty, Order, State as ChannelState};
use ibc_core_channel_types::Version as ChannelVersion;
use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};
use tracing::info;

use crate::testapp::ibc::core::error::HostError;
use crate::testapp::ibc::core::router::Module;
use crate::testapp::ibc::core::types::MockIbcStore;

const MODULE_NAME: &str = "icacontroller";

/// Keeps the interchain accounts registered by the controller chain, keyed by
/// the connection and the controller port of their owner.
#[derive(Debug, Default)]
pub struct IcaControllerModule {
    addresses: BTreeMap<(ConnectionId, PortId), String>,
    active_channels: BTreeMap<(ConnectionId, PortId), ChannelId>,
}

impl IcaControllerModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interchain_account_address(
        &self,
        conn_id_on_a: &ConnectionId,
        port_id_on_a: &PortId,
    ) -> Option<&str> {
        self.addresses
            .get(&(conn_id_on_a.clone(), port_id_on_a.clone()))
            .map(String::as_str)
    }

    pub fn active_channel_id(
        &self,
        conn_id_on_a: &ConnectionId,
        port_id_on_a: &PortId,
    ) -> Option<&ChannelId> {
        self.active_channels
            .get(&(conn_id_on_a.clone(), port_id_on_a.clone()))
    }

    /// Overwrites the active channel of the given connection and port.
    pub fn set_active_channel_id(
        &mut self,
        conn_id_on_a: ConnectionId,
        port_id_on_a: PortId,
        chan_id_on_a: ChannelId,
    ) {
        self.active_channels
            .insert((conn_id_on_a, port_id_on_a), chan_id_on_a);
    }

    /// Fails if an open channel is already active for the given connection
    /// and port. Returns the metadata of the active channel, if any.
    pub fn verify_no_open_active_channel(
        &self,
        store: &MockIbcStore,
        conn_id_on_a: &ConnectionId,
        port_id_on_a: &PortId,
    ) -> Result<Option<Metadata>, HostError> {
        let Some(active_chan_id_on_a) = self.active_channel_id(conn_id_on_a, port_id_on_a) else {
            return Ok(None);
        };

        let chan_end_on_a = store.channel_end(port_id_on_a, active_chan_id_on_a)?;

        if chan_end_on_a.state == ChannelState::Open {
            return Err(HostError::ActiveChannelAlreadySet {
                connection_id: conn_id_on_a.clone(),
                port_id: port_id_on_a.clone(),
                channel_id: active_chan_id_on_a.clone(),
            });
        }

        Ok(Some(Metadata::from_version(&chan_end_on_a.version)?))
    }
}

impl Module for IcaControllerModule {
    fn on_chan_open_init(
        &mut self,
        store: &MockIbcStore,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        _channel_id: &ChannelId,
        counterparty: &Counterparty,
        version: &ChannelVersion,
    ) -> Result<ChannelVersion, HostError> {
        if order != Order::Ordered {
            return Err(HostError::InvalidOrdering {
                expected: Order::Ordered,
                actual: order,
            });
        }

        verify_controller_port_id_prefix(port_id)?;

        let port_id_on_b = default_host_port_id();

        if counterparty.port_id != port_id_on_b {
            return Err(InterchainAccountError::InvalidHostPort {
                expected: port_id_on_b,
                actual: counterparty.port_id.clone(),
            }
            .into());
        }

        let conn_id_on_a = &connection_hops[0];
        let conn_id_on_b = store
            .connection_end(conn_id_on_a)?
            .counterparty_connection_id()?
            .clone();

        let metadata = if version.as_str().is_empty() {
            Metadata::new_default(conn_id_on_a.clone(), conn_id_on_b.clone())
        } else {
            Metadata::from_version(version)?
        };

        metadata.validate(conn_id_on_a, &conn_id_on_b)?;

        if let Some(prev_metadata) =
            self.verify_no_open_active_channel(store, conn_id_on_a, port_id)?
        {
            metadata.verify_prev_metadata_matches(&prev_metadata)?;
        }

        Ok(metadata.to_version())
    }

    fn on_chan_open_try(
        &mut self,
        _store: &MockIbcStore,
        _order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        _counterparty_version: &ChannelVersion,
    ) -> Result<ChannelVersion, HostError> {
        Err(HostError::UnsupportedCallback {
            module: MODULE_NAME,
            callback: "on_chan_open_try",
        })
    }

    fn on_chan_open_ack(
        &mut self,
        store: &MockIbcStore,
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty_version: &ChannelVersion,
    ) -> Result<(), HostError> {
        verify_controller_port_id_prefix(port_id)?;

        let metadata = Metadata::from_version(counterparty_version)?;

        if metadata.address.is_empty() {
            return Err(InterchainAccountError::EmptyAddress.into());
        }

        if let Some(active_chan_id_on_a) = self.active_channel_id(&metadata.conn_id_on_a, port_id) {
            return Err(HostError::ActiveChannelAlreadySet {
                connection_id: metadata.conn_id_on_a.clone(),
                port_id: port_id.clone(),
                channel_id: active_chan_id_on_a.clone(),
            });
        }

        let chan_end_on_a = store.channel_end(port_id, channel_id)?;

        if chan_end_on_a.state != ChannelState::Init {
            return Err(HostError::InvalidChannelState {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
                expected: ChannelState::Init,
                actual: chan_end_on_a.state,
            });
        }

        let conn_id_on_a = &chan_end_on_a.connection_hops[0];
        let conn_id_on_b = store
            .connection_end(conn_id_on_a)?
            .counterparty_connection_id()?;

        metadata.validate(conn_id_on_a, conn_id_on_b)?;

        info!(
            %port_id,
            %channel_id,
            address = %metadata.address,
            "interchain account opened on controller"
        );

        self.set_active_channel_id(
            metadata.conn_id_on_a.clone(),
            port_id.clone(),
            channel_id.clone(),
        );
        self.addresses
            .insert((metadata.conn_id_on_a, port_id.clone()), metadata.address);

        Ok(())
    }

    fn on_chan_open_confirm(
        &mut self,
        _store: &MockIbcStore,
        _port_id: &PortId,
        _channel_id: &ChannelId,
    ) -> Result<(), HostError> {
        Err(HostError::UnsupportedCallback {
            module: MODULE_NAME,
            callback: "on_chan_open_confirm",
        })
    }
}
