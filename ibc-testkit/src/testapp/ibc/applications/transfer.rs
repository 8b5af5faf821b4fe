use ibc_app_transfer_types::VERSION;
use ibc_core_channel_types::channel::{Counterparty, Order};
use ibc_core_channel_types::Version as ChannelVersion;
use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};

use crate::testapp::ibc::core::error::HostError;
use crate::testapp::ibc::core::router::Module;
use crate::testapp::ibc::core::types::MockIbcStore;

/// The ICS-20 module bound to the `transfer` port. Only the channel
/// handshake is modelled: the module accepts unordered `ics20-1` channels.
#[derive(Debug, Default)]
pub struct TransferModule;

impl TransferModule {
    pub fn new() -> Self {
        Self
    }

    fn verify_ordering(order: Order) -> Result<(), HostError> {
        if order != Order::Unordered {
            return Err(HostError::InvalidOrdering {
                expected: Order::Unordered,
                actual: order,
            });
        }

        Ok(())
    }

    fn verify_version(version: &ChannelVersion) -> Result<(), HostError> {
        let expected = ChannelVersion::new(VERSION.to_string());

        if version != &expected {
            return Err(HostError::InvalidVersion {
                expected,
                actual: version.clone(),
            });
        }

        Ok(())
    }
}

impl Module for TransferModule {
    fn on_chan_open_init(
        &mut self,
        _store: &MockIbcStore,
        order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        version: &ChannelVersion,
    ) -> Result<ChannelVersion, HostError> {
        Self::verify_ordering(order)?;

        if version.as_str().is_empty() {
            return Ok(ChannelVersion::new(VERSION.to_string()));
        }

        Self::verify_version(version)?;

        Ok(version.clone())
    }

    fn on_chan_open_try(
        &mut self,
        _store: &MockIbcStore,
        order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        counterparty_version: &ChannelVersion,
    ) -> Result<ChannelVersion, HostError> {
        Self::verify_ordering(order)?;
        Self::verify_version(counterparty_version)?;

        Ok(counterparty_version.clone())
    }

    fn on_chan_open_ack(
        &mut self,
        _store: &MockIbcStore,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        counterparty_version: &ChannelVersion,
    ) -> Result<(), HostError> {
        Self::verify_version(counterparty_version)
    }

    fn on_chan_open_confirm(
        &mut self,
        _store: &MockIbcStore,
        _port_id: &PortId,
        _channel_id: &ChannelId,
    ) -> Result<(), HostError> {
        Ok(())
    }
}
