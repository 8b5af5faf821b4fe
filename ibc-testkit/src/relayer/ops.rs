use core::marker::PhantomData;

use ibc_core_channel_types::channel::Order;
use ibc_core_host_types::identifiers::{ChannelId, ClientId, ConnectionId, PortId};
use tracing::{debug, trace};

use crate::config::{ChannelConfig, ClientConfig, ConnectionConfig};
use crate::hosts::TestHost;
use crate::relayer::error::{HandshakeStep, RelayerError};
use crate::testapp::ibc::core::msgs::{
    MsgChannelOpenAck, MsgChannelOpenConfirm, MsgChannelOpenInit, MsgChannelOpenTry,
    MsgConnectionOpenAck, MsgConnectionOpenConfirm, MsgConnectionOpenInit, MsgConnectionOpenTry,
    MsgCreateClient, MsgUpdateClient,
};

/// Implements IBC relayer functions for a pair of [`TestHost`] implementations: `A` and `B`.
/// Note that, all the implementations are in one direction: from `A` to `B`.
/// This ensures that the variable namings are consistent with the IBC message fields,
/// leading to a less error-prone implementation.
///
/// For the functions in the opposite direction, use `TypedRelayerOps::<B, A>` instead of `TypedRelayerOps::<A, B>`.
///
/// Proofs are read at the latest sealed height of the source chain, so every
/// step expects the source chain to have committed its last write and the
/// client on the destination to have been updated past it.
#[derive(Debug, Default)]
pub struct TypedRelayerOps<A, B>(PhantomData<A>, PhantomData<B>)
where
    A: TestHost,
    B: TestHost;

impl<A, B> TypedRelayerOps<A, B>
where
    A: TestHost,
    B: TestHost,
{
    /// Creates a client on `A` with the state of `B`.
    /// Returns the client identifier on `A`.
    pub fn create_client_on_a(
        host_a: &mut A,
        host_b: &B,
        config: &ClientConfig,
    ) -> Result<ClientId, RelayerError> {
        let chain_id_a = host_a.chain_id().clone();

        let msg_for_a = MsgCreateClient {
            chain_id: host_b.chain_id().clone(),
            latest_height: host_b.latest_height(),
            latest_timestamp: host_b.latest_timestamp(),
            config: config.clone(),
        };

        host_a
            .create_client(msg_for_a)
            .map_err(|e| RelayerError::handshake_step(HandshakeStep::CreateClient, &chain_id_a, e))
    }

    /// Advances the block height on `A` until it catches up with the latest timestamp on `B`.
    ///
    /// Fails if `A` is behind and its clock never moves.
    pub fn sync_clock_on_a(host_a: &mut A, host_b: &B) -> Result<(), RelayerError> {
        if host_b.latest_timestamp() > host_a.latest_timestamp() && host_a.block_time().is_zero() {
            return Err(RelayerError::configuration(format!(
                "chain `{}` has a zero block time and cannot catch up with the clock of chain `{}`",
                host_a.chain_id(),
                host_b.chain_id()
            )));
        }

        while host_b.latest_timestamp() > host_a.latest_timestamp() {
            host_a.advance_block();
        }

        Ok(())
    }

    /// Updates the client on `A` with the latest header from `B`.
    pub fn update_client_on_a(
        host_a: &mut A,
        host_b: &B,
        client_id_on_a: &ClientId,
    ) -> Result<(), RelayerError> {
        let chain_id_a = host_a.chain_id().clone();

        let msg_for_a = MsgUpdateClient {
            client_id: client_id_on_a.clone(),
            header: host_b.latest_header(),
        };

        host_a
            .update_client(msg_for_a)
            .map_err(|e| RelayerError::handshake_step(HandshakeStep::UpdateClient, &chain_id_a, e))
    }

    /// Updates the client on `A` with the latest header from `B` after syncing the timestamps.
    ///
    /// Timestamp sync is required, as IBC doesn't allow client updates from the future beyond max clock drift.
    /// Does nothing if the client already tracks the latest height of `B`.
    pub fn update_client_on_a_with_sync(
        host_a: &mut A,
        host_b: &B,
        client_id_on_a: &ClientId,
    ) -> Result<(), RelayerError> {
        let client_height = host_a
            .ibc_store()
            .client_state(client_id_on_a)
            .map_err(|e| {
                RelayerError::handshake_step(HandshakeStep::UpdateClient, host_a.chain_id(), e)
            })?
            .latest_height;

        if client_height >= host_b.latest_height() {
            trace!(client_id = %client_id_on_a, "client already up to date");
            return Ok(());
        }

        TypedRelayerOps::<A, B>::sync_clock_on_a(host_a, host_b)?;
        TypedRelayerOps::<A, B>::update_client_on_a(host_a, host_b, client_id_on_a)
    }

    /// `A` initiates a connection with the other end on `B`.
    /// Returns the connection identifier on `A`.
    pub fn connection_open_init_on_a(
        host_a: &mut A,
        client_id_on_a: &ClientId,
        client_id_on_b: &ClientId,
        config: &ConnectionConfig,
    ) -> Result<ConnectionId, RelayerError> {
        let chain_id_a = host_a.chain_id().clone();

        let msg_for_a = MsgConnectionOpenInit {
            client_id_on_a: client_id_on_a.clone(),
            client_id_on_b: client_id_on_b.clone(),
            versions: config.versions.clone(),
            delay_period: config.delay_period,
        };

        host_a
            .conn_open_init(msg_for_a)
            .map_err(|e| RelayerError::handshake_step(HandshakeStep::ConnOpenInit, &chain_id_a, e))
    }

    /// `B` receives the connection opening attempt by `A` after `A` initiates the connection.
    /// Returns the connection identifier on `B`.
    pub fn connection_open_try_on_b(
        host_b: &mut B,
        host_a: &A,
        conn_id_on_a: &ConnectionId,
        client_id_on_a: &ClientId,
        client_id_on_b: &ClientId,
    ) -> Result<ConnectionId, RelayerError> {
        let chain_id_b = host_b.chain_id().clone();
        let step_err = |e| RelayerError::handshake_step(HandshakeStep::ConnOpenTry, &chain_id_b, e);

        let conn_end_on_a = host_a
            .ibc_store()
            .connection_end(conn_id_on_a)
            .map_err(step_err)?;

        let msg_for_b = MsgConnectionOpenTry {
            client_id_on_b: client_id_on_b.clone(),
            client_id_on_a: client_id_on_a.clone(),
            conn_id_on_a: conn_id_on_a.clone(),
            versions_on_a: conn_end_on_a.versions.clone(),
            delay_period: conn_end_on_a.delay_period,
            proof_height_on_a: host_a.latest_height(),
        };

        host_b
            .conn_open_try(msg_for_b, host_a.ibc_store())
            .map_err(step_err)
    }

    /// `A` receives `B`'s acknowledgement that `B` received the connection opening attempt by `A`.
    /// `A` starts processing the connection on its side.
    pub fn connection_open_ack_on_a(
        host_a: &mut A,
        host_b: &B,
        conn_id_on_a: &ConnectionId,
        conn_id_on_b: &ConnectionId,
    ) -> Result<(), RelayerError> {
        let chain_id_a = host_a.chain_id().clone();
        let step_err = |e| RelayerError::handshake_step(HandshakeStep::ConnOpenAck, &chain_id_a, e);

        let conn_end_on_b = host_b
            .ibc_store()
            .connection_end(conn_id_on_b)
            .map_err(step_err)?;

        let version = conn_end_on_b.versions.first().cloned().ok_or_else(|| {
            RelayerError::not_found(format!(
                "connection `{conn_id_on_b}` on chain `{}` has no version",
                host_b.chain_id()
            ))
        })?;

        let msg_for_a = MsgConnectionOpenAck {
            conn_id_on_a: conn_id_on_a.clone(),
            conn_id_on_b: conn_id_on_b.clone(),
            version,
            proof_height_on_b: host_b.latest_height(),
        };

        host_a
            .conn_open_ack(msg_for_a, host_b.ibc_store())
            .map_err(step_err)
    }

    /// `B` receives the confirmation from `A` that the connection creation was successful.
    /// `B` also starts processing the connection on its side.
    pub fn connection_open_confirm_on_b(
        host_b: &mut B,
        host_a: &A,
        conn_id_on_b: &ConnectionId,
    ) -> Result<(), RelayerError> {
        let chain_id_b = host_b.chain_id().clone();

        let msg_for_b = MsgConnectionOpenConfirm {
            conn_id_on_b: conn_id_on_b.clone(),
            proof_height_on_a: host_a.latest_height(),
        };

        host_b
            .conn_open_confirm(msg_for_b, host_a.ibc_store())
            .map_err(|e| {
                RelayerError::handshake_step(HandshakeStep::ConnOpenConfirm, &chain_id_b, e)
            })
    }

    /// `A` initiates a channel with port identifier with the other end on `B`.
    /// Returns the channel identifier of `A`.
    pub fn channel_open_init_on_a(
        host_a: &mut A,
        conn_id_on_a: &ConnectionId,
        channel_config_a: &ChannelConfig,
        port_id_on_b: &PortId,
    ) -> Result<ChannelId, RelayerError> {
        let chain_id_a = host_a.chain_id().clone();

        let msg_for_a = MsgChannelOpenInit {
            port_id_on_a: channel_config_a.port_id.clone(),
            connection_hops_on_a: vec![conn_id_on_a.clone()],
            port_id_on_b: port_id_on_b.clone(),
            ordering: channel_config_a.ordering,
            version_proposal: channel_config_a.version.clone(),
        };

        host_a
            .chan_open_init(msg_for_a)
            .map_err(|e| RelayerError::handshake_step(HandshakeStep::ChanOpenInit, &chain_id_a, e))
    }

    /// `B` receives the channel opening attempt by `A` after `A` initiates the channel.
    /// Returns the channel identifier of `B`.
    pub fn channel_open_try_on_b(
        host_b: &mut B,
        host_a: &A,
        conn_id_on_b: &ConnectionId,
        port_id_on_b: &PortId,
        ordering: Order,
        port_id_on_a: &PortId,
        chan_id_on_a: &ChannelId,
    ) -> Result<ChannelId, RelayerError> {
        let chain_id_b = host_b.chain_id().clone();
        let step_err = |e| RelayerError::handshake_step(HandshakeStep::ChanOpenTry, &chain_id_b, e);

        let chan_end_on_a = host_a
            .channel_end(port_id_on_a, chan_id_on_a)
            .map_err(step_err)?;

        let msg_for_b = MsgChannelOpenTry {
            port_id_on_b: port_id_on_b.clone(),
            connection_hops_on_b: vec![conn_id_on_b.clone()],
            port_id_on_a: port_id_on_a.clone(),
            chan_id_on_a: chan_id_on_a.clone(),
            version_supported_on_a: chan_end_on_a.version.clone(),
            ordering,
            proof_height_on_a: host_a.latest_height(),
        };

        host_b
            .chan_open_try(msg_for_b, host_a.ibc_store())
            .map_err(step_err)
    }

    /// `A` receives `B`'s acknowledgement that `B` received the channel opening attempt by `A`.
    /// `A` starts processing the channel on its side.
    pub fn channel_open_ack_on_a(
        host_a: &mut A,
        host_b: &B,
        port_id_on_a: &PortId,
        chan_id_on_a: &ChannelId,
        port_id_on_b: &PortId,
        chan_id_on_b: &ChannelId,
    ) -> Result<(), RelayerError> {
        let chain_id_a = host_a.chain_id().clone();
        let step_err = |e| RelayerError::handshake_step(HandshakeStep::ChanOpenAck, &chain_id_a, e);

        let chan_end_on_b = host_b
            .channel_end(port_id_on_b, chan_id_on_b)
            .map_err(step_err)?;

        let msg_for_a = MsgChannelOpenAck {
            port_id_on_a: port_id_on_a.clone(),
            chan_id_on_a: chan_id_on_a.clone(),
            chan_id_on_b: chan_id_on_b.clone(),
            version_on_b: chan_end_on_b.version.clone(),
            proof_height_on_b: host_b.latest_height(),
        };

        host_a
            .chan_open_ack(msg_for_a, host_b.ibc_store())
            .map_err(step_err)
    }

    /// `B` receives the confirmation from `A` that the channel creation was successful.
    /// `B` also starts processing the channel on its side.
    pub fn channel_open_confirm_on_b(
        host_b: &mut B,
        host_a: &A,
        port_id_on_b: &PortId,
        chan_id_on_b: &ChannelId,
    ) -> Result<(), RelayerError> {
        let chain_id_b = host_b.chain_id().clone();

        let msg_for_b = MsgChannelOpenConfirm {
            port_id_on_b: port_id_on_b.clone(),
            chan_id_on_b: chan_id_on_b.clone(),
            proof_height_on_a: host_a.latest_height(),
        };

        debug!(
            chain_id = %chain_id_b,
            port_id = %port_id_on_b,
            channel_id = %chan_id_on_b,
            "relaying channel open confirm"
        );

        host_b
            .chan_open_confirm(msg_for_b, host_a.ibc_store())
            .map_err(|e| {
                RelayerError::handshake_step(HandshakeStep::ChanOpenConfirm, &chain_id_b, e)
            })
    }
}
