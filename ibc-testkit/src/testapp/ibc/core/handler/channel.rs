use ibc_core_channel_types::channel::{ChannelEnd, Counterparty, Order, State as ChannelState};
use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};
use tracing::{debug, info};

use super::counterparty_block;
use crate::config::ordering_feature;
use crate::testapp::ibc::core::context::MockIbcContext;
use crate::testapp::ibc::core::error::HostError;
use crate::testapp::ibc::core::msgs::{
    MsgChannelOpenAck, MsgChannelOpenConfirm, MsgChannelOpenInit, MsgChannelOpenTry,
};
use crate::testapp::ibc::core::types::{ConnectionEnd, ConnectionState, MockBlock, MockIbcStore};

fn verify_connection_hops(connection_hops: &[ConnectionId]) -> Result<&ConnectionId, HostError> {
    match connection_hops {
        [conn_id] => Ok(conn_id),
        _ => Err(HostError::InvalidConnectionHops {
            actual: connection_hops.len(),
        }),
    }
}

fn verify_ordering_supported(
    conn_id: &ConnectionId,
    conn_end: &ConnectionEnd,
    ordering: Order,
) -> Result<(), HostError> {
    if !conn_end.versions.iter().any(|v| v.supports(ordering)) {
        return Err(HostError::FeatureNotSupported {
            connection_id: conn_id.clone(),
            feature: ordering_feature(ordering),
        });
    }

    Ok(())
}

fn verify_channel_state(
    port_id: &PortId,
    channel_id: &ChannelId,
    chan_end: &ChannelEnd,
    expected: ChannelState,
) -> Result<(), HostError> {
    if chan_end.state != expected {
        return Err(HostError::InvalidChannelState {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            expected,
            actual: chan_end.state,
        });
    }

    Ok(())
}

fn verify_channel_proof(
    block: &MockBlock,
    port_id: &PortId,
    channel_id: &ChannelId,
    expected: &ChannelEnd,
) -> Result<(), HostError> {
    let actual = block
        .channel_end(port_id, channel_id)
        .ok_or_else(|| HostError::ProofVerification {
            description: format!(
                "channel `{channel_id}` on port `{port_id}` does not exist at height `{}`",
                block.height
            ),
        })?;

    if actual != expected {
        return Err(HostError::ProofVerification {
            description: format!(
                "channel `{channel_id}` on port `{port_id}` at height `{}` is `{actual:?}`, expected `{expected:?}`",
                block.height
            ),
        });
    }

    Ok(())
}

/// Returns the open connection behind the single hop of a channel.
fn open_connection<'s>(
    store: &'s MockIbcStore,
    connection_hops: &[ConnectionId],
) -> Result<(&'s ConnectionEnd, ConnectionId), HostError> {
    let conn_id = verify_connection_hops(connection_hops)?.clone();
    let conn_end = store.connection_end(&conn_id)?;

    conn_end.verify_state_matches(&conn_id, ConnectionState::Open)?;

    Ok((conn_end, conn_id))
}

impl MockIbcContext {
    pub fn chan_open_init(&mut self, msg: MsgChannelOpenInit) -> Result<ChannelId, HostError> {
        let Self { store, router } = self;

        let conn_id_on_a = verify_connection_hops(&msg.connection_hops_on_a)?;
        let conn_end_on_a = store.connection_end(conn_id_on_a)?;

        verify_ordering_supported(conn_id_on_a, conn_end_on_a, msg.ordering)?;

        let chan_id_on_a = ChannelId::new(store.next_channel_sequence());
        let counterparty = Counterparty::new(msg.port_id_on_b, None);

        let version = router.route_mut(&msg.port_id_on_a)?.on_chan_open_init(
            store,
            msg.ordering,
            &msg.connection_hops_on_a,
            &msg.port_id_on_a,
            &chan_id_on_a,
            &counterparty,
            &msg.version_proposal,
        )?;

        let chan_end_on_a = ChannelEnd {
            state: ChannelState::Init,
            ordering: msg.ordering,
            remote: counterparty,
            connection_hops: msg.connection_hops_on_a,
            version,
        };

        let chan_id_on_a = store.store_new_channel(msg.port_id_on_a.clone(), chan_end_on_a);

        info!(
            chain_id = %store.chain_id(),
            port_id = %msg.port_id_on_a,
            channel_id = %chan_id_on_a,
            "channel open init"
        );

        Ok(chan_id_on_a)
    }

    pub fn chan_open_try(
        &mut self,
        msg: MsgChannelOpenTry,
        store_a: &MockIbcStore,
    ) -> Result<ChannelId, HostError> {
        let Self { store, router } = self;

        let (conn_end_on_b, conn_id_on_b) = open_connection(store, &msg.connection_hops_on_b)?;

        verify_ordering_supported(&conn_id_on_b, conn_end_on_b, msg.ordering)?;

        let conn_id_on_a = conn_end_on_b.counterparty_connection_id()?;

        let block_a = counterparty_block(
            store,
            &conn_end_on_b.client_id,
            &msg.proof_height_on_a,
            store_a,
        )?;

        let expected_chan_end_on_a = ChannelEnd {
            state: ChannelState::Init,
            ordering: msg.ordering,
            remote: Counterparty::new(msg.port_id_on_b.clone(), None),
            connection_hops: vec![conn_id_on_a.clone()],
            version: msg.version_supported_on_a.clone(),
        };

        verify_channel_proof(
            block_a,
            &msg.port_id_on_a,
            &msg.chan_id_on_a,
            &expected_chan_end_on_a,
        )?;

        let chan_id_on_b = ChannelId::new(store.next_channel_sequence());
        let counterparty = Counterparty::new(msg.port_id_on_a, Some(msg.chan_id_on_a));

        let version = router.route_mut(&msg.port_id_on_b)?.on_chan_open_try(
            store,
            msg.ordering,
            &msg.connection_hops_on_b,
            &msg.port_id_on_b,
            &chan_id_on_b,
            &counterparty,
            &msg.version_supported_on_a,
        )?;

        let chan_end_on_b = ChannelEnd {
            state: ChannelState::TryOpen,
            ordering: msg.ordering,
            remote: counterparty,
            connection_hops: msg.connection_hops_on_b,
            version,
        };

        let chan_id_on_b = store.store_new_channel(msg.port_id_on_b.clone(), chan_end_on_b);

        info!(
            chain_id = %store.chain_id(),
            port_id = %msg.port_id_on_b,
            channel_id = %chan_id_on_b,
            "channel open try"
        );

        Ok(chan_id_on_b)
    }

    pub fn chan_open_ack(
        &mut self,
        msg: MsgChannelOpenAck,
        store_b: &MockIbcStore,
    ) -> Result<(), HostError> {
        let Self { store, router } = self;

        let chan_end_on_a = store
            .channel_end(&msg.port_id_on_a, &msg.chan_id_on_a)?
            .clone();

        verify_channel_state(
            &msg.port_id_on_a,
            &msg.chan_id_on_a,
            &chan_end_on_a,
            ChannelState::Init,
        )?;

        let (conn_end_on_a, _) = open_connection(store, &chan_end_on_a.connection_hops)?;
        let conn_id_on_b = conn_end_on_a.counterparty_connection_id()?;

        let block_b = counterparty_block(
            store,
            &conn_end_on_a.client_id,
            &msg.proof_height_on_b,
            store_b,
        )?;

        let expected_chan_end_on_b = ChannelEnd {
            state: ChannelState::TryOpen,
            ordering: chan_end_on_a.ordering,
            remote: Counterparty::new(msg.port_id_on_a.clone(), Some(msg.chan_id_on_a.clone())),
            connection_hops: vec![conn_id_on_b.clone()],
            version: msg.version_on_b.clone(),
        };

        verify_channel_proof(
            block_b,
            &chan_end_on_a.remote.port_id,
            &msg.chan_id_on_b,
            &expected_chan_end_on_b,
        )?;

        router.route_mut(&msg.port_id_on_a)?.on_chan_open_ack(
            store,
            &msg.port_id_on_a,
            &msg.chan_id_on_a,
            &msg.version_on_b,
        )?;

        let new_chan_end_on_a = ChannelEnd {
            state: ChannelState::Open,
            remote: Counterparty::new(chan_end_on_a.remote.port_id.clone(), Some(msg.chan_id_on_b)),
            version: msg.version_on_b,
            ..chan_end_on_a
        };

        store.store_channel(
            msg.port_id_on_a.clone(),
            msg.chan_id_on_a.clone(),
            new_chan_end_on_a,
        );

        info!(
            chain_id = %store.chain_id(),
            port_id = %msg.port_id_on_a,
            channel_id = %msg.chan_id_on_a,
            "channel open ack"
        );

        Ok(())
    }

    pub fn chan_open_confirm(
        &mut self,
        msg: MsgChannelOpenConfirm,
        store_a: &MockIbcStore,
    ) -> Result<(), HostError> {
        let Self { store, router } = self;

        let chan_end_on_b = store
            .channel_end(&msg.port_id_on_b, &msg.chan_id_on_b)?
            .clone();

        verify_channel_state(
            &msg.port_id_on_b,
            &msg.chan_id_on_b,
            &chan_end_on_b,
            ChannelState::TryOpen,
        )?;

        let (conn_end_on_b, _) = open_connection(store, &chan_end_on_b.connection_hops)?;
        let conn_id_on_a = conn_end_on_b.counterparty_connection_id()?;

        let chan_id_on_a = chan_end_on_b.remote.channel_id.as_ref().ok_or_else(|| {
            HostError::ProofVerification {
                description: format!(
                    "channel `{}` on port `{}` has no counterparty channel",
                    msg.chan_id_on_b, msg.port_id_on_b
                ),
            }
        })?;

        let block_a = counterparty_block(
            store,
            &conn_end_on_b.client_id,
            &msg.proof_height_on_a,
            store_a,
        )?;

        let expected_chan_end_on_a = ChannelEnd {
            state: ChannelState::Open,
            ordering: chan_end_on_b.ordering,
            remote: Counterparty::new(msg.port_id_on_b.clone(), Some(msg.chan_id_on_b.clone())),
            connection_hops: vec![conn_id_on_a.clone()],
            version: chan_end_on_b.version.clone(),
        };

        verify_channel_proof(
            block_a,
            &chan_end_on_b.remote.port_id,
            chan_id_on_a,
            &expected_chan_end_on_a,
        )?;

        router.route_mut(&msg.port_id_on_b)?.on_chan_open_confirm(
            store,
            &msg.port_id_on_b,
            &msg.chan_id_on_b,
        )?;

        let new_chan_end_on_b = ChannelEnd {
            state: ChannelState::Open,
            ..chan_end_on_b
        };

        store.store_channel(
            msg.port_id_on_b.clone(),
            msg.chan_id_on_b.clone(),
            new_chan_end_on_b,
        );

        debug!(
            chain_id = %store.chain_id(),
            port_id = %msg.port_id_on_b,
            channel_id = %msg.chan_id_on_b,
            "channel open confirm"
        );

        Ok(())
    }
}
