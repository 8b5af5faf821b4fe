use ibc_core_host_types::identifiers::ConnectionId;
use tracing::debug;

use super::counterparty_block;
use crate::config::ConnectionVersion;
use crate::testapp::ibc::core::context::MockIbcContext;
use crate::testapp::ibc::core::error::HostError;
use crate::testapp::ibc::core::msgs::{
    MsgConnectionOpenAck, MsgConnectionOpenConfirm, MsgConnectionOpenInit, MsgConnectionOpenTry,
};
use crate::testapp::ibc::core::types::{
    ConnectionCounterparty, ConnectionEnd, ConnectionState, MockBlock, MockIbcStore,
};

/// Picks the first of the host's supported versions that the counterparty
/// also proposed, keeping only the features both sides support.
fn pick_version(
    supported: &[ConnectionVersion],
    proposed: &[ConnectionVersion],
) -> Result<ConnectionVersion, HostError> {
    supported
        .iter()
        .find_map(|own| {
            let other = proposed.iter().find(|v| v.identifier == own.identifier)?;

            let features: Vec<String> = own
                .features
                .iter()
                .filter(|f| other.features.contains(f))
                .cloned()
                .collect();

            (!features.is_empty()).then(|| ConnectionVersion {
                identifier: own.identifier.clone(),
                features,
            })
        })
        .ok_or(HostError::NoCommonVersion)
}

fn verify_connection_proof(
    block: &MockBlock,
    connection_id: &ConnectionId,
    expected: &ConnectionEnd,
) -> Result<(), HostError> {
    let actual = block
        .connection_end(connection_id)
        .ok_or_else(|| HostError::ProofVerification {
            description: format!(
                "connection `{connection_id}` does not exist at height `{}`",
                block.height
            ),
        })?;

    if actual != expected {
        return Err(HostError::ProofVerification {
            description: format!(
                "connection `{connection_id}` at height `{}` is `{actual:?}`, expected `{expected:?}`",
                block.height
            ),
        });
    }

    Ok(())
}

impl MockIbcContext {
    pub fn conn_open_init(
        &mut self,
        msg: MsgConnectionOpenInit,
    ) -> Result<ConnectionId, HostError> {
        self.store.client_state(&msg.client_id_on_a)?;

        let versions = if msg.versions.is_empty() {
            vec![ConnectionVersion::default()]
        } else {
            msg.versions
        };

        let conn_id_on_a = self.store.store_new_connection(ConnectionEnd {
            state: ConnectionState::Init,
            client_id: msg.client_id_on_a,
            counterparty: ConnectionCounterparty {
                client_id: msg.client_id_on_b,
                connection_id: None,
            },
            versions,
            delay_period: msg.delay_period,
        });

        debug!(chain_id = %self.store.chain_id(), %conn_id_on_a, "connection open init");

        Ok(conn_id_on_a)
    }

    pub fn conn_open_try(
        &mut self,
        msg: MsgConnectionOpenTry,
        store_a: &MockIbcStore,
    ) -> Result<ConnectionId, HostError> {
        let block_a = counterparty_block(
            &self.store,
            &msg.client_id_on_b,
            &msg.proof_height_on_a,
            store_a,
        )?;

        let expected_conn_end_on_a = ConnectionEnd {
            state: ConnectionState::Init,
            client_id: msg.client_id_on_a.clone(),
            counterparty: ConnectionCounterparty {
                client_id: msg.client_id_on_b.clone(),
                connection_id: None,
            },
            versions: msg.versions_on_a.clone(),
            delay_period: msg.delay_period,
        };

        verify_connection_proof(block_a, &msg.conn_id_on_a, &expected_conn_end_on_a)?;

        let version = pick_version(&[ConnectionVersion::default()], &msg.versions_on_a)?;

        let conn_id_on_b = self.store.store_new_connection(ConnectionEnd {
            state: ConnectionState::TryOpen,
            client_id: msg.client_id_on_b,
            counterparty: ConnectionCounterparty {
                client_id: msg.client_id_on_a,
                connection_id: Some(msg.conn_id_on_a),
            },
            versions: vec![version],
            delay_period: msg.delay_period,
        });

        debug!(chain_id = %self.store.chain_id(), %conn_id_on_b, "connection open try");

        Ok(conn_id_on_b)
    }

    pub fn conn_open_ack(
        &mut self,
        msg: MsgConnectionOpenAck,
        store_b: &MockIbcStore,
    ) -> Result<(), HostError> {
        let conn_end_on_a = self.store.connection_end(&msg.conn_id_on_a)?.clone();

        conn_end_on_a.verify_state_matches(&msg.conn_id_on_a, ConnectionState::Init)?;

        let proposed = conn_end_on_a.versions.iter().any(|v| {
            v.identifier == msg.version.identifier
                && msg.version.features.iter().all(|f| v.features.contains(f))
        });

        if !proposed {
            return Err(HostError::UnproposedVersion {
                version: msg.version.identifier,
            });
        }

        let block_b = counterparty_block(
            &self.store,
            &conn_end_on_a.client_id,
            &msg.proof_height_on_b,
            store_b,
        )?;

        let expected_conn_end_on_b = ConnectionEnd {
            state: ConnectionState::TryOpen,
            client_id: conn_end_on_a.counterparty.client_id.clone(),
            counterparty: ConnectionCounterparty {
                client_id: conn_end_on_a.client_id.clone(),
                connection_id: Some(msg.conn_id_on_a.clone()),
            },
            versions: vec![msg.version.clone()],
            delay_period: conn_end_on_a.delay_period,
        };

        verify_connection_proof(block_b, &msg.conn_id_on_b, &expected_conn_end_on_b)?;

        let new_conn_end_on_a = ConnectionEnd {
            state: ConnectionState::Open,
            counterparty: ConnectionCounterparty {
                client_id: conn_end_on_a.counterparty.client_id,
                connection_id: Some(msg.conn_id_on_b),
            },
            versions: vec![msg.version],
            ..conn_end_on_a
        };

        self.store
            .store_connection(msg.conn_id_on_a.clone(), new_conn_end_on_a);

        debug!(
            chain_id = %self.store.chain_id(),
            conn_id_on_a = %msg.conn_id_on_a,
            "connection open ack"
        );

        Ok(())
    }

    pub fn conn_open_confirm(
        &mut self,
        msg: MsgConnectionOpenConfirm,
        store_a: &MockIbcStore,
    ) -> Result<(), HostError> {
        let conn_end_on_b = self.store.connection_end(&msg.conn_id_on_b)?.clone();

        conn_end_on_b.verify_state_matches(&msg.conn_id_on_b, ConnectionState::TryOpen)?;

        let conn_id_on_a = conn_end_on_b.counterparty_connection_id()?;

        let block_a = counterparty_block(
            &self.store,
            &conn_end_on_b.client_id,
            &msg.proof_height_on_a,
            store_a,
        )?;

        let expected_conn_end_on_a = ConnectionEnd {
            state: ConnectionState::Open,
            client_id: conn_end_on_b.counterparty.client_id.clone(),
            counterparty: ConnectionCounterparty {
                client_id: conn_end_on_b.client_id.clone(),
                connection_id: Some(msg.conn_id_on_b.clone()),
            },
            versions: conn_end_on_b.versions.clone(),
            delay_period: conn_end_on_b.delay_period,
        };

        verify_connection_proof(block_a, conn_id_on_a, &expected_conn_end_on_a)?;

        let new_conn_end_on_b = ConnectionEnd {
            state: ConnectionState::Open,
            ..conn_end_on_b
        };

        self.store
            .store_connection(msg.conn_id_on_b.clone(), new_conn_end_on_b);

        debug!(
            chain_id = %self.store.chain_id(),
            conn_id_on_b = %msg.conn_id_on_b,
            "connection open confirm"
        );

        Ok(())
    }
}
