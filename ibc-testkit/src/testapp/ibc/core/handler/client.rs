use ibc_core_host_types::identifiers::ClientId;
use tracing::debug;

use crate::testapp::ibc::core::context::MockIbcContext;
use crate::testapp::ibc::core::error::HostError;
use crate::testapp::ibc::core::msgs::{MsgCreateClient, MsgUpdateClient};
use crate::testapp::ibc::core::types::MockClientState;

impl MockIbcContext {
    pub fn create_client(&mut self, msg: MsgCreateClient) -> Result<ClientId, HostError> {
        if msg.config.trusting_period >= msg.config.unbonding_period {
            return Err(HostError::InvalidClientConfig {
                description: format!(
                    "trusting period {:?} must be shorter than unbonding period {:?}",
                    msg.config.trusting_period, msg.config.unbonding_period
                ),
            });
        }

        let client_id = self.store.store_new_client(MockClientState {
            chain_id: msg.chain_id,
            latest_height: msg.latest_height,
            latest_timestamp: msg.latest_timestamp,
            config: msg.config,
        })?;

        debug!(
            chain_id = %self.store.chain_id(),
            %client_id,
            height = %msg.latest_height,
            "created client"
        );

        Ok(client_id)
    }

    pub fn update_client(&mut self, msg: MsgUpdateClient) -> Result<(), HostError> {
        let host_timestamp = self.store.latest_timestamp();
        let client_id = msg.client_id;
        let header = msg.header;

        let client_state = self.store.client_state_mut(&client_id)?;

        if header.chain_id != client_state.chain_id {
            return Err(HostError::MismatchedCounterpartyChain {
                client_id,
                expected: client_state.chain_id.to_string(),
                actual: header.chain_id.to_string(),
            });
        }

        if header.height <= client_state.latest_height {
            return Err(HostError::StaleHeader {
                client_id,
                client_height: client_state.latest_height,
                header_height: header.height,
            });
        }

        if header.timestamp > host_timestamp + client_state.config.max_clock_drift {
            return Err(HostError::HeaderInFuture {
                client_id,
                drift: header.timestamp - host_timestamp,
            });
        }

        let elapsed = header
            .timestamp
            .saturating_sub(client_state.latest_timestamp);

        if elapsed > client_state.config.trusting_period {
            return Err(HostError::ClientExpired { client_id, elapsed });
        }

        client_state.latest_height = header.height;
        client_state.latest_timestamp = header.timestamp;

        debug!(%client_id, height = %header.height, "updated client");

        Ok(())
    }
}
