//! Handlers of the client, connection and channel handshake messages.
//!
//! Every handler that consumes a proof takes the store of the counterparty
//! chain. The proof is the counterparty state sealed at the proof height,
//! accepted only if the local client has caught up with that height.

mod channel;
mod client;
mod connection;

use ibc_core_client_types::Height;
use ibc_core_host_types::identifiers::ClientId;

use crate::testapp::ibc::core::error::HostError;
use crate::testapp::ibc::core::types::{MockBlock, MockIbcStore};

/// Returns the block of `counterparty` that a proof at `proof_height` is read
/// from, once `client_id` on `store` is checked to track it.
pub(crate) fn counterparty_block<'c>(
    store: &MockIbcStore,
    client_id: &ClientId,
    proof_height: &Height,
    counterparty: &'c MockIbcStore,
) -> Result<&'c MockBlock, HostError> {
    let client_state = store.client_state(client_id)?;

    if &client_state.chain_id != counterparty.chain_id() {
        return Err(HostError::MismatchedCounterpartyChain {
            client_id: client_id.clone(),
            expected: client_state.chain_id.to_string(),
            actual: counterparty.chain_id().to_string(),
        });
    }

    if &client_state.latest_height < proof_height {
        return Err(HostError::InsufficientClientHeight {
            client_id: client_id.clone(),
            client_height: client_state.latest_height,
            proof_height: *proof_height,
        });
    }

    counterparty
        .block(proof_height)
        .ok_or(HostError::MissingBlock {
            height: *proof_height,
        })
}
