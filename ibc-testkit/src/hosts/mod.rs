use core::fmt::Debug;
use core::time::Duration;

use ibc_core_channel_types::channel::ChannelEnd;
use ibc_core_client_types::Height;
use ibc_core_host_types::identifiers::{ChainId, ChannelId, ClientId, ConnectionId, PortId};
use typed_builder::TypedBuilder;

use crate::testapp::ibc::core::context::MockIbcContext;
use crate::testapp::ibc::core::error::HostError;
use crate::testapp::ibc::core::msgs::{
    MockHeader, MsgChannelOpenAck, MsgChannelOpenConfirm, MsgChannelOpenInit, MsgChannelOpenTry,
    MsgConnectionOpenAck, MsgConnectionOpenConfirm, MsgConnectionOpenInit, MsgConnectionOpenTry,
    MsgCreateClient, MsgUpdateClient,
};
use crate::testapp::ibc::core::router::Module;
use crate::testapp::ibc::core::types::{
    MockIbcStore, DEFAULT_BLOCK_TIME_SECS, DEFAULT_MAX_HISTORY_SIZE,
};

pub mod controller;
pub mod counterparty;

pub use controller::{ControllerHost, InterchainAccountController};
pub use counterparty::CounterpartyHost;

#[derive(Clone, Debug, TypedBuilder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostParams {
    #[builder(default = ChainId::new("mockgaia-0").expect("Never fails"))]
    pub chain_id: ChainId,
    /// Time between two consecutive blocks. A host with a zero block time
    /// cannot catch up with the clock of a chain that has a nonzero one.
    #[builder(default = Duration::from_secs(DEFAULT_BLOCK_TIME_SECS))]
    pub block_time: Duration,
    /// Maximum number of sealed blocks the host keeps. Any block older than
    /// this is pruned.
    #[builder(default = DEFAULT_MAX_HISTORY_SIZE)]
    pub max_history_size: u64,
}

impl HostParams {
    pub fn with_chain_id(chain_id: ChainId) -> Self {
        Self::builder().chain_id(chain_id).build()
    }
}

/// TestHost is a trait that defines the interface for a host blockchain.
///
/// Implementors only wire the IBC context; the queries and message handlers
/// the relayer needs are provided on top of it.
pub trait TestHost: Debug + Sized {
    /// Build a new host with the given parameters.
    fn build(params: HostParams) -> Self;

    fn ibc_context(&self) -> &MockIbcContext;

    fn ibc_context_mut(&mut self) -> &mut MockIbcContext;

    /// The chain identifier of the host.
    fn chain_id(&self) -> &ChainId {
        self.ibc_store().chain_id()
    }

    fn ibc_store(&self) -> &MockIbcStore {
        &self.ibc_context().store
    }

    /// The application module bound to `port_id`.
    fn route_mut(&mut self, port_id: &PortId) -> Result<&mut dyn Module, HostError> {
        self.ibc_context_mut().router.route_mut(port_id)
    }

    fn block_time(&self) -> Duration {
        self.ibc_store().block_time()
    }

    fn latest_height(&self) -> Height {
        self.ibc_store().latest_height()
    }

    fn latest_timestamp(&self) -> Duration {
        self.ibc_store().latest_timestamp()
    }

    /// The header a relayer submits to update a client of this chain.
    fn latest_header(&self) -> MockHeader {
        MockHeader {
            chain_id: self.chain_id().clone(),
            height: self.latest_height(),
            timestamp: self.latest_timestamp(),
        }
    }

    fn channel_end(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<&ChannelEnd, HostError> {
        self.ibc_store().channel_end(port_id, channel_id)
    }

    fn next_channel_sequence(&self) -> u64 {
        self.ibc_store().next_channel_sequence()
    }

    fn latest_channel_on_port(&self, port_id: &PortId) -> Option<&ChannelId> {
        self.ibc_store().latest_channel_on_port(port_id)
    }

    /// Seals the pending block. Returns its app hash.
    fn commit(&mut self) -> Vec<u8> {
        self.ibc_context_mut().store.commit()
    }

    fn next_block(&mut self) {
        self.ibc_context_mut().store.next_block()
    }

    /// Commits the pending block and opens the next one.
    fn advance_block(&mut self) {
        self.commit();
        self.next_block();
    }

    fn create_client(&mut self, msg: MsgCreateClient) -> Result<ClientId, HostError> {
        self.ibc_context_mut().create_client(msg)
    }

    fn update_client(&mut self, msg: MsgUpdateClient) -> Result<(), HostError> {
        self.ibc_context_mut().update_client(msg)
    }

    fn conn_open_init(&mut self, msg: MsgConnectionOpenInit) -> Result<ConnectionId, HostError> {
        self.ibc_context_mut().conn_open_init(msg)
    }

    fn conn_open_try(
        &mut self,
        msg: MsgConnectionOpenTry,
        counterparty: &MockIbcStore,
    ) -> Result<ConnectionId, HostError> {
        self.ibc_context_mut().conn_open_try(msg, counterparty)
    }

    fn conn_open_ack(
        &mut self,
        msg: MsgConnectionOpenAck,
        counterparty: &MockIbcStore,
    ) -> Result<(), HostError> {
        self.ibc_context_mut().conn_open_ack(msg, counterparty)
    }

    fn conn_open_confirm(
        &mut self,
        msg: MsgConnectionOpenConfirm,
        counterparty: &MockIbcStore,
    ) -> Result<(), HostError> {
        self.ibc_context_mut().conn_open_confirm(msg, counterparty)
    }

    fn chan_open_init(&mut self, msg: MsgChannelOpenInit) -> Result<ChannelId, HostError> {
        self.ibc_context_mut().chan_open_init(msg)
    }

    fn chan_open_try(
        &mut self,
        msg: MsgChannelOpenTry,
        counterparty: &MockIbcStore,
    ) -> Result<ChannelId, HostError> {
        self.ibc_context_mut().chan_open_try(msg, counterparty)
    }

    fn chan_open_ack(
        &mut self,
        msg: MsgChannelOpenAck,
        counterparty: &MockIbcStore,
    ) -> Result<(), HostError> {
        self.ibc_context_mut().chan_open_ack(msg, counterparty)
    }

    fn chan_open_confirm(
        &mut self,
        msg: MsgChannelOpenConfirm,
        counterparty: &MockIbcStore,
    ) -> Result<(), HostError> {
        self.ibc_context_mut().chan_open_confirm(msg, counterparty)
    }
}
