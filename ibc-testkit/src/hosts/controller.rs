use ibc_app_interchain_accounts_types::port::{default_host_port_id, new_controller_port_id};
use ibc_app_interchain_accounts_types::AccountOwner;
use ibc_app_transfer_types::MODULE_ID_STR as TRANSFER_MODULE_ID;
use ibc_core_channel_types::channel::Order;
use ibc_core_channel_types::Version as ChannelVersion;
use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_core_router_types::module::ModuleId;
use tracing::info;

use super::{HostParams, TestHost};
use crate::testapp::ibc::applications::ica_controller::IcaControllerModule;
use crate::testapp::ibc::applications::transfer::TransferModule;
use crate::testapp::ibc::core::context::MockIbcContext;
use crate::testapp::ibc::core::error::HostError;
use crate::testapp::ibc::core::msgs::MsgChannelOpenInit;
use crate::testapp::ibc::core::router::{AppModule, MockRouter};
use crate::testapp::ibc::core::types::MockIbcStore;

pub const ICA_CONTROLLER_MODULE_ID: &str = "icacontroller";

/// Interchain account operations of a controller chain.
pub trait InterchainAccountController: TestHost {
    /// Binds the controller port of `owner` and initializes an ordered
    /// channel towards the host port over `conn_id_on_a`. The allocated
    /// channel is observable once the block is committed.
    fn register_interchain_account(
        &mut self,
        conn_id_on_a: &ConnectionId,
        owner: &AccountOwner,
        version: Option<ChannelVersion>,
    ) -> Result<(), HostError>;

    fn interchain_account_address(
        &self,
        conn_id_on_a: &ConnectionId,
        port_id_on_a: &PortId,
    ) -> Option<&str>;

    fn set_active_channel_id(
        &mut self,
        conn_id_on_a: ConnectionId,
        port_id_on_a: PortId,
        chan_id_on_a: ChannelId,
    );

    fn active_channel_id(
        &self,
        conn_id_on_a: &ConnectionId,
        port_id_on_a: &PortId,
    ) -> Option<&ChannelId>;
}

/// The chain under test: runs the transfer module and the controller side of
/// interchain accounts.
#[derive(Debug)]
pub struct ControllerHost {
    ibc: MockIbcContext,
    ica_module_id: ModuleId,
}

impl ControllerHost {
    fn ica_controller(&self) -> &IcaControllerModule {
        match self.ibc.router.module(&self.ica_module_id) {
            Some(AppModule::IcaController(module)) => module,
            _ => unreachable!("the controller module is registered at build time"),
        }
    }

    fn ica_controller_mut(&mut self) -> &mut IcaControllerModule {
        match self.ibc.router.module_mut(&self.ica_module_id) {
            Some(AppModule::IcaController(module)) => module,
            _ => unreachable!("the controller module is registered at build time"),
        }
    }
}

impl TestHost for ControllerHost {
    fn build(params: HostParams) -> Self {
        let transfer_module_id = ModuleId::new(TRANSFER_MODULE_ID.to_string());
        let ica_module_id = ModuleId::new(ICA_CONTROLLER_MODULE_ID.to_string());

        let mut router = MockRouter::default();

        router
            .add_route(transfer_module_id.clone(), TransferModule::new())
            .expect("Never fails");
        router
            .add_route(ica_module_id.clone(), IcaControllerModule::new())
            .expect("Never fails");
        router.scope_port_to_module(PortId::transfer(), transfer_module_id);

        Self {
            ibc: MockIbcContext::new(
                MockIbcStore::new(params.chain_id, params.block_time)
                    .with_max_history_size(params.max_history_size),
                router,
            ),
            ica_module_id,
        }
    }

    fn ibc_context(&self) -> &MockIbcContext {
        &self.ibc
    }

    fn ibc_context_mut(&mut self) -> &mut MockIbcContext {
        &mut self.ibc
    }
}

impl InterchainAccountController for ControllerHost {
    fn register_interchain_account(
        &mut self,
        conn_id_on_a: &ConnectionId,
        owner: &AccountOwner,
        version: Option<ChannelVersion>,
    ) -> Result<(), HostError> {
        let port_id_on_a = new_controller_port_id(&owner.to_string())?;

        self.ibc
            .router
            .scope_port_to_module(port_id_on_a.clone(), self.ica_module_id.clone());

        let chan_id_on_a = self.chan_open_init(MsgChannelOpenInit {
            port_id_on_a: port_id_on_a.clone(),
            connection_hops_on_a: vec![conn_id_on_a.clone()],
            port_id_on_b: default_host_port_id(),
            ordering: Order::Ordered,
            version_proposal: version.unwrap_or_else(|| ChannelVersion::new(String::new())),
        })?;

        info!(
            %owner,
            %conn_id_on_a,
            %port_id_on_a,
            %chan_id_on_a,
            "registered interchain account"
        );

        Ok(())
    }

    fn interchain_account_address(
        &self,
        conn_id_on_a: &ConnectionId,
        port_id_on_a: &PortId,
    ) -> Option<&str> {
        self.ica_controller()
            .interchain_account_address(conn_id_on_a, port_id_on_a)
    }

    fn set_active_channel_id(
        &mut self,
        conn_id_on_a: ConnectionId,
        port_id_on_a: PortId,
        chan_id_on_a: ChannelId,
    ) {
        self.ica_controller_mut()
            .set_active_channel_id(conn_id_on_a, port_id_on_a, chan_id_on_a)
    }

    fn active_channel_id(
        &self,
        conn_id_on_a: &ConnectionId,
        port_id_on_a: &PortId,
    ) -> Option<&ChannelId> {
        self.ica_controller()
            .active_channel_id(conn_id_on_a, port_id_on_a)
    }
}
