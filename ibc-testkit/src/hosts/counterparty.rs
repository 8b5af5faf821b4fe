use ibc_app_interchain_accounts_types::port::default_host_port_id;
use ibc_app_transfer_types::MODULE_ID_STR as TRANSFER_MODULE_ID;
use ibc_core_host_types::identifiers::{ConnectionId, PortId};
use ibc_core_router_types::module::ModuleId;

use super::{HostParams, TestHost};
use crate::testapp::ibc::applications::ica_host::IcaHostModule;
use crate::testapp::ibc::applications::transfer::TransferModule;
use crate::testapp::ibc::core::context::MockIbcContext;
use crate::testapp::ibc::core::router::{AppModule, MockRouter};
use crate::testapp::ibc::core::types::MockIbcStore;

pub const ICA_HOST_MODULE_ID: &str = "icahost";

/// The counterparty chain: runs the transfer module and hosts interchain
/// accounts on the `icahost` port.
#[derive(Debug)]
pub struct CounterpartyHost {
    ibc: MockIbcContext,
    ica_module_id: ModuleId,
}

impl CounterpartyHost {
    /// The interchain account owned by `port_id_on_a` on the controller,
    /// hosted over `conn_id_on_b`.
    pub fn hosted_account_address(
        &self,
        conn_id_on_b: &ConnectionId,
        port_id_on_a: &PortId,
    ) -> Option<&str> {
        match self.ibc.router.module(&self.ica_module_id) {
            Some(AppModule::IcaHost(module)) => {
                module.interchain_account_address(conn_id_on_b, port_id_on_a)
            }
            _ => None,
        }
    }
}

impl TestHost for CounterpartyHost {
    fn build(params: HostParams) -> Self {
        let transfer_module_id = ModuleId::new(TRANSFER_MODULE_ID.to_string());
        let ica_module_id = ModuleId::new(ICA_HOST_MODULE_ID.to_string());

        let mut router = MockRouter::default();

        router
            .add_route(transfer_module_id.clone(), TransferModule::new())
            .expect("Never fails");
        router
            .add_route(ica_module_id.clone(), IcaHostModule::new())
            .expect("Never fails");
        router.scope_port_to_module(PortId::transfer(), transfer_module_id);
        router.scope_port_to_module(default_host_port_id(), ica_module_id.clone());

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
