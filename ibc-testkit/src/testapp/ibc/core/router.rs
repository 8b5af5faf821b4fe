use core::fmt::Debug;
use std::collections::BTreeMap;

use ibc_core_channel_types::channel::{Counterparty, Order};
use ibc_core_channel_types::Version as ChannelVersion;
use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_core_router_types::module::ModuleId;

use crate::testapp::ibc::applications::ica_controller::IcaControllerModule;
use crate::testapp::ibc::applications::ica_host::IcaHostModule;
use crate::testapp::ibc::applications::transfer::TransferModule;
use crate::testapp::ibc::core::error::HostError;
use crate::testapp::ibc::core::types::MockIbcStore;

/// Channel handshake callbacks of an application module.
///
/// Every callback receives a read-only view of the store of the chain the
/// module is running on.
pub trait Module: Debug {
    /// Returns the version the channel is initialized with.
    #[allow(clippy::too_many_arguments)]
    fn on_chan_open_init(
        &mut self,
        store: &MockIbcStore,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty: &Counterparty,
        version: &ChannelVersion,
    ) -> Result<ChannelVersion, HostError>;

    /// Returns the version the module agrees on, given the counterparty's.
    #[allow(clippy::too_many_arguments)]
    fn on_chan_open_try(
        &mut self,
        store: &MockIbcStore,
        order: Order,
        connection_hops: &[ConnectionId],
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty: &Counterparty,
        counterparty_version: &ChannelVersion,
    ) -> Result<ChannelVersion, HostError>;

    fn on_chan_open_ack(
        &mut self,
        store: &MockIbcStore,
        port_id: &PortId,
        channel_id: &ChannelId,
        counterparty_version: &ChannelVersion,
    ) -> Result<(), HostError>;

    fn on_chan_open_confirm(
        &mut self,
        store: &MockIbcStore,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(), HostError>;
}

/// The application modules a mock chain can be wired with.
#[derive(Debug, derive_more::From)]
pub enum AppModule {
    Transfer(TransferModule),
    IcaController(IcaControllerModule),
    IcaHost(IcaHostModule),
}

impl AppModule {
    pub fn as_module_mut(&mut self) -> &mut dyn Module {
        match self {
            AppModule::Transfer(module) => module,
            AppModule::IcaController(module) => module,
            AppModule::IcaHost(module) => module,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockRouter {
    pub router: BTreeMap<ModuleId, AppModule>,

    /// Maps ports to the the module that owns it
    pub port_to_module: BTreeMap<PortId, ModuleId>,
}

impl MockRouter {
    pub fn add_route(
        &mut self,
        module_id: ModuleId,
        module: impl Into<AppModule>,
    ) -> Result<(), String> {
        match self.router.insert(module_id, module.into()) {
            None => Ok(()),
            Some(_) => Err("Duplicate module_id".to_owned()),
        }
    }

    pub fn scope_port_to_module(&mut self, port_id: PortId, module_id: ModuleId) {
        self.port_to_module.insert(port_id, module_id);
    }

    pub fn lookup_module_by_port(&self, port_id: &PortId) -> Option<&ModuleId> {
        self.port_to_module.get(port_id)
    }

    /// Returns the module bound to `port_id`.
    pub fn route_mut(&mut self, port_id: &PortId) -> Result<&mut dyn Module, HostError> {
        let module_id = self
            .port_to_module
            .get(port_id)
            .ok_or_else(|| HostError::RouteNotFound {
                port_id: port_id.clone(),
            })?;

        self.router
            .get_mut(module_id)
            .map(AppModule::as_module_mut)
            .ok_or_else(|| HostError::RouteNotFound {
                port_id: port_id.clone(),
            })
    }

    pub fn module(&self, module_id: &ModuleId) -> Option<&AppModule> {
        self.router.get(module_id)
    }

    pub fn module_mut(&mut self, module_id: &ModuleId) -> Option<&mut AppModule> {
        self.router.get_mut(module_id)
    }
}
