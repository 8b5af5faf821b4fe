use std::collections::BTreeMap;

use ibc_app_interchain_accounts_types::port::new_controller_port_id;
use ibc_app_interchain_accounts_types::AccountOwner;
use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};
use tracing::debug;

use crate::relayer::error::RelayerError;

/// An interchain account registered by the controller chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterchainAccount {
    pub owner: AccountOwner,
    pub connection_id: ConnectionId,
    pub port_id: PortId,
    pub address: String,
    pub active_channel_id: Option<ChannelId>,
}

/// Interchain accounts by owner, with the single active channel of each
/// (connection, port) pair.
#[derive(Clone, Debug, Default)]
pub struct AccountRegistry {
    accounts: BTreeMap<AccountOwner, InterchainAccount>,
    active_channels: BTreeMap<(ConnectionId, PortId), ChannelId>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the account of `owner` over `connection_id`. Returns the
    /// controller port the account is bound to.
    ///
    /// This is bookkeeping only. The account is registered on the chain by
    /// [`IbcSetup::create_ica_channel`](crate::context::IbcSetup::create_ica_channel),
    /// which records it here and returns its address.
    pub fn register(
        &mut self,
        owner: &str,
        connection_id: ConnectionId,
        address: impl Into<String>,
    ) -> Result<PortId, RelayerError> {
        let owner: AccountOwner = owner.parse()?;
        let port_id = new_controller_port_id(&owner.to_string())?;
        let address = address.into();

        debug!(%owner, %connection_id, %port_id, %address, "recording interchain account");

        let active_channel_id = self
            .active_channels
            .get(&(connection_id.clone(), port_id.clone()))
            .cloned();

        self.accounts.insert(
            owner.clone(),
            InterchainAccount {
                owner,
                connection_id,
                port_id: port_id.clone(),
                address,
                active_channel_id,
            },
        );

        Ok(port_id)
    }

    pub fn lookup_address(&self, connection_id: &ConnectionId, port_id: &PortId) -> Option<&str> {
        self.accounts
            .values()
            .find(|account| &account.connection_id == connection_id && &account.port_id == port_id)
            .map(|account| account.address.as_str())
    }

    /// Sets the active channel of a (connection, port) pair. The last write
    /// wins.
    pub fn set_active_channel(
        &mut self,
        connection_id: ConnectionId,
        port_id: PortId,
        channel_id: ChannelId,
    ) {
        for account in self.accounts.values_mut() {
            if account.connection_id == connection_id && account.port_id == port_id {
                account.active_channel_id = Some(channel_id.clone());
            }
        }

        self.active_channels
            .insert((connection_id, port_id), channel_id);
    }

    pub fn active_channel(&self, connection_id: &ConnectionId, port_id: &PortId) -> Option<&ChannelId> {
        self.active_channels
            .get(&(connection_id.clone(), port_id.clone()))
    }

    pub fn get(&self, owner: &AccountOwner) -> Option<&InterchainAccount> {
        self.accounts.get(owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterchainAccount> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
