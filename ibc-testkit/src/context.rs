use core::str::FromStr;
use std::sync::Arc;

use ibc_app_interchain_accounts_types::port::new_controller_port_id;
use ibc_app_interchain_accounts_types::AccountOwner;
use ibc_core_host_types::identifiers::{ChainId, ChannelId, ClientId, ConnectionId, PortId};
use parking_lot::Mutex;
use tracing::info;

use crate::fixtures::accounts::create_test_accounts;
use crate::fixtures::STRIDE_CHAIN_ID;
use crate::hosts::{
    ControllerHost, CounterpartyHost, HostParams, InterchainAccountController, TestHost,
};
use crate::relayer::builder::{ChannelKind, PathBuilder};
use crate::relayer::driver::HandshakeDriver;
use crate::relayer::error::RelayerError;
use crate::relayer::path::{Path, SharedHost};
use crate::relayer::registry::AccountRegistry;
use crate::relayer::reuse::copy_connection_and_client;

/// Number of funded-looking accounts every setup starts with.
pub const DEFAULT_TEST_ACCOUNTS: usize = 3;

/// A path from the controller chain to the counterparty chain.
pub type ControllerPath = Path<ControllerHost, CounterpartyHost>;

/// Orchestrates a controller chain and, once IBC is set up, a counterparty
/// host chain: the transfer channel between them and the interchain accounts
/// the controller registers over its connection.
#[derive(Debug)]
pub struct IbcSetup {
    controller: SharedHost<ControllerHost>,
    host: Option<SharedHost<CounterpartyHost>>,
    transfer_path: Option<ControllerPath>,
    accounts: AccountRegistry,
    test_accounts: Vec<String>,
}

impl Default for IbcSetup {
    fn default() -> Self {
        Self::new()
    }
}

impl IbcSetup {
    /// A controller chain named `STRIDE` and no counterparty yet.
    pub fn new() -> Self {
        Self::with_params(HostParams::with_chain_id(
            ChainId::new(STRIDE_CHAIN_ID).expect("Never fails"),
        ))
    }

    pub fn with_params(controller_params: HostParams) -> Self {
        Self {
            controller: Arc::new(Mutex::new(ControllerHost::build(controller_params))),
            host: None,
            transfer_path: None,
            accounts: AccountRegistry::new(),
            test_accounts: create_test_accounts(DEFAULT_TEST_ACCOUNTS),
        }
    }

    pub fn is_ibc_enabled(&self) -> bool {
        self.host.is_some()
    }

    /// Builds the counterparty chain. Calling it again with the same chain
    /// identifier is a no-op.
    pub fn setup_ibc_chains(&mut self, host_chain_id: &str) -> Result<(), RelayerError> {
        let host_chain_id = ChainId::new(host_chain_id)?;

        if let Some(host) = &self.host {
            let current_chain_id = host.lock().chain_id().clone();

            if current_chain_id != host_chain_id {
                return Err(RelayerError::configuration(format!(
                    "the testing app has already been initialized with a different chain id `{current_chain_id}`"
                )));
            }

            return Ok(());
        }

        let controller_chain_id = self.controller.lock().chain_id().clone();

        if controller_chain_id == host_chain_id {
            return Err(RelayerError::configuration(format!(
                "host chain cannot share the controller chain id `{controller_chain_id}`"
            )));
        }

        let host = CounterpartyHost::build(HostParams::with_chain_id(host_chain_id.clone()));

        self.host = Some(Arc::new(Mutex::new(host)));

        info!(%controller_chain_id, %host_chain_id, "ibc chains set up");

        Ok(())
    }

    /// Creates clients, connections and a transfer channel between the
    /// controller and `host_chain_id`, building the host chain if needed.
    /// All identifiers must be the first ones allocated on each chain.
    pub fn create_transfer_channel(&mut self, host_chain_id: &str) -> Result<(), RelayerError> {
        if self.transfer_path.is_some() {
            return Err(RelayerError::configuration(
                "a transfer channel has already been created",
            ));
        }

        self.setup_ibc_chains(host_chain_id)?;

        let mut path =
            PathBuilder::new(self.controller.clone(), self.host_chain()?).build(&ChannelKind::Transfer)?;

        HandshakeDriver::new(&mut path)?.setup()?;

        verify_first_identifiers(&path)?;

        info!(%host_chain_id, "transfer channel created");

        self.transfer_path = Some(path);

        Ok(())
    }

    /// Registers the interchain account of `owner` (`{host_chain_id}.{account_name}`)
    /// and opens its channel over the connection of the transfer channel,
    /// which is created first if it does not exist. Returns the address of
    /// the account on the host chain.
    pub fn create_ica_channel(&mut self, owner: &str) -> Result<String, RelayerError> {
        let owner: AccountOwner = owner.parse()?;
        // the controller port must be derivable before any chain is touched
        new_controller_port_id(&owner.to_string())?;

        let transfer_channel_exists = self
            .controller
            .lock()
            .channel_end(&PortId::transfer(), &ChannelId::new(0))
            .is_ok();

        if !transfer_channel_exists {
            self.create_transfer_channel(owner.host_chain_id())?;
        }

        let transfer_path = self.transfer_path()?;
        let conn_id_on_a = transfer_path.endpoint_a.connection_id()?.clone();
        let conn_id_on_b = transfer_path.endpoint_b.connection_id()?.clone();

        let kind = ChannelKind::InterchainAccount {
            owner: owner.clone(),
            conn_id_on_a: conn_id_on_a.clone(),
            conn_id_on_b,
        };

        let mut ica_path = PathBuilder::new(self.controller.clone(), self.host_chain()?).build(&kind)?;

        copy_connection_and_client(&mut ica_path, transfer_path)?;

        let mut driver = HandshakeDriver::new(&mut ica_path)?;
        let chan_id_on_a = driver.register_interchain_account(&owner)?;
        driver.complete_handshake_from_try()?;

        let port_id_on_a = ica_path.endpoint_a.channel_config.port_id.clone();

        let address = {
            let mut controller = self.controller.lock();

            controller
                .channel_end(&port_id_on_a, &chan_id_on_a)
                .map_err(|_| {
                    RelayerError::not_found(format!(
                        "channel not found after creation, port id: `{port_id_on_a}`, channel id: `{chan_id_on_a}`"
                    ))
                })?;

            let address = controller
                .interchain_account_address(&conn_id_on_a, &port_id_on_a)
                .ok_or_else(|| {
                    RelayerError::not_found(format!(
                        "no interchain account address for connection `{conn_id_on_a}` and port `{port_id_on_a}`"
                    ))
                })?
                .to_string();

            controller.set_active_channel_id(
                conn_id_on_a.clone(),
                port_id_on_a.clone(),
                chan_id_on_a.clone(),
            );

            address
        };

        self.accounts
            .register(&owner.to_string(), conn_id_on_a.clone(), address.clone())?;
        self.accounts
            .set_active_channel(conn_id_on_a, port_id_on_a, chan_id_on_a.clone());

        info!(%owner, %address, channel_id = %chan_id_on_a, "interchain account channel created");

        Ok(address)
    }

    pub fn controller_chain(&self) -> &SharedHost<ControllerHost> {
        &self.controller
    }

    /// The counterparty chain, available once the IBC chains are set up.
    pub fn host_chain(&self) -> Result<SharedHost<CounterpartyHost>, RelayerError> {
        self.host.clone().ok_or_else(|| {
            RelayerError::precondition(
                "host chain must be initialized before accessing it. To initialize run \
                 `setup_ibc_chains(chain_id)`, `create_transfer_channel(chain_id)` or \
                 `create_ica_channel(owner)`",
            )
        })
    }

    pub fn transfer_path(&self) -> Result<&ControllerPath, RelayerError> {
        self.transfer_path
            .as_ref()
            .ok_or_else(|| RelayerError::precondition("no transfer channel has been created"))
    }

    /// The address of the interchain account registered for `owner`.
    pub fn ica_address(&self, owner: &str) -> Option<&str> {
        let owner: AccountOwner = owner.parse().ok()?;

        self.accounts
            .get(&owner)
            .map(|account| account.address.as_str())
    }

    /// Queries the host chain for the interchain account it created for
    /// `owner` over the connection of the transfer channel.
    pub fn hosted_ica_address(&self, owner: &str) -> Result<String, RelayerError> {
        let host = self.host_chain()?;
        let owner: AccountOwner = owner.parse()?;
        let port_id_on_a = new_controller_port_id(&owner.to_string())?;
        let conn_id_on_b = self.transfer_path()?.endpoint_b.connection_id()?.clone();

        let host = host.lock();

        host.hosted_account_address(&conn_id_on_b, &port_id_on_a)
            .map(ToString::to_string)
            .ok_or_else(|| {
                RelayerError::not_found(format!(
                    "chain `{}` hosts no interchain account for `{owner}`",
                    host.chain_id()
                ))
            })
    }

    pub fn accounts(&self) -> &AccountRegistry {
        &self.accounts
    }

    pub fn test_accounts(&self) -> &[String] {
        &self.test_accounts
    }
}

/// Checks that a freshly negotiated path uses the first client, connection
/// and channel of each chain.
fn verify_first_identifiers(path: &ControllerPath) -> Result<(), RelayerError> {
    let first_client_id = ClientId::from_str("07-tendermint-0")?;
    let first_connection_id = ConnectionId::new(0);
    let first_channel_id = ChannelId::new(0);

    let sides = [
        (
            "controller",
            path.endpoint_a.client_id()?,
            path.endpoint_a.connection_id()?,
            path.endpoint_a.channel_id()?,
        ),
        (
            "host",
            path.endpoint_b.client_id()?,
            path.endpoint_b.connection_id()?,
            path.endpoint_b.channel_id()?,
        ),
    ];

    for (side, client_id, connection_id, channel_id) in sides {
        if client_id != &first_client_id
            || connection_id != &first_connection_id
            || channel_id != &first_channel_id
        {
            return Err(RelayerError::configuration(format!(
                "{side} transfer path uses client `{client_id}`, connection `{connection_id}` \
                 and channel `{channel_id}`, expected `{first_client_id}`, \
                 `{first_connection_id}` and `{first_channel_id}`"
            )));
        }
    }

    Ok(())
}
