use ibc_app_interchain_accounts_types::port::new_controller_port_id;
use ibc_app_interchain_accounts_types::AccountOwner;
use ibc_core_host_types::identifiers::{ChannelId, ClientId, ConnectionId};
use tracing::{info, warn};

use crate::hosts::{ControllerHost, InterchainAccountController, TestHost};
use crate::relayer::error::{HandshakeStep, RelayerError};
use crate::relayer::ops::TypedRelayerOps;
use crate::relayer::path::Path;

/// Runs the client, connection and channel handshakes of a [`Path`].
///
/// Endpoint A initiates every handshake. After each step the acting chain
/// commits and moves to the next block, and the client on the other chain
/// is brought up to date before it verifies the step. Any failing step
/// aborts the handshake and leaves the path partially negotiated.
#[derive(Debug)]
pub struct HandshakeDriver<'p, A: TestHost, B: TestHost> {
    path: &'p mut Path<A, B>,
}

impl<'p, A: TestHost, B: TestHost> HandshakeDriver<'p, A, B> {
    pub fn new(path: &'p mut Path<A, B>) -> Result<Self, RelayerError> {
        path.validate()?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path<A, B> {
        self.path
    }

    /// Opens a channel, first negotiating the clients and the connection
    /// unless the path already carries them. Returns the channel identifiers
    /// on A and B.
    pub fn setup(&mut self) -> Result<(ChannelId, ChannelId), RelayerError> {
        if self.path.endpoint_a.client_id.is_none() || self.path.endpoint_b.client_id.is_none() {
            self.create_clients()?;
        }

        if self.path.endpoint_a.connection_id.is_none()
            || self.path.endpoint_b.connection_id.is_none()
        {
            self.create_connections()?;
        }

        self.create_channels()
    }

    /// Creates a client of each chain on the other one.
    pub fn create_clients(&mut self) -> Result<(ClientId, ClientId), RelayerError> {
        let chain_a = self.path.endpoint_a.chain.clone();
        let chain_b = self.path.endpoint_b.chain.clone();
        let mut host_a = chain_a.lock();
        let mut host_b = chain_b.lock();

        let client_id_on_a = TypedRelayerOps::<A, B>::create_client_on_a(
            &mut host_a,
            &host_b,
            &self.path.endpoint_a.client_config,
        )?;
        host_a.advance_block();

        let client_id_on_b = TypedRelayerOps::<B, A>::create_client_on_a(
            &mut host_b,
            &host_a,
            &self.path.endpoint_b.client_config,
        )?;
        host_b.advance_block();

        self.path.endpoint_a.client_id = Some(client_id_on_a.clone());
        self.path.endpoint_b.client_id = Some(client_id_on_b.clone());

        Ok((client_id_on_a, client_id_on_b))
    }

    /// Runs the connection handshake over the clients of the path.
    pub fn create_connections(&mut self) -> Result<(ConnectionId, ConnectionId), RelayerError> {
        let client_id_on_a = self.path.endpoint_a.client_id()?.clone();
        let client_id_on_b = self.path.endpoint_b.client_id()?.clone();

        let chain_a = self.path.endpoint_a.chain.clone();
        let chain_b = self.path.endpoint_b.chain.clone();
        let mut host_a = chain_a.lock();
        let mut host_b = chain_b.lock();

        let conn_id_on_a = TypedRelayerOps::<A, B>::connection_open_init_on_a(
            &mut host_a,
            &client_id_on_a,
            &client_id_on_b,
            &self.path.endpoint_a.connection_config,
        )?;
        host_a.advance_block();

        TypedRelayerOps::<B, A>::update_client_on_a_with_sync(&mut host_b, &host_a, &client_id_on_b)?;

        let conn_id_on_b = TypedRelayerOps::<A, B>::connection_open_try_on_b(
            &mut host_b,
            &host_a,
            &conn_id_on_a,
            &client_id_on_a,
            &client_id_on_b,
        )?;
        host_b.advance_block();

        TypedRelayerOps::<A, B>::update_client_on_a_with_sync(&mut host_a, &host_b, &client_id_on_a)?;

        TypedRelayerOps::<A, B>::connection_open_ack_on_a(
            &mut host_a,
            &host_b,
            &conn_id_on_a,
            &conn_id_on_b,
        )?;
        host_a.advance_block();

        TypedRelayerOps::<B, A>::update_client_on_a_with_sync(&mut host_b, &host_a, &client_id_on_b)?;

        TypedRelayerOps::<A, B>::connection_open_confirm_on_b(&mut host_b, &host_a, &conn_id_on_b)?;
        host_b.advance_block();

        TypedRelayerOps::<A, B>::update_client_on_a_with_sync(&mut host_a, &host_b, &client_id_on_a)?;

        info!(
            chain_id_a = %host_a.chain_id(),
            %conn_id_on_a,
            chain_id_b = %host_b.chain_id(),
            %conn_id_on_b,
            "connection open"
        );

        self.path.endpoint_a.connection_id = Some(conn_id_on_a.clone());
        self.path.endpoint_b.connection_id = Some(conn_id_on_b.clone());

        Ok((conn_id_on_a, conn_id_on_b))
    }

    /// Runs the four steps of the channel handshake.
    pub fn create_channels(&mut self) -> Result<(ChannelId, ChannelId), RelayerError> {
        let chan_id_on_a = self.chan_open_init()?;
        let chan_id_on_b = self.complete_handshake_from_try()?;

        Ok((chan_id_on_a, chan_id_on_b))
    }

    /// Finishes a channel handshake that endpoint A already initialized.
    pub fn complete_handshake_from_try(&mut self) -> Result<ChannelId, RelayerError> {
        let chan_id_on_b = self.chan_open_try()?;
        self.chan_open_ack()?;
        self.chan_open_confirm()?;

        Ok(chan_id_on_b)
    }

    pub fn chan_open_init(&mut self) -> Result<ChannelId, RelayerError> {
        let conn_id_on_a = self.path.endpoint_a.connection_id()?.clone();

        let chain_a = self.path.endpoint_a.chain.clone();
        let mut host_a = chain_a.lock();

        let chan_id_on_a = TypedRelayerOps::<A, B>::channel_open_init_on_a(
            &mut host_a,
            &conn_id_on_a,
            &self.path.endpoint_a.channel_config,
            &self.path.endpoint_b.channel_config.port_id,
        )?;
        host_a.advance_block();

        self.path.endpoint_a.channel_id = Some(chan_id_on_a.clone());

        Ok(chan_id_on_a)
    }

    pub fn chan_open_try(&mut self) -> Result<ChannelId, RelayerError> {
        let client_id_on_b = self.path.endpoint_b.client_id()?.clone();
        let conn_id_on_b = self.path.endpoint_b.connection_id()?.clone();
        let chan_id_on_a = self.path.endpoint_a.channel_id()?.clone();

        let chain_a = self.path.endpoint_a.chain.clone();
        let chain_b = self.path.endpoint_b.chain.clone();
        let host_a = chain_a.lock();
        let mut host_b = chain_b.lock();

        TypedRelayerOps::<B, A>::update_client_on_a_with_sync(&mut host_b, &host_a, &client_id_on_b)?;

        let chan_id_on_b = TypedRelayerOps::<A, B>::channel_open_try_on_b(
            &mut host_b,
            &host_a,
            &conn_id_on_b,
            &self.path.endpoint_b.channel_config.port_id,
            self.path.endpoint_b.channel_config.ordering,
            &self.path.endpoint_a.channel_config.port_id,
            &chan_id_on_a,
        )?;
        host_b.advance_block();

        self.path.endpoint_b.channel_id = Some(chan_id_on_b.clone());

        Ok(chan_id_on_b)
    }

    pub fn chan_open_ack(&mut self) -> Result<(), RelayerError> {
        let client_id_on_a = self.path.endpoint_a.client_id()?.clone();
        let chan_id_on_a = self.path.endpoint_a.channel_id()?.clone();
        let chan_id_on_b = self.path.endpoint_b.channel_id()?.clone();

        let chain_a = self.path.endpoint_a.chain.clone();
        let chain_b = self.path.endpoint_b.chain.clone();
        let mut host_a = chain_a.lock();
        let host_b = chain_b.lock();

        TypedRelayerOps::<A, B>::update_client_on_a_with_sync(&mut host_a, &host_b, &client_id_on_a)?;

        TypedRelayerOps::<A, B>::channel_open_ack_on_a(
            &mut host_a,
            &host_b,
            &self.path.endpoint_a.channel_config.port_id,
            &chan_id_on_a,
            &self.path.endpoint_b.channel_config.port_id,
            &chan_id_on_b,
        )?;
        host_a.advance_block();

        Ok(())
    }

    pub fn chan_open_confirm(&mut self) -> Result<(), RelayerError> {
        let client_id_on_b = self.path.endpoint_b.client_id()?.clone();
        let chan_id_on_b = self.path.endpoint_b.channel_id()?.clone();

        let chain_a = self.path.endpoint_a.chain.clone();
        let chain_b = self.path.endpoint_b.chain.clone();
        let host_a = chain_a.lock();
        let mut host_b = chain_b.lock();

        TypedRelayerOps::<B, A>::update_client_on_a_with_sync(&mut host_b, &host_a, &client_id_on_b)?;

        TypedRelayerOps::<A, B>::channel_open_confirm_on_b(
            &mut host_b,
            &host_a,
            &self.path.endpoint_b.channel_config.port_id,
            &chan_id_on_b,
        )?;
        host_b.advance_block();

        info!(
            chain_id_a = %host_a.chain_id(),
            port_id_a = %self.path.endpoint_a.channel_config.port_id,
            chan_id_on_a = ?self.path.endpoint_a.channel_id,
            chain_id_b = %host_b.chain_id(),
            port_id_b = %self.path.endpoint_b.channel_config.port_id,
            %chan_id_on_b,
            "channel open"
        );

        Ok(())
    }
}

impl<B: TestHost> HandshakeDriver<'_, ControllerHost, B> {
    /// Registers the interchain account of `owner` over the connection of
    /// endpoint A, which initializes its channel, and records the allocated
    /// channel on the endpoint.
    ///
    /// The channel identifier is read from the chain once the registration
    /// block is committed. If it differs from the sequence observed before
    /// registering, the chain's allocation wins.
    pub fn register_interchain_account(
        &mut self,
        owner: &AccountOwner,
    ) -> Result<ChannelId, RelayerError> {
        let conn_id_on_a = self.path.endpoint_a.connection_id()?.clone();
        let port_id_on_a = new_controller_port_id(&owner.to_string())?;

        let chain_a = self.path.endpoint_a.chain.clone();
        let mut host_a = chain_a.lock();
        let chain_id_a = host_a.chain_id().clone();

        let predicted_chan_id_on_a = ChannelId::new(host_a.next_channel_sequence());

        host_a
            .register_interchain_account(
                &conn_id_on_a,
                owner,
                Some(self.path.endpoint_a.channel_config.version.clone()),
            )
            .map_err(|e| {
                RelayerError::handshake_step(
                    HandshakeStep::RegisterInterchainAccount,
                    &chain_id_a,
                    e,
                )
            })?;

        host_a.commit();
        host_a.next_block();

        let chan_id_on_a = host_a
            .latest_channel_on_port(&port_id_on_a)
            .cloned()
            .ok_or_else(|| {
                RelayerError::not_found(format!(
                    "no channel on port `{port_id_on_a}` of chain `{chain_id_a}` after registering `{owner}`"
                ))
            })?;

        if chan_id_on_a != predicted_chan_id_on_a {
            warn!(
                %owner,
                predicted = %predicted_chan_id_on_a,
                allocated = %chan_id_on_a,
                "channel allocated during registration differs from the observed sequence"
            );
        }

        self.path.endpoint_a.channel_config.port_id = port_id_on_a;
        self.path.endpoint_a.channel_id = Some(chan_id_on_a.clone());

        Ok(chan_id_on_a)
    }
}
