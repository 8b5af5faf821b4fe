use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;
use core::time::Duration;
use std::collections::BTreeMap;

use ibc_core_channel_types::channel::ChannelEnd;
use ibc_core_client_types::Height;
use ibc_core_host_types::identifiers::{ChainId, ChannelId, ClientId, ConnectionId, PortId};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::{ClientConfig, ConnectionVersion};
use crate::testapp::ibc::core::error::HostError;

pub const DEFAULT_BLOCK_TIME_SECS: u64 = 5;

/// Number of sealed blocks a store keeps by default. Older blocks are pruned.
pub const DEFAULT_MAX_HISTORY_SIZE: u64 = 256;

/// Client type of every client created by the mock store. Proofs are not
/// verified cryptographically, but identifiers follow the Tendermint client.
pub const TENDERMINT_CLIENT_TYPE: &str = "07-tendermint";

/// The state of a client tracking a counterparty chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockClientState {
    pub chain_id: ChainId,
    pub latest_height: Height,
    /// Timestamp of the counterparty block at `latest_height`.
    pub latest_timestamp: Duration,
    pub config: ClientConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConnectionState {
    Init,
    TryOpen,
    Open,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
        }
    }
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionCounterparty {
    pub client_id: ClientId,
    pub connection_id: Option<ConnectionId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionEnd {
    pub state: ConnectionState,
    pub client_id: ClientId,
    pub counterparty: ConnectionCounterparty,
    pub versions: Vec<ConnectionVersion>,
    pub delay_period: Duration,
}

impl ConnectionEnd {
    pub fn verify_state_matches(
        &self,
        connection_id: &ConnectionId,
        expected: ConnectionState,
    ) -> Result<(), HostError> {
        if self.state != expected {
            return Err(HostError::InvalidConnectionState {
                connection_id: connection_id.clone(),
                expected,
                actual: self.state,
            });
        }

        Ok(())
    }

    /// The connection identifier on the counterparty, known once the
    /// counterparty has processed `ConnOpenTry`.
    pub fn counterparty_connection_id(&self) -> Result<&ConnectionId, HostError> {
        self.counterparty
            .connection_id
            .as_ref()
            .ok_or_else(|| HostError::ProofVerification {
                description: format!(
                    "connection on client `{}` has no counterparty connection yet",
                    self.client_id
                ),
            })
    }
}

/// A sealed block: the state of the store as of `height`, which proofs from
/// this chain are read against.
#[derive(Clone, Debug)]
pub struct MockBlock {
    pub height: Height,
    pub timestamp: Duration,
    pub app_hash: Vec<u8>,
    connections: BTreeMap<ConnectionId, ConnectionEnd>,
    channels: BTreeMap<(PortId, ChannelId), ChannelEnd>,
}

impl MockBlock {
    pub fn connection_end(&self, connection_id: &ConnectionId) -> Option<&ConnectionEnd> {
        self.connections.get(connection_id)
    }

    pub fn channel_end(&self, port_id: &PortId, channel_id: &ChannelId) -> Option<&ChannelEnd> {
        self.channels.get(&(port_id.clone(), channel_id.clone()))
    }
}

/// In-memory IBC state of a host chain.
///
/// Writes land in the pending block. [`MockIbcStore::commit`] seals the
/// pending block into the history, and [`MockIbcStore::next_block`] opens the
/// block at the following height.
#[derive(Debug)]
pub struct MockIbcStore {
    chain_id: ChainId,
    block_time: Duration,
    clients: BTreeMap<ClientId, MockClientState>,
    connections: BTreeMap<ConnectionId, ConnectionEnd>,
    channels: BTreeMap<(PortId, ChannelId), ChannelEnd>,
    /// Channels in allocation order.
    channel_ids: Vec<(PortId, ChannelId)>,
    client_counter: u64,
    connection_counter: u64,
    /// Sealed blocks, oldest first, at most `max_history_size` of them.
    blocks: Vec<MockBlock>,
    max_history_size: u64,
    pending_height: Height,
    pending_timestamp: Duration,
}

impl MockIbcStore {
    /// Creates a store whose genesis block is sealed at height 1.
    pub fn new(chain_id: ChainId, block_time: Duration) -> Self {
        let pending_height =
            Height::new(chain_id.revision_number(), 1).expect("Never fails");

        let mut store = Self {
            chain_id,
            block_time,
            clients: BTreeMap::new(),
            connections: BTreeMap::new(),
            channels: BTreeMap::new(),
            channel_ids: Vec::new(),
            client_counter: 0,
            connection_counter: 0,
            blocks: Vec::new(),
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
            pending_height,
            pending_timestamp: Duration::ZERO,
        };

        store.commit();
        store.next_block();

        store
    }

    /// Keeps at most `max_history_size` sealed blocks, never less than one.
    pub fn with_max_history_size(mut self, max_history_size: u64) -> Self {
        self.max_history_size = max_history_size.max(1);
        self.prune_history();
        self
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn block_time(&self) -> Duration {
        self.block_time
    }

    fn latest_block(&self) -> &MockBlock {
        self.blocks.last().expect("Never fails")
    }

    /// The height of the latest sealed block.
    pub fn latest_height(&self) -> Height {
        self.latest_block().height
    }

    pub fn latest_timestamp(&self) -> Duration {
        self.latest_block().timestamp
    }

    pub fn latest_app_hash(&self) -> &[u8] {
        &self.latest_block().app_hash
    }

    /// The height of the block currently being built.
    pub fn pending_height(&self) -> Height {
        self.pending_height
    }

    pub fn block(&self, height: &Height) -> Option<&MockBlock> {
        self.blocks.iter().rev().find(|block| &block.height == height)
    }

    /// Seals the pending block and returns its app hash. Sealing twice at the
    /// same height replaces the previous seal.
    pub fn commit(&mut self) -> Vec<u8> {
        let app_hash = self.app_hash();

        let block = MockBlock {
            height: self.pending_height,
            timestamp: self.pending_timestamp,
            app_hash: app_hash.clone(),
            connections: self.connections.clone(),
            channels: self.channels.clone(),
        };

        if self.blocks.last().map(|b| b.height) == Some(self.pending_height) {
            self.blocks.pop();
        }

        self.blocks.push(block);
        self.prune_history();

        debug!(
            chain_id = %self.chain_id,
            height = %self.pending_height,
            "committed block"
        );

        app_hash
    }

    /// Opens the block following the pending one, sealing the pending block
    /// first if it was not committed.
    pub fn next_block(&mut self) {
        if self.blocks.last().map(|b| b.height) != Some(self.pending_height) {
            self.commit();
        }

        self.pending_height = self.pending_height.increment();
        self.pending_timestamp += self.block_time;
    }

    fn prune_history(&mut self) {
        let max_history_size = usize::try_from(self.max_history_size).unwrap_or(usize::MAX);

        if self.blocks.len() > max_history_size {
            let pruned = self.blocks.len() - max_history_size;
            self.blocks.drain(..pruned);
        }
    }

    fn app_hash(&self) -> Vec<u8> {
        let mut hasher = Sha256::new();

        hasher.update(self.chain_id.as_str().as_bytes());
        hasher.update(self.pending_height.to_string().as_bytes());

        for (client_id, client_state) in &self.clients {
            hasher.update(format!("clients/{client_id}").as_bytes());
            hasher.update(client_state.latest_height.to_string().as_bytes());
        }

        for (connection_id, connection_end) in &self.connections {
            hasher.update(format!("connections/{connection_id}").as_bytes());
            hasher.update(connection_end.state.as_str().as_bytes());
        }

        for ((port_id, channel_id), channel_end) in &self.channels {
            hasher.update(format!("channelEnds/ports/{port_id}/channels/{channel_id}").as_bytes());
            hasher.update(channel_end.state.to_string().as_bytes());
            hasher.update(channel_end.version.as_str().as_bytes());
        }

        hasher.finalize().to_vec()
    }

    pub fn client_state(&self, client_id: &ClientId) -> Result<&MockClientState, HostError> {
        self.clients
            .get(client_id)
            .ok_or_else(|| HostError::ClientNotFound {
                client_id: client_id.clone(),
            })
    }

    pub fn client_state_mut(
        &mut self,
        client_id: &ClientId,
    ) -> Result<&mut MockClientState, HostError> {
        self.clients
            .get_mut(client_id)
            .ok_or_else(|| HostError::ClientNotFound {
                client_id: client_id.clone(),
            })
    }

    /// Stores a new client under the next client identifier.
    pub fn store_new_client(&mut self, client_state: MockClientState) -> Result<ClientId, HostError> {
        let client_id =
            ClientId::from_str(&format!("{TENDERMINT_CLIENT_TYPE}-{}", self.client_counter))?;

        self.clients.insert(client_id.clone(), client_state);
        self.client_counter += 1;

        Ok(client_id)
    }

    pub fn connection_end(&self, connection_id: &ConnectionId) -> Result<&ConnectionEnd, HostError> {
        self.connections
            .get(connection_id)
            .ok_or_else(|| HostError::ConnectionNotFound {
                connection_id: connection_id.clone(),
            })
    }

    /// Stores a new connection under the next connection identifier.
    pub fn store_new_connection(&mut self, connection_end: ConnectionEnd) -> ConnectionId {
        let connection_id = ConnectionId::new(self.connection_counter);

        self.connections.insert(connection_id.clone(), connection_end);
        self.connection_counter += 1;

        connection_id
    }

    pub fn store_connection(&mut self, connection_id: ConnectionId, connection_end: ConnectionEnd) {
        self.connections.insert(connection_id, connection_end);
    }

    pub fn channel_end(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<&ChannelEnd, HostError> {
        self.channels
            .get(&(port_id.clone(), channel_id.clone()))
            .ok_or_else(|| HostError::ChannelNotFound {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            })
    }

    /// The sequence the next channel identifier is derived from, shared by
    /// all ports.
    pub fn next_channel_sequence(&self) -> u64 {
        self.channel_ids.len() as u64
    }

    /// Stores a new channel under the next channel identifier.
    pub fn store_new_channel(&mut self, port_id: PortId, channel_end: ChannelEnd) -> ChannelId {
        let channel_id = ChannelId::new(self.next_channel_sequence());

        self.channels
            .insert((port_id.clone(), channel_id.clone()), channel_end);
        self.channel_ids.push((port_id, channel_id.clone()));

        channel_id
    }

    pub fn store_channel(&mut self, port_id: PortId, channel_id: ChannelId, channel_end: ChannelEnd) {
        self.channels.insert((port_id, channel_id), channel_end);
    }

    /// The most recently allocated channel bound to `port_id`.
    pub fn latest_channel_on_port(&self, port_id: &PortId) -> Option<&ChannelId> {
        self.channel_ids
            .iter()
            .rev()
            .find(|(p, _)| p == port_id)
            .map(|(_, channel_id)| channel_id)
    }
}

#[cfg(test)]
mod tests {
    use ibc_core_channel_types::channel::{Counterparty, Order, State};
    use ibc_core_channel_types::Version;

    use super::*;

    fn store() -> MockIbcStore {
        MockIbcStore::new(
            ChainId::new("STRIDE").unwrap(),
            Duration::from_secs(DEFAULT_BLOCK_TIME_SECS),
        )
    }

    fn channel_end() -> ChannelEnd {
        ChannelEnd {
            state: State::Init,
            ordering: Order::Unordered,
            remote: Counterparty::new(PortId::transfer(), None),
            connection_hops: vec![ConnectionId::new(0)],
            version: Version::new("ics20-1".to_string()),
        }
    }

    #[test]
    fn genesis_is_sealed_at_height_one() {
        let store = store();

        assert_eq!(store.latest_height().revision_height(), 1);
        assert_eq!(store.pending_height().revision_height(), 2);
        assert_eq!(store.latest_timestamp(), Duration::ZERO);
    }

    #[test]
    fn pending_writes_are_visible_after_commit() {
        let mut store = store();
        let channel_id = store.store_new_channel(PortId::transfer(), channel_end());

        let pending = store.pending_height();
        assert!(store.block(&pending).is_none());

        store.commit();

        assert!(store
            .block(&pending)
            .unwrap()
            .channel_end(&PortId::transfer(), &channel_id)
            .is_some());
    }

    #[test]
    fn next_block_seals_uncommitted_block() {
        let mut store = store();
        let before = store.pending_height();

        store.next_block();

        assert_eq!(store.latest_height(), before);
        assert_eq!(store.pending_height(), before.increment());
        assert_eq!(
            store.latest_timestamp(),
            Duration::from_secs(DEFAULT_BLOCK_TIME_SECS)
        );
    }

    #[test]
    fn history_is_bounded() {
        let mut store = store().with_max_history_size(3);
        let genesis = store.latest_height();

        for _ in 0..10 {
            store.store_new_channel(PortId::transfer(), channel_end());
            store.commit();
            store.next_block();
        }

        assert_eq!(store.blocks.len(), 3);
        assert!(store.block(&genesis).is_none());

        let latest = store.latest_height();
        assert_eq!(latest.revision_height(), 11);
        assert_eq!(
            store
                .block(&latest)
                .unwrap()
                .channel_end(&PortId::transfer(), &ChannelId::new(9))
                .map(|chan_end| chan_end.state),
            Some(State::Init)
        );
    }

    #[test]
    fn history_keeps_at_least_the_latest_block() {
        let mut store = store().with_max_history_size(0);

        store.next_block();

        assert_eq!(store.blocks.len(), 1);
        assert_eq!(store.latest_height().revision_height(), 2);
    }

    #[test]
    fn app_hash_changes_with_state() {
        let mut store = store();
        store.commit();
        let empty_hash = store.latest_app_hash().to_vec();

        store.store_new_channel(PortId::transfer(), channel_end());
        let hash = store.commit();

        assert_ne!(empty_hash, hash);
    }

    #[test]
    fn channel_sequence_is_shared_across_ports() {
        let mut store = store();
        let icahost = PortId::from_str("icahost").unwrap();

        assert_eq!(store.next_channel_sequence(), 0);
        let first = store.store_new_channel(PortId::transfer(), channel_end());
        let second = store.store_new_channel(icahost.clone(), channel_end());
        let third = store.store_new_channel(PortId::transfer(), channel_end());

        assert_eq!(first, ChannelId::new(0));
        assert_eq!(second, ChannelId::new(1));
        assert_eq!(store.next_channel_sequence(), 3);
        assert_eq!(store.latest_channel_on_port(&PortId::transfer()), Some(&third));
        assert_eq!(store.latest_channel_on_port(&icahost), Some(&second));
    }

    #[test]
    fn client_identifiers_are_sequential() {
        let mut store = store();
        let client_state = MockClientState {
            chain_id: ChainId::new("HOST").unwrap(),
            latest_height: Height::new(0, 1).unwrap(),
            latest_timestamp: Duration::ZERO,
            config: ClientConfig::default(),
        };

        let first = store.store_new_client(client_state.clone()).unwrap();
        let second = store.store_new_client(client_state).unwrap();

        assert_eq!(first.as_str(), "07-tendermint-0");
        assert_eq!(second.as_str(), "07-tendermint-1");
    }
}
