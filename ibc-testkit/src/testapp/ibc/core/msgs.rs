//! Messages accepted by the mock IBC handlers.
//!
//! Proofs are represented by the height at which the counterparty state is
//! read. The handlers receive the counterparty store alongside the message
//! and compare its sealed state at that height with the expected one.

use core::time::Duration;

use ibc_core_channel_types::channel::Order;
use ibc_core_channel_types::Version as ChannelVersion;
use ibc_core_client_types::Height;
use ibc_core_host_types::identifiers::{ChainId, ChannelId, ClientId, ConnectionId, PortId};

use crate::config::{ClientConfig, ConnectionVersion};

#[derive(Clone, Debug)]
pub struct MsgCreateClient {
    pub chain_id: ChainId,
    pub latest_height: Height,
    pub latest_timestamp: Duration,
    pub config: ClientConfig,
}

/// A header of the counterparty chain, as submitted in a client update.
#[derive(Clone, Debug)]
pub struct MockHeader {
    pub chain_id: ChainId,
    pub height: Height,
    pub timestamp: Duration,
}

#[derive(Clone, Debug)]
pub struct MsgUpdateClient {
    pub client_id: ClientId,
    pub header: MockHeader,
}

#[derive(Clone, Debug)]
pub struct MsgConnectionOpenInit {
    pub client_id_on_a: ClientId,
    pub client_id_on_b: ClientId,
    pub versions: Vec<ConnectionVersion>,
    pub delay_period: Duration,
}

#[derive(Clone, Debug)]
pub struct MsgConnectionOpenTry {
    pub client_id_on_b: ClientId,
    pub client_id_on_a: ClientId,
    pub conn_id_on_a: ConnectionId,
    pub versions_on_a: Vec<ConnectionVersion>,
    pub delay_period: Duration,
    pub proof_height_on_a: Height,
}

#[derive(Clone, Debug)]
pub struct MsgConnectionOpenAck {
    pub conn_id_on_a: ConnectionId,
    pub conn_id_on_b: ConnectionId,
    pub version: ConnectionVersion,
    pub proof_height_on_b: Height,
}

#[derive(Clone, Debug)]
pub struct MsgConnectionOpenConfirm {
    pub conn_id_on_b: ConnectionId,
    pub proof_height_on_a: Height,
}

#[derive(Clone, Debug)]
pub struct MsgChannelOpenInit {
    pub port_id_on_a: PortId,
    pub connection_hops_on_a: Vec<ConnectionId>,
    pub port_id_on_b: PortId,
    pub ordering: Order,
    pub version_proposal: ChannelVersion,
}

#[derive(Clone, Debug)]
pub struct MsgChannelOpenTry {
    pub port_id_on_b: PortId,
    pub connection_hops_on_b: Vec<ConnectionId>,
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub version_supported_on_a: ChannelVersion,
    pub ordering: Order,
    pub proof_height_on_a: Height,
}

#[derive(Clone, Debug)]
pub struct MsgChannelOpenAck {
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub chan_id_on_b: ChannelId,
    pub version_on_b: ChannelVersion,
    pub proof_height_on_b: Height,
}

#[derive(Clone, Debug)]
pub struct MsgChannelOpenConfirm {
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub proof_height_on_a: Height,
}
