//! Values shared by the scenarios that exercise a controller chain.

pub mod accounts;
pub mod stakeibc;

use ibc_app_interchain_accounts_types::Metadata;
use ibc_core_channel_types::Version as ChannelVersion;
use ibc_core_host_types::identifiers::ConnectionId;

/// The chain identifier of the controller chain.
pub const STRIDE_CHAIN_ID: &str = "STRIDE";

/// The ICS-27 version proposed for interchain accounts over the first
/// connection of each chain.
pub fn test_ica_version() -> ChannelVersion {
    Metadata::new_default(ConnectionId::new(0), ConnectionId::new(0)).to_version()
}
