//! Client, connection and channel configuration carried by each endpoint of a
//! path.

use core::time::Duration;

use ibc_app_transfer_types::VERSION as TRANSFER_VERSION;
use ibc_core_channel_types::channel::Order;
use ibc_core_channel_types::Version as ChannelVersion;
use ibc_core_host_types::identifiers::PortId;
use typed_builder::TypedBuilder;

pub const DEFAULT_TRUSTING_PERIOD_SECS: u64 = 64000;
pub const DEFAULT_UNBONDING_PERIOD_SECS: u64 = 128_000;
pub const DEFAULT_MAX_CLOCK_DRIFT_SECS: u64 = 3;

/// The identifier of the only connection version in use.
pub const DEFAULT_CONNECTION_VERSION_ID: &str = "1";

#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientConfig {
    #[builder(default = Duration::from_secs(DEFAULT_TRUSTING_PERIOD_SECS))]
    pub trusting_period: Duration,
    #[builder(default = Duration::from_secs(DEFAULT_UNBONDING_PERIOD_SECS))]
    pub unbonding_period: Duration,
    #[builder(default = Duration::from_secs(DEFAULT_MAX_CLOCK_DRIFT_SECS))]
    pub max_clock_drift: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A connection version: an identifier plus the channel orderings it supports.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionVersion {
    pub identifier: String,
    pub features: Vec<String>,
}

impl ConnectionVersion {
    pub fn supports(&self, ordering: Order) -> bool {
        self.features.iter().any(|f| f == ordering_feature(ordering))
    }
}

impl Default for ConnectionVersion {
    fn default() -> Self {
        Self {
            identifier: DEFAULT_CONNECTION_VERSION_ID.to_string(),
            features: vec![
                ordering_feature(Order::Ordered).to_string(),
                ordering_feature(Order::Unordered).to_string(),
            ],
        }
    }
}

/// Returns the connection feature that allows channels of the given ordering.
pub fn ordering_feature(ordering: Order) -> &'static str {
    match ordering {
        Order::None => "ORDER_NONE_UNSPECIFIED",
        Order::Unordered => "ORDER_UNORDERED",
        Order::Ordered => "ORDER_ORDERED",
    }
}

#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionConfig {
    #[builder(default = Duration::ZERO)]
    pub delay_period: Duration,
    #[builder(default = vec![ConnectionVersion::default()])]
    pub versions: Vec<ConnectionVersion>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The channel parameters an endpoint proposes. The defaults describe an
/// ICS-20 transfer channel.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelConfig {
    #[builder(default = PortId::transfer())]
    pub port_id: PortId,
    #[builder(default = Order::Unordered)]
    pub ordering: Order,
    #[builder(default = ChannelVersion::new(TRANSFER_VERSION.to_string()))]
    pub version: ChannelVersion,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_connection_version_supports_both_orderings() {
        let config = ConnectionConfig::default();

        assert_eq!(config.versions.len(), 1);
        assert_eq!(config.versions[0].identifier, "1");
        assert!(config.versions[0].supports(Order::Ordered));
        assert!(config.versions[0].supports(Order::Unordered));
        assert!(!config.versions[0].supports(Order::None));
    }

    #[test]
    fn default_channel_config_is_transfer() {
        let config = ChannelConfig::default();

        assert_eq!(config.port_id, PortId::transfer());
        assert_eq!(config.ordering, Order::Unordered);
        assert_eq!(config.version.as_str(), "ics20-1");
    }
}
