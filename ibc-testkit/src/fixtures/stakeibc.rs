use core::fmt::Write;

use ibc_app_stakeibc_types::msgs::{MsgRegisterAccount, MsgRegisterHostZone};
use ibc_app_stakeibc_types::StakeibcMsg;
use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};
use sha2::{Digest, Sha256};

use crate::hosts::TestHost;
use crate::relayer::error::RelayerError;
use crate::relayer::path::Path;

pub const DEFAULT_UNBONDING_FREQUENCY: u64 = 3;

/// The denomination of `base_denom` once received over `chan_id` on the
/// `port_id` port, i.e. `ibc/{SHA256(port/channel/denom)}`.
pub fn ibc_denom(port_id: &PortId, chan_id: &ChannelId, base_denom: &str) -> String {
    let hash = Sha256::digest(format!("{port_id}/{chan_id}/{base_denom}").as_bytes());

    hash.iter().fold(String::from("ibc/"), |mut denom, byte| {
        write!(denom, "{byte:02X}").expect("Never fails");
        denom
    })
}

/// Registers the host zone reachable over the controller side of a transfer
/// path.
pub fn register_host_zone_msg<A: TestHost, B: TestHost>(
    transfer_path: &Path<A, B>,
    creator: &str,
    host_denom: &str,
    bech32prefix: &str,
) -> Result<StakeibcMsg, RelayerError> {
    let endpoint_a = &transfer_path.endpoint_a;
    let chan_id_on_a = endpoint_a.channel_id()?;

    Ok(MsgRegisterHostZone {
        connection_id: endpoint_a.connection_id()?.to_string(),
        host_denom: host_denom.to_string(),
        ibc_denom: ibc_denom(&endpoint_a.channel_config.port_id, chan_id_on_a, host_denom),
        creator: creator.to_string(),
        transfer_channel_id: chan_id_on_a.to_string(),
        unbonding_frequency: DEFAULT_UNBONDING_FREQUENCY,
        bech32prefix: bech32prefix.to_string(),
    }
    .into())
}

pub fn register_account_msg(owner: &str, conn_id: &ConnectionId) -> StakeibcMsg {
    MsgRegisterAccount {
        owner: owner.to_string(),
        connection_id: conn_id.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ibc_denom_is_uppercase_hex() {
        let denom = ibc_denom(&PortId::transfer(), &ChannelId::new(0), "uatom");

        assert!(denom.starts_with("ibc/"));
        assert_eq!(denom.len(), 4 + 64);
        assert!(denom[4..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_ne!(denom, ibc_denom(&PortId::transfer(), &ChannelId::new(1), "uatom"));
    }

    #[test]
    fn register_account_msg_is_dispatchable() {
        let msg = register_account_msg("GAIA.DELEGATION", &ConnectionId::new(0));

        assert_eq!(msg.type_url(), "/stride.stakeibc.MsgRegisterAccount");
    }
}
