use std::sync::Arc;

use tracing::debug;

use crate::hosts::TestHost;
use crate::relayer::error::RelayerError;
use crate::relayer::path::{Endpoint, Path};

fn verify_reusable<H: TestHost>(
    target: &Endpoint<H>,
    source: &Endpoint<H>,
) -> Result<(), RelayerError> {
    source.client_id()?;
    source.connection_id()?;

    if !Arc::ptr_eq(&target.chain, &source.chain) {
        return Err(RelayerError::configuration(format!(
            "cannot reuse artifacts of chain `{}` on chain `{}`",
            source.chain_id, target.chain_id
        )));
    }

    Ok(())
}

fn copy_endpoint_artifacts<H: TestHost>(target: &mut Endpoint<H>, source: &Endpoint<H>) {
    target.client_id = source.client_id.clone();
    target.connection_id = source.connection_id.clone();
    target.client_config = source.client_config.clone();
    target.connection_config = source.connection_config.clone();
}

/// Copies the client and connection negotiated on `source` onto `target`,
/// side by side, so that a new channel can be opened over them. Channel
/// identifiers are never copied.
///
/// Fails without touching `target` unless `source` carries all four
/// identifiers and both paths connect the same chains.
pub fn copy_connection_and_client<A: TestHost, B: TestHost>(
    target: &mut Path<A, B>,
    source: &Path<A, B>,
) -> Result<(), RelayerError> {
    verify_reusable(&target.endpoint_a, &source.endpoint_a)?;
    verify_reusable(&target.endpoint_b, &source.endpoint_b)?;

    copy_endpoint_artifacts(&mut target.endpoint_a, &source.endpoint_a);
    copy_endpoint_artifacts(&mut target.endpoint_b, &source.endpoint_b);

    debug!(
        chain_id_a = %target.endpoint_a.chain_id,
        chain_id_b = %target.endpoint_b.chain_id,
        "reusing client and connection"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use ibc_core_host_types::identifiers::{ChainId, ChannelId, ClientId, ConnectionId};
    use parking_lot::Mutex;

    use super::*;
    use crate::hosts::{ControllerHost, CounterpartyHost, HostParams};
    use crate::relayer::builder::{ChannelKind, PathBuilder};
    use crate::relayer::path::SharedHost;

    fn chains() -> (SharedHost<ControllerHost>, SharedHost<CounterpartyHost>) {
        (
            Arc::new(Mutex::new(ControllerHost::build(HostParams::with_chain_id(
                ChainId::new("STRIDE").unwrap(),
            )))),
            Arc::new(Mutex::new(CounterpartyHost::build(HostParams::with_chain_id(
                ChainId::new("HOST").unwrap(),
            )))),
        )
    }

    fn negotiated(path: &mut Path<ControllerHost, CounterpartyHost>) {
        let client_id = ClientId::from_str("07-tendermint-0").unwrap();

        path.endpoint_a.client_id = Some(client_id.clone());
        path.endpoint_b.client_id = Some(client_id);
        path.endpoint_a.connection_id = Some(ConnectionId::new(0));
        path.endpoint_b.connection_id = Some(ConnectionId::new(0));
        path.endpoint_a.channel_id = Some(ChannelId::new(0));
        path.endpoint_b.channel_id = Some(ChannelId::new(0));
    }

    #[test]
    fn copies_client_and_connection_but_not_channel() {
        let (chain_a, chain_b) = chains();

        let mut source = PathBuilder::new(chain_a.clone(), chain_b.clone())
            .build(&ChannelKind::Transfer)
            .unwrap();
        negotiated(&mut source);

        let mut target = PathBuilder::new(chain_a, chain_b)
            .build(&ChannelKind::interchain_account("HOST.delegate".parse().unwrap()))
            .unwrap();

        copy_connection_and_client(&mut target, &source).unwrap();

        assert_eq!(target.endpoint_a.client_id, source.endpoint_a.client_id);
        assert_eq!(target.endpoint_b.connection_id, source.endpoint_b.connection_id);
        assert!(target.endpoint_a.channel_id.is_none());
        assert!(target.endpoint_b.channel_id.is_none());
    }

    #[test]
    fn missing_source_artifacts_leave_target_untouched() {
        let (chain_a, chain_b) = chains();

        let mut source = PathBuilder::new(chain_a.clone(), chain_b.clone())
            .build(&ChannelKind::Transfer)
            .unwrap();
        negotiated(&mut source);
        source.endpoint_b.connection_id = None;

        let mut target = PathBuilder::new(chain_a, chain_b)
            .build(&ChannelKind::Transfer)
            .unwrap();

        assert!(matches!(
            copy_connection_and_client(&mut target, &source),
            Err(RelayerError::Precondition { .. })
        ));
        assert!(target.endpoint_a.client_id.is_none());
    }

    #[test]
    fn artifacts_of_other_chains_are_rejected() {
        let (chain_a, chain_b) = chains();
        let (other_a, _) = chains();

        let mut source = PathBuilder::new(chain_a, chain_b.clone())
            .build(&ChannelKind::Transfer)
            .unwrap();
        negotiated(&mut source);

        let mut target = PathBuilder::new(other_a, chain_b)
            .build(&ChannelKind::Transfer)
            .unwrap();

        assert!(matches!(
            copy_connection_and_client(&mut target, &source),
            Err(RelayerError::Configuration { .. })
        ));
    }
}
