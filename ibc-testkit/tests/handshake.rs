use std::sync::Arc;
use std::time::Duration;

use ibc_app_interchain_accounts_types::port::new_controller_port_id;
use ibc_app_interchain_accounts_types::AccountOwner;
use ibc_core_channel_types::channel::{Order, State};
use ibc_core_host_types::identifiers::{ChainId, ChannelId, ConnectionId, PortId};
use ibc_ica_testkit::hosts::{
    ControllerHost, CounterpartyHost, HostParams, InterchainAccountController, TestHost,
};
use ibc_ica_testkit::relayer::builder::{ChannelKind, PathBuilder};
use ibc_ica_testkit::relayer::driver::HandshakeDriver;
use ibc_ica_testkit::relayer::error::{HandshakeStep, RelayerError};
use ibc_ica_testkit::relayer::path::SharedHost;
use ibc_ica_testkit::relayer::reuse::copy_connection_and_client;
use ibc_ica_testkit::IbcSetup;
use parking_lot::Mutex;
use rstest::*;
use test_log::test;

struct Chains {
    controller: SharedHost<ControllerHost>,
    host: SharedHost<CounterpartyHost>,
}

#[fixture]
fn chains() -> Chains {
    Chains {
        controller: Arc::new(Mutex::new(ControllerHost::build(HostParams::with_chain_id(
            ChainId::new("STRIDE").unwrap(),
        )))),
        host: Arc::new(Mutex::new(CounterpartyHost::build(HostParams::with_chain_id(
            ChainId::new("HOST").unwrap(),
        )))),
    }
}

#[rstest]
#[test]
fn full_handshake_advances_both_chains(chains: Chains) {
    let controller_height = chains.controller.lock().latest_height();
    let host_height = chains.host.lock().latest_height();

    let mut path = PathBuilder::new(chains.controller.clone(), chains.host.clone())
        .build(&ChannelKind::Transfer)
        .unwrap();

    let mut driver = HandshakeDriver::new(&mut path).unwrap();
    let (chan_id_on_a, chan_id_on_b) = driver.setup().unwrap();

    assert_eq!(chan_id_on_a, ChannelId::new(0));
    assert_eq!(chan_id_on_b, ChannelId::new(0));

    assert!(chains.controller.lock().latest_height() > controller_height);
    assert!(chains.host.lock().latest_height() > host_height);

    let controller = chains.controller.lock();
    let conn_end_on_a = controller
        .ibc_store()
        .connection_end(&ConnectionId::new(0))
        .unwrap();
    assert_eq!(
        conn_end_on_a.counterparty.connection_id,
        Some(ConnectionId::new(0))
    );
}

#[rstest]
#[test]
fn second_transfer_channel_reuses_the_connection(chains: Chains) {
    let mut first = PathBuilder::new(chains.controller.clone(), chains.host.clone())
        .build(&ChannelKind::Transfer)
        .unwrap();
    HandshakeDriver::new(&mut first).unwrap().setup().unwrap();

    let mut second = PathBuilder::new(chains.controller.clone(), chains.host.clone())
        .build(&ChannelKind::Transfer)
        .unwrap();
    copy_connection_and_client(&mut second, &first).unwrap();

    let (chan_id_on_a, chan_id_on_b) = HandshakeDriver::new(&mut second)
        .unwrap()
        .create_channels()
        .unwrap();

    assert_eq!(chan_id_on_a, ChannelId::new(1));
    assert_eq!(chan_id_on_b, ChannelId::new(1));
    assert_eq!(second.endpoint_a.client_id, first.endpoint_a.client_id);
    assert_eq!(second.endpoint_b.connection_id, first.endpoint_b.connection_id);
    assert!(chains
        .controller
        .lock()
        .ibc_store()
        .connection_end(&ConnectionId::new(1))
        .is_err());
}

#[rstest]
#[test]
fn channel_steps_require_prior_steps(chains: Chains) {
    let mut path = PathBuilder::new(chains.controller, chains.host)
        .build(&ChannelKind::Transfer)
        .unwrap();
    let mut driver = HandshakeDriver::new(&mut path).unwrap();

    assert!(matches!(
        driver.chan_open_init(),
        Err(RelayerError::Precondition { .. })
    ));
    assert!(matches!(
        driver.chan_open_try(),
        Err(RelayerError::Precondition { .. })
    ));
}

#[rstest]
#[test]
fn mismatched_orderings_are_rejected(chains: Chains) {
    let mut path = PathBuilder::new(chains.controller, chains.host)
        .build(&ChannelKind::Transfer)
        .unwrap();
    path.endpoint_b.channel_config.ordering = Order::Ordered;

    assert!(matches!(
        HandshakeDriver::new(&mut path),
        Err(RelayerError::Configuration { .. })
    ));
}

#[rstest]
#[test]
fn ordered_transfer_channel_fails_on_init(chains: Chains) {
    let mut path = PathBuilder::new(chains.controller.clone(), chains.host)
        .build(&ChannelKind::Transfer)
        .unwrap();
    path.endpoint_a.channel_config.ordering = Order::Ordered;
    path.endpoint_b.channel_config.ordering = Order::Ordered;

    let result = HandshakeDriver::new(&mut path).unwrap().setup();

    assert!(matches!(
        result,
        Err(RelayerError::HandshakeStep {
            step: HandshakeStep::ChanOpenInit,
            ..
        })
    ));
    assert!(path.endpoint_a.channel_id.is_none());
    assert!(chains
        .controller
        .lock()
        .channel_end(&PortId::transfer(), &ChannelId::new(0))
        .is_err());
}

#[rstest]
#[test]
fn interchain_account_handshake_over_reused_connection(chains: Chains) {
    let mut transfer = PathBuilder::new(chains.controller.clone(), chains.host.clone())
        .build(&ChannelKind::Transfer)
        .unwrap();
    HandshakeDriver::new(&mut transfer).unwrap().setup().unwrap();

    let owner: AccountOwner = "HOST.delegate".parse().unwrap();
    let mut ica = PathBuilder::new(chains.controller.clone(), chains.host.clone())
        .build(&ChannelKind::interchain_account(owner.clone()))
        .unwrap();
    copy_connection_and_client(&mut ica, &transfer).unwrap();

    let mut driver = HandshakeDriver::new(&mut ica).unwrap();
    let chan_id_on_a = driver.register_interchain_account(&owner).unwrap();
    let chan_id_on_b = driver.complete_handshake_from_try().unwrap();

    assert_eq!(chan_id_on_a, ChannelId::new(1));
    assert_eq!(chan_id_on_b, ChannelId::new(1));

    let port_id_on_a = new_controller_port_id("HOST.delegate").unwrap();
    let controller = chains.controller.lock();
    let host = chains.host.lock();

    let chan_end_on_a = controller.channel_end(&port_id_on_a, &chan_id_on_a).unwrap();
    assert_eq!(chan_end_on_a.state, State::Open);
    assert_eq!(chan_end_on_a.ordering, Order::Ordered);

    let address = controller
        .interchain_account_address(&ConnectionId::new(0), &port_id_on_a)
        .unwrap();
    assert!(address.starts_with("cosmos1"));
    assert_eq!(
        host.hosted_account_address(&ConnectionId::new(0), &port_id_on_a),
        Some(address)
    );
}

#[test]
fn registering_an_open_account_again_fails() {
    let mut setup = IbcSetup::new();
    setup.create_ica_channel("HOST.delegate").unwrap();

    assert!(matches!(
        setup.create_ica_channel("HOST.delegate"),
        Err(RelayerError::HandshakeStep {
            step: HandshakeStep::RegisterInterchainAccount,
            ..
        })
    ));
}

#[test]
fn frozen_clocks_on_both_chains_complete_the_handshake() {
    let frozen = |chain_id: &str| {
        HostParams::builder()
            .chain_id(ChainId::new(chain_id).unwrap())
            .block_time(Duration::ZERO)
            .build()
    };
    let controller = Arc::new(Mutex::new(ControllerHost::build(frozen("STRIDE"))));
    let host = Arc::new(Mutex::new(CounterpartyHost::build(frozen("HOST"))));

    let mut path = PathBuilder::new(controller.clone(), host)
        .build(&ChannelKind::Transfer)
        .unwrap();

    let (chan_id_on_a, _) = HandshakeDriver::new(&mut path).unwrap().setup().unwrap();

    assert_eq!(chan_id_on_a, ChannelId::new(0));
    assert_eq!(controller.lock().latest_timestamp(), Duration::ZERO);
}
