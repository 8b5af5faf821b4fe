use std::str::FromStr;
use std::time::Duration;

use ibc_app_interchain_accounts_types::port::{default_host_port_id, new_controller_port_id};
use ibc_app_interchain_accounts_types::{AccountOwner, Metadata};
use ibc_app_stakeibc_types::codec::StakeibcMsg;
use ibc_app_stakeibc_types::msgs::IcaAccountType;
use ibc_core_channel_types::channel::{Order, State};
use ibc_core_host_types::identifiers::{ChainId, ChannelId, ClientId, ConnectionId, PortId};
use ibc_ica_testkit::fixtures::accounts::ica_owner;
use ibc_ica_testkit::fixtures::stakeibc::{ibc_denom, register_host_zone_msg};
use ibc_ica_testkit::hosts::{HostParams, InterchainAccountController, TestHost};
use ibc_ica_testkit::relayer::error::RelayerError;
use ibc_ica_testkit::IbcSetup;
use rstest::*;
use test_log::test;

const HOST_CHAIN_ID: &str = "HOST";
const DELEGATE_OWNER: &str = "HOST.delegate";

#[fixture]
fn setup() -> IbcSetup {
    IbcSetup::new()
}

#[fixture]
fn transfer_setup(mut setup: IbcSetup) -> IbcSetup {
    setup.create_transfer_channel(HOST_CHAIN_ID).unwrap();
    setup
}

#[rstest]
#[test]
fn transfer_channel_uses_first_identifiers(transfer_setup: IbcSetup) {
    let path = transfer_setup.transfer_path().unwrap();
    let first_client_id = ClientId::from_str("07-tendermint-0").unwrap();

    for endpoint_ids in [
        (
            path.endpoint_a.client_id().unwrap(),
            path.endpoint_a.connection_id().unwrap(),
            path.endpoint_a.channel_id().unwrap(),
        ),
        (
            path.endpoint_b.client_id().unwrap(),
            path.endpoint_b.connection_id().unwrap(),
            path.endpoint_b.channel_id().unwrap(),
        ),
    ] {
        assert_eq!(endpoint_ids.0, &first_client_id);
        assert_eq!(endpoint_ids.1, &ConnectionId::new(0));
        assert_eq!(endpoint_ids.2, &ChannelId::new(0));
    }

    assert_eq!(path.endpoint_a.chain_id.as_str(), "STRIDE");
    assert_eq!(path.endpoint_b.chain_id.as_str(), HOST_CHAIN_ID);
}

#[rstest]
#[test]
fn transfer_channel_is_open_and_unordered(transfer_setup: IbcSetup) {
    let controller = transfer_setup.controller_chain().lock();
    let host_chain = transfer_setup.host_chain().unwrap();
    let host = host_chain.lock();

    for chan_end in [
        controller
            .channel_end(&PortId::transfer(), &ChannelId::new(0))
            .unwrap(),
        host.channel_end(&PortId::transfer(), &ChannelId::new(0))
            .unwrap(),
    ] {
        assert_eq!(chan_end.state, State::Open);
        assert_eq!(chan_end.ordering, Order::Unordered);
        assert_eq!(chan_end.version.as_str(), ibc_app_transfer_types::VERSION);
        assert_eq!(chan_end.remote.channel_id, Some(ChannelId::new(0)));
    }
}

#[rstest]
#[test]
fn ica_channel_reuses_transfer_client_and_connection(mut transfer_setup: IbcSetup) {
    let address = transfer_setup.create_ica_channel(DELEGATE_OWNER).unwrap();
    assert!(!address.is_empty());

    let port_id_on_a = new_controller_port_id(DELEGATE_OWNER).unwrap();
    let controller = transfer_setup.controller_chain().lock();
    let host_chain = transfer_setup.host_chain().unwrap();
    let host = host_chain.lock();

    let chan_end_on_a = controller
        .channel_end(&port_id_on_a, &ChannelId::new(1))
        .unwrap();
    assert_eq!(chan_end_on_a.state, State::Open);
    assert_eq!(chan_end_on_a.ordering, Order::Ordered);
    assert_eq!(chan_end_on_a.connection_hops, vec![ConnectionId::new(0)]);
    assert_eq!(chan_end_on_a.remote.port_id, default_host_port_id());
    assert_eq!(chan_end_on_a.remote.channel_id, Some(ChannelId::new(1)));

    let chan_end_on_b = host
        .channel_end(&default_host_port_id(), &ChannelId::new(1))
        .unwrap();
    assert_eq!(chan_end_on_b.state, State::Open);
    assert_eq!(chan_end_on_b.ordering, Order::Ordered);
    assert_eq!(chan_end_on_b.connection_hops, vec![ConnectionId::new(0)]);

    let metadata = Metadata::from_version(&chan_end_on_a.version).unwrap();
    assert_eq!(metadata.address, address);

    // no new client or connection on either chain
    assert!(controller.ibc_store().connection_end(&ConnectionId::new(1)).is_err());
    assert!(host.ibc_store().connection_end(&ConnectionId::new(1)).is_err());
}

#[rstest]
#[test]
fn ica_address_matches_the_host_account(mut transfer_setup: IbcSetup) {
    let address = transfer_setup.create_ica_channel(DELEGATE_OWNER).unwrap();

    assert_eq!(transfer_setup.hosted_ica_address(DELEGATE_OWNER).unwrap(), address);
    assert_eq!(transfer_setup.ica_address(DELEGATE_OWNER), Some(address.as_str()));

    let owner = AccountOwner::from_str(DELEGATE_OWNER).unwrap();
    let account = transfer_setup.accounts().get(&owner).unwrap();
    let port_id_on_a = new_controller_port_id(DELEGATE_OWNER).unwrap();

    assert_eq!(account.port_id, port_id_on_a);
    assert_eq!(account.connection_id, ConnectionId::new(0));
    assert_eq!(account.active_channel_id, Some(ChannelId::new(1)));
    assert_eq!(
        transfer_setup
            .accounts()
            .lookup_address(&ConnectionId::new(0), &port_id_on_a),
        Some(address.as_str())
    );
    assert_eq!(
        transfer_setup
            .controller_chain()
            .lock()
            .active_channel_id(&ConnectionId::new(0), &port_id_on_a),
        Some(&ChannelId::new(1))
    );
}

#[rstest]
#[test]
fn ica_channel_creates_missing_transfer_channel(mut setup: IbcSetup) {
    let address = setup.create_ica_channel(DELEGATE_OWNER).unwrap();

    let path = setup.transfer_path().unwrap();
    assert_eq!(path.endpoint_a.channel_id().unwrap(), &ChannelId::new(0));
    assert_eq!(path.endpoint_b.chain_id.as_str(), HOST_CHAIN_ID);
    assert_eq!(setup.ica_address(DELEGATE_OWNER), Some(address.as_str()));
}

#[rstest]
#[test]
fn each_owner_gets_its_own_channel_and_address(mut transfer_setup: IbcSetup) {
    let owners = [
        ica_owner(HOST_CHAIN_ID, IcaAccountType::Delegation).unwrap(),
        ica_owner(HOST_CHAIN_ID, IcaAccountType::Fee).unwrap(),
        ica_owner(HOST_CHAIN_ID, IcaAccountType::Withdrawal).unwrap(),
    ];

    let addresses: Vec<String> = owners
        .iter()
        .map(|owner| transfer_setup.create_ica_channel(&owner.to_string()).unwrap())
        .collect();

    assert_ne!(addresses[0], addresses[1]);
    assert_ne!(addresses[1], addresses[2]);
    assert_eq!(transfer_setup.accounts().len(), 3);

    for (i, owner) in owners.iter().enumerate() {
        let account = transfer_setup.accounts().get(owner).unwrap();
        assert_eq!(account.active_channel_id, Some(ChannelId::new(i as u64 + 1)));
    }
}

#[rstest]
#[case("")]
#[case("HOST")]
#[case("HOST.delegate.extra")]
#[case(".delegate")]
#[case("HOST.dele/gate")]
#[case("HOST.delegate-account-with-a-name-far-longer-than-any-port-identifier-can-hold-once-the-controller-prefix-is-added-in-front")]
#[test_log::test]
fn malformed_owner_is_rejected_before_any_chain_call(mut setup: IbcSetup, #[case] owner: &str) {
    let height_before = setup.controller_chain().lock().latest_height();

    assert!(matches!(
        setup.create_ica_channel(owner),
        Err(RelayerError::InterchainAccount(_))
    ));

    assert!(!setup.is_ibc_enabled());
    assert!(setup.transfer_path().is_err());
    assert_eq!(setup.controller_chain().lock().latest_height(), height_before);
    assert!(setup.accounts().is_empty());
}

#[rstest]
#[case("delegate")]
#[case("HOST.dele/gate")]
#[test_log::test]
fn malformed_owner_leaves_existing_chains_untouched(
    mut transfer_setup: IbcSetup,
    #[case] owner: &str,
) {
    let controller_height = transfer_setup.controller_chain().lock().latest_height();
    let host_height = transfer_setup.host_chain().unwrap().lock().latest_height();

    assert!(matches!(
        transfer_setup.create_ica_channel(owner),
        Err(RelayerError::InterchainAccount(_))
    ));
    assert!(transfer_setup.accounts().is_empty());

    assert_eq!(
        transfer_setup.controller_chain().lock().latest_height(),
        controller_height
    );
    assert_eq!(
        transfer_setup.host_chain().unwrap().lock().latest_height(),
        host_height
    );
}

#[rstest]
#[test]
fn second_active_channel_supersedes_the_first(mut transfer_setup: IbcSetup) {
    transfer_setup.create_ica_channel(DELEGATE_OWNER).unwrap();

    let port_id_on_a = new_controller_port_id(DELEGATE_OWNER).unwrap();
    let controller_chain = transfer_setup.controller_chain().clone();
    let mut controller = controller_chain.lock();

    controller.set_active_channel_id(ConnectionId::new(0), port_id_on_a.clone(), ChannelId::new(5));
    controller.set_active_channel_id(ConnectionId::new(0), port_id_on_a.clone(), ChannelId::new(6));

    assert_eq!(
        controller.active_channel_id(&ConnectionId::new(0), &port_id_on_a),
        Some(&ChannelId::new(6))
    );
}

#[rstest]
#[test]
fn host_lookup_before_setup_is_a_precondition_error(setup: IbcSetup) {
    assert!(matches!(
        setup.hosted_ica_address(DELEGATE_OWNER),
        Err(RelayerError::Precondition { .. })
    ));
    assert!(matches!(
        setup.host_chain(),
        Err(RelayerError::Precondition { .. })
    ));
    assert_eq!(setup.ica_address(DELEGATE_OWNER), None);
}

#[rstest]
#[test]
fn conflicting_host_chain_is_rejected(mut transfer_setup: IbcSetup) {
    assert!(matches!(
        transfer_setup.setup_ibc_chains("OTHER"),
        Err(RelayerError::Configuration { .. })
    ));
    assert!(transfer_setup.setup_ibc_chains(HOST_CHAIN_ID).is_ok());
}

#[rstest]
#[test]
fn register_host_zone_over_the_transfer_channel(transfer_setup: IbcSetup) {
    let creator = transfer_setup.test_accounts()[0].clone();
    let path = transfer_setup.transfer_path().unwrap();

    let msg = register_host_zone_msg(path, &creator, "uatom", "cosmos").unwrap();

    let StakeibcMsg::RegisterHostZone(inner) = &msg else {
        panic!("unexpected message: {msg:?}");
    };

    assert_eq!(inner.connection_id, "connection-0");
    assert_eq!(inner.transfer_channel_id, "channel-0");
    assert_eq!(inner.creator, creator);
    assert_eq!(
        inner.ibc_denom,
        ibc_denom(&PortId::transfer(), &ChannelId::new(0), "uatom")
    );

    let json = msg.to_legacy_json().unwrap();
    assert_eq!(StakeibcMsg::from_legacy_json(&json).unwrap(), msg);
}

#[test]
fn frozen_controller_clock_is_rejected() {
    let mut setup = IbcSetup::with_params(
        HostParams::builder()
            .chain_id(ChainId::new("STRIDE").unwrap())
            .block_time(Duration::ZERO)
            .build(),
    );
    let height_before = setup.controller_chain().lock().latest_height();

    assert!(matches!(
        setup.create_transfer_channel(HOST_CHAIN_ID),
        Err(RelayerError::Configuration { .. })
    ));
    assert!(setup.transfer_path().is_err());
    assert_eq!(setup.controller_chain().lock().latest_height(), height_before);
}
