//! Defines the stakeibc transaction messages.
//!
//! The structs are the protobuf shapes of the `stride.stakeibc` package. They
//! carry no validation: the stakeibc module itself is not part of this
//! workspace, these types only exist so that transactions can be routed and
//! re-encoded.

use ibc_proto::google::protobuf::Any;
use serde::{Deserialize, Serialize};

/// A message that belongs to the stakeibc message registry.
pub trait StakeibcMessage: prost::Message + Default {
    /// The protobuf `Any` type URL used for service dispatch.
    const TYPE_URL: &'static str;
    /// The tag under which the message is registered for the legacy JSON
    /// encoding, if it is registered at all.
    const LEGACY_TAG: Option<&'static str>;
}

macro_rules! impl_stakeibc_message {
    ($msg:ty, $name:literal) => {
        impl_stakeibc_message!(
            $msg,
            concat!("/stride.stakeibc.Msg", $name),
            Some(concat!("stakeibc/", $name))
        );
    };
    ($msg:ty, $type_url:expr, $legacy_tag:expr) => {
        impl StakeibcMessage for $msg {
            const TYPE_URL: &'static str = $type_url;
            const LEGACY_TAG: Option<&'static str> = $legacy_tag;
        }
    };
}

/// The kinds of interchain accounts a host zone is provisioned with.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum IcaAccountType {
    Delegation = 0,
    Fee = 1,
    Withdrawal = 2,
    Redemption = 3,
}

impl IcaAccountType {
    /// The account name used in the interchain account owner, i.e. the part
    /// after the host chain identifier in `{host_chain_id}.{account_name}`.
    pub fn as_str(&self) -> &'static str {
        match self {
            IcaAccountType::Delegation => "DELEGATION",
            IcaAccountType::Fee => "FEE",
            IcaAccountType::Withdrawal => "WITHDRAWAL",
            IcaAccountType::Redemption => "REDEMPTION",
        }
    }
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgLiquidStake {
    #[prost(string, tag = "1")]
    pub creator: String,
    #[prost(uint64, tag = "2")]
    pub amount: u64,
    #[prost(string, tag = "3")]
    pub host_denom: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgClearBalance {
    #[prost(string, tag = "1")]
    pub creator: String,
    #[prost(string, tag = "2")]
    pub chain_id: String,
    #[prost(uint64, tag = "3")]
    pub amount: u64,
    #[prost(string, tag = "4")]
    pub channel: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgRegisterAccount {
    #[prost(string, tag = "1")]
    pub owner: String,
    #[prost(string, tag = "2")]
    pub connection_id: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgSubmitTx {
    #[prost(string, tag = "1")]
    pub owner: String,
    #[prost(string, tag = "2")]
    pub connection_id: String,
    #[prost(message, optional, tag = "3")]
    pub msg: Option<Any>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgRegisterHostZone {
    #[prost(string, tag = "2")]
    pub connection_id: String,
    #[prost(string, tag = "4")]
    pub host_denom: String,
    #[prost(string, tag = "5")]
    pub ibc_denom: String,
    #[prost(string, tag = "6")]
    pub creator: String,
    #[prost(string, tag = "10")]
    pub transfer_channel_id: String,
    #[prost(uint64, tag = "11")]
    pub unbonding_frequency: u64,
    #[prost(string, tag = "12")]
    pub bech32prefix: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgRedeemStake {
    #[prost(string, tag = "1")]
    pub creator: String,
    #[prost(uint64, tag = "2")]
    pub amount: u64,
    #[prost(string, tag = "3")]
    pub host_zone: String,
    #[prost(string, tag = "4")]
    pub receiver: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgClaimUndelegatedTokens {
    #[prost(string, tag = "1")]
    pub creator: String,
    #[prost(string, tag = "2")]
    pub host_zone_id: String,
    #[prost(uint64, tag = "3")]
    pub epoch: u64,
    #[prost(string, tag = "4")]
    pub sender: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgRebalanceValidators {
    #[prost(string, tag = "1")]
    pub creator: String,
    #[prost(string, tag = "2")]
    pub host_zone: String,
    #[prost(uint64, tag = "3")]
    pub num_rebalance: u64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgAddValidator {
    #[prost(string, tag = "1")]
    pub creator: String,
    #[prost(string, tag = "2")]
    pub host_zone: String,
    #[prost(string, tag = "3")]
    pub name: String,
    #[prost(string, tag = "4")]
    pub address: String,
    #[prost(uint64, tag = "5")]
    pub commission: u64,
    #[prost(uint64, tag = "6")]
    pub weight: u64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgChangeValidatorWeight {
    #[prost(string, tag = "1")]
    pub creator: String,
    #[prost(string, tag = "2")]
    pub host_zone: String,
    #[prost(string, tag = "3")]
    pub val_addr: String,
    #[prost(uint64, tag = "4")]
    pub weight: u64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgDeleteValidator {
    #[prost(string, tag = "1")]
    pub creator: String,
    #[prost(string, tag = "2")]
    pub host_zone: String,
    #[prost(string, tag = "3")]
    pub val_addr: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgRestoreInterchainAccount {
    #[prost(string, tag = "1")]
    pub creator: String,
    #[prost(string, tag = "2")]
    pub chain_id: String,
    #[prost(enumeration = "IcaAccountType", tag = "3")]
    pub account_type: i32,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MsgUpdateValidatorSharesExchRate {
    #[prost(string, tag = "1")]
    pub creator: String,
    #[prost(string, tag = "2")]
    pub chain_id: String,
    #[prost(string, tag = "3")]
    pub valoper: String,
}

impl_stakeibc_message!(MsgLiquidStake, "LiquidStake");
// not registered for the legacy encoding
impl_stakeibc_message!(MsgClearBalance, "/stride.stakeibc.MsgClearBalance", None);
impl_stakeibc_message!(MsgRegisterAccount, "RegisterAccount");
impl_stakeibc_message!(MsgSubmitTx, "SubmitTx");
impl_stakeibc_message!(MsgRegisterHostZone, "RegisterHostZone");
impl_stakeibc_message!(MsgRedeemStake, "RedeemStake");
impl_stakeibc_message!(MsgClaimUndelegatedTokens, "ClaimUndelegatedTokens");
impl_stakeibc_message!(MsgRebalanceValidators, "RebalanceValidators");
impl_stakeibc_message!(MsgAddValidator, "AddValidator");
impl_stakeibc_message!(MsgChangeValidatorWeight, "ChangeValidatorWeight");
impl_stakeibc_message!(MsgDeleteValidator, "DeleteValidator");
impl_stakeibc_message!(MsgRestoreInterchainAccount, "RestoreInterchainAccount");
impl_stakeibc_message!(
    MsgUpdateValidatorSharesExchRate,
    "UpdateValidatorSharesExchRate"
);
