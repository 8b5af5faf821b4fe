//! The stakeibc message registry.

use ibc_proto::google::protobuf::Any;
use prost::Message;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::msgs::*;

/// Enumeration of all the messages the stakeibc module accepts.
#[derive(Clone, Debug, PartialEq, derive_more::From)]
pub enum StakeibcMsg {
    LiquidStake(MsgLiquidStake),
    ClearBalance(MsgClearBalance),
    RegisterAccount(MsgRegisterAccount),
    SubmitTx(MsgSubmitTx),
    RegisterHostZone(MsgRegisterHostZone),
    RedeemStake(MsgRedeemStake),
    ClaimUndelegatedTokens(MsgClaimUndelegatedTokens),
    RebalanceValidators(MsgRebalanceValidators),
    AddValidator(MsgAddValidator),
    ChangeValidatorWeight(MsgChangeValidatorWeight),
    DeleteValidator(MsgDeleteValidator),
    RestoreInterchainAccount(MsgRestoreInterchainAccount),
    UpdateValidatorSharesExchRate(MsgUpdateValidatorSharesExchRate),
}

impl StakeibcMsg {
    /// Type URLs of every message accepted for service dispatch.
    pub const TYPE_URLS: [&'static str; 13] = [
        MsgLiquidStake::TYPE_URL,
        MsgClearBalance::TYPE_URL,
        MsgRegisterAccount::TYPE_URL,
        MsgSubmitTx::TYPE_URL,
        MsgRegisterHostZone::TYPE_URL,
        MsgRedeemStake::TYPE_URL,
        MsgClaimUndelegatedTokens::TYPE_URL,
        MsgRebalanceValidators::TYPE_URL,
        MsgAddValidator::TYPE_URL,
        MsgChangeValidatorWeight::TYPE_URL,
        MsgDeleteValidator::TYPE_URL,
        MsgRestoreInterchainAccount::TYPE_URL,
        MsgUpdateValidatorSharesExchRate::TYPE_URL,
    ];

    /// Tags of every message registered for the legacy JSON encoding.
    pub const LEGACY_TAGS: [&'static str; 12] = [
        "stakeibc/LiquidStake",
        "stakeibc/RegisterAccount",
        "stakeibc/SubmitTx",
        "stakeibc/RegisterHostZone",
        "stakeibc/RedeemStake",
        "stakeibc/ClaimUndelegatedTokens",
        "stakeibc/RebalanceValidators",
        "stakeibc/AddValidator",
        "stakeibc/ChangeValidatorWeight",
        "stakeibc/DeleteValidator",
        "stakeibc/RestoreInterchainAccount",
        "stakeibc/UpdateValidatorSharesExchRate",
    ];

    pub fn type_url(&self) -> &'static str {
        match self {
            StakeibcMsg::LiquidStake(_) => MsgLiquidStake::TYPE_URL,
            StakeibcMsg::ClearBalance(_) => MsgClearBalance::TYPE_URL,
            StakeibcMsg::RegisterAccount(_) => MsgRegisterAccount::TYPE_URL,
            StakeibcMsg::SubmitTx(_) => MsgSubmitTx::TYPE_URL,
            StakeibcMsg::RegisterHostZone(_) => MsgRegisterHostZone::TYPE_URL,
            StakeibcMsg::RedeemStake(_) => MsgRedeemStake::TYPE_URL,
            StakeibcMsg::ClaimUndelegatedTokens(_) => MsgClaimUndelegatedTokens::TYPE_URL,
            StakeibcMsg::RebalanceValidators(_) => MsgRebalanceValidators::TYPE_URL,
            StakeibcMsg::AddValidator(_) => MsgAddValidator::TYPE_URL,
            StakeibcMsg::ChangeValidatorWeight(_) => MsgChangeValidatorWeight::TYPE_URL,
            StakeibcMsg::DeleteValidator(_) => MsgDeleteValidator::TYPE_URL,
            StakeibcMsg::RestoreInterchainAccount(_) => MsgRestoreInterchainAccount::TYPE_URL,
            StakeibcMsg::UpdateValidatorSharesExchRate(_) => {
                MsgUpdateValidatorSharesExchRate::TYPE_URL
            }
        }
    }

    pub fn legacy_tag(&self) -> Option<&'static str> {
        match self {
            StakeibcMsg::LiquidStake(_) => MsgLiquidStake::LEGACY_TAG,
            StakeibcMsg::ClearBalance(_) => MsgClearBalance::LEGACY_TAG,
            StakeibcMsg::RegisterAccount(_) => MsgRegisterAccount::LEGACY_TAG,
            StakeibcMsg::SubmitTx(_) => MsgSubmitTx::LEGACY_TAG,
            StakeibcMsg::RegisterHostZone(_) => MsgRegisterHostZone::LEGACY_TAG,
            StakeibcMsg::RedeemStake(_) => MsgRedeemStake::LEGACY_TAG,
            StakeibcMsg::ClaimUndelegatedTokens(_) => MsgClaimUndelegatedTokens::LEGACY_TAG,
            StakeibcMsg::RebalanceValidators(_) => MsgRebalanceValidators::LEGACY_TAG,
            StakeibcMsg::AddValidator(_) => MsgAddValidator::LEGACY_TAG,
            StakeibcMsg::ChangeValidatorWeight(_) => MsgChangeValidatorWeight::LEGACY_TAG,
            StakeibcMsg::DeleteValidator(_) => MsgDeleteValidator::LEGACY_TAG,
            StakeibcMsg::RestoreInterchainAccount(_) => MsgRestoreInterchainAccount::LEGACY_TAG,
            StakeibcMsg::UpdateValidatorSharesExchRate(_) => {
                MsgUpdateValidatorSharesExchRate::LEGACY_TAG
            }
        }
    }

    /// Encodes the message as `{"type": <tag>, "value": <message>}`.
    pub fn to_legacy_json(&self) -> Result<String, CodecError> {
        let legacy = LegacyStakeibcMsg::try_from(self.clone())?;

        Ok(serde_json::to_string(&legacy)?)
    }

    /// Decodes a message from its legacy `{"type", "value"}` JSON envelope.
    pub fn from_legacy_json(json: &str) -> Result<Self, CodecError> {
        let envelope: serde_json::Value = serde_json::from_str(json)?;

        let tag = envelope
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| CodecError::MalformedJson {
                description: "missing `type` field".to_string(),
            })?;

        if !Self::LEGACY_TAGS.contains(&tag) {
            return Err(CodecError::UnknownLegacyType {
                tag: tag.to_string(),
            });
        }

        let legacy: LegacyStakeibcMsg = serde_json::from_value(envelope)?;

        Ok(legacy.into())
    }
}

fn decode<M: StakeibcMessage>(value: &[u8]) -> Result<M, CodecError> {
    Ok(M::decode(value)?)
}

impl TryFrom<Any> for StakeibcMsg {
    type Error = CodecError;

    fn try_from(any_msg: Any) -> Result<Self, Self::Error> {
        let value = any_msg.value.as_slice();

        let msg = match any_msg.type_url.as_str() {
            MsgLiquidStake::TYPE_URL => decode::<MsgLiquidStake>(value)?.into(),
            MsgClearBalance::TYPE_URL => decode::<MsgClearBalance>(value)?.into(),
            MsgRegisterAccount::TYPE_URL => decode::<MsgRegisterAccount>(value)?.into(),
            MsgSubmitTx::TYPE_URL => decode::<MsgSubmitTx>(value)?.into(),
            MsgRegisterHostZone::TYPE_URL => decode::<MsgRegisterHostZone>(value)?.into(),
            MsgRedeemStake::TYPE_URL => decode::<MsgRedeemStake>(value)?.into(),
            MsgClaimUndelegatedTokens::TYPE_URL => {
                decode::<MsgClaimUndelegatedTokens>(value)?.into()
            }
            MsgRebalanceValidators::TYPE_URL => decode::<MsgRebalanceValidators>(value)?.into(),
            MsgAddValidator::TYPE_URL => decode::<MsgAddValidator>(value)?.into(),
            MsgChangeValidatorWeight::TYPE_URL => {
                decode::<MsgChangeValidatorWeight>(value)?.into()
            }
            MsgDeleteValidator::TYPE_URL => decode::<MsgDeleteValidator>(value)?.into(),
            MsgRestoreInterchainAccount::TYPE_URL => {
                decode::<MsgRestoreInterchainAccount>(value)?.into()
            }
            MsgUpdateValidatorSharesExchRate::TYPE_URL => {
                decode::<MsgUpdateValidatorSharesExchRate>(value)?.into()
            }
            _ => {
                return Err(CodecError::UnknownTypeUrl {
                    type_url: any_msg.type_url,
                })
            }
        };

        Ok(msg)
    }
}

impl From<StakeibcMsg> for Any {
    fn from(msg: StakeibcMsg) -> Self {
        let type_url = msg.type_url().to_string();

        let value = match msg {
            StakeibcMsg::LiquidStake(msg) => msg.encode_to_vec(),
            StakeibcMsg::ClearBalance(msg) => msg.encode_to_vec(),
            StakeibcMsg::RegisterAccount(msg) => msg.encode_to_vec(),
            StakeibcMsg::SubmitTx(msg) => msg.encode_to_vec(),
            StakeibcMsg::RegisterHostZone(msg) => msg.encode_to_vec(),
            StakeibcMsg::RedeemStake(msg) => msg.encode_to_vec(),
            StakeibcMsg::ClaimUndelegatedTokens(msg) => msg.encode_to_vec(),
            StakeibcMsg::RebalanceValidators(msg) => msg.encode_to_vec(),
            StakeibcMsg::AddValidator(msg) => msg.encode_to_vec(),
            StakeibcMsg::ChangeValidatorWeight(msg) => msg.encode_to_vec(),
            StakeibcMsg::DeleteValidator(msg) => msg.encode_to_vec(),
            StakeibcMsg::RestoreInterchainAccount(msg) => msg.encode_to_vec(),
            StakeibcMsg::UpdateValidatorSharesExchRate(msg) => msg.encode_to_vec(),
        };

        Any { type_url, value }
    }
}

/// The messages registered for the legacy JSON encoding.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
enum LegacyStakeibcMsg {
    #[serde(rename = "stakeibc/LiquidStake")]
    LiquidStake(MsgLiquidStake),
    #[serde(rename = "stakeibc/RegisterAccount")]
    RegisterAccount(MsgRegisterAccount),
    #[serde(rename = "stakeibc/SubmitTx")]
    SubmitTx(MsgSubmitTx),
    #[serde(rename = "stakeibc/RegisterHostZone")]
    RegisterHostZone(MsgRegisterHostZone),
    #[serde(rename = "stakeibc/RedeemStake")]
    RedeemStake(MsgRedeemStake),
    #[serde(rename = "stakeibc/ClaimUndelegatedTokens")]
    ClaimUndelegatedTokens(MsgClaimUndelegatedTokens),
    #[serde(rename = "stakeibc/RebalanceValidators")]
    RebalanceValidators(MsgRebalanceValidators),
    #[serde(rename = "stakeibc/AddValidator")]
    AddValidator(MsgAddValidator),
    #[serde(rename = "stakeibc/ChangeValidatorWeight")]
    ChangeValidatorWeight(MsgChangeValidatorWeight),
    #[serde(rename = "stakeibc/DeleteValidator")]
    DeleteValidator(MsgDeleteValidator),
    #[serde(rename = "stakeibc/RestoreInterchainAccount")]
    RestoreInterchainAccount(MsgRestoreInterchainAccount),
    #[serde(rename = "stakeibc/UpdateValidatorSharesExchRate")]
    UpdateValidatorSharesExchRate(MsgUpdateValidatorSharesExchRate),
}

impl TryFrom<StakeibcMsg> for LegacyStakeibcMsg {
    type Error = CodecError;

    fn try_from(msg: StakeibcMsg) -> Result<Self, Self::Error> {
        let legacy = match msg {
            StakeibcMsg::LiquidStake(msg) => Self::LiquidStake(msg),
            StakeibcMsg::ClearBalance(_) => {
                return Err(CodecError::NotLegacyRegistered {
                    type_url: MsgClearBalance::TYPE_URL,
                })
            }
            StakeibcMsg::RegisterAccount(msg) => Self::RegisterAccount(msg),
            StakeibcMsg::SubmitTx(msg) => Self::SubmitTx(msg),
            StakeibcMsg::RegisterHostZone(msg) => Self::RegisterHostZone(msg),
            StakeibcMsg::RedeemStake(msg) => Self::RedeemStake(msg),
            StakeibcMsg::ClaimUndelegatedTokens(msg) => Self::ClaimUndelegatedTokens(msg),
            StakeibcMsg::RebalanceValidators(msg) => Self::RebalanceValidators(msg),
            StakeibcMsg::AddValidator(msg) => Self::AddValidator(msg),
            StakeibcMsg::ChangeValidatorWeight(msg) => Self::ChangeValidatorWeight(msg),
            StakeibcMsg::DeleteValidator(msg) => Self::DeleteValidator(msg),
            StakeibcMsg::RestoreInterchainAccount(msg) => Self::RestoreInterchainAccount(msg),
            StakeibcMsg::UpdateValidatorSharesExchRate(msg) => {
                Self::UpdateValidatorSharesExchRate(msg)
            }
        };

        Ok(legacy)
    }
}

impl From<LegacyStakeibcMsg> for StakeibcMsg {
    fn from(legacy: LegacyStakeibcMsg) -> Self {
        match legacy {
            LegacyStakeibcMsg::LiquidStake(msg) => msg.into(),
            LegacyStakeibcMsg::RegisterAccount(msg) => msg.into(),
            LegacyStakeibcMsg::SubmitTx(msg) => msg.into(),
            LegacyStakeibcMsg::RegisterHostZone(msg) => msg.into(),
            LegacyStakeibcMsg::RedeemStake(msg) => msg.into(),
            LegacyStakeibcMsg::ClaimUndelegatedTokens(msg) => msg.into(),
            LegacyStakeibcMsg::RebalanceValidators(msg) => msg.into(),
            LegacyStakeibcMsg::AddValidator(msg) => msg.into(),
            LegacyStakeibcMsg::ChangeValidatorWeight(msg) => msg.into(),
            LegacyStakeibcMsg::DeleteValidator(msg) => msg.into(),
            LegacyStakeibcMsg::RestoreInterchainAccount(msg) => msg.into(),
            LegacyStakeibcMsg::UpdateValidatorSharesExchRate(msg) => msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn liquid_stake() -> MsgLiquidStake {
        MsgLiquidStake {
            creator: "stride1creator".to_string(),
            amount: 1_000,
            host_denom: "uatom".to_string(),
        }
    }

    #[test]
    fn any_dispatches_on_type_url() {
        let any: Any = StakeibcMsg::from(liquid_stake()).into();

        assert_eq!(any.type_url, "/stride.stakeibc.MsgLiquidStake");
        assert_eq!(
            StakeibcMsg::try_from(any).unwrap(),
            StakeibcMsg::LiquidStake(liquid_stake())
        );
    }

    #[test]
    fn clear_balance_is_accepted_for_service_dispatch() {
        let msg = MsgClearBalance {
            creator: "stride1creator".to_string(),
            chain_id: "GAIA".to_string(),
            amount: 10,
            channel: "channel-0".to_string(),
        };
        let any: Any = StakeibcMsg::from(msg.clone()).into();

        assert!(StakeibcMsg::TYPE_URLS.contains(&any.type_url.as_str()));
        assert_eq!(
            StakeibcMsg::try_from(any).unwrap(),
            StakeibcMsg::ClearBalance(msg)
        );
    }

    #[test]
    fn unknown_type_url_is_rejected() {
        let any = Any {
            type_url: "/stride.stakeibc.MsgUnknown".to_string(),
            value: vec![],
        };

        assert!(matches!(
            StakeibcMsg::try_from(any),
            Err(CodecError::UnknownTypeUrl { .. })
        ));
    }

    #[test]
    fn malformed_bytes_are_rejected() {
        let any = Any {
            type_url: MsgLiquidStake::TYPE_URL.to_string(),
            value: vec![0xff, 0xff, 0xff],
        };

        assert!(matches!(
            StakeibcMsg::try_from(any),
            Err(CodecError::MalformedBytes(_))
        ));
    }

    #[test]
    fn legacy_json_envelope() {
        let msg = StakeibcMsg::from(liquid_stake());
        let json = msg.to_legacy_json().unwrap();

        assert_eq!(
            json,
            r#"{"type":"stakeibc/LiquidStake","value":{"creator":"stride1creator","amount":1000,"host_denom":"uatom"}}"#
        );
        assert_eq!(StakeibcMsg::from_legacy_json(&json).unwrap(), msg);
    }

    #[test]
    fn clear_balance_has_no_legacy_encoding() {
        let msg = StakeibcMsg::from(MsgClearBalance::default());

        assert_eq!(msg.legacy_tag(), None);
        assert!(matches!(
            msg.to_legacy_json(),
            Err(CodecError::NotLegacyRegistered { .. })
        ));
        assert!(matches!(
            StakeibcMsg::from_legacy_json(r#"{"type":"stakeibc/ClearBalance","value":{}}"#),
            Err(CodecError::UnknownLegacyType { .. })
        ));
    }

    #[rstest]
    #[case(StakeibcMsg::from(MsgLiquidStake::default()))]
    #[case(StakeibcMsg::from(MsgRegisterAccount::default()))]
    #[case(StakeibcMsg::from(MsgSubmitTx::default()))]
    #[case(StakeibcMsg::from(MsgRegisterHostZone::default()))]
    #[case(StakeibcMsg::from(MsgRedeemStake::default()))]
    #[case(StakeibcMsg::from(MsgClaimUndelegatedTokens::default()))]
    #[case(StakeibcMsg::from(MsgRebalanceValidators::default()))]
    #[case(StakeibcMsg::from(MsgAddValidator::default()))]
    #[case(StakeibcMsg::from(MsgChangeValidatorWeight::default()))]
    #[case(StakeibcMsg::from(MsgDeleteValidator::default()))]
    #[case(StakeibcMsg::from(MsgRestoreInterchainAccount::default()))]
    #[case(StakeibcMsg::from(MsgUpdateValidatorSharesExchRate::default()))]
    fn legacy_tags_match_registry(#[case] msg: StakeibcMsg) {
        let tag = msg.legacy_tag().unwrap();

        assert!(StakeibcMsg::LEGACY_TAGS.contains(&tag));
        assert_eq!(
            tag.strip_prefix("stakeibc/"),
            msg.type_url().strip_prefix("/stride.stakeibc.Msg")
        );
    }

    #[test]
    fn legacy_json_without_type_is_malformed() {
        assert!(matches!(
            StakeibcMsg::from_legacy_json(r#"{"value":{}}"#),
            Err(CodecError::MalformedJson { .. })
        ));
    }
}
