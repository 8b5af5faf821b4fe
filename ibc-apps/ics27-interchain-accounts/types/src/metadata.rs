use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use ibc_core_channel_types::Version;
use ibc_core_host_types::identifiers::ConnectionId;
use serde::{Deserialize, Serialize};

use crate::error::InterchainAccountError;
use crate::VERSION;

/// Defines a set of protocol specific data encoded into the ICS27 channel
/// version bytestring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    /// Defines the ICS27 protocol version
    pub version: String,
    /// Defines the connection identifier associated with the controller chain
    pub conn_id_on_a: ConnectionId,
    /// Defines the connection identifier associated with the host chain
    pub conn_id_on_b: ConnectionId,
    /// Defines the interchain account address, filled in by the host chain
    /// during the `ChanOpenTry` handshake step.
    /// NOTE: the address is empty on the `ChanOpenInit` handshake step
    pub address: String,
    /// Defines the supported codec format
    pub encoding: SupportedEncoding,
    /// Defines the type of transactions the interchain account can execute
    pub tx_type: SupportedTxType,
}

/// The JSON representation of [`Metadata`], field-compatible with the
/// metadata used by Cosmos SDK chains.
#[derive(Serialize, Deserialize)]
struct RawMetadata {
    version: String,
    controller_connection_id: String,
    host_connection_id: String,
    address: String,
    encoding: String,
    tx_type: String,
}

impl Metadata {
    /// Constructs a new Metadata instance with default values
    pub fn new_default(conn_id_on_a: ConnectionId, conn_id_on_b: ConnectionId) -> Self {
        Self {
            version: VERSION.to_string(),
            conn_id_on_a,
            conn_id_on_b,
            address: String::new(),
            encoding: SupportedEncoding::Proto3,
            tx_type: SupportedTxType::SdkMultiMsg,
        }
    }

    pub fn with_address(self, address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..self
        }
    }

    /// Decodes the metadata carried by a channel version.
    pub fn from_version(version: &Version) -> Result<Self, InterchainAccountError> {
        let raw: RawMetadata = serde_json::from_str(version.as_str()).map_err(|e| {
            InterchainAccountError::MalformedMetadata {
                description: e.to_string(),
            }
        })?;

        raw.try_into()
    }

    /// Encodes the metadata as a channel version.
    pub fn to_version(&self) -> Version {
        let raw = RawMetadata::from(self.clone());

        Version::new(serde_json::to_string(&raw).expect("Never fails"))
    }

    /// Validates the metadata against the connection pair of the channel it
    /// is negotiated for, as recorded on the chain running the validation.
    pub fn validate(
        &self,
        conn_id_on_a: &ConnectionId,
        conn_id_on_b: &ConnectionId,
    ) -> Result<(), InterchainAccountError> {
        self.validate_protocol()?;

        if &self.conn_id_on_a != conn_id_on_a {
            return Err(InterchainAccountError::MismatchedConnectionId {
                side: "controller",
                expected: conn_id_on_a.clone(),
                actual: self.conn_id_on_a.clone(),
            });
        }

        if &self.conn_id_on_b != conn_id_on_b {
            return Err(InterchainAccountError::MismatchedConnectionId {
                side: "host",
                expected: conn_id_on_b.clone(),
                actual: self.conn_id_on_b.clone(),
            });
        }

        Ok(())
    }

    /// Checks the protocol version. Encoding and transaction type are already
    /// restricted to the supported values by their types.
    pub fn validate_protocol(&self) -> Result<(), InterchainAccountError> {
        if self.version != VERSION {
            return Err(InterchainAccountError::MismatchedVersion {
                expected: VERSION.to_string(),
                actual: self.version.clone(),
            });
        }

        Ok(())
    }

    /// Compares a metadata to a previously negotiated one. All fields must be
    /// equal except the address, which may only be filled in once.
    pub fn verify_prev_metadata_matches(
        &self,
        previous: &Metadata,
    ) -> Result<(), InterchainAccountError> {
        if self.version != previous.version {
            return Err(InterchainAccountError::MismatchedVersion {
                expected: previous.version.clone(),
                actual: self.version.clone(),
            });
        }

        if self.conn_id_on_a != previous.conn_id_on_a {
            return Err(InterchainAccountError::MismatchedConnectionId {
                side: "controller",
                expected: previous.conn_id_on_a.clone(),
                actual: self.conn_id_on_a.clone(),
            });
        }

        if self.conn_id_on_b != previous.conn_id_on_b {
            return Err(InterchainAccountError::MismatchedConnectionId {
                side: "host",
                expected: previous.conn_id_on_b.clone(),
                actual: self.conn_id_on_b.clone(),
            });
        }

        if !previous.address.is_empty() && self.address != previous.address {
            return Err(InterchainAccountError::MismatchedAddress {
                previous: previous.address.clone(),
                actual: self.address.clone(),
            });
        }

        Ok(())
    }
}

impl From<Metadata> for RawMetadata {
    fn from(domain: Metadata) -> Self {
        RawMetadata {
            version: domain.version,
            controller_connection_id: domain.conn_id_on_a.to_string(),
            host_connection_id: domain.conn_id_on_b.to_string(),
            address: domain.address,
            encoding: domain.encoding.to_string(),
            tx_type: domain.tx_type.to_string(),
        }
    }
}

impl TryFrom<RawMetadata> for Metadata {
    type Error = InterchainAccountError;

    fn try_from(raw: RawMetadata) -> Result<Self, Self::Error> {
        let parse_conn_id = |conn_id: &str| {
            ConnectionId::from_str(conn_id).map_err(|e| InterchainAccountError::MalformedMetadata {
                description: e.to_string(),
            })
        };

        Ok(Metadata {
            version: raw.version,
            conn_id_on_a: parse_conn_id(&raw.controller_connection_id)?,
            conn_id_on_b: parse_conn_id(&raw.host_connection_id)?,
            address: raw.address,
            encoding: raw.encoding.parse()?,
            tx_type: raw.tx_type.parse()?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupportedEncoding {
    Proto3,
}

impl FromStr for SupportedEncoding {
    type Err = InterchainAccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proto3" => Ok(SupportedEncoding::Proto3),
            _ => Err(InterchainAccountError::UnsupportedEncoding {
                encoding: s.to_string(),
            }),
        }
    }
}

impl Display for SupportedEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            SupportedEncoding::Proto3 => write!(f, "proto3"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupportedTxType {
    SdkMultiMsg,
}

impl FromStr for SupportedTxType {
    type Err = InterchainAccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sdk_multi_msg" => Ok(SupportedTxType::SdkMultiMsg),
            _ => Err(InterchainAccountError::UnsupportedTxType {
                tx_type: s.to_string(),
            }),
        }
    }
}

impl Display for SupportedTxType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            SupportedTxType::SdkMultiMsg => write!(f, "sdk_multi_msg"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metadata_version_string() {
        let metadata = Metadata::new_default(ConnectionId::new(0), ConnectionId::new(0));

        assert_eq!(
            metadata.to_version().as_str(),
            r#"{"version":"ics27-1","controller_connection_id":"connection-0","host_connection_id":"connection-0","address":"","encoding":"proto3","tx_type":"sdk_multi_msg"}"#
        );
    }

    #[test]
    fn decodes_metadata_with_address() {
        let version = Version::new(
            r#"{"version":"ics27-1","controller_connection_id":"connection-3","host_connection_id":"connection-7","address":"cosmos1xyz","encoding":"proto3","tx_type":"sdk_multi_msg"}"#
                .to_string(),
        );

        let metadata = Metadata::from_version(&version).unwrap();

        assert_eq!(metadata.conn_id_on_a, ConnectionId::new(3));
        assert_eq!(metadata.conn_id_on_b, ConnectionId::new(7));
        assert_eq!(metadata.address, "cosmos1xyz");
    }

    #[test]
    fn transfer_version_is_not_metadata() {
        let version = Version::new("ics20-1".to_string());

        assert!(matches!(
            Metadata::from_version(&version),
            Err(InterchainAccountError::MalformedMetadata { .. })
        ));
    }

    #[test]
    fn unsupported_encoding_is_rejected() {
        let version = Version::new(
            r#"{"version":"ics27-1","controller_connection_id":"connection-0","host_connection_id":"connection-0","address":"","encoding":"json","tx_type":"sdk_multi_msg"}"#
                .to_string(),
        );

        assert!(matches!(
            Metadata::from_version(&version),
            Err(InterchainAccountError::UnsupportedEncoding { .. })
        ));
    }

    #[test]
    fn validate_checks_connection_pair() {
        let metadata = Metadata::new_default(ConnectionId::new(0), ConnectionId::new(1));

        assert!(metadata
            .validate(&ConnectionId::new(0), &ConnectionId::new(1))
            .is_ok());

        assert!(matches!(
            metadata.validate(&ConnectionId::new(2), &ConnectionId::new(1)),
            Err(InterchainAccountError::MismatchedConnectionId {
                side: "controller",
                ..
            })
        ));

        assert!(matches!(
            metadata.validate(&ConnectionId::new(0), &ConnectionId::new(0)),
            Err(InterchainAccountError::MismatchedConnectionId { side: "host", .. })
        ));
    }

    #[test]
    fn address_can_only_be_filled_once() {
        let init = Metadata::new_default(ConnectionId::new(0), ConnectionId::new(0));
        let with_address = init.clone().with_address("cosmos1abc");

        assert!(with_address.verify_prev_metadata_matches(&init).is_ok());
        assert!(with_address
            .clone()
            .with_address("cosmos1def")
            .verify_prev_metadata_matches(&with_address)
            .is_err());
    }
}
