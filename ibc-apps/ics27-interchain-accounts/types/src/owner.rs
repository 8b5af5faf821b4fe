use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use crate::error::InterchainAccountError;

const OWNER_SEPARATOR: char = '.';

/// An interchain account owner of the form `{host_chain_id}.{account_name}`,
/// e.g. `GAIA.delegation`.
///
/// The owner is the string the controller chain registers an interchain
/// account under. The host chain identifier is encoded in it so that the
/// account's counterparty can be recovered without any chain lookup.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountOwner {
    host_chain_id: String,
    account_name: String,
}

impl AccountOwner {
    pub fn new(
        host_chain_id: impl Into<String>,
        account_name: impl Into<String>,
    ) -> Result<Self, InterchainAccountError> {
        let owner = Self {
            host_chain_id: host_chain_id.into(),
            account_name: account_name.into(),
        };
        // round-trip through the parser so that both constructors agree
        owner.to_string().parse()
    }

    pub fn host_chain_id(&self) -> &str {
        &self.host_chain_id
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }
}

impl FromStr for AccountOwner {
    type Err = InterchainAccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(InterchainAccountError::EmptyOwner);
        }

        let mut parts = s.split(OWNER_SEPARATOR);

        match (parts.next(), parts.next(), parts.next()) {
            (Some(host_chain_id), Some(account_name), None)
                if !host_chain_id.is_empty() && !account_name.is_empty() =>
            {
                Ok(Self {
                    host_chain_id: host_chain_id.to_string(),
                    account_name: account_name.to_string(),
                })
            }
            _ => Err(InterchainAccountError::MalformedOwner {
                owner: s.to_string(),
            }),
        }
    }
}

impl Display for AccountOwner {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "{}{}{}",
            self.host_chain_id, OWNER_SEPARATOR, self.account_name
        )
    }
}
