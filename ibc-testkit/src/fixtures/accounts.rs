use ibc_app_interchain_accounts_types::{AccountOwner, InterchainAccountError};
use ibc_app_stakeibc_types::msgs::IcaAccountType;
use sha2::{Digest, Sha256};
use subtle_encoding::bech32;

/// Bech32 prefix of the controller chain's accounts.
pub const STRIDE_ACCOUNT_PREFIX: &str = "stride";

/// Returns `n` distinct account addresses on the controller chain. The
/// addresses are derived from their index, so every run yields the same set.
pub fn create_test_accounts(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let mut hash = Sha256::digest(format!("test-account-{i}").as_bytes()).to_vec();
            hash.truncate(20);

            bech32::encode(STRIDE_ACCOUNT_PREFIX, hash)
        })
        .collect()
}

/// The owner under which the controller registers the interchain account of
/// the given type on `host_chain_id`, e.g. `GAIA.DELEGATION`.
pub fn ica_owner(
    host_chain_id: &str,
    account_type: IcaAccountType,
) -> Result<AccountOwner, InterchainAccountError> {
    AccountOwner::new(host_chain_id, account_type.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accounts_are_distinct_and_stable() {
        let accounts = create_test_accounts(3);

        assert_eq!(accounts.len(), 3);
        assert!(accounts.iter().all(|a| a.starts_with("stride1")));
        assert_ne!(accounts[0], accounts[1]);
        assert_ne!(accounts[1], accounts[2]);
        assert_eq!(accounts, create_test_accounts(3));
    }

    #[test]
    fn owner_of_delegation_account() {
        let owner = ica_owner("GAIA", IcaAccountType::Delegation).unwrap();

        assert_eq!(owner.to_string(), "GAIA.DELEGATION");
    }
}
