//! Per category account transforms.
//!
//! A handler reads an account and the shared data sources and produces the account as it
//! appears in the new genesis, or drops it. The input account is never modified.

use {
    crate::{AccountType, CodeSource, HandlerError, SurgeryDataSources},
    regenesis_dump::Account,
};

mod predeploy;
mod protocol;
mod verified;

/// Outcome of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformed {
    Keep(Account),
    Delete,
}

/// Runs the handler of `account_type` on `account`.
pub async fn handle<C: CodeSource>(
    account_type: AccountType,
    account: &Account,
    sources: &SurgeryDataSources<C>,
) -> Result<Transformed, HandlerError> {
    let account = match account_type {
        AccountType::Eoa => account.without_code_and_storage(),
        AccountType::Precompile => account.clone(),
        AccountType::PredeployDead | AccountType::ProtocolLibrary | AccountType::Unverified => {
            return Ok(Transformed::Delete);
        }
        AccountType::PredeployWipe => predeploy::wipe(account, sources)?,
        AccountType::PredeployNoWipe => predeploy::no_wipe(account, sources)?,
        AccountType::PredeployEth => predeploy::eth(account, sources)?,
        AccountType::PredeployWeth
        | AccountType::ProtocolFactory
        | AccountType::ProtocolPositionManager => {
            return Err(HandlerError::NotImplemented(account_type));
        }
        AccountType::ProtocolPool => protocol::pool(account, sources).await?,
        AccountType::ProtocolOther => protocol::other(account, sources).await?,
        AccountType::Verified => verified::recompile(account, sources).await?,
    };

    Ok(Transformed::Keep(account))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::tests::{self as fixtures, *},
        regenesis_dump::Storage,
        regenesis_shared::primitives::{EMPTY_ROOT_HASH, KECCAK_EMPTY, ToHexString},
        test_case::test_case,
    };

    #[tokio::test]
    async fn test_eoa_keeps_nonce_and_loses_code_and_storage() {
        let sources = Fixture::default().build();
        let account = Account {
            nonce: 5,
            storage: Some(Storage::from([(slot(1), slot(2))])),
            ..contract(USER, PROXY_CODE)
        };

        let actual = handle(AccountType::Eoa, &account, &sources).await.unwrap();

        let Transformed::Keep(actual) = actual else {
            panic!("EOA should be kept");
        };
        assert_eq!(actual.nonce, 5);
        assert_eq!(actual.address, USER);
        assert_eq!(actual.code, None);
        assert_eq!(actual.storage, None);
        assert_eq!(actual.code_hash, KECCAK_EMPTY.to_hex_string());
        assert_eq!(actual.root, EMPTY_ROOT_HASH.to_hex_string());
    }

    #[tokio::test]
    async fn test_precompile_is_kept_as_is() {
        let sources = Fixture::default().build();
        let account = Account {
            balance: "1000".to_string(),
            ..fixtures::account(PRECOMPILE)
        };

        let actual = handle(AccountType::Precompile, &account, &sources)
            .await
            .unwrap();

        assert_eq!(actual, Transformed::Keep(account));
    }

    #[test_case(AccountType::PredeployDead, DEAD; "Dead predeploy")]
    #[test_case(AccountType::ProtocolLibrary, LIBRARY; "Protocol library")]
    #[test_case(AccountType::Unverified, UNVERIFIED; "Unverified contract")]
    #[tokio::test]
    async fn test_deleted_categories_produce_no_account(account_type: AccountType, address: &str) {
        let sources = Fixture::default().build();

        let actual = handle(account_type, &contract(address, &[0x60]), &sources)
            .await
            .unwrap();

        assert_eq!(actual, Transformed::Delete);
    }

    #[test_case(AccountType::PredeployWeth, PREDEPLOY_WETH; "Wrapped native asset")]
    #[test_case(AccountType::ProtocolFactory, FACTORY; "Factory")]
    #[test_case(AccountType::ProtocolPositionManager, POSITION_MANAGER; "Position manager")]
    #[tokio::test]
    async fn test_unsupported_categories_fail(account_type: AccountType, address: &str) {
        let sources = Fixture::default().build();

        let error = handle(account_type, &contract(address, &[0x60]), &sources)
            .await
            .unwrap_err();

        assert!(matches!(error, HandlerError::NotImplemented(t) if t == account_type));
    }
}
