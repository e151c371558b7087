use {
    crate::{HandlerError, SurgeryDataSources},
    regenesis_dump::{Account, GenesisAccount, Storage, storage_root},
};

/// Replaces code and storage with the genesis ones.
pub fn wipe<C>(account: &Account, sources: &SurgeryDataSources<C>) -> Result<Account, HandlerError> {
    let genesis = genesis_account(account, sources)?;

    with_genesis_code(account, genesis, genesis.storage.clone())
}

/// Takes the genesis code and layers the genesis storage over the existing storage.
pub fn no_wipe<C>(
    account: &Account,
    sources: &SurgeryDataSources<C>,
) -> Result<Account, HandlerError> {
    let genesis = genesis_account(account, sources)?;
    let storage = merge(account.storage.as_ref(), &genesis.storage);

    with_genesis_code(account, genesis, storage)
}

/// Takes the genesis code and layers the genesis storage over the storage of the legacy native
/// asset contract.
pub fn eth<C>(account: &Account, sources: &SurgeryDataSources<C>) -> Result<Account, HandlerError> {
    let genesis = genesis_account(account, sources)?;
    let legacy = sources
        .references
        .legacy_eth
        .as_deref()
        .unwrap_or(&account.address);
    let legacy = sources
        .dump
        .get(legacy)
        .ok_or_else(|| HandlerError::MissingDumpAccount(legacy.to_string()))?;
    let storage = merge(legacy.storage.as_ref(), &genesis.storage);

    with_genesis_code(account, genesis, storage)
}

fn genesis_account<'a, C>(
    account: &Account,
    sources: &'a SurgeryDataSources<C>,
) -> Result<&'a GenesisAccount, HandlerError> {
    sources
        .genesis
        .get(&account.address)
        .ok_or_else(|| HandlerError::MissingGenesisAccount(account.address.clone()))
}

fn merge(old: Option<&Storage>, genesis: &Storage) -> Storage {
    let mut storage = old.cloned().unwrap_or_default();
    storage.extend(genesis.iter().map(|(k, v)| (k.clone(), v.clone())));
    storage
}

fn with_genesis_code(
    account: &Account,
    genesis: &GenesisAccount,
    storage: Storage,
) -> Result<Account, HandlerError> {
    let root = storage_root(&storage).ok_or(HandlerError::InvalidStorage)?;

    Ok(Account {
        code: genesis.code.clone(),
        code_hash: genesis.code_hash.clone(),
        root,
        storage: (!storage.is_empty()).then_some(storage),
        ..account.clone()
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::tests::{self as fixtures, *},
        regenesis_shared::primitives::{EMPTY_ROOT_HASH, ToHexString},
        serde_json::json,
    };

    fn with_storage(account: Account, slots: &[(u8, u8)]) -> Account {
        let storage: Storage = slots.iter().map(|&(k, v)| (slot(k), slot(v))).collect();
        Account {
            root: storage_root(&storage).unwrap(),
            storage: Some(storage),
            ..account
        }
    }

    fn genesis_fixture(address: &str) -> Fixture {
        Fixture::default().genesis(
            address,
            json!({
                "balance": "0x0",
                "code": GENESIS_CODE.to_hex_string(),
                "storage": {slot(1): slot(10), slot(3): slot(30)}
            }),
        )
    }

    #[test]
    fn test_wipe_takes_genesis_code_and_storage_only() {
        let account = with_storage(contract(WIPE, &[0x60]), &[(1, 1), (2, 2)]);
        let sources = genesis_fixture(WIPE).account(account.clone()).build();

        let actual = wipe(&account, &sources).unwrap();

        let genesis = sources.genesis.get(WIPE).unwrap();
        assert_eq!(actual.code, genesis.code);
        assert_eq!(actual.code_hash, code_hash(GENESIS_CODE));
        assert_eq!(actual.storage.as_ref(), Some(&genesis.storage));
        assert_eq!(actual.root, genesis.root);
        assert_eq!(actual.nonce, account.nonce);
    }

    #[test]
    fn test_no_wipe_keeps_old_slots_under_genesis_slots() {
        let account = with_storage(contract(NO_WIPE, &[0x60]), &[(1, 1), (2, 2)]);
        let sources = genesis_fixture(NO_WIPE).account(account.clone()).build();

        let actual = no_wipe(&account, &sources).unwrap();

        let expected = with_storage(account.clone(), &[(1, 10), (2, 2), (3, 30)]);
        assert_eq!(actual.storage, expected.storage);
        assert_eq!(actual.root, expected.root);
        assert_eq!(actual.code_hash, code_hash(GENESIS_CODE));
    }

    #[test]
    fn test_eth_inherits_legacy_native_asset_storage() {
        let legacy = with_storage(contract(LEGACY_ETH, &[0x60]), &[(2, 2), (3, 3)]);
        let account = with_storage(fixtures::account(PREDEPLOY_ETH), &[(4, 4)]);
        let sources = genesis_fixture(PREDEPLOY_ETH)
            .account(legacy)
            .account(account.clone())
            .build();

        let actual = eth(&account, &sources).unwrap();

        let expected = with_storage(account.clone(), &[(1, 10), (2, 2), (3, 30)]);
        assert_eq!(actual.storage, expected.storage);
        assert_eq!(actual.root, expected.root);
        assert_eq!(actual.address, PREDEPLOY_ETH);
    }

    #[test]
    fn test_wipe_without_genesis_storage_has_empty_root() {
        let account = with_storage(contract(WIPE, &[0x60]), &[(1, 1)]);
        let sources = Fixture::default()
            .genesis(WIPE, json!({"balance": "0x0", "code": "0x6001"}))
            .build();

        let actual = wipe(&account, &sources).unwrap();

        assert_eq!(actual.storage, None);
        assert_eq!(actual.root, EMPTY_ROOT_HASH.to_hex_string());
    }

    #[test]
    fn test_predeploy_without_genesis_account_fails() {
        let account = contract(NO_WIPE, &[0x60]);
        let sources = Fixture::default().build();

        let error = no_wipe(&account, &sources).unwrap_err();

        assert!(matches!(error, HandlerError::MissingGenesisAccount(address) if address == NO_WIPE));
    }

    #[test]
    fn test_eth_without_legacy_account_fails() {
        let account = fixtures::account(PREDEPLOY_ETH);
        let sources = genesis_fixture(PREDEPLOY_ETH).build();

        let error = eth(&account, &sources).unwrap_err();

        assert!(matches!(error, HandlerError::MissingDumpAccount(address) if address == LEGACY_ETH));
    }
}
