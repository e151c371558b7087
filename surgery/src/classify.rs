use {
    crate::{HandlerError, SurgeryDataSources},
    regenesis_dump::Account,
    regenesis_shared::primitives::{KECCAK_EMPTY, ToHexString, is_precompile},
    std::fmt,
};

/// Category of a legacy account, deciding how the surgery transforms it.
///
/// # Variants
/// * `Predeploy*` accounts are system contracts at fixed addresses. `Dead` ones are dropped,
///   `Wipe` ones take the genesis code and storage, `NoWipe` ones keep their storage under the
///   genesis code, `Eth` inherits the storage of the legacy native asset contract.
/// * `Protocol*` accounts belong to the exchange protocol deployed on both the legacy chain and
///   the new chain.
/// * `Verified` and `Unverified` are third party contracts with and without archived source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    Eoa,
    Precompile,
    PredeployDead,
    PredeployWipe,
    PredeployNoWipe,
    PredeployEth,
    PredeployWeth,
    ProtocolFactory,
    ProtocolPositionManager,
    ProtocolPool,
    ProtocolLibrary,
    ProtocolOther,
    Unverified,
    Verified,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Eoa => "EOA",
            Self::Precompile => "precompile",
            Self::PredeployDead => "dead predeploy",
            Self::PredeployWipe => "wiped predeploy",
            Self::PredeployNoWipe => "unwiped predeploy",
            Self::PredeployEth => "native asset predeploy",
            Self::PredeployWeth => "wrapped native asset predeploy",
            Self::ProtocolFactory => "protocol factory",
            Self::ProtocolPositionManager => "protocol position manager",
            Self::ProtocolPool => "protocol pool",
            Self::ProtocolLibrary => "protocol library",
            Self::ProtocolOther => "protocol",
            Self::Unverified => "unverified contract",
            Self::Verified => "verified contract",
        };
        f.write_str(name)
    }
}

/// Assigns `account` its [`AccountType`].
///
/// Address based categories take precedence over code based ones, in this order: precompile
/// range, native asset predeploys, the remaining predeploys, protocol contracts. Only then is an
/// account without code, or with an EOA proxy code hash, an EOA, and any other account with code
/// verified or unverified by whether its source is archived.
///
/// A code hash other than the empty one declares code even if the dump left the bytecode out.
/// Inline bytecode under the empty code hash contradicts itself and is not classified.
pub fn classify<C>(
    account: &Account,
    sources: &SurgeryDataSources<C>,
) -> Result<AccountType, HandlerError> {
    let address = account.address.as_str();
    let references = &sources.references;
    let is = |single: &Option<String>| single.as_deref() == Some(address);

    let account_type = if is_precompile(address) {
        AccountType::Precompile
    } else if is(&references.predeploy_eth) {
        AccountType::PredeployEth
    } else if is(&references.predeploy_weth) {
        AccountType::PredeployWeth
    } else if references.predeploy_dead.contains(address) {
        AccountType::PredeployDead
    } else if references.predeploy_wipe.contains(address) {
        AccountType::PredeployWipe
    } else if references.predeploy_no_wipe.contains(address) {
        AccountType::PredeployNoWipe
    } else if references.protocol_factory.contains(address) {
        AccountType::ProtocolFactory
    } else if references.protocol_position_manager.contains(address) {
        AccountType::ProtocolPositionManager
    } else if sources.pools.contains(address) {
        AccountType::ProtocolPool
    } else if references.protocol_libraries.contains(address) {
        AccountType::ProtocolLibrary
    } else if references.protocol_other.contains(address) {
        AccountType::ProtocolOther
    } else if is_eoa(account, sources) {
        AccountType::Eoa
    } else if declares_code(account) && sources.etherscan.contains(address) {
        AccountType::Verified
    } else if declares_code(account) {
        AccountType::Unverified
    } else {
        return Err(HandlerError::Unclassified {
            code_hash: account.code_hash.clone(),
        });
    };

    Ok(account_type)
}

fn is_eoa<C>(account: &Account, sources: &SurgeryDataSources<C>) -> bool {
    let no_code = !account.has_code() && !declares_code(account);

    no_code || sources.references.eoa_code_hashes.contains(&account.code_hash)
}

fn declares_code(account: &Account) -> bool {
    account.code_hash != KECCAK_EMPTY.to_hex_string()
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::tests::{self as fixtures, *},
        test_case::test_case,
    };

    #[test_case(fixtures::account(PRECOMPILE), AccountType::Precompile; "Precompile")]
    #[test_case(fixtures::account(PREDEPLOY_ETH), AccountType::PredeployEth; "Native asset")]
    #[test_case(fixtures::account(PREDEPLOY_WETH), AccountType::PredeployWeth; "Wrapped native asset")]
    #[test_case(contract(DEAD, &[0x60]), AccountType::PredeployDead; "Dead predeploy")]
    #[test_case(contract(WIPE, &[0x60]), AccountType::PredeployWipe; "Wiped predeploy")]
    #[test_case(contract(NO_WIPE, &[0x60]), AccountType::PredeployNoWipe; "Unwiped predeploy")]
    #[test_case(contract(FACTORY, &[0x60]), AccountType::ProtocolFactory; "Factory")]
    #[test_case(contract(POSITION_MANAGER, &[0x60]), AccountType::ProtocolPositionManager; "Position manager")]
    #[test_case(contract(POOL, &[0x60]), AccountType::ProtocolPool; "Pool")]
    #[test_case(contract(LIBRARY, &[0x60]), AccountType::ProtocolLibrary; "Library")]
    #[test_case(contract(OTHER, &[0x60]), AccountType::ProtocolOther; "Other protocol")]
    #[test_case(fixtures::account(USER), AccountType::Eoa; "No code")]
    #[test_case(contract(USER, PROXY_CODE), AccountType::Eoa; "EOA proxy")]
    #[test_case(contract(VERIFIED, &[0x60]), AccountType::Verified; "Archived source")]
    #[test_case(contract(UNVERIFIED, &[0x60]), AccountType::Unverified; "No archived source")]
    fn test_every_category_is_reachable(account: Account, expected: AccountType) {
        let sources = Fixture::default().build();

        assert_eq!(classify(&account, &sources).unwrap(), expected);
    }

    #[test]
    fn test_precompile_range_wins_over_reference_sets() {
        let mut fixture = Fixture::default();
        fixture.references.predeploy_dead.insert(PRECOMPILE.to_string());
        let sources = fixture.build();

        let actual = classify(&fixtures::account(PRECOMPILE), &sources).unwrap();

        assert_eq!(actual, AccountType::Precompile);
    }

    #[test]
    fn test_address_category_wins_over_archived_source() {
        let mut fixture = Fixture::default();
        fixture.etherscan.push(etherscan_contract(OTHER, "contract A {}"));
        let sources = fixture.build();

        let actual = classify(&contract(OTHER, &[0x60]), &sources).unwrap();

        assert_eq!(actual, AccountType::ProtocolOther);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let sources = Fixture::default().build();
        let account = contract(VERIFIED, &[0x60, 0x80]);

        let first = classify(&account, &sources).unwrap();

        for _ in 0..10 {
            assert_eq!(classify(&account, &sources).unwrap(), first);
        }
    }

    #[test_case(VERIFIED, AccountType::Verified; "Archived source")]
    #[test_case(UNVERIFIED, AccountType::Unverified; "No archived source")]
    fn test_code_hash_without_inline_code_declares_a_contract(
        address: &str,
        expected: AccountType,
    ) {
        let sources = Fixture::default().build();
        let account = Account {
            code: None,
            ..contract(address, &[0x60, 0x80])
        };

        assert_eq!(classify(&account, &sources).unwrap(), expected);
    }

    #[test]
    fn test_inline_code_under_empty_code_hash_is_unclassified() {
        let sources = Fixture::default().build();
        let account = Account {
            code: Some("0x6080".to_string()),
            ..fixtures::account(USER)
        };

        let error = classify(&account, &sources).unwrap_err();

        assert!(matches!(error, HandlerError::Unclassified { code_hash } if code_hash == account.code_hash));
    }
}
