use {
    crate::{CodeSource, Error, Result, SurgeryDataSources, Transformed, classify, handle},
    futures::{StreamExt, TryStreamExt, future, stream},
    regenesis_dump::{Account, GenesisAccount, validate},
    std::collections::HashSet,
    tracing::{debug, info, warn},
};

/// Default number of accounts transformed at the same time.
pub const DEFAULT_ACCOUNT_CONCURRENCY: usize = 64;

/// Transforms every account of the legacy dump into the new genesis state.
///
/// The dump is validated and the reference sets are cross-checked before any account is touched.
/// Up to `concurrency` accounts are in flight at once. The first failing account aborts the run
/// and no partial output is returned. Genesis accounts the legacy chain knows nothing about are
/// appended unchanged. The result is sorted by address.
pub async fn perform_surgery<C: CodeSource>(
    sources: &SurgeryDataSources<C>,
    concurrency: usize,
) -> Result<Vec<Account>> {
    validate(&sources.dump)?;
    sources.references.check_disjoint(&sources.pools)?;
    info!(
        accounts = sources.dump.len(),
        genesis = sources.genesis.len(),
        concurrency,
        "Starting surgery"
    );

    let mut accounts: Vec<Account> = stream::iter(sources.dump.accounts.values())
        .map(|account| transform(account, sources))
        .buffer_unordered(concurrency.max(1))
        .try_filter_map(future::ok)
        .try_collect()
        .await?;
    info!(
        kept = accounts.len(),
        deleted = sources.dump.len() - accounts.len(),
        "Transformed legacy accounts"
    );

    let genesis_only = genesis_only(sources, &accounts);
    if !genesis_only.is_empty() {
        warn!(
            count = genesis_only.len(),
            "Appending genesis accounts missing from the legacy dump"
        );
    }
    accounts.extend(genesis_only);

    accounts.sort_by(|a, b| a.address.cmp(&b.address));
    if let Some(pair) = accounts.windows(2).find(|pair| pair[0].address == pair[1].address) {
        return Err(Error::DuplicateAddress(pair[0].address.clone()));
    }

    Ok(accounts)
}

async fn transform<C: CodeSource>(
    account: &Account,
    sources: &SurgeryDataSources<C>,
) -> Result<Option<Account>> {
    let fail = |cause| Error::Account {
        address: account.address.clone(),
        cause,
    };

    let account_type = classify(account, sources).map_err(fail)?;
    debug!(address = %account.address, %account_type, "Classified account");

    match handle(account_type, account, sources).await.map_err(fail)? {
        Transformed::Keep(account) => Ok(Some(account)),
        Transformed::Delete => Ok(None),
    }
}

/// Genesis accounts at addresses neither in the dump nor in the transformed output.
fn genesis_only<C>(sources: &SurgeryDataSources<C>, transformed: &[Account]) -> Vec<Account> {
    let known: HashSet<&str> = sources
        .dump
        .accounts
        .keys()
        .map(String::as_str)
        .chain(transformed.iter().map(|account| account.address.as_str()))
        .collect();

    sources
        .genesis
        .iter()
        .filter(|genesis| !known.contains(genesis.address.as_str()))
        .map(GenesisAccount::to_account)
        .collect()
}
